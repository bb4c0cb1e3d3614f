use leptos::*;

#[component]
pub fn LoadingIndicator() -> impl IntoView {
    view! {
        <div class="loading-indicator" role="status" aria-live="polite">
            <div class="spinner"></div>
            <span class="loading-text">"Bezig met converteren..."</span>
        </div>
    }
}
