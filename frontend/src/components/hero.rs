//! Welcome text above the drop surface

use leptos::*;

#[component]
pub fn WelcomeText() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Valuta Convert"</h1>
            <p class="subtitle">
                "Upload je Excel-bestand (.xlsx). "
                "Onbekende valuta's worden automatisch omgezet en je krijgt het bestand direct terug."
            </p>
        </div>
    }
}
