//! Button returning to the intake screen.

use leptos::*;
use leptos_router::use_navigate;

/// Resets the session through `on_home`, then navigates to `/`.
#[component]
pub fn BackToHome(on_home: Callback<()>) -> impl IntoView {
    let navigate = use_navigate();

    let on_click = move |_| {
        log::info!("🏠 Back to home");
        on_home.call(());
        navigate("/", Default::default());
    };

    view! {
        <button type="button" class="back-to-home-button" on:click=on_click>
            <span class="icon">"🏠"</span>
            <span class="text">"Home"</span>
        </button>
    }
}
