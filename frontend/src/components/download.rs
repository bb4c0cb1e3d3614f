//! Download screen shown after a successful conversion.

use leptos::*;

use crate::components::BackToHome;
use crate::view::DownloadView;

#[component]
pub fn DownloadPanel(download: DownloadView, on_home: Callback<()>) -> impl IntoView {
    view! {
        <div class="download-area">
            <div class="file-count-text-container">
                <p>"Download je bestand!"</p>
            </div>
            <a class="download-button" href=download.href download=download.file_name>
                <span class="download-icon">"⬇"</span>
                "Onbekende valuta's zijn geconverteerd. Download je bestand hieronder!"
            </a>
            <BackToHome on_home=on_home/>
        </div>
    }
}
