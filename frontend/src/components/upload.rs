//! Upload area: drag & drop intake, Convert button, and the screen switch.
//!
//! [`UploadArea`] owns one [`ConvertSession`] for its lifetime and mirrors
//! the session's screen into a signal; [`IntakePanel`] and
//! [`DownloadPanel`] only render it and report user gestures back.

use leptos::*;
use wasm_bindgen::JsValue;
use web_sys::{DragEvent, HtmlInputElement, MouseEvent, SubmitEvent};

use crate::components::{DownloadPanel, LoadingIndicator, WelcomeText};
use crate::config::{ConvertConfig, XLSX_EXTENSION, XLSX_MIME};
use crate::intake::{candidates_from_list, CandidateFile, DragState};
use crate::services::{GlooTransport, ObjectUrlRegistry};
use crate::session::ConvertSession;
use crate::view::{IntakeView, Screen};

/// Session wired to the real network and object URLs.
pub type BrowserSession = ConvertSession<GlooTransport, ObjectUrlRegistry>;

#[component]
pub fn UploadArea() -> impl IntoView {
    let session: BrowserSession =
        ConvertSession::new(ConvertConfig::default(), GlooTransport::new(), ObjectUrlRegistry::new());
    log::info!("🔧 Conversion endpoint: {}", session.orchestrator().config().upload_url());

    let screen = create_rw_signal(session.screen());
    let drag = create_rw_signal(DragState::default());

    // Async transitions (Submitting, Succeeded, Failed) arrive here.
    let observer = session.clone();
    session.subscribe(move |_| screen.set(observer.screen()));

    // Releases the object URL and the observer above.
    let teardown = session.clone();
    on_cleanup(move || teardown.dispose());

    let session = store_value(session);
    let refresh = move || screen.set(session.with_value(|s| s.screen()));

    let on_files = Callback::new(move |files: Vec<CandidateFile>| {
        session.with_value(move |s| s.drop_files(files));
        refresh();
    });

    let on_remove = Callback::new(move |name: String| {
        session.with_value(|s| s.remove_file(&name));
        refresh();
    });

    let on_submit = Callback::new(move |_: ()| {
        let session = session.get_value();
        spawn_local(async move {
            session.submit().await;
        });
    });

    let on_home = Callback::new(move |_: ()| {
        session.with_value(|s| s.go_home());
        refresh();
    });

    view! {
        <div class="upload-root">
            {move || match screen.get() {
                Screen::Intake(intake) => view! {
                    <IntakePanel
                        intake=intake
                        drag=drag
                        on_files=on_files
                        on_remove=on_remove
                        on_submit=on_submit
                    />
                }.into_view(),
                Screen::Download(download) => view! {
                    <DownloadPanel download=download on_home=on_home/>
                }.into_view(),
            }}
        </div>
    }
}

/// Whether a drag gesture carries files (as opposed to text or links).
fn carries_files(ev: &DragEvent) -> bool {
    ev.data_transfer()
        .map(|dt| dt.types().includes(&JsValue::from_str("Files"), 0))
        .unwrap_or(false)
}

#[component]
pub fn IntakePanel(
    intake: IntakeView,
    drag: RwSignal<DragState>,
    on_files: Callback<Vec<CandidateFile>>,
    on_remove: Callback<String>,
    on_submit: Callback<()>,
) -> impl IntoView {
    let IntakeView {
        files,
        rejection,
        submit_enabled,
        loading,
        error,
    } = intake;

    let file_input = create_node_ref::<html::Input>();
    let accept = format!("{},{}", XLSX_EXTENSION, XLSX_MIME);

    let open_picker = move |_| {
        if loading {
            return;
        }
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    let on_change = move |ev: ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(list) = input.files() {
            on_files.call(candidates_from_list(&list));
        }
        // Allows picking the same file again after removing it.
        input.set_value("");
    };

    let on_drag_enter = move |ev: DragEvent| {
        ev.prevent_default();
        if carries_files(&ev) {
            drag.update(|d| d.enter());
        }
    };

    let on_drag_leave = move |ev: DragEvent| {
        if carries_files(&ev) {
            drag.update(|d| d.leave());
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        drag.update(|d| d.reset());
        if loading {
            return;
        }
        if let Some(list) = ev.data_transfer().and_then(|dt| dt.files()) {
            on_files.call(candidates_from_list(&list));
        }
    };

    view! {
        <div class="upload-area">
            <WelcomeText/>
            <form on:submit=move |ev: SubmitEvent| {
                ev.prevent_default();
                on_submit.call(());
            }>
                <div
                    class="drop-zone"
                    class:active=move || drag.get().is_active()
                    class:disabled=loading
                    on:click=open_picker
                    on:dragenter=on_drag_enter
                    on:dragover=|ev: DragEvent| ev.prevent_default()
                    on:dragleave=on_drag_leave
                    on:drop=on_drop
                >
                    <input
                        type="file"
                        accept=accept
                        style="display:none"
                        node_ref=file_input
                        on:click=|ev: MouseEvent| ev.stop_propagation()
                        on:change=on_change
                    />
                    {move || if drag.get().is_active() {
                        view! { <span class="upload-button">"Plaats je bestand hier"</span> }
                    } else {
                        view! { <span class="upload-button">"☁ Upload bestanden"</span> }
                    }}
                </div>
                <div class="convert-row">
                    {error.map(|message| view! { <p class="error-message">{message}</p> })}
                    {loading.then(|| view! { <LoadingIndicator/> })}
                    <button type="submit" class="convert-button" disabled=!submit_enabled>
                        "Convert"
                    </button>
                </div>
            </form>

            <ul class="file-list">
                {files
                    .into_iter()
                    .map(|row| {
                        let name = row.name.clone();
                        view! {
                            <li class="list-item">
                                <span class="article-icon">"📄"</span>
                                <span class="list-item-text">{row.name}</span>
                                <span class="list-item-size">{row.size}</span>
                                <button
                                    type="button"
                                    class="delete-icon"
                                    title="Verwijderen"
                                    disabled=loading
                                    on:click=move |_| on_remove.call(name.clone())
                                >
                                    "🗑"
                                </button>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            {rejection.map(|message| view! { <p class="error-message">{message}</p> })}
        </div>
    }
}
