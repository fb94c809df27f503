#![allow(non_snake_case)]
use dioxus::html::{FileEngine, HasFileData};
use dioxus::prelude::*;
use std::path::Path;
use std::sync::Arc;
use triage_core::clipboard::SystemClipboard;
use triage_core::input::{ACCEPTED_EXTENSIONS, MAX_FILE_SIZE_HINT};
use triage_core::presenter::{present, BadgeVariant, View};
use triage_core::{
    AnalysisClient, ClientConfig, FileOrigin, InputMode, RequestState, SelectedFile,
    TriageSession,
};

fn main() {
    triage_core::init_tracing();
    launch(App);
}

fn App() -> Element {
    // Global State
    let session = use_signal(TriageSession::new);
    // Bumped after every session mutation so the page re-reads the session.
    let mut revision = use_signal(|| 0u64);
    let mut analyzed_at = use_signal(|| None::<String>);
    let client = use_signal(|| {
        ClientConfig::from_env()
            .and_then(|config| AnalysisClient::new(&config))
            .map(Arc::new)
            .map_err(|e| e.to_string())
    });
    let mut clipboard = use_signal(|| match SystemClipboard::new() {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::warn!(error = %e, "clipboard unavailable");
            None
        }
    });

    let _ = *revision.read();
    let handle = session.read().clone();
    let input = handle.input().unwrap_or_default();
    let state = handle.request_state().unwrap_or_default();
    let can_submit = handle.can_submit().unwrap_or(false);
    let is_copied = handle.is_copied().unwrap_or(false);

    // Handlers
    let select_mode = move |mode: InputMode| {
        if let Err(e) = session.read().set_mode(mode) {
            tracing::error!(error = %e, "failed to switch mode");
        }
        revision += 1;
    };

    let analyze = move |_| {
        let api = match client.read().clone() {
            Ok(api) => api,
            Err(e) => {
                tracing::error!(error = %e, "analysis client not configured");
                return;
            }
        };
        let in_flight = match session.read().start() {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(error = %e, "submit refused");
                revision += 1;
                return;
            }
        };
        revision += 1;

        // If this task is cancelled, dropping `in_flight` settles the request.
        spawn(async move {
            let outcome = api.analyze(in_flight.payload()).await;
            if let Err(e) = in_flight.finish(outcome) {
                tracing::error!(error = %e, "failed to record outcome");
            }
            analyzed_at.set(Some(chrono::Local::now().format("%H:%M:%S").to_string()));
            revision += 1;
        });
    };

    let copy = move |_| {
        let handle = session.read().clone();
        let mut guard = clipboard.write();
        let Some(sink) = guard.as_mut() else {
            tracing::warn!("copy skipped: no clipboard");
            return;
        };
        match handle.copy_response(sink) {
            Ok(Some(reset)) => {
                revision += 1;
                spawn(async move {
                    let _ = reset.await;
                    revision += 1;
                });
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "copy failed"),
        }
    };

    let client_error = client.read().as_ref().err().cloned();
    let accepted = ACCEPTED_EXTENSIONS.join(", ");

    rsx! {
        div { class: "min-h-screen bg-slate-900 text-white font-sans p-6 flex justify-center",
            // Tailwind
            script { src: "https://cdn.tailwindcss.com" }

            div { class: "w-full max-w-3xl flex flex-col gap-6",
                h1 { class: "text-3xl font-bold text-blue-400 text-center", "Email Analyzer" }
                p { class: "text-slate-400 text-center",
                    "Paste an email or upload a file ({accepted}) to classify it and draft a reply."
                }

                if let Some(err) = client_error {
                    div { class: "p-3 bg-red-900/40 border border-red-500 rounded", "Service not configured: {err}" }
                }

                ModeTabs { mode: input.mode(), on_select: select_mode }

                if input.mode() == InputMode::Text {
                    textarea {
                        class: "min-h-[200px] bg-slate-800 border border-slate-600 rounded p-3",
                        placeholder: "Paste the email body here...",
                        value: "{input.text()}",
                        oninput: move |evt: FormEvent| {
                            if let Err(e) = session.read().set_text(evt.value()) {
                                tracing::error!(error = %e, "failed to store text");
                            }
                            revision += 1;
                        }
                    }
                } else {
                    DropZone {
                        drag_over: input.is_drag_over(),
                        picker_generation: input.picker_generation(),
                        selected: input.file().map(|f| f.name.clone()),
                        oversized: input.file().map(|f| f.exceeds_size_hint()).unwrap_or(false),
                        session: session,
                        revision: revision,
                    }
                }

                button {
                    class: "w-full bg-blue-600 hover:bg-blue-700 disabled:opacity-50 py-3 rounded font-semibold",
                    disabled: !can_submit,
                    onclick: analyze,
                    if state.is_pending() { "Analyzing..." } else { "Analyze Now" }
                }

                ResultPanel {
                    state: state.clone(),
                    is_copied: is_copied,
                    analyzed_at: analyzed_at.read().clone(),
                    on_copy: copy,
                }
            }
        }
    }
}

#[component]
fn ModeTabs(mode: InputMode, on_select: EventHandler<InputMode>) -> Element {
    let tab_class = |active: bool| {
        if active {
            "flex-1 py-2 rounded bg-slate-700"
        } else {
            "flex-1 py-2 rounded text-slate-400"
        }
    };
    rsx! {
        div { class: "flex gap-2 bg-slate-800 p-1 rounded",
            button {
                class: tab_class(mode == InputMode::Text),
                onclick: move |_| on_select.call(InputMode::Text),
                "Paste Text"
            }
            button {
                class: tab_class(mode == InputMode::File),
                onclick: move |_| on_select.call(InputMode::File),
                "Upload File"
            }
        }
    }
}

#[component]
fn DropZone(
    drag_over: bool,
    picker_generation: u64,
    selected: Option<String>,
    oversized: bool,
    session: Signal<TriageSession>,
    revision: Signal<u64>,
) -> Element {
    let zone_class = if drag_over {
        "border-2 border-solid border-sky-400 bg-sky-400/10 rounded-lg p-8 text-center"
    } else {
        "border-2 border-dashed border-slate-600 rounded-lg p-8 text-center"
    };
    let mut revision = revision;
    let max_mb = MAX_FILE_SIZE_HINT / (1024 * 1024);

    rsx! {
        div {
            class: zone_class,
            prevent_default: "ondragover ondrop",
            ondragover: move |_| {
                if let Err(e) = session.read().drag_enter() {
                    tracing::error!(error = %e, "drag state update failed");
                }
                revision += 1;
            },
            ondragleave: move |_| {
                if let Err(e) = session.read().drag_leave() {
                    tracing::error!(error = %e, "drag state update failed");
                }
                revision += 1;
            },
            ondrop: move |evt: DragEvent| async move {
                let file = match evt.files() {
                    Some(engine) => read_first_file(engine).await,
                    None => None,
                };
                if let Err(e) = session.read().drop_file(file) {
                    tracing::error!(error = %e, "drop failed");
                }
                revision += 1;
            },
            p { class: "text-slate-300", "Drag a .txt or .pdf file here, or pick one below" }
            p { class: "text-sm text-slate-500", "Max {max_mb}MB" }
            // A fresh key recreates the control, so a removed file can be picked again.
            for generation in std::iter::once(picker_generation) {
                input {
                    key: "{generation}",
                    class: "mt-4",
                    r#type: "file",
                    accept: ".txt,.pdf",
                    onchange: move |evt: FormEvent| async move {
                        let Some(engine) = evt.files() else { return };
                        if let Some(file) = read_first_file(engine).await {
                            if let Err(e) = session.read().select_file(file, FileOrigin::Picker) {
                                tracing::error!(error = %e, "file selection failed");
                            }
                            revision += 1;
                        }
                    }
                }
            }
        }
        if let Some(name) = selected {
            div { class: "flex items-center justify-between p-3 bg-slate-800 rounded-lg",
                span { class: "truncate text-slate-300", "{name}" }
                if oversized {
                    span { class: "text-amber-400 text-sm", "larger than {max_mb}MB" }
                }
                button {
                    class: "text-slate-400 hover:text-slate-200",
                    onclick: move |_| {
                        if let Err(e) = session.read().clear_file() {
                            tracing::error!(error = %e, "failed to clear file");
                        }
                        revision += 1;
                    },
                    "✕"
                }
            }
        }
    }
}

#[component]
fn ResultPanel(
    state: RequestState,
    is_copied: bool,
    analyzed_at: Option<String>,
    on_copy: EventHandler<()>,
) -> Element {
    match present(&state) {
        View::Empty => rsx! {},
        View::Loading => rsx! {
            div { class: "flex flex-col gap-4 animate-pulse",
                div { class: "h-8 w-32 bg-slate-700 rounded" }
                div { class: "h-4 w-3/4 bg-slate-700 rounded" }
                div { class: "h-24 w-full bg-slate-700 rounded" }
            }
        },
        View::Error(message) => rsx! {
            div { class: "p-4 border border-red-500/50 bg-red-500/10 rounded",
                h3 { class: "font-bold", "An error occurred" }
                p { "{message}" }
            }
        },
        View::Result(view) => rsx! {
            ResultDetails {
                badge_label: view.badge.label,
                primary: view.badge.variant == BadgeVariant::Primary,
                reason: view.reason.to_string(),
                response: view.response.to_string(),
                is_copied: is_copied,
                analyzed_at: analyzed_at,
                on_copy: on_copy,
            }
        },
    }
}

#[component]
fn ResultDetails(
    badge_label: &'static str,
    primary: bool,
    reason: String,
    response: String,
    is_copied: bool,
    analyzed_at: Option<String>,
    on_copy: EventHandler<()>,
) -> Element {
    let badge_class = if primary {
        "text-lg px-4 py-2 rounded bg-blue-600"
    } else {
        "text-lg px-4 py-2 rounded bg-slate-600"
    };
    rsx! {
        div { class: "flex flex-col gap-6",
            div { class: "flex items-center gap-3",
                span { class: badge_class, "{badge_label}" }
                if let Some(at) = analyzed_at {
                    span { class: "text-sm text-slate-500", "analyzed at {at}" }
                }
            }
            p { class: "text-slate-400", "{reason}" }
            div { class: "p-4 bg-slate-800/50 border border-slate-700 rounded flex flex-col gap-3",
                div { class: "flex items-center justify-between",
                    h3 { class: "text-xl", "Suggested Reply" }
                    button {
                        class: "text-slate-400 hover:text-slate-200",
                        onclick: move |_| on_copy.call(()),
                        if is_copied { "Copied" } else { "Copy" }
                    }
                }
                textarea {
                    class: "min-h-[100px] bg-slate-900 border border-slate-600 rounded p-2",
                    readonly: true,
                    value: "{response}",
                }
            }
        }
    }
}

async fn read_first_file(engine: Arc<dyn FileEngine>) -> Option<SelectedFile> {
    let path = engine.files().into_iter().next()?;
    let bytes = engine.read_file(&path).await?;
    let name = Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(path);
    Some(SelectedFile::from_bytes(name, bytes))
}
