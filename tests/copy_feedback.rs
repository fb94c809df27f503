use std::time::Duration;
use triage_core::clipboard::ClipboardSink;
use triage_core::presenter::COPY_FEEDBACK_WINDOW;
use triage_core::{AnalysisResult, AnalyzeError, Category, TriageError, TriageSession};

#[derive(Default)]
struct FakeClipboard {
    contents: Option<String>,
    deny: bool,
}

impl ClipboardSink for FakeClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), TriageError> {
        if self.deny {
            return Err(TriageError::Clipboard("permission denied".into()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

fn session_with_result() -> TriageSession {
    let session = TriageSession::new();
    session.set_text("hello").unwrap();
    let pending = session.begin().unwrap();
    let result = AnalysisResult {
        category: Category::Productive,
        reason: "asks for status".into(),
        response: "Hi, here is the update.".into(),
    };
    session.settle(pending.id, Ok(result)).unwrap();
    session
}

#[tokio::test(start_paused = true)]
async fn copied_flag_resets_after_window() {
    let session = session_with_result();
    let mut clipboard = FakeClipboard::default();

    let reset = session.copy_response(&mut clipboard).unwrap();
    assert!(reset.is_some());
    assert!(session.is_copied().unwrap());
    assert_eq!(clipboard.contents.as_deref(), Some("Hi, here is the update."));

    tokio::time::sleep(COPY_FEEDBACK_WINDOW - Duration::from_millis(1)).await;
    assert!(session.is_copied().unwrap());

    reset.unwrap().await.unwrap();
    assert!(!session.is_copied().unwrap());
}

#[tokio::test(start_paused = true)]
async fn later_copy_extends_the_window() {
    let session = session_with_result();
    let mut clipboard = FakeClipboard::default();

    let first = session.copy_response(&mut clipboard).unwrap().unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let second = session.copy_response(&mut clipboard).unwrap().unwrap();

    first.await.unwrap();
    assert!(session.is_copied().unwrap());

    second.await.unwrap();
    assert!(!session.is_copied().unwrap());
}

#[tokio::test]
async fn denied_clipboard_is_silent() {
    let session = session_with_result();
    let mut clipboard = FakeClipboard {
        deny: true,
        ..Default::default()
    };
    assert!(session.copy_response(&mut clipboard).unwrap().is_none());
    assert!(!session.is_copied().unwrap());
    assert!(session.request_state().unwrap().error().is_none());
}

#[tokio::test]
async fn nothing_to_copy_after_failure() {
    let session = TriageSession::new();
    session.set_text("hello").unwrap();
    let pending = session.begin().unwrap();
    session
        .settle(pending.id, Err(AnalyzeError::Transport("offline".into())))
        .unwrap();

    let mut clipboard = FakeClipboard::default();
    assert!(session.copy_response(&mut clipboard).unwrap().is_none());
    assert!(clipboard.contents.is_none());
}
