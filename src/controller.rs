use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::client::AnalysisClient;
use crate::error::AnalyzeError;
use crate::input::{InputSelector, Submission};

/// Lifecycle of the current submission. Result and error live inside the
/// variants, so a pending request can never show stale data.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Pending {
        id: Uuid,
    },
    Succeeded {
        result: AnalysisResult,
    },
    Failed {
        error: String,
    },
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending { .. })
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            RequestState::Succeeded { result } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed { error } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("a request is already in flight")]
    Busy,
    #[error("nothing to submit")]
    Validation,
}

/// An accepted submission waiting for its response.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub id: Uuid,
    pub payload: Submission,
}

/// Owns the request lifecycle and the single in-flight token.
#[derive(Debug, Clone, Default)]
pub struct SubmissionController {
    state: RequestState,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn can_submit(&self, input: &InputSelector) -> bool {
        input.has_input() && !self.is_pending()
    }

    /// Take the in-flight token and move to PENDING.
    ///
    /// A second call while pending is refused without touching state. An
    /// empty input ends in FAILED with no request issued.
    pub fn begin(&mut self, input: &InputSelector) -> Result<PendingSubmission, SubmitRejected> {
        if self.is_pending() {
            return Err(SubmitRejected::Busy);
        }

        let id = Uuid::new_v4();
        self.state = RequestState::Pending { id };

        let Some(payload) = input.build_submission() else {
            tracing::warn!(%id, mode = ?input.mode(), "submission has no input");
            self.state = RequestState::Failed {
                error: AnalyzeError::Validation.user_message(),
            };
            return Err(SubmitRejected::Validation);
        };

        tracing::info!(%id, mode = ?payload.mode(), "submission started");
        Ok(PendingSubmission { id, payload })
    }

    /// Apply the outcome of the request identified by `id`. Returns false
    /// when `id` is not the request in flight.
    pub fn settle(&mut self, id: Uuid, outcome: Result<AnalysisResult, AnalyzeError>) -> bool {
        match self.state {
            RequestState::Pending { id: current } if current == id => {}
            _ => {
                tracing::warn!(%id, "ignoring outcome for a request that is not in flight");
                return false;
            }
        }

        self.state = match outcome {
            Ok(result) => {
                tracing::info!(%id, category = result.category.wire_name(), "analysis succeeded");
                RequestState::Succeeded { result }
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "analysis failed");
                RequestState::Failed {
                    error: err.user_message(),
                }
            }
        };
        true
    }

    /// Run one full submission against `client`. Dropping the returned
    /// future mid-request still leaves the controller settled.
    pub async fn submit(
        &mut self,
        input: &InputSelector,
        client: &AnalysisClient,
    ) -> Result<&RequestState, SubmitRejected> {
        let pending = self.begin(input)?;
        let guard = SettleOnDrop {
            controller: &mut *self,
            id: pending.id,
            settled: false,
        };
        let outcome = client.analyze(&pending.payload).await;
        guard.finish(outcome);
        Ok(&self.state)
    }
}

/// Settles the in-flight request as cancelled unless `finish` ran first.
struct SettleOnDrop<'a> {
    controller: &'a mut SubmissionController,
    id: Uuid,
    settled: bool,
}

impl SettleOnDrop<'_> {
    fn finish(mut self, outcome: Result<AnalysisResult, AnalyzeError>) {
        self.controller.settle(self.id, outcome);
        self.settled = true;
    }
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.settle(self.id, Err(AnalyzeError::Cancelled));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Category;
    use crate::input::{FileOrigin, InputMode, SelectedFile};

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            category: Category::Productive,
            reason: "x".into(),
            response: "y".into(),
        }
    }

    fn text_input(text: &str) -> InputSelector {
        let mut input = InputSelector::new();
        input.set_text(text);
        input
    }

    #[test]
    fn can_submit_follows_mode() {
        let controller = SubmissionController::new();
        let mut input = text_input("hello");
        assert!(controller.can_submit(&input));

        input.set_mode(InputMode::File);
        assert!(!controller.can_submit(&input));
        input.select_file(
            SelectedFile::new("a.txt", "text/plain", b"hi".to_vec()),
            FileOrigin::Picker,
        );
        input.set_text("");
        assert!(controller.can_submit(&input));

        input.set_mode(InputMode::Text);
        assert!(!controller.can_submit(&input));
        assert!(input.file().is_some());
    }

    #[test]
    fn begin_while_pending_is_busy() {
        let mut controller = SubmissionController::new();
        let input = text_input("hello");
        let pending = controller.begin(&input).unwrap();
        assert!(!controller.can_submit(&input));
        assert_eq!(controller.begin(&input).unwrap_err(), SubmitRejected::Busy);
        assert_eq!(controller.state(), &RequestState::Pending { id: pending.id });
    }

    #[test]
    fn begin_without_input_fails_locally() {
        let mut controller = SubmissionController::new();
        let input = text_input("   ");
        assert_eq!(
            controller.begin(&input).unwrap_err(),
            SubmitRejected::Validation
        );
        assert_eq!(
            controller.state().error(),
            Some(crate::error::VALIDATION_MESSAGE)
        );
        assert!(!controller.is_pending());
    }

    #[test]
    fn new_submission_clears_previous_outcome() {
        let mut controller = SubmissionController::new();
        let input = text_input("hello");

        let first = controller.begin(&input).unwrap();
        controller.settle(first.id, Err(AnalyzeError::Transport("down".into())));
        assert_eq!(controller.state().error(), Some("down"));

        let second = controller.begin(&input).unwrap();
        assert!(controller.state().error().is_none());
        assert!(controller.state().result().is_none());

        assert!(controller.settle(second.id, Ok(sample_result())));
        assert_eq!(controller.state().result(), Some(&sample_result()));
        assert!(controller.state().error().is_none());
    }

    #[test]
    fn stale_settle_is_ignored() {
        let mut controller = SubmissionController::new();
        let input = text_input("hello");
        let pending = controller.begin(&input).unwrap();
        assert!(!controller.settle(Uuid::new_v4(), Ok(sample_result())));
        assert!(controller.is_pending());

        assert!(controller.settle(pending.id, Ok(sample_result())));
        assert!(!controller.settle(pending.id, Ok(sample_result())));
    }

    #[test]
    fn file_mode_takes_precedence_over_text() {
        let mut controller = SubmissionController::new();
        let mut input = text_input("body text");
        let file = SelectedFile::new("mail.txt", "text/plain", b"file body".to_vec());
        input.select_file(file.clone(), FileOrigin::Picker);
        input.set_mode(InputMode::File);
        let pending = controller.begin(&input).unwrap();
        assert_eq!(pending.payload, Submission::File(file));
    }
}
