use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::client::AnalysisClient;
use crate::clipboard::ClipboardSink;
use crate::controller::{PendingSubmission, RequestState, SubmissionController};
use crate::error::{AnalyzeError, TriageError};
use crate::input::{FileOrigin, InputMode, InputSelector, SelectedFile, Submission};
use crate::presenter::{CopyIndicator, COPY_FEEDBACK_WINDOW};

#[derive(Debug, Default)]
struct SessionState {
    input: InputSelector,
    controller: SubmissionController,
    copy: CopyIndicator,
}

/// Shared handle over one page's worth of state: input, request lifecycle
/// and copy indicator. Clones see the same state.
#[derive(Clone, Default)]
pub struct TriageSession {
    state: Arc<Mutex<SessionState>>,
}

impl TriageSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionState>, TriageError> {
        self.state.lock().map_err(|_| TriageError::StatePoisoned)
    }

    pub fn set_mode(&self, mode: InputMode) -> Result<(), TriageError> {
        self.lock()?.input.set_mode(mode);
        Ok(())
    }

    pub fn set_text(&self, value: impl Into<String>) -> Result<(), TriageError> {
        self.lock()?.input.set_text(value);
        Ok(())
    }

    pub fn select_file(&self, file: SelectedFile, origin: FileOrigin) -> Result<bool, TriageError> {
        Ok(self.lock()?.input.select_file(file, origin))
    }

    pub fn clear_file(&self) -> Result<(), TriageError> {
        self.lock()?.input.clear_file();
        Ok(())
    }

    pub fn drag_enter(&self) -> Result<(), TriageError> {
        self.lock()?.input.drag_enter();
        Ok(())
    }

    pub fn drag_leave(&self) -> Result<(), TriageError> {
        self.lock()?.input.drag_leave();
        Ok(())
    }

    pub fn drop_file(&self, file: Option<SelectedFile>) -> Result<bool, TriageError> {
        Ok(self.lock()?.input.drop_file(file))
    }

    /// Snapshot of the input selector.
    pub fn input(&self) -> Result<InputSelector, TriageError> {
        Ok(self.lock()?.input.clone())
    }

    pub fn request_state(&self) -> Result<RequestState, TriageError> {
        Ok(self.lock()?.controller.state().clone())
    }

    pub fn can_submit(&self) -> Result<bool, TriageError> {
        let state = self.lock()?;
        Ok(state.controller.can_submit(&state.input))
    }

    pub fn is_copied(&self) -> Result<bool, TriageError> {
        Ok(self.lock()?.copy.is_copied())
    }

    pub fn begin(&self) -> Result<PendingSubmission, TriageError> {
        let mut state = self.lock()?;
        let SessionState {
            input, controller, ..
        } = &mut *state;
        Ok(controller.begin(input)?)
    }

    pub fn settle(
        &self,
        id: Uuid,
        outcome: Result<AnalysisResult, AnalyzeError>,
    ) -> Result<bool, TriageError> {
        Ok(self.lock()?.controller.settle(id, outcome))
    }

    /// Like [`begin`](Self::begin), but the returned handle settles the
    /// request as cancelled if it is dropped before [`InFlight::finish`].
    pub fn start(&self) -> Result<InFlight, TriageError> {
        let pending = self.begin()?;
        Ok(InFlight {
            state: Arc::clone(&self.state),
            pending,
            settled: false,
        })
    }

    /// Submit the current input and wait for the outcome. The lock is
    /// released while the request is in flight.
    pub async fn submit(&self, client: &AnalysisClient) -> Result<RequestState, TriageError> {
        let in_flight = self.start()?;
        let outcome = client.analyze(in_flight.payload()).await;
        in_flight.finish(outcome)
    }

    /// Copy the current response and schedule the indicator reset.
    ///
    /// Returns the reset task, or `None` if nothing was copied. Must be
    /// called from within a tokio runtime.
    pub fn copy_response(
        &self,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<Option<JoinHandle<()>>, TriageError> {
        let reset = {
            let mut state = self.lock()?;
            let SessionState {
                controller, copy, ..
            } = &mut *state;
            copy.copy_response(controller.state(), clipboard)
        };
        let Some(reset) = reset else {
            return Ok(None);
        };

        let shared = Arc::clone(&self.state);
        Ok(Some(tokio::spawn(async move {
            tokio::time::sleep(COPY_FEEDBACK_WINDOW).await;
            match shared.lock() {
                Ok(mut state) => {
                    state.copy.expire(reset);
                }
                Err(_) => tracing::error!("session state lock poisoned; copy indicator not reset"),
            }
        })))
    }
}

/// A submission that has left `begin` but not yet settled.
pub struct InFlight {
    state: Arc<Mutex<SessionState>>,
    pending: PendingSubmission,
    settled: bool,
}

impl InFlight {
    pub fn id(&self) -> Uuid {
        self.pending.id
    }

    pub fn payload(&self) -> &Submission {
        &self.pending.payload
    }

    /// Apply the outcome and return the resulting state.
    pub fn finish(
        mut self,
        outcome: Result<AnalysisResult, AnalyzeError>,
    ) -> Result<RequestState, TriageError> {
        self.settled = true;
        let mut state = self.state.lock().map_err(|_| TriageError::StatePoisoned)?;
        state.controller.settle(self.pending.id, outcome);
        Ok(state.controller.state().clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        match self.state.lock() {
            Ok(mut state) => {
                state
                    .controller
                    .settle(self.pending.id, Err(AnalyzeError::Cancelled));
            }
            Err(_) => tracing::error!(id = %self.pending.id, "session state lock poisoned; request left pending"),
        }
    }
}
