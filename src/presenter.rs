use std::time::Duration;

use crate::analysis::{AnalysisResult, Category};
use crate::clipboard::ClipboardSink;
use crate::controller::RequestState;

/// How long the "copied" indicator stays on after a successful copy.
pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub variant: BadgeVariant,
}

impl From<Category> for Badge {
    fn from(category: Category) -> Self {
        let variant = match category {
            Category::Productive => BadgeVariant::Primary,
            Category::Unproductive => BadgeVariant::Secondary,
        };
        Badge {
            label: category.wire_name(),
            variant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultView<'a> {
    pub badge: Badge,
    pub reason: &'a str,
    pub response: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    Empty,
    Loading,
    Error(&'a str),
    Result(ResultView<'a>),
}

pub fn present(state: &RequestState) -> View<'_> {
    match state {
        RequestState::Idle => View::Empty,
        RequestState::Pending { .. } => View::Loading,
        RequestState::Failed { error } => View::Error(error),
        RequestState::Succeeded { result } => View::Result(result_view(result)),
    }
}

fn result_view(result: &AnalysisResult) -> ResultView<'_> {
    ResultView {
        badge: result.category.into(),
        reason: &result.reason,
        response: &result.response,
    }
}

/// Handle for one scheduled reset of the copy indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyReset {
    generation: u64,
}

/// "Copied" flag with latest-wins expiry: a reset only clears the flag if no
/// newer copy happened since it was scheduled.
#[derive(Debug, Clone, Default)]
pub struct CopyIndicator {
    copied: bool,
    generation: u64,
}

impl CopyIndicator {
    pub fn is_copied(&self) -> bool {
        self.copied
    }

    pub fn mark_copied(&mut self) -> CopyReset {
        self.generation = self.generation.wrapping_add(1);
        self.copied = true;
        CopyReset {
            generation: self.generation,
        }
    }

    pub fn expire(&mut self, reset: CopyReset) -> bool {
        if reset.generation != self.generation {
            return false;
        }
        self.copied = false;
        true
    }

    /// Copy the current response, if any. Clipboard failures are logged and
    /// otherwise ignored.
    pub fn copy_response(
        &mut self,
        state: &RequestState,
        clipboard: &mut dyn ClipboardSink,
    ) -> Option<CopyReset> {
        let response = state.result().map(|r| r.response.as_str())?;
        if response.is_empty() {
            return None;
        }
        match clipboard.write_text(response) {
            Ok(()) => Some(self.mark_copied()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to copy response");
                None
            }
        }
    }
}
