use std::time::{Duration, Instant};

use crate::error::TriageError;

/// Write-only access to a clipboard.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), TriageError>;
}

/// The desktop clipboard, via `arboard`.
///
/// On Linux the contents are served by this process, so they disappear once
/// the `SystemClipboard` is dropped unless a clipboard manager picks them up.
/// Short-lived callers should use [`SystemClipboard::holding`].
pub struct SystemClipboard {
    inner: arboard::Clipboard,
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    hold: Option<Duration>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, TriageError> {
        let inner = arboard::Clipboard::new().map_err(|e| TriageError::Clipboard(e.to_string()))?;
        Ok(Self { inner, hold: None })
    }

    /// A clipboard whose writes block until another owner takes the
    /// selection, or `hold` elapses. Only Linux needs this; elsewhere writes
    /// return immediately.
    pub fn holding(hold: Duration) -> Result<Self, TriageError> {
        let mut clipboard = Self::new()?;
        clipboard.hold = Some(hold);
        Ok(clipboard)
    }
}

/// When a blocking write should give up serving the selection.
pub fn hold_deadline(hold: Option<Duration>, now: Instant) -> Option<Instant> {
    hold.and_then(|d| now.checked_add(d))
}

impl ClipboardSink for SystemClipboard {
    #[cfg(target_os = "linux")]
    fn write_text(&mut self, text: &str) -> Result<(), TriageError> {
        use arboard::SetExtLinux;

        let set = self.inner.set();
        let set = match hold_deadline(self.hold, Instant::now()) {
            Some(deadline) => set.wait_until(deadline),
            None => set,
        };
        set.text(text.to_owned())
            .map_err(|e| TriageError::Clipboard(e.to_string()))
    }

    #[cfg(not(target_os = "linux"))]
    fn write_text(&mut self, text: &str) -> Result<(), TriageError> {
        self.inner
            .set_text(text.to_owned())
            .map_err(|e| TriageError::Clipboard(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_only_when_holding() {
        let now = Instant::now();
        assert_eq!(hold_deadline(None, now), None);
        assert_eq!(
            hold_deadline(Some(Duration::from_secs(30)), now),
            Some(now + Duration::from_secs(30))
        );
    }
}
