use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ACCEPTED_EXTENSIONS: [&str; 2] = [".txt", ".pdf"];
pub const MAX_FILE_SIZE_HINT: u64 = 10 * 1024 * 1024;

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_PDF: &str = "application/pdf";
pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    Text,
    File,
}

/// Where a file selection came from. Only drops are filtered by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOrigin {
    Picker,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Build a selection from a name and contents, guessing the type from
    /// the extension.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).to_string();
        Self {
            name,
            content_type,
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Advisory only; nothing refuses a large file before submission.
    pub fn exceeds_size_hint(&self) -> bool {
        self.size() > MAX_FILE_SIZE_HINT
    }

    pub fn is_droppable(&self) -> bool {
        self.content_type == TEXT_PLAIN || self.content_type == APPLICATION_PDF
    }
}

pub fn content_type_for(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".txt") {
        TEXT_PLAIN
    } else if lower.ends_with(".pdf") {
        APPLICATION_PDF
    } else {
        OCTET_STREAM
    }
}

/// Payload handed to the analysis client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Text(String),
    File(SelectedFile),
}

impl Submission {
    pub fn mode(&self) -> InputMode {
        match self {
            Submission::Text(_) => InputMode::Text,
            Submission::File(_) => InputMode::File,
        }
    }
}

/// Active input mode plus both payload slots. Switching modes never
/// discards the other slot.
#[derive(Debug, Clone, Default)]
pub struct InputSelector {
    mode: InputMode,
    text: String,
    file: Option<SelectedFile>,
    drag_over: bool,
    picker_generation: u64,
}

impl InputSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        self.text = value.into();
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Store a file selection. Returns whether it was accepted.
    pub fn select_file(&mut self, file: SelectedFile, origin: FileOrigin) -> bool {
        if origin == FileOrigin::Drop && !file.is_droppable() {
            tracing::debug!(
                name = %file.name,
                content_type = %file.content_type,
                "ignoring dropped file of unsupported type"
            );
            return false;
        }
        self.file = Some(file);
        true
    }

    pub fn clear_file(&mut self) {
        self.file = None;
        // New generation means a fresh picker control, so the same file can
        // be chosen again.
        self.picker_generation = self.picker_generation.wrapping_add(1);
    }

    pub fn picker_generation(&self) -> u64 {
        self.picker_generation
    }

    pub fn drag_enter(&mut self) {
        self.drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    /// Complete a drop gesture. Only the first file counts.
    pub fn drop_file(&mut self, file: Option<SelectedFile>) -> bool {
        self.drag_over = false;
        match file {
            Some(file) => self.select_file(file, FileOrigin::Drop),
            None => false,
        }
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    pub fn has_input(&self) -> bool {
        match self.mode {
            InputMode::Text => !self.text.trim().is_empty(),
            InputMode::File => self.file.is_some(),
        }
    }

    /// Payload for the active mode, or `None` if that mode has nothing to send.
    pub fn build_submission(&self) -> Option<Submission> {
        match (self.mode, &self.file) {
            (InputMode::File, Some(file)) => Some(Submission::File(file.clone())),
            (InputMode::Text, _) if !self.text.trim().is_empty() => {
                Some(Submission::Text(self.text.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> SelectedFile {
        SelectedFile::new("mail.pdf", APPLICATION_PDF, b"%PDF-1.4".to_vec())
    }

    #[test]
    fn whitespace_text_is_not_ready() {
        let mut input = InputSelector::new();
        for blank in ["", " ", "\n\t ", "\r\n"] {
            input.set_text(blank);
            assert!(!input.has_input(), "{blank:?} should not be submittable");
        }
    }

    #[test]
    fn text_is_stored_verbatim() {
        let mut input = InputSelector::new();
        input.set_text("  hello  ");
        assert_eq!(input.text(), "  hello  ");
        assert_eq!(
            input.build_submission(),
            Some(Submission::Text("  hello  ".into()))
        );
    }

    #[test]
    fn switching_mode_keeps_both_slots() {
        let mut input = InputSelector::new();
        input.set_text("hi");
        input.select_file(pdf(), FileOrigin::Picker);
        input.set_mode(InputMode::File);
        assert_eq!(input.text(), "hi");
        input.set_mode(InputMode::Text);
        assert_eq!(input.file(), Some(&pdf()));
    }

    #[test]
    fn drop_filters_by_content_type() {
        let mut input = InputSelector::new();
        input.drag_enter();
        assert!(input.is_drag_over());
        let image = SelectedFile::new("photo.png", "image/png", vec![1, 2, 3]);
        assert!(!input.drop_file(Some(image.clone())));
        assert!(!input.is_drag_over());
        assert!(input.file().is_none());

        assert!(input.drop_file(Some(pdf())));
        assert!(!input.drop_file(Some(image)));
        assert_eq!(input.file(), Some(&pdf()));
    }

    #[test]
    fn drag_leave_clears_flag_without_touching_payload() {
        let mut input = InputSelector::new();
        input.select_file(pdf(), FileOrigin::Picker);
        input.drag_enter();
        assert!(input.is_drag_over());
        input.drag_leave();
        assert!(!input.is_drag_over());
        assert_eq!(input.file(), Some(&pdf()));
    }

    #[test]
    fn picker_accepts_any_type() {
        let mut input = InputSelector::new();
        let docx = SelectedFile::from_bytes("notes.docx", vec![0]);
        assert_eq!(docx.content_type, OCTET_STREAM);
        assert!(input.select_file(docx, FileOrigin::Picker));
    }

    #[test]
    fn clear_file_bumps_picker_generation() {
        let mut input = InputSelector::new();
        input.set_mode(InputMode::File);
        input.select_file(pdf(), FileOrigin::Picker);
        let before = input.picker_generation();
        input.clear_file();
        assert!(input.file().is_none());
        assert!(!input.has_input());
        assert_ne!(input.picker_generation(), before);
        assert!(input.select_file(pdf(), FileOrigin::Picker));
        assert!(input.has_input());
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for("a.TXT"), TEXT_PLAIN);
        assert_eq!(content_type_for("b.pdf"), APPLICATION_PDF);
        assert_eq!(content_type_for("c"), OCTET_STREAM);
    }

    #[test]
    fn size_hint_is_advisory() {
        let big = SelectedFile::from_bytes("big.txt", vec![b'a'; (MAX_FILE_SIZE_HINT + 1) as usize]);
        assert!(big.exceeds_size_hint());
        let mut input = InputSelector::new();
        input.set_mode(InputMode::File);
        assert!(input.select_file(big, FileOrigin::Picker));
        assert!(input.build_submission().is_some());
    }
}
