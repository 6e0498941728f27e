use super::SelectionRange;

/// Result of applying a command that changed the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    /// Collapsed caret left behind by the command
    pub new_selection: Option<SelectionRange>,
    /// Document version after the change
    pub version: u64,
}
