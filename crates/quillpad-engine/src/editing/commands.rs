use super::BlockKind;

/// Edit commands accepted by [`crate::Editor::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Wrap the selection in `tag`, or unwrap it when already inside one
    ToggleInline { tag: String },
    InsertHyperlink { href: String },
    InsertBlock { kind: BlockKind },
    InsertImage { source: String, alt: Option<String> },
    /// Remove every child of the root
    Clear,
}

impl Cmd {
    pub fn bold() -> Self {
        Cmd::ToggleInline {
            tag: "strong".to_string(),
        }
    }

    pub fn italic() -> Self {
        Cmd::ToggleInline {
            tag: "em".to_string(),
        }
    }

    pub fn underline() -> Self {
        Cmd::ToggleInline {
            tag: "u".to_string(),
        }
    }

    pub fn needs_selection(&self) -> bool {
        !matches!(self, Cmd::Clear)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Cmd::ToggleInline { .. } => "toggle-inline",
            Cmd::InsertHyperlink { .. } => "insert-hyperlink",
            Cmd::InsertBlock { .. } => "insert-block",
            Cmd::InsertImage { .. } => "insert-image",
            Cmd::Clear => "clear",
        }
    }
}
