/// A title proposed by finishing an edit, with the value to fall back to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleChange {
    pub previous: String,
    pub proposed: String,
}

/// Edit-in-place room title.
///
/// While editing, the draft is what is displayed. Finishing an edit shows the proposed
/// title right away; [`TitleEditor::revert`] restores the last known-good one if the
/// change is later rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TitleEditor {
    title: String,
    draft: Option<String>,
}

impl TitleEditor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            draft: None,
        }
    }

    /// Text currently shown: the draft while editing, else the title.
    pub fn displayed(&self) -> &str {
        self.draft.as_deref().unwrap_or(&self.title)
    }

    /// Last committed title.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Start editing from the current title. No-op while already editing.
    pub fn begin_edit(&mut self) {
        if self.draft.is_none() {
            self.draft = Some(self.title.clone());
        }
    }

    /// Replace the draft; starts an edit if none is open.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = Some(text.into());
    }

    /// Abandon the draft.
    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    /// Close the edit and adopt the trimmed draft.
    ///
    /// Returns `None` when no edit was open or the title did not change.
    pub fn finish_edit(&mut self) -> Option<TitleChange> {
        let draft = self.draft.take()?;
        let proposed = draft.trim().to_string();
        if proposed == self.title {
            return None;
        }
        let previous = std::mem::replace(&mut self.title, proposed.clone());
        Some(TitleChange { previous, proposed })
    }

    /// Undo `change` if it is still the displayed title.
    pub fn revert(&mut self, change: TitleChange) {
        if self.title == change.proposed {
            self.title = change.previous;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/screen/title.rs"]
mod tests;
