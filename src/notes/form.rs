use super::record::UpsertStatus;
use super::service::{Clock, NoteService};
use crate::storage::notes::NoteStorage;

/// Whether a form creates a new note or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// What happened when a form was submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Saved,
    /// Create mode with blank content
    NothingToSave,
    /// Edit mode with blank content; ask before deleting the note
    ConfirmDelete { id: i64 },
    Failed,
}

/// Input state for creating or editing a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertForm {
    pub mode: FormMode,
    pub note_id: Option<i64>,
    pub title: String,
    pub content: String,
}

impl UpsertForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            note_id: None,
            title: String::new(),
            content: String::new(),
        }
    }

    pub fn edit(id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            mode: FormMode::Edit,
            note_id: Some(id),
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn window_title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "New Note",
            FormMode::Edit => "Edit Note",
        }
    }

    pub fn save_label(&self) -> &'static str {
        "Save"
    }

    pub fn dismiss_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Discard",
            FormMode::Edit => "Close",
        }
    }

    pub fn submit<S: NoteStorage, C: Clock>(&self, service: &mut NoteService<S, C>) -> FormOutcome {
        let status = match (self.mode, self.note_id) {
            (FormMode::Create, _) => service.create_note(&self.title, &self.content),
            (FormMode::Edit, Some(id)) => service.edit_note(id, &self.title, &self.content),
            (FormMode::Edit, None) => return FormOutcome::Failed,
        };

        match (status, self.mode, self.note_id) {
            (UpsertStatus::Success, _, _) => FormOutcome::Saved,
            (UpsertStatus::Failed, _, _) => FormOutcome::Failed,
            (UpsertStatus::NoContent, FormMode::Edit, Some(id)) => FormOutcome::ConfirmDelete { id },
            (UpsertStatus::NoContent, _, _) => FormOutcome::NothingToSave,
        }
    }

    /// Delete the edited note; create forms have nothing to delete
    pub fn delete<S: NoteStorage, C: Clock>(&self, service: &mut NoteService<S, C>) -> UpsertStatus {
        match (self.mode, self.note_id) {
            (FormMode::Edit, Some(id)) => service.delete_note(id),
            _ => UpsertStatus::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::service::tests::{MemoryStorage, StepClock};
    use std::cell::Cell;

    fn service() -> NoteService<MemoryStorage, StepClock> {
        NoteService::with_clock(MemoryStorage::default(), StepClock(Cell::new(0)))
    }

    #[test]
    fn test_labels_follow_mode() {
        let create = UpsertForm::create();
        assert_eq!(create.window_title(), "New Note");
        assert_eq!(create.dismiss_label(), "Discard");

        let edit = UpsertForm::edit(1, "t", "c");
        assert_eq!(edit.window_title(), "Edit Note");
        assert_eq!(edit.dismiss_label(), "Close");
        assert_eq!(edit.save_label(), "Save");
    }

    #[test]
    fn test_create_then_edit() {
        let mut service = service();
        let mut form = UpsertForm::create();
        form.title = "Budget".to_string();
        form.content = "groceries".to_string();
        assert_eq!(form.submit(&mut service), FormOutcome::Saved);

        let id = service.search("").unwrap()[0].note.id();
        let edit = UpsertForm::edit(id, "Budget", "groceries and rent");
        assert_eq!(edit.submit(&mut service), FormOutcome::Saved);
        assert_eq!(service.note(id).unwrap().content(), "groceries and rent");
    }

    #[test]
    fn test_blank_content_outcomes() {
        let mut service = service();
        assert_eq!(UpsertForm::create().submit(&mut service), FormOutcome::NothingToSave);

        service.create_note("Budget", "groceries");
        let edit = UpsertForm::edit(1, "Budget", "  ");
        assert_eq!(edit.submit(&mut service), FormOutcome::ConfirmDelete { id: 1 });
        assert_eq!(edit.delete(&mut service), UpsertStatus::Success);
        assert!(service.note(1).is_none());
    }

    #[test]
    fn test_create_form_cannot_delete() {
        let mut service = service();
        assert_eq!(UpsertForm::create().delete(&mut service), UpsertStatus::Failed);
    }
}
