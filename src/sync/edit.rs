//! Edit Session
//!
//! Single-slot state machine for inline editing: either no task is being
//! edited, or exactly one is, with its draft fields. Starting an edit for
//! another task silently discards the previous draft.

use crate::models::{EditDraft, Task, TaskStatus};

#[derive(Debug, Default, Clone, PartialEq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        draft: EditDraft,
    },
}

impl EditSession {
    pub fn start(&mut self, task: &Task) {
        *self = EditSession::Editing {
            draft: EditDraft::from_task(task),
        };
    }

    pub fn cancel(&mut self) {
        *self = EditSession::Idle;
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing { draft } => Some(draft),
        }
    }

    // Field setters are no-ops when idle (a keystroke racing a cancel).

    pub fn set_title(&mut self, title: String) {
        if let EditSession::Editing { draft } = self {
            draft.title = title;
        }
    }

    pub fn set_content(&mut self, content: String) {
        if let EditSession::Editing { draft } = self {
            draft.content = content;
        }
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        if let EditSession::Editing { draft } = self {
            draft.status = status;
        }
    }
}
