//! Sync Engine
//!
//! Sequences every operation between the UI, the task store, and the
//! backend. Failures are converted to user-facing status strings at this
//! boundary; an authorization failure from any token-bearing call also
//! invalidates the session. State changes are pushed to the view layer as
//! [`EngineState`] snapshots through an installed listener, including the
//! optimistic apply step of a drag move so the UI renders it instantly.

use std::cell::RefCell;

use crate::api::{ApiClient, ApiError, Transport};
use crate::models::{EditDraft, Profile, Task, TaskStatus};
use crate::session::{Session, TokenStorage};
use crate::sync::edit::EditSession;
use crate::sync::store::TaskStore;

/// Snapshot of everything the view layer renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    pub logged_in: bool,
    pub loading: bool,
    pub tasks: Vec<Task>,
    pub edit: Option<EditDraft>,
}

pub struct SyncEngine<T, S> {
    client: ApiClient<T>,
    session: RefCell<Session<S>>,
    store: RefCell<TaskStore>,
    edit: RefCell<EditSession>,
    listener: RefCell<Option<Box<dyn Fn(EngineState)>>>,
}

impl<T: Transport, S: TokenStorage> SyncEngine<T, S> {
    pub fn new(client: ApiClient<T>, session: Session<S>) -> Self {
        Self {
            client,
            session: RefCell::new(session),
            store: RefCell::new(TaskStore::default()),
            edit: RefCell::new(EditSession::default()),
            listener: RefCell::new(None),
        }
    }

    /// Install the view-layer listener and push the current state to it.
    pub fn set_listener(&self, listener: impl Fn(EngineState) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
        self.emit();
    }

    pub fn state(&self) -> EngineState {
        EngineState {
            logged_in: self.session.borrow().is_logged_in(),
            loading: self.store.borrow().is_loading(),
            tasks: self.store.borrow().tasks().to_vec(),
            edit: self.edit.borrow().draft().cloned(),
        }
    }

    fn emit(&self) {
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(self.state());
        }
    }

    /// Token for an authenticated call, cloned so no borrow is held across
    /// the request.
    fn token(&self) -> Result<String, String> {
        self.session
            .borrow()
            .token()
            .map(str::to_string)
            .ok_or_else(|| "Unauthorized".to_string())
    }

    /// Failure policy: authorization failures invalidate the whole session
    /// (token, tasks, open edit); everything else only surfaces its message.
    fn fail(&self, err: ApiError) -> String {
        if err.is_unauthorized() {
            log::warn!("authorization failure, clearing session");
            self.session.borrow_mut().clear();
            self.store.borrow_mut().clear();
            self.edit.borrow_mut().cancel();
            self.emit();
        }
        err.user_message()
    }

    // ========================
    // Authentication
    // ========================

    pub async fn login(&self, email: &str, password: &str) -> Result<(), String> {
        let response = self
            .client
            .login(email, password)
            .await
            .map_err(|err| self.fail(err))?;
        self.session.borrow_mut().save(response.token);
        self.emit();
        Ok(())
    }

    /// Registration does not log in; the caller switches back to the login
    /// form on success.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), String> {
        self.client
            .register(name, email, password)
            .await
            .map_err(|err| self.fail(err))
    }

    pub fn logout(&self) {
        self.session.borrow_mut().clear();
        self.store.borrow_mut().clear();
        self.edit.borrow_mut().cancel();
        self.emit();
    }

    pub async fn profile(&self) -> Result<Profile, String> {
        let token = self.token()?;
        self.client
            .profile(&token)
            .await
            .map_err(|err| self.fail(err))
    }

    // ========================
    // Tasks
    // ========================

    /// Full refetch. A refresh that resolves after a local mutation is
    /// stale and dropped. An authorization failure empties the collection;
    /// any other failure leaves it untouched.
    pub async fn refresh_tasks(&self) -> Result<(), String> {
        let token = self.token()?;
        let issued_at = {
            let mut store = self.store.borrow_mut();
            store.set_loading(true);
            store.generation()
        };
        self.emit();

        let result = self.client.list_tasks(&token).await;
        self.store.borrow_mut().set_loading(false);
        match result {
            Ok(tasks) => {
                self.store.borrow_mut().accept_refresh(tasks, issued_at);
                self.emit();
                Ok(())
            }
            Err(err) => {
                self.emit();
                Err(self.fail(err))
            }
        }
    }

    /// The server assigns ids, so a successful create is followed by a full
    /// refetch instead of synthesizing the task locally.
    pub async fn create_task(
        &self,
        title: &str,
        content: &str,
        status: TaskStatus,
    ) -> Result<(), String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::validation("Title is required").user_message());
        }
        let token = self.token()?;
        self.client
            .create_task(&token, title, content.trim(), status)
            .await
            .map_err(|err| self.fail(err))?;
        self.refresh_tasks().await
    }

    /// Delete is not optimistic: the task leaves the collection only after
    /// the server confirms.
    pub async fn delete_task(&self, id: i64) -> Result<(), String> {
        let token = self.token()?;
        self.client
            .delete_task(&token, id)
            .await
            .map_err(|err| self.fail(err))?;
        self.store.borrow_mut().remove(id);
        self.emit();
        Ok(())
    }

    /// Optimistic column move: apply locally, confirm remotely, roll back
    /// the full pre-move snapshot on failure. A response that has been
    /// superseded by a later move of the same task is discarded.
    pub async fn move_task(&self, id: i64, status: TaskStatus) -> Result<(), String> {
        let token = self.token()?;
        let (pending, task) = {
            let mut store = self.store.borrow_mut();
            let Some(pending) = store.begin_move(id, status) else {
                return Ok(());
            };
            let Some(task) = store.get(id).cloned() else {
                return Ok(());
            };
            (pending, task)
        };
        self.emit();

        let result = self
            .client
            .update_task(&token, id, &task.title, &task.content, status)
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                if err.is_unauthorized() {
                    return Err(self.fail(err));
                }
                let rolled_back = {
                    let mut store = self.store.borrow_mut();
                    if store.is_current(&pending) {
                        store.rollback(pending);
                        true
                    } else {
                        false
                    }
                };
                if rolled_back {
                    self.emit();
                }
                Err(err.user_message())
            }
        }
    }

    // ========================
    // Inline Editing
    // ========================

    pub fn start_edit(&self, id: i64) {
        let task = self.store.borrow().get(id).cloned();
        if let Some(task) = task {
            self.edit.borrow_mut().start(&task);
            self.emit();
        }
    }

    pub fn cancel_edit(&self) {
        self.edit.borrow_mut().cancel();
        self.emit();
    }

    pub fn set_edit_title(&self, title: String) {
        self.edit.borrow_mut().set_title(title);
        self.emit();
    }

    pub fn set_edit_content(&self, content: String) {
        self.edit.borrow_mut().set_content(content);
        self.emit();
    }

    pub fn set_edit_status(&self, status: TaskStatus) {
        self.edit.borrow_mut().set_status(status);
        self.emit();
    }

    /// Commit the open draft. On failure both the collection and the draft
    /// stay as they were so the user can correct and resubmit.
    pub async fn save_edit(&self) -> Result<(), String> {
        let Some(draft) = self.edit.borrow().draft().cloned() else {
            return Err(ApiError::validation("No task is being edited").user_message());
        };
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::validation("Title is required").user_message());
        }
        let content = draft.content.trim().to_string();
        let token = self.token()?;

        self.client
            .update_task(&token, draft.task_id, &title, &content, draft.status)
            .await
            .map_err(|err| self.fail(err))?;

        self.store
            .borrow_mut()
            .apply_edit(draft.task_id, title, content, draft.status);
        self.edit.borrow_mut().cancel();
        self.emit();
        Ok(())
    }
}
