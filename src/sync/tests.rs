//! Sync Engine Tests
//!
//! Engine and fallback-loop behavior against a scripted in-memory transport.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::{json, Value};

    use crate::api::{ApiClient, ApiError, ApiRequest, Method, Transport};
    use crate::models::TaskStatus;
    use crate::session::{MemoryTokenStorage, Session};
    use crate::sync::engine::{EngineState, SyncEngine};

    /// Scripted transport: a routing closure decides each response, and
    /// every request is recorded for assertions.
    #[derive(Clone)]
    struct FakeTransport {
        handler: Rc<dyn Fn(&ApiRequest) -> Result<Value, ApiError>>,
        calls: Rc<RefCell<Vec<ApiRequest>>>,
    }

    impl FakeTransport {
        fn new(handler: impl Fn(&ApiRequest) -> Result<Value, ApiError> + 'static) -> Self {
            Self {
                handler: Rc::new(handler),
                calls: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn calls(&self) -> Vec<ApiRequest> {
            self.calls.borrow().clone()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Transport for FakeTransport {
        async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError> {
            self.calls.borrow_mut().push(request.clone());
            (self.handler)(request)
        }
    }

    fn bases(list: &[&str]) -> Vec<String> {
        list.iter().map(|b| b.to_string()).collect()
    }

    fn seeded_tasks() -> Value {
        json!([
            {"id": 5, "title": "Fix login", "content": "repro attached", "status": "todo"},
            {"id": 6, "title": "Write changelog", "content": "", "status": "done"}
        ])
    }

    /// Engine wired to a single reachable origin whose task routes behave:
    /// GET /tasks serves the seed, PUT and DELETE succeed.
    fn engine_with(
        transport: FakeTransport,
        storage: MemoryTokenStorage,
    ) -> SyncEngine<FakeTransport, MemoryTokenStorage> {
        SyncEngine::new(
            ApiClient::new(bases(&["http://api:1"]), transport),
            Session::restore(storage),
        )
    }

    fn happy_backend(request: &ApiRequest) -> Result<Value, ApiError> {
        match (request.method, request.url.as_str()) {
            (Method::Get, "http://api:1/tasks") => Ok(seeded_tasks()),
            (Method::Post, "http://api:1/tasks") => Ok(json!({"message": "Task created successfully!"})),
            (Method::Put, _) => Ok(json!({"message": "Task updated successfully"})),
            (Method::Delete, _) => Ok(json!({"message": "Task deleted successfully!"})),
            _ => Err(ApiError::application(404, Some("Task not found".into()))),
        }
    }

    // ========================
    // Fallback loop
    // ========================

    #[tokio::test]
    async fn fallback_reaches_the_second_origin() {
        let transport = FakeTransport::new(|request| {
            if request.url.starts_with("http://bad:9") {
                Err(ApiError::connectivity(&request.url))
            } else {
                Ok(json!({"message": "Login successful", "token": "abc"}))
            }
        });
        let client = ApiClient::new(bases(&["http://bad:9", "http://good:1"]), transport.clone());

        let response = client.login("a@b.c", "hunter2").await.expect("login");
        assert_eq!(response.token, "abc");

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].url, "http://bad:9/login");
        assert_eq!(calls[1].url, "http://good:1/login");
    }

    #[tokio::test]
    async fn all_origins_unreachable_raises_the_last_connectivity_failure() {
        let transport = FakeTransport::new(|request| Err(ApiError::connectivity(&request.url)));
        let client = ApiClient::new(bases(&["http://bad1:9", "http://bad2:9"]), transport.clone());

        let err = client
            .execute("/tasks", Method::Get, None, Some("abc"))
            .await
            .expect_err("unreachable");
        assert!(err.is_connectivity());
        assert!(err.user_message().contains("http://bad2:9/tasks"));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn application_error_from_a_reachable_origin_ends_the_probe() {
        let transport = FakeTransport::new(|_| {
            Err(ApiError::application(400, Some("Title is required".into())))
        });
        let client = ApiClient::new(bases(&["http://api:1", "http://never:2"]), transport.clone());

        let err = client
            .execute("/tasks", Method::Post, Some("{}".into()), Some("abc"))
            .await
            .expect_err("validation");
        assert_eq!(err.user_message(), "Title is required");
        assert_eq!(transport.calls().len(), 1);
    }

    // ========================
    // Session lifecycle
    // ========================

    #[tokio::test]
    async fn login_over_fallback_persists_the_token() {
        let transport = FakeTransport::new(|request| {
            if request.url.starts_with("http://bad:9") {
                Err(ApiError::connectivity(&request.url))
            } else {
                Ok(json!({"message": "Login successful", "token": "abc"}))
            }
        });
        let storage = MemoryTokenStorage::default();
        let engine = SyncEngine::new(
            ApiClient::new(bases(&["http://bad:9", "http://good:1"]), transport),
            Session::restore(storage.clone()),
        );

        engine.login("a@b.c", "hunter2").await.expect("login");

        assert!(engine.state().logged_in);
        assert_eq!(storage.persisted(), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn unauthorized_refresh_logs_out_and_empties_the_board() {
        let transport = FakeTransport::new(|_| {
            Err(ApiError::application(401, Some("Unauthorized".into())))
        });
        let storage = MemoryTokenStorage::with_token("stale");
        let engine = engine_with(transport, storage.clone());

        let err = engine.refresh_tasks().await.expect_err("unauthorized");
        assert_eq!(err, "Unauthorized");

        let state = engine.state();
        assert!(!state.logged_in);
        assert!(state.tasks.is_empty());
        assert_eq!(storage.persisted(), None);
    }

    #[tokio::test]
    async fn unauthorized_from_a_move_also_clears_the_session() {
        let transport = FakeTransport::new(|request| match request.method {
            Method::Get => Ok(seeded_tasks()),
            _ => Err(ApiError::application(401, Some("Unauthorized".into()))),
        });
        let storage = MemoryTokenStorage::with_token("stale");
        let engine = engine_with(transport, storage.clone());
        engine.refresh_tasks().await.expect("seed");

        engine
            .move_task(5, TaskStatus::Done)
            .await
            .expect_err("unauthorized");

        assert!(!engine.state().logged_in);
        assert_eq!(storage.persisted(), None);
    }

    #[tokio::test]
    async fn logout_clears_token_tasks_and_edit_state() {
        let transport = FakeTransport::new(happy_backend);
        let storage = MemoryTokenStorage::with_token("abc");
        let engine = engine_with(transport, storage.clone());
        engine.refresh_tasks().await.expect("seed");
        engine.start_edit(5);

        engine.logout();

        let state = engine.state();
        assert!(!state.logged_in);
        assert!(state.tasks.is_empty());
        assert!(state.edit.is_none());
        assert_eq!(storage.persisted(), None);
    }

    // ========================
    // Create / delete
    // ========================

    #[tokio::test]
    async fn whitespace_title_is_rejected_without_a_network_call() {
        let transport = FakeTransport::new(happy_backend);
        let engine = engine_with(transport.clone(), MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");
        let before = engine.state().tasks;
        let calls_before = transport.calls().len();

        let err = engine
            .create_task("   ", "body", TaskStatus::Todo)
            .await
            .expect_err("validation");

        assert_eq!(err, "Title is required");
        assert_eq!(transport.calls().len(), calls_before);
        assert_eq!(engine.state().tasks, before);
    }

    #[tokio::test]
    async fn create_success_refetches_the_whole_list() {
        let transport = FakeTransport::new(happy_backend);
        let engine = engine_with(transport.clone(), MemoryTokenStorage::with_token("abc"));

        engine
            .create_task("  Fix login  ", " repro attached ", TaskStatus::Todo)
            .await
            .expect("create");

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, Method::Post);
        assert_eq!(
            calls[0].body.as_deref(),
            Some(r#"{"title":"Fix login","content":"repro attached","status":"todo"}"#)
        );
        assert_eq!(calls[1].method, Method::Get);
        assert_eq!(engine.state().tasks.len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_the_task_only_after_confirmation() {
        let transport = FakeTransport::new(happy_backend);
        let engine = engine_with(transport, MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");

        engine.delete_task(5).await.expect("delete");

        let ids: Vec<i64> = engine.state().tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![6]);
    }

    #[tokio::test]
    async fn failed_delete_leaves_the_collection_untouched() {
        let transport = FakeTransport::new(|request| match request.method {
            Method::Get => Ok(seeded_tasks()),
            _ => Err(ApiError::application(404, Some("Task not found".into()))),
        });
        let engine = engine_with(transport, MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");

        let err = engine.delete_task(5).await.expect_err("delete");
        assert_eq!(err, "Task not found");
        assert_eq!(engine.state().tasks.len(), 2);
    }

    // ========================
    // Optimistic move
    // ========================

    #[tokio::test]
    async fn move_to_the_current_status_is_a_noop() {
        let transport = FakeTransport::new(happy_backend);
        let engine = engine_with(transport.clone(), MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");
        let calls_before = transport.calls().len();

        engine.move_task(5, TaskStatus::Todo).await.expect("noop");

        assert_eq!(transport.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn confirmed_move_keeps_the_optimistic_status() {
        let transport = FakeTransport::new(happy_backend);
        let engine = engine_with(transport.clone(), MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");

        engine.move_task(5, TaskStatus::InProgress).await.expect("move");

        let state = engine.state();
        let task = state.tasks.iter().find(|t| t.id == 5).expect("task 5");
        assert_eq!(task.status, TaskStatus::InProgress);

        // The moved task's existing title and content ride along with the
        // new status.
        let put = transport
            .calls()
            .into_iter()
            .find(|c| c.method == Method::Put)
            .expect("put call");
        assert_eq!(put.url, "http://api:1/tasks/5");
        assert_eq!(
            put.body.as_deref(),
            Some(r#"{"title":"Fix login","content":"repro attached","status":"in_progress"}"#)
        );
    }

    #[tokio::test]
    async fn failed_move_rolls_back_to_the_pre_move_collection() {
        let transport = FakeTransport::new(|request| match request.method {
            Method::Get => Ok(seeded_tasks()),
            _ => Err(ApiError::application(500, Some("server busy".into()))),
        });
        let engine = engine_with(transport, MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");
        let before = engine.state().tasks;

        let err = engine.move_task(5, TaskStatus::Done).await.expect_err("move");

        assert_eq!(err, "server busy");
        assert_eq!(engine.state().tasks, before);
    }

    #[tokio::test]
    async fn listener_sees_the_move_before_the_server_answers() {
        let transport = FakeTransport::new(|request| match request.method {
            Method::Get => Ok(seeded_tasks()),
            _ => Err(ApiError::application(500, Some("server busy".into()))),
        });
        let engine = engine_with(transport, MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");

        let states: Rc<RefCell<Vec<EngineState>>> = Rc::default();
        let sink = Rc::clone(&states);
        engine.set_listener(move |state| sink.borrow_mut().push(state));

        let _ = engine.move_task(5, TaskStatus::Done).await;

        let status_of_5 = |state: &EngineState| {
            state.tasks.iter().find(|t| t.id == 5).map(|t| t.status)
        };
        let seen: Vec<_> = states.borrow().iter().map(status_of_5).collect();
        // install snapshot, optimistic apply, rollback
        assert_eq!(
            seen,
            vec![
                Some(TaskStatus::Todo),
                Some(TaskStatus::Done),
                Some(TaskStatus::Todo)
            ]
        );
    }

    // ========================
    // Inline editing
    // ========================

    #[tokio::test]
    async fn save_edit_patches_in_place_and_returns_to_idle() {
        let transport = FakeTransport::new(happy_backend);
        let engine = engine_with(transport.clone(), MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");
        let calls_before = transport.calls().len();

        engine.start_edit(5);
        engine.set_edit_title("Fix login flow".to_string());
        engine.set_edit_status(TaskStatus::InProgress);
        engine.save_edit().await.expect("update");

        let state = engine.state();
        assert!(state.edit.is_none());
        let task = state.tasks.iter().find(|t| t.id == 5).expect("task 5");
        assert_eq!(task.title, "Fix login flow");
        assert_eq!(task.status, TaskStatus::InProgress);
        // One PUT, no refetch.
        assert_eq!(transport.calls().len(), calls_before + 1);
    }

    #[tokio::test]
    async fn failed_save_keeps_the_draft_for_a_retry() {
        let transport = FakeTransport::new(|request| match request.method {
            Method::Get => Ok(seeded_tasks()),
            _ => Err(ApiError::application(500, Some("server busy".into()))),
        });
        let engine = engine_with(transport, MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");

        engine.start_edit(5);
        engine.set_edit_title("Fix login flow".to_string());
        let err = engine.save_edit().await.expect_err("update");

        assert_eq!(err, "server busy");
        let state = engine.state();
        let draft = state.edit.expect("still editing");
        assert_eq!(draft.task_id, 5);
        assert_eq!(draft.title, "Fix login flow");
        let task = state.tasks.iter().find(|t| t.id == 5).expect("task 5");
        assert_eq!(task.title, "Fix login");
    }

    #[tokio::test]
    async fn save_edit_rejects_blank_title_and_idle_state_locally() {
        let transport = FakeTransport::new(happy_backend);
        let engine = engine_with(transport.clone(), MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");
        let calls_before = transport.calls().len();

        let err = engine.save_edit().await.expect_err("idle");
        assert_eq!(err, "No task is being edited");

        engine.start_edit(5);
        engine.set_edit_title("   ".to_string());
        let err = engine.save_edit().await.expect_err("blank");
        assert_eq!(err, "Title is required");
        assert!(engine.state().edit.is_some());

        assert_eq!(transport.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn starting_an_edit_for_another_task_swaps_the_draft() {
        let transport = FakeTransport::new(happy_backend);
        let engine = engine_with(transport, MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");

        engine.start_edit(5);
        engine.set_edit_title("unsaved".to_string());
        engine.start_edit(6);

        let draft = engine.state().edit.expect("draft");
        assert_eq!(draft.task_id, 6);
        assert_eq!(draft.title, "Write changelog");
    }

    // ========================
    // Refresh semantics
    // ========================

    #[tokio::test]
    async fn null_task_body_is_an_empty_list() {
        // The backend answers `null` for a user with no tasks.
        let transport = FakeTransport::new(|_| Ok(Value::Null));
        let engine = engine_with(transport, MemoryTokenStorage::with_token("abc"));

        engine.refresh_tasks().await.expect("refresh");
        assert!(engine.state().tasks.is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_leaves_the_collection_untouched() {
        let calls = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&calls);
        let transport = FakeTransport::new(move |_| {
            *counter.borrow_mut() += 1;
            if *counter.borrow() == 1 {
                Ok(seeded_tasks())
            } else {
                Err(ApiError::application(500, Some("Failed to fetch tasks".into())))
            }
        });
        let engine = engine_with(transport, MemoryTokenStorage::with_token("abc"));
        engine.refresh_tasks().await.expect("seed");

        let err = engine.refresh_tasks().await.expect_err("refresh");
        assert_eq!(err, "Failed to fetch tasks");
        assert_eq!(engine.state().tasks.len(), 2);
        assert!(!engine.state().loading);
    }
}
