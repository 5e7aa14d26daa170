//! API Client
//!
//! Holds the ordered candidate origins and owns the fallback loop: a request
//! is tried against each origin until one answers. A reachable server's
//! error response is authoritative and ends the loop; only network-level
//! unreachability justifies probing the next candidate.

use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use super::transport::{ApiRequest, Method, Transport};
use crate::models::{LoginResponse, Profile, Task, TaskStatus};

// ========================
// Request Body Structs
// ========================

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct TaskBody<'a> {
    title: &'a str,
    content: &'a str,
    status: TaskStatus,
}

// ========================
// Client
// ========================

pub struct ApiClient<T> {
    bases: Vec<String>,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    /// `bases` must be non-empty; [`crate::config::api_candidates`] always
    /// yields the fixed defaults even when nothing is configured.
    pub fn new(bases: Vec<String>, transport: T) -> Self {
        Self { bases, transport }
    }

    /// Try each candidate origin in order. Connectivity failures are
    /// remembered and the next origin is probed; an application failure is
    /// raised immediately. If every origin is unreachable, the last
    /// connectivity failure is raised.
    pub async fn execute(
        &self,
        path: &str,
        method: Method,
        body: Option<String>,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut headers = Vec::new();
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let mut last_connectivity: Option<ApiError> = None;
        for base in &self.bases {
            let request = ApiRequest {
                url: format!("{base}{path}"),
                method,
                body: body.clone(),
                headers: headers.clone(),
            };
            match self.transport.send(&request).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_connectivity() => {
                    log::warn!("origin unreachable, trying next candidate: {}", request.url);
                    last_connectivity = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_connectivity.unwrap_or_else(ApiError::unreachable))
    }

    // ========================
    // REST Calls
    // ========================

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = to_body(&LoginBody { email, password })?;
        let value = self.execute("/login", Method::Post, Some(body), None).await?;
        from_value(value)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let body = to_body(&RegisterBody { name, email, password })?;
        self.execute("/register", Method::Post, Some(body), None).await?;
        Ok(())
    }

    pub async fn profile(&self, token: &str) -> Result<Profile, ApiError> {
        let value = self.execute("/me", Method::Get, None, Some(token)).await?;
        from_value(value)
    }

    /// A `null` or non-array body is treated as an empty list; the backend
    /// answers `null` for a user with no tasks.
    pub async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, ApiError> {
        let value = self.execute("/tasks", Method::Get, None, Some(token)).await?;
        match value {
            Value::Array(_) => from_value(value),
            _ => Ok(Vec::new()),
        }
    }

    /// The created task in the response body is unused; callers refetch the
    /// whole list because the server is the id authority.
    pub async fn create_task(
        &self,
        token: &str,
        title: &str,
        content: &str,
        status: TaskStatus,
    ) -> Result<(), ApiError> {
        let body = to_body(&TaskBody { title, content, status })?;
        self.execute("/tasks", Method::Post, Some(body), Some(token)).await?;
        Ok(())
    }

    pub async fn update_task(
        &self,
        token: &str,
        id: i64,
        title: &str,
        content: &str,
        status: TaskStatus,
    ) -> Result<(), ApiError> {
        let body = to_body(&TaskBody { title, content, status })?;
        self.execute(&format!("/tasks/{id}"), Method::Put, Some(body), Some(token))
            .await?;
        Ok(())
    }

    pub async fn delete_task(&self, token: &str, id: i64) -> Result<(), ApiError> {
        self.execute(&format!("/tasks/{id}"), Method::Delete, None, Some(token))
            .await?;
        Ok(())
    }
}

fn to_body<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::validation(&e.to_string()))
}

fn from_value<R: serde::de::DeserializeOwned>(value: Value) -> Result<R, ApiError> {
    serde_json::from_value(value)
        .map_err(|_| ApiError::application(200, Some("Unexpected response shape".to_string())))
}
