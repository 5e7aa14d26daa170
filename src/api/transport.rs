//! HTTP Transport
//!
//! One call against one absolute URL, normalized into a parsed JSON body or
//! a classified [`ApiError`]. The browser implementation rides on
//! `window.fetch`; tests script the trait directly.

use async_trait::async_trait;
use serde_json::Value;

use super::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully-resolved request: absolute URL, pre-serialized JSON body, and any
/// extra headers (the bearer header, typically).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub method: Method,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError>;
}

/// Transport over the browser fetch API.
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Headers, Request, RequestInit, Response};

        let headers = Headers::new().map_err(|_| ApiError::connectivity(&request.url))?;
        // Default first so caller-supplied headers can override it.
        let _ = headers.set("Content-Type", "application/json");
        for (name, value) in &request.headers {
            let _ = headers.set(name, value);
        }

        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        init.set_headers(&headers);
        if let Some(body) = &request.body {
            init.set_body(&wasm_bindgen::JsValue::from_str(body));
        }

        let fetch_request = Request::new_with_str_and_init(&request.url, &init)
            .map_err(|_| ApiError::connectivity(&request.url))?;
        let window = web_sys::window().ok_or_else(|| ApiError::connectivity(&request.url))?;

        let response = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(|_| ApiError::connectivity(&request.url))?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| ApiError::connectivity(&request.url))?;

        // Body text, best-effort; an unreadable or non-JSON body is treated
        // as empty.
        let body = match response.text() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .ok()
                .and_then(|text| text.as_string()),
            Err(_) => None,
        };
        let parsed: Option<Value> = body.and_then(|text| serde_json::from_str(&text).ok());

        if !response.ok() {
            let message = parsed
                .as_ref()
                .and_then(|value| value.get("error"))
                .and_then(|error| error.as_str())
                .map(str::to_string);
            return Err(ApiError::application(response.status(), message));
        }

        Ok(parsed.unwrap_or(Value::Null))
    }
}
