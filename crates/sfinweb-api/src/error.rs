//! Error types for sfinweb-api

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use sfinweb_core::{CoreError, ErrorCode};
use thiserror::Error;

use crate::{base_html, escape_html};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String, suggestions: Vec<String> },

    #[error("Bad request: {message}")]
    BadRequest { message: String, suggestions: Vec<String> },

    /// The sfinapp service failed while resolving a view
    #[error("Upstream error: {source}")]
    Upstream {
        #[source]
        source: CoreError,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    /// Hints shown below the error message
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ApiError::NotFound { suggestions, .. } | ApiError::BadRequest { suggestions, .. } => {
                suggestions.clone()
            }
            ApiError::Upstream { source } => source.to_details().suggestions,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error.code() {
            ErrorCode::TransactionNotFound => {
                let details = error.to_details();
                ApiError::NotFound {
                    resource: error.to_string(),
                    suggestions: details.suggestions,
                }
            }
            ErrorCode::InvalidRoute | ErrorCode::ValidationError => {
                let details = error.to_details();
                ApiError::BadRequest {
                    message: error.to_string(),
                    suggestions: details.suggestions,
                }
            }
            _ => ApiError::Upstream { source: error },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Upstream { source } => log::error!("Request failed: {}", source.to_details()),
            _ if status.is_server_error() => log::error!("Request failed: {}", self),
            _ => log::warn!("Request rejected: {}", self),
        }

        let suggestions = self.suggestions();
        let hints = if suggestions.is_empty() {
            String::new()
        } else {
            let items: String = suggestions
                .iter()
                .map(|s| format!("<li>{}</li>", escape_html(s)))
                .collect();
            format!("<ul class='suggestions list-disc pl-5 mt-3 text-sm text-gray-600'>{}</ul>", items)
        };

        let body = format!(
            r#"<div class='max-w-xl mx-auto mt-16 bg-white border border-red-200 rounded-lg p-6'>
    <h2 class='text-xl font-bold text-red-700 mb-2'>{} {}</h2>
    <p class='text-gray-700'>{}</p>
    {}
    <a href='/transactions' class='inline-block mt-4 text-indigo-600 hover:underline'>Back to transactions</a>
</div>"#,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error"),
            escape_html(&self.to_string()),
            hints
        );
        (status, Html(base_html("Error", &body))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_status() {
        let not_found: ApiError = CoreError::TransactionNotFound { id: "9".to_string() }.into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid: ApiError = CoreError::InvalidRoute { value: "abc".to_string() }.into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let upstream: ApiError = CoreError::Request { message: "refused".to_string() }.into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert!(upstream.to_string().contains("refused"));
    }

    #[test]
    fn test_core_suggestions_are_kept() {
        let not_found: ApiError = CoreError::TransactionNotFound { id: "9".to_string() }.into();
        assert!(not_found.suggestions()[0].contains("transaction list"));

        let upstream: ApiError = CoreError::Request { message: "refused".to_string() }.into();
        assert!(upstream.suggestions()[0].contains("api.base_url"));

        assert!(ApiError::bad_request("rows").suggestions().is_empty());
    }

    #[tokio::test]
    async fn test_error_page_lists_suggestions() {
        let error: ApiError = CoreError::InvalidRoute { value: "abc".to_string() }.into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Invalid route parameter: abc"));
        assert!(html.contains("<ul class='suggestions"));
        assert!(html.contains("use &#39;new&#39; to create a transaction"));
    }

    #[test]
    fn test_error_response_status() {
        let response = ApiError::bad_request("<script>").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
