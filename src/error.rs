use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;

/// Failure of a single admin action. Nothing is retried.
#[derive(Debug, Display)]
pub enum AdminError {
    /// The record store could not be reached or answered garbage.
    #[display(fmt = "Record store unavailable: {}", _0)]
    Transport(String),

    /// The record store refused the request; `message` is shown as received.
    #[display(fmt = "{}", message)]
    Rejected { status: u16, message: String },

    /// A local check failed before any request was sent.
    #[display(fmt = "{}", _0)]
    Precondition(String),

    #[display(fmt = "Not found: {}", _0)]
    NotFound(String),

    /// The entry is finalized and must be reopened first.
    #[display(fmt = "{}", _0)]
    Locked(String),
}

impl std::error::Error for AdminError {}

impl From<reqwest::Error> for AdminError {
    fn from(e: reqwest::Error) -> Self {
        AdminError::Transport(e.to_string())
    }
}

impl ResponseError for AdminError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Transport(_) => StatusCode::BAD_GATEWAY,
            AdminError::Rejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AdminError::Precondition(_) => StatusCode::BAD_REQUEST,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Locked(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_keeps_upstream_message_and_status() {
        let err = AdminError::Rejected {
            status: 400,
            message: "Tax id already registered".into(),
        };
        assert_eq!(err.to_string(), "Tax id already registered");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn taxonomy_maps_to_http_status() {
        assert_eq!(
            AdminError::Transport("refused".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AdminError::Precondition("pick a month".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AdminError::Locked("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AdminError::Rejected { status: 42, message: "odd".into() }.status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
