use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nw_core::Error;
use serde_json::json;
use tracing::{error, warn};

const EXTRACTION_MESSAGE: &str = "Unable to extract content";

/// Library errors as HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            Error::MissingParameter(_) | Error::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Error::Extraction(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match status {
            StatusCode::BAD_REQUEST => json!({ "error": self.0.to_string() }),
            StatusCode::NOT_FOUND => {
                warn!("⚠️ Extraction failed: {}", self.0);
                json!({ "error": EXTRACTION_MESSAGE })
            }
            _ => {
                error!("❌ Request failed: {}", self.0);
                json!({ "message": "Internal Server Error", "error": self.0.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::MissingParameter("url".into()), StatusCode::BAD_REQUEST),
            (Error::InvalidUrl("nope".into()), StatusCode::BAD_REQUEST),
            (Error::Extraction("empty".into()), StatusCode::NOT_FOUND),
            (Error::MissingCredentials("NEWS_API_KEY".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::Storage("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }
}
