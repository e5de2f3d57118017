//! Wire types for the board's REST API.
//!
//! Every endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true,  "data": ... }
//! { "success": false, "error": "Content too long" }
//! ```

use serde::Deserialize;

use super::transport::TransportError;

#[derive(Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Collapses the envelope into the payload or a transport error.
    pub fn into_result(self) -> Result<T, TransportError> {
        if !self.success {
            return Err(TransportError::Rejected(self.error));
        }
        self.data
            .ok_or_else(|| TransportError::Parse("success response without data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::post::Post;

    #[test]
    fn test_success_envelope() {
        let json = r#"{"success":true,"data":[{"id":"1","content":"A","created_at":"2024-03-01T12:00:00Z"}]}"#;
        let resp: ApiResponse<Vec<Post>> = serde_json::from_str(json).unwrap();
        let posts = resp.into_result().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "A");
    }

    #[test]
    fn test_failure_envelope_carries_message() {
        let json = r#"{"success":false,"error":"Content too long"}"#;
        let resp: ApiResponse<Post> = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.into_result().unwrap_err(),
            TransportError::Rejected(Some("Content too long".into()))
        );
    }

    #[test]
    fn test_success_without_data_is_a_parse_error() {
        let resp: ApiResponse<Post> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(resp.into_result(), Err(TransportError::Parse(_))));
    }
}
