//! Upstream data source contract.

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::error::LoadError;

/// Response envelope returned by the dashboard API.
///
/// ```json
/// { "success": true, "result": [ ... ], "message": null }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<R> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub result: Vec<R>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<R> ApiResponse<R> {
    /// A successful response.
    pub fn ok(result: Vec<R>) -> Self {
        Self {
            success: true,
            result,
            message: None,
        }
    }

    /// A `success: false` response.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: Vec::new(),
            message: Some(message.into()),
        }
    }

    /// Unwraps the records, turning `success: false` into a
    /// [`LoadError::Rejected`].
    pub fn into_result(self) -> Result<Vec<R>, LoadError> {
        if self.success {
            Ok(self.result)
        } else {
            Err(LoadError::rejected(self.message))
        }
    }
}

/// Fetches the full dataset of one table.
///
/// Implementations map transport failures to [`LoadError::Transport`]. The
/// engine places no timeout or retry around the call; a retry is a user
/// action.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Raw record shape consumed by the row transformer.
    type Record: Send;

    /// Fetches every record.
    async fn fetch(&self) -> Result<ApiResponse<Self::Record>, LoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_response_uses_message() {
        let response: ApiResponse<u32> =
            serde_json::from_str(r#"{"success": false, "message": "Token expired"}"#).unwrap();
        assert_eq!(
            response.into_result(),
            Err(LoadError::Rejected("Token expired".into()))
        );
    }

    #[test]
    fn test_failed_response_without_message_uses_fallback() {
        let response: ApiResponse<u32> = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(
            response.into_result().unwrap_err().message(),
            crate::error::GENERIC_LOAD_ERROR
        );
    }

    #[test]
    fn test_successful_response() {
        let response: ApiResponse<u32> =
            serde_json::from_str(r#"{"success": true, "result": [1, 2, 3]}"#).unwrap();
        assert_eq!(response.into_result(), Ok(vec![1, 2, 3]));
    }
}
