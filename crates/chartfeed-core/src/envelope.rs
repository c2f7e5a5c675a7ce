use serde::{Deserialize, Serialize};

use crate::FeedError;

/// Wire envelope for every response: `{success, data}` or `{success, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(error)) => Err(error),
            _ => Err(String::from("envelope carries neither data nor error")),
        }
    }
}

impl<T> From<Result<T, FeedError>> for Envelope<T> {
    fn from(result: Result<T, FeedError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(error.to_string()),
        }
    }
}
