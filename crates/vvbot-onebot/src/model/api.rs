//! API request and response types for OneBot v11.

use serde::{Deserialize, Serialize};

use super::message::OneBotMessage;
use crate::error::{ApiError, ApiResult};

/// A generic API response envelope from OneBot v11.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// The status: "ok", "async", or "failed".
    pub status: String,
    /// The return code (0 for success).
    #[serde(default)]
    pub retcode: i64,
    /// The response data (if successful).
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Error message (if failed). NapCat calls this field `message`.
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
    /// Additional error info.
    #[serde(default)]
    pub wording: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Checks if the API call was accepted.
    pub fn is_ok(&self) -> bool {
        (self.status == "ok" || self.status == "async") && self.retcode == 0
    }

    /// Converts the response into a Result.
    pub fn into_result(self) -> ApiResult<Option<T>> {
        if self.is_ok() {
            Ok(self.data)
        } else {
            let message = self
                .wording
                .filter(|w| !w.is_empty())
                .or(self.msg)
                .unwrap_or_else(|| format!("status {}", self.status));
            Err(ApiError::Failed {
                retcode: self.retcode,
                message,
            })
        }
    }
}

/// Parameters for sending a group message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendGroupMsgParams {
    /// The target group ID.
    pub group_id: i64,
    /// The message content.
    pub message: OneBotMessage,
}

/// Response data for the send_*_msg APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMsgResponse {
    /// The ID of the sent message.
    pub message_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_group_msg_params_shape() {
        let params = SendGroupMsgParams {
            group_id: 123,
            message: OneBotMessage::from_text("hi"),
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"group_id": 123, "message": [{"type": "text", "data": {"text": "hi"}}]})
        );
    }

    #[test]
    fn test_api_response_ok() {
        let resp: ApiResponse<SendMsgResponse> = serde_json::from_value(json!({
            "status": "ok", "retcode": 0, "data": {"message_id": 99}, "message": "", "wording": ""
        }))
        .unwrap();
        assert!(resp.is_ok());
        assert_eq!(resp.into_result().unwrap().unwrap().message_id, 99);
    }

    #[test]
    fn test_api_response_failed() {
        let resp: ApiResponse<SendMsgResponse> = serde_json::from_value(json!({
            "status": "failed", "retcode": 1200, "data": null, "message": "group not found"
        }))
        .unwrap();
        assert!(!resp.is_ok());
        match resp.into_result() {
            Err(ApiError::Failed { retcode, message }) => {
                assert_eq!(retcode, 1200);
                assert_eq!(message, "group not found");
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
    }
}
