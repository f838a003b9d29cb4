use serde::{Deserialize, Serialize};

use crate::models::Message;

/// Body of a successful `DELETE /messages/{id}`.
pub const DELETED_MESSAGE: &str = "Successfully deleted.";

// -- Messages --

/// Fields are optional so that missing ones surface as a 400 with a
/// field name rather than a generic body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

/// Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMessageRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateMessageResponse {
    pub message: Message,
}

/// `_id` echoes the identifier exactly as the client wrote it in the path.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteMessageResponse {
    pub message: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl DeleteMessageResponse {
    pub fn new(id: String) -> Self {
        Self {
            message: DELETED_MESSAGE.to_string(),
            id,
        }
    }
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
