use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body of every non-2xx JSON response: `{"error": "..."}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Plain acknowledgement body: `{"message": "..."}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}
