//! Error response body.
//!
//! Every error surfaces to clients as `{ "message": ... }` with an HTTP status
//! from the error taxonomy. Internal detail is logged server-side and never
//! included here.

use serde::{Deserialize, Serialize};

/// `{ message }` error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
