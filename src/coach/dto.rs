use serde::{Deserialize, Serialize};

/// Request body for `POST /coach`.
#[derive(Debug, Deserialize)]
pub struct CoachRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CoachResponse {
    pub response: String,
}
