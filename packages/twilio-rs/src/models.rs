use serde::Deserialize;

/// Call resource returned by `POST /Accounts/{sid}/Calls.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallResponse {
    pub sid: String,
    pub status: String,
    pub to: Option<String>,
    pub from: Option<String>,
    pub direction: Option<String>,
}

/// Twilio REST error body.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioErrorBody {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub more_info: Option<String>,
}
