use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct PostSessionResponse {
    pub session_id: String,
}
