//! Competition room REST API client
//!
//! Thin typed wrapper over the remote room resource. Every call carries the
//! opaque bearer credential from configuration; the engine never inspects or
//! refreshes it.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// HTTP client for the competition room endpoints
#[derive(Clone)]
pub struct CompetitionClient {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl CompetitionClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
            auth_token: config.auth_token.clone(),
        }
    }

    /// Get the URL for a competition endpoint
    fn url(&self, path: &str) -> String {
        format!("{}/api/competition/{}", self.base_url, path)
    }

    /// Register the current user in the active room. Idempotent server-side;
    /// joining twice does not duplicate the participant.
    pub async fn join(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("join"))
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(ApiError::Request)?;

        check_status(response).await.map(|_| ())
    }

    /// Fetch the authoritative room status
    pub async fn room_status(&self) -> Result<RoomStatusPayload, ApiError> {
        let response = self
            .client
            .get(self.url("room"))
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .send()
            .await
            .map_err(ApiError::Request)?;

        check_status(response).await?.json().await.map_err(ApiError::Parse)
    }

    /// Fetch the participant roster, sorted by score descending
    pub async fn participants(&self) -> Result<Vec<Participant>, ApiError> {
        let response = self
            .client
            .get(self.url("participants"))
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .send()
            .await
            .map_err(ApiError::Request)?;

        check_status(response).await?.json().await.map_err(ApiError::Parse)
    }

    /// Fetch the word pool for the active language track
    pub async fn words(&self) -> Result<Vec<String>, ApiError> {
        let response = self
            .client
            .get(self.url("words"))
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .send()
            .await
            .map_err(ApiError::Request)?;

        let payload: WordsPayload = check_status(response).await?.json().await.map_err(ApiError::Parse)?;
        Ok(payload.words)
    }

    /// Push the local score to the leaderboard. Best-effort; the caller is
    /// expected to log and drop failures.
    pub async fn report_score(&self, score: u32) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("update-score"))
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .json(&ScoreUpdate { score })
            .send()
            .await
            .map_err(ApiError::Request)?;

        check_status(response).await.map(|_| ())
    }
}

/// Map non-2xx responses to `ApiError::Api`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Api { status: status.as_u16(), body });
    }
    Ok(response)
}

/// Room status as it appears on the wire. Fields are unvalidated here; the
/// session converts this into its domain state and treats out-of-range values
/// as a malformed payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomStatusPayload {
    pub game_time: i64,
    pub difficulty: i64,
    pub is_active: bool,
}

/// Participant row from the room resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub user_name: String,
    pub score: u32,
    pub is_connected: bool,
}

#[derive(Debug, Deserialize)]
struct WordsPayload {
    words: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ScoreUpdate {
    score: u32,
}

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_status_payload_deserializes() {
        let payload: RoomStatusPayload = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Main room",
            "game_time": 60,
            "difficulty": 3,
            "is_active": true
        }))
        .unwrap();

        assert_eq!(payload.game_time, 60);
        assert_eq!(payload.difficulty, 3);
        assert!(payload.is_active);
    }

    #[test]
    fn participants_deserialize() {
        let roster: Vec<Participant> = serde_json::from_value(serde_json::json!([
            {"id": 7, "user_name": "alice", "score": 40, "is_connected": true},
            {"id": 8, "user_name": "bob", "score": 10, "is_connected": false}
        ]))
        .unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].user_name, "alice");
        assert_eq!(roster[0].score, 40);
        assert!(!roster[1].is_connected);
    }

    #[test]
    fn words_payload_deserializes() {
        let payload: WordsPayload =
            serde_json::from_value(serde_json::json!({"words": ["hello", "мир"]})).unwrap();
        assert_eq!(payload.words, vec!["hello", "мир"]);
    }

    #[test]
    fn malformed_room_status_is_a_parse_error() {
        let result: Result<RoomStatusPayload, _> =
            serde_json::from_value(serde_json::json!({"game_time": "soon"}));
        assert!(result.is_err());
    }
}
