//! Engine service client
//!
//! [`EngineService`] is the seam between the controller and the outside
//! world. The controller and the session only ever hold an
//! `Arc<dyn EngineService>`; production code plugs in [`HttpEngineClient`],
//! tests plug in scripted fakes.

use super::error::{ServiceError, ServiceResult};
use super::protocol::{
    ErrorResponse, EvaluateResponse, FenRequest, HealthResponse, LegalMovesResponse, MoveRequest,
    MoveResponse, SuggestResponse, BOARD_PATH, EVALUATE_PATH, HEALTH_PATH, MOVES_PATH,
    SUGGEST_PATH,
};
use crate::core::config::ClientConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Operations offered by the move-evaluation service
#[async_trait]
pub trait EngineService: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> ServiceResult<HealthResponse>;

    /// `POST /board`: apply and grade `mv` in `fen`
    async fn submit_move(&self, fen: &str, mv: &str) -> ServiceResult<MoveResponse>;

    /// `POST /suggest`: best move and line for `fen`
    async fn suggest(&self, fen: &str) -> ServiceResult<SuggestResponse>;

    /// `POST /evaluate`: static evaluation of `fen`
    async fn evaluate(&self, fen: &str) -> ServiceResult<EvaluateResponse>;

    /// `POST /moves`: legal moves in `fen`
    async fn legal_moves(&self, fen: &str) -> ServiceResult<LegalMovesResponse>;
}

/// reqwest-backed [`EngineService`]
#[derive(Debug, Clone)]
pub struct HttpEngineClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEngineClient {
    /// Build a client from the validated configuration
    pub fn new(config: &ClientConfig) -> ServiceResult<Self> {
        Self::with_base_url(&config.service_url, config.request_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> ServiceResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpEngineClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> ServiceResult<R> {
        let response = self.client.get(self.endpoint(path)).send().await?;
        Self::decode(path, response).await
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> ServiceResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        debug!("[SERVICE] POST {}", path);
        let response = self.client.post(self.endpoint(path)).json(body).send().await?;
        Self::decode(path, response).await
    }

    /// Turn a response into `R`, or into a [`ServiceError::Status`] carrying
    /// the service's own error message.
    async fn decode<R: DeserializeOwned>(path: &str, response: reqwest::Response) -> ServiceResult<R> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|body| body.error)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| text.clone());
            warn!("[SERVICE] {} failed with {}: {}", path, status, message);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl EngineService for HttpEngineClient {
    async fn health(&self) -> ServiceResult<HealthResponse> {
        self.get_json(HEALTH_PATH).await
    }

    async fn submit_move(&self, fen: &str, mv: &str) -> ServiceResult<MoveResponse> {
        let body = MoveRequest {
            fen: fen.to_string(),
            mv: mv.to_string(),
        };
        self.post_json(BOARD_PATH, &body).await
    }

    async fn suggest(&self, fen: &str) -> ServiceResult<SuggestResponse> {
        let body = FenRequest {
            fen: fen.to_string(),
        };
        self.post_json(SUGGEST_PATH, &body).await
    }

    async fn evaluate(&self, fen: &str) -> ServiceResult<EvaluateResponse> {
        let body = FenRequest {
            fen: fen.to_string(),
        };
        self.post_json(EVALUATE_PATH, &body).await
    }

    async fn legal_moves(&self, fen: &str) -> ServiceResult<LegalMovesResponse> {
        let body = FenRequest {
            fen: fen.to_string(),
        };
        self.post_json(MOVES_PATH, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            HttpEngineClient::with_base_url("http://localhost:6400/api/", Duration::from_secs(1))
                .expect("Should build");

        assert_eq!(client.base_url(), "http://localhost:6400/api");
        assert_eq!(client.endpoint(BOARD_PATH), "http://localhost:6400/api/board");
    }

    #[test]
    fn test_new_uses_config_url() {
        let config = ClientConfig::default();
        let client = HttpEngineClient::new(&config).expect("Should build");

        assert_eq!(client.endpoint(HEALTH_PATH), "http://localhost:6400/api/health");
    }
}
