use crate::error::{ApiError, TransportError};
use crate::http::Transport;
use crate::types::{
    ApiResponse, ErrorCode, ParticipateRequest, ParticipateResponse, ResultCheckRequest,
    ResultCheckResponse,
};
use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;
use tracing::{debug, info};

pub const EVENT_PERIOD_PATH: &str = "/participations/check-period";
pub const ANNOUNCE_PERIOD_PATH: &str = "/results/check-period";
pub const PARTICIPATE_PATH: &str = "/participations";
pub const RESULT_CHECK_PATH: &str = "/results/check";

/// Typed calls for the lotto event backend.
pub struct LottoApi<T> {
    transport: T,
}

impl<T: Transport> LottoApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// `Ok(false)` only when the backend answers `EVENT_NOT_ACTIVE`.
    pub async fn check_event_active(&self) -> Result<bool, ApiError> {
        self.check_period(EVENT_PERIOD_PATH, ErrorCode::EventNotActive)
            .await
    }

    /// `Ok(false)` only when the backend answers `ANNOUNCE_NOT_ACTIVE`.
    pub async fn check_announce_active(&self) -> Result<bool, ApiError> {
        self.check_period(ANNOUNCE_PERIOD_PATH, ErrorCode::AnnounceNotActive)
            .await
    }

    pub async fn participate(
        &self,
        request: &ParticipateRequest,
    ) -> Result<ParticipateResponse, ApiError> {
        let response: ParticipateResponse = self
            .post_enveloped(PARTICIPATE_PATH, request, "Failed to participate")
            .await?;
        info!(participant_id = response.participant_id, "participation accepted");
        Ok(response)
    }

    pub async fn check_result(
        &self,
        request: &ResultCheckRequest,
    ) -> Result<ResultCheckResponse, ApiError> {
        self.post_enveloped(RESULT_CHECK_PATH, request, "Failed to check result")
            .await
    }

    async fn check_period(&self, path: &str, closed: ErrorCode) -> Result<bool, ApiError> {
        match self.transport.get(path).await {
            Ok(_) => Ok(true),
            Err(ApiError::Domain { code, .. }) if code == closed.as_str() => {
                debug!(path, code = %code, "period closed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn post_enveloped<B, R>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<R, ApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let raw = self.transport.post(path, body).await?;
        let envelope: ApiResponse<R> = serde_json::from_value(raw)?;
        unwrap_envelope(envelope, fallback)
    }
}

fn unwrap_envelope<R>(envelope: ApiResponse<R>, fallback: &str) -> Result<R, ApiError> {
    if !envelope.success {
        let message = envelope
            .error
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        return Err(ApiError::Business { message });
    }

    envelope.data.ok_or_else(|| {
        TransportError::Decode(serde_json::Error::custom(
            "successful response carried no data",
        ))
        .into()
    })
}
