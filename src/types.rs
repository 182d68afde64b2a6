use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ParticipateRequest {
    pub phone: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipateResponse {
    pub participant_id: i64,
    pub lotto_number: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResultCheckRequest {
    pub phone: String,
}

/// Result lookup for a phone number.
///
/// The first lookup reveals `rank`; later lookups reveal `is_winner` and
/// `amount` instead. Non-winners get neither, so the body may be empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultCheckResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_winner: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lotto_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_count: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOutcome {
    /// First view: winning rank, 1 is the top prize.
    Ranked(i32),
    Won,
    Lost,
}

impl ResultCheckResponse {
    pub fn outcome(&self) -> ResultOutcome {
        match (self.is_winner, self.rank) {
            (Some(true), _) => ResultOutcome::Won,
            (Some(false), _) => ResultOutcome::Lost,
            (None, Some(rank)) if rank >= 1 => ResultOutcome::Ranked(rank),
            (None, _) => ResultOutcome::Lost,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Envelope returned by every backend endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

/// Error codes the backend is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidRequest,
    EventNotActive,
    AnnounceNotActive,
    DuplicateParticipation,
    CapacityFull,
    NotFound,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::EventNotActive => "EVENT_NOT_ACTIVE",
            ErrorCode::AnnounceNotActive => "ANNOUNCE_NOT_ACTIVE",
            ErrorCode::DuplicateParticipation => "DUPLICATE_PARTICIPATION",
            ErrorCode::CapacityFull => "CAPACITY_FULL",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "INVALID_REQUEST" => Some(ErrorCode::InvalidRequest),
            "EVENT_NOT_ACTIVE" => Some(ErrorCode::EventNotActive),
            "ANNOUNCE_NOT_ACTIVE" => Some(ErrorCode::AnnounceNotActive),
            "DUPLICATE_PARTICIPATION" => Some(ErrorCode::DuplicateParticipation),
            "CAPACITY_FULL" => Some(ErrorCode::CapacityFull),
            "NOT_FOUND" => Some(ErrorCode::NotFound),
            "INTERNAL_ERROR" => Some(ErrorCode::InternalError),
            _ => None,
        }
    }
}
