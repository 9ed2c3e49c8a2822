use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Service-wide action log entry.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AppLog {
    pub id: String,
    pub action: String,
    pub user_id: Option<String>,
    #[schema(value_type = Object)]
    pub details: HashMap<String, serde_json::Value>,
    #[schema(value_type = String, example = "2025-06-01T12:34:56Z")]
    pub timestamp: DateTime<Utc>,
}

/// Per-room audit record, kept alongside the transactions it describes.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomAudit {
    pub id: String,
    pub room_id: String,
    pub action: String,
    pub user_id: Option<String>,
    #[schema(value_type = Object)]
    pub details: HashMap<String, serde_json::Value>,
    #[schema(value_type = String, example = "2025-06-01T12:34:56Z")]
    pub timestamp: DateTime<Utc>,
}
