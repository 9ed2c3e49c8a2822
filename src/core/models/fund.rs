use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Denormalized per-room totals over CONFIRMED transactions. Fully rebuilt by
/// the ledger on every confirmed state change; never patched incrementally.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FundSnapshot {
    pub room_id: String,
    #[schema(value_type = String, example = "500.00")]
    pub total_contributions: Decimal,
    #[schema(value_type = String, example = "200.00")]
    pub total_reimbursements: Decimal,
    #[schema(value_type = String, example = "300.00")]
    pub current_balance: Decimal,
    #[schema(value_type = String, example = "2025-06-01T12:34:56Z")]
    pub updated_at: DateTime<Utc>,
}
