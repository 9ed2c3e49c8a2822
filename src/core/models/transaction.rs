use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// A member's payment into the shared fund.
    Contribution,
    /// A member's claim for repayment of an out-of-pocket room expense.
    Reimbursement,
    /// The admin's payout settling a reimbursement; always created CONFIRMED
    /// with a back-reference to the request it settles.
    ReimbursementPayment,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Rejected,
}

/// Admin decision on a PENDING transaction. PENDING is not a valid decision,
/// so the type cannot express an illegal transition.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolution {
    Confirmed,
    Rejected,
}

impl Resolution {
    pub fn status(self) -> TransactionStatus {
        match self {
            Resolution::Confirmed => TransactionStatus::Confirmed,
            Resolution::Rejected => TransactionStatus::Rejected,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[schema(value_type = String, example = "500.00")]
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub notes: Option<String>,
    /// Payee UPI VPA; mandatory on reimbursement requests.
    pub merchant_upi_id: Option<String>,
    /// Flipped true exactly once, when the admin pays out a CONFIRMED
    /// reimbursement.
    pub reimbursed: bool,
    /// Recipient UPI VPA recorded at payout time.
    pub member_upi_id: Option<String>,
    /// Admin who performed the payout.
    pub paid_by: Option<String>,
    /// Set on a REIMBURSEMENT_PAYMENT: the request it settles.
    pub reference_transaction_id: Option<String>,
    #[schema(value_type = String, example = "2025-06-01T12:34:56Z")]
    pub transaction_date: DateTime<Utc>,
    #[schema(value_type = String, example = "2025-06-01T12:34:56Z")]
    pub updated_at: DateTime<Utc>,
}
