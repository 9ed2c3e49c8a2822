use axum::{Json, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::RoomFundError;
use crate::core::models::transaction::{Resolution, TransactionStatus};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    pub name: String,
    pub created_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct JoinRoomRequest {
    pub invite_code: String,
    pub user_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ConfirmMemberRequest {
    pub user_id: String,
    pub confirmed_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RemoveMemberRequest {
    pub user_id: String,
    pub removed_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RegenerateInviteCodeRequest {
    pub regenerated_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitContributionRequest {
    #[schema(value_type = String, example = "500.00")]
    pub amount: Decimal,
    pub notes: Option<String>,
    pub user_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitReimbursementRequest {
    #[schema(value_type = String, example = "200.00")]
    pub amount: Decimal,
    pub notes: String,
    pub merchant_upi_id: String,
    pub user_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ResolveTransactionRequest {
    pub decision: Resolution,
    pub resolved_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct PayoutRequest {
    pub member_upi_id: String,
    pub paid_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct QueryTransactionsRequest {
    pub room_id: String,
    pub status: Option<TransactionStatus>,
    pub queried_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct GetFundSnapshotRequest {
    pub room_id: String,
    pub queried_by_id: String,
}

/// Response to a payout: the settled request plus the payment record created
/// for it.
#[derive(Serialize, ToSchema)]
pub struct PayoutResponse {
    pub original_transaction: crate::core::models::transaction::Transaction,
    pub reimbursement_payment_transaction: crate::core::models::transaction::Transaction,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub kind: String,
    pub error: String,
}

// Newtype wrapper for RoomFundError to implement IntoResponse
pub struct ApiError(pub RoomFundError);

impl From<RoomFundError> for ApiError {
    fn from(err: RoomFundError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            RoomFundError::MissingEmail
            | RoomFundError::InvalidEmail(_)
            | RoomFundError::InvalidInput(_, _)
            | RoomFundError::InvalidAdminCount(_) => StatusCode::BAD_REQUEST,
            RoomFundError::InvalidCredentials | RoomFundError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            RoomFundError::NotRoomMember(_)
            | RoomFundError::MembershipNotConfirmed(_)
            | RoomFundError::NotRoomAdmin(_)
            | RoomFundError::AdminCannotRemoveSelf => StatusCode::FORBIDDEN,
            RoomFundError::UserNotFound(_)
            | RoomFundError::RoomNotFound(_)
            | RoomFundError::TransactionNotFound(_)
            | RoomFundError::InviteCodeNotFound => StatusCode::NOT_FOUND,
            RoomFundError::EmailAlreadyRegistered(_)
            | RoomFundError::AlreadyRoomMember(_)
            | RoomFundError::MembershipAlreadyConfirmed(_)
            | RoomFundError::TransactionAlreadyResolved(_)
            | RoomFundError::NotAReimbursement(_)
            | RoomFundError::ReimbursementNotConfirmed(_)
            | RoomFundError::AlreadyReimbursed(_) => StatusCode::CONFLICT,
            RoomFundError::StorageError(_)
            | RoomFundError::FundStoreError(_)
            | RoomFundError::LoggingError(_)
            | RoomFundError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            kind: self.0.kind().to_string(),
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
