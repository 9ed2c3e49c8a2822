use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum RoomFundError {
    /// Email field is empty
    #[error("Email is required")]
    MissingEmail,

    /// Email is already registered
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),

    /// Email format is invalid
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// Email/password pair does not match a registered user
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Bearer token is missing, malformed or expired
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// User with given ID not found
    #[error("User {0} not found")]
    UserNotFound(String),

    /// Room with given ID not found
    #[error("Room {0} not found")]
    RoomNotFound(String),

    /// Transaction absent, or not part of the room it was addressed through
    #[error("Transaction {0} not found")]
    TransactionNotFound(String),

    /// Invite code does not resolve to a room
    #[error("Invite code not found")]
    InviteCodeNotFound,

    /// User is already a member of the room
    #[error("User {0} is already a room member")]
    AlreadyRoomMember(String),

    /// User is not a member of the room
    #[error("User {0} is not a room member")]
    NotRoomMember(String),

    /// User joined but the admin has not confirmed the membership yet
    #[error("Membership of user {0} is not confirmed")]
    MembershipNotConfirmed(String),

    /// Membership confirmation attempted twice
    #[error("Membership of user {0} already confirmed")]
    MembershipAlreadyConfirmed(String),

    /// User is not the room admin
    #[error("User {0} is not room admin")]
    NotRoomAdmin(String),

    /// Room has an invalid number of admins (must be exactly 1)
    #[error("Invalid admin count: {0}")]
    InvalidAdminCount(usize),

    /// Admin cannot remove themselves
    #[error("Admin cannot remove themselves")]
    AdminCannotRemoveSelf,

    /// Transaction has already been confirmed or rejected
    #[error("Transaction {0} already resolved")]
    TransactionAlreadyResolved(String),

    /// Payout attempted on a transaction that is not a reimbursement request
    #[error("Transaction {0} is not a reimbursement")]
    NotAReimbursement(String),

    /// Payout attempted on a reimbursement that is not CONFIRMED
    #[error("Reimbursement {0} is not confirmed")]
    ReimbursementNotConfirmed(String),

    /// Reimbursement has already been paid out
    #[error("Reimbursement {0} already paid out")]
    AlreadyReimbursed(String),

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    /// Underlying persistence layer failed
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Fund snapshot store failed
    #[error("Fund store error: {0}")]
    FundStoreError(String),

    /// Audit/app logging failed
    #[error("Logging error: {0}")]
    LoggingError(String),

    /// Internal server error (e.g., unexpected failure)
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl RoomFundError {
    /// Stable machine-readable error kind surfaced alongside the message.
    pub fn kind(&self) -> &'static str {
        use RoomFundError::*;
        match self {
            MissingEmail | InvalidEmail(_) | InvalidInput(_, _) => "validation",
            InvalidCredentials | InvalidToken(_) | NotRoomMember(_) | MembershipNotConfirmed(_)
            | NotRoomAdmin(_) | AdminCannotRemoveSelf => "access_denied",
            UserNotFound(_) | RoomNotFound(_) | TransactionNotFound(_) | InviteCodeNotFound => "not_found",
            TransactionAlreadyResolved(_) | NotAReimbursement(_) | ReimbursementNotConfirmed(_)
            | AlreadyReimbursed(_) | MembershipAlreadyConfirmed(_) | InvalidAdminCount(_) => "invalid_state",
            EmailAlreadyRegistered(_) | AlreadyRoomMember(_) => "conflict",
            StorageError(_) | FundStoreError(_) | LoggingError(_) => "store_failure",
            InternalServerError(_) => "internal",
        }
    }
}
