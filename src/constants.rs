// Audit action identifiers, shared between the service layer and log readers.

pub const USER_REGISTERED: &str = "USER_REGISTERED";
pub const ROOM_CREATED: &str = "ROOM_CREATED";
pub const MEMBER_JOINED: &str = "MEMBER_JOINED";
pub const MEMBER_CONFIRMED: &str = "MEMBER_CONFIRMED";
pub const MEMBER_REMOVED: &str = "MEMBER_REMOVED";
pub const INVITE_CODE_REGENERATED: &str = "INVITE_CODE_REGENERATED";
pub const CONTRIBUTION_SUBMITTED: &str = "CONTRIBUTION_SUBMITTED";
pub const REIMBURSEMENT_SUBMITTED: &str = "REIMBURSEMENT_SUBMITTED";
pub const TRANSACTION_CONFIRMED: &str = "TRANSACTION_CONFIRMED";
pub const TRANSACTION_REJECTED: &str = "TRANSACTION_REJECTED";
pub const REIMBURSEMENT_PAID: &str = "REIMBURSEMENT_PAID";
pub const FUND_QUERIED: &str = "FUND_QUERIED";
pub const TRANSACTIONS_QUERIED: &str = "TRANSACTIONS_QUERIED";

/// Upper bound on a single transaction amount.
pub const MAX_AMOUNT: u64 = 1_000_000;
