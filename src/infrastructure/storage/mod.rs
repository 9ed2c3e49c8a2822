use crate::core::errors::RoomFundError;
use crate::core::models::{audit::RoomAudit, room::Room, transaction::Transaction, transaction::TransactionStatus, user::User};
use async_trait::async_trait;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_user_if_not_exists(&self, user: User) -> Result<User, RoomFundError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, RoomFundError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RoomFundError>;

    async fn save_room(&self, room: Room) -> Result<(), RoomFundError>;
    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, RoomFundError>;
    async fn get_room_by_invite_code(&self, invite_code: &str) -> Result<Option<Room>, RoomFundError>;
    async fn revoke_invite_code(&self, invite_code: &str) -> Result<(), RoomFundError>;
    async fn is_room_member(&self, room_id: &str, user_id: &str) -> Result<bool, RoomFundError>;

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), RoomFundError>;
    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, RoomFundError>;
    async fn list_transactions(&self, room_id: &str) -> Result<Vec<Transaction>, RoomFundError>;
    async fn list_transactions_by_status(
        &self,
        room_id: &str,
        status: TransactionStatus,
    ) -> Result<Vec<Transaction>, RoomFundError>;

    /// Compare-and-swap on transaction status: the write happens only if the
    /// transaction belongs to `room_id` and currently has `expected` status.
    /// Returns the number of records changed (0 or 1); callers treat 0 as a
    /// lost race, not an error.
    async fn update_transaction_status(
        &self,
        transaction_id: &str,
        room_id: &str,
        new_status: TransactionStatus,
        expected: TransactionStatus,
    ) -> Result<u64, RoomFundError>;

    /// Compare-and-swap flip of the `reimbursed` flag on a CONFIRMED
    /// reimbursement, recording the recipient VPA and the paying admin.
    /// Returns the number of records changed (0 or 1).
    async fn mark_transaction_reimbursed(
        &self,
        transaction_id: &str,
        room_id: &str,
        member_upi_id: &str,
        paid_by: &str,
    ) -> Result<u64, RoomFundError>;

    async fn save_room_audit(&self, audit: RoomAudit) -> Result<(), RoomFundError>;
    async fn get_room_audits(&self, room_id: &str) -> Result<Vec<RoomAudit>, RoomFundError>;
}

pub mod in_memory;
