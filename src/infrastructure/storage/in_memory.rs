use crate::core::errors::RoomFundError;
use crate::core::models::{
    audit::RoomAudit,
    room::Room,
    transaction::{Transaction, TransactionStatus, TransactionType},
    user::User,
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use bcrypt::hash;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryStorage {
    users: Arc<RwLock<HashMap<String, User>>>,
    users_by_email: Arc<RwLock<HashMap<String, User>>>,
    rooms: Arc<RwLock<HashMap<String, Room>>>,
    rooms_by_invite_code: Arc<RwLock<HashMap<String, String>>>,
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
    room_audits: Arc<RwLock<HashMap<String, Vec<RoomAudit>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            users: Arc::new(RwLock::new(HashMap::new())),
            users_by_email: Arc::new(RwLock::new(HashMap::new())),
            rooms: Arc::new(RwLock::new(HashMap::new())),
            rooms_by_invite_code: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(HashMap::new())),
            room_audits: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user_if_not_exists(&self, user: User) -> Result<User, RoomFundError> {
        let mut users_by_email = self.users_by_email.write().await;
        if users_by_email.contains_key(&user.email) {
            return Ok(User {
                id: String::new(),
                name: String::new(),
                email: user.email,
                password: String::new(),
            });
        }
        let hashed_user = User {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            password: hash(&user.password, bcrypt::DEFAULT_COST)
                .map_err(|e| RoomFundError::InternalServerError(format!("Password hashing error: {}", e)))?,
        };
        users_by_email.insert(user.email.clone(), hashed_user.clone());
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), hashed_user.clone());
        Ok(hashed_user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, RoomFundError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RoomFundError> {
        let users_by_email = self.users_by_email.read().await;
        Ok(users_by_email.get(email).cloned())
    }

    async fn save_room(&self, room: Room) -> Result<(), RoomFundError> {
        let mut rooms = self.rooms.write().await;
        let mut rooms_by_invite_code = self.rooms_by_invite_code.write().await;
        rooms_by_invite_code.insert(room.invite_code.clone(), room.id.clone());
        rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, RoomFundError> {
        let rooms = self.rooms.read().await;
        Ok(rooms.get(room_id).cloned())
    }

    async fn get_room_by_invite_code(&self, invite_code: &str) -> Result<Option<Room>, RoomFundError> {
        let rooms_by_invite_code = self.rooms_by_invite_code.read().await;
        let rooms = self.rooms.read().await;
        Ok(rooms_by_invite_code
            .get(invite_code)
            .and_then(|room_id| rooms.get(room_id).cloned()))
    }

    async fn revoke_invite_code(&self, invite_code: &str) -> Result<(), RoomFundError> {
        let mut rooms_by_invite_code = self.rooms_by_invite_code.write().await;
        rooms_by_invite_code.remove(invite_code);
        Ok(())
    }

    async fn is_room_member(&self, room_id: &str, user_id: &str) -> Result<bool, RoomFundError> {
        let rooms = self.rooms.read().await;
        Ok(rooms
            .get(room_id)
            .map(|r| r.members.iter().any(|m| m.user.id == user_id))
            .unwrap_or(false))
    }

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), RoomFundError> {
        let mut transactions = self.transactions.write().await;
        transactions.insert(transaction.id.clone(), transaction);
        Ok(())
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, RoomFundError> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(transaction_id).cloned())
    }

    async fn list_transactions(&self, room_id: &str) -> Result<Vec<Transaction>, RoomFundError> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .values()
            .filter(|t| t.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn list_transactions_by_status(
        &self,
        room_id: &str,
        status: TransactionStatus,
    ) -> Result<Vec<Transaction>, RoomFundError> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .values()
            .filter(|t| t.room_id == room_id && t.status == status)
            .cloned()
            .collect())
    }

    async fn update_transaction_status(
        &self,
        transaction_id: &str,
        room_id: &str,
        new_status: TransactionStatus,
        expected: TransactionStatus,
    ) -> Result<u64, RoomFundError> {
        // Single write lock makes the check-and-set atomic, the in-memory
        // equivalent of `UPDATE .. WHERE id = ? AND status = ?`.
        let mut transactions = self.transactions.write().await;
        match transactions.get_mut(transaction_id) {
            Some(tx) if tx.room_id == room_id && tx.status == expected => {
                tx.status = new_status;
                tx.updated_at = Utc::now();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn mark_transaction_reimbursed(
        &self,
        transaction_id: &str,
        room_id: &str,
        member_upi_id: &str,
        paid_by: &str,
    ) -> Result<u64, RoomFundError> {
        let mut transactions = self.transactions.write().await;
        match transactions.get_mut(transaction_id) {
            Some(tx)
                if tx.room_id == room_id
                    && tx.kind == TransactionType::Reimbursement
                    && tx.status == TransactionStatus::Confirmed
                    && !tx.reimbursed =>
            {
                tx.reimbursed = true;
                tx.member_upi_id = Some(member_upi_id.to_string());
                tx.paid_by = Some(paid_by.to_string());
                tx.updated_at = Utc::now();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn save_room_audit(&self, audit: RoomAudit) -> Result<(), RoomFundError> {
        let mut room_audits = self.room_audits.write().await;
        room_audits.entry(audit.room_id.clone()).or_default().push(audit);
        Ok(())
    }

    async fn get_room_audits(&self, room_id: &str) -> Result<Vec<RoomAudit>, RoomFundError> {
        let room_audits = self.room_audits.read().await;
        Ok(room_audits.get(room_id).cloned().unwrap_or_default())
    }
}
