use crate::auth::jwt::{Claims, JwtService};
use crate::constants::{
    CONTRIBUTION_SUBMITTED, FUND_QUERIED, INVITE_CODE_REGENERATED, MAX_AMOUNT, MEMBER_CONFIRMED, MEMBER_JOINED,
    MEMBER_REMOVED, REIMBURSEMENT_PAID, REIMBURSEMENT_SUBMITTED, ROOM_CREATED, TRANSACTIONS_QUERIED,
    TRANSACTION_CONFIRMED, TRANSACTION_REJECTED, USER_REGISTERED,
};
use crate::core::errors::{FieldError, RoomFundError};
use crate::core::ledger;
use crate::core::models::{
    audit::{AppLog, RoomAudit},
    fund::FundSnapshot,
    room::{MemberStatus, Role, Room, RoomMember},
    transaction::{Resolution, Transaction, TransactionStatus, TransactionType},
    user::User,
};
use crate::infrastructure::fund::FundStore;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct RoomFundService<L: LoggingService, S: Storage, F: FundStore> {
    storage: S,
    logging: L,
    fund_store: F,
    jwt_service: JwtService,
}

impl<L: LoggingService, S: Storage, F: FundStore> RoomFundService<L, S, F> {
    pub fn new(storage: S, logging: L, fund_store: F, jwt_secret: String) -> Self {
        RoomFundService {
            storage,
            logging,
            fund_store,
            jwt_service: JwtService::new(jwt_secret),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, RoomFundError> {
        self.jwt_service.validate_token(token)
    }

    pub async fn validate_users(&self, user_ids: &[&str]) -> Result<(), RoomFundError> {
        for &user_id in user_ids {
            if self.storage.get_user(user_id).await?.is_none() {
                return Err(RoomFundError::UserNotFound(user_id.to_string()));
            }
        }
        Ok(())
    }

    async fn validate_room_and_admin(&self, room_id: &str, admin_id: &str) -> Result<Room, RoomFundError> {
        let room = self
            .storage
            .get_room(room_id)
            .await?
            .ok_or_else(|| RoomFundError::RoomNotFound(room_id.to_string()))?;
        if !room.is_admin(admin_id) {
            return Err(RoomFundError::NotRoomAdmin(admin_id.to_string()));
        }
        Ok(room)
    }

    async fn validate_confirmed_member(&self, room_id: &str, user_id: &str) -> Result<Room, RoomFundError> {
        let room = self
            .storage
            .get_room(room_id)
            .await?
            .ok_or_else(|| RoomFundError::RoomNotFound(room_id.to_string()))?;
        match room.member(user_id) {
            None => Err(RoomFundError::NotRoomMember(user_id.to_string())),
            Some(m) if !m.is_confirmed() => Err(RoomFundError::MembershipNotConfirmed(user_id.to_string())),
            Some(_) => Ok(room),
        }
    }

    async fn log_and_audit(
        &self,
        room_id: Option<&str>,
        action: &str,
        log_details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), RoomFundError> {
        self.logging.log_action(action, log_details.clone(), user_id).await?;
        if let Some(rid) = room_id {
            self.storage
                .save_room_audit(RoomAudit {
                    id: Uuid::new_v4().to_string(),
                    room_id: rid.to_string(),
                    action: action.to_string(),
                    user_id: user_id.map(String::from),
                    details: serde_json::from_value(log_details).unwrap_or_default(),
                    timestamp: Utc::now(),
                })
                .await?;
        }
        Ok(())
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), RoomFundError> {
        if value.trim().is_empty() {
            return Err(RoomFundError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} cannot be empty", field),
                },
            ));
        }
        if value.len() > max_length {
            return Err(RoomFundError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("{} Too Long", field),
                    description: format!("{} cannot exceed {} characters", field, max_length),
                },
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(RoomFundError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} contains invalid characters", field),
                },
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: Decimal) -> Result<(), RoomFundError> {
        if amount <= Decimal::ZERO {
            return Err(RoomFundError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount must be greater than 0".to_string(),
                },
            ));
        }
        if amount > Decimal::from(MAX_AMOUNT) {
            return Err(RoomFundError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Amount Too Large".to_string(),
                    description: format!("Amount cannot exceed {}", MAX_AMOUNT),
                },
            ));
        }
        if amount.normalize().scale() > 2 {
            return Err(RoomFundError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount cannot have more than 2 decimal places".to_string(),
                },
            ));
        }
        Ok(())
    }

    /// UPI VPAs look like `name@bank`. The value is an attestation string the
    /// service never verifies against a payment network.
    fn validate_upi_input(&self, field: &str, value: &str) -> Result<(), RoomFundError> {
        self.validate_string_input(field, value, 100)?;
        if !value.contains('@') {
            return Err(RoomFundError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} must be a UPI VPA like name@bank", field),
                },
            ));
        }
        Ok(())
    }

    fn validate_room_roles(&self, room: &Room) -> Result<(), RoomFundError> {
        let admin_count = room.members.iter().filter(|m| m.role == Role::Admin).count();
        if admin_count != 1 {
            return Err(RoomFundError::InvalidAdminCount(admin_count));
        }
        Ok(())
    }

    // USER MANAGEMENT

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, RoomFundError> {
        let user = self
            .storage
            .get_user_by_email(email)
            .await?
            .ok_or(RoomFundError::InvalidCredentials)?;

        if bcrypt::verify(password, &user.password)
            .map_err(|e| RoomFundError::InternalServerError(format!("Password verification error: {}", e)))?
        {
            self.jwt_service.generate_token(&user.id, "USER")
        } else {
            Err(RoomFundError::InvalidCredentials)
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, RoomFundError> {
        self.storage.get_user(user_id).await
    }

    pub async fn add_user(&self, user: User) -> Result<User, RoomFundError> {
        if user.email.is_empty() {
            return Err(RoomFundError::MissingEmail);
        }
        if !user.email.contains('@') || !user.email.contains('.') || user.email.len() < 5 {
            return Err(RoomFundError::InvalidEmail(user.email.clone()));
        }
        if user.password.is_empty() {
            return Err(RoomFundError::InvalidInput(
                "password".to_string(),
                FieldError {
                    field: "password".to_string(),
                    title: "Invalid password".to_string(),
                    description: "Password cannot be empty".to_string(),
                },
            ));
        }
        self.validate_string_input("name", &user.name, 100)?;

        let new_user = self.storage.create_user_if_not_exists(user.clone()).await?;
        if new_user.id.is_empty() {
            return Err(RoomFundError::EmailAlreadyRegistered(user.email));
        }

        self.log_and_audit(
            None,
            USER_REGISTERED,
            json!({ "user_id": new_user.id, "name": new_user.name, "email": new_user.email }),
            Some(new_user.id.as_str()),
        )
        .await?;
        Ok(new_user)
    }

    // ROOM MANAGEMENT

    pub async fn create_room(&self, name: String, created_by: &User) -> Result<Room, RoomFundError> {
        self.validate_users(&[&created_by.id]).await?;
        self.validate_string_input("name", &name, 100)?;

        let room = Room {
            id: Uuid::new_v4().to_string(),
            name,
            members: vec![RoomMember {
                user: created_by.clone(),
                role: Role::Admin,
                status: MemberStatus::Confirmed,
            }],
            invite_code: Uuid::new_v4().to_string(),
        };

        self.validate_room_roles(&room)?;
        self.storage.save_room(room.clone()).await?;
        info!(room_id = %room.id, "room created");

        self.log_and_audit(
            Some(&room.id),
            ROOM_CREATED,
            json!({ "room_id": room.id, "name": room.name, "admin_id": created_by.id }),
            Some(created_by.id.as_str()),
        )
        .await?;

        Ok(room)
    }

    pub async fn get_room(&self, room_id: &str) -> Result<Option<Room>, RoomFundError> {
        self.storage.get_room(room_id).await
    }

    /// Joins as a PENDING member; the room admin must confirm the membership
    /// before the user can submit transactions or read the fund.
    pub async fn join_room(&self, invite_code: &str, user: &User) -> Result<(), RoomFundError> {
        self.validate_string_input("invite_code", invite_code, 100)?;
        let mut room = self
            .storage
            .get_room_by_invite_code(invite_code)
            .await?
            .ok_or(RoomFundError::InviteCodeNotFound)?;
        self.validate_users(&[&user.id]).await?;

        if self.storage.is_room_member(&room.id, &user.id).await? {
            return Err(RoomFundError::AlreadyRoomMember(user.id.clone()));
        }

        room.members.push(RoomMember {
            user: user.clone(),
            role: Role::Member,
            status: MemberStatus::Pending,
        });
        self.storage.save_room(room.clone()).await?;

        self.log_and_audit(
            Some(&room.id),
            MEMBER_JOINED,
            json!({ "room_id": room.id, "user_id": user.id, "name": user.name }),
            Some(user.id.as_str()),
        )
        .await?;
        Ok(())
    }

    pub async fn confirm_member(
        &self,
        room_id: &str,
        user_id: &str,
        confirmed_by: &User,
    ) -> Result<(), RoomFundError> {
        let mut room = self.validate_room_and_admin(room_id, &confirmed_by.id).await?;

        let member = room
            .members
            .iter_mut()
            .find(|m| m.user.id == user_id)
            .ok_or_else(|| RoomFundError::NotRoomMember(user_id.to_string()))?;
        if member.status == MemberStatus::Confirmed {
            return Err(RoomFundError::MembershipAlreadyConfirmed(user_id.to_string()));
        }
        member.status = MemberStatus::Confirmed;
        self.storage.save_room(room.clone()).await?;

        self.log_and_audit(
            Some(room_id),
            MEMBER_CONFIRMED,
            json!({ "room_id": room_id, "user_id": user_id }),
            Some(confirmed_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    pub async fn remove_member(&self, room_id: &str, user_id: &str, removed_by: &User) -> Result<(), RoomFundError> {
        let mut room = self.validate_room_and_admin(room_id, &removed_by.id).await?;

        if user_id == removed_by.id {
            return Err(RoomFundError::AdminCannotRemoveSelf);
        }
        if room.member(user_id).is_none() {
            return Err(RoomFundError::NotRoomMember(user_id.to_string()));
        }

        room.members.retain(|m| m.user.id != user_id);
        self.storage.save_room(room.clone()).await?;

        self.log_and_audit(
            Some(room_id),
            MEMBER_REMOVED,
            json!({ "room_id": room_id, "user_id": user_id }),
            Some(removed_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    pub async fn regenerate_invite_code(&self, room_id: &str, regenerated_by: &User) -> Result<String, RoomFundError> {
        let mut room = self.validate_room_and_admin(room_id, &regenerated_by.id).await?;
        let old_code = room.invite_code.clone();
        let new_code = Uuid::new_v4().to_string();
        room.invite_code = new_code.clone();
        self.storage.revoke_invite_code(&old_code).await?;
        self.storage.save_room(room.clone()).await?;

        self.log_and_audit(
            Some(room_id),
            INVITE_CODE_REGENERATED,
            json!({ "room_id": room_id }),
            Some(regenerated_by.id.as_str()),
        )
        .await?;
        Ok(new_code)
    }

    // TRANSACTION SUBMISSION

    pub async fn submit_contribution(
        &self,
        room_id: &str,
        submitted_by: &User,
        amount: Decimal,
        notes: Option<String>,
    ) -> Result<Transaction, RoomFundError> {
        self.validate_confirmed_member(room_id, &submitted_by.id).await?;
        self.validate_amount_input("amount", amount)?;
        if let Some(ref notes) = notes {
            self.validate_string_input("notes", notes, 255)?;
        }

        let transaction = self.new_pending_transaction(
            room_id,
            &submitted_by.id,
            TransactionType::Contribution,
            amount,
            notes,
            None,
        );
        self.storage.save_transaction(transaction.clone()).await?;
        debug!(transaction_id = %transaction.id, room_id, "contribution submitted");

        self.log_and_audit(
            Some(room_id),
            CONTRIBUTION_SUBMITTED,
            json!({
                "transaction_id": transaction.id,
                "room_id": room_id,
                "user_id": submitted_by.id,
                "amount": transaction.amount,
            }),
            Some(submitted_by.id.as_str()),
        )
        .await?;

        Ok(transaction)
    }

    pub async fn submit_reimbursement(
        &self,
        room_id: &str,
        submitted_by: &User,
        amount: Decimal,
        notes: String,
        merchant_upi_id: String,
    ) -> Result<Transaction, RoomFundError> {
        self.validate_confirmed_member(room_id, &submitted_by.id).await?;
        self.validate_amount_input("amount", amount)?;
        self.validate_string_input("notes", &notes, 255)?;
        self.validate_upi_input("merchant_upi_id", &merchant_upi_id)?;

        let transaction = self.new_pending_transaction(
            room_id,
            &submitted_by.id,
            TransactionType::Reimbursement,
            amount,
            Some(notes),
            Some(merchant_upi_id),
        );
        self.storage.save_transaction(transaction.clone()).await?;
        debug!(transaction_id = %transaction.id, room_id, "reimbursement requested");

        self.log_and_audit(
            Some(room_id),
            REIMBURSEMENT_SUBMITTED,
            json!({
                "transaction_id": transaction.id,
                "room_id": room_id,
                "user_id": submitted_by.id,
                "amount": transaction.amount,
            }),
            Some(submitted_by.id.as_str()),
        )
        .await?;

        Ok(transaction)
    }

    fn new_pending_transaction(
        &self,
        room_id: &str,
        user_id: &str,
        kind: TransactionType,
        amount: Decimal,
        notes: Option<String>,
        merchant_upi_id: Option<String>,
    ) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: Uuid::new_v4().to_string(),
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
            kind,
            amount,
            status: TransactionStatus::Pending,
            notes,
            merchant_upi_id,
            reimbursed: false,
            member_upi_id: None,
            paid_by: None,
            reference_transaction_id: None,
            transaction_date: now,
            updated_at: now,
        }
    }

    // ADMIN RESOLUTION

    /// Confirms or rejects a PENDING transaction. The transition is a single
    /// conditional update at the store, so two racing resolutions cannot both
    /// succeed; the loser observes zero affected records and fails.
    pub async fn resolve_transaction(
        &self,
        room_id: &str,
        transaction_id: &str,
        decision: Resolution,
        resolved_by: &User,
    ) -> Result<Transaction, RoomFundError> {
        self.validate_room_and_admin(room_id, &resolved_by.id).await?;

        let transaction = self
            .storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| RoomFundError::TransactionNotFound(transaction_id.to_string()))?;
        if transaction.room_id != room_id {
            return Err(RoomFundError::TransactionNotFound(transaction_id.to_string()));
        }

        let affected = self
            .storage
            .update_transaction_status(transaction_id, room_id, decision.status(), TransactionStatus::Pending)
            .await?;
        if affected == 0 {
            return Err(RoomFundError::TransactionAlreadyResolved(transaction_id.to_string()));
        }

        let action = match decision {
            Resolution::Confirmed => TRANSACTION_CONFIRMED,
            Resolution::Rejected => TRANSACTION_REJECTED,
        };
        self.log_and_audit(
            Some(room_id),
            action,
            json!({
                "transaction_id": transaction_id,
                "room_id": room_id,
                "amount": transaction.amount,
            }),
            Some(resolved_by.id.as_str()),
        )
        .await?;

        // The status write is already durable. A failed rebuild leaves the
        // snapshot stale until the next confirmed mutation or fund read.
        if decision == Resolution::Confirmed {
            if let Err(e) = self.recompute_fund(room_id).await {
                warn!(room_id, error = %e, "fund recompute failed after resolution");
            }
        }

        self.storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| RoomFundError::TransactionNotFound(transaction_id.to_string()))
    }

    /// Pays out a CONFIRMED reimbursement: flips the `reimbursed` flag on the
    /// request and records the payout as a separate, already-CONFIRMED
    /// REIMBURSEMENT_PAYMENT transaction referencing it. Keeping request and
    /// payout as distinct records preserves the audit trail; the ledger counts
    /// the claim exactly once by skipping paid-out requests.
    pub async fn mark_reimbursed(
        &self,
        room_id: &str,
        transaction_id: &str,
        member_upi_id: &str,
        paid_by: &User,
    ) -> Result<(Transaction, Transaction), RoomFundError> {
        self.validate_room_and_admin(room_id, &paid_by.id).await?;
        self.validate_upi_input("member_upi_id", member_upi_id)?;

        let original = self
            .storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| RoomFundError::TransactionNotFound(transaction_id.to_string()))?;
        if original.room_id != room_id {
            return Err(RoomFundError::TransactionNotFound(transaction_id.to_string()));
        }
        if original.kind != TransactionType::Reimbursement {
            return Err(RoomFundError::NotAReimbursement(transaction_id.to_string()));
        }
        if original.status != TransactionStatus::Confirmed {
            return Err(RoomFundError::ReimbursementNotConfirmed(transaction_id.to_string()));
        }

        let affected = self
            .storage
            .mark_transaction_reimbursed(transaction_id, room_id, member_upi_id, &paid_by.id)
            .await?;
        if affected == 0 {
            return Err(RoomFundError::AlreadyReimbursed(transaction_id.to_string()));
        }

        let now = Utc::now();
        let payment = Transaction {
            id: Uuid::new_v4().to_string(),
            room_id: room_id.to_string(),
            user_id: paid_by.id.clone(),
            kind: TransactionType::ReimbursementPayment,
            amount: original.amount,
            status: TransactionStatus::Confirmed,
            notes: Some(format!("Payout of reimbursement {}", original.id)),
            merchant_upi_id: None,
            reimbursed: false,
            member_upi_id: Some(member_upi_id.to_string()),
            paid_by: None,
            reference_transaction_id: Some(original.id.clone()),
            transaction_date: now,
            updated_at: now,
        };
        self.storage.save_transaction(payment.clone()).await?;

        self.log_and_audit(
            Some(room_id),
            REIMBURSEMENT_PAID,
            json!({
                "transaction_id": transaction_id,
                "payment_id": payment.id,
                "room_id": room_id,
                "amount": payment.amount,
                "member_upi_id": member_upi_id,
            }),
            Some(paid_by.id.as_str()),
        )
        .await?;

        if let Err(e) = self.recompute_fund(room_id).await {
            warn!(room_id, error = %e, "fund recompute failed after payout");
        }

        let original = self
            .storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| RoomFundError::TransactionNotFound(transaction_id.to_string()))?;
        Ok((original, payment))
    }

    // FUND LEDGER

    /// Rebuilds the room's fund snapshot from its full transaction set and
    /// overwrites the stored one. If the transaction set cannot be read, the
    /// prior snapshot is left untouched.
    pub async fn recompute_fund(&self, room_id: &str) -> Result<FundSnapshot, RoomFundError> {
        let transactions = self.storage.list_transactions(room_id).await?;
        let snapshot = ledger::summarize(room_id, &transactions);
        self.fund_store.upsert(snapshot.clone()).await?;
        debug!(room_id, balance = %snapshot.current_balance, "fund recomputed");
        Ok(snapshot)
    }

    /// Returns the room's fund snapshot, materializing it on first read.
    pub async fn get_fund_snapshot(&self, room_id: &str, queried_by: &User) -> Result<FundSnapshot, RoomFundError> {
        self.validate_confirmed_member(room_id, &queried_by.id).await?;

        let snapshot = match self.fund_store.get(room_id).await? {
            Some(snapshot) => snapshot,
            None => self.recompute_fund(room_id).await?,
        };

        self.log_and_audit(
            Some(room_id),
            FUND_QUERIED,
            json!({ "room_id": room_id, "user_id": queried_by.id }),
            Some(queried_by.id.as_str()),
        )
        .await?;
        Ok(snapshot)
    }

    pub async fn list_transactions(
        &self,
        room_id: &str,
        status: Option<TransactionStatus>,
        queried_by: &User,
    ) -> Result<Vec<Transaction>, RoomFundError> {
        self.validate_confirmed_member(room_id, &queried_by.id).await?;

        let transactions = match status {
            Some(status) => self.storage.list_transactions_by_status(room_id, status).await?,
            None => self.storage.list_transactions(room_id).await?,
        };

        self.log_and_audit(
            Some(room_id),
            TRANSACTIONS_QUERIED,
            json!({ "room_id": room_id, "user_id": queried_by.id }),
            Some(queried_by.id.as_str()),
        )
        .await?;
        Ok(transactions)
    }

    // AUDIT

    pub async fn get_room_audits(&self, room_id: &str) -> Result<Vec<RoomAudit>, RoomFundError> {
        self.storage
            .get_room(room_id)
            .await?
            .ok_or_else(|| RoomFundError::RoomNotFound(room_id.to_string()))?;
        self.storage.get_room_audits(room_id).await
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, RoomFundError> {
        self.logging.get_logs().await
    }
}
