//! Fund reconciliation: folds a room's transaction set into aggregate totals.
//!
//! Recomputation is always from scratch. Full recompute trades O(n) cost per
//! mutation for zero drift risk, which holds up well at the per-room
//! transaction volumes this service sees.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::core::models::fund::FundSnapshot;
use crate::core::models::transaction::{Transaction, TransactionStatus, TransactionType};

/// Computes fresh fund totals for `room_id` over its transaction set.
///
/// Only CONFIRMED transactions count. A paid-out reimbursement request is
/// excluded from the sum: its linked REIMBURSEMENT_PAYMENT record is the
/// authoritative reimbursement event, so each claim is deducted exactly once.
pub fn summarize(room_id: &str, transactions: &[Transaction]) -> FundSnapshot {
    let mut total_contributions = Decimal::ZERO;
    let mut total_reimbursements = Decimal::ZERO;

    for tx in transactions
        .iter()
        .filter(|tx| tx.room_id == room_id && tx.status == TransactionStatus::Confirmed)
    {
        match tx.kind {
            TransactionType::Contribution => total_contributions += tx.amount,
            TransactionType::Reimbursement if !tx.reimbursed => total_reimbursements += tx.amount,
            TransactionType::Reimbursement => {} // superseded by its payout record
            TransactionType::ReimbursementPayment => total_reimbursements += tx.amount,
        }
    }

    FundSnapshot {
        room_id: room_id.to_string(),
        total_contributions,
        total_reimbursements,
        current_balance: total_contributions - total_reimbursements,
        updated_at: Utc::now(),
    }
}
