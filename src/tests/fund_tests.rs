use crate::core::errors::RoomFundError;
use crate::core::ledger;
use crate::core::models::transaction::{Resolution, Transaction, TransactionStatus, TransactionType};
use crate::tests::{create_test_service, register_user, setup_room};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn confirmed(room_id: &str, kind: TransactionType, amount: Decimal) -> Transaction {
    let now = Utc::now();
    Transaction {
        id: uuid::Uuid::new_v4().to_string(),
        room_id: room_id.to_string(),
        user_id: "u1".to_string(),
        kind,
        amount,
        status: TransactionStatus::Confirmed,
        notes: None,
        merchant_upi_id: None,
        reimbursed: false,
        member_upi_id: None,
        paid_by: None,
        reference_transaction_id: None,
        transaction_date: now,
        updated_at: now,
    }
}

#[test]
fn test_summarize_balance_identity() {
    let mut transactions = vec![
        confirmed("r1", TransactionType::Contribution, dec!(500.00)),
        confirmed("r1", TransactionType::Contribution, dec!(250.50)),
        confirmed("r1", TransactionType::Reimbursement, dec!(120.25)),
        confirmed("r1", TransactionType::ReimbursementPayment, dec!(80.00)),
        // Other rooms and non-confirmed entries are ignored
        confirmed("r2", TransactionType::Contribution, dec!(999.00)),
    ];
    transactions.push(Transaction {
        status: TransactionStatus::Pending,
        ..confirmed("r1", TransactionType::Contribution, dec!(42.00))
    });
    transactions.push(Transaction {
        status: TransactionStatus::Rejected,
        ..confirmed("r1", TransactionType::Reimbursement, dec!(42.00))
    });

    let snapshot = ledger::summarize("r1", &transactions);
    assert_eq!(snapshot.total_contributions, dec!(750.50));
    assert_eq!(snapshot.total_reimbursements, dec!(200.25));
    assert_eq!(
        snapshot.current_balance,
        snapshot.total_contributions - snapshot.total_reimbursements
    );
}

#[test]
fn test_summarize_skips_paid_out_requests() {
    let mut paid_out = confirmed("r1", TransactionType::Reimbursement, dec!(200.00));
    paid_out.reimbursed = true;
    let transactions = vec![
        confirmed("r1", TransactionType::Contribution, dec!(500.00)),
        paid_out,
        confirmed("r1", TransactionType::ReimbursementPayment, dec!(200.00)),
    ];

    let snapshot = ledger::summarize("r1", &transactions);
    // The claim counts once: through its payout record, not through both rows
    assert_eq!(snapshot.total_reimbursements, dec!(200.00));
    assert_eq!(snapshot.current_balance, dec!(300.00));
}

#[tokio::test]
async fn test_fund_snapshot_single_contribution() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;

    let tx = service
        .submit_contribution(&room.id, &member, dec!(500.00), None)
        .await
        .unwrap();
    service
        .resolve_transaction(&room.id, &tx.id, Resolution::Confirmed, &admin)
        .await
        .unwrap();

    let snapshot = service.get_fund_snapshot(&room.id, &member).await.unwrap();
    assert_eq!(snapshot.total_contributions, dec!(500.00));
    assert_eq!(snapshot.total_reimbursements, Decimal::ZERO);
    assert_eq!(snapshot.current_balance, dec!(500.00));
}

#[tokio::test]
async fn test_fund_snapshot_after_payout_counts_claim_once() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;

    let contribution = service
        .submit_contribution(&room.id, &member, dec!(500.00), None)
        .await
        .unwrap();
    service
        .resolve_transaction(&room.id, &contribution.id, Resolution::Confirmed, &admin)
        .await
        .unwrap();

    let claim = service
        .submit_reimbursement(
            &room.id,
            &member,
            dec!(200.00),
            "Paid the electrician".to_string(),
            "electrician@upi".to_string(),
        )
        .await
        .unwrap();
    service
        .resolve_transaction(&room.id, &claim.id, Resolution::Confirmed, &admin)
        .await
        .unwrap();

    let before_payout = service.get_fund_snapshot(&room.id, &admin).await.unwrap();
    assert_eq!(before_payout.total_reimbursements, dec!(200.00));
    assert_eq!(before_payout.current_balance, dec!(300.00));

    service
        .mark_reimbursed(&room.id, &claim.id, "ravi@upi", &admin)
        .await
        .unwrap();

    // The payout record replaces the claim in the sum; 200, never 400
    let after_payout = service.get_fund_snapshot(&room.id, &admin).await.unwrap();
    assert_eq!(after_payout.total_reimbursements, dec!(200.00));
    assert_eq!(after_payout.current_balance, dec!(300.00));
}

#[tokio::test]
async fn test_fund_snapshot_rejected_transactions_do_not_count() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;

    let tx = service
        .submit_contribution(&room.id, &member, dec!(500.00), None)
        .await
        .unwrap();
    service
        .resolve_transaction(&room.id, &tx.id, Resolution::Rejected, &admin)
        .await
        .unwrap();

    let snapshot = service.get_fund_snapshot(&room.id, &member).await.unwrap();
    assert_eq!(snapshot.total_contributions, Decimal::ZERO);
    assert_eq!(snapshot.total_reimbursements, Decimal::ZERO);
    assert_eq!(snapshot.current_balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_fund_snapshot_reads_are_idempotent() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;

    let tx = service
        .submit_contribution(&room.id, &member, dec!(500.00), None)
        .await
        .unwrap();
    service
        .resolve_transaction(&room.id, &tx.id, Resolution::Confirmed, &admin)
        .await
        .unwrap();

    let first = service.get_fund_snapshot(&room.id, &member).await.unwrap();
    let second = service.get_fund_snapshot(&room.id, &member).await.unwrap();
    assert_eq!(first.total_contributions, second.total_contributions);
    assert_eq!(first.total_reimbursements, second.total_reimbursements);
    assert_eq!(first.current_balance, second.current_balance);
    assert_eq!(first.updated_at, second.updated_at);
}

#[tokio::test]
async fn test_fund_snapshot_empty_room() {
    let service = create_test_service();
    let (admin, _, room) = setup_room(&service).await;

    let snapshot = service.get_fund_snapshot(&room.id, &admin).await.unwrap();
    assert_eq!(snapshot.total_contributions, Decimal::ZERO);
    assert_eq!(snapshot.total_reimbursements, Decimal::ZERO);
    assert_eq!(snapshot.current_balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_fund_snapshot_requires_confirmed_membership() {
    let service = create_test_service();
    let (_, _, room) = setup_room(&service).await;
    let outsider = register_user(&service, "Meera", "meera@example.com").await;

    let result = service.get_fund_snapshot(&room.id, &outsider).await;
    assert!(matches!(result, Err(RoomFundError::NotRoomMember(_))));
}
