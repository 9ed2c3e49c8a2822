use crate::core::errors::RoomFundError;
use crate::core::models::transaction::{Resolution, TransactionStatus, TransactionType};
use crate::tests::{create_test_service, register_user, setup_room};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

#[tokio::test]
async fn test_submit_contribution_starts_pending() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;

    let tx = service
        .submit_contribution(&room.id, &member, dec!(500.00), Some("June rent share".to_string()))
        .await
        .unwrap();

    assert_eq!(tx.kind, TransactionType::Contribution);
    assert_eq!(tx.status, TransactionStatus::Pending);
    assert_eq!(tx.amount, dec!(500.00));
    assert!(!tx.reimbursed);

    // Pending transactions never count toward the fund
    let snapshot = service.get_fund_snapshot(&room.id, &admin).await.unwrap();
    assert_eq!(snapshot.total_contributions, Decimal::ZERO);
    assert_eq!(snapshot.current_balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_submit_contribution_rejects_bad_amounts() {
    let service = create_test_service();
    let (_, member, room) = setup_room(&service).await;

    for amount in [dec!(0), dec!(-10.00), dec!(1.005), dec!(2000000)] {
        let result = service.submit_contribution(&room.id, &member, amount, None).await;
        assert!(
            matches!(result, Err(RoomFundError::InvalidInput(_, _))),
            "amount {} should be rejected",
            amount
        );
    }
}

#[tokio::test]
async fn test_submit_contribution_requires_membership() {
    let service = create_test_service();
    let (_, _, room) = setup_room(&service).await;
    let outsider = register_user(&service, "Meera", "meera@example.com").await;

    let result = service.submit_contribution(&room.id, &outsider, dec!(50.00), None).await;
    assert!(matches!(result, Err(RoomFundError::NotRoomMember(_))));
}

#[tokio::test]
async fn test_submit_reimbursement_requires_notes_and_merchant_upi() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;

    let missing_upi = service
        .submit_reimbursement(
            &room.id,
            &member,
            dec!(200.00),
            "Paid the electrician".to_string(),
            String::new(),
        )
        .await;
    assert!(matches!(missing_upi, Err(RoomFundError::InvalidInput(_, _))));

    let missing_notes = service
        .submit_reimbursement(
            &room.id,
            &member,
            dec!(200.00),
            String::new(),
            "electrician@upi".to_string(),
        )
        .await;
    assert!(matches!(missing_notes, Err(RoomFundError::InvalidInput(_, _))));

    let malformed_upi = service
        .submit_reimbursement(
            &room.id,
            &member,
            dec!(200.00),
            "Paid the electrician".to_string(),
            "not-a-vpa".to_string(),
        )
        .await;
    assert!(matches!(malformed_upi, Err(RoomFundError::InvalidInput(_, _))));

    // No record was persisted by any failed submission
    let transactions = service.list_transactions(&room.id, None, &admin).await.unwrap();
    assert!(transactions.is_empty());
}

#[tokio::test]
async fn test_resolve_transaction_confirm() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;
    let tx = service
        .submit_contribution(&room.id, &member, dec!(500.00), None)
        .await
        .unwrap();

    let resolved = service
        .resolve_transaction(&room.id, &tx.id, Resolution::Confirmed, &admin)
        .await
        .unwrap();

    assert_eq!(resolved.status, TransactionStatus::Confirmed);
    assert!(resolved.updated_at >= tx.updated_at);

    let snapshot = service.get_fund_snapshot(&room.id, &admin).await.unwrap();
    assert_eq!(snapshot.total_contributions, dec!(500.00));
    assert_eq!(snapshot.current_balance, dec!(500.00));
}

#[tokio::test]
async fn test_resolve_transaction_requires_admin() {
    let service = create_test_service();
    let (_, member, room) = setup_room(&service).await;
    let tx = service
        .submit_contribution(&room.id, &member, dec!(500.00), None)
        .await
        .unwrap();

    let result = service
        .resolve_transaction(&room.id, &tx.id, Resolution::Confirmed, &member)
        .await;
    assert!(matches!(result, Err(RoomFundError::NotRoomAdmin(_))));
}

#[tokio::test]
async fn test_resolve_is_not_idempotent() {
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
    let before = service.get_fund_snapshot(&room.id, &admin).await.unwrap();

    // Second resolution must fail, whatever the decision
    let again = service
        .resolve_transaction(&room.id, &tx.id, Resolution::Rejected, &admin)
        .await;
    assert!(matches!(again, Err(RoomFundError::TransactionAlreadyResolved(_))));

    let after = service.get_fund_snapshot(&room.id, &admin).await.unwrap();
    assert_eq!(after.total_contributions, before.total_contributions);
    assert_eq!(after.current_balance, before.current_balance);
}

#[tokio::test]
async fn test_resolve_through_wrong_room_is_not_found() {
    let service = create_test_service();
    let (_, member, room) = setup_room(&service).await;
    let other_admin = register_user(&service, "Meera", "meera@example.com").await;
    let other_room = service.create_room("Trip to Goa".to_string(), &other_admin).await.unwrap();

    let tx = service
        .submit_contribution(&room.id, &member, dec!(500.00), None)
        .await
        .unwrap();

    let result = service
        .resolve_transaction(&other_room.id, &tx.id, Resolution::Confirmed, &other_admin)
        .await;
    assert!(matches!(result, Err(RoomFundError::TransactionNotFound(_))));

    // The transaction is untouched
    let transactions = service.list_transactions(&room.id, None, &member).await.unwrap();
    assert_eq!(transactions[0].status, TransactionStatus::Pending);
}

#[tokio::test]
async fn test_concurrent_resolutions_exactly_one_wins() {
    let service = Arc::new(create_test_service());
    let (admin, member, room) = setup_room(&service).await;
    let tx = service
        .submit_contribution(&room.id, &member, dec!(150.00), None)
        .await
        .unwrap();

    let confirm = {
        let service = Arc::clone(&service);
        let (room_id, tx_id, admin) = (room.id.clone(), tx.id.clone(), admin.clone());
        tokio::spawn(async move {
            service
                .resolve_transaction(&room_id, &tx_id, Resolution::Confirmed, &admin)
                .await
        })
    };
    let reject = {
        let service = Arc::clone(&service);
        let (room_id, tx_id, admin) = (room.id.clone(), tx.id.clone(), admin.clone());
        tokio::spawn(async move {
            service
                .resolve_transaction(&room_id, &tx_id, Resolution::Rejected, &admin)
                .await
        })
    };

    let results = [confirm.await.unwrap(), reject.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = results.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(loser, Err(RoomFundError::TransactionAlreadyResolved(_))));

    // The snapshot reflects the winning decision only
    let transactions = service.list_transactions(&room.id, None, &admin).await.unwrap();
    let final_status = transactions.iter().find(|t| t.id == tx.id).unwrap().status;
    let snapshot = service.get_fund_snapshot(&room.id, &admin).await.unwrap();
    match final_status {
        TransactionStatus::Confirmed => assert_eq!(snapshot.total_contributions, dec!(150.00)),
        TransactionStatus::Rejected => assert_eq!(snapshot.total_contributions, Decimal::ZERO),
        TransactionStatus::Pending => panic!("transaction left unresolved"),
    }
}

#[tokio::test]
async fn test_list_transactions_filters_by_status() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;

    let first = service
        .submit_contribution(&room.id, &member, dec!(100.00), None)
        .await
        .unwrap();
    service
        .submit_contribution(&room.id, &member, dec!(50.00), None)
        .await
        .unwrap();
    service
        .resolve_transaction(&room.id, &first.id, Resolution::Confirmed, &admin)
        .await
        .unwrap();

    let pending = service
        .list_transactions(&room.id, Some(TransactionStatus::Pending), &member)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].amount, dec!(50.00));

    let confirmed = service
        .list_transactions(&room.id, Some(TransactionStatus::Confirmed), &member)
        .await
        .unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].id, first.id);

    let all = service.list_transactions(&room.id, None, &member).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_mark_reimbursed_creates_linked_payment() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;
    let tx = service
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
        .resolve_transaction(&room.id, &tx.id, Resolution::Confirmed, &admin)
        .await
        .unwrap();

    let (original, payment) = service
        .mark_reimbursed(&room.id, &tx.id, "ravi@upi", &admin)
        .await
        .unwrap();

    assert!(original.reimbursed);
    assert_eq!(original.member_upi_id.as_deref(), Some("ravi@upi"));
    assert_eq!(original.paid_by.as_deref(), Some(admin.id.as_str()));

    assert_eq!(payment.kind, TransactionType::ReimbursementPayment);
    assert_eq!(payment.status, TransactionStatus::Confirmed);
    assert_eq!(payment.amount, dec!(200.00));
    assert_eq!(payment.reference_transaction_id.as_deref(), Some(tx.id.as_str()));
}

#[tokio::test]
async fn test_mark_reimbursed_twice() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;
    let tx = service
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
        .resolve_transaction(&room.id, &tx.id, Resolution::Confirmed, &admin)
        .await
        .unwrap();
    service
        .mark_reimbursed(&room.id, &tx.id, "ravi@upi", &admin)
        .await
        .unwrap();

    let result = service.mark_reimbursed(&room.id, &tx.id, "ravi@upi", &admin).await;
    assert!(matches!(result, Err(RoomFundError::AlreadyReimbursed(_))));
}

#[tokio::test]
async fn test_mark_reimbursed_requires_confirmed_reimbursement() {
    let service = create_test_service();
    let (admin, member, room) = setup_room(&service).await;

    // Still pending
    let pending = service
        .submit_reimbursement(
            &room.id,
            &member,
            dec!(200.00),
            "Paid the electrician".to_string(),
            "electrician@upi".to_string(),
        )
        .await
        .unwrap();
    let result = service.mark_reimbursed(&room.id, &pending.id, "ravi@upi", &admin).await;
    assert!(matches!(result, Err(RoomFundError::ReimbursementNotConfirmed(_))));

    // Wrong type
    let contribution = service
        .submit_contribution(&room.id, &member, dec!(100.00), None)
        .await
        .unwrap();
    service
        .resolve_transaction(&room.id, &contribution.id, Resolution::Confirmed, &admin)
        .await
        .unwrap();
    let result = service
        .mark_reimbursed(&room.id, &contribution.id, "ravi@upi", &admin)
        .await;
    assert!(matches!(result, Err(RoomFundError::NotAReimbursement(_))));
}
