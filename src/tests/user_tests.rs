use crate::core::errors::RoomFundError;
use crate::core::models::user::User;
use crate::tests::create_test_service;
use uuid::Uuid;

#[tokio::test]
async fn test_add_user() {
    let service = create_test_service();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        password: "correct horse battery".to_string(),
    };
    let added_user = service.add_user(user.clone()).await.unwrap();
    assert_eq!(added_user.id, user.id);
    assert_eq!(added_user.email, user.email);
    // Stored password is a bcrypt hash, never the plaintext
    assert_ne!(added_user.password, user.password);
}

#[tokio::test]
async fn test_add_user_duplicate_email() {
    let service = create_test_service();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        password: "correct horse battery".to_string(),
    };
    service.add_user(user.clone()).await.unwrap();

    let duplicate = User {
        id: Uuid::new_v4().to_string(),
        ..user
    };
    let result = service.add_user(duplicate).await;
    assert!(matches!(result, Err(RoomFundError::EmailAlreadyRegistered(_))));
}

#[tokio::test]
async fn test_add_user_invalid_email() {
    let service = create_test_service();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: "Test User".to_string(),
        email: "invalid".to_string(),
        password: "correct horse battery".to_string(),
    };
    let result = service.add_user(user).await;
    assert!(matches!(result, Err(RoomFundError::InvalidEmail(_))));
}

#[tokio::test]
async fn test_add_user_empty_password() {
    let service = create_test_service();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        password: String::new(),
    };
    let result = service.add_user(user).await;
    assert!(matches!(result, Err(RoomFundError::InvalidInput(_, _))));
}

#[tokio::test]
async fn test_authenticate_and_validate_token() {
    let service = create_test_service();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        password: "correct horse battery".to_string(),
    };
    service.add_user(user.clone()).await.unwrap();

    let token = service
        .authenticate("test@example.com", "correct horse battery")
        .await
        .unwrap();
    let claims = service.validate_token(&token).unwrap();
    assert_eq!(claims.sub, user.id);
}

#[tokio::test]
async fn test_authenticate_wrong_password() {
    let service = create_test_service();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        password: "correct horse battery".to_string(),
    };
    service.add_user(user).await.unwrap();

    let result = service.authenticate("test@example.com", "wrong").await;
    assert!(matches!(result, Err(RoomFundError::InvalidCredentials)));
}
