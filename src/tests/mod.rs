mod fund_tests;
mod transaction_tests;
mod user_tests;

use crate::core::models::room::Room;
use crate::core::models::user::User;
use crate::core::services::RoomFundService;
use crate::infrastructure::fund::in_memory::InMemoryFundStore;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use uuid::Uuid;

pub type TestService = RoomFundService<InMemoryLogging, InMemoryStorage, InMemoryFundStore>;

pub fn create_test_service() -> TestService {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let fund_store = InMemoryFundStore::new();
    RoomFundService::new(storage, logging, fund_store, "test-secret".to_string())
}

pub async fn register_user(service: &TestService, name: &str, email: &str) -> User {
    service
        .add_user(User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: "correct horse battery".to_string(),
        })
        .await
        .unwrap()
}

/// Room with an admin and one confirmed member, ready to transact.
pub async fn setup_room(service: &TestService) -> (User, User, Room) {
    let admin = register_user(service, "Asha", "asha@example.com").await;
    let member = register_user(service, "Ravi", "ravi@example.com").await;
    let room = service.create_room("Flat 4B".to_string(), &admin).await.unwrap();
    service.join_room(&room.invite_code, &member).await.unwrap();
    service.confirm_member(&room.id, &member.id, &admin).await.unwrap();
    let room = service.get_room(&room.id).await.unwrap().unwrap();
    (admin, member, room)
}
