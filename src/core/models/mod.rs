pub mod audit;
pub mod fund;
pub mod room;
pub mod transaction;
pub mod user;

pub use audit::{AppLog, RoomAudit};
pub use fund::FundSnapshot;
pub use room::{MemberStatus, Role, Room, RoomMember};
pub use transaction::{Resolution, Transaction, TransactionStatus, TransactionType};
pub use user::User;
