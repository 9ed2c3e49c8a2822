use crate::core::errors::RoomFundError;
use crate::core::models::fund::FundSnapshot;
use async_trait::async_trait;

/// Denormalized per-room fund totals. The snapshot is always written whole:
/// `upsert` replaces whatever was there, it never patches fields.
#[async_trait]
pub trait FundStore: Send + Sync {
    async fn get(&self, room_id: &str) -> Result<Option<FundSnapshot>, RoomFundError>;
    async fn upsert(&self, snapshot: FundSnapshot) -> Result<(), RoomFundError>;
}

pub mod in_memory;
