use crate::core::errors::RoomFundError;
use crate::core::models::fund::FundSnapshot;
use crate::infrastructure::fund::FundStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryFundStore {
    snapshots: Arc<RwLock<HashMap<String, FundSnapshot>>>,
}

impl InMemoryFundStore {
    pub fn new() -> Self {
        InMemoryFundStore {
            snapshots: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryFundStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FundStore for InMemoryFundStore {
    async fn get(&self, room_id: &str) -> Result<Option<FundSnapshot>, RoomFundError> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.get(room_id).cloned())
    }

    async fn upsert(&self, snapshot: FundSnapshot) -> Result<(), RoomFundError> {
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(snapshot.room_id.clone(), snapshot);
        Ok(())
    }
}
