//! The node store contract.

use async_trait::async_trait;
use uuid::Uuid;

use teamdrive_core::result::AppResult;
use teamdrive_entity::{Node, NodeFilter, NodeSort, NodeUpdate, UpdateOutcome};

/// Persistent collection of node records.
///
/// No multi-row transactional guarantee is offered: `update_many` and
/// `delete_many` may be partially applied if the backend fails midway, and
/// callers must tolerate that. Each individual row is written atomically.
#[async_trait]
pub trait NodeStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new node. Fails with `Conflict` on a duplicate id or storage key.
    async fn create(&self, node: &Node) -> AppResult<Node>;

    /// Find a node by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Node>>;

    /// Find the file holding a storage key.
    async fn find_by_storage_key(&self, storage_key: &str) -> AppResult<Option<Node>>;

    /// List direct children of a folder, in no particular order.
    async fn find_by_parent(&self, parent_id: Uuid) -> AppResult<Vec<Node>>;

    /// Query nodes with a filter, order, offset and optional limit.
    async fn find(
        &self,
        filter: &NodeFilter,
        sort: NodeSort,
        skip: u64,
        limit: Option<u64>,
    ) -> AppResult<Vec<Node>>;

    /// Count nodes matching a filter.
    async fn count(&self, filter: &NodeFilter) -> AppResult<u64>;

    /// Patch one node. Returns the updated node, or `None` if it does not exist.
    async fn update_one(&self, id: Uuid, update: &NodeUpdate) -> AppResult<Option<Node>>;

    /// Patch every node matching a filter.
    async fn update_many(&self, filter: &NodeFilter, update: &NodeUpdate)
    -> AppResult<UpdateOutcome>;

    /// Delete nodes by ID. Returns the number of rows removed.
    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64>;
}
