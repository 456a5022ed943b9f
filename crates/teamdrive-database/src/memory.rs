//! In-memory node store.
//!
//! Used by tests and single-process demos. Every write holds the map's
//! write lock for its whole duration, so row updates are atomic just like
//! the PostgreSQL store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use teamdrive_core::error::AppError;
use teamdrive_core::result::AppResult;
use teamdrive_entity::{Node, NodeFilter, NodeSort, NodeUpdate, UpdateOutcome};

use crate::store::NodeStore;

/// Node store backed by a `HashMap` behind a tokio `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    nodes: RwLock<HashMap<Uuid, Node>>,
}

impl MemoryNodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every stored node, in no particular order.
    pub async fn all(&self) -> Vec<Node> {
        self.nodes.read().await.values().cloned().collect()
    }

    /// Check whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

#[async_trait]
impl NodeStore for MemoryNodeStore {
    async fn create(&self, node: &Node) -> AppResult<Node> {
        let mut nodes = self.nodes.write().await;
        if nodes.contains_key(&node.id) {
            return Err(AppError::conflict(format!("Node {} already exists", node.id)));
        }
        if let Some(key) = &node.storage_key {
            if nodes
                .values()
                .any(|n| n.storage_key.as_deref() == Some(key.as_str()))
            {
                return Err(AppError::conflict(format!(
                    "Storage key '{key}' already in use"
                )));
            }
        }
        nodes.insert(node.id, node.clone());
        Ok(node.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Node>> {
        Ok(self.nodes.read().await.get(&id).cloned())
    }

    async fn find_by_storage_key(&self, storage_key: &str) -> AppResult<Option<Node>> {
        Ok(self
            .nodes
            .read()
            .await
            .values()
            .find(|n| n.storage_key.as_deref() == Some(storage_key))
            .cloned())
    }

    async fn find_by_parent(&self, parent_id: Uuid) -> AppResult<Vec<Node>> {
        Ok(self
            .nodes
            .read()
            .await
            .values()
            .filter(|n| n.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        filter: &NodeFilter,
        sort: NodeSort,
        skip: u64,
        limit: Option<u64>,
    ) -> AppResult<Vec<Node>> {
        let mut matched: Vec<Node> = self
            .nodes
            .read()
            .await
            .values()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        matched.sort_by(|a, b| sort.compare(a, b));

        let page = matched
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX));
        Ok(match limit {
            Some(limit) => page.take(limit as usize).collect(),
            None => page.collect(),
        })
    }

    async fn count(&self, filter: &NodeFilter) -> AppResult<u64> {
        Ok(self
            .nodes
            .read()
            .await
            .values()
            .filter(|n| filter.matches(n))
            .count() as u64)
    }

    async fn update_one(&self, id: Uuid, update: &NodeUpdate) -> AppResult<Option<Node>> {
        let mut nodes = self.nodes.write().await;
        Ok(nodes.get_mut(&id).map(|node| {
            update.apply(node);
            node.clone()
        }))
    }

    async fn update_many(
        &self,
        filter: &NodeFilter,
        update: &NodeUpdate,
    ) -> AppResult<UpdateOutcome> {
        let mut nodes = self.nodes.write().await;
        let mut outcome = UpdateOutcome::default();
        for node in nodes.values_mut().filter(|n| filter.matches(n)) {
            outcome.matched += 1;
            if update.apply(node) {
                outcome.modified += 1;
            }
        }
        Ok(outcome)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        let mut nodes = self.nodes.write().await;
        Ok(ids.iter().filter(|id| nodes.remove(*id).is_some()).count() as u64)
    }
}
