//! Level-synchronous descendant collection.
//!
//! The walk keeps an explicit frontier of folder ids for one depth level.
//! Each level issues one `find_by_parent` query per frontier folder, at
//! most `concurrency` in flight, and the child folders found become the
//! next frontier. Depth is bounded by the tree, not by the call stack.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use teamdrive_auth::acl::can_see;
use teamdrive_core::result::AppResult;
use teamdrive_database::NodeStore;
use teamdrive_entity::{MemberRole, Node};

/// Everything under (and including) a set of roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subtree {
    /// Every node id, roots first, each once.
    pub ids: Vec<Uuid>,
    /// Storage keys of every file in the subtree.
    pub storage_keys: Vec<String>,
}

/// One file of a zip plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipEntry {
    /// Blob to stream.
    pub storage_key: String,
    /// Path inside the archive.
    pub zip_path: String,
}

/// Walks the node tree breadth-first with bounded fan-out.
#[derive(Clone)]
pub struct TreeWalker {
    nodes: Arc<dyn NodeStore>,
    concurrency: usize,
}

impl std::fmt::Debug for TreeWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWalker")
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl TreeWalker {
    /// Creates a new walker.
    pub fn new(nodes: Arc<dyn NodeStore>, concurrency: usize) -> Self {
        Self {
            nodes,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch the children of every folder in `frontier`.
    async fn fetch_level(&self, frontier: &[Uuid]) -> AppResult<Vec<(Uuid, Vec<Node>)>> {
        stream::iter(frontier.iter().copied())
            .map(|folder_id| async move {
                let children = self.nodes.find_by_parent(folder_id).await?;
                Ok::<_, teamdrive_core::AppError>((folder_id, children))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await
    }

    /// Collect every node under `roots`, roots included, without any
    /// permission check on descendants.
    pub async fn collect_subtree(&self, roots: &[Node]) -> AppResult<Subtree> {
        let mut subtree = Subtree::default();
        let mut seen = HashSet::new();
        let mut frontier = Vec::new();

        let mut record = |node: &Node, subtree: &mut Subtree, frontier: &mut Vec<Uuid>| {
            if !seen.insert(node.id) {
                return;
            }
            subtree.ids.push(node.id);
            if node.is_folder() {
                frontier.push(node.id);
            } else if let Some(key) = &node.storage_key {
                subtree.storage_keys.push(key.clone());
            }
        };

        for root in roots {
            record(root, &mut subtree, &mut frontier);
        }

        let mut depth = 0usize;
        let mut queries = 0usize;
        while !frontier.is_empty() {
            let level = self.fetch_level(&frontier).await?;
            queries += frontier.len();
            frontier.clear();
            for (_, children) in level {
                for child in &children {
                    record(child, &mut subtree, &mut frontier);
                }
            }
            depth += 1;
        }

        debug!(
            roots = roots.len(),
            nodes = subtree.ids.len(),
            depth,
            queries,
            "Collected subtree"
        );
        Ok(subtree)
    }

    /// Build zip entries for `roots`, skipping descendants the actor may
    /// not see. Owners and admins of the team see everything.
    ///
    /// Roots are assumed to be already permission-checked. A root file is
    /// placed at the archive root under its own name; a root folder's
    /// content is placed under the folder's name.
    pub async fn collect_visible(
        &self,
        roots: &[Node],
        actor_id: Uuid,
        role: Option<MemberRole>,
    ) -> AppResult<Vec<ZipEntry>> {
        let mut entries = Vec::new();
        let mut prefixes: HashMap<Uuid, String> = HashMap::new();
        let mut frontier = Vec::new();
        let mut skipped = 0usize;

        for root in roots {
            if root.is_folder() {
                if prefixes.insert(root.id, root.original_name.clone()).is_none() {
                    frontier.push(root.id);
                }
            } else if let Some(key) = &root.storage_key {
                entries.push(ZipEntry {
                    storage_key: key.clone(),
                    zip_path: root.original_name.clone(),
                });
            }
        }

        while !frontier.is_empty() {
            let level = self.fetch_level(&frontier).await?;
            frontier.clear();
            for (parent_id, children) in level {
                let prefix = prefixes.get(&parent_id).cloned().unwrap_or_default();
                for child in children {
                    if !can_see(&child, actor_id, role) {
                        // A hidden folder hides its whole subtree, visible descendants included.
                        skipped += 1;
                        continue;
                    }
                    let path = format!("{prefix}/{}", child.original_name);
                    if child.is_folder() {
                        if prefixes.insert(child.id, path).is_none() {
                            frontier.push(child.id);
                        }
                    } else if let Some(key) = child.storage_key {
                        entries.push(ZipEntry {
                            storage_key: key,
                            zip_path: path,
                        });
                    }
                }
            }
        }

        entries.sort_by(|a, b| a.zip_path.cmp(&b.zip_path));
        debug!(
            actor_id = %actor_id,
            entries = entries.len(),
            skipped,
            "Collected visible files"
        );
        Ok(entries)
    }
}
