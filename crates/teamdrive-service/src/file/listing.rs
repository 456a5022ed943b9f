//! Scoped listing and lookup.

use std::sync::Arc;

use tracing::debug;
use validator::Validate;

use teamdrive_auth::PermissionResolver;
use teamdrive_core::result::AppResult;
use teamdrive_core::types::pagination::PageResponse;
use teamdrive_database::NodeStore;
use teamdrive_entity::{Node, NodeSort, ParentScope};

use super::requests::{ListFilesRequest, LookupRequest};
use crate::context::RequestContext;
use crate::scope::listing_filter;

/// Lists what an actor may see within a scope.
#[derive(Clone)]
pub struct ListingService {
    nodes: Arc<dyn NodeStore>,
    resolver: Arc<PermissionResolver>,
}

impl std::fmt::Debug for ListingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingService").finish()
    }
}

impl ListingService {
    /// Creates a new listing service.
    pub fn new(nodes: Arc<dyn NodeStore>, resolver: Arc<PermissionResolver>) -> Self {
        Self { nodes, resolver }
    }

    /// One page of the children of `parent_id` (or of the root), folders
    /// first, newest first.
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        req: ListFilesRequest,
    ) -> AppResult<PageResponse<Node>> {
        req.validate()?;
        let scope = req.scope();
        scope.require_complete()?;
        let role = self.resolver.resolve_role(ctx.user_id, &scope).await?;
        let page = req.page_request();

        let filter = listing_filter(ctx.user_id, &scope, role)
            .with_parent(ParentScope::from_parent(req.parent_id));
        let total = self.nodes.count(&filter).await?;
        let data = self
            .nodes
            .find(&filter, NodeSort::FoldersFirstNewest, page.skip(), Some(page.limit))
            .await?;

        debug!(
            actor_id = %ctx.user_id,
            parent_id = ?req.parent_id,
            total,
            returned = data.len(),
            "Listed nodes"
        );
        Ok(PageResponse::new(data, page, total))
    }

    /// The requested nodes that pass the listing filter. Inaccessible ids
    /// are silently omitted.
    pub async fn get_many_by_ids(
        &self,
        ctx: &RequestContext,
        req: LookupRequest,
    ) -> AppResult<Vec<Node>> {
        req.validate()?;
        req.scope.require_complete()?;
        let role = self.resolver.resolve_role(ctx.user_id, &req.scope).await?;
        let filter = listing_filter(ctx.user_id, &req.scope, role).with_ids(req.ids);
        self.nodes
            .find(&filter, NodeSort::FoldersFirstNewest, 0, None)
            .await
    }
}
