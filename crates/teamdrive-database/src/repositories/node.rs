//! PostgreSQL node repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use teamdrive_core::error::{AppError, ErrorKind};
use teamdrive_core::result::AppResult;
use teamdrive_entity::{
    Node, NodeFilter, NodeSort, NodeStatus, NodeUpdate, ParentScope, ProjectScope, UpdateOutcome,
    Visibility,
};

use crate::store::NodeStore;

/// Repository for the `nodes` table.
#[derive(Debug, Clone)]
pub struct PgNodeStore {
    pool: PgPool,
}

impl PgNodeStore {
    /// Create a new node repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One column assignment of a [`NodeUpdate`].
enum Assignment {
    Text(Option<String>),
    Uuid(Option<Uuid>),
    Uuids(Vec<Uuid>),
    Status(NodeStatus),
    Visibility(Visibility),
    BigInt(i64),
}

impl Assignment {
    fn push_value(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::Text(v) => qb.push_bind(v.clone()),
            Self::Uuid(v) => qb.push_bind(*v),
            Self::Uuids(v) => qb.push_bind(v.clone()),
            Self::Status(v) => qb.push_bind(*v),
            Self::Visibility(v) => qb.push_bind(*v),
            Self::BigInt(v) => qb.push_bind(*v),
        };
    }
}

fn assignments(update: &NodeUpdate) -> Vec<(&'static str, Assignment)> {
    let mut out = Vec::new();
    if let Some(v) = &update.original_name {
        out.push(("original_name", Assignment::Text(Some(v.clone()))));
    }
    if let Some(v) = update.status {
        out.push(("status", Assignment::Status(v)));
    }
    if let Some(v) = update.parent_id {
        out.push(("parent_id", Assignment::Uuid(Some(v))));
    }
    if let Some(v) = update.visibility {
        out.push(("visibility", Assignment::Visibility(v)));
    }
    if let Some(v) = &update.allowed_user_ids {
        out.push(("allowed_user_ids", Assignment::Uuids(v.clone())));
    }
    if let Some(v) = update.team_id {
        out.push(("team_id", Assignment::Uuid(v)));
    }
    if let Some(v) = update.project_id {
        out.push(("project_id", Assignment::Uuid(v)));
    }
    if let Some(v) = &update.mimetype {
        out.push(("mimetype", Assignment::Text(v.clone())));
    }
    if let Some(v) = update.size_bytes {
        out.push(("size_bytes", Assignment::BigInt(v)));
    }
    if let Some(v) = &update.pending_new_name {
        out.push(("pending_new_name", Assignment::Text(v.clone())));
    }
    out
}

fn push_set_clause(qb: &mut QueryBuilder<'_, Postgres>, set: &[(&'static str, Assignment)]) {
    qb.push(" SET updated_at = NOW()");
    for (column, value) in set {
        qb.push(", ").push(*column).push(" = ");
        value.push_value(qb);
    }
}

fn push_where_clause(qb: &mut QueryBuilder<'_, Postgres>, filter: &NodeFilter) {
    qb.push(" WHERE TRUE");
    if let Some(ids) = &filter.ids {
        qb.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
    }
    if let Some(owner_id) = filter.owner_id {
        qb.push(" AND owner_id = ").push_bind(owner_id);
    }
    match filter.project {
        ProjectScope::Any => {}
        ProjectScope::Personal => {
            qb.push(" AND project_id IS NULL");
        }
        ProjectScope::Project(id) => {
            qb.push(" AND project_id = ").push_bind(id);
        }
    }
    match filter.parent {
        ParentScope::Any => {}
        ParentScope::Root => {
            qb.push(" AND parent_id IS NULL");
        }
        ParentScope::Folder(id) => {
            qb.push(" AND parent_id = ").push_bind(id);
        }
    }
    if let Some(node_type) = filter.node_type {
        qb.push(" AND node_type = ").push_bind(node_type);
    }
    if let Some(access) = filter.access {
        qb.push(" AND (owner_id = ")
            .push_bind(access.actor_id)
            .push(" OR (visibility = ")
            .push_bind(Visibility::Team)
            .push(" AND team_id = ")
            .push_bind(access.team_id)
            .push(") OR (visibility = ")
            .push_bind(Visibility::Specific)
            .push(" AND ")
            .push_bind(access.actor_id)
            .push(" = ANY(allowed_user_ids)))");
    }
}

fn push_order_clause(qb: &mut QueryBuilder<'_, Postgres>, sort: NodeSort) {
    match sort {
        NodeSort::FoldersFirstNewest => {
            qb.push(" ORDER BY (node_type = 'folder') DESC, created_at DESC, id DESC")
        }
    };
}

fn map_sqlx_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let kind = match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => ErrorKind::Conflict,
            _ => ErrorKind::Database,
        };
        AppError::with_source(kind, context, e)
    }
}

#[async_trait]
impl NodeStore for PgNodeStore {
    async fn create(&self, node: &Node) -> AppResult<Node> {
        sqlx::query_as::<_, Node>(
            r#"INSERT INTO nodes (id, node_type, parent_id, storage_key, original_name, mimetype,
                size_bytes, owner_id, project_id, team_id, visibility, allowed_user_ids, status,
                pending_new_name, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
               RETURNING *"#,
        )
        .bind(node.id)
        .bind(node.node_type)
        .bind(node.parent_id)
        .bind(&node.storage_key)
        .bind(&node.original_name)
        .bind(&node.mimetype)
        .bind(node.size_bytes)
        .bind(node.owner_id)
        .bind(node.project_id)
        .bind(node.team_id)
        .bind(node.visibility)
        .bind(&node.allowed_user_ids)
        .bind(node.status)
        .bind(&node.pending_new_name)
        .bind(node.created_at)
        .bind(node.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error("Failed to create node"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>("SELECT * FROM nodes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error("Failed to find node"))
    }

    async fn find_by_storage_key(&self, storage_key: &str) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>("SELECT * FROM nodes WHERE storage_key = $1")
            .bind(storage_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error("Failed to find node by storage key"))
    }

    async fn find_by_parent(&self, parent_id: Uuid) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>("SELECT * FROM nodes WHERE parent_id = $1")
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error("Failed to list children"))
    }

    async fn find(
        &self,
        filter: &NodeFilter,
        sort: NodeSort,
        skip: u64,
        limit: Option<u64>,
    ) -> AppResult<Vec<Node>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM nodes");
        push_where_clause(&mut qb, filter);
        push_order_clause(&mut qb, sort);
        if let Some(limit) = limit {
            qb.push(" LIMIT ").push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        qb.push(" OFFSET ").push_bind(i64::try_from(skip).unwrap_or(i64::MAX));

        qb.build_query_as::<Node>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error("Failed to query nodes"))
    }

    async fn count(&self, filter: &NodeFilter) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM nodes");
        push_where_clause(&mut qb, filter);

        let total: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error("Failed to count nodes"))?;
        Ok(total as u64)
    }

    async fn update_one(&self, id: Uuid, update: &NodeUpdate) -> AppResult<Option<Node>> {
        let set = assignments(update);
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE nodes");
        push_set_clause(&mut qb, &set);
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<Node>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error("Failed to update node"))
    }

    async fn update_many(
        &self,
        filter: &NodeFilter,
        update: &NodeUpdate,
    ) -> AppResult<UpdateOutcome> {
        let set = assignments(update);

        // Rows are locked by the matched CTE, so each row receives the whole
        // assignment list of exactly one statement.
        let mut qb = QueryBuilder::<Postgres>::new("WITH matched AS (SELECT id FROM nodes");
        push_where_clause(&mut qb, filter);
        qb.push(" FOR UPDATE), changed AS (UPDATE nodes");
        push_set_clause(&mut qb, &set);
        qb.push(" WHERE id IN (SELECT id FROM matched) AND (FALSE");
        for (column, value) in &set {
            qb.push(" OR ").push(*column).push(" IS DISTINCT FROM ");
            value.push_value(&mut qb);
        }
        qb.push(") RETURNING id) SELECT (SELECT COUNT(*) FROM matched), (SELECT COUNT(*) FROM changed)");

        let (matched, modified) = qb
            .build_query_as::<(i64, i64)>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error("Failed to update nodes"))?;

        debug!(matched, modified, "Bulk node update applied");
        Ok(UpdateOutcome {
            matched: matched as u64,
            modified: modified as u64,
        })
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM nodes WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error("Failed to delete nodes"))?;
        Ok(result.rows_affected())
    }
}
