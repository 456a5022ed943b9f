//! Consumer side of inbound status changes.

use async_trait::async_trait;

use teamdrive_core::events::StatusChangedEvent;
use teamdrive_core::result::AppResult;

/// Applies an external status change to the metadata store.
#[async_trait]
pub trait StatusChangeHandler: Send + Sync + 'static {
    /// Handle one decoded event.
    async fn handle_status_changed(&self, event: StatusChangedEvent) -> AppResult<()>;
}
