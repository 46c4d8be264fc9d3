use async_trait::async_trait;
use shipby_core::SyncWindow;

use crate::types::{Sale, SaleListEntry, SaleUpdate};
use crate::Result;

/// The three sale operations reconciliation needs.
///
/// [`crate::DearClient`] talks to the real API; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait SaleGateway: Send + Sync {
    /// Sales created since `window.created_since` and updated since
    /// `window.updated_since` at `location_id`. Unfiltered by channel.
    async fn list_sales(&self, window: &SyncWindow, location_id: &str) -> Result<Vec<SaleListEntry>>;

    async fn get_sale(&self, id: &str) -> Result<Sale>;

    async fn update_sale(&self, update: &SaleUpdate) -> Result<()>;
}
