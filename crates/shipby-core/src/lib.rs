pub mod config;
pub mod directive;
pub mod error;
pub mod io;
pub mod reconcile;
pub mod types;
pub mod window;

pub use directive::extract_delivery_date;
pub use error::{Result, ShipByError};
pub use reconcile::reconcile;
pub use types::{Decision, OrderSnapshot, StagingReason};
pub use window::SyncWindow;
