//! `dear-client`: async access to the DEAR (Cin7 Core) sale API.
//!
//! Only the calls the ship-by reconciler needs are covered: listing recent
//! sales, fetching one sale, and writing back its ship-by date and note.

pub mod client;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::{Credentials, DearClient};
pub use error::DearError;
pub use gateway::SaleGateway;
pub use types::{Sale, SaleListEntry, SaleListPage, SaleUpdate};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, DearError>;
