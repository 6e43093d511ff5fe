//! Shared types, models and the stock analysis engine for the Coffee Inventory Platform
//!
//! This crate contains the domain records shared between the backend, the
//! browser dashboard (via WASM), and the pure computations that turn a
//! snapshot of those records into dashboard, alert and analysis view models.

pub mod analysis;
pub mod error;
pub mod format;
pub mod models;
pub mod snapshot;
pub mod types;
pub mod validation;

pub use analysis::*;
pub use error::{InventoryError, InventoryResult};
pub use format::*;
pub use models::*;
pub use snapshot::*;
pub use types::*;
pub use validation::*;
