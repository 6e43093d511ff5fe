//! HTTP handlers for the Coffee Inventory API

pub mod analysis;
pub mod catalog;
pub mod health;
pub mod location_types;
pub mod locations;
pub mod stock;
pub mod transactions;

pub use analysis::*;
pub use catalog::*;
pub use health::*;
pub use location_types::*;
pub use locations::*;
pub use stock::*;
pub use transactions::*;
