//! Domain models for the Coffee Inventory Platform

mod catalog;
mod item;
mod location;
mod stock;
mod transaction;

pub use catalog::*;
pub use item::*;
pub use location::*;
pub use stock::*;
pub use transaction::*;
