//! Stock health and analysis engine
//!
//! Pure functions over snapshot slices. Nothing in here reads a clock or a
//! store; callers pass `now` and the records explicitly.

mod aggregation;
mod alerts;
mod assignment;
mod export;
mod health;
mod ledger;
mod status;
mod trend;

pub use aggregation::*;
pub use alerts::*;
pub use assignment::*;
pub use export::*;
pub use health::*;
pub use ledger::*;
pub use status::*;
pub use trend::*;
