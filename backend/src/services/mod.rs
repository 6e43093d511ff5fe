//! Business logic services for the Coffee Inventory server

pub mod analysis;
pub mod catalog;
pub mod location_types;
pub mod stock;

pub use analysis::{AnalysisService, TransactionLogView};
pub use catalog::CatalogService;
pub use location_types::LocationTypeService;
pub use stock::{AssignItemsInput, AssignmentOutcome, CopyAssignmentsInput, StockService, StockUpdate};
