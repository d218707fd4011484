mod error;
mod operations;
mod types;
mod validation;

pub use error::CoilError;
pub use operations::CoilService;
pub use types::{AggregateStats, Coil, CoilPatch, DailyTotals, DeleteMode, NewCoil};
pub use validation::{validate_for_create, validate_for_update};
