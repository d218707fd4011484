pub mod coils;
pub mod error;
pub mod health;
pub mod stats;

pub use error::AppError;
