pub mod activity;
pub mod appointment;
pub mod catalog;
pub mod error;
pub mod staff;

// Re-export all models for external use
pub use activity::*;
pub use appointment::*;
pub use catalog::*;
pub use error::*;
pub use staff::*;
