//! Common types used across the application.

pub mod id;
pub mod month;

pub use id::*;
pub use month::Month;
