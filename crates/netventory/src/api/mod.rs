//! API route handlers

pub mod convert;
pub mod devices;
pub mod error;
pub mod populate;
pub mod system;

pub use error::AppError;
