//! Data models

pub mod patient;
pub mod prediction;
pub mod meta;

pub use patient::*;
pub use prediction::*;
pub use meta::*;
