//! Core serving logic

pub mod artifacts;
pub mod features;
pub mod model;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;
