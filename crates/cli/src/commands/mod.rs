//! CLI command implementations.

pub mod cart;
pub mod check;
pub mod orders;
pub mod seed;
