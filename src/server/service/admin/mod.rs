//! Platform administration helpers.

pub mod code;
