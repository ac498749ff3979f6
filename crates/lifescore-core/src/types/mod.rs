//! Shared type aliases used across lifescore crates.

pub mod collections;
