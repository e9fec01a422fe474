pub mod analysis;
pub mod archive;
pub mod combinatorics;
pub mod config;
pub mod consts;
pub mod error;
pub mod features;
pub mod generator;
pub mod types;
// cmd and reports are modules of the binary crate (main.rs).
