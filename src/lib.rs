#![doc = include_str!("../README.md")]

pub mod cli;
pub mod engine;
pub mod error;
pub mod extract;
pub mod impls;
pub mod types;

pub use engine::*;
pub use error::*;
pub use extract::{extract, ListingFields};
pub use impls::*;
pub use types::*;
