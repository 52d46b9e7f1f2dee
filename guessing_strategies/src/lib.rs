#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod strategies;

pub use strategies::*;
