#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
mod convert;
pub mod definition;
pub mod error;
pub mod implementation;
mod locations;
pub mod registry;
pub mod service;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod type_definition;
pub mod version;
