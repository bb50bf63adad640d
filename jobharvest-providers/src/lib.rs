// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `JobHarvest` Providers
//!
//! Concrete provider clients and the registry that maps configured
//! provider names onto them.
//!
//! The orchestrator core in `jobharvest-acquire` only knows the
//! [`Provider`](jobharvest_core::Provider) trait; this crate supplies
//! the implementations:
//!
//! - [`HttpProvider`] - Generic JSON search endpoint client
//! - [`ProviderRegistry`] - Config-driven name -> client map

pub mod http;
pub mod registry;

pub use http::HttpProvider;
pub use registry::ProviderRegistry;
