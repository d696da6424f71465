//! Influencer campaign dashboard core.
//!
//! Synthesizes a mock influencer-marketing dataset, filters it by
//! brand/product/category/platform, and computes the ROAS analytics the
//! dashboard renders. Presentation is left to the caller; everything here
//! returns plain structured data.

pub mod analytics;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod export;
pub mod filter;
pub mod format;
pub mod generator;
pub mod model;
pub mod ratio;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod types;
