//! # Bracket Stats
//!
//! Per-position statistics for a two-region single-elimination bracket
//! tournament, computed over every historical edition.
//!
//! ## Architecture
//!
//! - **models**: Position identity map, dataset records and derived stats
//! - **calculate**: Vote extraction, aggregation, win rates and matchups
//! - **storage**: Dataset loading
//! - **config**: Configuration loading and validation
//! - **view**: Plain-text bracket views and the JSON report

pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;
pub mod view;

pub use models::*;
