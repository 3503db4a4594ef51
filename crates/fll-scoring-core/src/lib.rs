//! FLL Scoring Core Library
//!
//! Score aggregation, standardization and ranking for robotics tournaments:
//! raw per-judge scores go in, per-category final scores, weighted overall
//! scores and competition ranks come out.

pub mod category;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod ranking;
pub mod records;
pub mod staleness;
