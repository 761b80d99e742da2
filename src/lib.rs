//! Slab-based transaction charge calculator
//!
//! This crate computes the charge owed on a batch of transactions under a
//! schedule of fixed-rate and percentage slabs, compares two schedules over
//! the same transactions, and partitions uploaded rows by status. The `api`
//! module serves it over HTTP with a per-user configuration store.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
