//! Infrastructure layer: stores, Postgres wiring, config, demo data.

pub mod config;
pub mod db;
pub mod ledger;
pub mod orders;
pub mod seed;
