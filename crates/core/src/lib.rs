//! Domain types and pure logic for character ownership and Free Company sync.
//!
//! This crate has no I/O: persistence lives in `tarubot-db`, the external
//! data source in `tarubot-lodestone`, and orchestration in `tarubot-sync`.

pub mod clock;
pub mod error;
pub mod freshness;
pub mod reconciliation;
pub mod roles;
pub mod types;
