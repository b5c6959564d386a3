//! Character and Free Company synchronization engine.
//!
//! Everything here runs against an explicit [`SyncContext`] holding the
//! local store, the Lodestone source, the chat role provider and the clock.
//! Production wiring uses [`PgStore`] and the HTTP clients; tests swap in
//! in-memory fakes.

pub mod cache;
pub mod claims;
pub mod context;
pub mod reconcile;
pub mod refresh;
pub mod roles;
pub mod settings;
pub mod store;

pub use context::SyncContext;
pub use roles::{GuildMember, RoleProvider, RoleProviderError, RoleSyncOutcome};
pub use store::{LocalStore, PgStore};
