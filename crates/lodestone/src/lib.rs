//! Lodestone data client.
//!
//! Talks to a Nodestone-compatible JSON proxy in front of the FINAL FANTASY
//! XIV Lodestone, aggregates its paginated listings, and normalizes the
//! loosely-typed payloads into the canonical records in [`records`].

pub mod api;
pub mod error;
pub mod pagination;
pub mod payload;
pub mod records;
pub mod source;

pub use api::LodestoneApi;
pub use error::LodestoneError;
pub use source::LodestoneSource;
