//! Repository layer: one unit struct per table, each method taking `&PgPool`.

pub mod character_repo;
pub mod free_company_repo;
pub mod guild_config_repo;

pub use character_repo::CharacterRepo;
pub use free_company_repo::FreeCompanyRepo;
pub use guild_config_repo::GuildConfigRepo;
