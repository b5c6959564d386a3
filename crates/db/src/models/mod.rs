pub mod character;
pub mod free_company;
pub mod guild_config;
