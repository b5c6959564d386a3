//! Tarubot: chat commands, Discord role wiring and scheduled jobs on top of
//! the sync engine.

pub mod background;
pub mod commands;
pub mod config;
pub mod discord;
