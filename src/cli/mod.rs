// CLI module - one file per command
pub mod account;
pub mod backup;
pub mod config_view;
pub mod download;
pub mod link;
pub mod list;
pub mod restore;
pub mod setup;
