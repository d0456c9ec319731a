pub mod config_cmd;
pub mod health;
pub mod profile;
