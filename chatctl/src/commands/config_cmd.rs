use crate::config::ChatConfig;
use crate::error::Result;
use crate::output;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Get current configuration
    Get,
    /// Set a configuration value
    Set {
        /// Key to set (server, output, log_level)
        key: String,
        /// Value
        value: String,
    },
}

pub fn run(cmd: ConfigCmd, output_format: &str) -> Result<()> {
    match cmd {
        ConfigCmd::Get => {
            let config = ChatConfig::load();
            if output_format == "json" || output_format == "yaml" {
                let value = serde_json::to_value(&config)?;
                output::render(&value, output_format);
            } else {
                println!(
                    "server:    {}",
                    config.server.as_deref().unwrap_or("(not set)")
                );
                println!("output:    {}", config.output.as_deref().unwrap_or("table"));
                println!(
                    "log_level: {}",
                    config.log_level.as_deref().unwrap_or("(not set)")
                );
            }
        }
        ConfigCmd::Set { key, value } => {
            let mut config = ChatConfig::load();
            config.set(&key, value)?;
            config.save()?;
            output::print_success(&format!(
                "Set '{key}' in {}",
                ChatConfig::config_path().display()
            ));
        }
    }
    Ok(())
}
