use crate::error::{ChatError, Result};
use crate::output;
use crate::profile::{ProfileFetcher, UserProfile};
use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;

#[derive(Subcommand)]
pub enum ProfileCmd {
    /// Show the stored profile for a chat session
    Get {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        session_id: Option<String>,
    },
    /// Replace the stored profile for a chat session
    Set {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        session_id: String,
        /// Profile as a JSON object
        #[arg(long, conflicts_with = "file")]
        data: Option<String>,
        /// Path to a JSON file holding the profile
        #[arg(long)]
        file: Option<String>,
    },
}

pub async fn run(cmd: ProfileCmd, fetcher: &ProfileFetcher, output_format: &str) -> Result<()> {
    match cmd {
        ProfileCmd::Get {
            user_id,
            session_id,
        } => {
            let user_id = user_id.unwrap_or_default();
            let session_id = session_id.unwrap_or_default();

            let spinner = spinner(&format!("{user_id}/{session_id}"));
            let profile = fetcher.fetch_user_profile(&user_id, &session_id).await;
            spinner.finish_and_clear();

            match profile {
                None => output::print_warning(
                    "No lookup performed: --user-id and --session-id are both required.",
                ),
                Some(profile) if profile.is_empty() && !matches!(output_format, "json" | "yaml") => {
                    println!("No profile data.");
                }
                Some(profile) => output::render(&Value::Object(profile), output_format),
            }
        }
        ProfileCmd::Set {
            user_id,
            session_id,
            data,
            file,
        } => {
            let profile = read_profile(data, file)?;
            let stored = fetcher
                .update_user_profile(&user_id, &session_id, &profile)
                .await?;
            output::print_success(&format!(
                "Updated profile for user '{user_id}' (session '{session_id}')"
            ));
            output::render(&Value::Object(stored), output_format);
        }
    }
    Ok(())
}

fn spinner(target: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} Fetching profile {msg}...") {
        spinner.set_style(style);
    }
    spinner.set_message(target.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn read_profile(data: Option<String>, file: Option<String>) -> Result<UserProfile> {
    let value: Value = match (data, file) {
        (Some(d), _) => serde_json::from_str(&d)
            .map_err(|e| ChatError::Input(format!("Invalid JSON profile: {e}")))?,
        (_, Some(path)) => {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| ChatError::Input(format!("Cannot read file {path}: {e}")))?;
            serde_json::from_str(&content)
                .map_err(|e| ChatError::Input(format!("Invalid JSON in file: {e}")))?
        }
        _ => {
            return Err(ChatError::Input(
                "Provide the profile with --data or --file".into(),
            ));
        }
    };
    match value {
        Value::Object(profile) => Ok(profile),
        _ => Err(ChatError::Input("Profile must be a JSON object".into())),
    }
}
