use crate::client::BackendClient;
use crate::error::Result;
use crate::output;

pub async fn run(client: &BackendClient, output_format: &str) -> Result<()> {
    let result = client.health().await?;
    if output_format == "json" || output_format == "yaml" {
        output::render(&result, output_format);
        return Ok(());
    }
    match result.get("status").and_then(|s| s.as_str()) {
        Some("ok") => output::print_success(&format!("Backend at {}: OK", client.base_url())),
        Some(other) => output::print_warning(&format!("Backend at {}: {other}", client.base_url())),
        None => output::print_warning(&format!("Backend at {}: no status reported", client.base_url())),
    }
    output::render(&result, output_format);
    Ok(())
}
