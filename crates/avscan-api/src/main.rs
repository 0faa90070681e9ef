use avscan_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    avscan_infra::init_telemetry(false)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    avscan_api::run(config).await
}
