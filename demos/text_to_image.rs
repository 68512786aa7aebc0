use stabilityai::{
    logger, StabilityClient, StabilityConfig, StylePreset, TextPrompt, TextToImageRequest,
    TuningOptions,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_with_config(logger::LoggerConfig::development())?;
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }

    let config = StabilityConfig::from_env()?
        .with_client_id("stabilityai-demo")
        .with_client_version(env!("CARGO_PKG_VERSION"));
    logger::log_config_info(&config);
    let client = StabilityClient::new(config);

    let balance = client.get_balance().await?;
    log::info!("💰 Credits available: {:.2}", balance.credits);

    let engine = env::var("STABILITY_ENGINE")
        .unwrap_or_else(|_| "stable-diffusion-v1-6".to_string());
    let request = TextToImageRequest::new(vec![
        TextPrompt::new("A lighthouse on a cliff, oil painting").with_weight(1.0),
        TextPrompt::new("blurry, low quality").with_weight(-1.0),
    ])
    .with_dimensions(512, 512)
    .with_steps(30)
    .with_style_preset(StylePreset::FantasyArt);

    let artifacts = client.generate_from_text(&request, &engine).await?;
    for artifact in artifacts {
        let file = format!("txt2img_{}.png", artifact.seed);
        artifact.save(&file)?;
        log::info!("🖼️  Saved {} ({})", file, artifact.finish_reason);
    }

    Ok(())
}
