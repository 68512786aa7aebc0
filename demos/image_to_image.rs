use stabilityai::{
    logger, ImageToImageRequest, Sampler, StabilityClient, StabilityError, TextPrompt,
    TuningOptions,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logger::init()?;

    let init_image_path = env::args()
        .nth(1)
        .ok_or("usage: image_to_image <init_image.png>")?;
    let init_image = std::fs::read(&init_image_path)?;

    let client = StabilityClient::from_env()?;
    let engine = env::var("STABILITY_ENGINE")
        .unwrap_or_else(|_| "stable-diffusion-v1-6".to_string());

    let prompts = vec![TextPrompt::new("the same scene in winter, snow falling")];
    let by_strength = ImageToImageRequest::image_strength(prompts.clone(), init_image.clone(), 0.35)
        .with_sampler(Sampler::KDpmpp2m)
        .with_seed(7);
    let by_schedule = ImageToImageRequest::step_schedule(prompts, init_image, 0.65, Some(0.95))
        .with_sampler(Sampler::KDpmpp2m)
        .with_seed(7);

    for (label, request) in [("strength", by_strength), ("schedule", by_schedule)] {
        match client.generate_from_image(&request, &engine).await {
            Ok(artifacts) => {
                for (index, artifact) in artifacts.iter().enumerate() {
                    let file = format!("img2img_{}_{}.png", label, index);
                    artifact.save(&file)?;
                    log::info!("🖼️  Saved {}", file);
                }
            }
            Err(StabilityError::ApiError { name, message, .. }) => {
                log::error!("❌ {} request rejected: {} ({})", label, message, name);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
