pub mod api_client;
pub mod engine_client;
pub mod generation_client;
pub mod user_client;

use crate::{
    config::StabilityConfig,
    error::Result,
    models::{Account, Balance, Engine, ImageResponse, ImageToImageRequest, TextToImageRequest},
    transport::{HttpTransport, ReqwestTransport},
};
use std::sync::Arc;

pub use api_client::ApiClient;
pub use engine_client::EngineClient;
pub use generation_client::GenerationClient;
pub use user_client::UserClient;

/// Entry point to the API. Cheap to clone; clones share configuration and
/// transport, and calls may run concurrently. Nothing is retried.
#[derive(Clone)]
pub struct StabilityClient {
    engine_client: EngineClient,
    generation_client: GenerationClient,
    user_client: UserClient,
}

impl StabilityClient {
    pub fn new(config: StabilityConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(StabilityConfig::from_env()?))
    }

    pub fn with_transport(config: StabilityConfig, transport: Arc<dyn HttpTransport>) -> Self {
        log::debug!("Creating Stability client for {}://{}", config.scheme, config.host);
        let api = ApiClient::new(config, transport);

        Self {
            engine_client: EngineClient::new(api.clone()),
            generation_client: GenerationClient::new(api.clone()),
            user_client: UserClient::new(api),
        }
    }

    pub fn engines(&self) -> &EngineClient {
        &self.engine_client
    }

    pub fn generation(&self) -> &GenerationClient {
        &self.generation_client
    }

    pub fn user(&self) -> &UserClient {
        &self.user_client
    }

    pub async fn list_engines(&self) -> Result<Vec<Engine>> {
        self.engine_client.list().await
    }

    pub async fn generate_from_text(
        &self,
        request: &TextToImageRequest,
        engine_id: &str,
    ) -> Result<Vec<ImageResponse>> {
        self.generation_client.text_to_image(request, engine_id).await
    }

    pub async fn generate_from_image(
        &self,
        request: &ImageToImageRequest,
        engine_id: &str,
    ) -> Result<Vec<ImageResponse>> {
        self.generation_client.image_to_image(request, engine_id).await
    }

    pub async fn get_account(&self) -> Result<Account> {
        self.user_client.account().await
    }

    pub async fn get_balance(&self) -> Result<Balance> {
        self.user_client.balance().await
    }
}
