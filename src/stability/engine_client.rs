use crate::{error::Result, models::Engine, stability::api_client::ApiClient};

pub const ENGINES_LIST_PATH: &str = "/v1/engines/list";

#[derive(Clone)]
pub struct EngineClient {
    api: ApiClient,
}

impl EngineClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Engines available to the configured key, in server order.
    pub async fn list(&self) -> Result<Vec<Engine>> {
        self.api.get_json(ENGINES_LIST_PATH).await
    }
}
