use crate::{
    error::Result,
    models::{Account, Balance},
    stability::api_client::ApiClient,
};

pub const ACCOUNT_PATH: &str = "/v1/user/account";
pub const BALANCE_PATH: &str = "/v1/user/balance";

#[derive(Clone)]
pub struct UserClient {
    api: ApiClient,
}

impl UserClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn account(&self) -> Result<Account> {
        self.api.get_json(ACCOUNT_PATH).await
    }

    /// Credit balance of the user or of the configured organization.
    pub async fn balance(&self) -> Result<Balance> {
        self.api.get_json(BALANCE_PATH).await
    }
}
