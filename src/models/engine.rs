use crate::models::presets::EngineType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engine {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub engine_type: EngineType,
}
