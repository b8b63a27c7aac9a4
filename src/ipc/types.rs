use serde::Deserialize;

use crate::config::Config;
use crate::desk::Desk;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub desk: Desk,
}

impl AppState {
    pub fn new(config: Config, desk: Desk) -> Self {
        Self { config, desk }
    }
}
