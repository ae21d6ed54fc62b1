use std::sync::Arc;

use crate::config::AppConfig;
use crate::estimate::{OpenAiVision, VisionModel};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub vision: Arc<dyn VisionModel>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let vision = Arc::new(OpenAiVision::new(&config.vision)?) as Arc<dyn VisionModel>;
        Ok(Self { config, vision })
    }

    pub fn fake(vision: Arc<dyn VisionModel>) -> Self {
        let config = Arc::new(AppConfig {
            data_dir: None,
            vision: crate::config::VisionConfig {
                api_url: "https://fake.local/v1/chat/completions".into(),
                api_key: "test".into(),
                model: "test".into(),
                timeout_secs: 5,
            },
        });
        Self { config, vision }
    }
}
