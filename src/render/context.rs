//! State shared by every tier of a [`Renderer`](super::Renderer).
//!
//! Most tiers only look at the poll budget. The remote tier uses the HTTP
//! client, the service endpoints and the image cache, so repeated labels for
//! the same code download once per context.

use image::GrayImage;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::surface::PollBudget;
use crate::config::LabelConfig;
use crate::error::LabelError;

/// Shared resources available to every tier's `try_render()`.
///
/// Constructed once per batch (or per process) and passed through the
/// chain. Cloning shares the client and cache.
#[derive(Clone)]
pub struct RenderContext {
    /// HTTP client for the remote image services.
    pub http_client: reqwest::Client,
    /// Downloaded remote images, keyed by URL, already grayscale.
    pub image_cache: Arc<RwLock<HashMap<String, GrayImage>>>,
    /// Endpoints, timeouts and raster settings.
    pub config: LabelConfig,
    /// Surface polling budget for canvas-backed tiers.
    pub poll: PollBudget,
}

impl RenderContext {
    /// Build a context from configuration.
    pub fn new(config: LabelConfig) -> Result<Self, LabelError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| LabelError::Config(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http_client,
            image_cache: Arc::new(RwLock::new(HashMap::new())),
            poll: PollBudget::from_config(&config),
            config,
        })
    }

    /// Context with default configuration.
    pub fn with_defaults() -> Result<Self, LabelError> {
        Self::new(LabelConfig::default())
    }

    /// Look up a cached remote image.
    pub async fn cached_image(&self, url: &str) -> Option<GrayImage> {
        self.image_cache.read().await.get(url).cloned()
    }

    /// Store a downloaded remote image.
    pub async fn cache_image(&self, url: &str, image: GrayImage) {
        self.image_cache.write().await.insert(url.to_string(), image);
    }
}
