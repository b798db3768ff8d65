use async_trait::async_trait;
use std::fmt::Debug;

use crate::model::RegionSeries;

pub mod bmkg;

/// Errors produced while fetching or decoding regional forecasts.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("forecast request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("forecast endpoint returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode forecast body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can produce the raw per-region forecast series the
/// selector consumes. Implementations take no parameters per fetch; where
/// the data comes from is fixed at construction time.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self) -> Result<Vec<RegionSeries>, SourceError>;
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}
