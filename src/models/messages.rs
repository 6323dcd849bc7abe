//! Requests and responses exchanged with the engine worker.

use std::fmt;

use pixel_dither::{
    Color, ColorMetric, ColorUsageStats, Configuration, EngineError, EngineOutput, PixelBuffer,
};
use serde::{Deserialize, Serialize};

/// Correlation id assigned when a request is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineRequest {
    /// Run the full pipeline on `source`.
    Process {
        source: PixelBuffer,
        settings: Configuration,
    },
    /// Propose colors missing from `palette`.
    Suggest {
        source: PixelBuffer,
        palette: Vec<Color>,
        metric: ColorMetric,
        count: usize,
        prefer_distinct: bool,
    },
}

impl EngineRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineRequest::Process { .. } => "process",
            EngineRequest::Suggest { .. } => "suggest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineResponse {
    Processed {
        result: PixelBuffer,
        generated_palette: Option<Vec<Color>>,
        color_stats: ColorUsageStats,
    },
    Suggestions {
        colors: Vec<Color>,
    },
    Error {
        message: String,
    },
}

impl From<EngineOutput> for EngineResponse {
    fn from(output: EngineOutput) -> Self {
        EngineResponse::Processed {
            result: output.buffer,
            generated_palette: output.generated_palette,
            color_stats: output.stats,
        }
    }
}

impl From<EngineError> for EngineResponse {
    fn from(err: EngineError) -> Self {
        EngineResponse::Error {
            message: err.to_string(),
        }
    }
}

/// A response paired with the id of the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub id: RequestId,
    pub response: EngineResponse,
}
