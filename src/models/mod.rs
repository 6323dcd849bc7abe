pub mod aspect;
pub mod messages;
pub mod settings;

pub use aspect::{aspect_fit_height, aspect_fit_width};
pub use messages::{EngineRequest, EngineResponse, RequestId, ResponseEnvelope};
pub use settings::{Settings, CONFIG_ENV};
