pub mod engine_worker;

pub use engine_worker::{EngineHandle, EngineWorker, RequestHandler};
