//! The engine on a dedicated OS thread.
//!
//! Requests queue on a bounded `tokio::sync::mpsc` channel and are handled
//! one at a time in submission order. Each reply travels back on its own
//! `oneshot` channel, tagged with the request's [`RequestId`]. A panic while
//! handling a request becomes an error response and the worker keeps
//! serving. The thread exits once every [`EngineHandle`] is dropped.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use pixel_dither::{Color, ColorMetric, Configuration, Engine, EngineError, PixelBuffer};
use tokio::sync::{mpsc, oneshot};

use crate::error::WorkerError;
use crate::models::{EngineRequest, EngineResponse, RequestId, ResponseEnvelope};

const QUEUE_DEPTH: usize = 32;

/// Turns one request into one response on the worker thread.
pub trait RequestHandler: Send + 'static {
    fn handle(&self, request: EngineRequest) -> EngineResponse;
}

impl RequestHandler for Engine {
    fn handle(&self, request: EngineRequest) -> EngineResponse {
        match request {
            EngineRequest::Process { source, settings } => match self.process(&source, &settings) {
                Ok(output) => output.into(),
                Err(e) => e.into(),
            },
            EngineRequest::Suggest {
                source,
                palette,
                metric,
                count,
                prefer_distinct,
            } => EngineResponse::Suggestions {
                colors: self.suggest(&source, &palette, metric, count, prefer_distinct),
            },
        }
    }
}

struct Job {
    id: RequestId,
    request: EngineRequest,
    reply: oneshot::Sender<ResponseEnvelope>,
}

/// Owner of the worker thread.
pub struct EngineWorker {
    thread: thread::JoinHandle<()>,
}

impl EngineWorker {
    /// Start a worker running the default [`Engine`].
    pub fn spawn() -> Result<(Self, EngineHandle), WorkerError> {
        Self::spawn_with(Engine::new())
    }

    pub fn spawn_with<H: RequestHandler>(handler: H) -> Result<(Self, EngineHandle), WorkerError> {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let thread = thread::Builder::new()
            .name("pixelforge-engine".to_string())
            .spawn(move || run(handler, rx))?;
        let handle = EngineHandle {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        Ok((Self { thread }, handle))
    }

    /// Block until the thread exits.
    ///
    /// The thread stops once every [`EngineHandle`] has been dropped. Requests
    /// already queued at that point still run and their replies are sent
    /// before it exits, so this waits for the whole queue to drain.
    pub fn join(self) {
        if self.thread.join().is_err() {
            tracing::error!("Engine worker thread panicked");
        }
    }
}

fn run<H: RequestHandler>(handler: H, mut rx: mpsc::Receiver<Job>) {
    tracing::info!("Engine worker started");
    while let Some(Job { id, request, reply }) = rx.blocking_recv() {
        let kind = request.kind();
        tracing::debug!(%id, kind, "Handling request");
        let response = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(request)))
            .unwrap_or_else(|payload| {
                let reason = panic_reason(payload.as_ref());
                tracing::warn!(%id, kind, reason = %reason, "Request panicked");
                EngineError::ProcessingFailure(reason).into()
            });
        if reply.send(ResponseEnvelope { id, response }).is_err() {
            tracing::debug!(%id, "Reply receiver dropped");
        }
    }
    tracing::info!("Engine worker stopped");
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Cloneable sender side of the worker queue.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Job>,
    next_id: Arc<AtomicU64>,
}

impl EngineHandle {
    /// Queue `request` and return its id with the pending reply.
    ///
    /// Dropping the receiver abandons the reply; the request still runs.
    pub async fn submit(
        &self,
        request: EngineRequest,
    ) -> Result<(RequestId, oneshot::Receiver<ResponseEnvelope>), WorkerError> {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Job { id, request, reply })
            .await
            .map_err(|_| WorkerError::Closed)?;
        Ok((id, rx))
    }

    /// Queue `request` and wait for its envelope.
    pub async fn request(&self, request: EngineRequest) -> Result<ResponseEnvelope, WorkerError> {
        let (id, rx) = self.submit(request).await?;
        rx.await.map_err(|_| WorkerError::NoReply(id.0))
    }

    pub async fn process(
        &self,
        source: PixelBuffer,
        settings: Configuration,
    ) -> Result<EngineResponse, WorkerError> {
        let envelope = self
            .request(EngineRequest::Process { source, settings })
            .await?;
        Ok(envelope.response)
    }

    pub async fn suggest(
        &self,
        source: PixelBuffer,
        palette: Vec<Color>,
        metric: ColorMetric,
        count: usize,
        prefer_distinct: bool,
    ) -> Result<EngineResponse, WorkerError> {
        let envelope = self
            .request(EngineRequest::Suggest {
                source,
                palette,
                metric,
                count,
                prefer_distinct,
            })
            .await?;
        Ok(envelope.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_panic_reason() {
        assert_eq!(panic_reason(&"boom"), "boom");
        assert_eq!(panic_reason(&String::from("bang")), "bang");
        assert_eq!(panic_reason(&42u32), "unknown panic");
    }

    #[test]
    fn test_engine_handler_reports_errors() {
        let response = Engine::new().handle(EngineRequest::Process {
            source: PixelBuffer::filled(2, 2, [0, 0, 0, 255]),
            settings: Configuration {
                target_width: 0,
                ..Configuration::default()
            },
        });
        let EngineResponse::Error { message } = response else {
            panic!("expected an error response, got {response:?}");
        };
        assert!(message.starts_with("invalid configuration"), "{message}");
    }
}
