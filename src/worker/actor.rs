//! Worker event dispatcher.
//!
//! Events arrive as messages; each fetch interception runs as its own task so
//! in-flight requests proceed concurrently, while lifecycle events are
//! handled in order. The HTTP request loop talks to the dispatcher through
//! `WorkerHandle` using blocking channel round-trips.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use tokio::sync::{mpsc, oneshot};

use crate::worker::fetch::{FetchOutcome, Request};
use crate::worker::ServiceWorker;
use crate::{debug, log};

/// Messages to the worker dispatcher.
pub enum WorkerMsg {
    /// Run the install step; reply carries its result.
    Install { reply: oneshot::Sender<Result<()>> },
    /// Run the activate step.
    Activate { reply: oneshot::Sender<()> },
    /// Intercept a request.
    Fetch {
        request: Request,
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },
    /// Tag-triggered background sync.
    Sync { tag: String },
    /// Incoming push payload.
    Push { payload: Option<Vec<u8>> },
    /// Notification clicked.
    NotificationClick,
    /// Stop the dispatcher.
    Shutdown,
}

/// Dispatcher task owning the message receiver.
pub struct WorkerActor {
    worker: Arc<ServiceWorker>,
    rx: mpsc::Receiver<WorkerMsg>,
}

impl WorkerActor {
    /// Create the dispatcher and its handle.
    pub fn new(worker: Arc<ServiceWorker>) -> (Self, WorkerHandle) {
        let (tx, rx) = mpsc::channel(64);
        (Self { worker, rx }, WorkerHandle { tx })
    }

    /// Run until `Shutdown` or all handles are dropped.
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                WorkerMsg::Shutdown => break,
                WorkerMsg::Install { reply } => {
                    let _ = reply.send(self.worker.install().await);
                }
                WorkerMsg::Activate { reply } => {
                    self.worker.activate().await;
                    let _ = reply.send(());
                }
                WorkerMsg::Fetch { request, reply } => {
                    // One task per interception; replies go straight back
                    let worker = Arc::clone(&self.worker);
                    tokio::spawn(async move {
                        let _ = reply.send(worker.handle_fetch(request).await);
                    });
                }
                WorkerMsg::Sync { tag } => {
                    let worker = Arc::clone(&self.worker);
                    tokio::spawn(async move {
                        worker.handle_sync(&tag).await;
                    });
                }
                WorkerMsg::Push { payload } => {
                    let notification = self.worker.handle_push(payload.as_deref());
                    log!("notify"; "{}: {}", notification.title, notification.body);
                }
                WorkerMsg::NotificationClick => {
                    let url = self.worker.handle_notification_click();
                    log!("notify"; "focusing {}", url);
                }
            }
        }
        debug!("worker"; "dispatcher stopped");
    }
}

/// Cloneable sender side of the dispatcher.
#[derive(Clone)]
pub struct WorkerHandle {
    tx: mpsc::Sender<WorkerMsg>,
}

impl WorkerHandle {
    pub async fn install(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(WorkerMsg::Install { reply: tx }).await?;
        rx.await.map_err(|_| anyhow!("install reply dropped"))?
    }

    pub async fn activate(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(WorkerMsg::Activate { reply: tx }).await?;
        rx.await.map_err(|_| anyhow!("activate reply dropped"))
    }

    pub async fn fetch(&self, request: Request) -> Result<FetchOutcome> {
        let (tx, rx) = oneshot::channel();
        self.send(WorkerMsg::Fetch { request, reply: tx }).await?;
        rx.await.map_err(|_| anyhow!("fetch reply dropped"))?
    }

    pub async fn sync(&self, tag: impl Into<String>) -> Result<()> {
        self.send(WorkerMsg::Sync { tag: tag.into() }).await
    }

    pub async fn push(&self, payload: Option<Vec<u8>>) -> Result<()> {
        self.send(WorkerMsg::Push { payload }).await
    }

    pub async fn shutdown(&self) {
        let _ = self.tx.send(WorkerMsg::Shutdown).await;
    }

    async fn send(&self, msg: WorkerMsg) -> Result<()> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| anyhow!("worker dispatcher is gone"))
    }

    // ------------------------------------------------------------------
    // Blocking variants for the synchronous HTTP request loop.
    // Must not be called from within the worker runtime itself.
    // ------------------------------------------------------------------

    pub fn blocking_install(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.blocking_send(WorkerMsg::Install { reply: tx })?;
        rx.blocking_recv()
            .map_err(|_| anyhow!("install reply dropped"))?
    }

    pub fn blocking_activate(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.blocking_send(WorkerMsg::Activate { reply: tx })?;
        rx.blocking_recv()
            .map_err(|_| anyhow!("activate reply dropped"))
    }

    pub fn blocking_fetch(&self, request: Request) -> Result<FetchOutcome> {
        let (tx, rx) = oneshot::channel();
        self.blocking_send(WorkerMsg::Fetch { request, reply: tx })?;
        rx.blocking_recv()
            .map_err(|_| anyhow!("fetch reply dropped"))?
    }

    fn blocking_send(&self, msg: WorkerMsg) -> Result<()> {
        self.tx
            .blocking_send(msg)
            .map_err(|_| anyhow!("worker dispatcher is gone"))
    }
}
