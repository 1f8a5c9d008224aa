//! Server lifecycle management.

use crate::{
    core::register_server,
    log,
    worker::{ServiceWorker, WorkerActor, WorkerHandle},
};
use anyhow::Result;
use crossbeam::channel::{Receiver, Sender};
use std::{
    net::SocketAddr,
    sync::Arc,
    thread::{self, JoinHandle},
};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

/// Register server for graceful shutdown.
///
/// This registers the server with the global shutdown handler set up in
/// main(). When Ctrl+C is pressed, the handler will unblock the server and
/// notify the worker runtime.
pub fn register_server_for_shutdown(server: Arc<Server>, shutdown_tx: Sender<()>) {
    register_server(server, shutdown_tx);
}

/// Spawn the worker runtime on its own thread.
///
/// The dispatcher runs on a small tokio runtime; the returned handle bridges
/// the synchronous request loop into it.
pub fn spawn_worker_runtime(
    worker: Arc<ServiceWorker>,
    shutdown_rx: Receiver<()>,
) -> (WorkerHandle, JoinHandle<()>) {
    let (actor, handle) = WorkerActor::new(worker);
    let shutdown_handle = handle.clone();

    let thread_handle = thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("failed to create tokio runtime");

        rt.block_on(async move {
            let actor_task = tokio::spawn(actor.run());

            loop {
                if shutdown_rx.try_recv().is_ok() {
                    crate::debug!("worker"; "shutdown signal received");
                    shutdown_handle.shutdown().await;
                    break;
                }
                if actor_task.is_finished() {
                    break;
                }
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }

            let _ = tokio::time::timeout(std::time::Duration::from_millis(500), actor_task).await;
        });
    });

    (handle, thread_handle)
}

/// Wait for the worker runtime to shut down gracefully (max 2 seconds).
pub fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(std::time::Duration::from_millis(50));
    }
}
