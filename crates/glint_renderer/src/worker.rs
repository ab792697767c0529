//! Background render thread.
//!
//! The host submits [`RenderRequest`]s and reads [`RenderEvent`]s back over
//! channels. Requests are served one at a time in the order they arrive.
//! Dropping the [`RenderWorker`] raises a kill flag the render checks after
//! every row, closes both channels and joins the thread.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;

use thiserror::Error;

use crate::renderer::{colors_to_rgba, render_seeded};
use crate::{build_world, Camera};
use glint_core::{RenderRequest, StreamMode};

/// Messages from the worker to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    /// A request was accepted and rendering began.
    Started { width: u32, height: u32 },
    /// Row `y` finished, as RGBA bytes. Rows arrive top to bottom.
    Row { y: u32, rgba: Vec<u8> },
    /// The whole frame as RGBA bytes, row-major from the top.
    Finished { width: u32, height: u32, rgba: Vec<u8> },
    /// The request could not be rendered.
    Failed(String),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Render worker has been terminated")]
    Disconnected,
}

/// Handle to a background render thread.
pub struct RenderWorker {
    tx: Option<Sender<RenderRequest>>,
    rx: Option<Receiver<RenderEvent>>,
    handle: Option<JoinHandle<()>>,
    killed: Arc<AtomicBool>,
}

impl RenderWorker {
    /// Start the render thread.
    pub fn spawn() -> Result<Self, WorkerError> {
        let (tx, from_host) = channel();
        let (to_host, rx) = channel();
        let killed = Arc::new(AtomicBool::new(false));

        let worker_killed = Arc::clone(&killed);
        let handle = std::thread::Builder::new()
            .name("RenderWorker".into())
            .spawn(move || run(&from_host, &to_host, &worker_killed))?;

        Ok(Self {
            tx: Some(tx),
            rx: Some(rx),
            handle: Some(handle),
            killed,
        })
    }

    /// Queue a request behind any already submitted.
    pub fn submit(&self, request: RenderRequest) -> Result<(), WorkerError> {
        let tx = self.tx.as_ref().ok_or(WorkerError::Disconnected)?;
        tx.send(request).map_err(|_| WorkerError::Disconnected)
    }

    /// Block until the next event arrives.
    pub fn recv(&self) -> Result<RenderEvent, WorkerError> {
        let rx = self.rx.as_ref().ok_or(WorkerError::Disconnected)?;
        rx.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Next event if one is waiting.
    pub fn try_recv(&self) -> Result<Option<RenderEvent>, WorkerError> {
        let rx = self.rx.as_ref().ok_or(WorkerError::Disconnected)?;
        match rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        // Checked after every row, including in Frame mode where no row is sent
        self.killed.store(true, Ordering::Relaxed);
        drop(self.tx.take());
        drop(self.rx.take());

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Render worker panicked");
            }
        }
    }
}

fn run(
    from_host: &Receiver<RenderRequest>,
    to_host: &Sender<RenderEvent>,
    killed: &AtomicBool,
) {
    log::debug!("Render worker: Begin");

    while let Ok(request) = from_host.recv() {
        if killed.load(Ordering::Relaxed) {
            log::debug!("Render worker: Killed by host");
            break;
        }
        if serve(request, to_host, killed).is_break() {
            break;
        }
    }

    log::debug!("Render worker: End");
}

// Breaks when the host is gone or has killed the worker
fn serve(
    request: RenderRequest,
    to_host: &Sender<RenderEvent>,
    killed: &AtomicBool,
) -> ControlFlow<()> {
    let world = match request.validate() {
        Ok(()) => build_world(&request.scene).map_err(|why| why.to_string()),
        Err(why) => Err(why.to_string()),
    };
    let world = match world {
        Ok(world) => world,
        Err(why) => {
            log::error!("Render worker: Rejected request: {}", why);
            return send(to_host, RenderEvent::Failed(why));
        }
    };

    let camera = Camera::new(&request.camera);
    let (width, height) = (camera.image_width(), camera.image_height());
    let seed = request.seed.unwrap_or_else(rand::random);
    log::info!(
        "Render worker: Rendering {}x{} at {} spp, seed {}",
        width,
        height,
        camera.samples_per_pixel(),
        seed
    );
    send(to_host, RenderEvent::Started { width, height })?;

    let stream_rows = request.stream == StreamMode::Rows;
    let image = render_seeded(&camera, &world, seed, |y, row| {
        if killed.load(Ordering::Relaxed) {
            log::debug!("Render worker: Killed by host after row {}", y);
            ControlFlow::Break(())
        } else if stream_rows {
            send(to_host, RenderEvent::Row { y, rgba: colors_to_rgba(row) })
        } else {
            ControlFlow::Continue(())
        }
    });

    match image {
        Some(image) => send(
            to_host,
            RenderEvent::Finished {
                width,
                height,
                rgba: image.to_rgba(),
            },
        ),
        None => ControlFlow::Break(()),
    }
}

fn send(to_host: &Sender<RenderEvent>, event: RenderEvent) -> ControlFlow<()> {
    match to_host.send(event) {
        Ok(()) => ControlFlow::Continue(()),
        Err(_) => {
            log::warn!("Render worker: Host disconnected, abandoning render");
            ControlFlow::Break(())
        }
    }
}
