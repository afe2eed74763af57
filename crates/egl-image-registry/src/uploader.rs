//! Background texture uploads into shareable images.
//!
//! [`AsyncTextureUploader`] owns one worker thread with its own GL context.
//! Textures are generated and filled there, turned into images through the
//! shared [`ImageRegistry`], and later applied to a texture on any other
//! thread by handle. The handle-to-texture map lives on the worker only.
//!
//! - Callers submit jobs over a crossbeam channel.
//! - Each job answers through its own [`PendingUpload`].
//! - Dropping the uploader closes the channel and joins the worker after
//!   already queued jobs have run.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::{debug, error, info, warn};

use crate::{
    ImageApi, ImageHandle, ImageRegistry, RegistryError, TextureId, UploadError, WorkerConfig,
    WorkerContext,
};

struct WorkerState {
    context: Box<dyn WorkerContext>,
    textures: HashMap<ImageHandle, TextureId>,
}

type Job = Box<dyn FnOnce(&mut WorkerState) + Send>;

/// Result of a job submitted to the upload thread.
pub struct PendingUpload<T> {
    receiver: Receiver<Result<T, UploadError>>,
    /// Set once `try_take` has handed out the result. The worker may not have
    /// dropped its sender yet, so the channel alone can still look empty.
    taken: Cell<bool>,
}

impl<T> PendingUpload<T> {
    /// Block until the job has run.
    pub fn wait(self) -> Result<T, UploadError> {
        self.receiver.recv().map_err(|_| UploadError::WorkerGone)?
    }

    /// Take the result if the job has finished. The result is handed out
    /// once; later calls report [`UploadError::WorkerGone`].
    pub fn try_take(&self) -> Option<Result<T, UploadError>> {
        if self.taken.get() {
            return Some(Err(UploadError::WorkerGone));
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.taken.set(true);
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(UploadError::WorkerGone)),
        }
    }
}

/// Creates and updates images on a dedicated GL thread.
pub struct AsyncTextureUploader<A: ImageApi + 'static> {
    registry: Arc<ImageRegistry<A>>,
    /// `None` once shutdown has started.
    job_sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl<A: ImageApi + 'static> AsyncTextureUploader<A> {
    /// Spawn the upload thread and create its GL context there.
    ///
    /// `make_context` runs on the new thread; if it fails the thread exits and
    /// the error is returned here.
    pub fn new<C, F>(
        registry: Arc<ImageRegistry<A>>,
        config: WorkerConfig,
        make_context: F,
    ) -> Result<Self>
    where
        C: WorkerContext + 'static,
        F: FnOnce(&WorkerConfig) -> Result<C> + Send + 'static,
    {
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Job>();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<()>>(1);

        let worker = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                let context = match make_context(&config) {
                    Ok(context) => context,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                let mut state = WorkerState {
                    context: Box::new(context),
                    textures: HashMap::new(),
                };
                info!("upload worker started");
                while let Ok(job) = job_rx.recv() {
                    job(&mut state);
                }
                info!("upload worker stopped");
            })?;

        let started = ready_rx
            .recv()
            .map_err(|_| anyhow!("upload worker exited during startup"))
            .and_then(|ready| ready);
        if let Err(err) = started {
            let _ = worker.join();
            return Err(err.context("failed to create upload context"));
        }

        Ok(Self {
            registry,
            job_sender: Some(job_tx),
            worker: Some(worker),
        })
    }

    /// Generate and bind a texture on the upload thread, run `init` to fill
    /// it, then register an image backed by it.
    ///
    /// `init` must at least allocate the texture storage (`glTexImage2D`).
    pub fn create_image<F>(&self, init: F) -> PendingUpload<ImageHandle>
    where
        F: FnOnce() + Send + 'static,
    {
        let registry = Arc::clone(&self.registry);
        self.submit(move |state| {
            let texture = state.context.gen_texture().map_err(UploadError::Context)?;
            if let Err(err) = state.context.bind_texture(texture) {
                state.context.delete_texture(texture);
                return Err(UploadError::Context(err));
            }

            init();

            match registry.create_image_from_texture(texture) {
                Ok(handle) => {
                    state.textures.insert(handle, texture);
                    Ok(handle)
                }
                Err(err) => {
                    state.context.delete_texture(texture);
                    Err(err.into())
                }
            }
        })
    }

    /// Rebind the texture behind `handle` on the upload thread and run
    /// `update` against it.
    pub fn update_image<F>(&self, handle: ImageHandle, update: F) -> PendingUpload<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(move |state| {
            let texture = *state
                .textures
                .get(&handle)
                .ok_or(RegistryError::HandleNotFound(handle))?;
            state
                .context
                .bind_texture(texture)
                .map_err(UploadError::Context)?;
            update();
            debug!("image {handle} updated");
            Ok(())
        })
    }

    /// Apply `handle` to the texture currently bound on the calling thread.
    pub fn apply_image(&self, handle: ImageHandle) -> Result<(), RegistryError> {
        self.registry.set_image_target_texture(handle)
    }

    pub fn registry(&self) -> &Arc<ImageRegistry<A>> {
        &self.registry
    }

    fn submit<T, F>(&self, job: F) -> PendingUpload<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut WorkerState) -> Result<T, UploadError> + Send + 'static,
    {
        let (result_tx, result_rx) = crossbeam_channel::bounded(1);
        let job: Job = Box::new(move |state| {
            let result = job(state);
            if let Err(err) = &result {
                warn!("upload job failed: {err}");
            }
            let _ = result_tx.send(result);
        });

        // A dropped job drops its result sender, so the caller sees
        // `WorkerGone`.
        if let Some(sender) = &self.job_sender {
            if sender.send(job).is_err() {
                error!("upload worker is not accepting jobs");
            }
        }

        PendingUpload {
            receiver: result_rx,
            taken: Cell::new(false),
        }
    }
}

impl<A: ImageApi + 'static> Drop for AsyncTextureUploader<A> {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop; join would block forever
        // otherwise.
        self.job_sender = None;

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("upload worker panicked");
            }
        }
    }
}
