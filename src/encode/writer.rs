use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use crate::encode::sink::ImageSink;
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::foundation::math::unpremultiply_rgba8;
use crate::render::backend::FrameRGBA;

/// Default number of queued frames before `push` blocks.
pub const DEFAULT_QUEUE_CAPACITY: usize = 150;

/// One frame waiting to be written.
#[derive(Clone, Debug)]
pub struct ImageJob {
    /// Destination file.
    pub path: PathBuf,
    /// Captured pixels, rows bottom-to-top.
    pub frame: FrameRGBA,
}

/// Options for [`ImageWritePipeline`].
#[derive(Clone, Copy, Debug)]
pub struct WriterOpts {
    /// Queue capacity; `push` blocks while this many jobs are waiting.
    pub capacity: usize,
    /// Convert premultiplied frames to straight alpha before writing.
    pub unpremultiply: bool,
}

impl Default for WriterOpts {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            unpremultiply: false,
        }
    }
}

/// Jobs pushed but not yet finished (queued or being written).
#[derive(Default)]
struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

impl InFlight {
    fn lock(&self) -> std::sync::MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn add(&self) {
        *self.lock() += 1;
    }

    fn done(&self) {
        let mut n = self.lock();
        *n = n.saturating_sub(1);
        if *n == 0 {
            self.idle.notify_all();
        }
    }

    fn reset(&self) {
        *self.lock() = 0;
        self.idle.notify_all();
    }
}

/// Bounded frame queue drained by one background writer thread.
///
/// `push` blocks while the queue is full so rendering cannot run arbitrarily far ahead of
/// disk I/O. Write failures are logged and dropped; they are never retried or reported to the
/// caller. Shutdown discards queued jobs.
pub struct ImageWritePipeline {
    jobs: Sender<ImageJob>,
    stop: Sender<()>,
    in_flight: Arc<InFlight>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ImageWritePipeline {
    /// Start the writer thread.
    pub fn spawn(opts: WriterOpts, sink: Box<dyn ImageSink>) -> BridgeResult<Self> {
        let (jobs, jobs_rx) = crossbeam_channel::bounded::<ImageJob>(opts.capacity.max(1));
        let (stop, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let in_flight = Arc::new(InFlight::default());

        let worker_in_flight = Arc::clone(&in_flight);
        let worker = std::thread::Builder::new()
            .name("image-writer".to_owned())
            .spawn(move || {
                run_worker(jobs_rx, stop_rx, sink, opts.unpremultiply, &worker_in_flight)
            })
            .map_err(|e| BridgeError::Other(anyhow::anyhow!("spawn image writer: {e}")))?;

        Ok(Self {
            jobs,
            stop,
            in_flight,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Enqueue a job, blocking while the queue is full.
    pub fn push(&self, job: ImageJob) -> BridgeResult<()> {
        self.in_flight.add();
        if self.jobs.send(job).is_err() {
            self.in_flight.done();
            return Err(BridgeError::PipelineClosed);
        }
        Ok(())
    }

    /// `true` when nothing is queued or being written.
    pub fn is_idle(&self) -> bool {
        *self.in_flight.lock() == 0
    }

    /// Block until idle or until `timeout` elapses; returns whether the pipeline is idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut n = self.in_flight.lock();
        while *n > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            n = match self.in_flight.idle.wait_timeout(n, deadline - now) {
                Ok((g, _)) => g,
                Err(p) => p.into_inner().0,
            };
        }
        true
    }

    /// Stop the worker and discard queued jobs. Idempotent.
    ///
    /// A `push` blocked on a full queue returns [`BridgeError::PipelineClosed`].
    pub fn shutdown(&self) {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        let Some(handle) = handle else {
            return;
        };
        let _ = self.stop.try_send(());
        if handle.join().is_err() {
            tracing::warn!("image writer thread panicked");
        }
        self.in_flight.reset();
    }
}

impl Drop for ImageWritePipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(
    jobs: Receiver<ImageJob>,
    stop: Receiver<()>,
    mut sink: Box<dyn ImageSink>,
    unpremultiply: bool,
    in_flight: &InFlight,
) {
    loop {
        if stop.try_recv().is_ok() {
            break;
        }
        let next = crossbeam_channel::select! {
            recv(stop) -> _ => None,
            recv(jobs) -> msg => msg.ok(),
        };
        let Some(job) = next else {
            break;
        };

        let path = job.path.clone();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            write_job(sink.as_mut(), job, unpremultiply)
        }));
        match res {
            Ok(Ok(())) => tracing::trace!(path = %path.display(), "frame written"),
            Ok(Err(e)) => tracing::debug!(path = %path.display(), "frame dropped: {e}"),
            Err(_) => tracing::debug!(path = %path.display(), "frame dropped: sink panicked"),
        }
        in_flight.done();
    }
    let discarded = jobs.len();
    if discarded > 0 {
        tracing::debug!(discarded, "image writer stopped with queued frames");
    }
}

fn write_job(sink: &mut dyn ImageSink, mut job: ImageJob, unpremultiply: bool) -> BridgeResult<()> {
    // An empty buffer means the surface could not be read back (e.g. minimized window).
    if job.frame.data.is_empty() {
        return Err(BridgeError::validation("empty frame buffer"));
    }
    if unpremultiply && job.frame.premultiplied {
        unpremultiply_rgba8(&mut job.frame.data);
        job.frame.premultiplied = false;
    }
    job.frame.flip_vertical();
    sink.write(&job.path, &job.frame)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/writer.rs"]
mod tests;
