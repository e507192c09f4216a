use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};

use super::*;
use crate::encode::sink::InMemoryImageSink;

const WAIT: Duration = Duration::from_secs(5);

fn job(i: u32) -> ImageJob {
    ImageJob {
        path: PathBuf::from(format!("f_{i:05}.png")),
        frame: FrameRGBA {
            width: 1,
            height: 2,
            data: vec![i as u8, 0, 0, 255, 0, i as u8, 0, 255],
            premultiplied: false,
        },
    }
}

/// Blocks every write until a release token arrives; a dropped releaser unblocks for good.
struct GatedSink {
    started: Sender<()>,
    release: Receiver<()>,
    inner: InMemoryImageSink,
}

impl ImageSink for GatedSink {
    fn write(&mut self, path: &Path, frame: &FrameRGBA) -> BridgeResult<()> {
        let _ = self.started.send(());
        let _ = self.release.recv();
        self.inner.write(path, frame)
    }
}

fn gated(capacity: usize) -> (ImageWritePipeline, Receiver<()>, Sender<()>, InMemoryImageSink) {
    let (started_tx, started_rx) = unbounded();
    let (release_tx, release_rx) = unbounded();
    let inner = InMemoryImageSink::new();
    let pipe = ImageWritePipeline::spawn(
        WriterOpts {
            capacity,
            unpremultiply: false,
        },
        Box::new(GatedSink {
            started: started_tx,
            release: release_rx,
            inner: inner.clone(),
        }),
    )
    .unwrap();
    (pipe, started_rx, release_tx, inner)
}

struct FailingSink {
    fail_first: bool,
    inner: InMemoryImageSink,
}

impl ImageSink for FailingSink {
    fn write(&mut self, path: &Path, frame: &FrameRGBA) -> BridgeResult<()> {
        if std::mem::take(&mut self.fail_first) {
            return Err(BridgeError::validation("disk full"));
        }
        self.inner.write(path, frame)
    }
}

#[test]
fn frames_are_flipped_and_written_in_order() {
    let sink = InMemoryImageSink::new();
    let pipe = ImageWritePipeline::spawn(WriterOpts::default(), Box::new(sink.clone())).unwrap();
    for i in 0..5 {
        pipe.push(job(i)).unwrap();
    }
    assert!(pipe.wait_idle(WAIT));
    assert!(pipe.is_idle());

    let frames = sink.frames();
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[3].0, PathBuf::from("f_00003.png"));
    assert_eq!(&frames[3].1.data[..4], &[0, 3, 0, 255], "rows flipped");
}

#[test]
fn unpremultiply_is_applied_before_writing() {
    let sink = InMemoryImageSink::new();
    let pipe = ImageWritePipeline::spawn(
        WriterOpts {
            capacity: 4,
            unpremultiply: true,
        },
        Box::new(sink.clone()),
    )
    .unwrap();
    pipe.push(ImageJob {
        path: PathBuf::from("p.png"),
        frame: FrameRGBA {
            width: 1,
            height: 1,
            data: vec![64, 32, 0, 128],
            premultiplied: true,
        },
    })
    .unwrap();
    assert!(pipe.wait_idle(WAIT));
    let f = &sink.frames()[0].1;
    assert_eq!(f.data, vec![128, 64, 0, 128]);
    assert!(!f.premultiplied);
}

#[test]
fn write_failures_are_swallowed_and_the_worker_continues() {
    let inner = InMemoryImageSink::new();
    let pipe = ImageWritePipeline::spawn(
        WriterOpts::default(),
        Box::new(FailingSink {
            fail_first: true,
            inner: inner.clone(),
        }),
    )
    .unwrap();
    pipe.push(job(0)).unwrap();
    pipe.push(job(1)).unwrap();
    pipe.push(ImageJob {
        path: PathBuf::from("empty.png"),
        frame: FrameRGBA::transparent(0, 0),
    })
    .unwrap();
    pipe.push(job(2)).unwrap();
    assert!(pipe.wait_idle(WAIT));

    let names: Vec<PathBuf> = inner.frames().into_iter().map(|(p, _)| p).collect();
    assert_eq!(
        names,
        vec![PathBuf::from("f_00001.png"), PathBuf::from("f_00002.png")]
    );
}

#[test]
fn push_blocks_while_the_queue_is_full() {
    let (pipe, started, release, inner) = gated(2);

    pipe.push(job(0)).unwrap();
    started.recv_timeout(WAIT).unwrap();
    // The worker holds job 0; two more fill the queue.
    pipe.push(job(1)).unwrap();
    pipe.push(job(2)).unwrap();
    assert!(!pipe.is_idle());

    let pushed = AtomicBool::new(false);
    std::thread::scope(|s| {
        s.spawn(|| {
            pipe.push(job(3)).unwrap();
            pushed.store(true, Ordering::SeqCst);
        });

        std::thread::sleep(Duration::from_millis(150));
        assert!(!pushed.load(Ordering::SeqCst), "push must block on a full queue");

        release.send(()).unwrap();
        let deadline = Instant::now() + WAIT;
        while !pushed.load(Ordering::SeqCst) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(pushed.load(Ordering::SeqCst), "push must resume once a slot frees");
    });

    drop(release);
    assert!(pipe.wait_idle(WAIT));
    assert_eq!(inner.frames().len(), 4);
}

#[test]
fn shutdown_discards_queued_jobs_and_unblocks_pushers() {
    let (pipe, started, release, inner) = gated(1);

    pipe.push(job(0)).unwrap();
    started.recv_timeout(WAIT).unwrap();
    pipe.push(job(1)).unwrap();

    std::thread::scope(|s| {
        let blocked = s.spawn(|| pipe.push(job(2)));
        s.spawn(|| pipe.shutdown());

        std::thread::sleep(Duration::from_millis(150));
        release.send(()).unwrap();

        assert!(matches!(
            blocked.join().unwrap(),
            Err(BridgeError::PipelineClosed)
        ));
    });

    assert_eq!(inner.frames().len(), 1, "only the in-progress frame is written");
    assert!(pipe.is_idle());
    assert!(matches!(pipe.push(job(9)), Err(BridgeError::PipelineClosed)));
    pipe.shutdown();
}
