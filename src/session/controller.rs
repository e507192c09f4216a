use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rosc::{OscMessage, OscType};

use crate::encode::sink::ImageSink;
use crate::encode::writer::{ImageJob, ImageWritePipeline, WriterOpts};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{BridgeResult, ProtocolError};
use crate::params::store::ParameterStore;
use crate::protocol::address::{Addresses, Command, DEFAULT_NAMESPACE, PrerenderRequest, parse_command};
use crate::protocol::batch::setdown_messages;
use crate::protocol::codec::{ConfigureRequest, configure_reply, status_reply};
use crate::protocol::ingest::apply_prerender;
use crate::protocol::transport::Transport;
use crate::render::backend::{PointerEvent, Renderer};
use crate::render::context::{FrameContext, ParamRegistry};
use crate::session::state::{SessionSettings, SessionState, home_dir_or_cwd};
use crate::session::tween::TweenClock;

/// Floor applied to [`ControllerOpts::drain_interval`].
pub const MIN_DRAIN_INTERVAL: Duration = Duration::from_millis(10);

/// Options for [`SessionController::new`].
#[derive(Clone, Debug)]
pub struct ControllerOpts {
    /// First address segment of every message.
    pub namespace: String,
    /// Image write queue options.
    pub writer: WriterOpts,
    /// Heartbeat interval while draining image writes, at least [`MIN_DRAIN_INTERVAL`].
    pub drain_interval: Duration,
    /// Pause after the renderer's `setup` callback, before the first frame.
    pub settle_delay: Duration,
    /// Executable path reported in `renderend`; defaults to the current executable.
    pub executable_path: Option<String>,
    /// Output directory until the host configures one.
    pub output_dir: PathBuf,
    /// Output file stem until the host configures one.
    pub file_stem: String,
    /// Image file extension.
    pub image_ext: String,
}

impl Default for ControllerOpts {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            writer: WriterOpts::default(),
            drain_interval: Duration::from_secs(1),
            settle_delay: Duration::from_millis(500),
            executable_path: None,
            output_dir: home_dir_or_cwd(),
            file_stem: "render".to_owned(),
            image_ext: "png".to_owned(),
        }
    }
}

/// Mutable session context, owned by the controller and lent to the renderer per callback.
struct Session {
    state: SessionState,
    frame: FrameIndex,
    settings: SessionSettings,
    store: ParameterStore,
    tweens: TweenClock,
}

impl Session {
    fn ctx(&mut self) -> FrameContext<'_> {
        FrameContext {
            store: &mut self.store,
            tweens: &mut self.tweens,
            settings: &self.settings,
            frame: self.frame,
        }
    }
}

/// Drives one renderer through `Setup -> Render -> Setdown -> Setup` on behalf of the host.
///
/// All work happens on the calling thread except image writes, which go to an
/// [`ImageWritePipeline`]. Call [`SessionController::tick`] once per frame, or hand the loop to
/// [`SessionController::run`].
pub struct SessionController<R: Renderer, T: Transport> {
    renderer: R,
    transport: T,
    session: Session,
    addrs: Addresses,
    writer: ImageWritePipeline,
    drain_interval: Duration,
    settle_delay: Duration,
    executable_path: String,
    last_heartbeat: Option<Instant>,
}

impl<R: Renderer, T: Transport> SessionController<R, T> {
    /// Register the renderer's parameters, start the writer and enter `Setup`.
    #[tracing::instrument(skip_all, fields(namespace = %opts.namespace))]
    pub fn new(
        mut renderer: R,
        transport: T,
        opts: ControllerOpts,
        sink: Box<dyn ImageSink>,
    ) -> BridgeResult<Self> {
        let mut store = ParameterStore::new();
        renderer.init(&mut ParamRegistry { store: &mut store })?;
        store.close_registration();
        tracing::info!(
            parameters = store.parameters().len(),
            camera = store.camera_requested(),
            "parameters registered"
        );

        let writer = ImageWritePipeline::spawn(opts.writer, sink)?;
        let executable_path = opts.executable_path.unwrap_or_else(|| {
            std::env::current_exe()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        });

        let settings = SessionSettings::new(opts.output_dir, opts.file_stem, opts.image_ext);
        store.set_duration(settings.duration);

        let mut controller = Self {
            renderer,
            transport,
            session: Session {
                state: SessionState::Uninitialized,
                frame: FrameIndex(0),
                settings,
                store,
                tweens: TweenClock::new(),
            },
            addrs: Addresses::new(opts.namespace),
            writer,
            drain_interval: opts.drain_interval.max(MIN_DRAIN_INTERVAL),
            settle_delay: opts.settle_delay,
            executable_path,
            last_heartbeat: None,
        };
        controller.enter_setup();
        Ok(controller)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.session.state
    }

    /// Next frame to render.
    pub fn frame(&self) -> FrameIndex {
        self.session.frame
    }

    /// Parameter registry, timelines and setters.
    pub fn store(&self) -> &ParameterStore {
        &self.session.store
    }

    /// Host-configured session settings.
    pub fn settings(&self) -> &SessionSettings {
        &self.session.settings
    }

    /// The driven renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The message transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the message transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// `true` when no frame is waiting to be written.
    pub fn is_writer_idle(&self) -> bool {
        self.writer.is_idle()
    }

    /// Advance the session by one step.
    ///
    /// Outside `Setdown` this drains inbound messages and, if rendering, draws one frame.
    /// In `Setdown` it waits on the image writer and finishes the session once it is idle.
    pub fn tick(&mut self) -> BridgeResult<()> {
        if self.session.state == SessionState::Setdown {
            return self.drain_step();
        }
        for msg in self.transport.drain()? {
            self.handle_message(&msg)?;
        }
        if self.session.state == SessionState::Render {
            self.render_frame()?;
        }
        Ok(())
    }

    /// Tick at the session frame rate until `stop` is set or a tick fails.
    pub fn run(&mut self, stop: &AtomicBool) -> BridgeResult<()> {
        tracing::info!("session loop started");
        while !stop.load(Ordering::Relaxed) {
            let started = Instant::now();
            self.tick()?;
            if self.session.state == SessionState::Setdown {
                continue;
            }
            let budget = Duration::from_secs_f64(self.session.settings.fps.frame_duration_secs());
            if let Some(rest) = budget.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        tracing::info!("session loop stopped");
        Ok(())
    }

    /// Apply one inbound message.
    ///
    /// Protocol errors are answered on the message's address and leave the session unchanged.
    /// Only renderer callback failures and transport failures are returned.
    #[tracing::instrument(skip_all, fields(addr = %msg.addr))]
    pub fn handle_message(&mut self, msg: &OscMessage) -> BridgeResult<()> {
        if self.session.state == SessionState::Setdown {
            tracing::debug!("ignored during setdown");
            return Ok(());
        }
        let cmd = match parse_command(self.addrs.namespace(), msg) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => {
                tracing::trace!("not a bridge message");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("rejected: {e}");
                return self.transport.send(status_reply(&msg.addr, Err(e)));
            }
        };
        tracing::debug!(state = ?self.session.state, "command");
        match cmd {
            Command::Configure(req) => self.configure(&msg.addr, &req),
            Command::Prerender(req) => self.prerender(&msg.addr, &req),
            Command::RenderBegin => self.begin_render(&msg.addr),
            Command::Quit => {
                if matches!(self.session.state, SessionState::Setup | SessionState::Render) {
                    tracing::info!(frame = self.session.frame.0, "quit requested");
                    self.enter_setdown();
                }
                Ok(())
            }
        }
    }

    /// Forward pointer input to the renderer; dropped unless rendering.
    pub fn pointer_event(&mut self, event: PointerEvent) -> BridgeResult<()> {
        if self.session.state != SessionState::Render {
            return Ok(());
        }
        self.renderer.pointer(event, &mut self.session.ctx())
    }

    fn configure(&mut self, addr: &str, req: &ConfigureRequest) -> BridgeResult<()> {
        if self.session.state == SessionState::Render {
            tracing::warn!("configure while rendering");
            return self
                .transport
                .send(status_reply(addr, Err(ProtocolError::ConfigureWhileRendering)));
        }
        let settings = &mut self.session.settings;
        settings.apply(req);
        self.session.store.set_duration(settings.duration);
        tracing::info!(
            duration = settings.duration,
            fps = settings.fps.as_f32(),
            width = settings.canvas.width,
            height = settings.canvas.height,
            write = settings.write,
            cache = settings.cache,
            "session configured"
        );
        self.transport
            .send(configure_reply(addr, &self.session.store))
    }

    fn prerender(&mut self, addr: &str, req: &PrerenderRequest) -> BridgeResult<()> {
        let status = if self.session.state == SessionState::Render {
            Err(ProtocolError::PrerenderWhileRendering)
        } else {
            apply_prerender(&mut self.session.store, req)
        };
        if let Err(e) = &status {
            tracing::warn!(param = %req.target, "prerender rejected: {e}");
        }
        self.transport.send(status_reply(addr, status))
    }

    fn begin_render(&mut self, addr: &str) -> BridgeResult<()> {
        if self.session.state != SessionState::Setup {
            tracing::debug!("render request ignored");
            return Ok(());
        }
        if !self.session.store.is_cache_complete() {
            tracing::warn!("render requested before timelines are complete");
            return self
                .transport
                .send(status_reply(addr, Err(ProtocolError::NotCached)));
        }

        let session = &mut self.session;
        session.frame = FrameIndex(0);
        session.store.set_readable(true);
        session.tweens.clear();
        session.tweens.step_to(0.0);
        session.state = SessionState::Render;
        tracing::info!(
            duration = session.settings.duration,
            surface = ?session.settings.surface(),
            "rendering"
        );

        self.renderer.setup(&mut self.session.ctx())?;
        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }
        Ok(())
    }

    fn render_frame(&mut self) -> BridgeResult<()> {
        let session = &mut self.session;
        let frame = session.frame;
        session
            .tweens
            .step_to(session.settings.fps.frame_to_secs(frame));

        self.renderer.update(&mut session.ctx())?;
        let image = self.renderer.draw(&mut session.ctx())?;

        if session.settings.write {
            self.writer.push(ImageJob {
                path: session.settings.frame_path(frame),
                frame: image,
            })?;
        }
        self.transport.send(OscMessage {
            addr: self.addrs.render_ack(frame),
            args: Vec::new(),
        })?;
        tracing::trace!(frame = frame.0, "frame rendered");

        session.frame = FrameIndex(frame.0 + 1);
        if session.frame.0 >= session.settings.duration {
            self.enter_setdown();
        }
        Ok(())
    }

    fn drain_step(&mut self) -> BridgeResult<()> {
        if !self.writer.is_idle() {
            let due = self
                .last_heartbeat
                .is_none_or(|t| t.elapsed() >= self.drain_interval);
            if due {
                self.transport.send(OscMessage {
                    addr: self.addrs.write_heartbeat(),
                    args: Vec::new(),
                })?;
                self.last_heartbeat = Some(Instant::now());
            }
            if !self.writer.wait_idle(self.drain_interval) {
                return Ok(());
            }
        }
        self.finish_setdown()
    }

    #[tracing::instrument(skip_all)]
    fn finish_setdown(&mut self) -> BridgeResult<()> {
        let session = &self.session;
        if session.settings.write {
            let messages =
                setdown_messages(&self.addrs, &session.store, session.settings.canvas.height);
            tracing::debug!(messages = messages.len(), "sending setters");
            for msg in messages {
                self.transport.send(msg)?;
            }
        }
        let pattern = session.settings.frame_path(FrameIndex(0));
        self.transport.send(OscMessage {
            addr: self.addrs.render_end(),
            args: vec![
                OscType::String(pattern.display().to_string()),
                OscType::String(self.executable_path.clone()),
                OscType::String(session.settings.source_path.clone()),
                OscType::Float(session.settings.source_time),
            ],
        })?;
        self.enter_setup();
        Ok(())
    }

    fn enter_setdown(&mut self) {
        self.session.state = SessionState::Setdown;
        self.session.store.set_readable(false);
        self.last_heartbeat = None;
        tracing::info!(frames = self.session.frame.0, "setdown");
    }

    fn enter_setup(&mut self) {
        let session = &mut self.session;
        session.store.clear_setters();
        session.store.set_readable(false);
        session.frame = FrameIndex(0);
        session.state = SessionState::Setup;
        tracing::info!("ready for setup");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
