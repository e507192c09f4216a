use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use lockstep::{
    BridgeConfig, BridgeResult, Ease, FileImageSink, FrameContext, FrameRGBA, ParamRegistry,
    Renderer, SessionController, TweenId, UdpTransport,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lockstep", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve host sessions with the built-in disc renderer.
    Serve(ServeArgs),
    /// Print the effective configuration as JSON.
    PrintConfig(ConfigArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file; missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// UDP port for host commands.
    #[arg(long)]
    inbound_port: Option<u16>,

    /// Host address for replies.
    #[arg(long)]
    outbound_host: Option<IpAddr>,

    /// UDP port for replies.
    #[arg(long)]
    outbound_port: Option<u16>,

    /// OSC address namespace.
    #[arg(long)]
    namespace: Option<String>,

    /// Output directory until the host configures one.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write straight-alpha images instead of premultiplied.
    #[arg(long)]
    unpremultiply: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Ask the host for its camera and echo it back after rendering.
    #[arg(long)]
    camera: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::PrintConfig(args) => cmd_print_config(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &ConfigArgs) -> anyhow::Result<BridgeConfig> {
    let mut cfg = match &args.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(port) = args.inbound_port {
        cfg.inbound_port = port;
    }
    if let Some(host) = args.outbound_host {
        cfg.outbound_host = host;
    }
    if let Some(port) = args.outbound_port {
        cfg.outbound_port = port;
    }
    if let Some(ns) = &args.namespace {
        cfg.namespace = ns.clone();
    }
    if let Some(dir) = &args.output_dir {
        cfg.output_dir = dir.clone();
    }
    cfg.unpremultiply |= args.unpremultiply;
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_print_config(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args)?;
    let json = serde_json::to_string_pretty(&cfg).context("serialize config")?;
    println!("{json}");
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    init_tracing();
    let cfg = resolve_config(&args.config)?;
    let transport = UdpTransport::bind(cfg.listen_addr(), cfg.peer_addr())?;
    let renderer = Disc {
        camera: args.camera,
        grow: None,
    };
    let mut controller = SessionController::new(
        renderer,
        transport,
        cfg.controller_opts(),
        Box::new(FileImageSink::new()),
    )?;

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("install Ctrl-C handler")?;

    controller.run(&stop)?;
    // Dropping the controller joins the image writer.
    drop(controller);
    tracing::info!("stopped");
    Ok(())
}

/// Seconds the disc takes to grow to its full size.
const GROW_SECS: f64 = 0.5;

/// Antialiased disc driven by host parameters.
struct Disc {
    camera: bool,
    grow: Option<TweenId>,
}

impl Renderer for Disc {
    fn init(&mut self, params: &mut ParamRegistry<'_>) -> BridgeResult<()> {
        params.add("Size", 50.0f32)?;
        params.add("Color", [1.0f32, 0.5, 0.2])?;
        params.add("Center", Vec2::new(0.5, 0.5))?;
        params.add("Visible", true)?;
        if self.camera {
            params.add_camera()?;
        }
        Ok(())
    }

    fn setup(&mut self, ctx: &mut FrameContext<'_>) -> BridgeResult<()> {
        self.grow = Some(ctx.tweens().add(0.0, GROW_SECS, 0.0, 1.0, Ease::Out));
        Ok(())
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) -> BridgeResult<()> {
        let phase = (ctx.frame().0 + 1) as f32 / ctx.duration() as f32;
        ctx.set_value("Phase", phase)?;
        if self.camera {
            let cam = ctx.camera()?;
            ctx.set_camera(cam.fov_degrees, cam.view_inverse);
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut FrameContext<'_>) -> BridgeResult<FrameRGBA> {
        let canvas = ctx.surface().canvas;
        let mut frame = FrameRGBA::transparent(canvas.width, canvas.height);
        if !ctx.checkbox("Visible")? {
            return Ok(frame);
        }

        let grow = match self.grow {
            Some(id) => ctx.tweens().value(id).unwrap_or(1.0) as f32,
            None => 1.0,
        };
        let radius = ctx.slider("Size")?.max(0.0) * grow;
        let [r, g, b] = ctx.color("Color")?;
        let center = ctx.point2("Center")? * Vec2::new(canvas.width as f32, canvas.height as f32);
        let rgb = [r, g, b].map(|c| c.clamp(0.0, 1.0));

        let stride = canvas.width as usize * 4;
        for (row, line) in frame.data.chunks_exact_mut(stride).enumerate() {
            // Rows are stored bottom-to-top.
            let y = (canvas.height as usize - 1 - row) as f32 + 0.5;
            for (x, px) in line.chunks_exact_mut(4).enumerate() {
                let d = Vec2::new(x as f32 + 0.5, y).distance(center);
                let a = (radius - d + 0.5).clamp(0.0, 1.0);
                if a == 0.0 {
                    continue;
                }
                for (dst, c) in px.iter_mut().zip(rgb) {
                    *dst = (c * a * 255.0).round() as u8;
                }
                px[3] = (a * 255.0).round() as u8;
            }
        }
        Ok(frame)
    }
}
