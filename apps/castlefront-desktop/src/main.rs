use anyhow::{Context, Result};
use castlefront_common::Side;
use castlefront_driver::{ActionResult, FrameClock, FrameDriver};
use castlefront_input::{Action, Key};
use castlefront_kernel::{Battlefield, MatchConfig, MatchEvent};
use castlefront_render::{Scene, SceneRenderer};
use castlefront_render_wgpu::{FieldCamera, WgpuRenderer};
use castlefront_tools::MatchInspector;
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Longest frame the simulation is allowed to see, in seconds.
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Parser)]
#[command(name = "castlefront-desktop", about = "Castlefront desktop game")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Seed for enemy spawn jitter
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Match configuration (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Application state.
struct AppState {
    driver: FrameDriver<SceneRenderer>,
    camera: FieldCamera,
    scene: Scene,
    show_inspector: bool,
    cursor: Vec2,
    started: Instant,
}

impl AppState {
    fn new(config: MatchConfig, seed: u64) -> Result<Self> {
        let field = config.field_size();
        let battlefield = Battlefield::with_seed(config, seed).context("starting match")?;
        let driver = FrameDriver::new(battlefield, SceneRenderer::new())
            .with_clock(FrameClock::with_max_dt(MAX_FRAME_DT));
        Ok(Self {
            driver,
            camera: FieldCamera::new(field, field.x as u32, field.y as u32),
            scene: Scene::default(),
            show_inspector: false,
            cursor: Vec2::ZERO,
            started: Instant::now(),
        })
    }

    fn update(&mut self) {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let frame = self.driver.frame(now_ms);
        for event in &frame.events {
            log_event(event);
        }
        self.scene = frame.output;
    }

    /// Apply an action; returns true when the app should quit.
    fn handle(&mut self, result: ActionResult) -> bool {
        match result {
            ActionResult::Spawned(id) => tracing::debug!(%id, "player unit spawned"),
            ActionResult::SpawnRefused => tracing::debug!("spawn refused"),
            ActionResult::Restarted => tracing::info!("match restarted"),
            ActionResult::ViewChanged => {
                tracing::debug!(grid = self.driver.view().show_grid, "view changed")
            }
            ActionResult::Host(Action::ToggleInspector) => {
                self.show_inspector = !self.show_inspector;
            }
            ActionResult::Host(Action::Quit) => return true,
            ActionResult::Host(_) | ActionResult::Ignored => {}
        }
        false
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        let result = self.driver.key_press(map_key(key));
        self.handle(result)
    }

    fn handle_click(&mut self) {
        let position = self.camera.screen_to_field(self.cursor);
        let result = self.driver.pointer_press(position);
        self.handle(result);
    }

    /// Scene text goes through egui so it shares the UI font.
    fn draw_scene_text(&self, ctx: &EguiContext) {
        let painter = ctx.layer_painter(egui::LayerId::background());
        let ppp = ctx.pixels_per_point();
        for (text, anchor, size, color) in self.scene.texts() {
            let screen = self.camera.field_to_screen(anchor) / ppp;
            let [r, g, b, a] = color.to_array().map(|c| (c * 255.0).round() as u8);
            painter.text(
                egui::pos2(screen.x, screen.y),
                egui::Align2::CENTER_CENTER,
                text,
                egui::FontId::proportional(size * self.camera.scale() / ppp),
                egui::Color32::from_rgba_unmultiplied(r, g, b, a),
            );
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        self.draw_scene_text(ctx);
        if !self.show_inspector {
            return;
        }

        let summary = MatchInspector::summary(self.driver.battlefield());
        let timer = self.driver.timer();
        let (fps, worst_ms) = (timer.fps(), timer.max() * 1000.0);
        let mut action = None;

        egui::SidePanel::left("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Castlefront");
                ui.separator();
                ui.label(format!("Tick: {}  Seed: {}", summary.tick, summary.seed));
                ui.label(format!("Time: {:.1}s", summary.elapsed));
                ui.label(format!("FPS: {fps:.0} (worst {worst_ms:.1} ms)"));
                ui.separator();

                ui.heading("Castles");
                ui.label(format!("Player: {:.1} hp", summary.player_castle_hp));
                ui.label(format!("Enemy: {:.1} hp", summary.enemy_castle_hp));
                ui.label(format!("Next enemy in {:.1}s", summary.next_enemy_in.max(0.0)));
                ui.separator();

                ui.heading("Units");
                ui.label(format!(
                    "Player: {}  Enemy: {}",
                    summary.player_units, summary.enemy_units
                ));
                egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                    for id in MatchInspector::list_units(self.driver.battlefield()) {
                        if let Some(info) = MatchInspector::inspect_unit(self.driver.battlefield(), id)
                        {
                            ui.monospace(info.to_string());
                        }
                    }
                });
                ui.separator();

                ui.heading("Tools");
                ui.horizontal(|ui| {
                    if ui.button("Spawn (click)").clicked() {
                        action = Some(Action::SpawnUnit(Side::Player));
                    }
                    if ui.button("Restart (R)").clicked() {
                        action = Some(Action::Restart);
                    }
                    if ui.button("Grid (G)").clicked() {
                        action = Some(Action::ToggleGrid);
                    }
                });

                ui.separator();
                ui.small("LMB left half: Spawn | F1: Toggle Inspector | Esc: Quit");
            });

        if let Some(action) = action {
            let result = self.driver.apply(action);
            self.handle(result);
        }
    }
}

fn map_key(key: KeyCode) -> Key {
    match key {
        KeyCode::KeyR => Key::R,
        KeyCode::KeyG => Key::G,
        KeyCode::F1 => Key::F1,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

fn log_event(event: &MatchEvent) {
    match event {
        MatchEvent::MatchEnded { tick, outcome } => {
            tracing::info!(tick, %outcome, "match over: {}", outcome.banner())
        }
        MatchEvent::Stepped { .. } => tracing::trace!(?event, "match event"),
        _ => tracing::debug!(?event, "match event"),
    }
}

/// GPU objects created once the window exists.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Castlefront")
            .with_inner_size(PhysicalSize::new(1024u32, 768));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("castlefront_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        // Palette colors are plain hex values; write them without sRGB conversion.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(config: MatchConfig, seed: u64) -> Result<Self> {
        Ok(Self {
            state: AppState::new(config, seed)?,
            gpu: None,
            egui_ctx: EguiContext::default(),
        })
    }

    fn redraw(&mut self) {
        self.state.update();

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &self.state.camera,
            &self.state.scene,
        );

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.camera.resize(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("GPU setup failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                    self.state
                        .camera
                        .resize(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if self.state.handle_key(key) {
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                self.state.handle_click();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("loading match config from {}", path.display()))?,
        None => MatchConfig::default(),
    };

    tracing::info!(seed = cli.seed, "castlefront-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, cli.seed)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
