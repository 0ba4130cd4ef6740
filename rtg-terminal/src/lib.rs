//! Terminal-based ASCII frontend for the RTG core
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use rtg_core::{transform, update_camera_controls, Camera, CameraControls, CursorMode};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod error;
pub mod input;
pub mod renderer;
pub mod scenes;

pub use config::{SceneConfig, SceneKind};
pub use error::{AppError, AppResult};
pub use input::{Command, TerminalInput};
pub use renderer::{AsciiRenderer, Light};
pub use scenes::Scene;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

const CONTROLS_HELP: &str =
    "WASD/QE move, Shift sprint, L keyboard look, P projection, R reset, Esc quit";

/// Longest frame step fed to the controls, so a stall does not teleport the camera
const MAX_FRAME_STEP: f32 = 0.25;

/// Camera aspect ratio for a grid of `cols` x `rows` terminal cells
pub fn viewport_aspect(cols: u16, rows: u16) -> f32 {
    f32::from(cols) / (f32::from(rows.max(1)) * CELL_ASPECT)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    config: SceneConfig,
    scene: Scene,
    camera: Camera,
    controls: CameraControls,
    input: TerminalInput,
    renderer: AsciiRenderer,
    light: Light,
    cursor_mode: CursorMode,
    running: bool,
    last_frame: Instant,
    fps_window: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: SceneConfig) -> AppResult<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, width, height)
    }

    /// Build the app for a fixed terminal size without touching the terminal
    pub fn with_size(config: SceneConfig, width: u16, height: u16) -> AppResult<Self> {
        config.validate()?;
        let camera = config.camera.build(viewport_aspect(width, height))?;
        let mut controls = config.controls.build();
        controls.aim_at(&camera)?;
        let now = Instant::now();

        Ok(Self {
            scene: Scene::build(config.scene)?,
            camera,
            controls,
            input: TerminalInput::new(),
            renderer: AsciiRenderer::new(usize::from(width), usize::from(height)),
            light: Light::from_config(&config.light)?,
            cursor_mode: CursorMode::Released,
            running: true,
            last_frame: now,
            fps_window: now,
            frame_count: 0,
            fps: 0.0,
            config,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &CameraControls {
        &self.controls
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> AppResult<()> {
        log::info!("Starting {:?} scene", self.scene.kind);
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        log::info!("Stopped after {:?}", self.fps_window.elapsed());
        result
    }

    fn main_loop(&mut self) -> AppResult<()> {
        let fps = self.config.target_fps.max(1);
        let target_frame_time = Duration::from_secs(1) / fps;

        while self.running {
            let frame_start = Instant::now();

            // Drain everything that arrived since the last frame
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(&event, frame_start)?;
            }
            self.input.refresh(frame_start);

            let dt = frame_start
                .saturating_duration_since(self.last_frame)
                .as_secs_f32()
                .min(MAX_FRAME_STEP);
            self.last_frame = frame_start;

            self.update(dt);
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            let window = now.saturating_duration_since(self.fps_window);
            if window.as_secs() >= 1 {
                self.fps = self.frame_count as f32 / window.as_secs_f32();
                self.frame_count = 0;
                self.fps_window = now;
            }
        }

        Ok(())
    }

    /// Apply one terminal event
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> AppResult<()> {
        if let Event::Resize(width, height) = *event {
            self.resize(width, height)?;
            return Ok(());
        }

        match self.input.handle_event(event, now) {
            Some(Command::Quit) => self.running = false,
            Some(Command::ToggleProjection) => {
                self.camera.toggle_projection();
                log::debug!("Projection switched to {:?}", self.camera.mode);
            }
            Some(Command::Reset) => self.reset()?,
            Some(Command::ToggleKeyboardLook) | None => {}
        }
        Ok(())
    }

    /// Advance controls and animation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let mode =
            update_camera_controls(self.input.state(), &mut self.camera, &mut self.controls, dt);
        if mode != self.cursor_mode {
            log::trace!("Cursor {:?}", mode);
            self.cursor_mode = mode;
        }

        self.scene.spin(self.config.spin * dt);
    }

    fn resize(&mut self, width: u16, height: u16) -> AppResult<()> {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return Ok(());
        }
        self.camera.set_aspect_ratio(viewport_aspect(width, height))?;
        self.renderer.resize(usize::from(width), usize::from(height));
        queue!(stdout(), terminal::Clear(ClearType::All))?;
        Ok(())
    }

    /// Camera back to its configured start, keeping the current aspect ratio
    fn reset(&mut self) -> AppResult<()> {
        let aspect = self.camera.aspect_ratio();
        self.camera = self.config.camera.build(aspect)?;
        self.controls.aim_at(&self.camera)?;
        log::debug!("Camera reset to {:?}", self.camera.position);
        Ok(())
    }

    /// Rasterize the scene into the character buffer
    pub fn render_scene(&mut self) {
        self.renderer.clear();

        if let Err(err) = self.camera.try_view_matrix() {
            log::warn!("Skipping frame: {}", err);
            return;
        }

        let anchor = transform::translate(&self.camera.position);
        for object in &self.scene.objects {
            let model = if object.follows_camera {
                anchor * object.transform.model_matrix()
            } else {
                object.transform.model_matrix()
            };
            self.renderer
                .render_mesh(&object.mesh, &model, &self.camera, &self.light);
        }
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    fn render(&mut self) -> AppResult<()> {
        self.render_scene();

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let projection = if self.camera.is_orthographic() {
            "ortho"
        } else {
            "persp"
        };
        let look = if self.input.keyboard_look() {
            "arrows"
        } else {
            "right-drag"
        };
        let hud = format!(
            "RTG {:?} | FPS: {:.1} | yaw {:.0} pitch {:.0} | {} | {} look, {}",
            self.scene.kind,
            self.fps,
            self.controls.yaw,
            self.controls.pitch,
            projection,
            look,
            CONTROLS_HELP,
        );
        // Keep the overlay on one row
        let (width, _) = self.renderer.size();
        let hud: String = hud.chars().take(width).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(hud),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
