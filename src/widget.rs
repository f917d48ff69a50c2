use crate::effects::{best_effort, Confetti, SoundPort, CELEBRATION};
use crate::error::Result;
use crate::graphics::{Canvas, Rgb};
use crate::math::{resolve_sector, sector_width, Point, POINTER_ANGLE};
use crate::presenter::ResultPresenter;
use crate::sector::Sector;
use crate::spin::{RandomSource, SpinController, SpinHost, SpinTuning};
use crate::state::Phase;
use crate::surface::{Surface, WheelGeometry};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Write;
use std::time::{Duration, Instant};

const BACKGROUND: Rgb = Rgb::new(24, 22, 48);
const RIM: Rgb = Rgb::new(250, 250, 250);
const POINTER: Rgb = Rgb::WHITE;
const POINTER_OUTLINE: Rgb = Rgb::new(90, 90, 110);
const TEXT: Rgb = Rgb::new(235, 235, 245);
const HINT: Rgb = Rgb::new(150, 150, 170);

/// Radius fraction of the subtle darkening ring
const INNER_RING: f64 = 0.92;
const INNER_RING_SHADE: f64 = 0.08;
/// Radius fraction of the hub
const HUB: f64 = 0.30;
const HUB_SHADE: f64 = 0.12;
/// Radius fraction the icons sit at
const ICON_RADIUS: f64 = 0.6;
/// Longest wait for input while nothing is animating
const IDLE_POLL: Duration = Duration::from_millis(250);

/// What the event loop should do after an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Port implementation handed to the spin controller
pub struct WheelHost {
    frame_requested: bool,
    dirty: bool,
    landed: Option<usize>,
    sound: Box<dyn SoundPort>,
}

impl WheelHost {
    pub fn new(sound: Box<dyn SoundPort>) -> Self {
        WheelHost {
            frame_requested: false,
            dirty: true,
            landed: None,
            sound,
        }
    }
}

impl SpinHost for WheelHost {
    fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    fn redraw(&mut self, _angle: f64) {
        self.dirty = true;
    }

    fn spin_started(&mut self) {
        best_effort("spin sound", self.sound.start_spin_loop());
    }

    fn spin_stopped(&mut self) {
        best_effort("stop sound", self.sound.stop_spin_loop());
    }

    fn landed(&mut self, index: usize) {
        self.landed = Some(index);
    }
}

/// Spinning wheel widget
pub struct WheelWidget {
    sectors: Vec<Sector>,
    sector_width: f64,
    surface: Surface,
    spin: SpinController,
    host: WheelHost,
    presenter: ResultPresenter,
    confetti: Confetti,
    /// Enable debug overlay
    debug: bool,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl WheelWidget {
    /// Builds the widget and a spin controller sized to `sectors`
    pub fn new(
        sectors: Vec<Sector>,
        surface: Surface,
        tuning: SpinTuning,
        rng: Box<dyn RandomSource>,
        sound: Box<dyn SoundPort>,
        confetti: Confetti,
        debug: bool,
    ) -> Result<Self> {
        let spin = SpinController::new(sectors.len(), tuning, rng)?;
        Ok(WheelWidget {
            sector_width: sector_width(sectors.len())?,
            sectors,
            surface,
            spin,
            host: WheelHost::new(sound),
            presenter: ResultPresenter::new(),
            confetti,
            debug,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        })
    }

    /// Runs the event loop until the user quits
    pub fn run<W: Write>(&mut self, out: &mut W, frame_interval: Duration) -> Result<()> {
        tracing::info!(sectors = self.sectors.len(), ?frame_interval, "wheel ready");
        loop {
            let now = Instant::now();
            self.update(now);
            if std::mem::take(&mut self.host.dirty) {
                self.render(out, now)?;
            }

            if event::poll(self.poll_timeout(Instant::now(), frame_interval))? {
                // Drain everything queued so input never lags a frame behind
                loop {
                    if self.handle_event(&event::read()?) == Control::Quit {
                        tracing::info!("quit");
                        return Ok(());
                    }
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }

    /// Frame pacing while animating; otherwise sleep until the next timer
    fn poll_timeout(&self, now: Instant, frame_interval: Duration) -> Duration {
        if self.host.frame_requested || self.confetti.is_active() {
            return frame_interval;
        }
        match self.presenter.next_deadline() {
            Some(due) => due.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    /// Handle events for the wheel widget
    pub fn handle_event(&mut self, event: &Event) -> Control {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => return self.handle_key(key),
            Event::Resize(cols, rows) => {
                self.surface.resize(*cols, *rows);
                self.host.dirty = true;
                tracing::debug!(cols, rows, "resized");
            }
            _ => {}
        }
        Control::Continue
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Control {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Control::Quit,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Control::Quit,
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.spin.trigger(&mut self.host);
                Control::Continue
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.debug = !self.debug;
                self.host.dirty = true;
                Control::Continue
            }
            _ => Control::Continue,
        }
    }

    /// Runs the timers and at most one animation step for frame time `now`
    pub fn update(&mut self, now: Instant) {
        if self.presenter.tick(now) {
            self.host.dirty = true;
        }

        if std::mem::take(&mut self.host.frame_requested) {
            self.spin.step(now, &mut self.host);
        }
        if let Some(index) = self.host.landed.take() {
            self.celebrate(index, now);
        }

        if self.confetti.is_active() {
            self.confetti.tick(now, self.surface.pixel_height() as f64);
            self.host.dirty = true;
        }
    }

    fn celebrate(&mut self, index: usize, now: Instant) {
        self.presenter.show(&self.sectors[index].label, now);
        self.confetti.burst(
            CELEBRATION,
            self.surface.pixel_width() as f64,
            self.surface.pixel_height() as f64,
            now,
        );
        self.host.dirty = true;
    }

    fn render<W: Write>(&mut self, out: &mut W, now: Instant) -> Result<()> {
        let canvas = self.paint(now);
        canvas.present(out)?;
        out.flush()?;
        Ok(())
    }

    /// Paints the whole surface
    pub fn paint(&mut self, now: Instant) -> Canvas {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let duration = now.saturating_duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        let mut canvas = Canvas::new(
            self.surface.cols() as usize,
            self.surface.canvas_rows() as usize + 1,
            BACKGROUND,
        );
        let geometry = self.surface.geometry();
        paint_wheel(
            &mut canvas,
            geometry,
            &self.sectors,
            self.sector_width,
            self.spin.current_angle(),
        );
        self.confetti.draw(&mut canvas);

        let status_row = self.surface.status_row() as usize;
        match self.presenter.visible_text() {
            Some(text) => canvas.put_text_centered(status_row, text, TEXT, true),
            None if self.spin.phase() == Phase::Idle => canvas.put_text_centered(
                status_row,
                "[space] spin  [d] debug  [q] quit",
                HINT,
                false,
            ),
            None => {}
        }

        if self.debug {
            self.paint_debug(&mut canvas);
        }
        canvas
    }

    fn paint_debug(&self, canvas: &mut Canvas) {
        let sector = &self.sectors[self.spin.current_sector()];
        let lines = [
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!(
                "Angle: {:.2} -> {:.2}",
                self.spin.current_angle(),
                self.spin.state().target_angle
            ),
            format!("Phase: {}", self.spin.phase().name()),
            format!("Pointer: {}", sector.label),
            format!("FPS: {:.2}", self.fps),
        ];
        for (row, line) in lines.iter().enumerate() {
            canvas.put_text(1, row, line, TEXT, false);
        }
    }
}

/// Draws wedges, rings, icons and the pointer for a wheel rotated by `angle`
pub fn paint_wheel(
    canvas: &mut Canvas,
    geometry: WheelGeometry,
    sectors: &[Sector],
    width: f64,
    angle: f64,
) {
    let WheelGeometry { center, radius } = geometry;
    if radius < 1.0 || sectors.is_empty() {
        return;
    }
    let n = sectors.len();

    canvas.shade_disc(center, radius + 1.0, |_, _| RIM);
    // Each pixel shows the sector the pointer would report at its angle
    canvas.shade_disc(center, radius, |p, _| {
        let (dx, dy) = (p.x - center.x, p.y - center.y);
        let index = resolve_sector(angle, dy.atan2(dx), width, n);
        let distance = dx.hypot(dy);
        let mut color = sectors[index].fill_color;
        if distance <= radius * INNER_RING {
            color = color.blend(Rgb::BLACK, INNER_RING_SHADE);
        }
        if distance <= radius * HUB {
            color = color.blend(Rgb::BLACK, HUB_SHADE);
        }
        color
    });

    for (i, sector) in sectors.iter().enumerate() {
        if sector.icon.is_empty() {
            continue;
        }
        let bisector = i as f64 * width + angle + width / 2.0;
        let at = center.polar(bisector, radius * ICON_RADIUS);
        canvas.put_text_centered_at(at, &sector.icon, TEXT);
    }

    paint_pointer(canvas, center, radius);
}

/// Triangle at the top of the wheel pointing down at its center
fn paint_pointer(canvas: &mut Canvas, center: Point, radius: f64) {
    let arrow_w = (radius * 0.16).max(3.0);
    let arrow_h = arrow_w * 1.1;
    let top = center.polar(POINTER_ANGLE, radius + 1.5);
    let left = Point::new(top.x - arrow_w / 2.0, top.y);
    let right = Point::new(top.x + arrow_w / 2.0, top.y);
    let tip = Point::new(top.x, top.y + arrow_h);

    canvas.fill_triangle(left, right, tip, POINTER);
    canvas.draw_line(left, tip, POINTER_OUTLINE);
    canvas.draw_line(right, tip, POINTER_OUTLINE);
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
