use crate::math::Point;

/// Rows kept below the canvas for the status line
pub const STATUS_ROWS: u16 = 1;

/// Pixels left around the wheel so the pointer fits above it
const MARGIN: f64 = 2.0;

const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Where the wheel sits on the pixel canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelGeometry {
    pub center: Point,
    pub radius: f64,
}

/// Terminal drawing area, measured in cells and in half-block pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    cols: u16,
    rows: u16,
    geometry: WheelGeometry,
}

impl Surface {
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut surface = Surface {
            cols,
            rows,
            geometry: WheelGeometry {
                center: Point::ZERO,
                radius: 0.0,
            },
        };
        surface.resize(cols, rows);
        surface
    }

    /// Measures the controlling terminal
    pub fn detect() -> Self {
        let (cols, rows) = termsize::get()
            .map(|size| (size.cols, size.rows))
            .or_else(|| crossterm::terminal::size().ok())
            .unwrap_or(FALLBACK_SIZE);
        tracing::debug!(cols, rows, "terminal size detected");
        Surface::new(cols, rows)
    }

    /// Recomputes the wheel geometry for a new terminal size
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        let (width, height) = (self.pixel_width() as f64, self.pixel_height() as f64);
        self.geometry = WheelGeometry {
            center: Point::new(width / 2.0, height / 2.0),
            radius: (width.min(height) / 2.0 - MARGIN).max(0.0),
        };
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Rows available to the pixel canvas
    pub fn canvas_rows(&self) -> u16 {
        self.rows.saturating_sub(STATUS_ROWS)
    }

    /// Row of the status line
    pub fn status_row(&self) -> u16 {
        self.canvas_rows()
    }

    pub fn pixel_width(&self) -> usize {
        self.cols as usize
    }

    pub fn pixel_height(&self) -> usize {
        self.canvas_rows() as usize * 2
    }

    pub fn geometry(&self) -> WheelGeometry {
        self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_fits_the_shorter_side() {
        let surface = Surface::new(80, 25);
        assert_eq!(surface.pixel_width(), 80);
        assert_eq!(surface.pixel_height(), 48);
        let geometry = surface.geometry();
        assert_eq!(geometry.center, Point::new(40.0, 24.0));
        assert_eq!(geometry.radius, 22.0);
    }

    #[test]
    fn resize_recomputes_geometry() {
        let mut surface = Surface::new(80, 25);
        surface.resize(30, 41);
        let geometry = surface.geometry();
        assert_eq!(geometry.center, Point::new(15.0, 40.0));
        assert_eq!(geometry.radius, 13.0);
        assert_eq!(surface.status_row(), 40);
    }

    #[test]
    fn tiny_terminals_have_no_wheel() {
        let surface = Surface::new(2, 1);
        assert_eq!(surface.pixel_height(), 0);
        assert_eq!(surface.geometry().radius, 0.0);
    }
}
