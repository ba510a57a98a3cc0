use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_ZOOM: f64 = 0.4;
pub const MAX_ZOOM: f64 = 2.5;
pub const ZOOM_STEP: f64 = 0.1;

/// Pan offset and zoom scale applied when drawing. Layout coordinates are never
/// touched by this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub pan_x: f64,
    pub pan_y: f64,
    #[serde(deserialize_with = "clamped_scale")]
    pub scale: f64,
}

fn clamped_scale<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let scale = f64::deserialize(deserializer)?;
    if scale.is_nan() {
        return Ok(1.0);
    }
    Ok(scale.clamp(MIN_ZOOM, MAX_ZOOM))
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    /// One wheel notch: scrolling down (positive delta) zooms out.
    pub fn zoom_by_wheel(&mut self, delta_y: f64) {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        let step = if delta_y > 0.0 { -ZOOM_STEP } else { ZOOM_STEP };
        // round to a tenth so repeated steps don't drift
        let next = ((self.scale + step) * 10.0).round() / 10.0;
        self.scale = next.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Map a layout point into screen space.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.pan_x, y * self.scale + self.pan_y)
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!(
            "translate({}, {}) scale({})",
            self.pan_x, self.pan_y, self.scale
        )
    }
}

/// Pointer-driven pan and wheel-driven zoom over a [`ViewTransform`].
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    transform: ViewTransform,
    dragging: bool,
    last_pointer: (f64, f64),
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn press(&mut self, x: f64, y: f64) {
        self.dragging = true;
        self.last_pointer = (x, y);
    }

    /// Returns whether the move was applied; moves outside a press/release
    /// window are ignored.
    pub fn move_to(&mut self, x: f64, y: f64) -> bool {
        if !self.dragging {
            return false;
        }
        let (last_x, last_y) = self.last_pointer;
        self.transform.pan_by(x - last_x, y - last_y);
        self.last_pointer = (x, y);
        true
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.transform.zoom_by_wheel(delta_y);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamps_at_lower_bound() {
        let mut view = ViewTransform::default();
        for _ in 0..20 {
            view.zoom_by_wheel(100.0);
        }
        assert_eq!(view.scale, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_clamps_at_upper_bound() {
        let mut view = ViewTransform::default();
        for _ in 0..30 {
            view.zoom_by_wheel(-100.0);
        }
        assert_eq!(view.scale, MAX_ZOOM);
    }

    #[test]
    fn test_zoom_steps_by_a_tenth() {
        let mut view = ViewTransform::default();
        view.zoom_by_wheel(-3.0);
        view.zoom_by_wheel(-3.0);
        assert_eq!(view.scale, 1.2);
        view.zoom_by_wheel(0.0);
        assert_eq!(view.scale, 1.2);
    }

    #[test]
    fn test_drag_only_pans_while_pressed() {
        let mut viewport = Viewport::new();
        assert!(!viewport.move_to(50.0, 50.0));

        viewport.press(10.0, 10.0);
        assert!(viewport.move_to(30.0, 5.0));
        assert!(viewport.move_to(40.0, 15.0));
        viewport.release();
        assert!(!viewport.move_to(500.0, 500.0));

        let transform = viewport.transform();
        assert_eq!((transform.pan_x, transform.pan_y), (30.0, 5.0));
    }

    #[test]
    fn test_restored_scale_is_clamped() {
        let view: ViewTransform =
            serde_json::from_value(serde_json::json!({ "pan_x": 3.0, "pan_y": 4.0, "scale": 9.0 }))
                .unwrap();
        assert_eq!((view.pan_x, view.pan_y, view.scale), (3.0, 4.0, MAX_ZOOM));

        let view: ViewTransform =
            serde_json::from_value(serde_json::json!({ "pan_x": 0.0, "pan_y": 0.0, "scale": 0.01 }))
                .unwrap();
        assert_eq!(view.scale, MIN_ZOOM);
    }

    #[test]
    fn test_apply_and_svg() {
        let view = ViewTransform {
            pan_x: 10.0,
            pan_y: -5.0,
            scale: 2.0,
        };
        assert_eq!(view.apply(-110.0, 120.0), (-210.0, 235.0));
        assert_eq!(view.to_svg(), "translate(10, -5) scale(2)");
    }
}
