use glam::{DAffine2, DVec2};

/// Mapping between scene coordinates and screen pixels at a fixed zoom
/// and horizontal translation.
///
/// Residue `i` occupies scene x `[i, i + 1)` (before resolution scaling);
/// one residue is `zoom` pixels wide on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Pixels per residue.
    pub zoom: f64,
    /// Horizontal translation in pixels.
    pub offset: f64,
    /// Surface resolution (scaled units per scene unit).
    pub resolution: f64,
}

impl ViewTransform {
    /// Transform at `zoom` and `offset` for a surface of `resolution`.
    #[must_use]
    pub fn new(zoom: f64, offset: f64, resolution: f64) -> Self {
        Self {
            zoom,
            offset,
            resolution,
        }
    }

    /// Scaled scene coordinates to screen pixels.
    #[must_use]
    pub fn scene_to_screen(&self) -> DAffine2 {
        let k = self.zoom / self.resolution;
        DAffine2::from_translation(DVec2::new(self.offset, 0.0))
            * DAffine2::from_scale(DVec2::splat(k))
    }

    /// Screen pixels to scaled scene coordinates.
    #[must_use]
    pub fn screen_to_scene(&self) -> DAffine2 {
        self.scene_to_screen().inverse()
    }

    /// Screen x of the left edge of `residue`.
    #[must_use]
    pub fn residue_screen_x(&self, residue: f64) -> f64 {
        self.zoom * residue + self.offset
    }

    /// Fractional residue under screen x.
    #[must_use]
    pub fn residue_at(&self, screen_x: f64) -> f64 {
        (screen_x - self.offset) / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_residue_round_trip_through_affine() {
        let view = ViewTransform::new(2.5, -40.0, 50.0);
        let scene = DVec2::new(12.0 * 50.0, 0.0);
        let screen = view.scene_to_screen().transform_point2(scene);
        assert!((screen.x - view.residue_screen_x(12.0)).abs() < 1e-9);
        let back = view.screen_to_scene().transform_point2(screen);
        assert!((back - scene).length() < 1e-9);
        assert!((view.residue_at(screen.x) - 12.0).abs() < 1e-9);
    }
}
