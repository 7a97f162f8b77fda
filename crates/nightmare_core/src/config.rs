//! Viewport geometry and engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Size of the playfield in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn center(&self) -> glam::DVec2 {
        glam::DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Horizontal extent left after removing `total_margin`, never negative.
    pub fn span_x(&self, total_margin: f64) -> f64 {
        (self.width - total_margin).max(0.0)
    }

    /// Vertical extent left after removing `total_margin`, never negative.
    pub fn span_y(&self, total_margin: f64) -> f64 {
        (self.height - total_margin).max(0.0)
    }

    /// Clamps `point` so it stays `margin` away from every edge.
    pub fn clamp_inset(&self, point: glam::DVec2, margin: f64) -> glam::DVec2 {
        // max before min: a viewport smaller than 2 * margin pins to the margin
        glam::DVec2::new(
            point.x.min(self.width - margin).max(margin),
            point.y.min(self.height - margin).max(margin),
        )
    }
}

/// Configuration handed to [`crate::GameEngine`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub viewport: Viewport,
}

impl GameConfig {
    pub fn new(viewport: Viewport) -> Result<Self, ConfigError> {
        viewport.validate()?;
        Ok(Self { viewport })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_viewport_validation() {
        assert!(Viewport::new(800.0, 600.0).validate().is_ok());
        assert_eq!(
            Viewport::new(0.0, 600.0).validate(),
            Err(ConfigError::InvalidViewport {
                width: 0.0,
                height: 600.0
            })
        );
        assert!(Viewport::new(800.0, f64::NAN).validate().is_err());
        assert!(GameConfig::new(Viewport::new(-1.0, 10.0)).is_err());
    }

    #[test]
    fn test_span_never_negative() {
        let viewport = Viewport::new(80.0, 40.0);
        assert_eq!(viewport.span_x(100.0), 0.0);
        assert_eq!(viewport.span_y(100.0), 0.0);
        assert_eq!(Viewport::new(300.0, 200.0).span_x(100.0), 200.0);
    }

    #[test]
    fn test_clamp_inset() {
        let viewport = Viewport::new(400.0, 300.0);
        let clamped = viewport.clamp_inset(DVec2::new(-10.0, 500.0), 20.0);
        assert_eq!(clamped, DVec2::new(20.0, 280.0));
        let inside = viewport.clamp_inset(DVec2::new(100.0, 100.0), 20.0);
        assert_eq!(inside, DVec2::new(100.0, 100.0));
    }
}
