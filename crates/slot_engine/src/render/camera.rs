//! 2D orthographic camera
//!
//! World space is Y-up; screen space is Y-down with the origin at the
//! top-left corner. The camera centre maps to the middle of the screen and
//! `size` world units span from the centre to the top edge.

use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Default half-height of the view in world units
pub const DEFAULT_CAMERA_SIZE: f32 = 5.0;

/// Orthographic 2D camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World position shown at the centre of the screen
    pub position: Vec2,
    /// Half of the visible world height
    pub size: f32,
}

impl Camera {
    /// Camera at `position` showing `2 * size` world units vertically
    pub const fn new(position: Vec2, size: f32) -> Self {
        Self { position, size }
    }

    /// Screen pixels per world unit for a screen `screen_height` pixels tall
    pub fn pixels_per_world_unit(&self, screen_height: f32) -> f32 {
        screen_height / (self.size * 2.0)
    }

    /// Project a world position to screen pixels
    pub fn world_to_screen(&self, world: Vec2, screen_width: f32, screen_height: f32) -> Vec2 {
        let scale = self.pixels_per_world_unit(screen_height);
        let offset = (world - self.position) * scale;
        Vec2::new(
            offset.x + screen_width * 0.5,
            screen_height - (offset.y + screen_height * 0.5),
        )
    }

    /// Map screen pixels back to a world position
    pub fn screen_to_world(&self, screen: Vec2, screen_width: f32, screen_height: f32) -> Vec2 {
        let scale = self.pixels_per_world_unit(screen_height);
        Vec2::new(
            (screen.x - screen_width * 0.5) / scale,
            ((screen_height - screen.y) - screen_height * 0.5) / scale,
        ) + self.position
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::zeros(), DEFAULT_CAMERA_SIZE)
    }
}
