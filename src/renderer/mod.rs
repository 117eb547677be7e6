//! Rendering
//!
//! Sprites are handles that point at a body by id. They read the body's
//! position each frame and never write back into the simulation.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::sim::{LinkEvent, SimState};

/// Speed at which the outline colour tops out
pub const MAX_TINT_SPEED: f32 = 40.0;

/// A drawable attached to a body
#[derive(Debug, Clone)]
pub struct Sprite {
    pub body_id: u32,
    /// Drawn diameter (may differ from the collision circle)
    pub size: f32,
    /// CSS fill colour
    pub fill: &'static str,
    pub label: &'static str,
}

/// Where and how to draw a sprite this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Vec2,
    pub size: f32,
    pub collision_radius: f32,
    pub speed: f32,
    pub attached: bool,
}

impl Sprite {
    pub fn new(body_id: u32, size: f32, fill: &'static str, label: &'static str) -> Self {
        Self {
            body_id,
            size,
            fill,
            label,
        }
    }

    /// Resolve against the current state; `None` if the body is gone
    pub fn placement(&self, state: &SimState) -> Option<Placement> {
        let body = state.body(self.body_id)?;
        Some(Placement {
            center: body.pos,
            size: self.size,
            collision_radius: body.radius(),
            speed: body.vel.length(),
            attached: body.is_attached(),
        })
    }
}

/// Hint shown before the first secondary click
pub const INITIAL_HINT: &str = "To free mouse, right-click twice";

/// Info label for a pointer link change; `None` keeps the current label
pub fn link_label(event: LinkEvent) -> Option<&'static str> {
    match event {
        LinkEvent::ClicksRemaining(n) if n > 1 => Some(INITIAL_HINT),
        LinkEvent::ClicksRemaining(_) => Some("Right-click again"),
        LinkEvent::Released => Some("Mouse freed! Right-click on logo to re-attach"),
        LinkEvent::Reattached => Some(INITIAL_HINT),
        LinkEvent::Ignored => None,
    }
}

/// Outline colour by speed (slow=blue, medium=green, fast=red/orange)
pub fn velocity_color(speed: f32) -> [f32; 3] {
    let t = (speed / MAX_TINT_SPEED).clamp(0.0, 1.0);

    if t < 0.25 {
        let u = t / 0.25;
        [0.2, 0.4 + 0.4 * u, 1.0]
    } else if t < 0.5 {
        let u = (t - 0.25) / 0.25;
        [0.2, 0.8, 1.0 - 0.6 * u]
    } else if t < 0.75 {
        let u = (t - 0.5) / 0.25;
        [0.2 + 0.8 * u, 0.8, 0.4 - 0.2 * u]
    } else {
        let u = (t - 0.75) / 0.25;
        [1.0, 0.8 - 0.5 * u, 0.2]
    }
}

/// `rgb(r, g, b)` string for a unit colour
pub fn css_rgb(color: [f32; 3]) -> String {
    let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("rgb({r}, {g}, {b})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Screen;
    use crate::tuning::Tuning;

    #[test]
    fn test_placement_reads_body() {
        let tuning = Tuning::default();
        let state = SimState::demo(1, Screen::new(800.0, 600.0), &tuning).unwrap();
        let sprite = Sprite::new(state.bodies[0].id, 100.0, "#f5c542", "hero");

        let placement = sprite.placement(&state).unwrap();
        assert_eq!(placement.center, state.bodies[0].pos);
        assert_eq!(placement.collision_radius, 46.0);
        assert!(placement.attached);

        let missing = Sprite::new(99, 100.0, "#000", "ghost");
        assert!(missing.placement(&state).is_none());
    }

    #[test]
    fn test_velocity_color_range() {
        assert_eq!(velocity_color(0.0), [0.2, 0.4, 1.0]);
        let fast = velocity_color(1000.0);
        assert!((fast[0] - 1.0).abs() < 1e-6);
        assert!((fast[1] - 0.3).abs() < 1e-6);
        assert!((fast[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_link_labels() {
        assert_eq!(
            link_label(LinkEvent::ClicksRemaining(1)),
            Some("Right-click again")
        );
        assert_eq!(link_label(LinkEvent::ClicksRemaining(3)), Some(INITIAL_HINT));
        assert!(link_label(LinkEvent::Released).unwrap().starts_with("Mouse freed"));
        assert_eq!(link_label(LinkEvent::Ignored), None);
    }

    #[test]
    fn test_css_rgb() {
        assert_eq!(css_rgb([1.0, 0.0, 0.5]), "rgb(255, 0, 128)");
    }
}
