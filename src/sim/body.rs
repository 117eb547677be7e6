//! Simulated circular bodies and their pointer link

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rejected body parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyError {
    /// Mass must be finite and > 0
    InvalidMass(f32),
    /// Radius must be finite and > 0
    InvalidRadius(f32),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::InvalidMass(m) => write!(f, "body mass must be positive, got {m}"),
            BodyError::InvalidRadius(r) => write!(f, "body radius must be positive, got {r}"),
        }
    }
}

impl std::error::Error for BodyError {}

/// Whether a body's velocity is driven by the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steering {
    /// Follows the target point; frees itself after this many more secondary clicks
    Attached { clicks_to_release: u8 },
    /// Governed by physics only
    Free,
    /// Let go of the pointer; physics only until clicked again
    Released,
}

/// Outcome of a secondary click on a body (drives the info label)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// Still attached, this many clicks to go
    ClicksRemaining(u8),
    /// Pointer freed
    Released,
    /// Pointer picked the body up again
    Reattached,
    /// Click had no effect
    Ignored,
}

/// Wire form of [`Body`], checked on the way in
#[derive(Deserialize)]
struct BodyRaw {
    id: u32,
    pos: Vec2,
    vel: Vec2,
    mass: f32,
    radius: f32,
    steering: Steering,
    #[serde(default)]
    wander: Option<Vec2>,
}

impl TryFrom<BodyRaw> for Body {
    type Error = BodyError;

    fn try_from(raw: BodyRaw) -> Result<Self, Self::Error> {
        let mut body = Body::new(raw.id, raw.pos, raw.mass, raw.radius)?;
        body.vel = raw.vel;
        body.steering = raw.steering;
        body.wander = raw.wander;
        Ok(body)
    }
}

/// A simulated circular entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BodyRaw")]
pub struct Body {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    mass: f32,
    radius: f32,
    pub steering: Steering,
    /// Constant velocity used until the first contact
    pub wander: Option<Vec2>,
}

impl Body {
    /// Create a free body at rest
    pub fn new(id: u32, pos: Vec2, mass: f32, radius: f32) -> Result<Self, BodyError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(BodyError::InvalidMass(mass));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(BodyError::InvalidRadius(radius));
        }
        Ok(Self {
            id,
            pos,
            vel: Vec2::ZERO,
            mass,
            radius,
            steering: Steering::Free,
            wander: None,
        })
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Attach to the pointer, releasing after `clicks` secondary clicks
    pub fn attached(mut self, clicks: u8) -> Self {
        self.steering = Steering::Attached {
            clicks_to_release: clicks.max(1),
        };
        self
    }

    pub fn with_wander(mut self, wander: Vec2) -> Self {
        self.wander = Some(wander);
        self
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        matches!(self.steering, Steering::Attached { .. })
    }

    /// Whether a point lies inside the collision circle
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) < self.radius * self.radius
    }

    /// Handle a secondary (right) click at `point`
    ///
    /// An attached body counts down wherever the click lands and lets go
    /// when the counter runs out. A released body re-attaches with a fresh
    /// counter when the click lands inside it. Free bodies never attach.
    pub fn secondary_click(&mut self, point: Vec2, release_clicks: u8) -> LinkEvent {
        match self.steering {
            Steering::Attached { clicks_to_release } => {
                let left = clicks_to_release.saturating_sub(1);
                if left == 0 {
                    self.steering = Steering::Released;
                    LinkEvent::Released
                } else {
                    self.steering = Steering::Attached {
                        clicks_to_release: left,
                    };
                    LinkEvent::ClicksRemaining(left)
                }
            }
            Steering::Released if self.contains_point(point) => {
                self.steering = Steering::Attached {
                    clicks_to_release: release_clicks.max(1),
                };
                LinkEvent::Reattached
            }
            Steering::Released | Steering::Free => LinkEvent::Ignored,
        }
    }
}
