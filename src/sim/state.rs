//! Simulation state
//!
//! Owns every body for the lifetime of a session. Bodies are created at
//! startup and never removed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyError};
use crate::{normalize_angle, polar_to_cartesian};
use crate::tuning::Tuning;

/// Playfield bounds, queried from the host every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether a point lies on the playfield (edges included)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Seed the wander heading was drawn from
    pub seed: u64,
    /// Bodies, sorted by id
    pub bodies: Vec<Body>,
    /// Set on the first contact (wall or body), never reset
    pub has_collided: bool,
    /// Contacts accumulated over consecutive ticks that had any
    pub contact_streak: u32,
    /// Ticks run so far
    pub frame: u64,
    /// Next entity ID
    next_id: u32,
}

impl SimState {
    /// Create an empty state
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            bodies: Vec::new(),
            has_collided: false,
            contact_streak: 0,
            frame: 0,
            next_id: 1,
        }
    }

    /// The two-body demo scene: a pointer-attached hero and a wandering fella
    pub fn demo(seed: u64, screen: Screen, tuning: &Tuning) -> Result<Self, BodyError> {
        let mut state = Self::new(seed);
        let size = tuning.sprite_size;

        let hero_pos = Vec2::new(screen.width / 2.0 + size, size);
        let hero_id = state.next_entity_id();
        let hero = Body::new(hero_id, hero_pos, tuning.hero_mass, tuning.collision_radius)?
            .attached(tuning.release_clicks);
        state.bodies.push(hero);

        let fella_pos = Vec2::new(screen.width - size, (screen.height - size * 3.0) / 2.0);
        let fella_id = state.next_entity_id();
        let heading = state.wander_heading();
        let fella = Body::new(fella_id, fella_pos, tuning.fella_mass, tuning.collision_radius)?
            .with_wander(polar_to_cartesian(tuning.wander_speed, heading));
        state.bodies.push(fella);

        log::info!(
            "Demo scene: {} bodies, wander heading {:.2} rad",
            state.bodies.len(),
            heading
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Add a body, keeping id order
    pub fn spawn(&mut self, body: Body) {
        self.next_id = self.next_id.max(body.id.saturating_add(1));
        self.bodies.push(body);
        self.normalize_order();
    }

    /// Look up a body by id
    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Ensure bodies are sorted by ID for stable iteration
    pub fn normalize_order(&mut self) {
        self.bodies.sort_by_key(|b| b.id);
    }

    /// Wander heading in radians, drawn from whole degrees in
    /// [`WANDER_MIN_DEG`, `WANDER_MAX_DEG`]
    ///
    /// [`WANDER_MIN_DEG`]: crate::consts::WANDER_MIN_DEG
    /// [`WANDER_MAX_DEG`]: crate::consts::WANDER_MAX_DEG
    fn wander_heading(&self) -> f32 {
        use crate::consts::{WANDER_MAX_DEG, WANDER_MIN_DEG};
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let degrees = rng.random_range(WANDER_MIN_DEG..=WANDER_MAX_DEG);
        normalize_angle((degrees as f32).to_radians())
    }
}
