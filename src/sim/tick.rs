//! Per-frame simulation step
//!
//! Runs once per display refresh with a frame-relative `dt` from the host.
//! Order within a frame is fixed: link clicks, damping, steering, walls,
//! out-of-bounds recovery, collisions, idle wander, integration.

use glam::Vec2;

use super::body::{Body, LinkEvent};
use super::collision::{closing_speed, detect, impulse};
use super::state::{Screen, SimState};
use crate::tuning::Tuning;

/// Host input for a single tick
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Pointer/touch position (steering target)
    pub target: Option<Vec2>,
    /// Current playfield bounds
    pub screen: Screen,
    /// Secondary (right) click position, one-shot
    pub secondary_click: Option<Vec2>,
}

impl TickInput {
    pub fn new(screen: Screen) -> Self {
        Self {
            target: None,
            screen,
            secondary_click: None,
        }
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Overlapping body pairs (responded to or not)
    pub pair_contacts: u32,
    /// Wall contacts by free bodies
    pub wall_contacts: u32,
    /// Bodies moved back to the centre
    pub recovered: u32,
    /// Whether free bodies moved with the stuck boost
    pub stuck: bool,
    /// Result of this tick's secondary click
    pub link: Option<LinkEvent>,
}

impl TickReport {
    /// Any contact at all this tick
    pub fn collided(&self) -> bool {
        self.pair_contacts + self.wall_contacts > 0
    }
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32, tuning: &Tuning) -> TickReport {
    let mut report = TickReport::default();
    let screen = input.screen;
    state.frame += 1;

    if let Some(click) = input.secondary_click {
        report.link = Some(apply_secondary_click(state, click, tuning.release_clicks));
    }

    for body in &mut state.bodies {
        apply_damping(body, tuning.damping);
    }

    // Pointer off the playfield leaves attached bodies coasting
    if let Some(target) = input.target.filter(|t| screen.contains(*t)) {
        for body in state.bodies.iter_mut().filter(|b| b.is_attached()) {
            steer_toward(body, target, tuning.movement_speed);
        }
    }

    for body in state.bodies.iter_mut().filter(|b| !b.is_attached()) {
        report.wall_contacts += reflect_off_walls(body, screen, tuning.wall_kick);
    }

    for body in &mut state.bodies {
        if recover_out_of_bounds(body, screen) {
            log::debug!("Body {} left the playfield, recentred", body.id);
            report.recovered += 1;
        }
    }

    report.pair_contacts = resolve_collisions(&mut state.bodies, tuning);

    let contacts = report.pair_contacts + report.wall_contacts;
    if contacts > 0 {
        if !state.has_collided {
            log::info!("First contact on frame {}", state.frame);
        }
        state.has_collided = true;
        state.contact_streak = state.contact_streak.saturating_add(contacts);
    } else {
        state.contact_streak = 0;
    }

    if !state.has_collided {
        for body in state.bodies.iter_mut().filter(|b| !b.is_attached()) {
            if let Some(wander) = body.wander {
                body.vel = wander;
            }
        }
    }

    report.stuck = state.contact_streak > tuning.stuck_threshold;
    let boost = if report.stuck { tuning.stuck_boost } else { 1.0 };
    for body in &mut state.bodies {
        let scale = if body.is_attached() { 1.0 } else { boost };
        integrate(body, dt * scale);
    }

    report
}

/// Route a secondary click: attached bodies first, wherever it lands,
/// then released bodies under the click
fn apply_secondary_click(state: &mut SimState, click: Vec2, release_clicks: u8) -> LinkEvent {
    let (attached, rest): (Vec<_>, Vec<_>) =
        state.bodies.iter_mut().partition(|b| b.is_attached());

    for body in attached.into_iter().chain(rest) {
        let event = body.secondary_click(click, release_clicks);
        match event {
            LinkEvent::Ignored => continue,
            LinkEvent::Released => log::info!("Body {} released the pointer", body.id),
            LinkEvent::Reattached => log::info!("Body {} re-attached to the pointer", body.id),
            LinkEvent::ClicksRemaining(_) => {}
        }
        return event;
    }
    LinkEvent::Ignored
}

/// Velocity decay (drag)
#[inline]
pub fn apply_damping(body: &mut Body, factor: f32) {
    body.vel *= factor;
}

/// Point velocity straight at the target, proportional to the distance
#[inline]
pub fn steer_toward(body: &mut Body, target: Vec2, speed: f32) {
    body.vel = (target - body.pos) * speed;
}

/// Negate the velocity component for each wall the body touches
///
/// A zero component gets `kick` instead so the body cannot freeze against a
/// wall. Returns the number of walls touched (0-2).
pub fn reflect_off_walls(body: &mut Body, screen: Screen, kick: Vec2) -> u32 {
    let r = body.radius();
    let mut contacts = 0;

    if body.pos.x - r <= 0.0 || body.pos.x + r >= screen.width {
        body.vel.x = if body.vel.x == 0.0 { kick.x } else { -body.vel.x };
        contacts += 1;
    }
    if body.pos.y - r <= 0.0 || body.pos.y + r >= screen.height {
        body.vel.y = if body.vel.y == 0.0 { kick.y } else { -body.vel.y };
        contacts += 1;
    }

    contacts
}

/// Move a body that fully left the playfield back to the centre
///
/// Velocity is left alone. Returns whether the body was moved.
pub fn recover_out_of_bounds(body: &mut Body, screen: Screen) -> bool {
    let r = body.radius();
    let p = body.pos;
    let outside = p.x <= -r || p.x >= screen.width + r || p.y <= -r || p.y >= screen.height + r;
    if outside || !p.is_finite() {
        body.pos = screen.center();
        return true;
    }
    false
}

/// Apply collision response to every overlapping pair
///
/// Pairs that are already separating are skipped. Each side gets the push
/// scaled by the other's mass; attached bodies take only a fraction of it.
/// Returns the number of overlapping pairs.
pub fn resolve_collisions(bodies: &mut [Body], tuning: &Tuning) -> u32 {
    let mut contacts = 0;

    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if !detect(a, b) {
                continue;
            }
            contacts += 1;

            if closing_speed(a, b) <= 0.0 {
                continue;
            }

            let push = impulse(a, b, tuning.impulse_power);
            let a_scale = response_scale(a, tuning);
            let b_scale = response_scale(b, tuning);
            let (a_mass, b_mass) = (a.mass(), b.mass());

            a.vel = -(push * b_mass * a_scale);
            b.vel = push * a_mass * b_scale;
        }
    }

    contacts
}

fn response_scale(body: &Body, tuning: &Tuning) -> f32 {
    if body.is_attached() {
        tuning.attached_response
    } else {
        1.0
    }
}

/// `pos += vel * dt`
#[inline]
pub fn integrate(body: &mut Body, dt: f32) {
    body.pos += body.vel * dt;
}
