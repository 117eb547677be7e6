//! Collision detection and response between circular bodies
//!
//! Detection is a plain circle overlap test. Response is a simplified impulse
//! along the contact normal, scaled by a tunable power and the combined mass.
//! It favours gameplay feel over momentum conservation.

use glam::Vec2;

use super::body::Body;

/// Check whether two bodies overlap
///
/// True iff the distance between centres is strictly less than the sum of
/// the radii. A body never collides with itself.
pub fn detect(a: &Body, b: &Body) -> bool {
    if std::ptr::eq(a, b) || a.id == b.id {
        return false;
    }
    crate::distance(a.pos, b.pos) < a.radius() + b.radius()
}

/// [`detect`] for possibly-missing bodies; a missing side never collides
pub fn detect_opt(a: Option<&Body>, b: Option<&Body>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => detect(a, b),
        _ => false,
    }
}

/// Unit normal pointing from `a` to `b`, `None` when the centres coincide
pub fn contact_normal(a: &Body, b: &Body) -> Option<Vec2> {
    let d = b.pos - a.pos;
    let dist = d.length();
    if dist == 0.0 || !dist.is_finite() {
        return None;
    }
    Some(d / dist)
}

/// Speed at which `a` approaches `b` along the contact normal
///
/// Positive when closing, zero or negative when resting or separating.
pub fn closing_speed(a: &Body, b: &Body) -> f32 {
    match contact_normal(a, b) {
        Some(n) => (a.vel - b.vel).dot(n),
        None => 0.0,
    }
}

/// Impulse vector for a collision between `a` and `b`
///
/// `impulse = power * ((a.vel - b.vel) · n) / (a.mass + b.mass) * n`
/// where `n` points from `a` to `b`. Coincident centres yield zero.
pub fn impulse(a: &Body, b: &Body, power: f32) -> Vec2 {
    let Some(n) = contact_normal(a, b) else {
        return Vec2::ZERO;
    };
    let speed = (a.vel - b.vel).dot(n);
    let magnitude = power * speed / (a.mass() + b.mass());
    n * magnitude
}

/// [`impulse`] for possibly-missing bodies; a missing side yields zero
pub fn impulse_opt(a: Option<&Body>, b: Option<&Body>, power: f32) -> Vec2 {
    match (a, b) {
        (Some(a), Some(b)) => impulse(a, b, power),
        _ => Vec2::ZERO,
    }
}
