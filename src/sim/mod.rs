//! Physics core
//!
//! Everything that touches body state lives here:
//! - Variable timestep (frame-relative `dt` from the host)
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod state;
pub mod tick;

pub use body::{Body, BodyError, LinkEvent, Steering};
pub use collision::{closing_speed, contact_normal, detect, detect_opt, impulse, impulse_opt};
pub use state::{Screen, SimState};
pub use tick::{TickInput, TickReport, tick};
