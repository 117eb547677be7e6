//! Gameplay tuning
//!
//! Data-driven constants for the physics step. Persisted as JSON in
//! LocalStorage so values can be tweaked from the browser console.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Why a tuning blob was rejected
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON for [`Tuning`]
    Parse(serde_json::Error),
    /// Parsed, but a value is out of range
    Invalid(&'static str),
    /// The browser refused to store the blob
    Storage(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "tuning parse error: {e}"),
            TuningError::Invalid(what) => write!(f, "invalid tuning: {what}"),
            TuningError::Storage(why) => write!(f, "tuning storage error: {why}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) | TuningError::Storage(_) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Physics and scene constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Steering ===
    /// Fraction of the pointer distance covered per frame
    pub movement_speed: f32,
    /// Secondary clicks before the pointer lets go
    pub release_clicks: u8,

    // === Collision ===
    pub impulse_power: f32,
    /// Push fraction an attached body receives
    pub attached_response: f32,
    /// Per-frame velocity multiplier
    pub damping: f32,
    /// Velocity used when hitting a wall with a zero component
    pub wall_kick: Vec2,

    // === Idle / stuck ===
    pub wander_speed: f32,
    pub stuck_threshold: u32,
    pub stuck_boost: f32,

    // === Scene ===
    pub sprite_size: f32,
    pub collision_radius: f32,
    pub hero_mass: f32,
    pub fella_mass: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            movement_speed: MOVEMENT_SPEED,
            release_clicks: RELEASE_CLICKS,

            impulse_power: IMPULSE_POWER,
            attached_response: ATTACHED_RESPONSE,
            damping: DAMPING,
            wall_kick: Vec2::new(WALL_KICK_X, WALL_KICK_Y),

            wander_speed: WANDER_SPEED,
            stuck_threshold: STUCK_THRESHOLD,
            stuck_boost: STUCK_BOOST,

            sprite_size: SPRITE_SIZE,
            collision_radius: SPRITE_COLLISION_RADIUS,
            hero_mass: HERO_MASS,
            fella_mass: FELLA_MASS,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON blob; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the step cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(TuningError::Invalid("damping must be in (0, 1]"));
        }
        if !(self.hero_mass > 0.0 && self.fella_mass > 0.0) {
            return Err(TuningError::Invalid("masses must be positive"));
        }
        if !(self.collision_radius > 0.0 && self.sprite_size > 0.0) {
            return Err(TuningError::Invalid("sizes must be positive"));
        }
        if !(self.impulse_power >= 0.0 && self.movement_speed >= 0.0) {
            return Err(TuningError::Invalid("power and speed must not be negative"));
        }
        if !(self.attached_response.is_finite() && self.attached_response >= 0.0) {
            return Err(TuningError::Invalid("attached_response must be finite and not negative"));
        }
        if !(self.wander_speed.is_finite() && self.wander_speed >= 0.0) {
            return Err(TuningError::Invalid("wander_speed must be finite and not negative"));
        }
        if self.release_clicks == 0 {
            return Err(TuningError::Invalid("release_clicks must be at least 1"));
        }
        if !self.wall_kick.is_finite() || !self.stuck_boost.is_finite() {
            return Err(TuningError::Invalid("wall_kick and stuck_boost must be finite"));
        }
        Ok(())
    }

    /// LocalStorage key
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "bouncy_fellas_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Serialize and hand the blob to `set_item` under [`Self::STORAGE_KEY`]
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn store_with<E: fmt::Debug>(
        &self,
        set_item: impl FnOnce(&str, &str) -> Result<(), E>,
    ) -> Result<(), TuningError> {
        let json = self.to_json()?;
        set_item(Self::STORAGE_KEY, &json).map_err(|e| TuningError::Storage(format!("{e:?}")))
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), TuningError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| TuningError::Storage("LocalStorage unavailable".into()))?;

        self.store_with(|key, json| storage.set_item(key, json))?;
        log::info!("Tuning saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), TuningError> {
        // No-op for native
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.impulse_power, 4.6);
        assert_eq!(tuning.wall_kick, Vec2::new(-1.0, -1.2));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "impulse_power": 6.0, "stuck_threshold": 10 }"#)
            .unwrap();
        assert_eq!(tuning.impulse_power, 6.0);
        assert_eq!(tuning.stuck_threshold, 10);
        assert_eq!(tuning.damping, DAMPING);
        assert_eq!(tuning.fella_mass, FELLA_MASS);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning {
            movement_speed: 0.25,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_garbage_and_bad_values() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "damping": 1.5 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "hero_mass": 0.0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "release_clicks": 0 }"#),
            Err(TuningError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_negative_response_and_wander() {
        assert!(matches!(
            Tuning::from_json(r#"{ "attached_response": -1.0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "wander_speed": -2.7 }"#),
            Err(TuningError::Invalid(_))
        ));
        let tuning = Tuning {
            attached_response: f32::NAN,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
        assert!(Tuning::from_json(r#"{ "attached_response": 0.0, "wander_speed": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_store_writes_json_under_key() {
        let tuning = Tuning {
            impulse_power: 5.5,
            ..Default::default()
        };
        let mut stored = None;
        tuning
            .store_with(|key, json| {
                stored = Some((key.to_string(), json.to_string()));
                Ok::<(), ()>(())
            })
            .unwrap();

        let (key, json) = stored.unwrap();
        assert_eq!(key, "bouncy_fellas_tuning");
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_store_reports_refused_write() {
        let err = Tuning::default()
            .store_with(|_, _| Err("QuotaExceededError"))
            .unwrap_err();
        assert!(matches!(err, TuningError::Storage(_)));
        assert_eq!(
            err.to_string(),
            "tuning storage error: \"QuotaExceededError\""
        );
    }

    #[test]
    fn test_native_load_is_default() {
        assert_eq!(Tuning::load(), Tuning::default());
        assert!(Tuning::default().save().is_ok());
    }
}
