//! Event markers: severity tiers, decay and the per-tick lifecycle.
//!
//! A marker is terminal once playback time reaches `created_at + lifespan` or its
//! blended state stops being finite. Terminal markers never come back.

use glam::DVec3;
use serde::Deserialize;

use crate::geo::DualPosition;
use crate::record::Seconds;

/// Magnitude boundaries between severity tiers
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    /// Lowest magnitude rated Moderate
    pub moderate: f64,
    /// Lowest magnitude rated Severe
    pub severe: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            moderate: 7.0,
            severe: 8.0,
        }
    }
}

impl SeverityThresholds {
    pub fn classify(&self, magnitude: f64) -> SeverityTier {
        if magnitude >= self.severe {
            SeverityTier::Severe
        } else if magnitude >= self.moderate {
            SeverityTier::Moderate
        } else {
            SeverityTier::Minor
        }
    }
}

/// Visual category of an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeverityTier {
    Minor,
    Moderate,
    Severe,
}

impl SeverityTier {
    /// Marker colour as RGB
    pub fn color(self) -> [u8; 3] {
        match self {
            SeverityTier::Minor => [0, 255, 0],
            SeverityTier::Moderate => [255, 255, 0],
            SeverityTier::Severe => [255, 0, 0],
        }
    }

    /// Marker radius at birth, in unit-sphere lengths
    pub fn base_size(self) -> f64 {
        match self {
            SeverityTier::Minor => 0.02,
            SeverityTier::Moderate => 0.035,
            SeverityTier::Severe => 0.05,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityTier::Minor => "minor",
            SeverityTier::Moderate => "moderate",
            SeverityTier::Severe => "severe",
        }
    }
}

/// Outcome of one marker tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerState {
    Alive,
    /// Playback time reached `expires_at`
    Expired,
    /// Position or visuals stopped being finite; the marker must not be drawn
    NonFinite,
}

impl MarkerState {
    #[inline(always)]
    pub fn is_terminal(self) -> bool {
        !matches!(self, MarkerState::Alive)
    }
}

/// Size multiplier for a marker at `life` in [0, 1]: quadratic ease-out,
/// 1 at birth, exactly 0 at expiry so removal never pops.
#[inline(always)]
pub fn decay(life: f64) -> f64 {
    let remaining = (1.0 - life).clamp(0.0, 1.0);
    remaining * remaining
}

/// One placed event. Its two endpoints are fixed at creation; each tick only
/// re-blends between them and updates the decay visuals.
#[derive(Clone, Debug)]
pub struct Marker {
    position: DualPosition,
    created_at: Seconds,
    lifespan: Seconds,
    /// `created_at + lifespan`, fixed at creation so the expiry instant itself is exact
    expires_at: Seconds,
    magnitude: f64,
    tier: SeverityTier,
    rendered_position: DVec3,
    scale: f64,
    opacity: f64,
    state: MarkerState,
}

impl Marker {
    pub fn new(
        position: DualPosition,
        created_at: Seconds,
        lifespan: Seconds,
        magnitude: f64,
        tier: SeverityTier,
    ) -> Self {
        Self {
            position,
            created_at,
            lifespan,
            expires_at: created_at + lifespan,
            magnitude,
            tier,
            rendered_position: position.planar,
            scale: tier.base_size(),
            opacity: 1.0,
            state: MarkerState::Alive,
        }
    }

    /// Normalized age: 0 at creation, 1 at expiry. Times before creation read as 0.
    pub fn playback_life(&self, now: Seconds) -> f64 {
        let life = (now - self.created_at) / self.lifespan;
        if life.is_nan() {
            life
        } else {
            life.max(0.0)
        }
    }

    /// Advance to `now` under morph blend `blend`. Once a terminal state is reported
    /// the marker is frozen and every later call returns the same state.
    pub fn tick(&mut self, now: Seconds, blend: f64) -> MarkerState {
        if self.state.is_terminal() {
            return self.state;
        }

        if now >= self.expires_at {
            self.state = MarkerState::Expired;
            return self.state;
        }

        // The ratio only drives the visuals; it may round to 1 just before expiry
        let life = self.playback_life(now);
        let position = self.position.blend(blend);
        let scale = self.tier.base_size() * decay(life);
        let opacity = (1.0 - life).clamp(0.0, 1.0);

        if !(life.is_finite() && position.is_finite() && scale.is_finite()) {
            self.state = MarkerState::NonFinite;
            return self.state;
        }

        self.rendered_position = position;
        self.scale = scale;
        self.opacity = opacity;
        MarkerState::Alive
    }

    pub fn dual_position(&self) -> &DualPosition {
        &self.position
    }

    pub fn created_at(&self) -> Seconds {
        self.created_at
    }

    pub fn lifespan(&self) -> Seconds {
        self.lifespan
    }

    /// Playback time at which the marker turns terminal
    pub fn expires_at(&self) -> Seconds {
        self.expires_at
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn tier(&self) -> SeverityTier {
        self.tier
    }

    pub fn color(&self) -> [u8; 3] {
        self.tier.color()
    }

    pub fn rendered_position(&self) -> DVec3 {
        self.rendered_position
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn state(&self) -> MarkerState {
        self.state
    }
}
