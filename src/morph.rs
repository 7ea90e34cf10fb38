//! Map/globe blend factor and its fixed-rate transition.

use serde::Deserialize;

/// Full map→globe transitions per second
pub const DEFAULT_MORPH_RATE: f64 = 0.75;

/// Which surface variant the morph is heading towards
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphMode {
    #[default]
    Map,
    Globe,
}

impl MorphMode {
    pub fn toggled(self) -> Self {
        match self {
            MorphMode::Map => MorphMode::Globe,
            MorphMode::Globe => MorphMode::Map,
        }
    }

    /// Blend value this mode converges to
    #[inline(always)]
    fn goal(self) -> f64 {
        match self {
            MorphMode::Map => 0.0,
            MorphMode::Globe => 1.0,
        }
    }
}

/// Owns the map↔globe blend factor and walks it towards the target mode at a fixed rate.
///
/// The blend is the single value read by the mesh blend and by every marker; nothing
/// else writes it.
#[derive(Clone, Debug)]
pub struct MorphController {
    blend: f64,
    target: MorphMode,
    rate: f64,
}

impl MorphController {
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_finite() && rate > 0.0 { rate } else { DEFAULT_MORPH_RATE };
        Self {
            blend: 0.0,
            target: MorphMode::Map,
            rate,
        }
    }

    /// Change direction; the blend keeps its current value until the next `advance`.
    pub fn set_target(&mut self, mode: MorphMode) {
        self.target = mode;
    }

    /// Settle on `mode` immediately, skipping the transition
    pub fn jump_to(&mut self, mode: MorphMode) {
        self.target = mode;
        self.blend = mode.goal();
    }

    pub fn toggle(&mut self) {
        self.target = self.target.toggled();
    }

    /// Step the blend by `rate * dt` towards the target, clamped to [0, 1].
    /// Negative or non-finite `dt` counts as no time passing.
    pub fn advance(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let step = self.rate * dt;
        let goal = self.target.goal();

        self.blend = if goal > self.blend {
            (self.blend + step).min(goal)
        } else {
            (self.blend - step).max(goal)
        }
        .clamp(0.0, 1.0);
    }

    #[inline(always)]
    pub fn blend(&self) -> f64 {
        self.blend
    }

    #[inline(always)]
    pub fn target(&self) -> MorphMode {
        self.target
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// True once the blend sits exactly on the target's endpoint
    pub fn is_settled(&self) -> bool {
        self.blend == self.target.goal()
    }
}

impl Default for MorphController {
    fn default() -> Self {
        Self::new(DEFAULT_MORPH_RATE)
    }
}
