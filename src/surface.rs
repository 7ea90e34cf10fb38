//! [`EarthSurface`], the engine entry point owning the mesh, the morph and the markers.

use std::collections::HashMap;
use std::fmt;

use rayon::prelude::*;

use crate::config::SurfaceConfig;
use crate::error::SurfaceError;
use crate::geo::{dual_position, GeoCoordinate};
use crate::marker::{Marker, MarkerState, SeverityThresholds};
use crate::mesh::{DualMeshBuilder, SurfaceMesh};
use crate::morph::{MorphController, MorphMode};
use crate::record::{EarthquakeRecord, Seconds};

/// Stable handle of a marker inside an [`EarthSurface`]. Ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a batch spawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub spawned: usize,
    pub rejected: usize,
}

/// Markers removed during one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Reached the end of their lifespan
    pub expired: usize,
    /// Went non-finite and were discarded without drawing
    pub dropped: usize,
}

impl TickReport {
    pub fn removed(&self) -> usize {
        self.expired + self.dropped
    }
}

/// The globe: the dual mesh, the morph state and every live event marker.
///
/// All mutation goes through `&mut self` (`spawn`, `tick`, `toggle_mode`), so the
/// frame loop serializes it. Inside `tick` the marker pass runs on rayon.
pub struct EarthSurface {
    mesh: SurfaceMesh,
    morph: MorphController,
    markers: HashMap<MarkerId, Marker>,
    next_id: u64,
    lifespan: Seconds,
    thresholds: SeverityThresholds,
}

impl EarthSurface {
    /// Build the mesh and start in the configured mode, fully settled on it.
    pub fn initialize(config: &SurfaceConfig) -> Result<Self, SurfaceError> {
        let lifespan = config.marker.lifespan;
        if !(lifespan.is_finite() && lifespan > 0.0) {
            return Err(SurfaceError::InvalidConfig(format!(
                "marker lifespan must be positive, got {lifespan}"
            )));
        }

        let mesh = DualMeshBuilder::new(config.mesh.rows, config.mesh.cols).build()?;

        let mut morph = MorphController::new(config.morph_rate);
        morph.jump_to(config.initial_mode);

        tracing::info!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            mode = ?config.initial_mode,
            "earth surface initialized"
        );

        Ok(Self {
            mesh,
            morph,
            markers: HashMap::new(),
            next_id: 0,
            lifespan,
            thresholds: config.marker.thresholds,
        })
    }

    /// Place a marker for `record`. Invalid records are logged and rejected; the
    /// surface is left untouched.
    pub fn spawn(&mut self, record: &EarthquakeRecord) -> Result<MarkerId, SurfaceError> {
        let coord = GeoCoordinate::new(record.latitude, record.longitude).inspect_err(|err| {
            tracing::warn!(%err, place = record.place.as_deref(), "skipping earthquake record");
        })?;

        if !record.magnitude.is_finite() || !record.timestamp.is_finite() {
            let err = SurfaceError::invalid_record(format!(
                "magnitude {} at time {}",
                record.magnitude, record.timestamp
            ));
            tracing::warn!(%err, "skipping earthquake record");
            return Err(err);
        }

        let tier = self.thresholds.classify(record.magnitude);
        let mut marker = Marker::new(
            dual_position(coord),
            record.timestamp,
            self.lifespan,
            record.magnitude,
            tier,
        );
        // Put it on whichever surface variant is showing right now
        marker.tick(record.timestamp, self.morph.blend());

        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(id, marker);

        tracing::trace!(%id, magnitude = record.magnitude, tier = tier.label(), "spawned marker");
        Ok(id)
    }

    /// Spawn every record, counting rejects instead of stopping at the first one.
    pub fn spawn_all<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a EarthquakeRecord>,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();
        for record in records {
            match self.spawn(record) {
                Ok(_) => report.spawned += 1,
                Err(_) => report.rejected += 1,
            }
        }
        report
    }

    /// Advance the morph by `dt`, re-blend every marker at playback time `now` and
    /// remove those that expired or went non-finite.
    pub fn tick(&mut self, now: Seconds, dt: Seconds) -> TickReport {
        self.morph.advance(dt);
        let blend = self.morph.blend();

        // Collect first, remove after, so any number of simultaneous expiries is safe
        let finished: Vec<(MarkerId, MarkerState)> = self
            .markers
            .par_iter_mut()
            .filter_map(|(id, marker)| {
                let state = marker.tick(now, blend);
                state.is_terminal().then_some((*id, state))
            })
            .collect();

        let mut report = TickReport::default();
        for (id, state) in finished {
            self.markers.remove(&id);
            match state {
                MarkerState::Expired => report.expired += 1,
                MarkerState::NonFinite => {
                    tracing::debug!(%id, "dropping marker with non-finite state");
                    report.dropped += 1;
                }
                MarkerState::Alive => {}
            }
        }
        report
    }

    /// Head towards `mode`; the transition plays out over the following ticks.
    pub fn toggle_mode(&mut self, mode: MorphMode) {
        tracing::debug!(?mode, blend = self.morph.blend(), "morph target changed");
        self.morph.set_target(mode);
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    #[inline(always)]
    pub fn blend(&self) -> f64 {
        self.morph.blend()
    }

    pub fn mode(&self) -> MorphMode {
        self.morph.target()
    }

    pub fn is_morphing(&self) -> bool {
        !self.morph.is_settled()
    }

    pub fn lifespan(&self) -> Seconds {
        self.lifespan
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    /// Live markers in no particular order
    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &Marker)> + '_ {
        self.markers.iter().map(|(id, m)| (*id, m))
    }

    pub fn remove(&mut self, id: MarkerId) -> Option<Marker> {
        self.markers.remove(&id)
    }

    /// Drop every marker, e.g. when playback rewinds
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
