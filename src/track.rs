use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltwh};
use crate::detection::Detection;
use crate::motion::MotionFilter;
use crate::tracker::MIN_HITS;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Tentative,
    Confirmed,
    /// Terminal; set right before the tracker drops the track.
    Deleted,
}

/// One persistent identity: a motion filter plus lifecycle counters.
///
/// Owned and mutated exclusively by the tracker.
#[derive(Debug, Clone)]
pub struct Track {
    pub track_id: u32,
    pub state: TrackState,
    /// Successful measurement updates since creation.
    pub hits: u32,
    /// Prediction steps since creation.
    pub age: u32,
    /// Frames since the last successful match.
    pub time_since_update: u32,
    /// Carries class label and confidence into the output.
    pub last_detection: Detection,
    filter: MotionFilter,
}

impl Track {
    pub(crate) fn new(track_id: u32, detection: &Detection) -> Self {
        Self {
            track_id,
            state: TrackState::Tentative,
            hits: 1,
            age: 1,
            time_since_update: 0,
            filter: MotionFilter::new(&detection.bbox),
            last_detection: detection.clone(),
        }
    }

    /// Advances the motion filter one frame and returns the predicted box.
    ///
    /// A tentative track is promoted on its first prediction cycle,
    /// regardless of hit count.
    pub(crate) fn predict(&mut self) -> BBox<Ltwh> {
        self.filter.predict();
        self.age += 1;

        if self.state == TrackState::Tentative {
            self.state = TrackState::Confirmed;
        }

        self.filter.bbox()
    }

    pub(crate) fn update(&mut self, detection: &Detection) {
        self.filter.update(&detection.bbox);
        self.hits += 1;
        self.time_since_update = 0;
        self.last_detection = detection.clone();

        // independent guard; redundant with the predict-time promotion
        // under normal per-frame cadence
        if self.state == TrackState::Tentative && self.hits >= MIN_HITS {
            self.state = TrackState::Confirmed;
        }
    }

    pub(crate) fn mark_missed(&mut self) {
        self.time_since_update += 1;
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.state = TrackState::Deleted;
    }

    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Confirmed
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.state == TrackState::Deleted
    }

    /// Current box from the motion filter, not the raw measurement.
    #[inline]
    pub fn bbox(&self) -> BBox<Ltwh> {
        self.filter.bbox()
    }

    /// The track as a consumer-facing detection: filter geometry, label and
    /// confidence from the last matched detection, and the track id set.
    pub(crate) fn to_output(&self) -> Detection {
        Detection {
            bbox: self.filter.bbox(),
            confidence: self.last_detection.confidence,
            class_id: self.last_detection.class_id,
            label: self.last_detection.label.clone(),
            track_id: Some(self.track_id),
        }
    }
}
