use crate::bbox::{BBox, Ltwh};
use crate::detection::Detection;
use crate::track::Track;

/// Frames a track may coast unmatched before it is dropped.
pub const MAX_AGE: u32 = 30;
/// Measurement updates before the hit-count promotion guard fires.
pub const MIN_HITS: u32 = 3;
/// Association gate: candidate pairs must have `1 - IoU` at or below this.
pub const MAX_IOU_DISTANCE: f32 = 0.7;

/// Associates per-frame detections into persistent tracks.
///
/// Single-threaded by design: the track collection is mutated only by
/// [`Tracker::update`], once per frame, and track ids are monotonically
/// assigned and never reused.
pub struct Tracker {
    tracks: Vec<Track>,
    next_id: u32,
}

impl Tracker {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// One frame: predict, associate, update, age out, emit.
    ///
    /// Never fails. An empty detection set just ages every track; detections
    /// with no live tracks all spawn fresh ones.
    pub fn update(&mut self, detections: &[Detection]) -> Vec<Detection> {
        // Predicted boxes carry their track index alongside, so association
        // never reconstructs indices from track state.
        let mut predicted = Vec::with_capacity(self.tracks.len());
        for (track_idx, track) in self.tracks.iter_mut().enumerate() {
            predicted.push((track_idx, track.predict()));
        }

        let (matches, unmatched_dets, unmatched_tracks) =
            associate(detections, &predicted);

        for (det_idx, track_idx) in matches {
            self.tracks[track_idx].update(&detections[det_idx]);
        }

        for track_idx in unmatched_tracks {
            self.tracks[track_idx].mark_missed();
        }

        for det_idx in unmatched_dets {
            let id = self.next_id;
            self.next_id += 1;
            self.tracks.push(Track::new(id, &detections[det_idx]));
        }

        for track in &mut self.tracks {
            if track.time_since_update > MAX_AGE {
                track.mark_deleted();
            }
        }
        self.tracks.retain(|t| !t.is_deleted());

        self.tracks
            .iter()
            .filter(|t| {
                // every live track past its birth frame has been promoted on
                // its first predict; a track born this frame is shown
                // immediately
                t.is_confirmed() || t.hits >= MIN_HITS || t.age <= 1
            })
            .map(Track::to_output)
            .collect()
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Greedy bipartite matching by ascending `1 - IoU` cost.
///
/// Deliberately not an optimal assignment: per-frame counts are tens of
/// boxes, and the greedy order fixes the tie-breaking behavior. Candidate
/// pairs are gated at [`MAX_IOU_DISTANCE`]; the stable sort breaks equal
/// costs by detection-major enumeration order.
fn associate(
    detections: &[Detection],
    predicted: &[(usize, BBox<Ltwh>)],
) -> (Vec<(usize, usize)>, Vec<usize>, Vec<usize>) {
    let mut candidates = Vec::new();
    for (det_idx, det) in detections.iter().enumerate() {
        for (slot, (_, bbox)) in predicted.iter().enumerate() {
            let cost = 1.0 - det.bbox.iou(bbox);
            if cost <= MAX_IOU_DISTANCE {
                candidates.push((det_idx, slot, cost));
            }
        }
    }
    candidates.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut det_claimed = vec![false; detections.len()];
    let mut track_claimed = vec![false; predicted.len()];

    let mut matches = Vec::new();
    for (det_idx, slot, _) in candidates {
        if det_claimed[det_idx] || track_claimed[slot] {
            continue;
        }

        det_claimed[det_idx] = true;
        track_claimed[slot] = true;
        matches.push((det_idx, predicted[slot].0));
    }

    let unmatched_dets = (0..detections.len())
        .filter(|&i| !det_claimed[i])
        .collect();
    let unmatched_tracks = predicted
        .iter()
        .enumerate()
        .filter(|(slot, _)| !track_claimed[*slot])
        .map(|(_, (track_idx, _))| *track_idx)
        .collect();

    (matches, unmatched_dets, unmatched_tracks)
}
