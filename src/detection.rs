use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltwh};

/// A single decoded box in source-image pixel coordinates.
///
/// Produced fresh each frame by the decoder and never mutated afterwards;
/// `track_id` stays `None` until the tracker assigns one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BBox<Ltwh>,
    #[serde(rename = "p")]
    pub confidence: f32,
    #[serde(rename = "c")]
    pub class_id: i32,
    pub label: String,
    pub track_id: Option<u32>,
}

impl Detection {
    pub fn new(bbox: BBox<Ltwh>, confidence: f32, class_id: i32, label: String) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
            label,
            track_id: None,
        }
    }

    #[inline]
    pub fn iou(&self, other: &Detection) -> f32 {
        self.bbox.iou(&other.bbox)
    }
}
