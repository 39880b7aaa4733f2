use ndarray::ArrayView2;
use serde_derive::{Deserialize, Serialize};

use crate::bbox::BBox;
use crate::detection::Detection;
use crate::error::Error;
use crate::letterbox::Letterbox;

/// Values per raw output row: `(x1, y1, x2, y2, confidence, class_id)`.
pub const RAW_ROW_LEN: usize = 6;

/// Immutable detector configuration, loaded once before any frame is
/// processed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    /// `[width, height]` of the square network input.
    pub input_size: [u32; 2],
    /// Ordered class vocabulary, index = class id.
    pub classes: Vec<String>,
    pub confidence_threshold: f32,
    pub nms_threshold: f32,
}

impl ModelMetadata {
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let metadata: Self = serde_json::from_str(raw)?;
        metadata.validate()?;

        Ok(metadata)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let [w, h] = self.input_size;
        if w == 0 || w != h {
            return Err(Error::InvalidInputSize(w, h));
        }

        if self.classes.is_empty() {
            return Err(Error::EmptyClassList);
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::ThresholdOutOfRange {
                name: "confidence",
                value: self.confidence_threshold,
            });
        }

        if !(0.0..=1.0).contains(&self.nms_threshold) {
            return Err(Error::ThresholdOutOfRange {
                name: "nms",
                value: self.nms_threshold,
            });
        }

        Ok(())
    }

    /// Square edge length fed to inference.
    #[inline]
    pub fn input_edge(&self) -> u32 {
        self.input_size[0]
    }

    /// Resolves a class id to its label; unknown ids get a synthetic
    /// `class_<id>` label instead of failing.
    pub fn label(&self, class_id: i32) -> String {
        usize::try_from(class_id)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .cloned()
            .unwrap_or_else(|| format!("class_{class_id}"))
    }
}

/// Turns raw detector output into threshold-filtered [`Detection`]s in
/// source-image coordinates.
///
/// The network is assumed to have done box regression and class selection
/// already; each row is `(x1, y1, x2, y2, confidence, class_id)` in padded
/// detector space. Output order follows input order, not confidence.
pub struct Decoder {
    metadata: ModelMetadata,
}

impl Decoder {
    pub fn new(metadata: ModelMetadata) -> Result<Self, Error> {
        metadata.validate()?;

        Ok(Self { metadata })
    }

    #[inline]
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn decode(
        &self,
        raw: ArrayView2<'_, f32>,
        letterbox: &Letterbox,
    ) -> Result<Vec<Detection>, Error> {
        let cols = raw.shape()[1];
        if cols != RAW_ROW_LEN {
            return Err(Error::MalformedOutput {
                expected: RAW_ROW_LEN,
                got: cols,
            });
        }

        let mut detections = Vec::new();

        for row in raw.rows() {
            let confidence = row[4];
            if confidence < self.metadata.confidence_threshold {
                continue;
            }

            let corners = letterbox.box_to_source(&BBox::ltrb(row[0], row[1], row[2], row[3]));
            let bbox = BBox::ltwh(
                corners.left(),
                corners.top(),
                (corners.right() - corners.left()).max(0.0),
                (corners.bottom() - corners.top()).max(0.0),
            );

            let class_id = row[5] as i32;
            detections.push(Detection::new(
                bbox,
                confidence,
                class_id,
                self.metadata.label(class_id),
            ));
        }

        Ok(detections)
    }
}
