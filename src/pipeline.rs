use ndarray::{Array2, ArrayView2, ArrayView4};
use tracing::warn;

use crate::decoder::{Decoder, ModelMetadata};
use crate::detection::Detection;
use crate::error::Error;
use crate::letterbox::Letterbox;
use crate::nms::non_maximum_suppression;
use crate::tracker::Tracker;

/// The external inference collaborator.
///
/// Takes the normalized planar `[1, 3, S, S]` tensor, returns `N` rows of
/// `(x1, y1, x2, y2, confidence, class_id)` in padded detector-space
/// coordinates.
pub trait Inference {
    fn infer(&mut self, input: ArrayView4<'_, f32>) -> Result<Array2<f32>, Error>;
}

/// Per-frame decode -> NMS -> tracker chain.
///
/// Synchronous and single-threaded; the caller must not feed a second frame
/// before the previous call has returned. Construction validates the
/// metadata once; after that no call fails the frame loop. A frame whose
/// decode goes wrong (collaborator error, malformed tensor, degenerate
/// image) is logged and processed as zero detections so tracks still age.
pub struct DetectionPipeline {
    decoder: Decoder,
    tracker: Tracker,
}

impl DetectionPipeline {
    pub fn new(metadata: ModelMetadata) -> Result<Self, Error> {
        Ok(Self {
            decoder: Decoder::new(metadata)?,
            tracker: Tracker::new(),
        })
    }

    #[inline]
    pub fn metadata(&self) -> &ModelMetadata {
        self.decoder.metadata()
    }

    #[inline]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Full frame path: letterbox the RGB frame, run the collaborator, then
    /// decode, suppress and track its output.
    pub fn process_frame(
        &mut self,
        rgb: &[u8],
        frame_width: u32,
        frame_height: u32,
        model: &mut dyn Inference,
    ) -> Vec<Detection> {
        let raw = self.run_inference(rgb, frame_width, frame_height, model);

        match raw {
            Ok(raw) => self.process_raw(raw.view(), frame_width, frame_height),
            Err(err) => {
                warn!(%err, "frame dropped, tracks age without detections");
                self.tracker.update(&[])
            }
        }
    }

    /// Same chain for raw output obtained elsewhere.
    pub fn process_raw(
        &mut self,
        raw: ArrayView2<'_, f32>,
        frame_width: u32,
        frame_height: u32,
    ) -> Vec<Detection> {
        let detections = match self.decode_frame(raw, frame_width, frame_height) {
            Ok(detections) => detections,
            Err(err) => {
                warn!(%err, "frame dropped, tracks age without detections");
                Vec::new()
            }
        };

        self.tracker.update(&detections)
    }

    fn run_inference(
        &self,
        rgb: &[u8],
        frame_width: u32,
        frame_height: u32,
        model: &mut dyn Inference,
    ) -> Result<Array2<f32>, Error> {
        let letterbox = Letterbox::new(
            frame_width,
            frame_height,
            self.decoder.metadata().input_edge(),
        )?;
        let input = letterbox.input_tensor(rgb)?;

        model.infer(input.view())
    }

    fn decode_frame(
        &self,
        raw: ArrayView2<'_, f32>,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Vec<Detection>, Error> {
        let letterbox = Letterbox::new(
            frame_width,
            frame_height,
            self.decoder.metadata().input_edge(),
        )?;

        let candidates = self.decoder.decode(raw, &letterbox)?;

        Ok(non_maximum_suppression(
            &candidates,
            self.decoder.metadata().nms_threshold,
        ))
    }
}
