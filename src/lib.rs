pub mod bbox;
pub mod decoder;
pub mod detection;
pub mod error;
pub mod letterbox;
pub mod nms;
pub mod pipeline;
pub mod tracker;

mod motion;
mod track;

pub use decoder::{Decoder, ModelMetadata};
pub use detection::Detection;
pub use error::Error;
pub use letterbox::Letterbox;
pub use nms::non_maximum_suppression;
pub use pipeline::{DetectionPipeline, Inference};
pub use track::{Track, TrackState};
pub use tracker::Tracker;
