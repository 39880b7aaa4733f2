use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed model metadata: {0}")]
    MetadataParse(#[from] serde_json::Error),

    #[error("model metadata has an empty class vocabulary")]
    EmptyClassList,

    #[error("model metadata input size {0}x{1} is not a non-zero square")]
    InvalidInputSize(u32, u32),

    #[error("{name} threshold {value} is outside [0, 1]")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    #[error("degenerate source image {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },

    #[error("frame buffer holds {got} bytes, expected {expected}")]
    FrameBufferSize { expected: usize, got: usize },

    #[error("raw output row has {got} values, expected {expected}")]
    MalformedOutput { expected: usize, got: usize },

    #[error("inference failed: {0}")]
    Inference(String),
}
