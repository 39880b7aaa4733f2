use boxtrack::{DetectionPipeline, ModelMetadata};
use ndarray::{arr2, Array2};
use nearly_eq::assert_nearly_eq;

fn metadata() -> ModelMetadata {
    ModelMetadata {
        input_size: [640, 640],
        classes: vec!["x".into()],
        confidence_threshold: 0.5,
        nms_threshold: 0.45,
    }
}

/// Raw row for a left-top-width-height box on a 640x640 frame, where the
/// letterbox is the identity.
fn raw_row(left: f32, top: f32, w: f32, h: f32, confidence: f32) -> [f32; 6] {
    [left, top, left + w, top + h, confidence, 0.0]
}

#[test]
fn track_is_born_followed_and_aged_out() {
    let mut pipeline = DetectionPipeline::new(metadata()).unwrap();

    // frame 1: one detection becomes one tracked box with id 1
    let raw = arr2(&[raw_row(0.0, 0.0, 10.0, 10.0, 0.9)]);
    let out = pipeline.process_raw(raw.view(), 640, 640);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].track_id, Some(1));
    assert_eq!(out[0].label, "x");

    // frame 2: same box shifted by (1,1) keeps the id, geometry is the
    // blended filter state, not the raw measurement
    let raw = arr2(&[raw_row(1.0, 1.0, 10.0, 10.0, 0.9)]);
    let out = pipeline.process_raw(raw.view(), 640, 640);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].track_id, Some(1));
    assert_nearly_eq!(out[0].bbox.left(), 0.5, 1e-3);
    assert_nearly_eq!(out[0].bbox.top(), 0.5, 1e-3);

    // frames 3..=32: the track coasts through empty frames
    let empty = Array2::<f32>::zeros((0, 6));
    for _ in 0..30 {
        let out = pipeline.process_raw(empty.view(), 640, 640);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].track_id, Some(1));
    }

    // frame 33: time since the last match exceeds the age limit
    let out = pipeline.process_raw(empty.view(), 640, 640);
    assert!(out.is_empty());
    assert!(pipeline.tracker().tracks().is_empty());
}

#[test]
fn separate_objects_keep_separate_identities() {
    let mut pipeline = DetectionPipeline::new(metadata()).unwrap();

    for frame in 0..8 {
        let shift = frame as f32 * 2.0;
        let raw = arr2(&[
            raw_row(10.0 + shift, 10.0, 20.0, 20.0, 0.9),
            raw_row(400.0, 400.0 - shift, 20.0, 20.0, 0.8),
        ]);

        let out = pipeline.process_raw(raw.view(), 640, 640);
        assert_eq!(out.len(), 2);

        let mut ids: Vec<u32> = out.iter().filter_map(|d| d.track_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }
}

#[test]
fn letterboxed_frame_reports_source_coordinates() {
    let mut pipeline = DetectionPipeline::new(metadata()).unwrap();

    // 1280x720 source: scale 0.5, 140 px of vertical padding
    let raw = arr2(&[[100.0, 240.0, 200.0, 340.0, 0.9, 0.0]]);
    let out = pipeline.process_raw(raw.view(), 1280, 720);

    assert_eq!(out.len(), 1);
    assert_nearly_eq!(out[0].bbox.left(), 200.0, 1e-2);
    assert_nearly_eq!(out[0].bbox.top(), 200.0, 1e-2);
    assert_nearly_eq!(out[0].bbox.width(), 200.0, 1e-2);
    assert_nearly_eq!(out[0].bbox.height(), 200.0, 1e-2);
}
