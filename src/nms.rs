use crate::detection::Detection;

/// Greedy non-maximum suppression over same-frame detections.
///
/// Sorts by descending confidence (ties keep input order so output is
/// reproducible), keeps each surviving detection and suppresses every later
/// one whose IoU with it exceeds `iou_threshold`. Suppression is
/// class-agnostic: geometry only, labels are not consulted.
pub fn non_maximum_suppression(detections: &[Detection], iou_threshold: f32) -> Vec<Detection> {
    let mut order: Vec<usize> = (0..detections.len()).collect();
    order.sort_by(|&a, &b| {
        detections[b]
            .confidence
            .total_cmp(&detections[a].confidence)
    });

    let mut suppressed = vec![false; detections.len()];
    let mut kept = Vec::with_capacity(detections.len());

    for pos in 0..order.len() {
        let idx = order[pos];
        if suppressed[idx] {
            continue;
        }

        kept.push(detections[idx].clone());

        for &later in &order[pos + 1..] {
            if !suppressed[later]
                && detections[idx].iou(&detections[later]) > iou_threshold
            {
                suppressed[later] = true;
            }
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;

    fn det(left: f32, top: f32, size: f32, confidence: f32, label: &str) -> Detection {
        Detection::new(
            BBox::ltwh(left, top, size, size),
            confidence,
            0,
            label.to_string(),
        )
    }

    #[test]
    fn keeps_highest_confidence_in_a_cluster() {
        let dets = vec![
            det(0.0, 0.0, 10.0, 0.6, "a"),
            det(1.0, 1.0, 10.0, 0.9, "a"),
            det(2.0, 2.0, 10.0, 0.7, "a"),
        ];

        let kept = non_maximum_suppression(&dets, 0.5);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn disjoint_boxes_all_survive() {
        let dets = vec![
            det(0.0, 0.0, 10.0, 0.6, "a"),
            det(100.0, 0.0, 10.0, 0.9, "a"),
            det(0.0, 100.0, 10.0, 0.7, "a"),
        ];

        let kept = non_maximum_suppression(&dets, 0.5);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn no_kept_pair_exceeds_threshold() {
        let dets = vec![
            det(0.0, 0.0, 20.0, 0.9, "a"),
            det(5.0, 0.0, 20.0, 0.8, "a"),
            det(10.0, 0.0, 20.0, 0.7, "a"),
            det(40.0, 0.0, 20.0, 0.6, "a"),
        ];

        let threshold = 0.3;
        let kept = non_maximum_suppression(&dets, threshold);

        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                assert!(a.iou(b) <= threshold);
            }
        }
    }

    #[test]
    fn suppression_ignores_class_labels() {
        let dets = vec![
            det(0.0, 0.0, 10.0, 0.9, "pothole"),
            det(1.0, 1.0, 10.0, 0.8, "crack"),
        ];

        let kept = non_maximum_suppression(&dets, 0.5);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].label, "pothole");
    }

    #[test]
    fn confidence_ties_break_by_input_order() {
        let dets = vec![
            det(0.0, 0.0, 10.0, 0.8, "first"),
            det(1.0, 1.0, 10.0, 0.8, "second"),
        ];

        let kept = non_maximum_suppression(&dets, 0.5);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].label, "first");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(non_maximum_suppression(&[], 0.5).is_empty());
    }
}
