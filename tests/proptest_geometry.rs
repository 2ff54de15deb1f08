use stagecoord::geometry::{point_annotations, UNNAMED};
use stagecoord::model::Shape;
use proptest::prelude::*;

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn only_point_shapes_survive(rois in proptest_helpers::arb_rois(4, 6)) {
        let points = point_annotations(&rois);
        let expected = rois
            .iter()
            .flat_map(|roi| roi.shapes.iter())
            .filter(|shape| shape.is_point())
            .count();

        prop_assert_eq!(points.len(), expected);
        for point in &points {
            let roi = rois.iter().find(|r| r.id == point.roi_id).expect("source roi");
            let is_point = matches!(roi.shapes[point.shape_index], Shape::Point { .. });
            prop_assert!(is_point);
        }
    }

    #[test]
    fn pixels_are_truncated_source_coordinates(rois in proptest_helpers::arb_rois(3, 5)) {
        for point in point_annotations(&rois) {
            let roi = rois.iter().find(|r| r.id == point.roi_id).expect("source roi");
            let Shape::Point { x, y, .. } = &roi.shapes[point.shape_index] else {
                unreachable!("only points are extracted");
            };
            prop_assert_eq!(point.pixel.x, x.trunc() as i64);
            prop_assert_eq!(point.pixel.y, y.trunc() as i64);
            prop_assert!(!point.name.is_empty());
        }
    }

    #[test]
    fn unnamed_points_use_placeholder(rois in proptest_helpers::arb_rois(3, 5)) {
        for point in point_annotations(&rois) {
            let roi = rois.iter().find(|r| r.id == point.roi_id).expect("source roi");
            let Shape::Point { text, .. } = &roi.shapes[point.shape_index] else {
                unreachable!("only points are extracted");
            };
            if text.is_none() && roi.name.is_none() {
                prop_assert_eq!(point.name.as_str(), UNNAMED);
            }
        }
    }
}
