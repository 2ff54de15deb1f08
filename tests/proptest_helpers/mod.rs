#![allow(dead_code)]

use stagecoord::model::{Dataset, Image, Roi, Shape, StoreSnapshot};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A finite coefficient in the range stored conversion matrices use.
pub fn arb_coefficient() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-5_000i32..5_000).prop_map(f64::from),
        -1.0e4f64..1.0e4,
    ]
}

pub fn arb_raw_descriptor() -> impl Strategy<Value = [f64; 6]> {
    prop::array::uniform6(arb_coefficient())
}

pub fn arb_pixel() -> impl Strategy<Value = (i64, i64)> {
    (-20_000i64..20_000, -20_000i64..20_000)
}

/// Renders coefficients the way they appear in metadata text.
pub fn render_sequence(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", items.join(", "))
}

pub fn arb_label() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[A-Za-z][A-Za-z0-9 ]{0,8}")
}

pub fn arb_shape() -> impl Strategy<Value = Shape> {
    let coord = -1.0e4f64..1.0e4;
    prop_oneof![
        (coord.clone(), coord.clone(), arb_label())
            .prop_map(|(x, y, text)| Shape::Point { x, y, text }),
        (coord.clone(), coord.clone(), 0.0f64..100.0, 0.0f64..100.0).prop_map(
            |(x, y, width, height)| Shape::Rectangle {
                x,
                y,
                width,
                height
            }
        ),
        (coord.clone(), coord.clone(), 0.0f64..50.0, 0.0f64..50.0).prop_map(
            |(x, y, radius_x, radius_y)| Shape::Ellipse {
                x,
                y,
                radius_x,
                radius_y
            }
        ),
        (coord.clone(), coord.clone(), coord.clone(), coord.clone())
            .prop_map(|(x1, y1, x2, y2)| Shape::Line { x1, y1, x2, y2 }),
        prop::collection::vec((coord.clone(), coord.clone()), 2..5)
            .prop_map(|pts| Shape::Polygon {
                points: pts.into_iter().map(|(x, y)| [x, y]).collect()
            }),
        (coord.clone(), coord, "[a-z]{1,6}")
            .prop_map(|(x, y, text)| Shape::Label { x, y, text }),
    ]
}

pub fn arb_rois(max_rois: usize, max_shapes: usize) -> impl Strategy<Value = Vec<Roi>> {
    prop::collection::vec(
        (arb_label(), prop::collection::vec(arb_shape(), 0..=max_shapes)),
        0..=max_rois,
    )
    .prop_map(|rois| {
        rois.into_iter()
            .enumerate()
            .map(|(idx, (name, shapes))| {
                let mut roi = Roi::new(idx as u64 + 1);
                roi.name = name;
                roi.shapes = shapes;
                roi
            })
            .collect()
    })
}

/// A store with `images` images spread over datasets of the given sizes.
///
/// Dataset `i` gets ID `100 + i`; images are numbered from 1 in dataset
/// order, so every image belongs to exactly one dataset.
pub fn snapshot_with_datasets(sizes: &[usize]) -> StoreSnapshot {
    let mut snapshot = StoreSnapshot::default();
    let mut next_image = 1u64;

    for (idx, &size) in sizes.iter().enumerate() {
        let ids: Vec<u64> = (next_image..next_image + size as u64).collect();
        for &id in &ids {
            snapshot
                .images
                .push(Image::new(id, format!("image_{id}.tif")));
        }
        next_image += size as u64;
        snapshot
            .datasets
            .push(Dataset::new(100 + idx as u64, format!("dataset_{idx}"), ids));
    }

    snapshot
}
