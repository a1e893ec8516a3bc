//! Integration tests for the growth metrics engine.
//!
//! Tests cover:
//! - Trigonometric height estimation against the calibrated camera model
//! - Pixel-to-physical leaf area conversion
//! - Stage classification order and the strict-less-than boundary policy
//! - Aggregate assessment, degenerate-box handling, and height policies

mod common;

use common::*;

use leafgauge::growth::{estimate_height, estimate_leaf_area};
use leafgauge::{CameraModel, GrowthThresholds, HeightPolicy};

#[test]
fn measurement_matches_reference_scenario() {
    // (0,0,10,20) at 45°/30cm/800px: 30*20/800/tan(45°) = 0.75 cm,
    // 10*20 px² at 0.05 = 10.0 cm².
    let engine = default_engine();
    let measurement = engine.measure(&bbox(0, 0, 10, 20));
    assert_eq!(measurement.height_cm, 0.75);
    assert_eq!(measurement.area_cm2, 10.0);
}

#[test]
fn height_is_monotone_in_pixel_height() {
    let camera = CameraModel::new(45.0, 30.0, 800.0).unwrap();
    let mut last = 0.0;
    for pixel_height in [10, 40, 160, 640] {
        let estimate = estimate_height(&bbox(0, 0, 50, pixel_height), &camera);
        assert!(
            estimate > last,
            "estimate {estimate} not above {last} for pixel height {pixel_height}"
        );
        last = estimate;
    }
}

#[test]
fn area_is_linear_in_pixel_area() {
    for (width, height) in [(10u32, 20u32), (3, 7), (100, 50)] {
        let pixel_area = f64::from(width * height);
        let area = estimate_leaf_area(&bbox(0, 0, width, height), 0.05);
        // Exact ratio up to the documented 2-decimal rounding.
        assert!(
            (area - pixel_area * 0.05).abs() <= 0.005,
            "area {area} diverges from {pixel_area} px² * 0.05"
        );
    }
}

#[test]
fn singular_camera_angles_are_rejected_at_construction() {
    for angle in [0.0, 90.0, 180.0, 270.0, -90.0] {
        assert!(
            CameraModel::new(angle, 30.0, 800.0).is_err(),
            "angle {angle}° should be rejected"
        );
    }
    assert!(CameraModel::new(45.0, 30.0, 800.0).is_ok());
}

#[test]
fn classification_uses_strict_less_than_at_boundaries() {
    let thresholds = GrowthThresholds::default();
    // Exactly at the seedling height limit: falls through to the next tier.
    assert_eq!(thresholds.classify(5.0, 3, 10.0), "Vegetative");
    assert_eq!(thresholds.classify(4.99, 3, 10.0), "Seedling");
}

#[test]
fn classification_falls_back_to_most_mature_stage() {
    let thresholds = GrowthThresholds::default();
    assert_eq!(thresholds.classify(40.0, 20, 500.0), "Mature");
}

#[test]
fn classification_is_idempotent_and_always_a_configured_stage() {
    let thresholds = GrowthThresholds::default();
    let cases: [(f64, u32, f64); 4] = [
        (0.0, 0, 0.0),
        (5.0, 4, 15.0),
        (14.99, 7, 49.99),
        (1e9, 1000, 1e9),
    ];
    for (height, count, area) in cases {
        let first = thresholds.classify(height, count, area).to_string();
        let second = thresholds.classify(height, count, area);
        assert_eq!(first, second);
        assert!(["Seedling", "Vegetative", "Mature"].contains(&first.as_str()));
    }
}

#[test]
fn empty_detection_set_yields_zero_assessment() {
    let engine = default_engine();
    let assessment = engine.assess(&[]);
    assert_eq!(assessment.leaf_count, 0);
    assert_eq!(assessment.total_leaf_area_cm2, 0.0);
    assert_eq!(assessment.representative_height_cm, 0.0);
    assert_eq!(assessment.stage, "Seedling");
    assert_eq!(assessment.skipped_boxes, 0);
}

#[test]
fn degenerate_boxes_are_skipped_not_measured() {
    let engine = default_engine();
    // Second box has zero width, third zero height: both are ignored.
    let boxes = [bbox(0, 0, 10, 20), bbox(30, 30, 30, 60), bbox(5, 9, 50, 9)];
    let assessment = engine.assess(&boxes);
    assert_eq!(assessment.leaf_count, 1);
    assert_eq!(assessment.skipped_boxes, 2);
    assert_eq!(assessment.total_leaf_area_cm2, 10.0);
}

#[test]
fn all_degenerate_input_matches_empty_assessment() {
    let engine = default_engine();
    let assessment = engine.assess(&[bbox(7, 7, 7, 7)]);
    assert_eq!(assessment.leaf_count, 0);
    assert_eq!(assessment.stage, "Seedling");
    assert_eq!(assessment.skipped_boxes, 1);
}

#[test]
fn last_detection_policy_reports_final_box_height() {
    let engine = default_engine();
    // 400 px tall first, 20 px tall last: the last box wins even though an
    // earlier detection was far taller.
    let boxes = [bbox(0, 0, 10, 400), bbox(0, 0, 10, 20)];
    let assessment = engine.assess(&boxes);
    assert_eq!(assessment.representative_height_cm, 0.75);
    // Stage still reflects the cumulative count and area: 2 leaves, 210 cm².
    assert_eq!(assessment.stage, "Mature");
}

#[test]
fn max_height_policy_reports_tallest_box() {
    let engine = default_engine().with_height_policy(HeightPolicy::MaxHeight);
    let boxes = [bbox(0, 0, 10, 400), bbox(0, 0, 10, 20)];
    let assessment = engine.assess(&boxes);
    // 30*400/800/tan(45°) = 15.0
    assert_eq!(assessment.representative_height_cm, 15.0);
}

#[test]
fn mean_height_policy_averages_valid_boxes() {
    let engine = default_engine().with_height_policy(HeightPolicy::MeanHeight);
    let boxes = [bbox(0, 0, 10, 400), bbox(0, 0, 10, 20)];
    let assessment = engine.assess(&boxes);
    // (15.0 + 0.75) / 2 = 7.875, rounded to 7.88.
    assert_eq!(assessment.representative_height_cm, 7.88);
}

#[test]
fn annotations_recompute_stage_per_box() {
    let engine = default_engine();
    // First box alone is small: 1 leaf, 10 cm², 0.75 cm -> Seedling.
    // By the second box the totals have grown past the seedling area limit.
    let boxes = [bbox(0, 0, 10, 20), bbox(0, 0, 20, 20)];
    let instructions = engine.annotations(&boxes);
    assert_eq!(instructions.len(), 2);
    assert_eq!(instructions[0].label, "Seedling (0.75cm)");
    assert_eq!(instructions[1].label, "Vegetative (0.75cm)");
}
