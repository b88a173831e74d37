//! Integration tests for full frames
//!
//! Tests the path: keypoints → compute_ear (both eyes) → tracker → output

use blinkear::core::{compute_ear, FrameAnalyzer};
use blinkear::types::{EarError, FrameInput, Keypoint, LEFT_EYE, RIGHT_EYE};
use blinkear::FACE_MESH_LANDMARK_COUNT;

/// A 468-point face with both eyes drawn at the given openness.
/// Corner distance is 30px; lid chords are `ear * 15` each.
fn face_with_ear(ear: f64) -> Vec<Keypoint> {
    let mut points: Vec<Keypoint> = (0..FACE_MESH_LANDMARK_COUNT)
        .map(|i| Keypoint::new(i as f64 * 0.5, 300.0 + (i % 7) as f64))
        .collect();
    let gap = ear * 15.0;
    for (contour, x0) in [(RIGHT_EYE, 220.0), (LEFT_EYE, 330.0)] {
        let [c0, u1, u2, l1, l2, c1] = contour.indices;
        points[c0] = Keypoint::new(x0, 240.0);
        points[u1] = Keypoint::new(x0 + 10.0, 240.0 - gap / 2.0);
        points[u2] = Keypoint::new(x0 + 20.0, 240.0 - gap / 2.0);
        points[l1] = Keypoint::new(x0 + 10.0, 240.0 + gap / 2.0);
        points[l2] = Keypoint::new(x0 + 20.0, 240.0 + gap / 2.0);
        points[c1] = Keypoint::new(x0 + 30.0, 240.0);
    }
    points
}

#[test]
fn test_per_eye_ear_on_full_mesh() {
    let frame = face_with_ear(0.32);
    let left = compute_ear(&frame, &LEFT_EYE).unwrap();
    let right = compute_ear(&frame, &RIGHT_EYE).unwrap();
    assert!((left - 0.32).abs() < 1e-9, "left={}", left);
    assert!((right - 0.32).abs() < 1e-9, "right={}", right);
}

#[test]
fn test_blink_over_frames() {
    let mut analyzer = FrameAnalyzer::new();
    let sequence = [0.45, 0.38, 0.3, 0.27, 0.44, 0.46];
    let blinking: Vec<bool> = sequence
        .iter()
        .map(|&ear| analyzer.process(&face_with_ear(ear)).unwrap().blinking)
        .collect();
    assert_eq!(blinking, vec![false, false, false, false, true, true]);
}

#[test]
fn test_averages_both_eyes() {
    let mut frame = face_with_ear(0.3);
    // Close only the left eye completely
    let [_, u1, u2, l1, l2, _] = LEFT_EYE.indices;
    points_merge(&mut frame, u1, l1);
    points_merge(&mut frame, u2, l2);

    let mut analyzer = FrameAnalyzer::new();
    let output = analyzer.process(&frame).unwrap();
    assert!(output.left_ear.unwrap().abs() < 1e-12);
    assert!((output.right_ear.unwrap() - 0.3).abs() < 1e-9);
    assert!((output.avg_ear - 0.15).abs() < 1e-9);
}

fn points_merge(frame: &mut [Keypoint], from: usize, to: usize) {
    frame[to] = frame[from];
}

#[test]
fn test_short_frame_fails_fast() {
    let mut analyzer = FrameAnalyzer::new();
    let frame = face_with_ear(0.3);
    let err = analyzer.process(&frame[..200]).unwrap_err();
    assert_eq!(
        err,
        EarError::TooFewKeypoints {
            required: 388,
            actual: 200
        }
    );
    assert_eq!(err.code(), "E103_TOO_FEW_KEYPOINTS");
}

#[test]
fn test_compute_ear_short_frame_reports_index() {
    let frame = face_with_ear(0.3);
    let err = compute_ear(&frame[..150], &LEFT_EYE).unwrap_err();
    assert_eq!(err, EarError::IndexOutOfRange { index: 263, len: 150 });
}

#[test]
fn test_degenerate_frame_is_error() {
    let mut frame = face_with_ear(0.3);
    frame[LEFT_EYE.indices[5]] = frame[LEFT_EYE.indices[0]];
    let mut analyzer = FrameAnalyzer::new();
    let err = analyzer.process(&frame).unwrap_err();
    assert_eq!(err.code(), "E101_DEGENERATE_GEOMETRY");
}

#[test]
fn test_frame_from_landmark_json() {
    let frame = face_with_ear(0.3);
    let body = serde_json::json!({
        "keypoints": frame
            .iter()
            .map(|p| serde_json::json!({"x": p.x, "y": p.y, "z": 0.0}))
            .collect::<Vec<_>>()
    });
    let input: FrameInput = serde_json::from_value(body).unwrap();
    assert_eq!(input.keypoints().len(), FACE_MESH_LANDMARK_COUNT);

    let mut analyzer = FrameAnalyzer::new();
    let output = analyzer.process(input.keypoints()).unwrap();
    assert!((output.avg_ear - 0.3).abs() < 1e-9);
}
