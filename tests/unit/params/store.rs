use glam::{Mat4, Vec2};

use super::*;

fn slider_store(duration: u32) -> ParameterStore {
    let mut s = ParameterStore::new();
    s.register("Size", ParamValue::Slider(50.0)).unwrap();
    s.close_registration();
    s.set_duration(duration);
    s
}

#[test]
fn register_is_idempotent_and_keeps_first_definition() {
    let mut s = ParameterStore::new();
    s.register("A", ParamValue::Slider(1.0)).unwrap();
    s.register("B", ParamValue::Checkbox(true)).unwrap();
    s.register("A", ParamValue::Point2(Vec2::ONE)).unwrap();
    assert_eq!(s.parameters().len(), 2);
    let a = s.parameter("A").unwrap();
    assert_eq!(a.id, 0);
    assert_eq!(a.kind, ParamKind::Slider);
    assert_eq!(s.parameter("B").unwrap().id, 1);
}

#[test]
fn register_rejects_reserved_camera_name_and_late_calls() {
    let mut s = ParameterStore::new();
    assert!(matches!(
        s.register(CAMERA_PARAM_NAME, ParamValue::Slider(0.0)),
        Err(BridgeError::Defect(_))
    ));
    s.close_registration();
    assert!(s.register("Late", ParamValue::Slider(0.0)).is_err());
    assert!(s.request_camera().is_err());
}

#[test]
fn read_value_clamps_frame_to_duration() {
    let mut s = slider_store(3);
    let (_, tl) = s.timeline_mut("Size").unwrap();
    tl.extend([10.0, 20.0, 30.0].map(ParamValue::Slider));
    s.set_readable(true);

    assert_eq!(
        s.read_value("Size", FrameIndex(1)).unwrap(),
        ParamValue::Slider(20.0)
    );
    for f in [2, 3, 1000] {
        assert_eq!(
            s.read_value("Size", FrameIndex(f)).unwrap(),
            s.read_value("Size", FrameIndex(2)).unwrap()
        );
    }
}

#[test]
fn reads_outside_rendering_are_defects() {
    let mut s = slider_store(1);
    s.timeline_mut("Size").unwrap().1.push(ParamValue::Slider(1.0));
    assert!(matches!(
        s.read_value("Size", FrameIndex(0)),
        Err(BridgeError::Defect(_))
    ));
    s.set_readable(true);
    assert!(s.read_value("Nope", FrameIndex(0)).is_err());
    assert!(s.read_camera_value(FrameIndex(0)).is_err());
}

#[test]
fn cache_complete_tracks_every_timeline_and_the_camera() {
    let mut s = ParameterStore::new();
    s.register("Size", ParamValue::Slider(0.0)).unwrap();
    s.request_camera().unwrap();
    s.close_registration();
    s.set_duration(2);
    assert!(!s.is_cache_complete());

    s.timeline_mut("Size")
        .unwrap()
        .1
        .extend([ParamValue::Slider(1.0), ParamValue::Slider(2.0)]);
    assert!(!s.is_cache_complete(), "camera still missing");

    let cam = CameraSample {
        fov_degrees: 30.0,
        matrix: Mat4::IDENTITY,
    };
    s.camera_timeline_mut().unwrap().extend([cam, cam]);
    assert!(s.is_cache_complete());

    s.set_duration(3);
    assert!(!s.is_cache_complete(), "duration change invalidates the cache");
}

#[test]
fn writeback_creates_records_lazily_and_sorts_by_frame() {
    let mut s = ParameterStore::new();
    s.writeback("Phase", ParamValue::Slider(2.0), FrameIndex(2)).unwrap();
    s.writeback("Flag", ParamValue::Checkbox(true), FrameIndex(0)).unwrap();
    s.writeback("Phase", ParamValue::Slider(0.0), FrameIndex(0)).unwrap();
    s.writeback("Phase", ParamValue::Slider(0.5), FrameIndex(0)).unwrap();

    let recs = s.setters();
    assert_eq!(recs[0].name, "Phase");
    assert_eq!(recs[0].id, 0);
    assert_eq!(recs[1].name, "Flag");
    let frames: Vec<u32> = recs[0].sorted_values().iter().map(|(f, _)| f.0).collect();
    assert_eq!(frames, vec![0, 0, 2]);
    assert_eq!(recs[0].sorted_values()[1].1, ParamValue::Slider(0.5));

    assert!(s.writeback("Phase", ParamValue::Checkbox(false), FrameIndex(1)).is_err());

    s.clear_setters();
    assert!(s.setters().is_empty());
}

#[test]
fn writeback_rejects_camera_names_and_out_of_range_frames() {
    let mut s = ParameterStore::new();
    for name in [CAMERA_PARAM_NAME, CAMERA_SETDOWN_NAME] {
        assert!(matches!(
            s.writeback(name, ParamValue::Slider(1.0), FrameIndex(0)),
            Err(BridgeError::Defect(_))
        ));
    }
    assert!(matches!(
        s.writeback("Phase", ParamValue::Slider(1.0), FrameIndex(i32::MAX as u32 + 1)),
        Err(BridgeError::Defect(_))
    ));
    s.writeback("Phase", ParamValue::Slider(1.0), FrameIndex(i32::MAX as u32))
        .unwrap();
    assert_eq!(s.setters().len(), 1);
    assert_eq!(s.setters()[0].sorted_values().len(), 1);
}
