use glam::Mat4;

use super::*;
use crate::params::value::ParamValue;

#[test]
fn chunk_count_is_ceiling_division() {
    assert_eq!(chunk_count(0, 150), 0);
    assert_eq!(chunk_count(1, 150), 1);
    assert_eq!(chunk_count(150, 150), 1);
    assert_eq!(chunk_count(151, 150), 2);
    assert_eq!(chunk_count(31, 30), 2);
}

#[test]
fn setter_stream_is_chunked_and_frame_sorted() {
    let mut store = ParameterStore::new();
    for f in (0..320u32).rev() {
        store
            .writeback("Phase", ParamValue::Slider(f as f32), FrameIndex(f))
            .unwrap();
    }
    let msgs = setter_messages(&Addresses::new("cinder"), &store.setters()[0]);
    assert_eq!(msgs.len(), 4);
    assert_eq!(msgs[0].addr, "/cinder/setdown/Phase/begin");
    assert_eq!(
        msgs[0].args,
        vec![OscType::String("slider".into()), OscType::Int(3)]
    );
    assert_eq!(msgs[1].addr, "/cinder/setdown/Phase/0");
    assert_eq!(msgs[1].args.len(), 150 * 2);
    assert_eq!(msgs[1].args[0], OscType::Int(0));
    assert_eq!(msgs[1].args[2], OscType::Int(1));
    assert_eq!(msgs[3].addr, "/cinder/setdown/Phase/2");
    assert_eq!(msgs[3].args.len(), 20 * 2);
    assert_eq!(msgs[3].args[38], OscType::Int(319));
}

#[test]
fn camera_stream_sends_eight_scalars_per_sample() {
    let sample = CameraSample {
        fov_degrees: 90.0,
        matrix: Mat4::from_scale(glam::Vec3::new(1.0, -1.0, -1.0)),
    };
    let samples: Vec<_> = (0..31u32).map(|f| (FrameIndex(f), sample)).collect();
    let msgs = camera_setter_messages(&Addresses::new("cinder"), &samples, 100);
    assert_eq!(msgs.len(), 3);
    assert_eq!(msgs[0].addr, "/cinder/setdown/cameraAE/begin");
    assert_eq!(
        msgs[0].args,
        vec![OscType::String("camera".into()), OscType::Int(2)]
    );
    assert_eq!(msgs[1].args.len(), 30 * 8);
    assert_eq!(msgs[2].args.len(), 8);
    assert_eq!(msgs[2].args[0], OscType::Int(30));
    let OscType::Float(zoom) = msgs[2].args[7] else {
        panic!("zoom must be a float");
    };
    assert!((zoom - 50.0).abs() < 1e-3);
}

#[test]
fn setdown_stream_orders_camera_then_records_by_id() {
    let mut store = ParameterStore::new();
    store
        .writeback("B", ParamValue::Checkbox(true), FrameIndex(0))
        .unwrap();
    store
        .writeback("A", ParamValue::Slider(1.0), FrameIndex(0))
        .unwrap();
    store.writeback_camera(
        CameraSample {
            fov_degrees: 30.0,
            matrix: Mat4::IDENTITY,
        },
        FrameIndex(0),
    );
    let addrs: Vec<String> = setdown_messages(&Addresses::new("cinder"), &store, 10)
        .into_iter()
        .map(|m| m.addr)
        .collect();
    assert_eq!(
        addrs,
        vec![
            "/cinder/setdown/cameraAE/begin",
            "/cinder/setdown/cameraAE/0",
            "/cinder/setdown/B/begin",
            "/cinder/setdown/B/0",
            "/cinder/setdown/A/begin",
            "/cinder/setdown/A/0",
        ]
    );
}
