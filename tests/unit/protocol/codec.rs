use glam::Vec2;

use super::*;

fn configure_args() -> Vec<OscType> {
    vec![
        OscType::String("/tmp/out".into()),
        OscType::String("shot".into()),
        OscType::Int(1),
        OscType::Int(1),
        OscType::Int(0),
        OscType::Float(24.0),
        OscType::Int(48),
        OscType::Int(1920),
        OscType::Int(1080),
        OscType::String("/media/plate.mov".into()),
        OscType::Float(1.5),
    ]
}

#[test]
fn parse_configure_reads_positional_fields() {
    let req = parse_configure(&configure_args()).unwrap();
    assert_eq!(req.path, "/tmp/out");
    assert_eq!(req.file_name, "shot");
    assert!(req.cache && req.write && !req.offscreen);
    assert_eq!(req.fps, 24.0);
    assert_eq!((req.duration, req.width, req.height), (48, 1920, 1080));
    assert_eq!(req.source_path, "/media/plate.mov");
    assert_eq!(req.source_time, 1.5);
}

#[test]
fn parse_configure_rejects_wrong_types() {
    let mut args = configure_args();
    args[6] = OscType::String("48".into());
    assert_eq!(parse_configure(&args), Err(ProtocolError::InvalidArgType));
}

#[test]
fn decode_values_respects_arity() {
    let v = decode_values(
        ParamKind::Point2,
        &[
            OscType::Float(1.0),
            OscType::Float(2.0),
            OscType::Int(3),
            OscType::Float(4.0),
        ],
    )
    .unwrap();
    assert_eq!(
        v,
        vec![
            ParamValue::Point2(Vec2::new(1.0, 2.0)),
            ParamValue::Point2(Vec2::new(3.0, 4.0)),
        ]
    );

    assert_eq!(
        decode_values(ParamKind::Color, &[OscType::Float(1.0), OscType::Float(2.0)]),
        Err(ProtocolError::InvalidArgSize)
    );
    assert_eq!(
        decode_values(ParamKind::Slider, &[OscType::String("x".into())]),
        Err(ProtocolError::InvalidArgType)
    );
}

#[test]
fn checkbox_decodes_from_ints() {
    let v = decode_values(ParamKind::Checkbox, &[OscType::Int(0), OscType::Int(1)]).unwrap();
    assert_eq!(v, vec![ParamValue::Checkbox(false), ParamValue::Checkbox(true)]);
}

#[test]
fn decode_camera_samples_needs_13_scalars_each() {
    let mut args: Vec<OscType> = (0..13).map(|i| OscType::Float(i as f32)).collect();
    let s = decode_camera_samples(&args).unwrap();
    assert_eq!(s.len(), 1);
    assert_eq!(s[0].fov_degrees, 0.0);
    assert_eq!(s[0].matrix.col(3).truncate().to_array(), [10.0, 11.0, 12.0]);

    args.pop();
    assert_eq!(
        decode_camera_samples(&args),
        Err(ProtocolError::InvalidArgSize)
    );
}

#[test]
fn configure_reply_lists_parameters_in_id_order() {
    let mut store = ParameterStore::new();
    store.register("Size", ParamValue::Slider(50.0)).unwrap();
    store.register("On", ParamValue::Checkbox(true)).unwrap();
    let reply = configure_reply("/cinder/setup", &store);
    assert_eq!(reply.addr, "/cinder/setup");
    assert_eq!(
        reply.args,
        vec![
            OscType::Int(0),
            OscType::Int(0),
            OscType::String("Size".into()),
            OscType::String("slider".into()),
            OscType::Float(50.0),
            OscType::String("On".into()),
            OscType::String("checkbox".into()),
            OscType::Int(1),
        ]
    );
}

#[test]
fn status_reply_is_empty_on_success() {
    assert_eq!(
        status_reply("/a", Ok(())).args,
        vec![OscType::String(String::new())]
    );
    assert_eq!(
        status_reply("/a", Err(ProtocolError::InvalidArgSize)).args,
        vec![OscType::String("invalid arg size".into())]
    );
}
