use super::*;

fn write_tmp(name: &str, body: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("target/unit_config");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn defaults_match_the_host_ports() {
    let cfg = BridgeConfig::default();
    assert_eq!(cfg.listen_addr().port(), 3000);
    assert_eq!(cfg.peer_addr(), "127.0.0.1:3001".parse().unwrap());
    assert_eq!(cfg.namespace, "cinder");
    assert_eq!(cfg.queue_capacity, 150);
    cfg.validate().unwrap();
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let path = write_tmp(
        "partial.json",
        r#"{ "inbound_port": 4000, "namespace": "bridge", "settle_delay_ms": 0 }"#,
    );
    let cfg = BridgeConfig::load(&path).unwrap();
    assert_eq!(cfg.inbound_port, 4000);
    assert_eq!(cfg.namespace, "bridge");
    assert_eq!(cfg.outbound_port, 3001);

    let opts = cfg.controller_opts();
    assert_eq!(opts.namespace, "bridge");
    assert_eq!(opts.settle_delay, Duration::ZERO);
    assert_eq!(opts.drain_interval, Duration::from_secs(1));
}

#[test]
fn invalid_values_are_rejected() {
    let path = write_tmp("bad.json", r#"{ "queue_capacity": 0 }"#);
    assert!(matches!(
        BridgeConfig::load(&path),
        Err(BridgeError::Validation(_))
    ));

    let cfg = BridgeConfig {
        namespace: "a/b".to_owned(),
        ..BridgeConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn unreadable_or_malformed_files_are_errors() {
    assert!(BridgeConfig::load(Path::new("/nonexistent/lockstep.json")).is_err());
    let path = write_tmp("broken.json", "{ not json");
    assert!(matches!(
        BridgeConfig::load(&path),
        Err(BridgeError::Other(_))
    ));
}

#[test]
fn image_ext_must_be_an_encodable_format() {
    for ext in ["png", "PNG", "tiff", "bmp"] {
        let cfg = BridgeConfig {
            image_ext: ext.to_owned(),
            ..BridgeConfig::default()
        };
        cfg.validate().unwrap();
    }
    for ext in ["", "xyz", "mov"] {
        let cfg = BridgeConfig {
            image_ext: ext.to_owned(),
            ..BridgeConfig::default()
        };
        assert!(
            matches!(cfg.validate(), Err(BridgeError::Validation(_))),
            "{ext:?} accepted"
        );
    }
}

#[test]
fn drain_interval_below_the_floor_is_rejected() {
    let cfg = BridgeConfig {
        drain_interval_ms: 0,
        ..BridgeConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(BridgeError::Validation(_))));

    let path = write_tmp("zero_drain.json", r#"{ "drain_interval_ms": 0 }"#);
    assert!(BridgeConfig::load(&path).is_err());

    let cfg = BridgeConfig {
        drain_interval_ms: MIN_DRAIN_INTERVAL.as_millis() as u64,
        ..BridgeConfig::default()
    };
    cfg.validate().unwrap();
}
