use super::*;

const ALL: [Ease; 4] = [Ease::Linear, Ease::In, Ease::Out, Ease::InOut];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn curves_bend_the_expected_way() {
    assert!(Ease::In.apply(0.5) < 0.5);
    assert!(Ease::Out.apply(0.5) > 0.5);
    assert!((Ease::InOut.apply(0.5) - 0.5).abs() < 1e-12);
    assert_eq!(Ease::Out.apply(2.0), 1.0);
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn tween_follows_the_clock_and_holds_outside_its_range() {
    let mut clock = TweenClock::new();
    let id = clock.add(1.0, 2.0, 10.0, 20.0, Ease::Linear);
    assert_eq!(clock.value(id), Some(10.0));
    clock.step_to(2.0);
    assert_eq!(clock.value(id), Some(15.0));
    clock.step_to(10.0);
    assert_eq!(clock.value(id), Some(20.0));
}

#[test]
fn clear_drops_tweens_and_rewinds() {
    let mut clock = TweenClock::new();
    let id = clock.add(0.0, 0.0, 0.0, 1.0, Ease::Linear);
    clock.step_to(5.0);
    assert_eq!(clock.value(id), Some(1.0));
    clock.clear();
    assert_eq!(clock.now(), 0.0);
    assert_eq!(clock.value(id), None);
}
