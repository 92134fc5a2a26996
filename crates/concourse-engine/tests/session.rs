//! End-to-end scripted session: one engine, synthetic feeds, fixed
//! frame cadence, assertions on the event traffic that crosses the bus.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use concourse_bus::EventBus;
use concourse_engine::{Engine, EngineConfig};
use concourse_types::payloads::{NavigationCancelled, PresenceSnapshot, topics};
use concourse_types::{
    Poi, PoiId, PoiType, Point, PresenceRecord, PresenceStatus, Uid, from_payload, to_payload,
};

fn capture(bus: &EventBus, topic: &str) -> Rc<RefCell<Vec<Value>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = bus.subscribe(topic, move |payload| {
        sink.borrow_mut().push(payload.clone());
        Ok(())
    });
    seen
}

fn presence_snapshot(uids: &[&str]) -> Value {
    let users = uids
        .iter()
        .map(|uid| PresenceRecord {
            uid: Uid::new(*uid),
            display_name: (*uid).to_owned(),
            zone: "expo".to_owned(),
            status: PresenceStatus::Active,
        })
        .collect();
    to_payload(&PresenceSnapshot { users }).unwrap()
}

/// Run frames at 16 ms cadence from `from_ms` (exclusive) to `to_ms`.
fn run_frames(engine: &mut Engine, from_ms: f64, to_ms: f64) {
    let mut now = from_ms + 16.0;
    while now <= to_ms {
        engine.update(now, 16.0);
        now += 16.0;
    }
}

#[test]
fn full_session_walkthrough() {
    let config = EngineConfig::parse(
        r#"
poi:
  proximity_radius: 100.0
  scan_interval_ms: 500.0
navigation:
  arrival_threshold: 30.0
  progress_interval_ms: 100.0
  arrival_grace_ms: 1000.0
"#,
    )
    .unwrap();
    let mut engine = Engine::new(&config).unwrap();
    let bus = engine.bus().clone();

    let proximity = capture(&bus, topics::POI_PROXIMITY);
    let nav_updates = capture(&bus, topics::NAVIGATION_UPDATE);
    let nav_arrived = capture(&bus, topics::NAVIGATION_ARRIVED);
    let nav_cancelled = capture(&bus, topics::NAVIGATION_CANCELLED);

    // Venue loads: a couple of POIs land in the registry.
    engine
        .poi()
        .register(Poi::new("stage", PoiType::Session, "Main Stage", 400.0, 0.0))
        .unwrap();
    engine
        .poi()
        .register(Poi::new("cafe", PoiType::Food, "Cafe", 60.0, 0.0))
        .unwrap();

    // The player appears near the cafe and the scan starts firing.
    engine.player_moved(0.0, 0.0, Some("entrance".to_owned()));
    engine.update(0.0, 0.0); // arms every interval
    run_frames(&mut engine, 0.0, 1100.0);
    // Two scan ticks (500, 1000), each seeing the cafe within 100 units.
    assert_eq!(proximity.borrow().len(), 2);

    // Way-finding to the stage: progress ticks but no arrival while far.
    assert!(engine.navigate_to_poi(&PoiId::new("stage")));
    run_frames(&mut engine, 1100.0, 1500.0);
    assert!(!nav_updates.borrow().is_empty());
    assert!(nav_arrived.borrow().is_empty());

    // The player walks up to the stage; the next tick detects arrival.
    engine.player_moved(390.0, 0.0, None);
    run_frames(&mut engine, 1500.0, 1700.0);
    assert_eq!(nav_arrived.borrow().len(), 1);

    // Grace elapses: automatic reset, tagged auto.
    run_frames(&mut engine, 1700.0, 3000.0);
    assert!(engine.navigation().state().is_idle());
    let cancel: NavigationCancelled =
        from_payload(nav_cancelled.borrow().first().unwrap()).unwrap();
    assert!(cancel.auto);

    engine.destroy();
}

#[test]
fn presence_flow_with_clustering_and_focus() {
    // A tight ring forces every derived position within clustering range.
    let config = EngineConfig::parse(
        r#"
presence:
  max_markers: 10
  cluster_distance: 500.0
  ring_min_radius: 10.0
  ring_max_radius: 50.0
  focus_label_ms: 1000.0
"#,
    )
    .unwrap();
    let mut engine = Engine::new(&config).unwrap();
    let bus = engine.bus().clone();
    let expanded = capture(&bus, topics::CLUSTER_EXPANDED);

    let _ = bus.publish(topics::PRESENCE_UPDATE, &presence_snapshot(&["a", "b", "c"]));
    assert_eq!(engine.presence().marker_count(), 3);
    assert_eq!(engine.presence().clusters().len(), 1);
    assert_eq!(engine.presence().visible_count(), 0);

    // Expanding restores the members and announces it.
    let cluster_id = engine.presence().clusters().first().unwrap().id;
    assert!(engine.presence().expand_cluster(&cluster_id));
    assert_eq!(engine.presence().visible_count(), 3);
    assert_eq!(expanded.borrow().len(), 1);

    // Focusing pans the camera to the marker on the next frame.
    let marker = engine.presence().marker(&Uid::new("b")).unwrap();
    assert!(engine.focus_attendee(0.0, &Uid::new("b")));
    engine.update(16.0, 16.0);
    assert_eq!(engine.camera().center(), marker.position);

    // The label hides after the configured second.
    run_frames(&mut engine, 16.0, 1100.0);
    assert!(!engine.presence().marker(&Uid::new("b")).unwrap().label_shown);

    engine.destroy();
}

#[test]
fn input_routing_splits_joystick_and_pinch() {
    let config = EngineConfig::parse(
        r#"
joystick:
  x: 0.0
  y: 500.0
  width: 200.0
  height: 200.0
  max_radius: 50.0
"#,
    )
    .unwrap();
    let mut engine = Engine::new(&config).unwrap();
    let bus = engine.bus().clone();
    let joystick_events = capture(&bus, topics::JOYSTICK_STATE);

    // One finger on the stick, two free fingers pinching.
    engine.pointer_down(1, Point::new(100.0, 600.0));
    engine.pointer_down(2, Point::new(300.0, 100.0));
    engine.pointer_down(3, Point::new(400.0, 100.0));
    assert!(engine.joystick().unwrap().is_active());
    assert!(engine.camera().is_pinching());

    engine.pointer_move(1, Point::new(125.0, 600.0)); // half deflection
    engine.pointer_move(3, Point::new(500.0, 100.0)); // pinch spread x2
    assert_eq!(engine.joystick().unwrap().state().dx, 0.5);
    assert_eq!(engine.camera().zoom(), 2.0);

    engine.pointer_up(1);
    assert!(!engine.joystick().unwrap().is_active());
    // down + move + up on the stick: three state events.
    assert_eq!(joystick_events.borrow().len(), 3);

    engine.destroy();
}
