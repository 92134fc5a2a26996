//! Demo entry point for the Concourse engine.
//!
//! Drives a scripted session against a real engine instance: a venue
//! map loads, remote attendees appear, the player walks to a POI,
//! focuses an attendee, and pinch-zooms the viewport -- all on a
//! synthetic 60 fps clock, with the resulting bus traffic logged to
//! stderr. Pass a YAML config path as the first argument; without one
//! the built-in defaults apply.

use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use concourse_bus::Subscription;
use concourse_engine::{Engine, EngineConfig};
use concourse_types::payloads::{PresenceSnapshot, topics};
use concourse_types::{
    Poi, PoiId, PoiType, Point, PresenceRecord, PresenceStatus, Uid, to_payload,
};

/// Frame period of the synthetic clock.
const FRAME_MS: f64 = 16.0;

/// Total scripted session length.
const SESSION_MS: f64 = 12_000.0;

fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!("concourse starting");
    let mut engine = Engine::new(&config).context("failed to construct engine")?;
    info!(share_location = engine.share_location(), "engine constructed");

    // Tap the interesting topics so the session is visible on stderr.
    // The guards keep the taps alive for the whole session.
    let _taps = tap_topics(&engine);

    load_venue(&engine)?;
    spawn_attendees(&engine)?;
    run_session(&mut engine)?;

    engine.destroy();
    info!("session complete");
    Ok(())
}

/// Load configuration from the path argument, if given.
fn load_config() -> anyhow::Result<EngineConfig> {
    match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(Path::new(&path))
            .with_context(|| format!("failed to load config from {path}")),
        None => Ok(EngineConfig::default()),
    }
}

/// Subscribe logging taps on the topics worth narrating.
fn tap_topics(engine: &Engine) -> Vec<Subscription> {
    [
        topics::POI_PROXIMITY,
        topics::NAVIGATION_STARTED,
        topics::NAVIGATION_ARRIVED,
        topics::NAVIGATION_CANCELLED,
        topics::CLUSTER_EXPANDED,
        topics::ATTENDEE_FOCUSED,
    ]
    .into_iter()
    .map(|topic| {
        engine.bus().subscribe(topic, move |payload| {
            info!(topic, %payload, "event");
            Ok(())
        })
    })
    .collect()
}

/// Register the demo venue map.
fn load_venue(engine: &Engine) -> anyhow::Result<()> {
    let pois = [
        Poi::new("stage", PoiType::Session, "Main Stage", 800.0, 200.0),
        Poi::new("cafe", PoiType::Food, "Cafe", 300.0, 420.0),
        Poi::new("booth-acme", PoiType::Sponsor, "Acme Corp", 550.0, 500.0),
        Poi::new("info-desk", PoiType::Info, "Info Desk", 120.0, 120.0),
    ];
    for poi in pois {
        engine
            .poi()
            .register(poi)
            .context("failed to register POI")?;
    }
    info!(count = engine.poi().count(), "venue loaded");
    Ok(())
}

/// Publish an initial presence snapshot of remote attendees.
fn spawn_attendees(engine: &Engine) -> anyhow::Result<()> {
    let users = ["ada", "grace", "edsger", "barbara", "tony"]
        .into_iter()
        .map(|name| PresenceRecord {
            uid: Uid::new(name),
            display_name: name.to_owned(),
            zone: "expo".to_owned(),
            status: PresenceStatus::Active,
        })
        .collect();
    let payload = to_payload(&PresenceSnapshot { users }).context("encode presence snapshot")?;
    let delivered = engine.bus().publish(topics::PRESENCE_UPDATE, &payload);
    info!(
        delivered,
        markers = engine.presence().marker_count(),
        clusters = engine.presence().clusters().len(),
        "attendees spawned"
    );
    Ok(())
}

/// Run the scripted frame loop.
fn run_session(engine: &mut Engine) -> anyhow::Result<()> {
    let start = Point::new(100.0, 100.0);
    let mut player = start;
    let mut now = 0.0;

    engine.player_moved(player.x, player.y, Some("entrance".to_owned()));

    while now <= SESSION_MS {
        // t=1s: start way-finding to the cafe.
        if crossed(now, 1000.0) {
            let _ = engine.navigate_to_poi(&PoiId::new("cafe"));
        }

        // While navigating, walk toward the target at 120 units/s.
        if let Some(target) = engine.navigation().target().cloned() {
            player = step_toward(player, target.position, (120.0 * FRAME_MS / 1000.0) as f32);
            engine.player_moved(player.x, player.y, None);
        }

        // t=8s: focus an attendee; the camera pans over on the next frame.
        if crossed(now, 8000.0) {
            let _ = engine.focus_attendee(now, &Uid::new("grace"));
        }

        // t=9s..9.5s: a pinch gesture zooms the viewport in.
        if crossed(now, 9000.0) {
            engine.pointer_down(1, Point::new(400.0, 250.0));
            engine.pointer_down(2, Point::new(500.0, 250.0));
        }
        if now > 9000.0 && now <= 9500.0 {
            let spread = (now - 9000.0) / 5.0; // widens over half a second
            engine.pointer_move(2, Point::new(500.0 + to_f32(spread), 250.0));
        }
        if crossed(now, 9500.0) {
            engine.pointer_up(1);
            engine.pointer_up(2);
            info!(zoom = engine.camera().zoom(), "pinch complete");
        }

        engine.update(now, FRAME_MS);
        now += FRAME_MS;
    }

    info!(
        state = ?engine.navigation().state(),
        zoom = engine.camera().zoom(),
        "session script finished"
    );
    Ok(())
}

/// Whether this frame is the first at or past the scripted time.
fn crossed(now: f64, at: f64) -> bool {
    now >= at && now - FRAME_MS < at
}

/// Move `from` toward `to` by at most `step` units.
fn step_toward(from: Point, to: Point, step: f32) -> Point {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist = dx.hypot(dy);
    if dist <= step {
        return to;
    }
    Point::new(from.x + dx / dist * step, from.y + dy / dist * step)
}

/// Narrow a small scripted offset to `f32`.
#[allow(clippy::cast_possible_truncation)] // script offsets are tiny
fn to_f32(value: f64) -> f32 {
    value as f32
}
