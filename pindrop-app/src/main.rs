use anyhow::Context;
use pindrop::prelude::*;

/// Walks around Tokyo Station
fn demo_route() -> Vec<LatLng> {
    vec![
        LatLng::new(35.681236, 139.767125),
        LatLng::new(35.681250, 139.767130), // under the distance filter
        LatLng::new(35.681700, 139.767600),
        LatLng::new(35.682300, 139.768200),
    ]
}

/// Headless walkthrough of both placement modes
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::from_file(&path)
            .with_context(|| format!("failed to load session config from {path}"))?,
        None => SessionConfig {
            pin_name: "Meeting point".to_string(),
            ..SessionConfig::default()
        },
    };

    let provider = SimulatedProvider::new(demo_route()).with_interval(Duration::from_millis(150));
    let session = MapSession::new(config, Box::new(provider))?;

    let mut regions = session.viewport().watch();
    let watcher = tokio::spawn(async move {
        while regions.changed().await.is_ok() {
            let region = *regions.borrow();
            println!(
                "   [watch] region center ({:.6}, {:.6}) span ({:.5}, {:.5})",
                region.center.lat,
                region.center.lng,
                region.span.latitude_delta(),
                region.span.longitude_delta()
            );
        }
    });

    tokio::task::spawn_blocking(move || walkthrough(session)).await??;
    watcher.await?;

    println!("\n✅ Walkthrough finished");
    Ok(())
}

fn wait_for_region(session: &mut MapSession, timeout: Duration) {
    let deadline = std::time::Instant::now() + timeout;
    let before = session.region();
    while session.region() == before && std::time::Instant::now() < deadline {
        for event in session.wait_for_events(Duration::from_millis(100)) {
            log::debug!("session event: {:?}", event);
        }
    }
}

fn print_pin(session: &MapSession) {
    let (lat, lng) = session.pin_labels();
    println!("   📍 '{}' lat: {} lng: {}", session.pin().name, lat, lng);
}

fn walkthrough(mut session: MapSession) -> anyhow::Result<()> {
    println!("🗺️ Pin drop walkthrough");
    println!("======================");

    println!("\n🛰️ Waiting for the first fix:");
    wait_for_region(&mut session, Duration::from_secs(2));
    if session.authorization() == AuthorizationStatus::Denied {
        println!("   Location access denied, staying on the empty region");
    }
    let region = session.region();
    println!(
        "   Center: {:.6}, {:.6} (feed running: {})",
        region.center.lat,
        region.center.lng,
        session.feed().is_running()
    );
    print_pin(&session);

    println!("\n✋ Drag mode:");
    session.arm_for_drag();
    println!("   Interaction: {:?}", session.interaction_mode());
    let mut recognizer = DragRecognizer::new(Frame::from_size(300.0, 200.0)?);
    let inputs = [
        InputEvent::DragStart {
            position: Point::new(150.0, 100.0),
        },
        InputEvent::Drag {
            delta: Point::new(40.0, 20.0),
        },
        InputEvent::Drag {
            delta: Point::new(35.0, 30.0),
        },
        InputEvent::DragEnd,
    ];
    for input in inputs {
        if let Some(gesture) = recognizer.process_input(input) {
            session.handle_gesture(gesture);
        }
    }
    print_pin(&session);
    println!(
        "   Mode after release: {:?}, interaction: {:?}",
        session.drag_mode(),
        session.interaction_mode()
    );

    println!("\n🔄 Show current location again:");
    session.locate_me();
    wait_for_region(&mut session, Duration::from_secs(2));
    print_pin(&session);

    println!("\n➕ Crosshair mode:");
    session.select_placement(PlacementMode::Crosshair);
    let panned = session.region().recentered(LatLng::new(35.6800, 139.7700));
    session.user_region_changed(panned);
    session.set_pin_name("Crosshair pick");
    session.confirm_at_center();
    print_pin(&session);

    for annotation in session.annotations() {
        println!("   Annotation: {}", annotation.options());
    }
    session.process_events();

    Ok(())
}
