//! Headless orbit demo — circles a camera around three waypoints and prints
//! where each marker lands.
//!
//! Usage:
//! ```text
//! cargo run --example orbit
//! RUST_LOG=waymark=trace cargo run --example orbit
//! ```

use std::f64::consts::{FRAC_PI_3, TAU};

use waymark::math::{Point3, Vector3};
use waymark::{
    CameraProjection, HudError, HudSettings, MarkerStore, PerspectiveCamera, WaypointEvent,
    WaypointHud,
};

const FRAMES: u32 = 12;
const ORBIT_RADIUS: f64 = 40.0;

fn main() -> Result<(), HudError> {
    // Default: WARN for everything, INFO for waymark.
    // Override with RUST_LOG env var (e.g. RUST_LOG=waymark=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("orbit=info".parse().unwrap_or_default())
        .add_directive("waymark=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let projection = CameraProjection::new(FRAC_PI_3, 16.0 / 9.0, 0.1, 1000.0)?;
    let camera = PerspectiveCamera::look_at(
        Point3::new(ORBIT_RADIUS, 5.0, 0.0),
        Point3::origin(),
        Vector3::y(),
        projection,
    )?;

    let mut hud = WaypointHud::with_camera(MarkerStore::new(), HudSettings::default(), camera);
    hud.subscribe(|event| match event {
        WaypointEvent::Added(d) => println!("+ {} at {:?}", d.id, d.position),
        WaypointEvent::Removed(d) => println!("- {}", d.id),
    });

    hud.add_waypoint(Point3::origin(), "base");
    hud.add_waypoint(Point3::new(25.0, 0.0, 10.0), "tower");
    let beacon = hud.add_waypoint(Point3::new(-60.0, 12.0, -30.0), "beacon");

    for frame in 0..FRAMES {
        let angle = TAU * f64::from(frame) / f64::from(FRAMES);
        let eye = Point3::new(ORBIT_RADIUS * angle.cos(), 5.0, ORBIT_RADIUS * angle.sin());
        if let Some(camera) = hud.camera_mut() {
            camera.set_pose(eye, Point3::origin(), Vector3::y())?;
        }
        if frame == FRAMES / 2 {
            hud.remove_waypoint(&beacon);
        }

        let stats = hud.update();
        println!(
            "frame {frame:2}: {} anchored, {} behind",
            stats.anchored, stats.behind
        );
        for waypoint in hud.waypoints() {
            let marker = hud.backend().marker(waypoint.data().visual)?;
            match marker.anchor {
                Some(anchor) => println!(
                    "    {:<7} {:>5} @ ({:.2}, {:.2})",
                    waypoint.data().id,
                    marker.label,
                    anchor.x,
                    anchor.y
                ),
                None => println!("    {:<7} {:>5} (not placed yet)", waypoint.data().id, marker.label),
            }
        }
    }

    let backend = hud.into_backend();
    println!("markers left: {}", backend.len());
    Ok(())
}
