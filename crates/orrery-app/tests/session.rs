//! End-to-end sessions against batch files on disk.

use std::collections::BTreeMap;
use std::path::Path;

use orrery_app::{GameLoop, Orrery};
use orrery_config::{Config, SizeScale};
use orrery_flight::{FlightMode, FreeMode, MenuMode, OrbitMode, PilotInput, Setting, StepResult};

const EPOCH: i64 = 2_451_545;
const BATCH: i64 = 30;

/// Bodies on slow circles around the Sun at the origin. Body `i` orbits at
/// radius `i + 1` AU.
fn write_batch(dir: &Path, first: i64) {
    let days: BTreeMap<String, Vec<[f64; 3]>> = (first..first + BATCH)
        .map(|julian| {
            let angle = (julian - EPOCH) as f64 * 0.001;
            let positions = (0..11)
                .map(|i| {
                    if i == 10 {
                        [0.0, 0.0, 0.0]
                    } else {
                        let r = i as f64 + 1.0;
                        [r * angle.cos(), 0.0, r * angle.sin()]
                    }
                })
                .collect();
            (julian.to_string(), positions)
        })
        .collect();
    let json = serde_json::to_string(&days).unwrap();
    std::fs::write(dir.join(format!("{first}.json")), json).unwrap();
}

fn config(data_dir: &Path, background: bool) -> Config {
    let mut config = Config::default();
    config.ephemeris.data_dir = data_dir.to_path_buf();
    config.ephemeris.epoch_julian = EPOCH;
    config.ephemeris.start_julian = EPOCH + 10;
    config.ephemeris.batch_limit = BATCH;
    config.ephemeris.preload_offset = 5;
    config.ephemeris.background_loading = background;
    config.space.orbit_line_segments = 4;
    config.camera.initial_position = [0.0, 2.0, 8.0];
    config
}

fn run_frames(orrery: &mut Orrery, frames: u64) -> Vec<StepResult> {
    let mut game_loop = GameLoop::new();
    let mut results = Vec::new();
    while game_loop.update_count() < frames {
        game_loop.step_once(|dt, _| results.push(orrery.frame(dt).unwrap()), |_| {});
    }
    results
}

#[test]
fn orbit_session_reaches_target_and_orbits() {
    let data = tempfile::tempdir().unwrap();
    write_batch(data.path(), EPOCH);

    let mut orrery = Orrery::headless_from_config(config(data.path(), false)).unwrap();
    let handle = orrery.orbit("Jupiter").unwrap();
    assert_eq!(orrery.context().config.space.bodies_speed, 0);

    run_frames(&mut orrery, 3000);
    assert!(handle.is_completed());
    assert_eq!(orrery.current_mode(), Some(OrbitMode::NAME));

    // Orbit controls hold the camera at the collision distance.
    let jupiter = orrery.context().bodies.get("Jupiter").unwrap();
    let distance = jupiter.distance_to(orrery.context().camera.position);
    assert!((distance - jupiter.collision_distance()).abs() < 1e-9);
    let to_jupiter = (jupiter.position() - orrery.context().camera.position).normalize();
    assert!((orrery.context().camera.forward() - to_jupiter).length() < 1e-6);
}

#[test]
fn time_runs_across_batches_with_background_loading() {
    let data = tempfile::tempdir().unwrap();
    write_batch(data.path(), EPOCH);
    write_batch(data.path(), EPOCH + BATCH);

    let mut orrery = Orrery::headless_from_config(config(data.path(), true)).unwrap();
    orrery.set_mode(FreeMode::NAME).unwrap();
    orrery.on_pointer_lock_change(true).unwrap();
    orrery.apply_setting(Setting::BodiesSpeed(1)).unwrap();

    // Crossing into the second batch may wait a few frames on the worker.
    let mut frames = 0;
    while orrery.context().clock.julian() < EPOCH + BATCH + 5 {
        orrery.frame(1.0 / 60.0).unwrap();
        frames += 1;
        assert!(frames < 2000, "clock stalled at {}", orrery.context().clock.julian());
        std::thread::yield_now();
    }
    assert_eq!(orrery.current_mode(), Some(FreeMode::NAME));

    let earth = orrery.context().bodies.get("Earth").unwrap();
    let angle = (EPOCH + BATCH + 5 - EPOCH) as f64 * 0.001;
    let expected = glam::DVec3::new(3.0 * angle.cos(), 0.0, 3.0 * angle.sin());
    assert!((earth.position() - expected).length() < 1e-9);
}

#[test]
fn end_of_data_freezes_time_and_opens_menu() {
    let data = tempfile::tempdir().unwrap();
    write_batch(data.path(), EPOCH);

    let mut orrery = Orrery::headless_from_config(config(data.path(), false)).unwrap();
    orrery.set_mode(FreeMode::NAME).unwrap();
    orrery.on_pointer_lock_change(true).unwrap();
    orrery.apply_setting(Setting::BodiesSpeed(4)).unwrap();

    let results = run_frames(&mut orrery, 20);
    assert!(results.contains(&StepResult::Stop));
    assert_eq!(orrery.current_mode(), Some(MenuMode::NAME));
    assert_eq!(orrery.context().config.space.bodies_speed, 0);
    let last_day = orrery.context().clock.julian();
    assert!(last_day < EPOCH + BATCH);

    // The menu holds everything still.
    run_frames(&mut orrery, 10);
    assert_eq!(orrery.context().clock.julian(), last_day);
}

#[test]
fn free_flight_slows_near_bodies() {
    let data = tempfile::tempdir().unwrap();
    write_batch(data.path(), EPOCH);

    let mut orrery = Orrery::headless_from_config(config(data.path(), false)).unwrap();
    orrery.set_mode(FreeMode::NAME).unwrap();
    orrery.on_pointer_lock_change(true).unwrap();
    orrery.set_pilot_input(PilotInput {
        forward: 1.0,
        ..Default::default()
    });

    let start = orrery.context().camera.position;
    run_frames(&mut orrery, 1);
    let far_step = (orrery.context().camera.position - start).length();

    let sun = orrery.context().bodies.get("Sun").unwrap();
    let near = sun.position() + glam::DVec3::new(0.0, 0.0, sun.collision_distance() * 2.0);
    orrery.context_mut().camera.position = near;
    orrery.context_mut().camera.look_at(glam::DVec3::new(0.0, 0.0, 100.0));
    run_frames(&mut orrery, 1);
    let near_step = (orrery.context().camera.position - near).length();

    assert!(far_step > 0.0);
    assert!(near_step < far_step);
    let free = orrery.controller().mode(FreeMode::NAME).unwrap();
    assert!(free.speed() > 0.0);
}

#[test]
fn size_scale_setting_rescales_bodies() {
    let data = tempfile::tempdir().unwrap();
    write_batch(data.path(), EPOCH);

    let mut orrery = Orrery::headless_from_config(config(data.path(), false)).unwrap();
    let before = orrery.context().bodies.get("Mars").unwrap().collision_distance();
    orrery
        .apply_setting(Setting::BodiesSizeScale(SizeScale::Factor(100.0)))
        .unwrap();
    let after = orrery.context().bodies.get("Mars").unwrap().collision_distance();
    assert!((after - before * 100.0).abs() < 1e-12);

    orrery.apply_setting(Setting::BodiesSizeScale(SizeScale::Large)).unwrap();
    let mars = orrery.context().bodies.get("Mars").unwrap();
    assert!((mars.scaled_radius() - 0.1).abs() < 1e-12);
    assert_eq!(orrery.context().camera.near, 0.01);
}
