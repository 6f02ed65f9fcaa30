#![allow(dead_code)]

use strain_pp::{
    model::hit_object::{HitObject, Pos, Slider, SliderPath},
    Beatmap,
};

/// Circles alternating between two points `spacing` apart, one every
/// `interval` milliseconds.
pub fn jumps(n: usize, spacing: f32, interval: f64) -> Beatmap {
    let hit_objects = (0..n)
        .map(|i| {
            let x = if i % 2 == 0 {
                256.0 - spacing / 2.0
            } else {
                256.0 + spacing / 2.0
            };

            HitObject::circle(Pos::new(x, 192.0), i as f64 * interval)
        })
        .collect();

    Beatmap::new(hit_objects)
}

/// Three circles, one slider without ticks, and a spinner.
pub fn mixed() -> Beatmap {
    let slider = Slider {
        path: SliderPath::linear(Pos::new(200.0, 0.0)),
        repeats: 0,
        velocity: 1.0,
        tick_distance: 0.0,
    };

    let mut map = Beatmap::new(vec![
        HitObject::circle(Pos::new(100.0, 100.0), 0.0),
        HitObject::circle(Pos::new(300.0, 100.0), 300.0),
        HitObject::circle(Pos::new(300.0, 300.0), 600.0),
        HitObject::slider(Pos::new(100.0, 300.0), 900.0, slider),
        HitObject::spinner(Pos::new(256.0, 192.0), 1500.0, 1000.0),
    ]);

    map.ar = 9.0;
    map.od = 8.0;
    map.hp = 5.0;
    map.cs = 4.0;

    map
}

/// A longer map of circles and repeating sliders in a zigzag pattern.
pub fn zigzag(n: usize) -> Beatmap {
    let hit_objects = (0..n)
        .map(|i| {
            let x = 64.0 + (i % 4) as f32 * 128.0;
            let y = if i % 2 == 0 { 96.0 } else { 288.0 };
            let pos = Pos::new(x, y);
            let start_time = i as f64 * 200.0;

            if i % 5 == 4 {
                let slider = Slider {
                    path: SliderPath::linear(Pos::new(-80.0, 0.0)),
                    repeats: 1,
                    velocity: 1.6,
                    tick_distance: 40.0,
                };

                HitObject::slider(pos, start_time, slider)
            } else {
                HitObject::circle(pos, start_time)
            }
        })
        .collect();

    Beatmap::new(hit_objects)
}

pub fn assert_eq_float(actual: f64, expected: f64, name: &str) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "{name}: expected {expected} but got {actual}"
    );
}
