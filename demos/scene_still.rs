//! A full scene preset rendered to a PNG still.
//!
//! Composes the hero scene (liquid backdrop, ember and constellation
//! fields, corner geometry) after five seconds of simulated time.
//! Run with: cargo run --example scene_still

use emberfield::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SceneConfig::new()
        .with_variant(SceneVariant::Hero)
        .with_intensity(Intensity::Medium);
    let mut scene = Scene::seeded(config, DeviceProfile::detect().quality_tier(), 3);
    scene.resize(Viewport::new(1440.0, 900.0));
    scene.pointer_moved(Vec2::new(900.0, 300.0));

    for _ in 0..300 {
        scene.advance(1.0 / 60.0);
    }

    let mut canvas = Canvas::new(1440, 900);
    canvas.clear(Color::rgb(0.02, 0.02, 0.055));
    scene.compose(&mut canvas);
    canvas.save_png("scene_still.png")?;

    println!(
        "wrote scene_still.png ({} variant, {} embers + {} constellation particles)",
        scene.variant(),
        scene.embers().len(),
        scene.constellation().len()
    );
    Ok(())
}
