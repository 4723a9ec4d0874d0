//! Constellation field rendered to a PNG still.
//!
//! Steps an interactive constellation field for a few seconds of
//! simulated time, with the pointer parked mid-surface, and saves one
//! frame. Run with: cargo run --example constellation

use emberfield::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut field = ParticleField::seeded(
        FieldConfig::new()
            .with_mode(FieldMode::Constellation)
            .with_count(260),
        7,
    );
    field.resize(Viewport::new(1280.0, 720.0));
    field.pointer_moved(Vec2::new(640.0, 360.0));

    // Three seconds of simulated time
    for _ in 0..180 {
        field.step(1.0 / 60.0);
    }

    let mut canvas = Canvas::new(1280, 720);
    canvas.clear(Color::rgb(0.02, 0.02, 0.055));
    field.render(&mut canvas);
    canvas.save_png("constellation.png")?;

    println!(
        "wrote constellation.png ({} particles, {} connections)",
        field.len(),
        field.connections().len()
    );
    Ok(())
}
