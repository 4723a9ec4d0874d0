//! Phoenix embers driven through a surface host.
//!
//! Exercises the full lifecycle: mount, scheduled frames, quality
//! governance, teardown. Run with: cargo run --example ember_rise

use emberfield::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = FieldConfig::new()
        .with_mode(FieldMode::Phoenix)
        .with_count(250)
        .with_palette(Palette::solid(Color::PHOENIX_RED));
    let mut host = SurfaceHost::seeded(
        config,
        DeviceProfile::detect(),
        ManualScheduler::new(),
        NullRegistry,
        11,
    );
    host.set_fixed_delta(Some(1.0 / 60.0));
    host.mount(Viewport::new(1280.0, 720.0));

    // Four seconds of scheduled frames
    let mut canvas = Canvas::new(1280, 720);
    for _ in 0..240 {
        if host.scheduler_mut().take() {
            host.frame(&mut canvas);
        }
    }

    // Re-render the final state over a dark backdrop for the still
    let mut still = Canvas::new(1280, 720);
    still.clear(Color::rgb(0.02, 0.02, 0.055));
    host.field().render(&mut still);
    still.save_png("ember_rise.png")?;

    println!(
        "wrote ember_rise.png ({} embers, {} tier at {} fps)",
        host.field().len(),
        host.quality_tier(),
        host.fps()
    );

    host.unmount();
    Ok(())
}
