//! Sacred-geometry gallery exported as SVG documents.
//!
//! Generates every pattern at every complexity tier and writes one SVG
//! file each. Run with: cargo run --example geometry_gallery

use emberfield::prelude::*;
use emberfield::svg;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    for pattern in Pattern::ALL {
        for complexity in Complexity::ALL {
            let figure = Figure::with_reference_size(pattern, complexity);
            let options = SvgOptions::new()
                .with_size(480.0)
                .with_id_prefix(pattern.name());
            let name = format!("{}_{}.svg", pattern, complexity);
            svg::save(&figure, &options, &name)?;
            println!("wrote {} ({} primitives)", name, figure.primitives().len());
        }
    }
    Ok(())
}
