//! Build guide example: decode a BOM and lay out its parts on a breadboard.

use pedalpath::prelude::*;
use pedalpath::{decode_bom, dip_footprint, hole_to_coordinates};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/fuzz_face_bom.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example build_guide [path/to/bom.json]");
        std::process::exit(1);
    }

    let entries: Vec<BomEntry> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let options = DecodeOptions::default();
    let layout = options.breadboard()?;
    let report = decode_bom(&entries, &options);

    println!("Parts list for: {}", path.display());
    for line in &report.lines {
        match (&line.component, &line.error) {
            (Some(component), _) => {
                let mark = if component.is_orientation_sensitive() { " (!)" } else { "" };
                println!("  {:<6} x{} {}{}", line.reference, line.quantity, component.summary(), mark);
                for hint in &line.notes.hints {
                    println!("           {}", hint);
                }
            }
            (None, Some(error)) => println!("  {:<6} ?? {} ({})", line.reference, line.input, error),
            (None, None) => {}
        }
    }

    // ICs go across the channel, left to right with two free columns between
    let mut column = 3;
    println!("\nIC placement on {}:", layout.name);
    for component in report.components() {
        if let Component::Ic(spec) = component {
            let placements = dip_footprint(layout, column, spec.pin_count)?;
            for placement in &placements {
                let point = hole_to_coordinates(&placement.hole, layout)?;
                let name = spec.pin(placement.pin).map(|p| p.name.as_str()).unwrap_or("");
                println!(
                    "  {} pin {:>2} {:<8} {:>4}  ({:.2}, {:.2}) mm",
                    spec.part_number,
                    placement.pin,
                    name,
                    placement.hole.to_string(),
                    point.x,
                    point.y
                );
            }
            column += u32::from(spec.pin_count / 2) + 2;
        }
    }

    println!(
        "\n{} decoded, {} failed, {} orientation-sensitive",
        report.stats.decoded, report.stats.failed, report.stats.orientation_sensitive
    );
    Ok(())
}
