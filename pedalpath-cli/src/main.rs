//! PedalPath CLI - decode component markings and locate breadboard holes.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pedalpath::capacitor::{self, CapacitorEncodeRequest};
use pedalpath::parser::parse_resistance;
use pedalpath::parts::{self, CathodeMarking, IcRegistry, LedSize};
use pedalpath::resistor::{self, BandColor, ResistorSpec};
use pedalpath::{
    breadboard, decode_bom, BomEntry, BomReport, BreadboardLayout, DecodeOptions, IcSpec,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "pedalpath")]
#[command(about = "Component value decoder and breadboard locator for pedal builds", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resistor color codes
    Resistor {
        #[command(subcommand)]
        action: ResistorAction,
    },

    /// Capacitor markings
    Capacitor {
        #[command(subcommand)]
        action: CapacitorAction,
    },

    /// Look up an IC pinout
    Ic {
        /// Part number, e.g. TL072CP
        #[arg(value_name = "PART")]
        part: String,

        /// Directory of extra IC definitions (*.json)
        #[arg(long, value_name = "DIR")]
        parts_dir: Option<PathBuf>,
    },

    /// Look up a diode
    Diode {
        /// Part number, e.g. 1N4148
        #[arg(value_name = "PART")]
        part: String,
    },

    /// Describe an LED by color and size
    Led {
        /// Lens color
        #[arg(value_name = "COLOR")]
        color: String,

        /// Package size (3mm or 5mm)
        #[arg(short, long, default_value = "5mm")]
        size: String,
    },

    /// Locate breadboard holes in millimetres
    Hole {
        /// Hole ids, e.g. a1 j63 X7
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,

        /// Breadboard model (830 or 400)
        #[arg(short, long, default_value = "full-830")]
        layout: String,

        /// Also report pixel positions at this scale
        #[arg(long, value_name = "PX_PER_MM")]
        scale: Option<f64>,
    },

    /// Decode a bill of materials (JSON array of entries)
    Bom(BomArgs),
}

#[derive(Subcommand)]
enum ResistorAction {
    /// Color bands to resistance
    Decode {
        /// 4 or 5 band colors, first band first
        #[arg(value_name = "COLOR", required = true)]
        bands: Vec<String>,
    },
    /// Resistance to color bands
    Encode {
        /// Resistance, e.g. 4k7, 470R, 2.2M
        #[arg(value_name = "VALUE")]
        value: String,

        /// Tolerance in percent
        #[arg(short, long, default_value_t = 1.0)]
        tolerance: f64,
    },
}

#[derive(Subcommand)]
enum CapacitorAction {
    /// Printed marking to capacitance
    Decode {
        /// Marking, e.g. 473K100, 4n7, "100uF 25V"
        #[arg(value_name = "MARKING")]
        marking: String,
    },
    /// Capacitance to EIA and alphanumeric markings
    Encode {
        /// Value in picofarads
        #[arg(long)]
        pf: Option<f64>,

        /// Value in nanofarads
        #[arg(long)]
        nf: Option<f64>,

        /// Value in microfarads
        #[arg(long)]
        uf: Option<f64>,

        /// Tolerance in percent
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Rated voltage
        #[arg(short, long)]
        voltage: Option<u32>,
    },
}

#[derive(Args)]
struct BomArgs {
    /// Path to the BOM JSON file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Decode options JSON; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resistor tolerance for values given without bands
    #[arg(long)]
    resistor_tolerance: Option<f64>,

    /// Capacitor tolerance for markings without a tolerance letter
    #[arg(long)]
    capacitor_tolerance: Option<f64>,

    /// Capacitor voltage for markings without a rating
    #[arg(long)]
    capacitor_voltage: Option<u32>,

    /// LED size when the value does not name one
    #[arg(long)]
    led_size: Option<String>,

    /// Exit with an error code if any line fails to decode
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let format = cli.format;
    match cli.command {
        Commands::Resistor { action } => handle_resistor(action, format),
        Commands::Capacitor { action } => handle_capacitor(action, format),
        Commands::Ic { part, parts_dir } => handle_ic(&part, parts_dir.as_deref(), format),
        Commands::Diode { part } => {
            let spec = parts::lookup_diode(&part)?;
            emit(format, &spec, || {
                println!("{} ({})", spec.part_number, spec.diode_type);
                if !spec.description.is_empty() {
                    println!("  {}", spec.description);
                }
                if let Some(volts) = spec.voltage {
                    println!("  Voltage: {} V", volts);
                }
                let cathode = match spec.cathode_marking {
                    CathodeMarking::Band => "band",
                    CathodeMarking::FlatEdge => "flat edge",
                };
                println!("  Cathode: {}", cathode);
            })
        }
        Commands::Led { color, size } => {
            let spec = parts::decode_led(&color, &size)?;
            emit(format, &spec, || {
                println!("{}", spec.description);
                println!("  Part:            {}", spec.part_number);
                println!("  Forward voltage: {} V", spec.forward_voltage);
                println!("  Cathode:         short leg, flat edge");
            })
        }
        Commands::Hole { ids, layout, scale } => handle_hole(&ids, &layout, scale, format),
        Commands::Bom(args) => handle_bom(&args, format),
    }
}

/// Print `value` as JSON, or run `human` for the human format.
fn emit<T: Serialize>(format: OutputFormat, value: &T, human: impl FnOnce()) -> anyhow::Result<i32> {
    match format {
        OutputFormat::Human => human(),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(0)
}

fn handle_resistor(action: ResistorAction, format: OutputFormat) -> anyhow::Result<i32> {
    let spec = match action {
        ResistorAction::Decode { bands } => resistor::decode(bands.as_slice())?,
        ResistorAction::Encode { value, tolerance } => {
            let ohms = parse_resistance(&value)?;
            resistor::encode(ohms, tolerance)?
        }
    };
    emit(format, &spec, || print_resistor(&spec))
}

fn band_names(bands: &[BandColor]) -> String {
    bands.iter().map(|b| b.name()).collect::<Vec<_>>().join(" ")
}

fn print_resistor(spec: &ResistorSpec) {
    println!("{}", spec);
    println!("  5-band: {}", band_names(&spec.bands5));
    if let Some(bands4) = &spec.bands4 {
        println!("  4-band: {}", band_names(bands4));
    }
    match (spec.e_series_match(), spec.nearest_standard_value()) {
        (Some(series), _) => println!("  Series: {}", series),
        (None, Some(nearest)) => println!(
            "  Series: none (nearest standard value {})",
            resistor::format_ohms(nearest)
        ),
        (None, None) => {}
    }
}

fn handle_capacitor(action: CapacitorAction, format: OutputFormat) -> anyhow::Result<i32> {
    match action {
        CapacitorAction::Decode { marking } => {
            let spec = capacitor::decode(&marking)?;
            emit(format, &spec, || {
                println!("{}", spec);
                println!("  Value:    {}", spec.capacitance.all_units());
                println!("  Marking:  {} ({})", spec.source, spec.grammar.name());
                if spec.polarized {
                    println!("  Polarized: mind the stripe");
                }
            })
        }
        CapacitorAction::Encode {
            pf,
            nf,
            uf,
            tolerance,
            voltage,
        } => {
            let request = CapacitorEncodeRequest {
                pf,
                nf,
                uf,
                tolerance_percent: tolerance,
                voltage,
            };
            let encoded = capacitor::encode(&request)?;
            emit(format, &encoded, || {
                println!("{}", encoded.capacitance.all_units());
                println!("  EIA:          {}", encoded.eia_code);
                println!("  Alphanumeric: {}", encoded.alpha_code);
                println!("  Film code:    {}", encoded.full_film_code);
                println!("  Alpha code:   {}", encoded.full_alpha_code);
                if let Some(iec) = &encoded.iec_film_code {
                    println!("  IEC code:     {}", iec);
                }
            })
        }
    }
}

fn handle_ic(part: &str, parts_dir: Option<&Path>, format: OutputFormat) -> anyhow::Result<i32> {
    let spec = match parts_dir {
        Some(dir) => IcRegistry::load_from_directory(dir)
            .with_context(|| format!("loading IC definitions from {}", dir.display()))?
            .lookup(part),
        None => parts::lookup_ic(part),
    };
    emit(format, &spec, || print_ic(&spec))
}

fn print_ic(spec: &IcSpec) {
    println!("{} ({}-pin DIP)", spec.part_number, spec.pin_count);
    if let Some(manufacturer) = &spec.manufacturer {
        println!("  {}", manufacturer);
    }
    println!("  {}", spec.description);
    println!();
    for pin in &spec.pinout {
        if pin.description.is_empty() {
            println!("  {:>2}  {}", pin.number, pin.name);
        } else {
            println!("  {:>2}  {:<10} {}", pin.number, pin.name, pin.description);
        }
    }
}

#[derive(Serialize)]
struct LocatedHole {
    id: String,
    hole: breadboard::HoleAddress,
    x: f64,
    y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pixels: Option<breadboard::Point>,
}

fn handle_hole(
    ids: &[String],
    layout: &str,
    scale: Option<f64>,
    format: OutputFormat,
) -> anyhow::Result<i32> {
    let Some(layout) = BreadboardLayout::by_name(layout) else {
        bail!("unknown breadboard layout {:?} (expected 830 or 400)", layout);
    };

    let located = ids
        .iter()
        .map(|id| {
            let hole = breadboard::parse_hole_address(id, layout)?;
            let point = breadboard::hole_to_coordinates(&hole, layout)?;
            Ok(LocatedHole {
                id: id.trim().to_string(),
                hole,
                x: point.x,
                y: point.y,
                pixels: scale.map(|px| point.scaled(px)),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    emit(format, &located, || {
        for hole in &located {
            print!("{:<4} ({:.2}, {:.2}) mm", hole.hole.to_string(), hole.x, hole.y);
            if let Some(px) = hole.pixels {
                print!("  ({:.1}, {:.1}) px", px.x, px.y);
            }
            println!();
        }
    })
}

fn load_options(args: &BomArgs) -> anyhow::Result<DecodeOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing decode options in {}", path.display()))?
        }
        None => DecodeOptions::default(),
    };

    if let Some(tolerance) = args.resistor_tolerance {
        options.resistor_tolerance = tolerance;
    }
    if let Some(tolerance) = args.capacitor_tolerance {
        options.capacitor_tolerance = tolerance;
    }
    if let Some(voltage) = args.capacitor_voltage {
        options.capacitor_voltage = Some(voltage);
    }
    if let Some(size) = &args.led_size {
        options.led_size = size.parse::<LedSize>()?;
    }
    options.validate().context("invalid decode options")?;
    Ok(options)
}

fn handle_bom(args: &BomArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let options = load_options(args)?;
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let entries: Vec<BomEntry> = serde_json::from_str(&content)
        .with_context(|| format!("parsing BOM in {}", args.file.display()))?;

    tracing::info!("Decoding {} BOM entries from {:?}", entries.len(), args.file);
    let report = decode_bom(&entries, &options);

    emit(format, &report, || print_bom(&args.file, &report))?;
    if args.strict && report.has_failures() {
        return Ok(1);
    }
    Ok(0)
}

fn print_bom(file: &Path, report: &BomReport) {
    println!("\nFile: {}", file.display());
    println!("{}", "─".repeat(60));

    for line in &report.lines {
        match (&line.component, &line.error) {
            (Some(component), _) => {
                let mark = if component.is_orientation_sensitive() {
                    "  [polarity]"
                } else {
                    ""
                };
                println!(
                    "  {:<6} x{:<2} {}{}",
                    line.reference,
                    line.quantity,
                    component.summary(),
                    mark
                );
                if !line.notes.markings.is_empty() {
                    println!("             Look for: {}", line.notes.markings.join(", "));
                }
                for warning in &line.notes.warnings {
                    println!("             Warning:  {}", warning);
                }
            }
            (None, Some(error)) => {
                println!("  {:<6} x{:<2} {:?}: {}", line.reference, line.quantity, line.input, error);
            }
            (None, None) => {}
        }
    }

    println!("\n  Summary:");
    println!("    Decoded:               {}", report.stats.decoded);
    println!("    Failed:                {}", report.stats.failed);
    println!("    Orientation-sensitive: {}", report.stats.orientation_sensitive);
    if let Some(layout) = report.layout {
        println!("    Breadboard:            {}", layout);
    }
}
