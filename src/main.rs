use std::path::Path;

use icon_scan::config::ScanConfig;
use icon_scan::overlay::OverlaySink;
use icon_scan::scan::{ImageDirSource, Scanner};

mod args;
use args::{Args, Mode};

fn main() {
    env_logger::init();

    let Some(args) = Args::parse() else {
        return;
    };

    if let Err(e) = run(args) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = Path::new(&args.config);
    let config = ScanConfig::load(config_path)?;
    let base = config_path.parent().unwrap_or(Path::new("."));
    let detectors = config.build_detectors(base)?;
    if detectors.is_empty() {
        return Err("no detectors configured".into());
    }

    let source = ImageDirSource::open(&args.frames)?;
    println!(
        "🔍 {} detector(s) over {} frame(s) from {}",
        detectors.len(),
        source.len(),
        args.frames
    );
    let mut scanner = Scanner::new(source);

    match args.mode {
        Mode::Count => {
            let name = args.detector.as_deref().unwrap_or(detectors[0].name());
            let detector = detectors
                .iter()
                .find(|d| d.name() == name)
                .ok_or_else(|| format!("no detector named '{name}' in config"))?;
            let count = scanner.count_matches(detector, args.stride)?;
            println!(
                "✅ {}: {} matching frame(s) at stride {}",
                detector.name(),
                count,
                args.stride
            );
        }
        Mode::Scan => {
            let mut sink = OverlaySink {
                draw_regions: args.draw_regions,
            };
            let summary = scanner.run(&detectors, &mut sink)?;
            println!(
                "✅ {} frame(s) scanned, {} detection(s)",
                summary.frames, summary.detections
            );
        }
    }

    Ok(())
}
