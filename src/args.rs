use std::env;

#[derive(Debug, Clone)]
pub enum Mode {
    Scan,
    Count,
}

#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    pub config: String,
    pub frames: String,
    pub detector: Option<String>,
    pub stride: u32,
    pub draw_regions: bool,
}

impl Args {
    pub fn parse() -> Option<Self> {
        let args: Vec<String> = env::args().collect();

        let mut mode = Mode::Scan;
        let mut config: Option<String> = None;
        let mut frames: Option<String> = None;
        let mut detector: Option<String> = None;
        let mut stride: u32 = 1;
        let mut draw_regions = false;

        for arg in args.iter().skip(1) {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!("icon-scan v{}", env!("APP_VERSION_DISPLAY"));
                return None;
            } else if arg == "--count" || arg == "-c" {
                mode = Mode::Count;
            } else if arg == "--regions" {
                draw_regions = true;
            } else if let Some(val) = arg.strip_prefix("--config=") {
                config = Some(val.to_string());
            } else if let Some(val) = arg.strip_prefix("--frames=") {
                frames = Some(val.to_string());
            } else if let Some(val) = arg.strip_prefix("--detector=") {
                detector = Some(val.to_string());
            } else if let Some(val) = arg.strip_prefix("--stride=") {
                match val.parse::<u32>() {
                    Ok(n) if n >= 1 => stride = n,
                    _ => {
                        eprintln!("❌ Invalid stride value: {val} (expected integer >= 1)");
                        return None;
                    }
                }
            } else {
                eprintln!("❌ Unknown argument: {arg}");
                print_help();
                return None;
            }
        }

        let Some(config) = config else {
            eprintln!("❌ Missing required --config=FILE");
            print_help();
            return None;
        };
        let Some(frames) = frames else {
            eprintln!("❌ Missing required --frames=DIR");
            print_help();
            return None;
        };

        Some(Args {
            mode,
            config,
            frames,
            detector,
            stride,
            draw_regions,
        })
    }
}

fn print_help() {
    println!("🔍 Icon Scan - game UI pattern detection");
    println!();
    println!("USAGE:");
    println!("    icon-scan --config=FILE --frames=DIR [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --config=FILE       Detector configuration (TOML)");
    println!("    --frames=DIR        Directory of frame images, scanned in filename order");
    println!("    --count, -c         Count matching frames instead of scanning with overlay");
    println!("    --detector=NAME     Detector to use in count mode (default: first in config)");
    println!("    --stride=N          Sample every Nth frame in count mode (default: 1)");
    println!("    --regions           Also outline each firing detector's search region");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    icon-scan --config=detectors.toml --frames=frames/");
    println!("    icon-scan --config=detectors.toml --frames=frames/ --count --stride=5");
    println!("    icon-scan --config=detectors.toml --frames=frames/ --count --detector=main_skill");
}
