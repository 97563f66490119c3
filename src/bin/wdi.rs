/// Command line WDI image inspector

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process::ExitCode;

use wdinspect::{
    track_listing, CylinderOption, DataMode, Diagnostics, DriveParameters, Geometry,
    ParseOptions, TrackRecord, VerifyMode, WdiError, WdiHeader, WdiParser,
};

/// Inspects a Winchesterduino disk image
#[derive(Parser, Debug)]
#[command(name = "wdi", version, about)]
struct Args {
    /// WDI image to inspect
    image: PathBuf,

    /// Print detailed sector ID information per track
    #[arg(short = 't')]
    tracks: bool,

    /// Print detailed parse error information, if any
    #[arg(short = 'e')]
    errors: bool,

    /// Create a binary (raw) disk image
    #[arg(short = 'b', value_name = "IMAGE")]
    binary: Option<PathBuf>,

    /// Reorder sectors in the binary image to 1:1 interleave
    #[arg(short = '1')]
    reinterleave: bool,

    /// Align missing sectors and unreadable tracks in the binary image with bad block fill
    #[arg(short = 'a')]
    align: bool,

    /// Expected sectors per track when aligning (1-63), prompted if omitted
    #[arg(long)]
    spt: Option<u8>,

    /// Expected sector size when aligning (128, 256, 512, 1024), prompted if omitted
    #[arg(long)]
    sector_size: Option<usize>,

    /// Bad block fill byte, decimal or 0x prefixed hex
    #[arg(long, default_value = "0", value_parser = parse_byte)]
    fill: u8,
}

fn parse_byte(value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid fill byte '{}': {}", value, e))
}

/// Prints diagnostics to the console
struct Console;

impl Diagnostics for Console {
    fn track(&mut self, track: &TrackRecord) {
        for line in track_listing(track) {
            println!("{}", line);
        }
        println!();
    }

    fn error(&mut self, error: &WdiError) {
        println!("{}", error);
    }
}

/// Ask until the answer is a number within `min..=max`
fn ask_range(rl: &mut DefaultEditor, prompt: &str, min: u8, max: u8) -> Result<u8, ReadlineError> {
    loop {
        let line = rl.readline(prompt)?;
        if let Ok(value) = line.trim().parse::<u8>() {
            if (min..=max).contains(&value) {
                return Ok(value);
            }
        }
    }
}

/// Ask until the answer is a single character from `keys`
fn ask_key(rl: &mut DefaultEditor, prompt: &str, keys: &str) -> Result<char, ReadlineError> {
    loop {
        let line = rl.readline(prompt)?;
        let mut chars = line.trim().chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            let key = key.to_ascii_uppercase();
            if keys.contains(key) {
                return Ok(key);
            }
        }
    }
}

/// Expected track geometry from the command line, or asked for interactively
fn expected_geometry(args: &Args) -> Result<Geometry, String> {
    if let (Some(spt), Some(size)) = (args.spt, args.sector_size) {
        return Geometry::new(spt, size).map_err(|e| e.to_string());
    }

    let mut rl = DefaultEditor::new().map_err(|e| e.to_string())?;
    println!("Align option (-a) for output binary image specified. Enter expected track geometry:");

    let spt = match args.spt {
        Some(spt) => spt,
        None => ask_range(&mut rl, "Expected sectors per track (1-63): ", 1, 63)
            .map_err(|e| e.to_string())?,
    };
    let size = match args.sector_size {
        Some(size) => size,
        None => {
            let key = ask_key(&mut rl, "Expected sector size (1)28 (2)56 (5)12 1(K)bytes: ", "125K")
                .map_err(|e| e.to_string())?;
            match key {
                '1' => 128,
                '2' => 256,
                '5' => 512,
                _ => 1024,
            }
        }
    };
    println!();

    Geometry::new(spt, size).map_err(|e| e.to_string())
}

/// Range checks on the decoded drive parameters
fn parameter_errors(params: &DriveParameters) -> Vec<String> {
    let mut errors = Vec::new();
    let cylinders = params.cylinders;

    if let DataMode::Other(_) = params.data_mode {
        errors.push("Data encoding mode must be 0 or 1".to_string());
    }
    if let VerifyMode::Other(_) = params.verify_mode {
        errors.push("Data verify mode must be 0 to 2".to_string());
    }
    if !(1..=2048).contains(&cylinders) {
        errors.push("Number of cylinders must be 1 to 2048".to_string());
    }
    if !(1..=16).contains(&params.heads) {
        errors.push("Number of heads must be 1 to 16".to_string());
    }
    for (name, option) in [
        ("Write precomp start cylinder", params.write_precomp),
        ("RWC start cylinder", params.reduced_write_current),
        ("Landing zone start cylinder", params.landing_zone),
    ] {
        if option.cylinder > 2047 {
            errors.push(format!("{} must be within 0 to 2047", name));
        }
    }
    if params.partial_image > 1 {
        errors.push("Partial image flag must be 0 or 1".to_string());
    }

    let last = cylinders.clamp(1, 2048) - 1;
    if params.partial_start_cylinder > last {
        errors.push(format!("Partial image start cylinder must be within 0 to {}", last));
    }
    if params.partial_end_cylinder > last {
        errors.push(format!("Partial image end cylinder must be within 0 to {}", last));
    }
    if params.partial_start_cylinder > params.partial_end_cylinder {
        errors.push(
            "Partial image start cylinder must not be greater than the end cylinder".to_string(),
        );
    }

    errors
}

fn print_header(header: &WdiHeader) {
    let params = &header.params;

    if !header.description.is_empty() {
        println!("Disk image description:");
        println!("{}", header.description);
    }

    println!("Drive parameters:\n");
    println!("Data separator mode:\t{}", params.data_mode);
    println!("Data verify mode:\t{}", params.verify_mode);
    print!("Cylinders:\t\t{}", params.cylinders);
    if params.is_partial() {
        if params.partial_start_cylinder == params.partial_end_cylinder {
            println!(
                " (this is a partial image of cylinder {} only)",
                params.partial_start_cylinder
            );
        } else {
            println!(
                " (this is a partial image of cylinders {} to {} only)",
                params.partial_start_cylinder, params.partial_end_cylinder
            );
        }
    } else {
        println!();
    }
    println!("Heads:\t\t\t{}", params.heads);

    let describe = |option: CylinderOption| {
        if option.is_enabled() {
            format!("enabled, from cylinder {}", option.cylinder)
        } else {
            "disabled".to_string()
        }
    };
    println!("Reduced write current:\t{}", describe(params.reduced_write_current));
    println!("Write precompensation:\t{}", describe(params.write_precomp));
    println!(
        "Autopark on powerdown:\t{}",
        if params.landing_zone.is_enabled() { "no" } else { "yes" }
    );
    if params.landing_zone.is_enabled() {
        println!("Landing zone cylinder:\t{}", params.landing_zone.cylinder);
    }
    println!("Drive seeking mode:\t{}", params.seek_type);
    println!();
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.binary.as_ref() == Some(&args.image) {
        println!("Really?");
        return ExitCode::FAILURE;
    }

    let mut parser = match WdiParser::open(&args.image, args.binary.as_deref()) {
        Ok(parser) => parser,
        Err(e) => {
            println!("Cannot open supplied file(s).");
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let header = match parser.read_header() {
        Ok(header) => header,
        Err(e) => {
            println!("Invalid WDI file specified.");
            if args.errors {
                println!("{}", e);
            }
            return ExitCode::FAILURE;
        }
    };

    let errors = parameter_errors(&header.params);
    if !errors.is_empty() {
        println!("Invalid disk drive parameters detected in WDI file:\n");
        for error in errors {
            println!("{}", error);
        }
        return ExitCode::FAILURE;
    }
    print_header(&header);

    let expected_geometry = if args.align && parser.has_output() {
        match expected_geometry(&args) {
            Ok(geometry) => Some(geometry),
            Err(e) => {
                println!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    let options = ParseOptions {
        verbose_errors: args.errors,
        verbose_track_listing: args.tracks,
        reinterleave: args.reinterleave,
        align: args.align,
        expected_geometry,
        fill_byte: args.fill,
    };

    let summary = match parser.parse_with(&options, &mut Console) {
        Ok(summary) => summary,
        Err(WdiError::Write(e)) => {
            println!("Error writing binary disk image: {}", e);
            return ExitCode::FAILURE;
        }
        Err(_) => {
            println!("Track/sector data fields contain invalid or incomplete values (was transfer aborted?)");
            if !args.errors {
                println!("Use the -e command line argument to display error details.");
            }
            return ExitCode::FAILURE;
        }
    };

    println!("Disk image checks passed. The hard drive contained:");
    println!("{} bad block(s),", summary.bad_blocks);
    println!("{} unreadable track(s),", summary.unreadable_tracks);
    println!("{} CRC/ECC error(s).", summary.data_errors);
    if !args.tracks {
        println!("Specify the -t command line argument to display detailed sector layout of each track.");
    }
    if parser.has_output() {
        if options.reinterleave || options.align {
            println!("Creating raw disk image (reinterleave to 1:1).");
        } else {
            println!("Creating raw disk image (original interleave).");
        }
    } else {
        println!("You can also use the -b argument to generate a binary (raw) disk image.");
    }
    if header.params.is_partial() {
        println!("Warning: this is a partial disk image. See above cylinder range for details.");
    }

    println!("\nProcessing done");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_byte() {
        assert_eq!(parse_byte("0"), Ok(0));
        assert_eq!(parse_byte("0xF6"), Ok(0xF6));
        assert_eq!(parse_byte("229"), Ok(229));
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("0xZZ").is_err());
    }

    #[test]
    fn test_default_parameters_pass_range_checks() {
        assert!(parameter_errors(&DriveParameters::default()).is_empty());
    }

    #[test]
    fn test_parameter_range_errors() {
        let params = DriveParameters {
            heads: 0,
            cylinders: 100,
            partial_image: 1,
            partial_start_cylinder: 50,
            partial_end_cylinder: 20,
            ..Default::default()
        };
        let errors = parameter_errors(&params);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("heads"));
        assert!(errors[1].contains("greater than the end"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["wdi", "disk.wdi", "-t", "-b", "disk.img", "-1", "--fill", "0xE5"]).unwrap();
        assert!(args.tracks);
        assert!(args.reinterleave);
        assert!(!args.align);
        assert_eq!(args.binary, Some(PathBuf::from("disk.img")));
        assert_eq!(args.fill, 0xE5);
    }
}
