//! colored-regions - print a file with its `#region` blocks colored

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use colored_regions::{Configuration, Decorator, RegionError, RegionScanner, Result, TerminalSink};
use tracing::Level;

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    file: Option<PathBuf>,
    settings: Option<PathBuf>,
    workspace: Option<PathBuf>,
    json: bool,
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(options) = parse_args(&args)? else {
        return Ok(());
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if options.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let path = options
        .file
        .ok_or_else(|| RegionError::Message("no input file (see --help)".to_string()))?;
    let text = fs::read_to_string(&path)?;

    let workspace = match options.workspace {
        Some(dir) => dir,
        None => env::current_dir()?,
    };
    let config = Configuration::load(options.settings.as_deref(), Some(&workspace));
    let scanner = RegionScanner::new(config);
    let regions = scanner.scan(&text);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&regions)?);
        return Ok(());
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let width = crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80);
    let mut decorator = Decorator::new(TerminalSink::new());
    decorator.update(&path.display().to_string(), regions);
    decorator
        .sink()
        .write_document(&mut io::stdout().lock(), &lines, width)?;

    Ok(())
}

/// Parse arguments; `None` means help or version was printed
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" => {
                print_version();
                return Ok(None);
            }
            "--json" => options.json = true,
            "--verbose" | "-v" => options.verbose = true,
            "--config" => options.settings = Some(PathBuf::from(value_of(arg, iter.next())?)),
            "--workspace" => options.workspace = Some(PathBuf::from(value_of(arg, iter.next())?)),
            other if other.starts_with('-') => {
                return Err(RegionError::Message(format!("unknown option: {}", other)));
            }
            file => {
                if options.file.is_some() {
                    return Err(RegionError::Message(format!("unexpected argument: {}", file)));
                }
                options.file = Some(PathBuf::from(file));
            }
        }
    }

    Ok(Some(options))
}

fn value_of<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str> {
    value
        .map(|v| v.as_str())
        .ok_or_else(|| RegionError::Message(format!("{} needs a value", flag)))
}

fn print_usage() {
    println!("colored-regions {} - color #region blocks", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: colored-regions [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  -h, --help            Show this help message");
    println!("  -V, --version         Show version information");
    println!("      --json            Print the color -> spans map as JSON");
    println!("      --config PATH     User settings file (default ~/.colored-regions.toml)");
    println!("      --workspace DIR   Directory whose package.json may override settings");
    println!("  -v, --verbose         Log debug output to stderr");
}

fn print_version() {
    println!("colored-regions {}", env!("CARGO_PKG_VERSION"));
}
