//! Cohort - A youth-program records explorer with TUI

mod config;
mod headless;
mod logging;
#[cfg(feature = "tui")]
mod tui;

use anyhow::{Result, anyhow, bail};
use cohort_core::Session;
use headless::Query;
use std::env;
use std::io::Write as _;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: cohort [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet to open (.xlsx, .xls, .csv)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <PATH>       Export the filtered records (non-interactive)");
    eprintln!("  --list                    Print the filtered, sorted records");
    eprintln!("  --stats                   Print dataset statistics");
    eprintln!("  --filter <FIELD=VALUE>    Keep records with this value (can be repeated)");
    eprintln!("  --search <TEXT>           Keep records containing TEXT");
    eprintln!("  --age <MIN:MAX>           Keep ages in range (either side may be blank)");
    eprintln!("  --sort <FIELD[:desc]>     Sort column and direction");
    eprintln!("  --config <FILE>           Load settings from TOML file");
    eprintln!("  --log-level <LEVEL>       Log filter (e.g. debug, cohort_core=trace)");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    list: bool,
    stats: bool,
    query: Query,
    config: Option<PathBuf>,
    log_level: Option<String>,
}

impl Options {
    fn is_headless(&self) -> bool {
        self.output.is_some() || self.list || self.stats
    }
}

#[derive(Debug, PartialEq)]
enum Parsed {
    Help,
    Run(Options),
}

fn parse_args(args: &[String]) -> Result<Parsed> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Parsed::Help),
            "-o" | "--output" => {
                options.output = Some(PathBuf::from(value(args, &mut i, "a path")?));
            }
            "--list" => options.list = true,
            "--stats" => options.stats = true,
            "--filter" => {
                let filter = Query::parse_filter(value(args, &mut i, "FIELD=VALUE")?)?;
                options.query.filters.push(filter);
            }
            "--search" => {
                options.query.search = Some(value(args, &mut i, "a value")?.to_string());
            }
            "--age" => {
                options.query.age = Some(Query::parse_age(value(args, &mut i, "MIN:MAX")?)?);
            }
            "--sort" => {
                options.query.sort = Some(Query::parse_sort(value(args, &mut i, "a field")?)?);
            }
            "--config" => {
                options.config = Some(PathBuf::from(value(args, &mut i, "a file path")?));
            }
            "--log-level" => {
                options.log_level = Some(value(args, &mut i, "a value")?.to_string());
            }
            arg if arg.starts_with('-') => bail!("Unknown option: {}", arg),
            arg => {
                if options.file.is_some() {
                    bail!("Unexpected argument: {}", arg);
                }
                options.file = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }
    Ok(Parsed::Run(options))
}

/// Advance past a flag and return its value.
fn value<'a>(args: &'a [String], i: &mut usize, what: &str) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(v) => Ok(v.as_str()),
        None => bail!("{} requires {}", flag, what),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Ok(Parsed::Help) => {
            print_usage();
            return;
        }
        Ok(Parsed::Run(options)) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(options: Options) -> Result<()> {
    let (config, warnings) = config::load_config(options.config.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let _log_guard = match logging::init(options.log_level.as_deref(), &config.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };

    let mut session = Session::new();
    if let Some(path) = &options.file {
        session
            .load_file(path)
            .map_err(|e| anyhow!("Failed to load {}: {}", path.display(), e))?;
    }
    options.query.apply(&mut session);

    if options.is_headless() {
        if options.file.is_none() {
            bail!("--output, --list and --stats need an input file");
        }
        return run_headless(&session, &options, &config);
    }

    run_interactive(session, config)
}

fn run_headless(session: &Session, options: &Options, config: &config::Config) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if options.stats {
        headless::print_stats(session, &mut stdout)?;
    }
    if options.list {
        headless::print_list(session, &mut stdout)?;
    }
    if let Some(target) = &options.output {
        let (path, records) = headless::export_to(session, target, config)?;
        writeln!(stdout, "Exported {} records to {}", records, path.display())?;
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_interactive(session: Session, config: config::Config) -> Result<()> {
    let mut app = tui::App::new(session, config);
    tui::run(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_interactive(_session: Session, _config: config::Config) -> Result<()> {
    bail!("built without the terminal UI; use --output, --list or --stats")
}
