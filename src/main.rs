use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use fio_photo_match::batch::{process, BatchObserver, BatchOptions, BatchWarning};
use fio_photo_match::config::{parse_exts, MatchConfig};
use fio_photo_match::input::{load_names, InputOptions, DEFAULT_COLUMN};
use fio_photo_match::report::write_reports;
use fio_photo_match::search::FsLister;
use fio_photo_match::{SubstitutionMap, DEFAULT_MAX_SUBS};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

const DEFAULT_OUT_DIR: &str = "output";

#[derive(Parser, Debug)]
#[command(
    name = "fio-photo-match",
    version,
    about = "Find the photo of each person in a name list"
)]
struct Cli {
    /// Name list: CSV export of the spreadsheet, or a text file with one name per line
    #[arg(long)]
    names: PathBuf,

    /// Folder containing the photos
    #[arg(long)]
    photos: PathBuf,

    /// Directory receiving matched.csv, unmatched.csv and report.json
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// CSV column holding the full names
    #[arg(long, default_value = DEFAULT_COLUMN)]
    column: String,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Maximum number of substituted letters per variant
    #[arg(long, default_value_t = DEFAULT_MAX_SUBS)]
    max_subs: usize,

    /// Photo extensions, comma-separated
    #[arg(long, default_value = "jpg,jpeg,png")]
    exts: String,

    /// JSON object replacing the built-in letter substitutions
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Search names in parallel
    #[arg(long, action = ArgAction::SetTrue)]
    parallel: bool,

    /// Log one line per name
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Write debug logs to <out-dir>/fio-photo-match.log
    #[arg(long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Explicit log file path (enables file logging). Ignored if empty.
    #[arg(long, default_value = "")]
    log_file: String,
}

/// Forwards batch output to the logger and the progress bar.
struct CliObserver {
    pb: ProgressBar,
}

impl BatchObserver for CliObserver {
    fn log(&self, line: &str) {
        self.pb.suspend(|| info!("{line}"));
    }

    fn progress(&self, done: usize, _total: usize) {
        self.pb.set_position(done as u64);
    }
}

fn init_logging(cli: &Cli) {
    if cli.debug || !cli.log_file.is_empty() {
        let log_path = if !cli.log_file.is_empty() {
            PathBuf::from(&cli.log_file)
        } else {
            cli.out_dir.join("fio-photo-match.log")
        };
        if let Some(parent) = log_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("[warn] cannot create log directory {:?}: {e}", parent);
            }
        }
        match fs::File::create(&log_path) {
            Ok(file) => {
                let cfg = ConfigBuilder::new()
                    .set_time_format_rfc3339()
                    .set_target_level(LevelFilter::Off)
                    .build();
                if let Err(e) = WriteLogger::init(LevelFilter::Debug, cfg, file) {
                    eprintln!("[warn] file logger init failed: {e}");
                } else {
                    println!("[debug] logs → {:?}", log_path);
                }
                return;
            }
            Err(e) => {
                eprintln!("[warn] cannot create log file {:?}: {e}", log_path);
            }
        }
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn build_config(cli: &Cli) -> Result<MatchConfig> {
    let mut config = MatchConfig {
        max_subs: cli.max_subs,
        ..MatchConfig::default()
    };
    if let Some(exts) = parse_exts(&cli.exts) {
        config.extensions = exts;
    }
    if let Some(path) = &cli.mapping {
        config.mapping = SubstitutionMap::from_json_file(path)?;
        debug!("loaded {} substitutions from {:?}", config.mapping.len(), path);
    }
    config.validate()?;
    Ok(config)
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("Delimiter {delimiter:?} must be an ASCII character"))
}

fn run(cli: Cli) -> Result<()> {
    init_logging(&cli);
    let config = build_config(&cli)?;
    let input = InputOptions {
        column: cli.column.clone(),
        delimiter: delimiter_byte(cli.delimiter)?,
    };
    let names = load_names(&cli.names, &input)
        .with_context(|| format!("Loading names from {:?}", &cli.names))?;
    info!("{} names loaded from {:?}", names.len(), &cli.names);

    let started = Instant::now();
    let pb = ProgressBar::new(names.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("progress bar template")?,
    );
    let observer = CliObserver { pb: pb.clone() };
    let options = BatchOptions {
        verbose: cli.verbose,
        parallel: cli.parallel,
    };
    let report = process(&names, &cli.photos, &config, &FsLister, &options, &observer);
    pb.finish_and_clear();
    debug!("batch took {} ms", started.elapsed().as_millis());

    for warning in &report.warnings {
        match warning {
            BatchWarning::EmptyInputList => info!("{warning}"),
            BatchWarning::FolderMissing { .. } => warn!("{warning}"),
        }
    }

    let written = write_reports(&cli.out_dir, &report, &cli.photos)
        .with_context(|| format!("Writing reports to {:?}", &cli.out_dir))?;
    for line in report.summary_lines() {
        println!("{line}");
    }
    println!("Reports written to {}", display_dir(&cli.out_dir));
    debug!("matched rows: {:?}", written.matched_csv);
    debug!("unmatched rows: {:?}", written.unmatched_csv);
    debug!("json report: {:?}", written.json);
    Ok(())
}

fn display_dir(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn main() -> Result<()> {
    run(Cli::parse())
}
