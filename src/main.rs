// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gpa_ledger::{load_selections, Config, GpaLedger};

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Ui,
    Report,
    Batch(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
struct Options {
    mode: Mode,
    data_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options {
        mode: Mode::Ui,
        data_dir: None,
        config: None,
        json: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--data-dir" => {
                let dir = iter.next().context("--data-dir needs a directory")?;
                options.data_dir = Some(PathBuf::from(dir));
            }
            "--config" => {
                let file = iter.next().context("--config needs a file")?;
                options.config = Some(PathBuf::from(file));
            }
            "--json" => options.json = true,
            "ui" | "tui" => options.mode = Mode::Ui,
            "report" => options.mode = Mode::Report,
            "batch" => {
                let file = iter.next().context("batch needs a selections CSV")?;
                options.mode = Mode::Batch(PathBuf::from(file));
            }
            other => bail!("unknown argument: {}", other),
        }
    }

    if options.data_dir.is_some() && options.config.is_some() {
        bail!("use either --data-dir or --config, not both");
    }

    Ok(options)
}

fn init_logging(mode: &Mode) {
    // The TUI owns the terminal, so keep it quiet unless RUST_LOG asks otherwise
    let default_level = match mode {
        Mode::Ui => LevelFilter::WARN,
        _ => LevelFilter::INFO,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let fmt = fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(fmt)
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args)?;

    init_logging(&options.mode);

    let config = match (&options.config, &options.data_dir) {
        (Some(file), _) => Config::from_file(file)?,
        (None, Some(dir)) => Config::from_data_dir(dir),
        (None, None) => Config::default(),
    };

    // Reference data must load completely before anything else is usable
    let ledger = GpaLedger::load(&config).context("Failed to load grade reference data")?;

    match options.mode {
        Mode::Ui => run_ui_mode(ledger),
        Mode::Report => run_report(&ledger, options.json),
        Mode::Batch(path) => run_batch(ledger, &path, options.json),
    }
}

fn run_report(ledger: &GpaLedger, json: bool) -> Result<()> {
    if json {
        let body = serde_json::json!({
            "grades": ledger.grade_scale().views(),
            "semesters": ledger
                .semesters()
                .map(|record| serde_json::json!({
                    "semester": record.id(),
                    "modules": record.catalog().views(),
                }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("Grades");
    for (grade, points) in ledger.grade_scale().iter() {
        println!("  {:<6} {:.2}", grade, points);
    }
    for record in ledger.semesters() {
        println!("\n{}", record.id());
        for (module, credits) in record.catalog().iter() {
            println!("  {:<50} {}", module, credits);
        }
    }

    Ok(())
}

fn run_batch(mut ledger: GpaLedger, path: &Path, json: bool) -> Result<()> {
    let selections = load_selections(path)
        .with_context(|| format!("Failed to load selections from {:?}", path))?;

    let outcome = ledger.apply_selections(&selections);
    tracing::info!(
        accepted = outcome.accepted,
        duplicates = outcome.duplicates,
        rejected = outcome.rejected.len(),
        "batch applied"
    );

    let summary = ledger.overall_summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(ledger: GpaLedger) -> Result<()> {
    let mut app = ui::App::new(ledger);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_ledger: GpaLedger) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or run: gpa-ledger batch <selections.csv>");
    std::process::exit(1);
}
