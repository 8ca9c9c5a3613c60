//! Recolor command-line tool
//!
//! Batch recoloring, color utilities and a line-driven edit session.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use recolor_lib::color;
use recolor_lib::output;
use recolor_lib::presets;
use recolor_lib::recolor;
use recolor_lib::{
    BatchJob, BatchProcessor, Color, DominantColorExtractor, EditSession, FsImageStore,
    ImageStore, RecolorParams, RecolorSettings,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

/// Recolor images by replacing a reference color with a target color
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "recolor")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (JSON); flags override its values
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recolor a batch of images into a dated output folder
    Apply(ApplyArgs),
    /// Parse a color and print it as hex and RGB
    Parse {
        /// Hex (#RRGGBB, #RGB, RRGGBB) or decimal triple ("255, 0, 0")
        text: String,
    },
    /// Print the dominant color of an image
    Dominant {
        file: PathBuf,
    },
    /// List the preset target colors
    Palette,
    /// Count the pixels a recolor would touch
    Preview {
        file: PathBuf,
        /// Reference color; defaults to the image's dominant color
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        sensitivity: Option<f32>,
    },
    /// Interactive edit session reading commands from stdin
    Session {
        file: PathBuf,
    },
    /// Write the effective settings to a file
    InitConfig {
        file: PathBuf,
    },
}

#[derive(Args)]
struct ApplyArgs {
    /// Images to recolor
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Target color (hex, decimal triple or preset name)
    #[arg(short, long)]
    target: Option<String>,

    /// Reference color reused for every image
    #[arg(short, long, conflicts_with = "dominant")]
    source: Option<String>,

    /// Use each image's own dominant color as reference
    #[arg(long)]
    dominant: bool,

    /// Blend strength at an exact match (0-1)
    #[arg(short, long)]
    intensity: Option<f32>,

    /// Match radius as a fraction of 255 (0-1, exclusive of 0)
    #[arg(long)]
    sensitivity: Option<f32>,

    /// Worker threads (0 = one per core)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Date for the output folder name (YYYY-MM-DD, default today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Write the batch result as JSON
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

fn parse_date(text: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

/// Codec syntax first, preset name as fallback
fn resolve_color(text: &str) -> Result<Color> {
    match color::parse(text) {
        Ok(c) => Ok(c),
        Err(e) => presets::lookup(text).ok_or(e).context("not a color or preset name"),
    }
}

fn load_settings(path: Option<&Path>) -> Result<RecolorSettings> {
    match path {
        Some(path) => RecolorSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(RecolorSettings::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = recolor_lib::logging::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {:#}", e);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Apply(args) => run_apply(args, settings),
        Command::Parse { text } => {
            let c = color::parse(&text)?;
            println!("{}  rgb({}, {}, {})", c, c.r, c.g, c.b);
            Ok(ExitCode::SUCCESS)
        }
        Command::Dominant { file } => {
            let c = settings.extractor().extract(&file);
            println!("{}", c);
            Ok(ExitCode::SUCCESS)
        }
        Command::Palette => {
            for (name, c) in presets::presets() {
                println!("{:<18} {}", name, c);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Preview { file, source, sensitivity } => {
            run_preview(&file, source.as_deref(), sensitivity, settings)
        }
        Command::Session { file } => run_session(&file, settings),
        Command::InitConfig { file } => {
            settings
                .save(&file)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            println!("Wrote {}", file.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// BATCH
// ============================================================================

fn run_apply(args: ApplyArgs, mut settings: RecolorSettings) -> Result<ExitCode> {
    if let Some(target) = &args.target {
        settings.target = resolve_color(target)?;
    }
    if let Some(source) = &args.source {
        settings.source = Some(resolve_color(source)?);
    }
    if args.dominant {
        settings.source = None;
    }
    if let Some(intensity) = args.intensity {
        settings.intensity = intensity;
    }
    if let Some(sensitivity) = args.sensitivity {
        settings.sensitivity = sensitivity;
    }
    if let Some(workers) = args.workers {
        settings.workers = workers;
    }

    let params = settings.params()?;
    let mut job = BatchJob::new(args.files, params, settings.reference_policy());
    if let Some(date) = args.date {
        job = job.with_date(date);
    }

    let store = FsImageStore;
    let extractor = settings.extractor();
    let result = BatchProcessor::new(&store, &extractor)
        .with_workers(settings.workers)
        .run(&job)?;

    for path in &result.saved {
        println!("{}", path.display());
    }
    for failure in &result.failures {
        eprintln!("FAILED {}: {}", failure.path.display(), failure.message);
    }
    info!(
        succeeded = result.succeeded,
        failed = result.failed,
        skipped = result.skipped,
        "Batch finished"
    );

    if let Some(report) = &args.report {
        let json = serde_json::to_string_pretty(&result)?;
        fs::write(report, json)
            .with_context(|| format!("Failed to write report {}", report.display()))?;
    }

    Ok(if result.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_preview(
    file: &Path,
    source: Option<&str>,
    sensitivity: Option<f32>,
    mut settings: RecolorSettings,
) -> Result<ExitCode> {
    if let Some(s) = sensitivity {
        settings.sensitivity = s;
    }
    let params = settings.params()?;
    let img = FsImageStore.load(file)?;

    let reference = match source {
        Some(text) => resolve_color(text)?,
        None => settings
            .source
            .unwrap_or_else(|| settings.extractor().extract(file)),
    };

    let matched = recolor::count_matches(&img, reference, &params);
    let total = img.width() as usize * img.height() as usize;
    let share = if total == 0 { 0.0 } else { matched as f64 * 100.0 / total as f64 };
    println!("reference {}", reference);
    println!("{} of {} pixels match ({:.1}%)", matched, total, share);
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// EDIT SESSION
// ============================================================================

const SESSION_HELP: &str = "\
commands:
  target <color>        set the target color (hex, triple or preset)
  source <color>        set the reference color; 'dominant' clears it
  pick <x> <y>          use the current image's pixel as reference
  intensity <0-1>       blend strength
  sensitivity <0-1>     match radius
  apply                 recolor the original with the current settings
  undo | redo | reset   move through history
  save                  write the current image to the output folder
  status                show settings and history position
  quit                  leave the session";

enum Flow {
    Continue,
    Quit,
}

struct SessionShell {
    session: EditSession,
    store: FsImageStore,
    target: Color,
    intensity: f32,
    sensitivity: f32,
}

impl SessionShell {
    fn params(&self) -> Result<RecolorParams> {
        Ok(RecolorParams::new(self.target, self.intensity, self.sensitivity)?)
    }

    fn status(&self) {
        let history = self.session.history();
        println!(
            "target {}  reference {}{}  intensity {:.2}  sensitivity {:.2}  history {}/{}",
            self.target,
            self.session.reference(),
            if self.session.source().is_some() { "" } else { " (dominant)" },
            self.intensity,
            self.sensitivity,
            history.cursor() + 1,
            history.len()
        );
    }

    fn execute(&mut self, command: &str, args: &[&str]) -> Result<Flow> {
        debug!(command, ?args, "Session command");
        match command {
            "target" => {
                self.target = resolve_color(&args.join(" "))?;
                println!("target {}", self.target);
            }
            "source" => {
                let text = args.join(" ");
                if text.eq_ignore_ascii_case("dominant") || text.eq_ignore_ascii_case("none") {
                    self.session.set_source(None);
                } else {
                    self.session.set_source(Some(resolve_color(&text)?));
                }
                println!("reference {}", self.session.reference());
            }
            "pick" => {
                let [x, y] = args else {
                    bail!("usage: pick <x> <y>");
                };
                let x: u32 = x.parse().context("x must be a pixel column")?;
                let y: u32 = y.parse().context("y must be a pixel row")?;
                let picked = self.session.pick_source(x, y)?;
                println!("reference {}", picked);
            }
            "intensity" => {
                let value: f32 = single(args)?.parse().context("intensity must be a number")?;
                RecolorParams::new(self.target, value, self.sensitivity)?;
                self.intensity = value;
            }
            "sensitivity" => {
                let value: f32 = single(args)?.parse().context("sensitivity must be a number")?;
                RecolorParams::new(self.target, self.intensity, value)?;
                self.sensitivity = value;
            }
            "apply" => {
                let params = self.params()?;
                let matched =
                    recolor::count_matches(self.session.original(), self.session.reference(), &params);
                self.session.apply(&params);
                println!("applied, {} pixels matched", matched);
            }
            "undo" => {
                if !self.session.undo() {
                    println!("nothing to undo");
                }
            }
            "redo" => {
                if !self.session.redo() {
                    println!("nothing to redo");
                }
            }
            "reset" => self.session.reset_to_original(),
            "save" => {
                let path = self.session.save(&self.store, self.target, output::today())?;
                println!("saved {}", path.display());
            }
            "status" => self.status(),
            "help" | "?" => println!("{}", SESSION_HELP),
            "quit" | "exit" => return Ok(Flow::Quit),
            other => bail!("unknown command '{}', try 'help'", other),
        }
        Ok(Flow::Continue)
    }
}

fn single<'a>(args: &[&'a str]) -> Result<&'a str> {
    match args {
        [value] => Ok(*value),
        _ => bail!("expected exactly one value"),
    }
}

fn run_session(file: &Path, settings: RecolorSettings) -> Result<ExitCode> {
    let store = FsImageStore;
    let extractor = settings.extractor();
    let mut session = EditSession::open(file, &store, &extractor, settings.history_limit)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    session.set_source(settings.source);

    let mut shell = SessionShell {
        session,
        store,
        target: settings.target,
        intensity: settings.intensity,
        sensitivity: settings.sensitivity,
    };
    shell.params()?;
    shell.status();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = words.split_first() else {
            continue;
        };
        match shell.execute(command, args) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("error: {:#}", e),
        }
    }
    Ok(ExitCode::SUCCESS)
}
