// gridmark/src/main.rs

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use gridmark::annotations::preview;
use gridmark::axis::{parse_count, AxisRange};
use gridmark::{Cell, GridConfigBuilder, MatchTolerance, Parameter, Session};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Characters of a note shown inside a printed grid cell.
const CELL_PREVIEW_LENGTH: usize = 10;

#[derive(Parser, Debug)]
#[command(
    author,
    about = "Plan and annotate parametric laser test grids",
    long_about = None,
    version = env!("GRIDMARK_VERSION")
)]
struct Cli {
    /// Decimal places used when matching saved axis values against regenerated ones
    #[clap(long, global = true, default_value_t = 1)]
    match_decimals: u32,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the grid and a summary of its notes
    Show(ShowOpts),
    /// Set or clear the note of one cell and save the session
    Note(NoteOpts),
    /// Print the summary of a saved session
    Summary(SummaryOpts),
}

#[derive(Args, Debug)]
struct ShowOpts {
    /// Start from a saved session instead of the defaults
    #[clap(long)]
    from: Option<PathBuf>,

    #[clap(flatten)]
    grid: GridOpts,
}

#[derive(Args, Debug)]
struct NoteOpts {
    /// Where to save the session
    #[clap(short, long)]
    output: PathBuf,

    /// Start from a saved session instead of the defaults
    #[clap(long)]
    from: Option<PathBuf>,

    #[clap(flatten)]
    grid: GridOpts,

    /// Tab id: 0 for a single grid, 1 or 2 for the halves of a split grid
    #[clap(long, default_value_t = 0)]
    tab: usize,

    #[clap(long)]
    row: usize,

    /// Column within the tab
    #[clap(long)]
    col: usize,

    /// Note text, an empty string clears the cell
    text: String,
}

#[derive(Args, Debug)]
struct SummaryOpts {
    file: PathBuf,
}

#[derive(Args, Debug)]
struct GridOpts {
    #[clap(long)]
    x_axis: Option<Parameter>,

    #[clap(long)]
    y_axis: Option<Parameter>,

    /// Number of x values (at least 2)
    #[clap(long, value_parser = parse_count)]
    x_count: Option<usize>,

    /// Number of y values (at least 2)
    #[clap(long, value_parser = parse_count)]
    y_count: Option<usize>,

    /// Split the x axis into two tabs
    #[clap(long, action, conflicts_with = "single")]
    split: bool,

    /// Keep the x axis in a single tab
    #[clap(long, action)]
    single: bool,

    /// Parameter range as PARAM=START:END, e.g. "Power=90:10"
    #[clap(long = "range", value_parser = parse_range)]
    ranges: Vec<AxisRange>,

    /// Global setting as KEY=VALUE, e.g. "Passes=2"
    #[clap(long = "global", value_parser = parse_key_value)]
    globals: Vec<(String, String)>,

    #[clap(long)]
    title: Option<String>,
}

fn parse_range(arg: &str) -> anyhow::Result<AxisRange> {
    let (name, bounds) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected PARAM=START:END, got {:?}", arg))?;
    let (start, end) = bounds
        .split_once(':')
        .ok_or_else(|| anyhow!("expected START:END, got {:?}", bounds))?;
    let parameter: Parameter = name.parse()?;
    Ok(AxisRange::parse(parameter, start, end)?)
}

fn parse_key_value(arg: &str) -> anyhow::Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got {:?}", arg))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

fn open_session(
    from: Option<&Path>,
    opts: &GridOpts,
    tolerance: MatchTolerance,
) -> anyhow::Result<Session> {
    let mut session = Session::default().with_tolerance(tolerance);
    if let Some(path) = from {
        let report = session
            .load(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        info!(
            "Restored {} notes from {} ({} skipped)",
            report.restored,
            path.display(),
            report.skipped
        );
        if report.split_fallback {
            warn!("Split requested but the x axis is too short, using a single grid");
        }
    }
    apply_grid_opts(&mut session, opts)?;
    Ok(session)
}

fn apply_grid_opts(session: &mut Session, opts: &GridOpts) -> anyhow::Result<()> {
    let current = session.config();
    let split = if opts.split {
        true
    } else if opts.single {
        false
    } else {
        current.split
    };
    let mut builder = GridConfigBuilder::default();
    builder
        .x_axis(opts.x_axis.unwrap_or(current.x_axis))
        .y_axis(opts.y_axis.unwrap_or(current.y_axis))
        .x_count(opts.x_count.unwrap_or(current.x_count))
        .y_count(opts.y_count.unwrap_or(current.y_count))
        .split(split)
        .ranges(current.ranges.clone());
    for range in &opts.ranges {
        builder.range(*range);
    }
    let config = builder.build()?;

    if &config != session.config() {
        if session.annotation_count() > 0 {
            warn!(
                "Grid settings changed, discarding {} loaded note(s)",
                session.annotation_count()
            );
        }
        session.apply_grid_spec(config)?;
    }

    let globals = session.globals_mut();
    if let Some(title) = &opts.title {
        globals.set_title(title);
    }
    for (key, value) in &opts.globals {
        globals.set_named(key, value)?;
    }
    Ok(())
}

/// Saves the session to `path`. With no notes left there is nothing to write, and the file
/// is left as it was.
fn save_session(session: &Session, path: &Path) -> anyhow::Result<String> {
    if session.annotation_count() == 0 {
        warn!("No notes left, not writing {}", path.display());
        return Ok(format!(
            "No notes left to save, {} was left unchanged",
            path.display()
        ));
    }
    let saved = session
        .save(path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    Ok(format!("Wrote {} notes to {}", saved, path.display()))
}

fn print_grid(session: &Session) {
    let grid = session.grid();
    let y_width = grid
        .y_values()
        .iter()
        .map(|v| v.len())
        .chain([grid.y_parameter().name().len()])
        .max()
        .unwrap_or(0);
    for tab in grid.tabs() {
        if grid.is_split() {
            println!("Grid {}", tab.id);
        }
        let width = tab
            .x_values
            .iter()
            .map(|v| v.len())
            .chain([CELL_PREVIEW_LENGTH + 3])
            .max()
            .unwrap_or(0);
        print!("{:>y_width$}", grid.y_parameter().name());
        for x in &tab.x_values {
            print!(" | {:^width$}", x);
        }
        println!();
        for (row, y) in grid.y_values().iter().enumerate() {
            print!("{:>y_width$}", y);
            for col in 0..tab.x_values.len() {
                let note = session
                    .annotation(Cell::new(tab.id, row, col))
                    .map(|text| preview(text, CELL_PREVIEW_LENGTH))
                    .unwrap_or_default();
                print!(" | {:<width$}", note);
            }
            println!();
        }
        println!("{:>y_width$} -> {}", "", grid.x_parameter());
        println!();
    }
}

fn entrypoint() -> anyhow::Result<()> {
    gridmark::setup_pretty_env_logger();
    let cli = Cli::parse();
    let tolerance = MatchTolerance::new(cli.match_decimals);

    match &cli.command {
        Command::Show(opts) => {
            let session = open_session(opts.from.as_deref(), &opts.grid, tolerance)?;
            print_grid(&session);
            print!("{}", session.summary());
        }
        Command::Note(opts) => {
            let mut session = open_session(opts.from.as_deref(), &opts.grid, tolerance)?;
            let cell = Cell::new(opts.tab, opts.row, opts.col);
            if !session.set_annotation(cell, &opts.text) {
                bail!(
                    "cell (tab {}, row {}, col {}) is not part of the grid",
                    opts.tab,
                    opts.row,
                    opts.col
                );
            }
            println!("{}", save_session(&session, &opts.output)?);
        }
        Command::Summary(opts) => {
            let mut session = Session::default().with_tolerance(tolerance);
            session
                .load(&opts.file)
                .with_context(|| format!("failed to load {}", opts.file.display()))?;
            print!("{}", session.summary());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
