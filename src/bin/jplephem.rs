//! `jplephem` command line: inspect, excerpt and sample SPK kernels.

use std::io;
use std::process::ExitCode;
use std::str::FromStr;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jplephem::daf::Daf;
use jplephem::spk::excerpt::write_excerpt;
use jplephem::spk::Spk;
use jplephem::time::parse_date;
use jplephem::{EphemError, Kernel, Result, TargetId};

#[derive(Parser, Debug)]
#[command(name = "jplephem", version)]
#[command(about = "Describe, excerpt and evaluate JPL SPK ephemeris kernels")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a file's comment blocks
    Comment {
        /// Path to a SPICE file
        path: Utf8PathBuf,
    },

    /// List a file's raw segment descriptors
    Daf {
        /// Path to a SPICE file
        path: Utf8PathBuf,
    },

    /// List the segments in an SPK file
    Spk {
        /// Path to a .bsp SPICE kernel file
        path: Utf8PathBuf,

        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Create an SPK covering a narrower range of dates
    Excerpt {
        /// Comma-separated target codes to include
        #[arg(long, value_delimiter = ',')]
        targets: Option<Vec<i32>>,

        /// Start date yyyy/mm/dd
        start_date: DateArg,

        /// End date yyyy/mm/dd
        end_date: DateArg,

        /// Local filename of the kernel to cut
        input_path: Utf8PathBuf,

        /// Output file to create
        output_path: Utf8PathBuf,
    },

    /// Print the state of a body on a uniform date grid, as CSV
    States {
        /// Path to a .bsp SPICE kernel file
        path: Utf8PathBuf,

        /// NAIF code or body name (e.g. 499, "mars", "geocentric moon")
        target: String,

        #[arg(long)]
        start: DateArg,

        #[arg(long)]
        stop: DateArg,

        #[arg(long = "step-days", default_value_t = 1.0)]
        step_days: f64,

        /// Output AU and AU/day instead of km and km/s
        #[arg(long, default_value_t = false)]
        au: bool,
    },
}

/// A calendar date as typed, with its Julian date.
#[derive(Debug, Clone)]
struct DateArg {
    text: String,
    jd: f64,
}

impl FromStr for DateArg {
    type Err = EphemError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(DateArg {
            text: s.to_string(),
            jd: parse_date(s)?,
        })
    }
}

fn comment(path: &Utf8PathBuf) -> Result<Vec<String>> {
    Ok(vec![Daf::open(path)?.comments()?])
}

fn daf_segments(path: &Utf8PathBuf) -> Result<Vec<String>> {
    let daf = Daf::open(path)?;
    Ok(daf
        .summaries()?
        .iter()
        .enumerate()
        .map(|(i, summary)| {
            let values = summary
                .doubles
                .iter()
                .map(|v| format!("{v:?}"))
                .chain(summary.integers.iter().map(i32::to_string))
                .join(" ");
            format!("{:2} {} {}", i + 1, summary.name, values)
        })
        .collect())
}

fn spk_segments(path: &Utf8PathBuf, verbose: bool) -> Result<Vec<String>> {
    let spk = Spk::new(Daf::open(path)?)?;
    Ok(vec![spk.describe(verbose)])
}

fn excerpt(
    targets: Option<&[i32]>,
    start: &DateArg,
    end: &DateArg,
    input: &Utf8PathBuf,
    output: &Utf8PathBuf,
) -> Result<Vec<String>> {
    let mut lines: Vec<String> = [start, end]
        .iter()
        .map(|date| format!("Date {:10} = JD {:?}", date.text, date.jd))
        .collect();

    let spk = Spk::new(Daf::open(input)?)?;
    write_excerpt(&spk, output, start.jd, end.jd, targets)?;
    info!(%output, "excerpt written");

    lines.push(format!(
        "\n'{output}' written successfully with the following contents\n"
    ));
    lines.push(Spk::new(Daf::open(output)?)?.to_string());
    Ok(lines)
}

/// Rows `states` prints at most.
const MAX_GRID_POINTS: usize = 10_000_000;

fn states(
    path: &Utf8PathBuf,
    target: &str,
    start: &DateArg,
    stop: &DateArg,
    step_days: f64,
    au: bool,
) -> Result<()> {
    if step_days.is_nan() || step_days <= 0.0 || start.jd > stop.jd {
        return Err(EphemError::InvalidDate(format!(
            "need start <= stop and a positive step, got {} .. {} by {step_days}",
            start.text, stop.text
        )));
    }
    let span = ((stop.jd - start.jd) / step_days + 1e-9).floor();
    if span.is_nan() || span >= MAX_GRID_POINTS as f64 {
        return Err(EphemError::InvalidDate(format!(
            "{} .. {} by {step_days} days needs more than {MAX_GRID_POINTS} rows",
            start.text, stop.text
        )));
    }
    let count = span as usize + 1;
    let kernel = Kernel::open(path)?;
    let times: Vec<f64> = (0..count)
        .map(|i| jplephem::constants::jd_to_seconds(start.jd + i as f64 * step_days))
        .collect();
    let states = kernel.positions_and_velocities(TargetId::from(target), &times)?;

    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    for (t, state) in times.iter().zip(states) {
        let state = if au { state.to_au() } else { state };
        writer.serialize(state.to_row(*t))?;
    }
    writer.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let lines = match &cli.command {
        Command::Comment { path } => comment(path)?,
        Command::Daf { path } => daf_segments(path)?,
        Command::Spk { path, verbose } => spk_segments(path, *verbose)?,
        Command::Excerpt {
            targets,
            start_date,
            end_date,
            input_path,
            output_path,
        } => excerpt(
            targets.as_deref(),
            start_date,
            end_date,
            input_path,
            output_path,
        )?,
        Command::States {
            path,
            target,
            start,
            stop,
            step_days,
            au,
        } => return states(path, target, start, stop, *step_days, *au),
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jplephem=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("jplephem: {err}");
            ExitCode::FAILURE
        }
    }
}
