use clap::{Parser, Subcommand};
use geotagger::track::TrackSummary;
use geotagger::{Geotagger, OverwriteDecision};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "geotagger")]
#[command(version)]
#[command(about = "Write GPS positions from a GPX track into photos, matched by capture time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Geotag every JPEG and ARW photo in a folder
    Tag {
        /// Folder with the photos (not searched recursively)
        folder: PathBuf,
        /// GPX track log recorded while the photos were taken
        track: PathBuf,
        /// Offset added to the camera clock, as [+-]H:MM (e.g. -1:30)
        #[arg(short, long, default_value = "0:00", allow_hyphen_values = true)]
        correction: String,
        /// exiftool executable, needed for raw files
        #[arg(long, env = "GEOTAGGER_EXIFTOOL")]
        exiftool: Option<PathBuf>,
        /// Overwrite existing coordinates without asking
        #[arg(short, long, conflicts_with = "skip_existing")]
        yes: bool,
        /// Keep existing coordinates without asking
        #[arg(long)]
        skip_existing: bool,
    },
    /// Print a summary of a GPX track as JSON
    TrackInfo {
        /// GPX track log
        track: PathBuf,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Tag {
            folder,
            track,
            correction,
            exiftool,
            yes,
            skip_existing,
        } => tag(&folder, &track, correction, exiftool, yes, skip_existing),
        Commands::TrackInfo { track } => track_info(&track),
    }
}

fn tag(
    folder: &Path,
    track: &Path,
    correction: String,
    exiftool: Option<PathBuf>,
    yes: bool,
    skip_existing: bool,
) -> color_eyre::Result<()> {
    let geotagger = Geotagger::builder()
        .maybe_exiftool_path(exiftool)
        .time_correction(correction)
        .build();

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}%")?
            .progress_chars("#>-"),
    );

    let mut confirm = |file_name: &str| {
        if yes {
            OverwriteDecision::OverwriteAll
        } else if skip_existing {
            OverwriteDecision::SkipAll
        } else {
            bar.suspend(|| ask_overwrite(file_name))
        }
    };
    let mut progress = |percent: u8| bar.set_position(u64::from(percent));

    let report = geotagger.run(folder, track, &mut confirm, &mut progress)?;
    bar.finish_and_clear();

    if report.cancelled {
        info!("Run cancelled");
    }
    println!("Updated {} of {} photos", report.updated, report.total);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Asks on the terminal until a valid answer is given. End of input cancels the run.
fn ask_overwrite(file_name: &str) -> OverwriteDecision {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!(
            "{file_name} already has GPS data. Overwrite? [y]es, [n]o, [a]ll, n[o]ne, [c]ancel: "
        );
        if io::stdout().flush().is_err() {
            return OverwriteDecision::Cancel;
        }
        let Some(Ok(line)) = lines.next() else {
            return OverwriteDecision::Cancel;
        };
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return OverwriteDecision::Overwrite,
            "n" | "no" => return OverwriteDecision::Skip,
            "a" | "all" => return OverwriteDecision::OverwriteAll,
            "o" | "none" => return OverwriteDecision::SkipAll,
            "c" | "cancel" => return OverwriteDecision::Cancel,
            _ => println!("Please answer y, n, a, o or c."),
        }
    }
}

fn track_info(track: &Path) -> color_eyre::Result<()> {
    let summary = TrackSummary::from_path(track)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
