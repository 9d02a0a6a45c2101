use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use contentmonetizer::config::REQUIRED_ENV_VARS;
use contentmonetizer::pipeline::{self, Pipeline};
use contentmonetizer::{logging, report, Config};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Turn technical YouTube videos into knowledge bases and monetization plans", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process a single video
    Video {
        /// YouTube video id
        video_id: String,
        /// Directory the run directory is created in
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Log at debug level
        #[arg(short, long)]
        verbose: bool,
        /// Build and run repositories linked from the video
        #[arg(long)]
        build: bool,
    },
    /// Process the most recent uploads of a channel
    Channel {
        /// YouTube channel id
        channel_id: String,
        /// How many uploads to process
        #[arg(short, long)]
        max_videos: Option<usize>,
        /// Directory the run directory is created in
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Log at debug level
        #[arg(short, long)]
        verbose: bool,
        /// Build and run repositories linked from the videos
        #[arg(long)]
        build: bool,
    },
    /// Analyze a GitHub repository on its own
    Repo {
        /// Repository URL
        url: String,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Build and run the application and write setup documentation
        #[arg(long)]
        deploy: bool,
    },
}

impl Command {
    fn verbose(&self) -> bool {
        match self {
            Command::Video { verbose, .. } | Command::Channel { verbose, .. } => *verbose,
            Command::Repo { .. } => false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.command.verbose()))?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            print_error(&format!("Could not load configuration: {}", e));
            return Ok(());
        }
    };

    let missing = config.api_keys.missing();
    match cli.command {
        Command::Video { video_id, output_dir, build, .. } => {
            if !check_required(&missing) {
                return Ok(());
            }
            let output_root = output_dir.unwrap_or_else(|| config.output_dir.clone());
            if let Some(pipeline) = build_pipeline(config, &output_root, build).await {
                run_video(&pipeline, &video_id, &output_root).await;
            }
        }
        Command::Channel { channel_id, max_videos, output_dir, build, .. } => {
            if !check_required(&missing) {
                return Ok(());
            }
            let output_root = output_dir.unwrap_or_else(|| config.output_dir.clone());
            let max_videos = max_videos.unwrap_or(config.max_videos);
            if let Some(pipeline) = build_pipeline(config, &output_root, build).await {
                run_channel(&pipeline, &channel_id, max_videos, &output_root).await;
            }
        }
        Command::Repo { url, output, deploy } => {
            if !missing.is_empty() {
                print_warning(&format!("Missing environment variables: {}", missing.join(", ")));
            }
            let output_root = output.unwrap_or_else(|| config.output_dir.clone());
            if let Some(pipeline) = build_pipeline(config, &output_root, false).await {
                run_repo(&pipeline, &url, &output_root, deploy).await;
            }
        }
    }

    Ok(())
}

/// Logs every required variable that is missing; `false` means the run stops
fn check_required(missing: &[&str]) -> bool {
    if missing.is_empty() {
        return true;
    }
    error!("Missing required environment variables: {}", missing.join(", "));
    for (name, description) in REQUIRED_ENV_VARS {
        if missing.contains(name) {
            error!("  {}: {}", name, description);
        }
    }
    print_error("Set the missing variables and run again");
    false
}

async fn build_pipeline(mut config: Config, output_root: &Path, build: bool) -> Option<Pipeline> {
    config.output_dir = output_root.to_path_buf();
    config.build.enabled |= build;

    if let Err(e) = config.validate().await {
        print_error(&format!("Invalid configuration: {}", e));
        return None;
    }
    match Pipeline::new(config) {
        Ok(pipeline) => Some(pipeline),
        Err(e) => {
            print_error(&format!("Could not start the pipeline: {}", e));
            None
        }
    }
}

async fn run_video(pipeline: &Pipeline, video_id: &str, output_root: &Path) {
    let pb = report::create_progress_bar();
    pb.set_message(format!("Processing video {}", video_id));

    let result = pipeline.run_video(video_id, output_root).await;
    pb.finish_and_clear();

    match result {
        Ok(outcome) => {
            print_success(&format!("Processed \"{}\"", outcome.title));
            println!("{} {}", "[SAVED]".bright_blue(), outcome.output_dir.display().to_string().bright_white());
            if let Some(strategy) = &outcome.summary.recommended_strategy {
                println!("{} {}", "Recommended strategy:".bright_yellow(), strategy.bright_white());
            }
        }
        Err(e) => print_error(&format!("Video {} failed: {}", video_id, e)),
    }
}

async fn run_channel(pipeline: &Pipeline, channel_id: &str, max_videos: usize, output_root: &Path) {
    let pb = report::create_progress_bar();
    pb.set_message(format!("Processing up to {} videos from {}", max_videos, channel_id));

    let result = pipeline.process_channel(channel_id, max_videos, output_root).await;
    pb.finish_and_clear();

    match result {
        Ok(outcome) => {
            let results = &outcome.results;
            print_success(&format!(
                "Processed {} of {} videos from {}",
                results.processed,
                results.videos.len(),
                results.channel.title
            ));
            for video in results.videos.iter().filter(|v| !v.succeeded()) {
                print_warning(&format!(
                    "{} failed: {}",
                    video.video_id,
                    video.error.as_deref().unwrap_or("unknown error")
                ));
            }
            println!("{} {}", "[SAVED]".bright_blue(), outcome.output_dir.display().to_string().bright_white());
        }
        Err(e) => print_error(&format!("Channel {} failed: {}", channel_id, e)),
    }
}

async fn run_repo(pipeline: &Pipeline, url: &str, output_root: &Path, deploy: bool) {
    let pb = report::create_progress_bar();
    pb.set_message(format!("Analyzing {}", url));

    let result = pipeline.analyze_repository_url(url, output_root, deploy).await;
    pb.finish_and_clear();

    match result {
        Ok(outcome) => {
            print_success(&format!("Analyzed {}", outcome.name));
            println!("{} {}", "[SAVED]".bright_blue(), outcome.analysis_file.display().to_string().bright_white());
            if let Some(setup) = &outcome.setup_file {
                println!("{} {}", "[SAVED]".bright_blue(), setup.display().to_string().bright_white());
            }
            if outcome.build_succeeded == Some(false) {
                print_warning("The application did not build or start; see the setup document");
            }
        }
        Err(e) => {
            print_error(&format!("Repository analysis failed: {}", e));
            pipeline::write_error(&output_root.join("repos"), &e).await;
            info!("Error details written to {}", output_root.join("repos").join(pipeline::ERROR_FILE).display());
        }
    }
}

fn print_success(message: &str) {
    println!("{} {}", "[SUCCESS]".bright_green(), message.bright_white());
}

fn print_warning(message: &str) {
    warn!("{}", message);
    println!("{} {}", "[WARNING]".bright_yellow(), message.bright_yellow());
}

fn print_error(message: &str) {
    println!("{} {}", "[ERROR]".bright_red(), message.bright_red());
}
