use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use postcheck::config::LogLevel;
use postcheck::logger::configure_logger;

use crate::check::{check_cmd, readme_cmd};
use crate::config::open_config;
use crate::post::post_cmd;

mod check;
mod config;
mod post;

const CFG_FILE_NAME: &str = "postcheck.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path. If empty, postcheck.toml is searched in the current dir,
    /// next to the executable and in the user config dir
    #[arg(short, long = "config", global = true)]
    config_path: Option<PathBuf>,

    /// Directory holding the posts, overrides the configuration
    #[arg(long, global = true)]
    posts_dir: Option<PathBuf>,

    /// README listing the posts, overrides the configuration
    #[arg(long, global = true)]
    readme: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate front matter, related posts and README titles
    Check(CheckArgs),
    /// Rebuild the post list block of the README
    Readme(ReadmeArgs),
    /// Create a new post
    New(NewArgs),
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Skip the README title check
    #[arg(long)]
    no_readme: bool,
}

#[derive(clap::Args, Debug)]
struct ReadmeArgs {
    /// Print the new README instead of writing it
    #[arg(long)]
    dry_run: bool,
}

#[derive(clap::Args, Debug)]
struct NewArgs {
    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// One line teaser shown in post lists
    #[arg(short, long)]
    spoiler: String,

    /// Slug of the post. If empty, it is derived from the title
    #[arg(long)]
    slug: Option<String>,

    /// Post generation options
    #[arg(short, long, value_enum, default_value_t = PostOutput::File)]
    output: PostOutput,
}

#[derive(Clone, Debug, PartialEq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, ValueEnum)]
enum PostOutput {
    /// Writes the new post content to the stdout
    Stdout,
    /// Writes the new post content to a file (posts without images)
    File,
    /// Writes the new post content to a directory (posts with images)
    Dir,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = open_config(args.config_path)?;
    if let Some(posts_dir) = args.posts_dir {
        config.paths.posts_dir = posts_dir;
    }
    if let Some(readme) = args.readme {
        config.paths.readme = Some(readme);
    }
    if args.verbose {
        config.log.level = LogLevel::Debug;
    }

    if let Err(err) = configure_logger(&config.log) {
        eprintln!("Error creating logger sinks. Using default logger. Desc={}", err);
    }

    match args.command {
        Command::Check(args) => check_cmd(config, args),
        Command::Readme(args) => readme_cmd(&config, args),
        Command::New(args) => post_cmd(&config, args),
    }
}
