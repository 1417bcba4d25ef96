use std::process::ExitCode;

use anyhow::Result;
use spdlog::info;

use postcheck::config::Config;
use postcheck::post_list::PostList;
use postcheck::readme::compile_readme;
use postcheck::validator::Validator;

use crate::{CheckArgs, ReadmeArgs, ReportFormat};

pub fn check_cmd(mut config: Config, args: CheckArgs) -> Result<ExitCode> {
    if args.no_readme {
        config.paths.readme = None;
    }

    let report = Validator::new(&config).run()?;
    match args.format {
        ReportFormat::Text => println!("{}", report),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

pub fn readme_cmd(config: &Config, args: ReadmeArgs) -> Result<ExitCode> {
    let Some(ref readme) = config.paths.readme else {
        eprintln!("No README configured");
        return Ok(ExitCode::FAILURE);
    };

    let post_list = PostList::new(&config.paths.posts_dir);
    let contents = compile_readme(&post_list, readme, &config.readme, args.dry_run)?;
    if args.dry_run {
        print!("{}", contents);
    } else {
        info!("Done!");
        println!("Updated {}", readme.display());
    }

    Ok(ExitCode::SUCCESS)
}
