use std::process::ExitCode;

use anyhow::Result;
use chrono::Local;

use postcheck::config::Config;
use postcheck::new_post::{create_post, render_post, slugify, PostLayout};

use crate::{NewArgs, PostOutput};

fn layout_of(output: &PostOutput) -> Option<PostLayout> {
    match output {
        PostOutput::Stdout => None,
        PostOutput::File => Some(PostLayout::File),
        PostOutput::Dir => Some(PostLayout::Dir),
    }
}

pub fn post_cmd(config: &Config, args: NewArgs) -> Result<ExitCode> {
    let slug = args.slug.unwrap_or_else(|| slugify(&args.title));
    let date = Local::now().date_naive();
    let content = render_post(&args.title, &args.spoiler, &date)?;

    match layout_of(&args.output) {
        None => print!("{}", content),
        Some(layout) => {
            let path = create_post(&config.paths.posts_dir, &slug, layout, &content)?;
            println!("{} was created - have fun writing!", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
