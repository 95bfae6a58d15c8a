use std::io;

use colored::Colorize;
use cph_core::action;

use super::{GlobalArgs, SubcmdResult};
use crate::config;

/// List the runtimes the execution service offers for the supported languages
#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(short, long)]
    pub json: bool,

    /// Fetch the list again instead of using the one fetched earlier in this session
    #[arg(short, long)]
    pub refresh: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = config::load_config(global_args)?;
    let client = cfg.execution.build_client()?;
    let langs = action::list_runtimes(&client, args.refresh).await?;

    if args.json {
        let runtimes: Vec<_> = langs.iter().flat_map(|(_, rs)| rs).collect();
        serde_json::to_writer_pretty(io::stdout(), &runtimes)?;
        return Ok(());
    }

    for (lang, runtimes) in langs {
        let versions = if runtimes.is_empty() {
            "(unavailable: the latest version is requested)".dimmed().to_string()
        } else {
            runtimes
                .iter()
                .map(|r| format!("{} {}", r.language, r.version))
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("{:<12} {}", lang.to_string().bold(), versions);
    }
    Ok(())
}
