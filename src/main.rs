mod chapters;
mod cli;
mod commands;
mod convert;
mod error;
mod mcp;
mod pdf;
mod ranges;
mod split;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use error::SplitError;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(e),
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Chapters {
            path,
            depth,
            output_dir,
        } => {
            commands::chapters::run(&path, depth, &output_dir)?;
        }
        Commands::Pages {
            path,
            page_list,
            output_dir,
        } => {
            commands::pages::run(&path, &page_list, &output_dir)?;
        }
        Commands::Toc { path } => {
            commands::toc::run(&path)?;
        }
    }

    Ok(())
}

/// The two recoverable sentinels get exit code 2 and a fallback hint, so a
/// wrapping script or menu can branch without scraping error text. Anything
/// else is a plain failure.
fn report_failure(err: anyhow::Error) -> ExitCode {
    if let Some(split_err) = err.downcast_ref::<SplitError>() {
        if split_err.is_recoverable() {
            eprintln!("{}", split_err);
            match split_err {
                SplitError::NoBookmarksFound { .. } => eprintln!(
                    "hint: inspect available depths with `unbind toc`, or pass explicit page \
                     breaks to `unbind pages`"
                ),
                SplitError::InvalidPageList(_) => eprintln!(
                    "hint: pass comma-separated 1-based page numbers, e.g. \"13,50,88\""
                ),
                _ => {}
            }
            return ExitCode::from(2);
        }
    }

    eprintln!("Error: {:#}", err);
    ExitCode::FAILURE
}
