use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "unbind")]
#[command(about = "Split PDFs and ebooks into per-chapter files, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server (primary mode)
    Mcp,

    /// Split at the document's bookmarks
    Chapters {
        /// Source document (PDF, or an ebook to convert first)
        path: PathBuf,

        /// Bookmark depth to split at (1 = top-level entries)
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        depth: u32,

        /// Directory for the chapter files
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Split at an explicit list of page numbers
    Pages {
        /// Source document (PDF, or an ebook to convert first)
        path: PathBuf,

        /// Comma-separated 1-based page numbers where new files start
        /// (e.g., "13,50,88")
        page_list: String,

        /// Directory for the section files
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Print the bookmark tree with depths and pages
    Toc {
        /// PDF file to inspect
        path: PathBuf,
    },
}
