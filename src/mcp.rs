use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::convert::ensure_pdf;
use crate::error::SplitError;
use crate::pdf::outline::{outline_tree, OutlineNode};
use crate::pdf::PdfDocument;
use crate::split::{self, SplitMode, SplitReport};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the source document (PDF, or an ebook to convert first)")]
    pub path: String,
    #[schemars(
        description = "Split mode: \"1\" (top-level bookmarks), \"2\" (second-level bookmarks), or \"manual\""
    )]
    pub mode: String,
    #[schemars(
        description = "Comma-separated 1-based page numbers where new files start (manual mode only)"
    )]
    #[serde(default)]
    pub pages: Option<String>,
    #[schemars(description = "Directory to write the output files into")]
    pub output_dir: String,
}

#[derive(Debug, Clone)]
pub struct SplitServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl SplitServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for SplitServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl SplitServer {
    #[tool(description = "Get the bookmark tree of a PDF as a flat list with depths and 1-based pages")]
    fn pdf_toc(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        let doc = match PdfDocument::open(&path) {
            Ok(d) => d,
            Err(e) => return sentinel_json(&e),
        };

        let mut entries = Vec::new();
        flatten(&outline_tree(&doc.doc), 1, &mut entries);
        serde_json::to_string_pretty(&entries).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Split a document into per-chapter PDFs by bookmarks (mode \"1\" or \"2\") \
                          or at explicit page numbers (mode \"manual\" with `pages`)")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        let mode = match req.mode.parse::<SplitMode>() {
            Ok(m) => m,
            Err(e) => return format!("Error: {}", e),
        };

        let pdf_path = match ensure_pdf(Path::new(&req.path)) {
            Ok(p) => p,
            Err(e) => return sentinel_json(&e),
        };
        let doc = match PdfDocument::open(&pdf_path) {
            Ok(d) => d,
            Err(e) => return sentinel_json(&e),
        };

        let out_dir = Path::new(&req.output_dir);
        if let Err(e) = std::fs::create_dir_all(out_dir) {
            return format!("Error: failed to create {}: {}", out_dir.display(), e);
        }

        let outcome = match mode {
            SplitMode::Bookmarks { depth } => split::split_by_outline(&doc, depth, out_dir),
            SplitMode::PageList => {
                let Some(pages) = req.pages.as_deref() else {
                    return "Error: manual mode requires `pages`".to_string();
                };
                split::split_by_pages(&doc, pages, out_dir)
            }
        };

        match outcome {
            Ok(report) => {
                let result = split_result(&req.output_dir, &report);
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => sentinel_json(&e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TocEntryResult {
    pub title: String,
    /// 1-based page, absent when the destination did not resolve.
    pub page: Option<u32>,
    pub depth: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitResult {
    pub output_dir: String,
    pub written: Vec<String>,
    pub failed: Vec<String>,
}

/// Machine-readable failure envelope: `error` is a stable tag the client can
/// branch on (e.g. offering manual mode on "no_bookmarks_found").
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitErrorResult {
    pub error: String,
    pub message: String,
}

fn flatten(nodes: &[OutlineNode], depth: u32, out: &mut Vec<TocEntryResult>) {
    for node in nodes {
        out.push(TocEntryResult {
            title: node.title.clone(),
            page: node.page.map(|p| p + 1),
            depth,
        });
        flatten(&node.children, depth + 1, out);
    }
}

fn split_result(output_dir: &str, report: &SplitReport) -> SplitResult {
    SplitResult {
        output_dir: output_dir.to_string(),
        written: report
            .written
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        failed: report.failed.iter().map(|e| e.to_string()).collect(),
    }
}

fn sentinel_json(err: &SplitError) -> String {
    let result = SplitErrorResult {
        error: err.kind().to_string(),
        message: err.to_string(),
    };
    serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
}

impl ServerHandler for SplitServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Document splitting tools. Use pdf_toc to inspect a PDF's bookmark tree and \
                 pdf_split to cut a document into per-chapter files, either at its bookmarks \
                 (mode \"1\" or \"2\") or at explicit page numbers (mode \"manual\"). Failures \
                 carry a machine-readable `error` tag; \"no_bookmarks_found\" means the document \
                 has no usable outline and manual mode is the fallback."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = SplitServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
