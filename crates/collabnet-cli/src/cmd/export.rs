//! `cnet export`: write the graph topology as GEXF.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use collabnet_analysis::Backend;
use collabnet_core::export::export_gexf_file;
use collabnet_core::{DenseGraph, Graph, SparseGraph};
use serde::Serialize;

use crate::cmd::{InputArgs, load_graph};
use crate::output::{OutputMode, pretty_kv, render_mode, text_kv};

/// Arguments for `cnet export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Destination `.gexf` file (parent directories are created).
    pub output: PathBuf,

    /// Storage backend (overrides config).
    #[arg(long)]
    pub backend: Option<Backend>,
}

/// Payload for `cnet export`.
#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub path: String,
    pub vertices: usize,
    pub edges: usize,
}

/// Execute `cnet export`.
pub fn run_export(
    args: &ExportArgs,
    default_backend: Backend,
    output: OutputMode,
) -> anyhow::Result<()> {
    let payload = match args.backend.unwrap_or(default_backend) {
        Backend::Sparse => export_with::<SparseGraph>(&args.input, &args.output)?,
        Backend::Dense => export_with::<DenseGraph>(&args.input, &args.output)?,
    };
    render_mode(output, &payload, render_text, render_pretty)
}

fn export_with<G: Graph>(input: &InputArgs, destination: &Path) -> anyhow::Result<ExportOutput> {
    let (data, _) = load_graph::<G>(input)?;
    export_gexf_file(&data.graph, Some(&data.identities), destination)?;
    Ok(ExportOutput {
        path: destination.display().to_string(),
        vertices: data.graph.vertex_count(),
        edges: data.graph.edge_count(),
    })
}

fn render_text(out: &ExportOutput, w: &mut dyn Write) -> io::Result<()> {
    text_kv(w, "path", &out.path)?;
    text_kv(w, "vertices", out.vertices.to_string())?;
    text_kv(w, "edges", out.edges.to_string())
}

fn render_pretty(out: &ExportOutput, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "✓ Exported GEXF topology")?;
    pretty_kv(w, "path", &out.path)?;
    pretty_kv(w, "vertices", out.vertices.to_string())?;
    pretty_kv(w, "edges", out.edges.to_string())
}
