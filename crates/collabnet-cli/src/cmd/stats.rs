//! `cnet stats`: graph summary and edge-list fingerprint.

use std::io::{self, Write};

use clap::Args;
use collabnet_analysis::{Backend, GraphStats};
use collabnet_core::{DenseGraph, Graph, SparseGraph};
use serde::Serialize;

use crate::cmd::{InputArgs, load_graph};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, score, text_kv};

/// Arguments for `cnet stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Storage backend (overrides config).
    #[arg(long)]
    pub backend: Option<Backend>,
}

/// Payload for `cnet stats`.
#[derive(Debug, Serialize)]
pub struct StatsOutput {
    pub edges_file: String,
    /// Tag filter applied before building the graph.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub content_hash: String,
    /// Raw interaction events folded into the edge list.
    pub interactions: usize,
    #[serde(flatten)]
    pub stats: GraphStats,
}

/// Execute `cnet stats`.
pub fn run_stats(
    args: &StatsArgs,
    default_backend: Backend,
    output: OutputMode,
) -> anyhow::Result<()> {
    let payload = match args.backend.unwrap_or(default_backend) {
        Backend::Sparse => stats_with::<SparseGraph>(&args.input)?,
        Backend::Dense => stats_with::<DenseGraph>(&args.input)?,
    };
    render_mode(output, &payload, render_text, render_pretty)
}

fn stats_with<G: Graph>(input: &InputArgs) -> anyhow::Result<StatsOutput> {
    let (data, edges) = load_graph::<G>(input)?;
    let interactions = edges
        .iter()
        .fold(0_usize, |acc, (_, _, edge)| acc.saturating_add(edge.count));
    Ok(StatsOutput {
        edges_file: input.edges.display().to_string(),
        tags: input.selected_tags().into_iter().map(str::to_string).collect(),
        content_hash: edges.content_hash(),
        interactions,
        stats: GraphStats::compute(&data.graph)?,
    })
}

fn render_text(out: &StatsOutput, w: &mut dyn Write) -> io::Result<()> {
    let s = &out.stats;
    text_kv(w, "content_hash", &out.content_hash)?;
    text_kv(w, "interactions", out.interactions.to_string())?;
    text_kv(w, "vertices", s.vertex_count.to_string())?;
    text_kv(w, "edges", s.edge_count.to_string())?;
    text_kv(w, "density", score(s.density))?;
    text_kv(w, "weak_components", s.weak_component_count.to_string())?;
    text_kv(w, "isolated", s.isolated_vertex_count.to_string())?;
    text_kv(w, "max_in_degree", s.max_in_degree.to_string())?;
    text_kv(w, "max_out_degree", s.max_out_degree.to_string())?;
    text_kv(w, "connected", s.is_connected.to_string())
}

fn render_pretty(out: &StatsOutput, w: &mut dyn Write) -> io::Result<()> {
    let s = &out.stats;
    pretty_section(w, "Interaction graph")?;
    pretty_kv(w, "edges file", &out.edges_file)?;
    if !out.tags.is_empty() {
        pretty_kv(w, "tags", out.tags.join(", "))?;
    }
    pretty_kv(w, "content hash", &out.content_hash)?;
    pretty_kv(w, "interactions", out.interactions.to_string())?;
    pretty_kv(w, "vertices", s.vertex_count.to_string())?;
    pretty_kv(w, "edges", s.edge_count.to_string())?;
    pretty_kv(w, "density", score(s.density))?;
    pretty_kv(w, "weak components", s.weak_component_count.to_string())?;
    pretty_kv(w, "isolated vertices", s.isolated_vertex_count.to_string())?;
    pretty_kv(w, "max in-degree", s.max_in_degree.to_string())?;
    pretty_kv(w, "max out-degree", s.max_out_degree.to_string())?;
    pretty_kv(w, "weakly connected", s.is_connected.to_string())
}
