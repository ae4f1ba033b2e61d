//! `cnet analyze`: full network analysis of an edge list.

use std::io::{self, Write};

use clap::Args;
use collabnet_analysis::report::RankedIdentity;
use collabnet_analysis::{AnalysisConfig, AnalysisReport, Backend};
use collabnet_core::{DenseGraph, Graph, SparseGraph};
use serde::Serialize;

use crate::cmd::{InputArgs, load_graph};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, score, text_kv};

/// Arguments for `cnet analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Storage backend (overrides config).
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Girvan–Newman split budget (overrides config).
    #[arg(long)]
    pub splits: Option<usize>,

    /// How many identities each ranking lists (overrides config).
    #[arg(long)]
    pub top: Option<usize>,
}

/// Payload for `cnet analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub edges_file: String,
    pub backend: Backend,
    /// Tag filter applied before building the graph.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub content_hash: String,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// Apply command-line overrides on top of the resolved config.
pub fn apply_overrides(mut config: AnalysisConfig, args: &AnalyzeArgs) -> AnalysisConfig {
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(splits) = args.splits {
        config.community.max_splits = splits;
    }
    if let Some(top) = args.top {
        config.report.top_k = top;
    }
    config
}

/// Execute `cnet analyze`.
pub fn run_analyze(
    args: &AnalyzeArgs,
    config: AnalysisConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let config = apply_overrides(config, args);
    config.validate()?;

    let payload = match config.backend {
        Backend::Sparse => analyze_with::<SparseGraph>(&args.input, &config)?,
        Backend::Dense => analyze_with::<DenseGraph>(&args.input, &config)?,
    };

    render_mode(output, &payload, render_text, render_pretty)
}

fn analyze_with<G: Graph>(
    input: &InputArgs,
    config: &AnalysisConfig,
) -> anyhow::Result<AnalyzeOutput> {
    let (data, edges) = load_graph::<G>(input)?;
    let report = AnalysisReport::build(&data, config)?;
    Ok(AnalyzeOutput {
        edges_file: input.edges.display().to_string(),
        backend: config.backend,
        tags: input.selected_tags().into_iter().map(str::to_string).collect(),
        content_hash: edges.content_hash(),
        report,
    })
}

fn ranking_line(entries: &[RankedIdentity]) -> String {
    entries
        .iter()
        .map(|e| format!("{}={}", e.login, score(e.score)))
        .collect::<Vec<_>>()
        .join(",")
}

fn render_text(out: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    let r = &out.report;
    text_kv(w, "backend", out.backend.as_str())?;
    if !out.tags.is_empty() {
        text_kv(w, "tags", out.tags.join(","))?;
    }
    text_kv(w, "content_hash", &out.content_hash)?;
    text_kv(w, "vertices", r.stats.vertex_count.to_string())?;
    text_kv(w, "edges", r.stats.edge_count.to_string())?;
    text_kv(w, "pagerank", ranking_line(&r.rankings.pagerank))?;
    text_kv(w, "closeness", ranking_line(&r.rankings.closeness))?;
    text_kv(w, "betweenness", ranking_line(&r.rankings.betweenness))?;
    text_kv(w, "degree", ranking_line(&r.rankings.degree))?;
    text_kv(w, "density", score(r.cohesion.density))?;
    text_kv(w, "clustering", score(r.cohesion.average_clustering))?;
    text_kv(w, "assortativity", score(r.cohesion.assortativity))?;
    text_kv(w, "communities", r.communities.count.to_string())?;
    text_kv(w, "bridging_ties", r.communities.bridging_ties.len().to_string())?;
    Ok(())
}

fn pretty_ranking(w: &mut dyn Write, heading: &str, entries: &[RankedIdentity]) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    if entries.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for (rank, entry) in entries.iter().enumerate() {
        writeln!(w, "  {:>2}. {:<24} {}", rank + 1, entry.login, score(entry.score))?;
    }
    Ok(())
}

fn render_pretty(out: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    let r = &out.report;

    pretty_section(w, "Graph")?;
    pretty_kv(w, "edges file", &out.edges_file)?;
    pretty_kv(w, "backend", out.backend.as_str())?;
    if !out.tags.is_empty() {
        pretty_kv(w, "tags", out.tags.join(", "))?;
    }
    pretty_kv(w, "content hash", &out.content_hash)?;
    pretty_kv(w, "vertices", r.stats.vertex_count.to_string())?;
    pretty_kv(w, "edges", r.stats.edge_count.to_string())?;
    pretty_kv(w, "weakly connected", r.stats.is_connected.to_string())?;
    writeln!(w)?;

    pretty_section(w, &format!("Centrality (top {})", r.top_k))?;
    pretty_ranking(w, "PageRank", &r.rankings.pagerank)?;
    pretty_ranking(w, "Closeness", &r.rankings.closeness)?;
    pretty_ranking(w, "Betweenness", &r.rankings.betweenness)?;
    pretty_ranking(w, "Degree", &r.rankings.degree)?;
    pretty_kv(
        w,
        "pagerank iterations",
        format!(
            "{}{}",
            r.pagerank.iterations,
            if r.pagerank.converged { "" } else { " (not converged)" }
        ),
    )?;
    writeln!(w)?;

    pretty_section(w, "Structure")?;
    pretty_kv(w, "density", score(r.cohesion.density))?;
    pretty_kv(w, "average clustering", score(r.cohesion.average_clustering))?;
    pretty_kv(w, "assortativity", score(r.cohesion.assortativity))?;
    pretty_kv(w, "pattern", r.cohesion.pattern.describe())?;
    writeln!(w)?;

    let c = &r.communities;
    pretty_section(w, "Communities (Girvan–Newman)")?;
    pretty_kv(w, "max splits", c.max_splits.to_string())?;
    pretty_kv(w, "edges removed", c.edges_removed.to_string())?;
    pretty_kv(w, "communities", c.count.to_string())?;
    for (i, size) in c.sizes.iter().take(3).enumerate() {
        writeln!(w, "  group {}: {size} members", i + 1)?;
    }
    pretty_kv(w, "bridging ties", c.bridging_ties.len().to_string())?;
    for tie in c.bridging_ties.iter().take(5) {
        writeln!(
            w,
            "  {} -> {} (group {} -> {})",
            tie.source,
            tie.target,
            tie.source_community + 1,
            tie.target_community + 1
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AnalyzeArgs {
        AnalyzeArgs {
            input: InputArgs {
                edges: "edges.csv".into(),
                no_header: false,
                kind: None,
                tags: Vec::new(),
            },
            backend: None,
            splits: None,
            top: None,
        }
    }

    #[test]
    fn no_overrides_keep_config() {
        let config = apply_overrides(AnalysisConfig::default(), &args());
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let mut a = args();
        a.backend = Some(Backend::Dense);
        a.splits = Some(0);
        a.top = Some(2);
        let config = apply_overrides(AnalysisConfig::default(), &a);
        assert_eq!(config.backend, Backend::Dense);
        assert_eq!(config.community.max_splits, 0);
        assert_eq!(config.report.top_k, 2);
    }

    #[test]
    fn ranking_line_format() {
        let entries = vec![
            RankedIdentity {
                login: "a".into(),
                score: 0.5,
            },
            RankedIdentity {
                login: "b".into(),
                score: 0.25,
            },
        ];
        assert_eq!(ranking_line(&entries), "a=0.500000,b=0.250000");
    }
}
