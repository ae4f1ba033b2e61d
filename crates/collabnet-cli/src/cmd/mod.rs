pub mod analyze;
pub mod export;
pub mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use collabnet_core::{EdgeList, Graph, GraphData, InteractionKind};
use tracing::info;

/// Edge-list input options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Edge-list CSV (`source,target,weight[,count,tags]`).
    pub edges: PathBuf,

    /// The first row is data, not a header.
    #[arg(long)]
    pub no_header: bool,

    /// Keep only one interaction kind: comments, issue-closures or pr-interactions.
    #[arg(long)]
    pub kind: Option<InteractionKind>,

    /// Keep only interactions with this tag (repeatable; adds to `--kind`).
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

impl InputArgs {
    /// Union of `--kind` tags and explicit `--tag`s. Empty means no filter.
    pub fn selected_tags(&self) -> Vec<&str> {
        let mut selected: Vec<&str> = self.kind.map_or(&[][..], InteractionKind::tags).to_vec();
        for tag in &self.tags {
            if !selected.contains(&tag.as_str()) {
                selected.push(tag);
            }
        }
        selected
    }
}

/// Read the edge list, apply the tag filter, and build a graph on backend `G`.
pub fn load_graph<G: Graph>(input: &InputArgs) -> Result<(GraphData<G>, EdgeList)> {
    let path = &input.edges;
    let mut edges = EdgeList::read_csv_file(path, !input.no_header)?;

    let selected = input.selected_tags();
    if !selected.is_empty() {
        let before = edges.len();
        edges = edges.filter_tags(&selected);
        info!(?selected, before, after = edges.len(), "filtered interactions by tag");
    }

    let data = GraphData::<G>::from_edge_list(&edges)
        .with_context(|| format!("Failed to build graph from {}", path.display()))?;
    info!(
        path = %path.display(),
        vertices = data.graph.vertex_count(),
        pairs = edges.len(),
        "graph loaded"
    );
    Ok((data, edges))
}
