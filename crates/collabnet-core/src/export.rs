//! GEXF topology export for external visualization tools (e.g. Gephi).
//!
//! Nodes carry their numeric vertex id and, when an [`IdentityMap`] is
//! supplied, the login as label. Edges carry source, target, and the weight
//! with exactly two decimals. Rust float formatting ignores locale, so the
//! separator is always `.`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::instrument;

use crate::graph::Graph;
use crate::identity::IdentityMap;

/// Write `graph` as a GEXF 1.2 document.
///
/// Edges are listed by ascending source, then in successor order, with
/// sequential ids starting at 0.
///
/// # Errors
///
/// Propagates writer failures. Graph errors are surfaced as
/// [`io::ErrorKind::InvalidData`].
pub fn write_gexf<G, W>(graph: &G, labels: Option<&IdentityMap>, mut out: W) -> io::Result<()>
where
    G: Graph + ?Sized,
    W: Write,
{
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, r#"<gexf xmlns="http://www.gexf.net/1.2draft" version="1.2">"#)?;
    writeln!(out, r#"  <graph defaultedgetype="directed">"#)?;

    writeln!(out, "    <nodes>")?;
    for v in 0..graph.vertex_count() {
        let label = labels
            .and_then(|map| map.login(v))
            .map_or_else(|| format!("vertex {v}"), escape_xml);
        writeln!(out, r#"      <node id="{v}" label="{label}" />"#)?;
    }
    writeln!(out, "    </nodes>")?;

    writeln!(out, "    <edges>")?;
    let mut edge_id = 0_usize;
    for u in 0..graph.vertex_count() {
        for v in graph.successors(u).map_err(invalid_data)? {
            let weight = graph.edge_weight(u, v).map_err(invalid_data)?;
            writeln!(
                out,
                r#"      <edge id="{edge_id}" source="{u}" target="{v}" weight="{weight:.2}" />"#
            )?;
            edge_id += 1;
        }
    }
    writeln!(out, "    </edges>")?;

    writeln!(out, "  </graph>")?;
    writeln!(out, "</gexf>")
}

/// Write `graph` as GEXF to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
#[instrument(skip(graph, labels))]
pub fn export_gexf_file<G>(graph: &G, labels: Option<&IdentityMap>, path: &Path) -> Result<()>
where
    G: Graph + ?Sized,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file =
        fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = io::BufWriter::new(file);
    write_gexf(graph, labels, &mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn invalid_data(err: crate::error::GraphError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
