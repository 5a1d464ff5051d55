//! Tab-separated template rows.
//!
//! Each line holds one zone record followed directly, with no separating
//! tab, by one connection record. The two lists are indexed independently,
//! so the shorter one simply runs out: missing zone records become blank
//! columns and missing connection records are omitted.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::schema::{CONNECTION_FIELDS, PRE_ZONE_COLUMNS, ZONE_FIELDS, ZONE_RECORD_COLUMNS};
use crate::error::ExportError;
use crate::graph::{Connection, Region, RegionGraph, ZoneType};

/// Counts reported after writing a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportStats {
    pub zones: usize,
    pub connections: usize,
    pub lines: usize,
}

/// `x` flags for start / reserved / neutral-or-treasure / junction.
fn zone_flags(zone: Option<ZoneType>) -> [&'static str; 4] {
    let flag = |on: bool| if on { "x" } else { "" };
    [
        flag(zone == Some(ZoneType::Start)),
        "",
        flag(matches!(
            zone,
            Some(ZoneType::Neutral | ZoneType::Treasure | ZoneType::SuperTreasure)
        )),
        flag(zone == Some(ZoneType::Junction)),
    ]
}

fn zone_record(region: Option<&Region>) -> String {
    let mut columns: Vec<String> = vec![String::new(); PRE_ZONE_COLUMNS];
    match region {
        Some(region) => {
            columns.push(region.id.to_string());
            columns.extend(zone_flags(region.zone_type).iter().map(|f| f.to_string()));
            columns.extend(ZONE_FIELDS.iter().map(|key| region.attributes.render(key)));
        }
        None => columns.resize(ZONE_RECORD_COLUMNS, String::new()),
    }
    columns.join("\t")
}

fn connection_record(conn: &Connection) -> String {
    let mut columns = vec![conn.a.to_string(), conn.b.to_string()];
    columns.extend(CONNECTION_FIELDS.iter().map(|key| conn.attributes.render(key)));
    columns.join("\t")
}

/// Render every row of `world`, without line terminators.
pub fn render_rows(world: &RegionGraph) -> Vec<String> {
    let regions = world.regions();
    let connections = world.connections();
    let rows = regions.len().max(connections.len());

    (0..rows)
        .map(|i| {
            let mut line = zone_record(regions.get(i));
            if let Some(conn) = connections.get(i) {
                line.push_str(&connection_record(conn));
            }
            line
        })
        .collect()
}

/// Write `world` to `path`, optionally preceded by the verbatim contents of `header`.
pub fn write_template(world: &RegionGraph, path: &Path, header: Option<&Path>) -> Result<ExportStats, ExportError> {
    let mut out = BufWriter::new(File::create(path)?);

    if let Some(header) = header {
        let text = std::fs::read_to_string(header)?;
        out.write_all(text.as_bytes())?;
        if !text.is_empty() && !text.ends_with('\n') {
            out.write_all(b"\n")?;
        }
    }

    let rows = render_rows(world);
    for row in &rows {
        writeln!(out, "{}", row)?;
    }
    out.flush()?;

    let stats = ExportStats {
        zones: world.region_count(),
        connections: world.connection_count(),
        lines: rows.len(),
    };
    info!(
        "Exported template to {} (zones: {}, connections: {}, lines: {})",
        path.display(),
        stats.zones,
        stats.connections,
        stats.lines
    );
    Ok(stats)
}
