//! Visualization data files and their asynchronous loader.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::hierarchy::DendroNode;
use crate::error::{Error, Result};

/// File holding the heatmap cells.
pub const HEATMAP_FILE: &str = "heatmap_data.json";
/// File holding the dendrogram.
pub const DENDRO_FILE: &str = "dendro_data.json";

/// Message shown in place of every data-driven diagram when loading fails.
pub const DATA_ERROR_MESSAGE: &str =
    "Error loading data. Please ensure heatmap_data.json and dendro_data.json are in the data directory.";

/// Row or column label, written as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Numeric label.
    Number(i64),
    /// Text label.
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One heatmap cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// Row label.
    pub row: Label,
    /// Column label.
    pub col: Label,
    /// Similarity score.
    pub score: f64,
}

/// Everything the data-driven renderers draw from.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Heatmap cells in file order.
    pub heatmap: Vec<HeatmapCell>,
    /// Dendrogram root.
    pub dendrogram: DendroNode,
}

impl DataSet {
    /// Parse both documents.
    pub fn from_json(heatmap: &str, dendrogram: &str) -> Result<Self> {
        let heatmap: Vec<HeatmapCell> =
            serde_json::from_str(heatmap).map_err(|e| Error::parse(e.to_string(), PathBuf::from(HEATMAP_FILE)))?;
        let dendrogram: DendroNode =
            serde_json::from_str(dendrogram).map_err(|e| Error::parse(e.to_string(), PathBuf::from(DENDRO_FILE)))?;
        if heatmap.is_empty() {
            return Err(Error::data("heatmap has no cells"));
        }
        Ok(Self { heatmap, dendrogram })
    }

    /// Lowest and highest score.
    pub fn score_extent(&self) -> (f64, f64) {
        self.heatmap
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| (lo.min(c.score), hi.max(c.score)))
    }
}

/// Read both data files concurrently from `dir`.
pub async fn load_dataset(dir: &Path) -> Result<DataSet> {
    let heatmap_path = dir.join(HEATMAP_FILE);
    let dendro_path = dir.join(DENDRO_FILE);
    let (heatmap, dendrogram) = tokio::try_join!(read(&heatmap_path), read(&dendro_path))?;
    let data = DataSet::from_json(&heatmap, &dendrogram)?;
    tracing::info!("Loaded {} heatmap cells from {}", data.heatmap.len(), dir.display());
    Ok(data)
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| Error::io(e, path.to_path_buf()))
}
