//! Ideas canvas and its images.

use super::{Output, json_string};
use crate::models::CanvasDocument;
use crate::storage::Storage;
use crate::{Error, Result};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// The stored canvas.
#[derive(Debug, Serialize)]
pub struct CanvasView {
    #[serde(flatten)]
    pub canvas: CanvasDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Output for CanvasView {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(warning) = &self.warning {
            lines.push(format!("Warning: {}", warning));
        }
        lines.push(format!(
            "{} nodes, {} edges",
            self.canvas.nodes.len(),
            self.canvas.edges.len()
        ));
        for node in &self.canvas.nodes {
            let mut line = format!("  {} ({})", node.id, node.node_type);
            if let Some(label) = node.string_field("label") {
                line.push_str(&format!(" {:?}", label));
            }
            if let Some(parent) = node.parent_ref() {
                line.push_str(&format!(" in {}", parent));
            }
            if let Some(file) = node.image_file() {
                line.push_str(&format!(" [{}]", file));
            }
            lines.push(line);
        }
        for edge in &self.canvas.edges {
            lines.push(format!("  {} -> {}", edge.source, edge.target));
        }
        lines.join("\n")
    }
}

/// Outcome of `canvas save`.
#[derive(Debug, Serialize)]
pub struct CanvasSaved {
    pub nodes: usize,
    pub edges: usize,
}

impl Output for CanvasSaved {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        format!("Saved canvas ({} nodes, {} edges)", self.nodes, self.edges)
    }
}

/// An image stored or removed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub file: String,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
}

impl Output for ImageResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        match (&self.node_id, self.bytes) {
            (Some(node), Some(bytes)) => {
                format!("Uploaded {} for node {} ({} bytes)", self.file, node, bytes)
            }
            _ => format!("Deleted image {}", self.file),
        }
    }
}

/// Outcome of `canvas prune-images`.
#[derive(Debug, Serialize)]
pub struct PruneResult {
    pub count: usize,
    pub removed: Vec<String>,
}

impl Output for PruneResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        if self.removed.is_empty() {
            return "No orphan images.".to_string();
        }
        let mut lines = vec![format!("Removed {} orphan image(s):", self.count)];
        lines.extend(self.removed.iter().map(|name| format!("  {}", name)));
        lines.join("\n")
    }
}

pub fn canvas_show(storage: &Storage) -> Result<CanvasView> {
    let (canvas, warning) = storage.canvas().load_canvas_or_default().into_parts();
    Ok(CanvasView {
        canvas,
        warning: warning.map(|e| e.to_string()),
    })
}

/// Replace the canvas with a `{"nodes": [...], "edges": [...]}` document.
///
/// `source` is a file path, or `None`/`-` for standard input.
pub fn canvas_save(storage: &Storage, source: Option<&Path>) -> Result<CanvasSaved> {
    let text = match source {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let canvas: CanvasDocument = serde_json::from_str(&text)
        .map_err(|e| Error::InvalidInput(format!("Invalid canvas document: {}", e)))?;
    let result = CanvasSaved {
        nodes: canvas.nodes.len(),
        edges: canvas.edges.len(),
    };
    storage.canvas().save_canvas(canvas.nodes, canvas.edges)?;
    Ok(result)
}

/// Copy an image file into the image directory for `node_id`.
pub fn canvas_upload_image(storage: &Storage, path: &Path, node_id: &str) -> Result<ImageResult> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let file = storage.canvas().upload_image(filename, &bytes, node_id)?;
    Ok(ImageResult {
        file,
        action: "uploaded",
        node_id: Some(node_id.to_string()),
        bytes: Some(bytes.len()),
    })
}

pub fn canvas_delete_image(storage: &Storage, filename: &str) -> Result<ImageResult> {
    storage.canvas().delete_image(filename)?;
    Ok(ImageResult {
        file: filename.to_string(),
        action: "deleted",
        node_id: None,
        bytes: None,
    })
}

/// Remove images no live node accounts for.
///
/// Without explicit ids the nodes of the stored canvas are the live set.
pub fn canvas_prune_images(storage: &Storage, node_ids: Vec<String>) -> Result<PruneResult> {
    let store = storage.canvas();
    let live = if node_ids.is_empty() {
        store.load_canvas()?.node_ids()
    } else {
        node_ids
    };

    let removed = store.prune_orphan_images(&live)?;
    Ok(PruneResult {
        count: removed.len(),
        removed,
    })
}
