//! Ideas canvas model: nodes and edges drawn by the UI.
//!
//! Node `data` is owned by the UI and kept as an untyped JSON map. The core
//! only reads it through accessors such as [`CanvasNode::string_field`].
//! Fields this crate does not know about are kept in `extra` and written
//! back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Node type whose `imageFile` data field names an uploaded image.
pub const IMAGE_NODE_TYPE: &str = "image";

/// Data key holding the stored image filename.
pub const IMAGE_FILE_KEY: &str = "imageFile";

/// Position of a node on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node on the ideas canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub node_type: String,

    #[serde(default)]
    pub position: Position,

    #[serde(default, deserialize_with = "nullable_map")]
    pub data: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Parent node id (older UI field name)
    #[serde(default, skip_serializing_if = "is_blank")]
    pub parent: Option<String>,

    /// Parent node id, kept equal to `parent`
    #[serde(default, skip_serializing_if = "is_blank")]
    pub parent_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A connection between two canvas nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub target: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub animated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole canvas as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    #[serde(default, deserialize_with = "super::nullable_vec")]
    pub nodes: Vec<CanvasNode>,

    #[serde(default, deserialize_with = "super::nullable_vec")]
    pub edges: Vec<CanvasEdge>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn nullable_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl CanvasNode {
    /// Get a string value from the node's data map, if present.
    pub fn string_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Filename of the uploaded image this node displays, for image nodes.
    pub fn image_file(&self) -> Option<&str> {
        if self.node_type == IMAGE_NODE_TYPE {
            self.string_field(IMAGE_FILE_KEY)
        } else {
            None
        }
    }

    /// The parent id, whichever of the two fields carries it.
    pub fn parent_ref(&self) -> Option<&str> {
        non_blank(&self.parent_id).or_else(|| non_blank(&self.parent))
    }

    /// Copy `parent` into `parentId` when only `parent` is set.
    pub fn fill_parent_id(&mut self) {
        if non_blank(&self.parent_id).is_none() {
            if let Some(parent) = non_blank(&self.parent) {
                self.parent_id = Some(parent.to_string());
            }
        }
    }

    /// Make `parent` and `parentId` mirror each other, whichever was set.
    pub fn mirror_parent(&mut self) {
        if non_blank(&self.parent).is_none() {
            if let Some(parent_id) = non_blank(&self.parent_id) {
                self.parent = Some(parent_id.to_string());
            }
        }
        self.fill_parent_id();
    }
}

impl CanvasDocument {
    pub fn new(nodes: Vec<CanvasNode>, edges: Vec<CanvasEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Image filenames referenced by image nodes.
    pub fn referenced_images(&self) -> HashSet<&str> {
        self.nodes.iter().filter_map(CanvasNode::image_file).collect()
    }

    /// Ids of every node in the document.
    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str) -> CanvasNode {
        CanvasNode {
            id: id.to_string(),
            node_type: "note".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mirror_parent_from_parent_id() {
        let mut n = node("child");
        n.parent_id = Some("group".to_string());
        n.mirror_parent();
        assert_eq!(n.parent.as_deref(), Some("group"));
        assert_eq!(n.parent_id.as_deref(), Some("group"));
    }

    #[test]
    fn test_mirror_parent_from_parent() {
        let mut n = node("child");
        n.parent = Some("group".to_string());
        n.mirror_parent();
        assert_eq!(n.parent_id.as_deref(), Some("group"));
    }

    #[test]
    fn test_mirror_parent_treats_empty_as_absent() {
        let mut n = node("child");
        n.parent = Some(String::new());
        n.parent_id = Some("group".to_string());
        n.mirror_parent();
        assert_eq!(n.parent.as_deref(), Some("group"));
    }

    #[test]
    fn test_fill_parent_id_does_not_touch_parent() {
        let mut n = node("child");
        n.parent_id = Some("group".to_string());
        n.fill_parent_id();
        assert_eq!(n.parent, None);
    }

    #[test]
    fn test_image_file_only_for_image_nodes() {
        let mut n = node("n1");
        n.data.insert(IMAGE_FILE_KEY.to_string(), json!("n1_abcd1234.png"));
        assert_eq!(n.image_file(), None);

        n.node_type = IMAGE_NODE_TYPE.to_string();
        assert_eq!(n.image_file(), Some("n1_abcd1234.png"));
    }

    #[test]
    fn test_string_field_ignores_non_strings() {
        let mut n = node("n1");
        n.data.insert("label".to_string(), json!(42));
        assert_eq!(n.string_field("label"), None);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "id": "n1",
            "type": "note",
            "position": {"x": 1.5, "y": 2.0},
            "data": {"label": "hello", "color": "#fff"},
            "selected": true,
            "zIndex": 3
        });
        let n: CanvasNode = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(n.extra.get("zIndex"), Some(&json!(3)));
        assert_eq!(serde_json::to_value(&n).unwrap(), raw);
    }

    #[test]
    fn test_edge_omits_empty_optionals() {
        let edge = CanvasEdge {
            id: "e1".to_string(),
            source: "a".to_string(),
            target: "b".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value, json!({"id": "e1", "source": "a", "target": "b"}));
    }

    #[test]
    fn test_document_null_lists_decode_empty() {
        let doc: CanvasDocument = serde_json::from_str(r#"{"nodes": null}"#).unwrap();
        assert!(doc.nodes.is_empty());
        assert!(doc.edges.is_empty());
    }
}
