//! Ideas canvas store and image asset lifecycle.
//!
//! Uploaded images are stored as `<nodeId>_<8 hex><ext>` in the image
//! directory, so every file can be traced back to the node it was uploaded for.

use super::collection::{JsonDocument, Loaded};
use super::validate_file_name;
use crate::models::{CanvasDocument, CanvasEdge, CanvasNode};
use crate::{Error, Result};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Extensions treated as images when pruning (compared lowercase).
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Attempts at finding an unused random name before giving up.
const MAX_NAME_ATTEMPTS: usize = 16;

/// Store for the ideas canvas document and its images.
#[derive(Debug, Clone)]
pub struct CanvasStore {
    doc: JsonDocument<CanvasDocument>,
    image_dir: PathBuf,
}

/// True when the file name has one of [`IMAGE_EXTENSIONS`].
pub fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn random_suffix() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    hex[..8].to_string()
}

impl CanvasStore {
    pub fn new(dir: impl Into<PathBuf>, file_name: &str, image_dir: impl Into<PathBuf>) -> Self {
        Self {
            doc: JsonDocument::new(dir, file_name),
            image_dir: image_dir.into(),
        }
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Persist the canvas, copying `parent` into `parentId` where only `parent` is set.
    pub fn save_canvas(&self, mut nodes: Vec<CanvasNode>, edges: Vec<CanvasEdge>) -> Result<()> {
        for node in &mut nodes {
            node.fill_parent_id();
        }
        self.doc.save(&CanvasDocument::new(nodes, edges))
    }

    /// Load the canvas with `parent` and `parentId` mirrored on every node.
    pub fn load_canvas(&self) -> Result<CanvasDocument> {
        let mut canvas = self.doc.load()?;
        for node in &mut canvas.nodes {
            node.mirror_parent();
        }
        Ok(canvas)
    }

    /// Lenient variant of [`CanvasStore::load_canvas`].
    pub fn load_canvas_or_default(&self) -> Loaded<CanvasDocument> {
        match self.load_canvas() {
            Ok(value) => Loaded {
                value,
                warning: None,
            },
            Err(e) => {
                tracing::warn!(path = %self.path().display(), error = %e, "falling back to empty canvas");
                Loaded {
                    value: CanvasDocument::default(),
                    warning: Some(e),
                }
            }
        }
    }

    /// Store image bytes for a node and return the generated file name.
    ///
    /// The name keeps the extension of `filename` and never overwrites an existing file.
    pub fn upload_image(&self, filename: &str, bytes: &[u8], node_id: &str) -> Result<String> {
        validate_file_name(node_id, "node id")?;
        fs::create_dir_all(&self.image_dir)?;

        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = format!("{}_{}{}", node_id, random_suffix(), ext);
            let path = self.image_dir.join(&name);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(bytes)?;
            file.sync_all()?;
            tracing::info!(node_id, file = %name, bytes = bytes.len(), "image stored");
            return Ok(name);
        }

        Err(Error::Other(format!(
            "Could not find a free image name for node {}",
            node_id
        )))
    }

    /// Remove one image file. Fails if it does not exist.
    pub fn delete_image(&self, filename: &str) -> Result<()> {
        validate_file_name(filename, "image name")?;
        match fs::remove_file(self.image_dir.join(filename)) {
            Ok(()) => {
                tracing::info!(file = filename, "image deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::NotFound(format!("image {}", filename)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove images that no live node references.
    ///
    /// A file survives when an image node in the stored canvas names it in
    /// `imageFile`, or when its name starts with `<id>_` for one of
    /// `live_node_ids`. Other files with an image extension are removed.
    /// Returns the removed file names, sorted.
    pub fn prune_orphan_images(&self, live_node_ids: &[String]) -> Result<Vec<String>> {
        let canvas = self.load_canvas()?;
        let referenced: HashSet<&str> = canvas.referenced_images();
        let prefixes: Vec<String> = live_node_ids.iter().map(|id| format!("{}_", id)).collect();

        let entries = match fs::read_dir(&self.image_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut removed = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_image_file(&name) || referenced.contains(name.as_str()) {
                continue;
            }
            if prefixes.iter().any(|p| name.starts_with(p.as_str())) {
                continue;
            }

            match fs::remove_file(entry.path()) {
                Ok(()) => removed.push(name),
                Err(e) => tracing::warn!(file = %name, error = %e, "could not remove orphan image"),
            }
        }

        removed.sort();
        if !removed.is_empty() {
            tracing::info!(count = removed.len(), "orphan images pruned");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::canvas::{IMAGE_FILE_KEY, IMAGE_NODE_TYPE};
    use crate::test_utils::TestEnv;
    use serde_json::json;

    fn node(id: &str) -> CanvasNode {
        CanvasNode {
            id: id.to_string(),
            node_type: "note".to_string(),
            ..Default::default()
        }
    }

    fn image_node(id: &str, file: &str) -> CanvasNode {
        let mut n = node(id);
        n.node_type = IMAGE_NODE_TYPE.to_string();
        n.data.insert(IMAGE_FILE_KEY.to_string(), json!(file));
        n
    }

    fn touch(store: &CanvasStore, name: &str) {
        fs::create_dir_all(store.image_dir()).unwrap();
        fs::write(store.image_dir().join(name), b"img").unwrap();
    }

    fn remaining(store: &CanvasStore) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(store.image_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_load_missing_canvas_is_empty() {
        let env = TestEnv::new();
        let canvas = env.storage().canvas().load_canvas().unwrap();
        assert!(canvas.nodes.is_empty());
        assert!(canvas.edges.is_empty());
    }

    #[test]
    fn test_save_fills_parent_id_from_parent() {
        let env = TestEnv::new();
        let store = env.storage().canvas();
        let mut child = node("child");
        child.parent = Some("group".to_string());

        store.save_canvas(vec![child], Vec::new()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["nodes"][0]["parentId"], "group");
        assert_eq!(raw["edges"], json!([]));
    }

    #[test]
    fn test_load_mirrors_parent_fields() {
        let env = TestEnv::new();
        env.write_document(
            crate::storage::CANVAS_FILE,
            r#"{"nodes": [
                {"id": "a", "type": "note", "position": {"x": 0, "y": 0}, "data": {}, "parentId": "g"},
                {"id": "b", "type": "note", "position": {"x": 0, "y": 0}, "data": {}, "parent": "g"},
                {"id": "c", "type": "note", "position": {"x": 0, "y": 0}, "data": null}
            ]}"#,
        );

        let canvas = env.storage().canvas().load_canvas().unwrap();
        for n in &canvas.nodes[..2] {
            assert_eq!(n.parent.as_deref(), Some("g"));
            assert_eq!(n.parent_id.as_deref(), Some("g"));
        }
        assert_eq!(canvas.nodes[2].parent_ref(), None);
        assert!(canvas.edges.is_empty());
    }

    #[test]
    fn test_canvas_round_trip() {
        let env = TestEnv::new();
        let store = env.storage().canvas();
        let mut grouped = node("b");
        grouped.parent = Some("a".to_string());
        grouped.parent_id = Some("a".to_string());
        grouped.width = Some(120.0);
        let edge = CanvasEdge {
            id: "e1".to_string(),
            source: "a".to_string(),
            target: "b".to_string(),
            animated: true,
            ..Default::default()
        };

        store
            .save_canvas(vec![node("a"), grouped.clone()], vec![edge.clone()])
            .unwrap();

        let canvas = store.load_canvas().unwrap();
        assert_eq!(canvas.nodes, vec![node("a"), grouped]);
        assert_eq!(canvas.edges, vec![edge]);
    }

    #[test]
    fn test_upload_image_name_format() {
        let env = TestEnv::new();
        let store = env.storage().canvas();

        let name = store.upload_image("photo.PNG", b"bytes", "node-1").unwrap();

        assert!(name.starts_with("node-1_"));
        assert!(name.ends_with(".PNG"));
        let suffix = &name["node-1_".len()..name.len() - ".PNG".len()];
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fs::read(store.image_dir().join(&name)).unwrap(), b"bytes");
    }

    #[test]
    fn test_upload_image_without_extension() {
        let env = TestEnv::new();
        let name = env
            .storage()
            .canvas()
            .upload_image("blob", b"x", "n1")
            .unwrap();
        assert_eq!(name.len(), "n1_".len() + 8);
    }

    #[test]
    fn test_upload_twice_yields_distinct_names() {
        let env = TestEnv::new();
        let store = env.storage().canvas();
        let a = store.upload_image("a.png", b"1", "n1").unwrap();
        let b = store.upload_image("a.png", b"2", "n1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_upload_rejects_node_id_with_separator() {
        let env = TestEnv::new();
        let err = env
            .storage()
            .canvas()
            .upload_image("a.png", b"1", "../evil")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_delete_image() {
        let env = TestEnv::new();
        let store = env.storage().canvas();
        let name = store.upload_image("a.png", b"1", "n1").unwrap();

        store.delete_image(&name).unwrap();
        assert!(!store.image_dir().join(&name).exists());

        let err = store.delete_image(&name).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("a.jpg"));
        assert!(is_image_file("a.JPEG"));
        assert!(is_image_file("a.webp"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("png"));
    }

    #[test]
    fn test_prune_without_image_dir_is_noop() {
        let env = TestEnv::new();
        let removed = env.storage().canvas().prune_orphan_images(&[]).unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn test_prune_keeps_referenced_and_prefixed_files() {
        let env = TestEnv::new();
        let store = env.storage().canvas();
        store
            .save_canvas(
                vec![image_node("img1", "img1_aaaaaaaa.png"), node("note1")],
                Vec::new(),
            )
            .unwrap();

        touch(&store, "img1_aaaaaaaa.png"); // referenced by imageFile
        touch(&store, "live_bbbbbbbb.jpg"); // prefixed by a live id
        touch(&store, "gone_cccccccc.gif"); // orphan
        touch(&store, "stale_dddddddd.webp"); // orphan
        touch(&store, "readme.txt"); // not an image

        let removed = store
            .prune_orphan_images(&["live".to_string(), "note1".to_string()])
            .unwrap();

        assert_eq!(removed, vec!["gone_cccccccc.gif", "stale_dddddddd.webp"]);
        assert_eq!(
            remaining(&store),
            vec!["img1_aaaaaaaa.png", "live_bbbbbbbb.jpg", "readme.txt"]
        );
    }

    #[test]
    fn test_prune_ignores_image_file_on_non_image_nodes() {
        let env = TestEnv::new();
        let store = env.storage().canvas();
        let mut not_image = node("n1");
        not_image
            .data
            .insert(IMAGE_FILE_KEY.to_string(), json!("x_11111111.png"));
        store.save_canvas(vec![not_image], Vec::new()).unwrap();
        touch(&store, "x_11111111.png");

        let removed = store.prune_orphan_images(&[]).unwrap();
        assert_eq!(removed, vec!["x_11111111.png"]);
    }

    #[test]
    fn test_prune_refuses_on_malformed_canvas() {
        let env = TestEnv::new();
        env.write_document(crate::storage::CANVAS_FILE, "{broken");
        let store = env.storage().canvas();
        touch(&store, "orphan_00000000.png");

        assert!(store.prune_orphan_images(&[]).is_err());
        assert_eq!(remaining(&store), vec!["orphan_00000000.png"]);
    }
}
