//! Core data models for the media index tree

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Media kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Image files (jpg, png, webp, etc.)
    Image,
    /// Video files (mp4, mkv, webm, etc.)
    Video,
    /// Anything else
    Other,
}

impl MediaKind {
    /// Classify a file extension (case-insensitive, without the dot).
    ///
    /// Pure and total: extensions outside the image and video sets are
    /// `Other`.
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.to_lowercase();
        match ext_lower.as_str() {
            // Image extensions
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" | "tiff" | "tif" => MediaKind::Image,
            // Video extensions
            "mp4" | "mkv" | "avi" | "wmv" | "flv" | "mov" | "webm" | "m4v" | "ts" | "rmvb" => {
                MediaKind::Video
            }
            _ => MediaKind::Other,
        }
    }

    /// Classify a path by its extension. Paths without an extension are
    /// `Other`.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(MediaKind::Other)
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Other => "other",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Image orientation, derived by comparing width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Width greater than height
    Landscape,
    /// Height greater than width
    Portrait,
    /// Width equal to height
    Square,
    /// No probe was attempted, or the probe failed
    #[default]
    Unknown,
}

impl Orientation {
    /// Derive the orientation from pixel dimensions.
    pub fn from_dimensions(width: u64, height: u64) -> Self {
        match width.cmp(&height) {
            std::cmp::Ordering::Greater => Orientation::Landscape,
            std::cmp::Ordering::Less => Orientation::Portrait,
            std::cmp::Ordering::Equal => Orientation::Square,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
            Orientation::Unknown => "unknown",
        }
    }
}

/// Pixel dimensions of an image asset.
///
/// `width`/`height` are `None` when no probe was attempted or the probe
/// failed; that serializes as JSON `null`, the wire sentinel consumers
/// expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Dimensions {
    /// Width in pixels
    pub width: Option<u64>,
    /// Height in pixels
    pub height: Option<u64>,
    /// Orientation derived from width and height
    pub orientation: Orientation,
}

impl Dimensions {
    /// Create dimensions from a successful probe.
    pub fn new(width: u64, height: u64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            orientation: Orientation::from_dimensions(width, height),
        }
    }

    /// The sentinel value for unprobed or unprobeable assets.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether a probe populated this value.
    pub fn is_known(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

/// One entry in a scanned tree: a directory or an asset.
///
/// Serialized with an explicit `type` discriminant so the snapshot file and
/// the API payload share one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileNode {
    /// A directory with children
    Directory(DirectoryNode),
    /// A regular file
    #[serde(rename = "file")]
    Asset(AssetNode),
}

impl FileNode {
    /// Node name (last path component)
    pub fn name(&self) -> &str {
        match self {
            FileNode::Directory(d) => &d.name,
            FileNode::Asset(a) => &a.name,
        }
    }

    /// Root-relative pathname
    pub fn pathname(&self) -> &str {
        match self {
            FileNode::Directory(d) => &d.pathname,
            FileNode::Asset(a) => &a.pathname,
        }
    }

    /// Identity digest of the node's absolute path
    pub fn hash(&self) -> &str {
        match self {
            FileNode::Directory(d) => &d.hash,
            FileNode::Asset(a) => &a.hash,
        }
    }

    /// Creation timestamp in epoch milliseconds
    pub fn timestamp(&self) -> i64 {
        match self {
            FileNode::Directory(d) => d.timestamp,
            FileNode::Asset(a) => a.timestamp,
        }
    }

    /// Byte size: raw length for assets, aggregate for directories
    pub fn size(&self) -> u64 {
        match self {
            FileNode::Directory(d) => d.size,
            FileNode::Asset(a) => a.size,
        }
    }

    /// Whether this node is a directory
    pub fn is_directory(&self) -> bool {
        matches!(self, FileNode::Directory(_))
    }

    /// Borrow the directory variant, if any
    pub fn as_directory(&self) -> Option<&DirectoryNode> {
        match self {
            FileNode::Directory(d) => Some(d),
            FileNode::Asset(_) => None,
        }
    }

    /// Borrow the asset variant, if any
    pub fn as_asset(&self) -> Option<&AssetNode> {
        match self {
            FileNode::Directory(_) => None,
            FileNode::Asset(a) => Some(a),
        }
    }
}

/// A scanned directory and its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// Directory name
    pub name: String,
    /// Path relative to the scan root, with a leading slash
    pub pathname: String,
    /// Identity digest of the absolute path
    pub hash: String,
    /// Creation time, epoch milliseconds
    pub timestamp: i64,
    /// Aggregate byte count of all descendant assets.
    ///
    /// Computed after the children are scanned; never the directory entry's
    /// own metadata size.
    pub size: u64,
    /// Children in directory-enumeration order
    pub files: Vec<FileNode>,
}

/// A scanned media asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetNode {
    /// File name
    pub name: String,
    /// Path relative to the scan root, with a leading slash
    pub pathname: String,
    /// Identity digest of the absolute path
    pub hash: String,
    /// Creation time, epoch milliseconds
    pub timestamp: i64,
    /// Raw byte length from filesystem metadata
    pub size: u64,
    /// Root-relative URL usable by a static file server
    pub url: String,
    /// Media kind, determined solely by extension
    #[serde(rename = "file")]
    pub media_kind: MediaKind,
    /// Pixel dimensions; sentinel unless the asset is a successfully probed
    /// image
    pub dimensions: Dimensions,
}

/// Totals computed over a finished tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Total number of asset nodes
    pub total_files: u64,
    /// Total number of directory nodes
    pub total_dirs: u64,
    /// Image asset count
    pub image_count: u64,
    /// Video asset count
    pub video_count: u64,
    /// Other asset count
    pub other_count: u64,
    /// Total bytes across all assets
    pub total_bytes: u64,
    /// Scan duration in milliseconds
    pub duration_ms: u64,
}

impl ScanSummary {
    /// Tally a finished tree.
    pub fn from_nodes(nodes: &[FileNode], duration_ms: u64) -> Self {
        let mut summary = Self {
            duration_ms,
            ..Default::default()
        };
        summary.tally(nodes);
        summary.total_bytes = nodes.iter().map(FileNode::size).sum();
        summary
    }

    fn tally(&mut self, nodes: &[FileNode]) {
        for node in nodes {
            match node {
                FileNode::Directory(dir) => {
                    self.total_dirs += 1;
                    self.tally(&dir.files);
                }
                FileNode::Asset(asset) => {
                    self.total_files += 1;
                    match asset.media_kind {
                        MediaKind::Image => self.image_count += 1,
                        MediaKind::Video => self.video_count += 1,
                        MediaKind::Other => self.other_count += 1,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str, size: u64, media_kind: MediaKind) -> FileNode {
        FileNode::Asset(AssetNode {
            name: name.to_string(),
            pathname: format!("/{name}"),
            hash: "00".repeat(32),
            timestamp: 1_700_000_000_000,
            size,
            url: format!("/static/{name}"),
            media_kind,
            dimensions: Dimensions::unknown(),
        })
    }

    #[test]
    fn test_media_kind_from_extension() {
        assert_eq!(MediaKind::from_extension("jpg"), MediaKind::Image);
        assert_eq!(MediaKind::from_extension("JPEG"), MediaKind::Image);
        assert_eq!(MediaKind::from_extension("webp"), MediaKind::Image);
        assert_eq!(MediaKind::from_extension("mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_extension("MKV"), MediaKind::Video);
        assert_eq!(MediaKind::from_extension("webm"), MediaKind::Video);
        assert_eq!(MediaKind::from_extension("txt"), MediaKind::Other);
        assert_eq!(MediaKind::from_extension(""), MediaKind::Other);
    }

    #[test]
    fn test_media_kind_from_path() {
        assert_eq!(
            MediaKind::from_path(Path::new("/a/photo.PNG")),
            MediaKind::Image
        );
        assert_eq!(
            MediaKind::from_path(Path::new("/a/clip.mov")),
            MediaKind::Video
        );
        assert_eq!(MediaKind::from_path(Path::new("/a/README")), MediaKind::Other);
    }

    #[test]
    fn test_orientation_from_dimensions() {
        assert_eq!(Orientation::from_dimensions(100, 50), Orientation::Landscape);
        assert_eq!(Orientation::from_dimensions(50, 100), Orientation::Portrait);
        assert_eq!(Orientation::from_dimensions(80, 80), Orientation::Square);
    }

    #[test]
    fn test_dimensions_sentinel() {
        let d = Dimensions::unknown();
        assert!(!d.is_known());
        assert_eq!(d.orientation, Orientation::Unknown);
        assert_eq!(
            serde_json::to_string(&d).unwrap(),
            r#"{"width":null,"height":null,"orientation":"unknown"}"#
        );
    }

    #[test]
    fn test_dimensions_known() {
        let d = Dimensions::new(100, 50);
        assert!(d.is_known());
        assert_eq!(d.orientation, Orientation::Landscape);
    }

    #[test]
    fn test_asset_wire_shape() {
        let node = FileNode::Asset(AssetNode {
            name: "a.jpg".to_string(),
            pathname: "/a.jpg".to_string(),
            hash: "ab".repeat(32),
            timestamp: 1_700_000_000_000,
            size: 200,
            url: "/static/a.jpg".to_string(),
            media_kind: MediaKind::Image,
            dimensions: Dimensions::new(100, 50),
        });

        let json: serde_json::Value = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["name"], "a.jpg");
        assert_eq!(json["pathname"], "/a.jpg");
        assert_eq!(json["size"], 200);
        assert_eq!(json["url"], "/static/a.jpg");
        assert_eq!(json["file"], "image");
        assert_eq!(json["dimensions"]["width"], 100);
        assert_eq!(json["dimensions"]["height"], 50);
        assert_eq!(json["dimensions"]["orientation"], "landscape");
    }

    #[test]
    fn test_directory_wire_shape() {
        let node = FileNode::Directory(DirectoryNode {
            name: "sub".to_string(),
            pathname: "/sub".to_string(),
            hash: "cd".repeat(32),
            timestamp: 1_700_000_000_000,
            size: 300,
            files: vec![asset("c.png", 300, MediaKind::Image)],
        });

        let json: serde_json::Value = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "directory");
        assert_eq!(json["name"], "sub");
        assert_eq!(json["size"], 300);
        assert_eq!(json["files"][0]["type"], "file");
    }

    #[test]
    fn test_node_round_trip() {
        let node = FileNode::Directory(DirectoryNode {
            name: "sub".to_string(),
            pathname: "/sub".to_string(),
            hash: "cd".repeat(32),
            timestamp: 42,
            size: 700,
            files: vec![
                asset("b.mp4", 500, MediaKind::Video),
                asset("x.bin", 200, MediaKind::Other),
            ],
        });

        let json = serde_json::to_string(&node).unwrap();
        let back: FileNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn test_summary_from_nodes() {
        let tree = vec![
            asset("a.jpg", 200, MediaKind::Image),
            asset("b.mp4", 500, MediaKind::Video),
            FileNode::Directory(DirectoryNode {
                name: "sub".to_string(),
                pathname: "/sub".to_string(),
                hash: "cd".repeat(32),
                timestamp: 0,
                size: 300,
                files: vec![asset("c.png", 300, MediaKind::Image)],
            }),
        ];

        let summary = ScanSummary::from_nodes(&tree, 12);
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.total_dirs, 1);
        assert_eq!(summary.image_count, 2);
        assert_eq!(summary.video_count, 1);
        assert_eq!(summary.other_count, 0);
        assert_eq!(summary.total_bytes, 1000);
        assert_eq!(summary.duration_ms, 12);
    }
}
