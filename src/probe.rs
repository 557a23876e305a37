//! Image dimension probing
//!
//! Reads only as much of a file's header as needed to recover encoded
//! width and height; no full decode. Probe failures are recoverable: the
//! tree builder substitutes sentinel dimensions and keeps scanning.

use std::path::Path;
use thiserror::Error;

use crate::models::Dimensions;

/// A failed dimension probe.
///
/// Always contained locally by the caller; never aborts a scan.
#[derive(Debug, Error)]
#[error("failed to probe {path}: {source}")]
pub struct ProbeError {
    /// Path of the asset that could not be probed
    pub path: String,
    #[source]
    source: imagesize::ImageError,
}

/// Probe an image file's header for its pixel dimensions.
///
/// Orientation is derived from the result: wider than tall is landscape,
/// taller than wide is portrait, equal is square.
pub fn probe(path: &Path) -> Result<Dimensions, ProbeError> {
    match imagesize::size(path) {
        Ok(size) => Ok(Dimensions::new(size.width as u64, size.height as u64)),
        Err(source) => Err(ProbeError {
            path: path.to_string_lossy().into_owned(),
            source,
        }),
    }
}

/// Minimal PNG: signature + IHDR chunk, padded with zero bytes to the
/// requested length. Enough header for a dimension probe.
#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32, pad_to: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    // bit depth, color type, compression, filter, interlace
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    // chunk CRC, not validated by a header probe
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    while bytes.len() < pad_to {
        bytes.push(0);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Orientation;
    use std::io::Write;

    fn write_temp(name: &str, bytes: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        (dir, path)
    }

    #[test]
    fn test_probe_landscape() {
        let (_dir, path) = write_temp("wide.png", &png_bytes(100, 50, 0));
        let dims = probe(&path).unwrap();
        assert_eq!(dims.width, Some(100));
        assert_eq!(dims.height, Some(50));
        assert_eq!(dims.orientation, Orientation::Landscape);
    }

    #[test]
    fn test_probe_portrait() {
        let (_dir, path) = write_temp("tall.png", &png_bytes(50, 100, 0));
        let dims = probe(&path).unwrap();
        assert_eq!(dims.orientation, Orientation::Portrait);
    }

    #[test]
    fn test_probe_square() {
        let (_dir, path) = write_temp("square.png", &png_bytes(80, 80, 0));
        let dims = probe(&path).unwrap();
        assert_eq!(dims.orientation, Orientation::Square);
    }

    #[test]
    fn test_probe_rejects_non_image_bytes() {
        let (_dir, path) = write_temp("fake.jpg", b"this is not an image at all");
        let err = probe(&path).unwrap_err();
        assert!(err.path.contains("fake.jpg"));
    }

    #[test]
    fn test_probe_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe(&dir.path().join("absent.png")).is_err());
    }
}
