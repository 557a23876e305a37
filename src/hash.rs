//! Identity hashing for tree nodes
//!
//! Every node is keyed by the SHA-256 digest of its absolute path string,
//! not its content. Identical path means identical hash; renaming or moving
//! a file changes it. Hashes are therefore stable within one scan but not
//! across relocations.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Compute the lowercase hex SHA-256 digest of a string.
pub fn digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compute the identity digest of a path.
///
/// Non-UTF-8 path components are replaced lossily before hashing, matching
/// how paths are rendered everywhere else in the tree.
pub fn digest_path(path: &Path) -> String {
    digest(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            digest("/media/photos"),
            "3ab6130d037a2d8028db9ef79917140b19c68adcb634c9e19d74014669c3f81d"
        );
        assert_eq!(
            digest("/media/photos/a.jpg"),
            "d438bedc5be2d81a3867073a9ff604c38584e6984f7d91d80559de8baf7d4ed3"
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(digest("/a/b/c"), digest("/a/b/c"));
        assert_eq!(
            digest_path(&PathBuf::from("/a/b/c")),
            digest_path(&PathBuf::from("/a/b/c"))
        );
    }

    #[test]
    fn test_distinct_paths_do_not_collide() {
        let paths = [
            "/", "/a", "/a/", "/a/b", "/a b", "/A", "/a.jpg", "/a.jpeg", "/b/a", "/ab",
        ];
        let digests: HashSet<String> = paths.iter().map(|p| digest(p)).collect();
        assert_eq!(digests.len(), paths.len());
    }

    #[test]
    fn test_digest_format() {
        let d = digest("/media");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    proptest! {
        #[test]
        fn prop_digest_deterministic_and_hex(input in ".*") {
            let a = digest(&input);
            let b = digest(&input);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.len(), 64);
            prop_assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
}
