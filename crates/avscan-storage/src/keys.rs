//! Scan identifiers.

use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Identifier for a scan: `override_id` when set, else the hex SHA-256 of the file.
pub async fn scan_id(path: &Path, override_id: Option<&str>) -> io::Result<String> {
    if let Some(id) = override_id.filter(|id| !id.is_empty()) {
        return Ok(id.to_string());
    }

    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scan_id_hashes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample");
        tokio::fs::write(&path, b"abc").await.unwrap();

        assert_eq!(
            scan_id(&path, None).await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_scan_id_override() {
        let id = scan_id(Path::new("/nonexistent"), Some("scan-42")).await.unwrap();
        assert_eq!(id, "scan-42");
    }

    #[tokio::test]
    async fn test_scan_id_missing_file() {
        assert!(scan_id(Path::new("/nonexistent/sample"), None).await.is_err());
    }
}
