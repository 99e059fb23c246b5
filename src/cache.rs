//! Shared file cache for converted images.
//!
//! Every file the editor hands out (PNG encodings of inbound images for the
//! `filepath` type, and every outbound image) is written here. Client code
//! and the hosting server only ever see paths inside this directory.
//!
//! # Design
//!
//! The cache is **content-addressed**: a blob whose SHA-256 digest is `h` and
//! whose file name is `n` lives at `<root>/<h>/<n>`. Two requests that produce
//! the same bytes share one file. Blobs are written to a temp file in the
//! digest directory and renamed into place, so readers never see a partial
//! file and no locking is needed. An existing blob whose contents no longer
//! match its digest is rewritten.
//!
//! Keeping the original file name as the last path component lets the client
//! offer a sensible name on download.
//!
//! ## Location
//!
//! 1. an explicit directory passed to [`FileCache::new`]
//! 2. the `IMAGE_EDITOR_CACHE_DIR` environment variable
//! 3. `<system temp dir>/image-editor`

use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Environment variable overriding the default cache root.
pub const CACHE_DIR_ENV: &str = "IMAGE_EDITOR_CACHE_DIR";

/// File name given to images encoded by the editor itself.
pub const ENCODED_IMAGE_NAME: &str = "image.png";

#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Cache rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache rooted at `IMAGE_EDITOR_CACHE_DIR`, falling back to a directory
    /// under the system temp dir.
    pub fn from_env() -> Self {
        match std::env::var_os(CACHE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(std::env::temp_dir().join("image-editor")),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` under `file_name`, returning the cached path.
    ///
    /// Identical bytes stored under the same name map to the same path; an
    /// intact existing file is left untouched.
    pub fn store_bytes(&self, bytes: &[u8], file_name: &str) -> io::Result<PathBuf> {
        let digest = hash_bytes(bytes);
        let path = self.blob_path(&digest, file_name)?;
        write_blob(&path, &digest, |tmp| tmp.write_all(bytes))?;
        Ok(path)
    }

    /// Copy the file at `source` into the cache, keeping its file name.
    ///
    /// Files already inside the cache are returned as they are.
    pub fn store_file(&self, source: &Path) -> io::Result<PathBuf> {
        if self.contains(source) {
            return Ok(source.to_path_buf());
        }
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no usable file name", source.display()),
                )
            })?;
        let digest = hash_file(source)?;
        let path = self.blob_path(&digest, file_name)?;
        write_blob(&path, &digest, |tmp| {
            io::copy(&mut File::open(source)?, tmp).map(|_| ())
        })?;
        Ok(path)
    }

    /// Whether `path` lies inside the cache root.
    ///
    /// Both sides are resolved through symlinks when they exist. A path that
    /// still contains `..` after resolution is never inside the cache.
    pub fn contains(&self, path: &Path) -> bool {
        let resolve = |p: &Path| fs::canonicalize(p).or_else(|_| std::path::absolute(p));
        match (resolve(path), resolve(&self.root)) {
            (Ok(path), Ok(root)) => {
                !path.components().any(|c| c == Component::ParentDir) && path.starts_with(root)
            }
            _ => false,
        }
    }

    fn blob_path(&self, digest: &str, file_name: &str) -> io::Result<PathBuf> {
        let name = Path::new(file_name);
        // Only a bare file name is allowed, so nothing escapes the digest dir.
        if name.file_name() != Some(name.as_os_str()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid cache file name: {file_name:?}"),
            ));
        }
        Ok(self.root.join(digest).join(name))
    }
}

/// Write a blob through a temp file in its digest directory and rename it to
/// `path`. An existing file is kept only if it still hashes to `digest`.
fn write_blob(
    path: &Path,
    digest: &str,
    fill: impl FnOnce(&mut NamedTempFile) -> io::Result<()>,
) -> io::Result<()> {
    if path.is_file() && hash_file(path)? == digest {
        return Ok(());
    }
    let dir = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no parent directory", path.display()),
        )
    })?;
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    fill(&mut tmp)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// SHA-256 hash of a byte slice, returned as a hex string.
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(hash_bytes(&bytes))
}
