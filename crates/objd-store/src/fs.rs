use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::key::ObjectKey;
use crate::traits::DurableLayer;

const PARTIAL_PREFIX: &str = ".objd-";
const PARTIAL_SUFFIX: &str = ".partial";

/// Filesystem durable layer: one file per object, named exactly by its key,
/// directly under `root`.
///
/// Writes go to a hidden temporary file in the same directory, are synced,
/// then linked into place without clobbering. A reader therefore sees either
/// no file or the complete body.
#[derive(Debug, Clone)]
pub struct FsDurable {
    root: PathBuf,
}

impl FsDurable {
    /// Use `root` as-is. The directory must already exist for writes and
    /// listings to succeed.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create `root` (and parents) if missing, then use it.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &ObjectKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    fn write_new(&self, key: &ObjectKey, data: &[u8]) -> io::Result<()> {
        let mut tmp = tempfile::Builder::new()
            .prefix(PARTIAL_PREFIX)
            .suffix(PARTIAL_SUFFIX)
            .tempfile_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        // Dropping the PersistError drops the temp file, which removes it.
        tmp.persist_noclobber(self.object_path(key))
            .map_err(|e| e.error)?;
        Ok(())
    }
}

impl DurableLayer for FsDurable {
    fn put(&self, key: &ObjectKey, data: &[u8]) -> StoreResult<()> {
        self.write_new(key, data).map_err(|source| {
            if source.kind() == io::ErrorKind::AlreadyExists {
                StoreError::AlreadyExists(key.clone())
            } else {
                StoreError::DurableWrite {
                    key: key.clone(),
                    source,
                }
            }
        })
    }

    fn get(&self, key: &ObjectKey) -> StoreResult<Option<Bytes>> {
        match fs::read(self.object_path(key)) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::DurableRead {
                key: key.clone(),
                source,
            }),
        }
    }

    fn list(&self) -> StoreResult<Vec<ObjectKey>> {
        let list_err = |source: io::Error| StoreError::DurableList {
            root: self.root.clone(),
            source,
        };

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            // Follow symlinks, as `get` does through `fs::read`.
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => continue,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %entry.path().display(), "skipping dangling symlink");
                    continue;
                }
                Err(source) => return Err(list_err(source)),
            }
            let Ok(name) = entry.file_name().into_string() else {
                debug!(path = %entry.path().display(), "skipping non-UTF-8 file name");
                continue;
            };
            match ObjectKey::parse(name) {
                Ok(key) => keys.push(key),
                Err(e) => debug!(error = %e, "skipping file that is not an object"),
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn contains(&self, key: &ObjectKey) -> StoreResult<bool> {
        match fs::metadata(self.object_path(key)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::DurableRead {
                key: key.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> ObjectKey {
        ObjectKey::parse(name).unwrap()
    }

    fn temp_layer() -> (tempfile::TempDir, FsDurable) {
        let dir = tempfile::tempdir().unwrap();
        let layer = FsDurable::new(dir.path());
        (dir, layer)
    }

    #[test]
    fn put_writes_file_named_by_key() {
        let (dir, layer) = temp_layer();
        layer.put(&key("report.txt"), b"hello").unwrap();
        assert_eq!(fs::read(dir.path().join("report.txt")).unwrap(), b"hello");
    }

    #[test]
    fn put_leaves_no_partial_files() {
        let (dir, layer) = temp_layer();
        layer.put(&key("a"), b"data").unwrap();
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn put_refuses_overwrite() {
        let (dir, layer) = temp_layer();
        layer.put(&key("a"), b"first").unwrap();
        let err = layer.put(&key("a"), b"second").unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        assert_eq!(fs::read(dir.path().join("a")).unwrap(), b"first");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn put_into_missing_root_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let layer = FsDurable::new(dir.path().join("gone"));
        let err = layer.put(&key("a"), b"x").unwrap_err();
        assert!(matches!(err, StoreError::DurableWrite { .. }));
    }

    #[test]
    fn empty_body_roundtrips() {
        let (_dir, layer) = temp_layer();
        layer.put(&key("empty"), b"").unwrap();
        let body = layer.get(&key("empty")).unwrap().expect("should exist");
        assert!(body.is_empty());
    }

    #[test]
    fn get_missing_returns_none() {
        let (_dir, layer) = temp_layer();
        assert!(layer.get(&key("missing")).unwrap().is_none());
        assert!(!layer.contains(&key("missing")).unwrap());
    }

    #[test]
    fn get_directory_is_read_error() {
        let (dir, layer) = temp_layer();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        let err = layer.get(&key("subdir")).unwrap_err();
        assert!(matches!(err, StoreError::DurableRead { .. }));
        assert!(!layer.contains(&key("subdir")).unwrap());
    }

    #[test]
    fn list_skips_hidden_and_directories() {
        let (dir, layer) = temp_layer();
        layer.put(&key("b"), b"2").unwrap();
        layer.put(&key("a"), b"1").unwrap();
        fs::write(dir.path().join(".objd-stale.partial"), b"junk").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let names: Vec<String> = layer.list().unwrap().into_iter().map(String::from).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn list_picks_up_files_written_externally() {
        let (dir, layer) = temp_layer();
        fs::write(dir.path().join("seeded"), b"from disk").unwrap();
        let keys = layer.list().unwrap();
        assert_eq!(keys, vec![key("seeded")]);
        assert_eq!(layer.get(&key("seeded")).unwrap().unwrap().as_ref(), b"from disk");
    }

    #[test]
    fn list_missing_root_is_list_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("gone");
        let layer = FsDurable::new(&root);
        match layer.list().unwrap_err() {
            StoreError::DurableList { root: reported, .. } => assert_eq!(reported, root),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_objects_are_listed_like_they_are_read() {
        use std::os::unix::fs::symlink;

        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("target");
        fs::write(&target, b"link").unwrap();

        let (dir, layer) = temp_layer();
        symlink(&target, dir.path().join("linked")).unwrap();
        symlink(outside.path().join("missing"), dir.path().join("dangling")).unwrap();

        assert_eq!(layer.list().unwrap(), vec![key("linked")]);
        assert_eq!(layer.get(&key("linked")).unwrap().unwrap().as_ref(), b"link");
        assert!(layer.contains(&key("linked")).unwrap());
        assert!(layer.get(&key("dangling")).unwrap().is_none());
        assert!(!layer.contains(&key("dangling")).unwrap());
    }

    #[test]
    fn open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("storage");
        let layer = FsDurable::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(layer.root(), root.as_path());
        assert!(layer.list().unwrap().is_empty());
    }
}
