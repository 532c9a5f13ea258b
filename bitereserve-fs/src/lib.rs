//! Capability-based UTF-8 file helpers shared by the BiteReserve crates.
//!
//! Paths supplied by operators (alias overlays, SQLite databases) are opened
//! through `cap-std` so each access is scoped to the directory that holds it.
#![forbid(unsafe_code)]

use std::io::{self, Read};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

/// Open the directory containing `path` and return it with the file name.
///
/// A bare file name resolves against the current directory.
pub fn open_parent_dir(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Read a whole UTF-8 text file.
pub fn read_utf8_file(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_parent_dir(path)?;
    let mut file = dir.open(name.as_str())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Whether `path` names an existing regular file.
///
/// A missing file or parent directory yields `Ok(false)`.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_parent_dir(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
    }

    #[rstest]
    fn reads_existing_files() {
        let dir = TempDir::new().expect("temp dir");
        let path = utf8(&dir).join("aliases.json");
        std::fs::write(&path, "{\"aliases\":{}}").expect("write file");
        assert_eq!(read_utf8_file(&path).expect("read"), "{\"aliases\":{}}");
        assert!(file_is_file(&path).expect("stat"));
    }

    #[rstest]
    fn missing_paths_are_not_files() {
        let dir = TempDir::new().expect("temp dir");
        let root = utf8(&dir);
        assert!(!file_is_file(&root.join("absent.json")).expect("stat"));
        assert!(!file_is_file(&root.join("nope/absent.json")).expect("stat"));
        assert!(!file_is_file(&root).expect("directories are not files"));
    }
}
