//! Atomic file persistence

use crate::ReportError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `contents` to `path` through a sibling temporary file.
///
/// The final path either keeps its previous contents or holds the complete
/// new contents. Parent directories are created as needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp = temp_sibling(path);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result.map_err(io_err)
}

/// Persist several files so that either all of them are replaced or none is.
///
/// Every file is first staged as a synced temporary sibling. Only when all
/// of them are staged are they renamed into place; a failed rename removes
/// the files already renamed by this call.
pub fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<(), ReportError> {
    let mut staged: Vec<(&Path, PathBuf)> = Vec::with_capacity(files.len());

    for &(path, contents) in files {
        if let Err(e) = stage(path, contents) {
            for (_, tmp) in &staged {
                let _ = fs::remove_file(tmp);
            }
            return Err(e);
        }
        staged.push((path, temp_sibling(path)));
    }

    for (idx, (path, tmp)) in staged.iter().enumerate() {
        if let Err(source) = fs::rename(tmp, path) {
            for (done, _) in &staged[..idx] {
                let _ = fs::remove_file(done);
            }
            for (_, pending) in &staged[idx..] {
                let _ = fs::remove_file(pending);
            }
            return Err(ReportError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    }
    Ok(())
}

/// Write `contents` to the temporary sibling of `path`
fn stage(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    if path.is_dir() {
        return Err(io_err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "Is a directory",
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp = temp_sibling(path);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result.map_err(io_err)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("results").join("table.csv");

        write_atomic(&path, b"mode,threads\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "mode,threads\n");
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("chart.svg");

        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_all_persists_every_file() {
        let tmp = TempDir::new().unwrap();
        let table = tmp.path().join("table.csv");
        let chart = tmp.path().join("charts").join("chart.svg");

        write_all_atomic(&[
            (table.as_path(), b"rows".as_slice()),
            (chart.as_path(), b"<svg/>".as_slice()),
        ]).unwrap();

        assert_eq!(fs::read_to_string(&table).unwrap(), "rows");
        assert_eq!(fs::read_to_string(&chart).unwrap(), "<svg/>");
    }

    #[test]
    fn test_write_all_leaves_nothing_when_one_target_fails() {
        let tmp = TempDir::new().unwrap();
        let table = tmp.path().join("table.csv");
        let chart = tmp.path().join("occupied");
        fs::create_dir_all(&chart).unwrap();

        let err = write_all_atomic(&[
            (table.as_path(), b"rows".as_slice()),
            (chart.as_path(), b"<svg/>".as_slice()),
        ]).unwrap_err();

        assert!(err.to_string().contains("occupied"));
        assert!(!table.exists());
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("occupied")]);
    }

    #[test]
    fn test_unwritable_target_reports_path() {
        let tmp = TempDir::new().unwrap();
        // A directory cannot be replaced by a file rename
        let path = tmp.path().join("occupied");
        fs::create_dir_all(path.join("inner")).unwrap();

        let err = write_atomic(&path, b"data").unwrap_err();
        assert!(err.to_string().contains("occupied"));
    }
}
