use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::debug;
use walkdir::WalkDir;

use crate::constants::catalog::BATCH_FILE_EXTENSION;
use crate::errors::CatalogError;

/// Read a whole file, mapping a missing path to `CatalogError::NotFound`.
pub fn read_file(path: &Path) -> Result<Vec<u8>, CatalogError> {
    fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => CatalogError::NotFound {
            path: path.to_path_buf(),
        },
        _ => CatalogError::Io(err),
    })
}

/// Replace `path` with the bytes produced by `write`, atomically from the caller's view.
///
/// Output goes to a temporary file in the destination directory, is synced, and
/// is then renamed over `path`. On any failure the previous file is untouched and
/// the temporary file is removed. A replaced file keeps its permissions; a new
/// file gets the process umask applied to `NEW_FILE_MODE`.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<(), CatalogError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), CatalogError>,
{
    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(|err| write_error(path, err))?;
    let mut tmp = temp_file_in(&dir).map_err(|err| write_error(path, err))?;
    {
        let mut writer = BufWriter::new(&mut tmp);
        write(&mut writer).map_err(|err| match err {
            CatalogError::Io(err) => write_error(path, err),
            CatalogError::Csv(err) if err.is_io_error() => CatalogError::Write {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
            other => other,
        })?;
        writer.flush().map_err(|err| write_error(path, err))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|err| write_error(path, err))?;
    if let Ok(existing) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), existing.permissions())
            .map_err(|err| write_error(path, err))?;
    }
    tmp.persist(path)
        .map_err(|err| write_error(path, err.error))?;
    debug!(path = %path.display(), "replaced file atomically");
    Ok(())
}

/// All `*.json` files under `root`, in sorted path order.
pub fn json_files_under(root: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|err| CatalogError::Io(err.into()))?;
        if entry.file_type().is_file() && is_json_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(BATCH_FILE_EXTENSION))
        .unwrap_or(false)
}

fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use crate::constants::catalog::NEW_FILE_MODE;
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(NEW_FILE_MODE));
    }
    builder.tempfile_in(dir)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn write_error(path: &Path, err: io::Error) -> CatalogError {
    CatalogError::Write {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_file_reports_missing_paths() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let err = read_file(&missing).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { ref path } if path == &missing));
    }

    #[test]
    fn write_atomic_replaces_contents_and_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_atomic(&path, |w| Ok(w.write_all(b"first")?)).unwrap();
        write_atomic(&path, |w| Ok(w.write_all(b"second")?)).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.path() != path)
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_write_leaves_previous_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, b"original").unwrap();

        let err = write_atomic(&path, |w| {
            w.write_all(b"partial")?;
            Err(CatalogError::Configuration("boom".to_string()))
        })
        .unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));
        assert_eq!(fs::read(&path).unwrap(), b"original");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn io_failures_inside_writer_become_write_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let err = write_atomic(&path, |_| {
            Err(CatalogError::Io(io::Error::other("disk full")))
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Write { ref reason, .. } if reason.contains("disk full")
        ));
        assert!(!path.exists());
    }

    #[test]
    fn csv_io_failures_inside_writer_become_write_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let err = write_atomic(&path, |_| {
            Err(CatalogError::Csv(csv::Error::from(io::Error::other(
                "no space left on device",
            ))))
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Write { ref reason, .. } if reason.contains("no space left")
        ));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn new_files_follow_umask_and_replaced_files_keep_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let reference = dir.path().join("reference.json");
        fs::write(&reference, b"[]").unwrap();
        let umask_mode = fs::metadata(&reference).unwrap().permissions().mode() & 0o777;

        let created = dir.path().join("created.json");
        write_atomic(&created, |w| Ok(w.write_all(b"[]")?)).unwrap();
        let mode = fs::metadata(&created).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, umask_mode);

        fs::set_permissions(&created, fs::Permissions::from_mode(0o640)).unwrap();
        write_atomic(&created, |w| Ok(w.write_all(b"[1]")?)).unwrap();
        let mode = fs::metadata(&created).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn json_files_are_listed_in_sorted_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("b").join("one.json"), b"[]").unwrap();
        fs::write(root.join("a.JSON"), b"[]").unwrap();
        fs::write(root.join("notes.txt"), b"skip").unwrap();

        let files = json_files_under(root).unwrap();
        assert_eq!(
            files,
            vec![root.join("a.JSON"), root.join("b").join("one.json")]
        );
    }
}
