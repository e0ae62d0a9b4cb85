//! Small filesystem wrappers: read, copy, mkdir -p

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::{debug, error};

use crate::error::{Result, UtilError};

/// Read a whole file as UTF-8
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    debug!("read_file: reading {:?}", path);
    fs::read_to_string(path).map_err(|e| {
        error!("Failed to read file {}: {}", path.display(), e);
        UtilError::fs(path, e)
    })
}

/// Copy the bytes of `src` into `dst`, creating or truncating `dst`
pub fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    debug!(?src, ?dst, "copy_file: called");
    let mut reader = File::open(src).map_err(|e| UtilError::fs(src, e))?;
    let mut writer = File::create(dst).map_err(|e| UtilError::fs(dst, e))?;
    io::copy(&mut reader, &mut writer).map_err(|e| UtilError::fs(dst, e))?;
    writer.sync_all().map_err(|e| UtilError::fs(dst, e))
}

/// Create `dir` and any missing parents (mode 0755)
///
/// Fails when `dir` exists but is not a directory.
pub fn mkdir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    debug!(?dir, "mkdir: called");
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            let err = UtilError::NotADirectory { path: dir.to_path_buf() };
            error!("{}", err);
            return Err(err);
        }
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            error!("Failed to stat {}: {}", dir.display(), e);
            return Err(UtilError::fs(dir, e));
        }
        Err(_) => {}
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir).map_err(|e| {
        error!("Failed to mkdir -p {}: {}", dir.display(), e);
        UtilError::fs(dir, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tmpl");
        fs::write(&path, "{{key}}").unwrap();

        assert_eq!(read_file(&path).unwrap(), "{{key}}");
    }

    #[test]
    fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = read_file(temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, UtilError::Filesystem { .. }));
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_copy_file() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src.yml");
        let dst = temp.path().join("dst.yml");
        fs::write(&src, "a: 1\n").unwrap();
        fs::write(&dst, "old content that is longer").unwrap();

        copy_file(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "a: 1\n");
    }

    #[test]
    fn test_copy_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = copy_file(temp.path().join("nope"), temp.path().join("dst")).unwrap_err();
        assert!(err.to_string().contains("nope"));
        assert!(!temp.path().join("dst").exists());
    }

    #[test]
    fn test_mkdir_creates_parents() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b").join("c");

        mkdir(&dir).unwrap();
        assert!(dir.is_dir());

        // existing directory is fine
        mkdir(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_mkdir_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("templates");
        mkdir(&dir).unwrap();

        let mode = fs::metadata(&dir).unwrap().permissions().mode();
        // umask can only remove bits
        assert_eq!(mode & 0o777 & !0o755, 0);
    }

    #[test]
    fn test_mkdir_over_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("taken");
        fs::write(&file, "").unwrap();

        let err = mkdir(&file).unwrap_err();
        assert!(matches!(err, UtilError::NotADirectory { .. }));
        assert!(err.to_string().contains("not a directory"));
    }
}
