//! Staging-directory lifecycle for bundle construction.
//!
//! A bundle is assembled in a directory whose name is derived from the
//! asset name. Acquisition is idempotent: a directory left behind by a
//! prior run is reused after its two known member files are removed, so
//! repeated builds under the same name are safe to re-run. Release is
//! best-effort; the cleanup state after a failed build is unspecified.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::BuildError;
use crate::metadata::{METADATA_FILE_NAME, PROPERTIES_FILE_NAME};

/// Suffix appended to the derived directory name.
const STAGING_SUFFIX: &str = "_ipfs";

/// Directory name derived from an asset name: spaces become underscores,
/// then the staging suffix is appended.
pub fn dir_name_for(name: &str) -> String {
    format!("{}{}", name.replace(' ', "_"), STAGING_SUFFIX)
}

/// A staging directory holding the two bundle member files.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    /// Acquire the staging directory for `name` under `root`.
    ///
    /// If the derived path already exists as a directory it is reused:
    /// the two known member files are removed (absence tolerated) and
    /// anything else in it is left alone. A pre-existing non-directory
    /// at the path fails the acquisition rather than destroying foreign
    /// data. Afterwards the directory exists and contains neither
    /// member file.
    ///
    /// # Errors
    ///
    /// [`BuildError::Staging`] when the directory cannot be created or
    /// a stale member file cannot be removed.
    pub fn acquire(root: &Path, name: &str) -> Result<Self, BuildError> {
        let path = root.join(dir_name_for(name));
        if path.exists() {
            if !path.is_dir() {
                return Err(BuildError::staging(
                    &path,
                    io::Error::other("staging path exists and is not a directory"),
                ));
            }
            debug!(dir = %path.display(), "reusing staging directory from a prior run");
            let staged = Self { path };
            staged.remove_member(&staged.properties_path())?;
            staged.remove_member(&staged.metadata_path())?;
            return Ok(staged);
        }

        fs::create_dir_all(&path).map_err(|e| BuildError::staging(&path, e))?;
        Ok(Self { path })
    }

    /// The staging directory itself.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the properties file within the staging directory.
    pub fn properties_path(&self) -> PathBuf {
        self.path.join(PROPERTIES_FILE_NAME)
    }

    /// Path of the metadata file within the staging directory.
    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_FILE_NAME)
    }

    /// Remove both member files and the then-empty directory.
    ///
    /// Best-effort reverse of acquisition, used once the bundle has been
    /// published. Failures are logged at debug level and swallowed; a
    /// directory still holding foreign files is left in place.
    pub fn release(self) {
        for member in [self.properties_path(), self.metadata_path()] {
            if let Err(err) = fs::remove_file(&member) {
                if err.kind() != io::ErrorKind::NotFound {
                    debug!(path = %member.display(), error = %err, "failed to remove staged file");
                }
            }
        }
        if let Err(err) = fs::remove_dir(&self.path) {
            debug!(path = %self.path.display(), error = %err, "failed to remove staging directory");
        }
    }

    /// Remove one member file, tolerating absence.
    fn remove_member(&self, path: &Path) -> Result<(), BuildError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(BuildError::staging(path, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_name_replaces_spaces() {
        assert_eq!(dir_name_for("My Asset"), "My_Asset_ipfs");
        assert_eq!(dir_name_for("plain"), "plain_ipfs");
        assert_eq!(dir_name_for("a b c"), "a_b_c_ipfs");
        assert_eq!(dir_name_for(""), "_ipfs");
    }

    #[test]
    fn test_acquire_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let staged = StagingDir::acquire(tmp.path(), "My Asset").unwrap();
        assert!(staged.path().is_dir());
        assert_eq!(staged.path(), tmp.path().join("My_Asset_ipfs"));
    }

    #[test]
    fn test_acquire_reuses_and_clears_members() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("My_Asset_ipfs");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(PROPERTIES_FILE_NAME), b"stale").unwrap();
        fs::write(dir.join(METADATA_FILE_NAME), b"stale").unwrap();
        fs::write(dir.join("unrelated.txt"), b"keep me").unwrap();

        let staged = StagingDir::acquire(tmp.path(), "My Asset").unwrap();
        assert!(!staged.properties_path().exists());
        assert!(!staged.metadata_path().exists());
        // Foreign content is not resurrected or destroyed.
        assert!(dir.join("unrelated.txt").exists());
    }

    #[test]
    fn test_acquire_tolerates_missing_members() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("My_Asset_ipfs")).unwrap();

        // Directory exists but holds neither member file.
        StagingDir::acquire(tmp.path(), "My Asset").unwrap();
    }

    #[test]
    fn test_acquire_rejects_non_directory() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("My_Asset_ipfs"), b"a file").unwrap();

        let err = StagingDir::acquire(tmp.path(), "My Asset").unwrap_err();
        assert!(matches!(err, BuildError::Staging { .. }));
    }

    #[test]
    fn test_release_removes_members_and_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let staged = StagingDir::acquire(tmp.path(), "x").unwrap();
        fs::write(staged.properties_path(), b"{}").unwrap();
        fs::write(staged.metadata_path(), b"{}").unwrap();
        let dir = staged.path().to_path_buf();

        staged.release();
        assert!(!dir.exists());
    }

    #[test]
    fn test_release_leaves_directory_with_foreign_files() {
        let tmp = tempfile::tempdir().unwrap();
        let staged = StagingDir::acquire(tmp.path(), "x").unwrap();
        fs::write(staged.path().join("unrelated.txt"), b"keep").unwrap();
        let dir = staged.path().to_path_buf();

        staged.release();
        assert!(dir.exists());
        assert!(dir.join("unrelated.txt").exists());
    }
}
