//! # Golden Files
//!
//! Expected outputs stored at `<root>/<test name>/result.golden`. Whatever
//! bytes are on disk are authoritative until rewritten with [`update`].
//!
//! The panicking functions are meant for test bodies: a missing or unwritable
//! golden file fails the running test immediately. The `try_*` methods on
//! [`Golden`] return errors instead.

use crate::config::GoldenConfig;
use crate::errors::{Result, TestingError};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Name of the file inside each per-test directory.
pub const GOLDEN_FILE_NAME: &str = "result.golden";

/// Golden-file store rooted at a directory.
#[derive(Debug, Clone)]
pub struct Golden {
    root: PathBuf,
}

impl Default for Golden {
    fn default() -> Self {
        Self::from_config(&GoldenConfig::default())
    }
}

impl Golden {
    /// Store golden files under `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &GoldenConfig) -> Self {
        Self::new(config.root.clone())
    }

    /// Store rooted at `GOLDEN_ROOT`, or `testdata` when unset
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(&GoldenConfig::from_env()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the golden file of `test_name`.
    pub fn dir_for(&self, test_name: &str) -> Result<PathBuf> {
        let relative = test_name_to_path(test_name)?;
        Ok(self.root.join(relative))
    }

    /// Full path of the golden file of `test_name`.
    pub fn path_for(&self, test_name: &str) -> Result<PathBuf> {
        Ok(self.dir_for(test_name)?.join(GOLDEN_FILE_NAME))
    }

    /// Write `body` as the golden file of `test_name`, creating directories as needed.
    pub fn try_update(&self, test_name: &str, body: &[u8]) -> Result<()> {
        let dir = self.dir_for(test_name)?;
        create_dir_all(&dir).map_err(|e| {
            TestingError::io(e, "golden file directories could not be created and/or found")
        })?;

        let path = dir.join(GOLDEN_FILE_NAME);
        debug!(path = %path.display(), bytes = body.len(), "Writing golden file");
        write_file(&path, body).map_err(|e| {
            TestingError::io(e, format!("golden file {} could not be written", path.display()))
        })
    }

    /// Read the golden file of `test_name`.
    pub fn try_get(&self, test_name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(test_name)?;
        debug!(path = %path.display(), "Reading golden file");
        fs::read(&path).map_err(|e| {
            TestingError::io(e, format!("failed to read golden file {}", path.display()))
        })
    }

    /// Panicking form of [`Golden::try_update`].
    pub fn update(&self, test_name: &str, body: &[u8]) {
        if let Err(e) = self.try_update(test_name, body) {
            panic!("{}", e);
        }
    }

    /// Panicking form of [`Golden::try_get`].
    pub fn get(&self, test_name: &str) -> Vec<u8> {
        self.try_get(test_name).unwrap_or_else(|e| panic!("{}", e))
    }
}

fn env_store() -> Golden {
    Golden::from_env().unwrap_or_else(|e| panic!("{}", e))
}

/// Write the golden file of `test_name`, failing the test on error.
///
/// Files live under `GOLDEN_ROOT`, `testdata` by default.
pub fn update(test_name: &str, body: &[u8]) {
    env_store().update(test_name, body)
}

/// Read the golden file of `test_name`, failing the test on error.
pub fn get(test_name: &str) -> Vec<u8> {
    env_store().get(test_name)
}

/// [`update`] keyed by [`current_test_name`].
pub fn update_current(body: &[u8]) {
    update(&current_test_name(), body)
}

/// [`get`] keyed by [`current_test_name`].
pub fn get_current() -> Vec<u8> {
    get(&current_test_name())
}

/// Name of the running test, taken from the libtest thread name.
///
/// Module separators become path separators, so `api::users::lists_all`
/// stores its golden file at `testdata/api/users/lists_all/result.golden`.
///
/// Panics on `main` or an unnamed thread; pass an explicit name to
/// [`update`]/[`get`] there.
pub fn current_test_name() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) if name != "main" => name.replace("::", "/"),
        _ => panic!(
            "current_test_name must be called from a test thread; pass the test name explicitly"
        ),
    }
}

fn test_name_to_path(test_name: &str) -> Result<PathBuf> {
    if test_name.trim().is_empty() {
        return Err(TestingError::validation_field("test name cannot be empty", "test_name"));
    }

    let path = Path::new(test_name);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(TestingError::validation_field(
            format!("test name '{}' must be a relative path without '..'", test_name),
            "test_name",
        ));
    }

    Ok(path.to_path_buf())
}

#[cfg(unix)]
fn create_dir_all(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o777).create(dir)
}

#[cfg(not(unix))]
fn create_dir_all(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_file(path: &Path, body: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut file =
        fs::OpenOptions::new().write(true).create(true).truncate(true).mode(0o644).open(path)?;
    file.write_all(body)
}

#[cfg(not(unix))]
fn write_file(path: &Path, body: &[u8]) -> std::io::Result<()> {
    fs::write(path, body)
}
