//! Screenshot path preparation.

use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::error::{BridgeError, Result};
use crate::host::ScreenCapture;

/// Resolves screenshot requests under a fixed output root and hands them to
/// the host renderer.
#[derive(Debug, Clone)]
pub struct EvidenceCapture {
	root: PathBuf,
}

impl EvidenceCapture {
	/// Creates a capture rooted at `root`, made absolute against the current
	/// directory when relative.
	pub fn new(root: impl AsRef<Path>) -> Result<Self> {
		let root = std::path::absolute(root.as_ref()).map_err(|e| BridgeError::io(format!("resolve output root {}", root.as_ref().display()), e))?;
		Ok(Self { root })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Normalizes `relative` under the output root without touching the
	/// filesystem. Absolute paths, paths escaping the root and paths naming
	/// a directory are rejected.
	pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
		if relative.trim().is_empty() {
			return Err(BridgeError::InvalidArgument("screenshot path is empty".into()));
		}
		if relative.ends_with('/') || relative.ends_with('\\') {
			return Err(BridgeError::InvalidArgument(format!("screenshot path '{relative}' names a directory")));
		}

		let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
		for component in Path::new(relative).components() {
			match component {
				Component::Normal(part) => parts.push(part),
				Component::CurDir => {}
				Component::ParentDir => {
					if parts.pop().is_none() {
						return Err(BridgeError::InvalidArgument(format!("screenshot path '{relative}' escapes the output root")));
					}
				}
				Component::RootDir | Component::Prefix(_) => {
					return Err(BridgeError::InvalidArgument(format!("screenshot path '{relative}' must be relative")));
				}
			}
		}
		if parts.is_empty() {
			return Err(BridgeError::InvalidArgument(format!("screenshot path '{relative}' has no file name")));
		}

		let mut path = self.root.clone();
		path.extend(parts);
		Ok(path)
	}

	/// Resolves `relative`, creates its parent directories and issues the
	/// capture request. The file may appear on a later frame.
	///
	/// The returned path is canonical. Symlinks under the root that lead
	/// outside it are rejected like `..` escapes.
	pub fn capture(&self, relative: &str, screen: &mut dyn ScreenCapture) -> Result<PathBuf> {
		let path = self.resolve(relative)?;
		let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
			return Err(BridgeError::InvalidArgument(format!("screenshot path '{relative}' has no file name")));
		};

		std::fs::create_dir_all(&self.root).map_err(|e| BridgeError::io(format!("create directory {}", self.root.display()), e))?;
		let root = canonicalize(&self.root)?;

		let existing = parent.ancestors().find(|p| p.exists()).unwrap_or(self.root.as_path());
		ensure_within(&root, &canonicalize(existing)?, relative)?;

		std::fs::create_dir_all(parent).map_err(|e| BridgeError::io(format!("create directory {}", parent.display()), e))?;
		let parent = canonicalize(parent)?;
		ensure_within(&root, &parent, relative)?;

		let path = parent.join(file_name);
		if path.is_symlink() {
			ensure_within(&root, &canonicalize(&path)?, relative)?;
		}

		screen.capture(&path)?;
		info!(target: "playbridge.evidence", path = %path.display(), "screenshot requested");
		Ok(path)
	}
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
	path.canonicalize().map_err(|e| BridgeError::io(format!("resolve {}", path.display()), e))
}

fn ensure_within(root: &Path, resolved: &Path, relative: &str) -> Result<()> {
	if resolved.starts_with(root) {
		Ok(())
	} else {
		Err(BridgeError::InvalidArgument(format!("screenshot path '{relative}' escapes the output root")))
	}
}
