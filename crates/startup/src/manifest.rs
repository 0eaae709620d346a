//! Layout description of an exported table, embedded next to a snapshot.
//!
//! Addresses differ between the producing and the consuming process, but
//! the layout (configuration, module order, entries per module) must not.
//! Comparing manifests turns a drifted table into an error at load time
//! instead of wrong pointers in the heap.

use serde::{Deserialize, Serialize};
use snapref_bindings::{BindingFamily, BuildConfig};

/// Magic bytes identifying an encoded manifest.
pub const MAGIC: &[u8; 8] = b"SNAPXREF";

/// Schema version for manifest compatibility.
pub const SCHEMA_VERSION: u32 = 1;

/// Contiguous run of table entries contributed by one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleExtent {
	pub name: String,
	pub family: BindingFamily,
	pub start: usize,
	pub len: usize,
}

impl ModuleExtent {
	pub fn end(&self) -> usize {
		self.start.saturating_add(self.len)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableManifest {
	config: BuildConfig,
	modules: Vec<ModuleExtent>,
	total: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
	#[error("not an external reference manifest")]
	BadMagic,
	#[error("unsupported manifest schema version {found} (expected {expected})")]
	UnsupportedVersion { found: u32, expected: u32 },
	#[error("manifest codec error: {0}")]
	Codec(#[from] postcard::Error),
	#[error("manifest module #{position} starts at {start}, expected {expected}")]
	Discontiguous { position: usize, start: usize, expected: usize },
	#[error("manifest extents overflow at module #{position}")]
	Overflow { position: usize },
	#[error("manifest total {total} does not match its extents ({expected})")]
	TotalMismatch { total: usize, expected: usize },
	#[error("external reference layout mismatch: {0}")]
	LayoutMismatch(#[from] LayoutMismatch),
}

/// First difference found between two table layouts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutMismatch {
	#[error("build config differs: expected {expected:?}, found {found:?}")]
	Config { expected: BuildConfig, found: BuildConfig },
	#[error("module #{position} differs: expected {expected:?}, found {found:?}")]
	Module {
		position: usize,
		expected: Option<String>,
		found: Option<String>,
	},
	#[error("module {module:?} registered {found} entries, expected {expected}")]
	Length { module: String, expected: usize, found: usize },
	#[error("table has {found} entries, expected {expected}")]
	Total { expected: usize, found: usize },
}

impl TableManifest {
	pub(crate) fn new(config: BuildConfig) -> Self {
		Self {
			config,
			modules: Vec::new(),
			total: 0,
		}
	}

	pub(crate) fn push(&mut self, name: &str, family: BindingFamily, len: usize) {
		self.modules.push(ModuleExtent {
			name: name.to_owned(),
			family,
			start: self.total,
			len,
		});
		self.total += len;
	}

	pub fn config(&self) -> &BuildConfig {
		&self.config
	}

	pub fn modules(&self) -> &[ModuleExtent] {
		&self.modules
	}

	/// Total number of table entries described.
	pub fn total(&self) -> usize {
		self.total
	}

	pub fn module(&self, name: &str) -> Option<&ModuleExtent> {
		self.modules.iter().find(|extent| extent.name == name)
	}

	/// The module that registered the entry at `index`.
	pub fn module_for_index(&self, index: usize) -> Option<&ModuleExtent> {
		let position = self.modules.partition_point(|extent| extent.end() <= index);
		self.modules.get(position).filter(|extent| extent.start <= index)
	}

	/// Checks that `found` describes the same layout as `self`.
	pub fn check_layout(&self, found: &TableManifest) -> Result<(), LayoutMismatch> {
		if self.config != found.config {
			return Err(LayoutMismatch::Config {
				expected: self.config,
				found: found.config,
			});
		}

		let positions = self.modules.len().max(found.modules.len());
		for position in 0..positions {
			match (self.modules.get(position), found.modules.get(position)) {
				(Some(expected), Some(actual)) if expected.name == actual.name => {
					if expected.len != actual.len {
						return Err(LayoutMismatch::Length {
							module: expected.name.clone(),
							expected: expected.len,
							found: actual.len,
						});
					}
				}
				(expected, actual) => {
					return Err(LayoutMismatch::Module {
						position,
						expected: expected.map(|extent| extent.name.clone()),
						found: actual.map(|extent| extent.name.clone()),
					});
				}
			}
		}

		if self.total != found.total {
			return Err(LayoutMismatch::Total {
				expected: self.total,
				found: found.total,
			});
		}
		Ok(())
	}

	/// Encodes as magic, little-endian schema version, then the postcard body.
	pub fn to_bytes(&self) -> Result<Vec<u8>, ManifestError> {
		let body = postcard::to_stdvec(self)?;
		let mut bytes = Vec::with_capacity(MAGIC.len() + 4 + body.len());
		bytes.extend_from_slice(MAGIC);
		bytes.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
		bytes.extend_from_slice(&body);
		Ok(bytes)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
		let Some(rest) = bytes.strip_prefix(MAGIC.as_slice()) else {
			return Err(ManifestError::BadMagic);
		};
		let Some((version, body)) = rest.split_first_chunk::<4>() else {
			return Err(ManifestError::BadMagic);
		};
		let found = u32::from_le_bytes(*version);
		if found != SCHEMA_VERSION {
			return Err(ManifestError::UnsupportedVersion {
				found,
				expected: SCHEMA_VERSION,
			});
		}
		let manifest: Self = postcard::from_bytes(body)?;
		manifest.validate()?;
		Ok(manifest)
	}

	/// Extents must tile `0..total` in order without gaps or overlaps.
	fn validate(&self) -> Result<(), ManifestError> {
		let mut expected = 0usize;
		for (position, extent) in self.modules.iter().enumerate() {
			if extent.start != expected {
				return Err(ManifestError::Discontiguous {
					position,
					start: extent.start,
					expected,
				});
			}
			expected = expected
				.checked_add(extent.len)
				.ok_or(ManifestError::Overflow { position })?;
		}
		if self.total != expected {
			return Err(ManifestError::TotalMismatch {
				total: self.total,
				expected,
			});
		}
		Ok(())
	}
}
