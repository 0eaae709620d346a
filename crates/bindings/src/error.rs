//! Error types for configuration loading and directory resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a [`BuildConfig`](crate::BuildConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unknown key.
	#[error("build config parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// QUIC was enabled without cryptographic support.
	#[error("quic support requires crypto support")]
	QuicRequiresCrypto,
}

/// Errors that can occur when pairing catalog modules with their registration procedures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
	/// An enabled module has no registration procedure.
	#[error("module {module:?} ({family}) has no external reference binding")]
	UnboundModule { module: &'static str, family: crate::BindingFamily },

	/// Two procedures were supplied for the same module.
	#[error("duplicate external reference binding for module {module:?}")]
	DuplicateBinding { module: String },

	/// A procedure was supplied for a module the catalog does not list.
	#[error("external reference binding for unknown module {module:?}")]
	UnknownModule { module: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
