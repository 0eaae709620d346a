use snapref_bindings::DirectoryError;
use snapref_table::RegistryError;

use crate::consumer::SnapshotRole;

/// Startup-fatal errors of the initialization sequence.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
	#[error(transparent)]
	Directory(#[from] DirectoryError),

	#[error("module {module:?} failed to register external references: {source}")]
	Binding {
		module: &'static str,
		source: RegistryError,
	},

	#[error("finalize requested after {completed} of {total} modules registered")]
	IncompleteTraversal { completed: usize, total: usize },

	#[error("external reference table already finalized")]
	Finalized,

	#[error("startup aborted after module {module:?} failed")]
	Poisoned { module: &'static str },

	#[error("external reference table was already handed to the snapshot {role}")]
	AlreadyHandedOff { role: SnapshotRole },

	#[error("snapshot {role} rejected the external reference table: {source}")]
	Consumer {
		role: SnapshotRole,
		source: Box<dyn std::error::Error + Send + Sync>,
	},
}
