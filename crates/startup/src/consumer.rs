//! Hand-off of the finalized table to the snapshot subsystem.

use std::fmt;

use snapref_table::ExternalReferenceTable;

use crate::manifest::TableManifest;

/// Which side of the snapshot the consumer is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotRole {
	/// Writes a snapshot, replacing addresses with table indices.
	Serialize,
	/// Reads a snapshot, resolving table indices back into addresses.
	Deserialize,
}

impl fmt::Display for SnapshotRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Serialize => "serializer",
			Self::Deserialize => "deserializer",
		})
	}
}

/// The snapshot serializer or deserializer receiving the table.
pub trait ReferenceTableConsumer {
	type Error: std::error::Error + Send + Sync + 'static;

	fn role(&self) -> SnapshotRole;

	/// Receives the finalized table together with its layout.
	fn consume(&mut self, table: &ExternalReferenceTable, manifest: &TableManifest) -> Result<(), Self::Error>;
}
