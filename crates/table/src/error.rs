use crate::kind::ReferenceKind;

/// Errors raised by [`ExternalReferenceRegistry`](crate::ExternalReferenceRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// A reference was registered after the table was exported.
	#[error("external reference table already finalized with {len} entries; late {kind} registration rejected")]
	Finalized { kind: ReferenceKind, len: usize },
	/// Another registry was merged in after the table was exported.
	#[error("external reference table already finalized with {len} entries; cannot append {appended} more")]
	AppendAfterFinalize { len: usize, appended: usize },
}
