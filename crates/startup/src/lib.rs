//! Startup sequencing of the external-reference table.
//!
//! One [`InitSequencer`] per runtime instance: it owns the registry, runs
//! every binding of the [`ModuleDirectory`](snapref_bindings::ModuleDirectory)
//! in order, exports the table once and hands it, with its
//! [`TableManifest`], to the snapshot serializer or deserializer.

mod consumer;
mod error;
pub mod manifest;
mod sequencer;

pub use consumer::{ReferenceTableConsumer, SnapshotRole};
pub use error::StartupError;
pub use manifest::{LayoutMismatch, ManifestError, ModuleExtent, TableManifest};
pub use sequencer::{InitSequencer, SequencerState, build_table};
