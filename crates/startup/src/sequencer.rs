//! Drives one initialization lifecycle of the external-reference table.
//!
//! `Uninitialized -> Registering { completed } -> Finalized`, one step per
//! directory entry, never backwards.

use rayon::prelude::*;
use snapref_bindings::{BindingSet, BuildConfig, ModuleBinding, ModuleDirectory};
use snapref_table::{ExternalReferenceRegistry, ExternalReferenceTable, RegistryError};

use crate::consumer::{ReferenceTableConsumer, SnapshotRole};
use crate::error::StartupError;
use crate::manifest::TableManifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
	/// Registry constructed, no binding has run.
	Uninitialized,
	/// The first `completed` bindings have run.
	Registering { completed: usize },
	/// The table was exported.
	Finalized,
	/// A binding failed; the lifecycle cannot continue.
	Failed { module: &'static str },
}

/// Owns the registry for one runtime instance and walks the directory into it.
pub struct InitSequencer {
	directory: ModuleDirectory,
	registry: ExternalReferenceRegistry,
	manifest: TableManifest,
	state: SequencerState,
	handed_off: Option<SnapshotRole>,
}

impl InitSequencer {
	pub fn new(directory: ModuleDirectory) -> Self {
		let manifest = TableManifest::new(*directory.config());
		Self {
			directory,
			registry: ExternalReferenceRegistry::new(),
			manifest,
			state: SequencerState::Uninitialized,
			handed_off: None,
		}
	}

	/// Resolves the directory for `config` from `set` and wraps it.
	pub fn from_config(config: &BuildConfig, set: &BindingSet) -> Result<Self, StartupError> {
		Ok(Self::new(ModuleDirectory::resolve(config, set)?))
	}

	pub fn state(&self) -> SequencerState {
		self.state
	}

	pub fn directory(&self) -> &ModuleDirectory {
		&self.directory
	}

	/// Layout recorded so far; complete once finalized.
	pub fn manifest(&self) -> &TableManifest {
		&self.manifest
	}

	/// Index of the next binding to run.
	fn next_index(&self) -> Result<usize, StartupError> {
		match self.state {
			SequencerState::Uninitialized => Ok(0),
			SequencerState::Registering { completed } => Ok(completed),
			SequencerState::Finalized => Err(StartupError::Finalized),
			SequencerState::Failed { module } => Err(StartupError::Poisoned { module }),
		}
	}

	/// Runs the next binding in directory order.
	///
	/// Returns the module that ran, or `None` once every binding has run.
	pub fn register_next(&mut self) -> Result<Option<&'static str>, StartupError> {
		let index = self.next_index()?;
		let Some(&binding) = self.directory.bindings().get(index) else {
			return Ok(None);
		};

		let start = self.registry.len();
		if let Err(source) = binding.run(&mut self.registry) {
			return Err(self.fail(binding, source));
		}
		self.complete(binding, index, self.registry.len() - start);
		Ok(Some(binding.name()))
	}

	/// Runs every remaining binding in directory order.
	pub fn register_all(&mut self) -> Result<(), StartupError> {
		while self.register_next()?.is_some() {}
		Ok(())
	}

	/// Runs every remaining binding on the rayon pool.
	///
	/// Each binding fills its own registry; results are merged in directory
	/// order, so the table is identical to the one [`register_all`](Self::register_all) builds.
	pub fn register_all_parallel(&mut self) -> Result<(), StartupError> {
		let first = self.next_index()?;
		let remaining: Vec<ModuleBinding> = self.directory.bindings()[first.min(self.directory.len())..].to_vec();

		let results: Vec<Result<ExternalReferenceRegistry, RegistryError>> = remaining
			.par_iter()
			.map(|binding| {
				let mut local = ExternalReferenceRegistry::new();
				binding.run(&mut local).map(|()| local)
			})
			.collect();

		for (offset, (binding, result)) in remaining.into_iter().zip(results).enumerate() {
			let appended = result.and_then(|local| {
				let len = local.len();
				self.registry.append(local).map(|()| len)
			});
			match appended {
				Ok(len) => self.complete(binding, first + offset, len),
				Err(source) => return Err(self.fail(binding, source)),
			}
		}
		Ok(())
	}

	fn complete(&mut self, binding: ModuleBinding, index: usize, len: usize) {
		tracing::debug!(
			module = binding.name(),
			family = %binding.module.family,
			entries = len,
			"registered external references"
		);
		self.manifest.push(binding.name(), binding.module.family, len);
		self.state = SequencerState::Registering { completed: index + 1 };
	}

	fn fail(&mut self, binding: ModuleBinding, source: RegistryError) -> StartupError {
		tracing::error!(module = binding.name(), error = %source, "external reference registration failed");
		self.state = SequencerState::Failed { module: binding.name() };
		StartupError::Binding {
			module: binding.name(),
			source,
		}
	}

	/// Exports the table once every binding has run.
	///
	/// Repeated calls return the same table.
	pub fn finalize(&mut self) -> Result<&ExternalReferenceTable, StartupError> {
		match self.state {
			SequencerState::Finalized => return Ok(self.registry.export()),
			SequencerState::Failed { module } => return Err(StartupError::Poisoned { module }),
			SequencerState::Uninitialized | SequencerState::Registering { .. } => {}
		}

		let completed = self.next_index()?;
		if completed < self.directory.len() {
			return Err(StartupError::IncompleteTraversal {
				completed,
				total: self.directory.len(),
			});
		}

		self.state = SequencerState::Finalized;
		let table = self.registry.export();
		if table.is_empty() {
			tracing::warn!("external reference table is empty");
		}
		tracing::info!(entries = table.len(), modules = self.directory.len(), "external reference table finalized");
		Ok(table)
	}

	/// Finalizes and passes the table to the snapshot subsystem.
	///
	/// The table is handed off at most once per lifecycle, even when the
	/// consumer rejects it.
	pub fn hand_off<C: ReferenceTableConsumer>(&mut self, consumer: &mut C) -> Result<(), StartupError> {
		if let Some(role) = self.handed_off {
			return Err(StartupError::AlreadyHandedOff { role });
		}
		self.finalize()?;
		let role = consumer.role();
		self.handed_off = Some(role);
		tracing::debug!(%role, "handing external reference table to snapshot");
		consumer
			.consume(self.registry.export(), &self.manifest)
			.map_err(|source| StartupError::Consumer {
				role,
				source: Box::new(source),
			})
	}

	/// Finalizes and transfers ownership of the table and its manifest.
	pub fn into_parts(mut self) -> Result<(ExternalReferenceTable, TableManifest), StartupError> {
		self.finalize()?;
		Ok((self.registry.into_table(), self.manifest))
	}
}

/// Builds the table for `config` sequentially, start to finish.
pub fn build_table(config: &BuildConfig, set: &BindingSet) -> Result<(ExternalReferenceTable, TableManifest), StartupError> {
	let mut sequencer = InitSequencer::from_config(config, set)?;
	sequencer.register_all()?;
	sequencer.into_parts()
}
