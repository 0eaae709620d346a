//! Append-only address registry with a one-shot export.

use crate::error::RegistryError;
use crate::kind::*;
use crate::table::ExternalReferenceTable;

/// Typed `register_*` entry points, one per [`ReferenceKind`], forwarding to `self.register`.
macro_rules! entry_points {
	() => {
		pub fn register_function(&mut self, callback: FunctionCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_accessor_getter(&mut self, callback: AccessorNameGetterCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_accessor_setter(&mut self, callback: AccessorNameSetterCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_named_getter(&mut self, callback: NamedPropertyGetterCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_named_setter(&mut self, callback: NamedPropertySetterCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_named_definer(&mut self, callback: NamedPropertyDefinerCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_named_deleter(&mut self, callback: NamedPropertyDeleterCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_named_enumerator(&mut self, callback: NamedPropertyEnumeratorCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_named_query(&mut self, callback: NamedPropertyQueryCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_indexed_getter(&mut self, callback: IndexedPropertyGetterCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_indexed_setter(&mut self, callback: IndexedPropertySetterCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_indexed_definer(&mut self, callback: IndexedPropertyDefinerCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_indexed_deleter(&mut self, callback: IndexedPropertyDeleterCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_indexed_query(&mut self, callback: IndexedPropertyQueryCallback) -> Result<(), RegistryError> {
			self.register(callback)
		}

		pub fn register_string_resource(&mut self, resource: &'static ExternalStringResource) -> Result<(), RegistryError> {
			self.register(resource)
		}

		/// Registers the call address of `c_func` followed by its type descriptor.
		pub fn register_native_function(&mut self, c_func: CFunction) -> Result<(), RegistryError> {
			self.register(c_func)
		}

		/// Registers several native functions, each as an adjacent address/descriptor pair.
		pub fn register_native_functions(&mut self, c_funcs: &[CFunction]) -> Result<(), RegistryError> {
			c_funcs.iter().try_for_each(|&c_func| self.register(c_func))
		}
	};
}

/// Collects external references during startup.
///
/// Entries are kept in registration order and never deduplicated: the index
/// of an entry is its position, and the same address registered from two
/// places occupies two slots. [`export`](Self::export) finalizes the registry;
/// after that every registration fails with [`RegistryError::Finalized`].
#[derive(Debug, Default)]
pub struct ExternalReferenceRegistry {
	entries: Vec<isize>,
	table: Option<ExternalReferenceTable>,
}

impl ExternalReferenceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of addresses registered so far.
	pub fn len(&self) -> usize {
		match &self.table {
			Some(table) => table.len(),
			None => self.entries.len(),
		}
	}

	/// True while no address has been registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn is_finalized(&self) -> bool {
		self.table.is_some()
	}

	/// Appends one reference of any allowed kind.
	pub fn register(&mut self, reference: impl Into<ExternalReference>) -> Result<(), RegistryError> {
		let reference = reference.into();
		if self.table.is_some() {
			return Err(RegistryError::Finalized {
				kind: reference.kind(),
				len: self.len(),
			});
		}
		let index = self.entries.len();
		reference.push_into(&mut self.entries);
		tracing::trace!(index, kind = %reference.kind(), "registered external reference");
		Ok(())
	}

	entry_points!();

	/// Registration-only view handed to module procedures.
	pub fn registrar(&mut self) -> ExternalReferenceRegistrar<'_> {
		ExternalReferenceRegistrar { registry: self }
	}

	/// Moves all entries of `other` behind the current ones, keeping their order.
	pub fn append(&mut self, other: ExternalReferenceRegistry) -> Result<(), RegistryError> {
		if self.table.is_some() {
			return Err(RegistryError::AppendAfterFinalize {
				len: self.len(),
				appended: other.len(),
			});
		}
		match other.table {
			Some(table) => self.entries.extend_from_slice(table.as_slice()),
			None => self.entries.extend(other.entries),
		}
		Ok(())
	}

	/// Finalizes the registry and returns the table.
	///
	/// The first call freezes the entries; later calls return the same table
	/// without touching it.
	pub fn export(&mut self) -> &ExternalReferenceTable {
		self.table.get_or_insert_with(|| {
			let entries = std::mem::take(&mut self.entries);
			tracing::debug!(len = entries.len(), "finalized external reference table");
			ExternalReferenceTable::from_entries(entries)
		})
	}

	/// Finalizes if needed and hands the table to the caller.
	pub fn into_table(self) -> ExternalReferenceTable {
		match self.table {
			Some(table) => table,
			None => {
				tracing::debug!(len = self.entries.len(), "finalized external reference table");
				ExternalReferenceTable::from_entries(self.entries)
			}
		}
	}
}

/// Append-only handle on an [`ExternalReferenceRegistry`].
///
/// Module procedures receive this instead of the registry: it can add
/// entries but cannot export, merge or inspect, so finalization stays with
/// whoever owns the registry.
pub struct ExternalReferenceRegistrar<'a> {
	registry: &'a mut ExternalReferenceRegistry,
}

impl ExternalReferenceRegistrar<'_> {
	/// Appends one reference of any allowed kind.
	pub fn register(&mut self, reference: impl Into<ExternalReference>) -> Result<(), RegistryError> {
		self.registry.register(reference)
	}

	entry_points!();
}
