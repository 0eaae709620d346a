//! Registration procedures and the set they are collected into.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap as HashMap;
use snapref_table::{ExternalReferenceRegistrar, ExternalReferenceRegistry, RegistryError};

use crate::catalog::{self, ModuleDescriptor};
use crate::error::DirectoryError;

/// Registration procedure of one module.
///
/// Pushes the module's external references in its own fixed order. The
/// registrar only appends; exporting is left to the registry's owner.
pub type RegisterFn = fn(&mut ExternalReferenceRegistrar<'_>) -> Result<(), RegistryError>;

/// Inventory item submitted by [`external_reference_binding!`](crate::external_reference_binding).
pub struct ExternalReferenceBinding {
	pub module: &'static str,
	pub register: RegisterFn,
}

inventory::collect!(ExternalReferenceBinding);

/// A catalog module paired with its registration procedure.
#[derive(Debug, Clone, Copy)]
pub struct ModuleBinding {
	pub module: &'static ModuleDescriptor,
	pub register: RegisterFn,
}

impl ModuleBinding {
	pub fn name(&self) -> &'static str {
		self.module.name
	}

	/// Runs the registration procedure against `registry`.
	pub fn run(&self, registry: &mut ExternalReferenceRegistry) -> Result<(), RegistryError> {
		(self.register)(&mut registry.registrar())
	}
}

/// Registration procedures keyed by module name.
///
/// Only modules listed in the catalog are accepted, each at most once.
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
	procedures: HashMap<&'static str, RegisterFn>,
}

impl BindingSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Collects every binding submitted with [`external_reference_binding!`](crate::external_reference_binding).
	pub fn from_inventory() -> Result<Self, DirectoryError> {
		let mut set = Self::new();
		for binding in inventory::iter::<ExternalReferenceBinding> {
			set.insert(binding.module, binding.register)?;
		}
		tracing::debug!(count = set.len(), "collected external reference bindings");
		Ok(set)
	}

	pub fn insert(&mut self, module: &str, register: RegisterFn) -> Result<(), DirectoryError> {
		let Some(descriptor) = catalog::find_module(module) else {
			return Err(DirectoryError::UnknownModule { module: module.to_owned() });
		};
		match self.procedures.entry(descriptor.name) {
			Entry::Occupied(_) => Err(DirectoryError::DuplicateBinding { module: module.to_owned() }),
			Entry::Vacant(slot) => {
				slot.insert(register);
				Ok(())
			}
		}
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, module: &str, register: RegisterFn) -> Result<Self, DirectoryError> {
		self.insert(module, register)?;
		Ok(self)
	}

	pub fn get(&self, module: &str) -> Option<RegisterFn> {
		self.procedures.get(module).copied()
	}

	pub fn contains(&self, module: &str) -> bool {
		self.procedures.contains_key(module)
	}

	pub fn len(&self) -> usize {
		self.procedures.len()
	}

	pub fn is_empty(&self) -> bool {
		self.procedures.is_empty()
	}
}

/// Publishes a module's registration procedure.
///
/// ```ignore
/// fn register_fs_references(registry: &mut ExternalReferenceRegistrar<'_>) -> Result<(), RegistryError> {
///     registry.register_function(fs_open)?;
///     registry.register_native_function(FAST_STAT)
/// }
///
/// snapref_bindings::external_reference_binding!(fs, register_fs_references);
/// ```
#[macro_export]
macro_rules! external_reference_binding {
	($module:ident, $register:path) => {
		$crate::__inventory::submit! {
			$crate::ExternalReferenceBinding {
				module: stringify!($module),
				register: $register,
			}
		}
	};
}
