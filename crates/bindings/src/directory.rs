//! The effective, configuration-filtered module directory.

use crate::binding::{BindingSet, ModuleBinding};
use crate::catalog::{CATALOG, ModuleDescriptor};
use crate::config::BuildConfig;
use crate::error::DirectoryError;
use crate::BindingFamily;

/// Catalog modules taking part in a build with `config`, in directory order.
///
/// Pure and order-preserving: the same configuration always yields the same sequence.
pub fn effective_modules(config: &BuildConfig) -> impl Iterator<Item = &'static ModuleDescriptor> + '_ {
	CATALOG.iter().filter(|module| config.is_enabled(module.family))
}

/// Ordered list of module bindings for one build configuration.
#[derive(Debug, Clone)]
pub struct ModuleDirectory {
	config: BuildConfig,
	bindings: Vec<ModuleBinding>,
}

impl ModuleDirectory {
	/// Pairs every enabled catalog module with its procedure from `set`.
	///
	/// Fails on the first enabled module without a procedure. Procedures for
	/// modules of disabled families are ignored.
	pub fn resolve(config: &BuildConfig, set: &BindingSet) -> Result<Self, DirectoryError> {
		let bindings = effective_modules(config)
			.map(|module| match set.get(module.name) {
				Some(register) => Ok(ModuleBinding { module, register }),
				None => Err(DirectoryError::UnboundModule {
					module: module.name,
					family: module.family,
				}),
			})
			.collect::<Result<Vec<_>, _>>()?;

		let skipped = set.len().saturating_sub(bindings.len());
		tracing::debug!(modules = bindings.len(), skipped, ?config, "resolved module directory");

		Ok(Self {
			config: *config,
			bindings,
		})
	}

	/// Resolves against the bindings submitted through `inventory`.
	pub fn from_inventory(config: &BuildConfig) -> Result<Self, DirectoryError> {
		Self::resolve(config, &BindingSet::from_inventory()?)
	}

	pub fn config(&self) -> &BuildConfig {
		&self.config
	}

	pub fn bindings(&self) -> &[ModuleBinding] {
		&self.bindings
	}

	pub fn iter(&self) -> impl ExactSizeIterator<Item = &ModuleBinding> {
		self.bindings.iter()
	}

	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.bindings.iter().map(ModuleBinding::name)
	}

	/// Bindings of a single family, in directory order.
	pub fn family(&self, family: BindingFamily) -> impl Iterator<Item = &ModuleBinding> {
		self.bindings.iter().filter(move |binding| binding.module.family == family)
	}

	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}
}

impl<'a> IntoIterator for &'a ModuleDirectory {
	type Item = &'a ModuleBinding;
	type IntoIter = std::slice::Iter<'a, ModuleBinding>;

	fn into_iter(self) -> Self::IntoIter {
		self.bindings.iter()
	}
}
