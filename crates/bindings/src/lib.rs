//! Module binding directory for the external-reference table.
//!
//! Each feature module owns a registration procedure that pushes its native
//! callbacks and type descriptors into an
//! [`ExternalReferenceRegistry`](snapref_table::ExternalReferenceRegistry).
//! This crate decides which procedures run, and in what order, for a given
//! [`BuildConfig`].
//!
//! - [`catalog`] - fixed module order, grouped into [`BindingFamily`]s
//! - [`BindingSet`] - procedures collected from `inventory` or inserted explicitly
//! - [`ModuleDirectory`] - the enabled subset paired with procedures

mod binding;
pub mod catalog;
mod config;
mod directory;
pub mod error;
mod family;

pub use binding::{BindingSet, ExternalReferenceBinding, ModuleBinding, RegisterFn};
pub use catalog::{CATALOG, ModuleDescriptor};
pub use config::BuildConfig;
pub use directory::{ModuleDirectory, effective_modules};
pub use error::{ConfigError, DirectoryError};
pub use family::BindingFamily;

#[doc(hidden)]
pub use inventory as __inventory;
