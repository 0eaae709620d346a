//! External-reference table for reproducible heap snapshots.
//!
//! A heap snapshot cannot store native addresses (callbacks, type descriptors,
//! string resources) by value because they change between builds and
//! processes. The serializer replaces each such address with its index in
//! an [`ExternalReferenceTable`], and the deserializer maps indices back
//! using a table rebuilt the same way in the consuming process.
//!
//! - [`kind`] - the closed set of address kinds that may be registered
//! - [`ExternalReferenceRegistry`] - append-only collection with a one-shot export
//! - [`ExternalReferenceRegistrar`] - registration-only handle given to module procedures
//! - [`ExternalReferenceTable`] - the exported, read-only result

pub mod error;
pub mod kind;
mod registry;
mod table;

pub use error::RegistryError;
pub use kind::{
	AccessorNameGetterCallback, AccessorNameSetterCallback, Array, Boolean, CFunction, CFunctionInfo, CType,
	ExternalReference, ExternalStringResource, FunctionCallback, FunctionCallbackInfo, IndexedPropertyDefinerCallback,
	IndexedPropertyDeleterCallback, IndexedPropertyGetterCallback, IndexedPropertyQueryCallback,
	IndexedPropertySetterCallback, Integer, Intercepted, Name, NamedPropertyDefinerCallback,
	NamedPropertyDeleterCallback, NamedPropertyEnumeratorCallback, NamedPropertyGetterCallback,
	NamedPropertyQueryCallback, NamedPropertySetterCallback, PropertyCallbackInfo, PropertyDescriptor, ReferenceKind,
	StringEncoding, Value,
};
pub use registry::{ExternalReferenceRegistrar, ExternalReferenceRegistry};
pub use table::ExternalReferenceTable;
