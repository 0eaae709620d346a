//! The closed set of address kinds the table accepts.
//!
//! Every callback kind is a distinct `extern "C"` function-pointer type over
//! the opaque engine handles below, so a callback can only be registered
//! through the entry point matching its signature. Anything outside this set
//! has no entry point and fails to compile.

use std::marker::{PhantomData, PhantomPinned};

macro_rules! opaque_handle {
	($($(#[$attr:meta])* $name:ident),* $(,)?) => {
		$(
			$(#[$attr])*
			#[repr(C)]
			pub struct $name {
				_data: [u8; 0],
				_marker: PhantomData<(*mut u8, PhantomPinned)>,
			}
		)*
	};
}

opaque_handle! {
	/// Engine-owned argument block of a function call.
	FunctionCallbackInfo,
	/// Engine property key (string or symbol).
	Name,
	/// Engine value.
	Value,
	/// Engine array, the result of a property enumeration.
	Array,
	/// Engine integer, the result of a property query.
	Integer,
	/// Engine boolean, the result of a property deletion.
	Boolean,
	/// Engine property descriptor passed to definers.
	PropertyDescriptor,
}

/// Engine-owned argument block of a property interception, typed by the
/// kind of value the interceptor produces.
#[repr(C)]
pub struct PropertyCallbackInfo<T> {
	_data: [u8; 0],
	_marker: PhantomData<(*mut u8, PhantomPinned, T)>,
}

/// Whether an interceptor handled the request.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intercepted {
	No = 0,
	Yes = 1,
}

pub type FunctionCallback = extern "C" fn(*const FunctionCallbackInfo);
pub type AccessorNameGetterCallback = extern "C" fn(*const Name, *const PropertyCallbackInfo<Value>);
pub type AccessorNameSetterCallback = extern "C" fn(*const Name, *const Value, *const PropertyCallbackInfo<()>);
pub type NamedPropertyGetterCallback = extern "C" fn(*const Name, *const PropertyCallbackInfo<Value>) -> Intercepted;
pub type NamedPropertySetterCallback = extern "C" fn(*const Name, *const Value, *const PropertyCallbackInfo<()>) -> Intercepted;
pub type NamedPropertyDefinerCallback =
	extern "C" fn(*const Name, *const PropertyDescriptor, *const PropertyCallbackInfo<()>) -> Intercepted;
pub type NamedPropertyDeleterCallback = extern "C" fn(*const Name, *const PropertyCallbackInfo<Boolean>) -> Intercepted;
pub type NamedPropertyEnumeratorCallback = extern "C" fn(*const PropertyCallbackInfo<Array>);
pub type NamedPropertyQueryCallback = extern "C" fn(*const Name, *const PropertyCallbackInfo<Integer>) -> Intercepted;
pub type IndexedPropertyGetterCallback = extern "C" fn(u32, *const PropertyCallbackInfo<Value>) -> Intercepted;
pub type IndexedPropertySetterCallback = extern "C" fn(u32, *const Value, *const PropertyCallbackInfo<()>) -> Intercepted;
pub type IndexedPropertyDefinerCallback = extern "C" fn(u32, *const PropertyDescriptor, *const PropertyCallbackInfo<()>) -> Intercepted;
pub type IndexedPropertyDeleterCallback = extern "C" fn(u32, *const PropertyCallbackInfo<Boolean>) -> Intercepted;
pub type IndexedPropertyQueryCallback = extern "C" fn(u32, *const PropertyCallbackInfo<Integer>) -> Intercepted;

/// Encoding of an [`ExternalStringResource`] payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEncoding {
	/// Latin-1, one byte per character.
	OneByte,
	/// UTF-16 code units.
	TwoByte,
}

/// Static string data the engine refers to without copying it onto the heap.
///
/// The table records the address of the resource object itself, so a
/// resource must live for the whole process.
#[derive(Debug)]
pub struct ExternalStringResource {
	data: &'static [u8],
	encoding: StringEncoding,
}

impl ExternalStringResource {
	pub const fn one_byte(data: &'static [u8]) -> Self {
		Self {
			data,
			encoding: StringEncoding::OneByte,
		}
	}

	pub const fn two_byte(data: &'static [u8]) -> Self {
		Self {
			data,
			encoding: StringEncoding::TwoByte,
		}
	}

	pub fn data(&self) -> &'static [u8] {
		self.data
	}

	pub fn encoding(&self) -> StringEncoding {
		self.encoding
	}
}

/// Machine type of a fast-call argument or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CType {
	Void,
	Bool,
	Int32,
	Uint32,
	Int64,
	Uint64,
	Float32,
	Float64,
	Pointer,
	/// The receiver or any engine value passed through untouched.
	Value,
}

/// Type descriptor of a native fast-call function.
#[derive(Debug)]
pub struct CFunctionInfo {
	return_type: CType,
	arg_types: &'static [CType],
}

impl CFunctionInfo {
	pub const fn new(return_type: CType, arg_types: &'static [CType]) -> Self {
		Self { return_type, arg_types }
	}

	pub fn return_type(&self) -> CType {
		self.return_type
	}

	pub fn arg_types(&self) -> &'static [CType] {
		self.arg_types
	}
}

/// A native function together with its type descriptor.
///
/// Registering one pushes two entries, the call address first and the
/// descriptor address immediately after it.
#[derive(Debug, Clone, Copy)]
pub struct CFunction {
	address: *const (),
	type_info: &'static CFunctionInfo,
}

impl CFunction {
	pub const fn new(address: *const (), type_info: &'static CFunctionInfo) -> Self {
		Self { address, type_info }
	}

	pub fn address(&self) -> *const () {
		self.address
	}

	pub fn type_info(&self) -> &'static CFunctionInfo {
		self.type_info
	}
}

/// Discriminant of [`ExternalReference`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ReferenceKind {
	Function,
	AccessorNameGetter,
	AccessorNameSetter,
	NamedPropertyGetter,
	NamedPropertySetter,
	NamedPropertyDefiner,
	NamedPropertyDeleter,
	NamedPropertyEnumerator,
	NamedPropertyQuery,
	IndexedPropertyGetter,
	IndexedPropertySetter,
	IndexedPropertyDefiner,
	IndexedPropertyDeleter,
	IndexedPropertyQuery,
	StringResource,
	NativeFunction,
}

impl ReferenceKind {
	/// Number of table entries one reference of this kind occupies.
	pub const fn width(self) -> usize {
		match self {
			Self::NativeFunction => 2,
			_ => 1,
		}
	}
}

/// One address of an allowed kind, ready to be appended to a registry.
#[derive(Debug, Clone, Copy)]
pub enum ExternalReference {
	Function(FunctionCallback),
	AccessorNameGetter(AccessorNameGetterCallback),
	AccessorNameSetter(AccessorNameSetterCallback),
	NamedPropertyGetter(NamedPropertyGetterCallback),
	NamedPropertySetter(NamedPropertySetterCallback),
	NamedPropertyDefiner(NamedPropertyDefinerCallback),
	NamedPropertyDeleter(NamedPropertyDeleterCallback),
	NamedPropertyEnumerator(NamedPropertyEnumeratorCallback),
	NamedPropertyQuery(NamedPropertyQueryCallback),
	IndexedPropertyGetter(IndexedPropertyGetterCallback),
	IndexedPropertySetter(IndexedPropertySetterCallback),
	IndexedPropertyDefiner(IndexedPropertyDefinerCallback),
	IndexedPropertyDeleter(IndexedPropertyDeleterCallback),
	IndexedPropertyQuery(IndexedPropertyQueryCallback),
	StringResource(&'static ExternalStringResource),
	NativeFunction(CFunction),
}

impl ExternalReference {
	pub fn kind(&self) -> ReferenceKind {
		match self {
			Self::Function(_) => ReferenceKind::Function,
			Self::AccessorNameGetter(_) => ReferenceKind::AccessorNameGetter,
			Self::AccessorNameSetter(_) => ReferenceKind::AccessorNameSetter,
			Self::NamedPropertyGetter(_) => ReferenceKind::NamedPropertyGetter,
			Self::NamedPropertySetter(_) => ReferenceKind::NamedPropertySetter,
			Self::NamedPropertyDefiner(_) => ReferenceKind::NamedPropertyDefiner,
			Self::NamedPropertyDeleter(_) => ReferenceKind::NamedPropertyDeleter,
			Self::NamedPropertyEnumerator(_) => ReferenceKind::NamedPropertyEnumerator,
			Self::NamedPropertyQuery(_) => ReferenceKind::NamedPropertyQuery,
			Self::IndexedPropertyGetter(_) => ReferenceKind::IndexedPropertyGetter,
			Self::IndexedPropertySetter(_) => ReferenceKind::IndexedPropertySetter,
			Self::IndexedPropertyDefiner(_) => ReferenceKind::IndexedPropertyDefiner,
			Self::IndexedPropertyDeleter(_) => ReferenceKind::IndexedPropertyDeleter,
			Self::IndexedPropertyQuery(_) => ReferenceKind::IndexedPropertyQuery,
			Self::StringResource(_) => ReferenceKind::StringResource,
			Self::NativeFunction(_) => ReferenceKind::NativeFunction,
		}
	}

	/// Appends this reference's address(es) to `entries` in table order.
	pub(crate) fn push_into(&self, entries: &mut Vec<isize>) {
		match *self {
			Self::Function(f) => entries.push(code_address(f as *const ())),
			Self::AccessorNameGetter(f) => entries.push(code_address(f as *const ())),
			Self::AccessorNameSetter(f) => entries.push(code_address(f as *const ())),
			Self::NamedPropertyGetter(f) => entries.push(code_address(f as *const ())),
			Self::NamedPropertySetter(f) => entries.push(code_address(f as *const ())),
			Self::NamedPropertyDefiner(f) => entries.push(code_address(f as *const ())),
			Self::NamedPropertyDeleter(f) => entries.push(code_address(f as *const ())),
			Self::NamedPropertyEnumerator(f) => entries.push(code_address(f as *const ())),
			Self::NamedPropertyQuery(f) => entries.push(code_address(f as *const ())),
			Self::IndexedPropertyGetter(f) => entries.push(code_address(f as *const ())),
			Self::IndexedPropertySetter(f) => entries.push(code_address(f as *const ())),
			Self::IndexedPropertyDefiner(f) => entries.push(code_address(f as *const ())),
			Self::IndexedPropertyDeleter(f) => entries.push(code_address(f as *const ())),
			Self::IndexedPropertyQuery(f) => entries.push(code_address(f as *const ())),
			Self::StringResource(resource) => entries.push(data_address(resource)),
			Self::NativeFunction(c_func) => {
				entries.push(code_address(c_func.address()));
				entries.push(data_address(c_func.type_info()));
			}
		}
	}
}

fn code_address(ptr: *const ()) -> isize {
	ptr.expose_provenance() as isize
}

fn data_address<T>(value: &'static T) -> isize {
	std::ptr::from_ref(value).expose_provenance() as isize
}

macro_rules! impl_from_callback {
	($($variant:ident($ty:ty)),* $(,)?) => {
		$(
			impl From<$ty> for ExternalReference {
				fn from(value: $ty) -> Self {
					Self::$variant(value)
				}
			}
		)*
	};
}

impl_from_callback! {
	Function(FunctionCallback),
	AccessorNameGetter(AccessorNameGetterCallback),
	AccessorNameSetter(AccessorNameSetterCallback),
	NamedPropertyGetter(NamedPropertyGetterCallback),
	NamedPropertySetter(NamedPropertySetterCallback),
	NamedPropertyDefiner(NamedPropertyDefinerCallback),
	NamedPropertyDeleter(NamedPropertyDeleterCallback),
	NamedPropertyEnumerator(NamedPropertyEnumeratorCallback),
	NamedPropertyQuery(NamedPropertyQueryCallback),
	IndexedPropertyGetter(IndexedPropertyGetterCallback),
	IndexedPropertySetter(IndexedPropertySetterCallback),
	IndexedPropertyDefiner(IndexedPropertyDefinerCallback),
	IndexedPropertyDeleter(IndexedPropertyDeleterCallback),
	IndexedPropertyQuery(IndexedPropertyQueryCallback),
	StringResource(&'static ExternalStringResource),
	NativeFunction(CFunction),
}
