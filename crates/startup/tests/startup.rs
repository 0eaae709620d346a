//! End-to-end table construction across build configurations.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use snapref_bindings::{BindingFamily, BindingSet, BuildConfig, CATALOG, RegisterFn, effective_modules};
use snapref_startup::{
	InitSequencer, LayoutMismatch, ManifestError, ReferenceTableConsumer, SnapshotRole, StartupError, TableManifest, build_table,
};
use snapref_table::{
	CFunction, CFunctionInfo, CType, ExternalReferenceRegistrar, ExternalReferenceTable, ExternalStringResource, FunctionCallbackInfo,
	Intercepted, Name, PropertyCallbackInfo, RegistryError, Value,
};

extern "C" fn cb_core(_: *const FunctionCallbackInfo) {}
extern "C" fn cb_stream(_: *const FunctionCallbackInfo) {}
extern "C" fn cb_crypto(_: *const FunctionCallbackInfo) {}
extern "C" fn cb_quic(_: *const FunctionCallbackInfo) {}

extern "C" fn env_getter(_: *const Name, _: *const PropertyCallbackInfo<Value>) -> Intercepted {
	Intercepted::Yes
}

extern "C" fn cipher_getter(_: u32, _: *const PropertyCallbackInfo<Value>) -> Intercepted {
	Intercepted::No
}

extern "C" fn fast_write(_: u64, _: u32) -> u32 {
	0
}

extern "C" fn fast_hash(_: u64) -> u64 {
	0
}

static WRITE_INFO: CFunctionInfo = CFunctionInfo::new(CType::Uint32, &[CType::Value, CType::Uint32]);
static HASH_INFO: CFunctionInfo = CFunctionInfo::new(CType::Uint64, &[CType::Uint64]);
static BANNER: ExternalStringResource = ExternalStringResource::one_byte(b"runtime");

fn register_core(registry: &mut ExternalReferenceRegistrar<'_>) -> Result<(), RegistryError> {
	registry.register_function(cb_core)?;
	registry.register_named_getter(env_getter)?;
	registry.register_string_resource(&BANNER)
}

fn register_stream(registry: &mut ExternalReferenceRegistrar<'_>) -> Result<(), RegistryError> {
	registry.register_native_function(CFunction::new(fast_write as *const (), &WRITE_INFO))?;
	registry.register_function(cb_stream)
}

fn register_silent(_: &mut ExternalReferenceRegistrar<'_>) -> Result<(), RegistryError> {
	Ok(())
}

fn register_crypto(registry: &mut ExternalReferenceRegistrar<'_>) -> Result<(), RegistryError> {
	registry.register_function(cb_crypto)?;
	registry.register_indexed_getter(cipher_getter)?;
	registry.register_native_function(CFunction::new(fast_hash as *const (), &HASH_INFO))
}

fn register_quic(registry: &mut ExternalReferenceRegistrar<'_>) -> Result<(), RegistryError> {
	registry.register_function(cb_quic)?;
	registry.register_function(cb_quic)
}

fn all_bindings() -> BindingSet {
	let mut set = BindingSet::new();
	for (position, module) in CATALOG.iter().enumerate() {
		let register: RegisterFn = match module.family {
			BindingFamily::Base => [register_core, register_stream, register_silent][position % 3],
			BindingFamily::Inspector | BindingFamily::I18n => register_core,
			BindingFamily::Crypto => register_crypto,
			BindingFamily::Quic => register_quic,
		};
		set.insert(module.name, register).unwrap();
	}
	set
}

fn build(config: &BuildConfig) -> (ExternalReferenceTable, TableManifest) {
	build_table(config, &all_bindings()).unwrap()
}

/// Entries of `table` minus the ranges contributed by `family`.
fn without_family(table: &ExternalReferenceTable, manifest: &TableManifest, family: BindingFamily) -> Vec<isize> {
	manifest
		.modules()
		.iter()
		.filter(|extent| extent.family != family)
		.flat_map(|extent| table.as_slice()[extent.start..extent.end()].iter().copied())
		.collect()
}

#[test]
fn identical_configs_build_identical_tables() {
	let config = BuildConfig::full();
	let (first, first_manifest) = build(&config);
	let (second, second_manifest) = build(&config);

	assert_eq!(first.as_slice(), second.as_slice());
	assert_eq!(first_manifest, second_manifest);
}

#[test]
fn disabling_crypto_removes_only_crypto_entries() {
	let with_crypto = BuildConfig {
		inspector: true,
		i18n: true,
		crypto: true,
		quic: false,
	};
	let without_crypto = BuildConfig {
		crypto: false,
		..with_crypto
	};

	let (full, full_manifest) = build(&with_crypto);
	let (reduced, reduced_manifest) = build(&without_crypto);

	assert_eq!(reduced.as_slice(), without_family(&full, &full_manifest, BindingFamily::Crypto).as_slice());

	let crypto_entries: usize = full_manifest
		.modules()
		.iter()
		.filter(|extent| extent.family == BindingFamily::Crypto)
		.map(|extent| extent.len)
		.sum();
	assert_eq!(crypto_entries, 8);
	assert_eq!(reduced.len() + crypto_entries, full.len());
	assert!(reduced_manifest.modules().iter().all(|extent| extent.family != BindingFamily::Crypto));
}

#[test]
fn disabling_i18n_keeps_base_prefix_and_later_families() {
	let (full, full_manifest) = build(&BuildConfig::full());
	let (reduced, _) = build(&BuildConfig {
		i18n: false,
		..BuildConfig::full()
	});

	let base_len = full_manifest
		.modules()
		.iter()
		.filter(|extent| extent.family == BindingFamily::Base)
		.map(|extent| extent.len)
		.sum::<usize>();
	assert_eq!(&reduced.as_slice()[..base_len], &full.as_slice()[..base_len]);
	assert_eq!(reduced.as_slice(), without_family(&full, &full_manifest, BindingFamily::I18n).as_slice());
}

#[test]
fn descriptors_stay_adjacent_to_their_functions() {
	let (table, manifest) = build(&BuildConfig::default());
	let stream = manifest.module("binding").unwrap();

	assert_eq!(stream.len, 3);
	assert_eq!(table.get(stream.start), Some(fast_write as usize as isize));
	assert_eq!(table.get(stream.start + 1), Some(std::ptr::from_ref(&WRITE_INFO) as isize));
	assert_eq!(table.get(stream.start + 2), Some(cb_stream as usize as isize));
}

#[test]
fn quic_requires_crypto_in_the_table() {
	let quic_only = BuildConfig {
		quic: true,
		..BuildConfig::default()
	};
	let (table, manifest) = build(&quic_only);
	let (base, _) = build(&BuildConfig::default());

	assert!(manifest.module("quic").is_none());
	assert_eq!(table.as_slice(), base.as_slice());
}

/// Stands in for the snapshot writer: keeps the encoded manifest.
struct Writer {
	embedded: Option<Vec<u8>>,
}

impl ReferenceTableConsumer for Writer {
	type Error = ManifestError;

	fn role(&self) -> SnapshotRole {
		SnapshotRole::Serialize
	}

	fn consume(&mut self, _: &ExternalReferenceTable, manifest: &TableManifest) -> Result<(), ManifestError> {
		self.embedded = Some(manifest.to_bytes()?);
		Ok(())
	}
}

/// Stands in for the snapshot reader: checks the rebuilt layout against the embedded one.
struct Reader<'a> {
	embedded: &'a [u8],
	resolved: usize,
}

impl ReferenceTableConsumer for Reader<'_> {
	type Error = ManifestError;

	fn role(&self) -> SnapshotRole {
		SnapshotRole::Deserialize
	}

	fn consume(&mut self, table: &ExternalReferenceTable, manifest: &TableManifest) -> Result<(), ManifestError> {
		TableManifest::from_bytes(self.embedded)?.check_layout(manifest)?;
		self.resolved = table.len();
		Ok(())
	}
}

fn hand_off<C: ReferenceTableConsumer>(config: &BuildConfig, consumer: &mut C) -> Result<(), StartupError> {
	let mut sequencer = InitSequencer::from_config(config, &all_bindings())?;
	sequencer.register_all()?;
	sequencer.hand_off(consumer)
}

#[test]
fn consuming_run_accepts_identical_layout() {
	let config = BuildConfig {
		crypto: true,
		..BuildConfig::default()
	};
	let mut writer = Writer { embedded: None };
	hand_off(&config, &mut writer).unwrap();
	let embedded = writer.embedded.unwrap();

	let mut reader = Reader {
		embedded: &embedded,
		resolved: 0,
	};
	hand_off(&config, &mut reader).unwrap();
	assert_eq!(reader.resolved, build(&config).0.len());
}

#[test]
fn consuming_run_rejects_drifted_layout() {
	let mut writer = Writer { embedded: None };
	hand_off(&BuildConfig::full(), &mut writer).unwrap();
	let embedded = writer.embedded.unwrap();

	let mut reader = Reader {
		embedded: &embedded,
		resolved: 0,
	};
	let err = hand_off(&BuildConfig::default(), &mut reader).unwrap_err();
	match err {
		StartupError::Consumer { role, source } => {
			assert_eq!(role, SnapshotRole::Deserialize);
			let source = source.downcast::<ManifestError>().unwrap();
			assert!(matches!(*source, ManifestError::LayoutMismatch(LayoutMismatch::Config { .. })));
		}
		other => panic!("expected consumer error, got {other:?}"),
	}
	assert_eq!(reader.resolved, 0);
}

fn config_strategy() -> impl Strategy<Value = BuildConfig> {
	(any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(inspector, i18n, crypto, quic)| BuildConfig {
		inspector,
		i18n,
		crypto,
		quic: crypto && quic,
	})
}

proptest! {
	#[test]
	fn parallel_traversal_matches_sequential(config in config_strategy()) {
		let (sequential, sequential_manifest) = build(&config);

		let mut sequencer = InitSequencer::from_config(&config, &all_bindings()).unwrap();
		sequencer.register_next().unwrap();
		sequencer.register_all_parallel().unwrap();
		let (parallel, parallel_manifest) = sequencer.into_parts().unwrap();

		prop_assert_eq!(sequential.as_slice(), parallel.as_slice());
		prop_assert_eq!(&sequential_manifest, &parallel_manifest);

		let expected: Vec<_> = effective_modules(&config).map(|module| module.name).collect();
		let recorded: Vec<_> = parallel_manifest.modules().iter().map(|extent| extent.name.as_str()).collect();
		prop_assert_eq!(recorded, expected);
	}
}
