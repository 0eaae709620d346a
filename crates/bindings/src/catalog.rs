//! Fixed, ordered list of every module that may contribute external references.
//!
//! This list is the single source of truth for directory order. Two builds
//! with the same [`BuildConfig`](crate::BuildConfig) walk the same subset in the same order.

use crate::BindingFamily;

/// A catalog entry: module name and the family it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleDescriptor {
	pub name: &'static str,
	pub family: BindingFamily,
}

macro_rules! define_catalog {
	($($family:ident => [$($module:ident),* $(,)?]),* $(,)?) => {
		/// All modules in directory order, families in declaration order.
		pub static CATALOG: &[ModuleDescriptor] = &[
			$($(
				ModuleDescriptor {
					name: stringify!($module),
					family: BindingFamily::$family,
				},
			)*)*
		];
	};
}

define_catalog! {
	Base => [
		async_wrap,
		binding,
		blob,
		buffer,
		builtins,
		cares_wrap,
		config,
		contextify,
		credentials,
		encoding_binding,
		env_var,
		errors,
		fs,
		fs_dir,
		fs_event_wrap,
		handle_wrap,
		heap_utils,
		http_parser,
		internal_only_v8,
		locks,
		messaging,
		mksnapshot,
		module_wrap,
		modules,
		options,
		os,
		performance,
		permission,
		process_methods,
		process_object,
		process_wrap,
		report,
		task_queue,
		tcp_wrap,
		tty_wrap,
		udp_wrap,
		url,
		url_pattern,
		util,
		pipe_wrap,
		sea,
		serdes,
		string_decoder,
		stream_wrap,
		signal_wrap,
		spawn_sync,
		trace_events,
		timers,
		types,
		uv,
		v8,
		zlib,
		wasm_web_api,
		worker,
	],
	Inspector => [inspector, profiler],
	I18n => [icu],
	Crypto => [crypto, tls_wrap],
	Quic => [quic],
}

/// Looks up a module by name.
pub fn find_module(name: &str) -> Option<&'static ModuleDescriptor> {
	CATALOG.iter().find(|module| module.name == name)
}

/// Modules of one family, in directory order.
pub fn family_modules(family: BindingFamily) -> impl Iterator<Item = &'static ModuleDescriptor> {
	CATALOG.iter().filter(move |module| module.family == family)
}
