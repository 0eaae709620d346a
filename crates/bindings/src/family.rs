use serde::{Deserialize, Serialize};

/// Group of modules that is either wholly present in a build or wholly absent.
///
/// Variants are declared in directory order.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BindingFamily {
	/// Core runtime facilities, always present.
	Base,
	/// Debugger and profiler integration.
	Inspector,
	/// Internationalization support.
	I18n,
	/// Cryptography and TLS.
	Crypto,
	/// QUIC transport. Requires [`BindingFamily::Crypto`].
	Quic,
}

impl BindingFamily {
	pub fn is_optional(self) -> bool {
		self != Self::Base
	}
}
