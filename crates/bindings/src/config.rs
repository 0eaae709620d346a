//! Build configuration selecting the optional binding families.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::BindingFamily;
use crate::error::{ConfigError, Result};

/// Which optional binding families are part of this build.
///
/// Resolved once at startup. The base family is always enabled; each flag
/// here adds or removes one optional family as a whole.
///
/// ```toml
/// inspector = true
/// i18n = true
/// crypto = true
/// quic = false
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
	pub inspector: bool,
	pub i18n: bool,
	pub crypto: bool,
	pub quic: bool,
}

impl BuildConfig {
	/// Every optional family enabled.
	pub const fn full() -> Self {
		Self {
			inspector: true,
			i18n: true,
			crypto: true,
			quic: true,
		}
	}

	/// The families compiled into this crate via cargo features.
	pub const fn from_features() -> Self {
		Self {
			inspector: cfg!(feature = "inspector"),
			i18n: cfg!(feature = "i18n"),
			crypto: cfg!(feature = "crypto"),
			quic: cfg!(feature = "quic"),
		}
	}

	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), ?config, "loaded build config");
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		if self.quic && !self.crypto {
			return Err(ConfigError::QuicRequiresCrypto);
		}
		Ok(())
	}

	/// Whether `family` takes part in the directory.
	///
	/// QUIC is only ever enabled together with crypto, even for an
	/// unvalidated value.
	pub fn is_enabled(&self, family: BindingFamily) -> bool {
		match family {
			BindingFamily::Base => true,
			BindingFamily::Inspector => self.inspector,
			BindingFamily::I18n => self.i18n,
			BindingFamily::Crypto => self.crypto,
			BindingFamily::Quic => self.crypto && self.quic,
		}
	}

	/// Enabled families in directory order.
	pub fn families(&self) -> impl Iterator<Item = BindingFamily> + '_ {
		<BindingFamily as strum::IntoEnumIterator>::iter().filter(|&family| self.is_enabled(family))
	}
}
