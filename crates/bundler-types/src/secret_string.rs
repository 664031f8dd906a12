//! Secure string type for private key material.
//!
//! Private keys read from configuration pass through this wrapper so they are
//! zeroed on drop and never leak through Debug, Display, or serialization.

use serde::{Deserialize, Deserializer};
use std::fmt;
use zeroize::Zeroizing;

/// A string whose contents are zeroed on drop and redacted in all output.
///
/// Used for the opportunity and solver signing keys; access goes through
/// [`SecretString::with_exposed`] to keep the window where the raw key is
/// visible as small as possible.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
	/// Wraps an already-owned string.
	pub fn new(s: String) -> Self {
		Self(Zeroizing::new(s))
	}

	/// Runs `f` with the raw secret exposed and returns its result.
	pub fn with_exposed<F, R>(&self, f: F) -> R
	where
		F: FnOnce(&str) -> R,
	{
		f(&self.0)
	}

	/// Returns true if no key material is present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString(***)")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "***")
	}
}

impl From<&str> for SecretString {
	fn from(s: &str) -> Self {
		Self::new(s.to_string())
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.0.as_str() == other.0.as_str()
	}
}

impl Eq for SecretString {}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		String::deserialize(deserializer).map(SecretString::new)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn debug_and_display_are_redacted() {
		let secret = SecretString::from("0xdeadbeef");
		assert_eq!(format!("{:?}", secret), "SecretString(***)");
		assert_eq!(format!("{}", secret), "***");
	}

	#[test]
	fn with_exposed_yields_raw_value() {
		let secret = SecretString::from("0xdeadbeef");
		assert_eq!(secret.with_exposed(str::len), 10);
		assert!(secret.with_exposed(|s| s.starts_with("0x")));
	}

	#[test]
	fn equality_compares_contents() {
		assert_eq!(SecretString::from("k1"), SecretString::from("k1"));
		assert_ne!(SecretString::from("k1"), SecretString::from("k2"));
	}
}
