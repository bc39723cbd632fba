use semver::Version;

/// The protocol version the language analysis service reports.
///
/// The version decides which operations the service understands. Prerelease
/// and build markers on the reported version carry no capability meaning and
/// are ignored.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct ProtocolVersion(Version);

impl ProtocolVersion {
	#[must_use]
	pub fn new(major: u64, minor: u64, patch: u64) -> ProtocolVersion {
		ProtocolVersion(Version::new(major, minor, patch))
	}

	/// Parse the version string the service displays.
	///
	/// A string that does not parse degrades to `0.0.0`, which enables no
	/// capabilities.
	#[must_use]
	pub fn from_display_name(version: &str) -> ProtocolVersion {
		let Ok(mut version) = Version::parse(version.trim()) else {
			return ProtocolVersion::default();
		};
		version.pre = semver::Prerelease::EMPTY;
		version.build = semver::BuildMetadata::EMPTY;
		ProtocolVersion(version)
	}

	#[must_use]
	pub fn display_name(&self) -> String {
		self.0.to_string()
	}

	/// Whether the service understands the definition and bound span
	/// operation, which resolves the definitions and the span of the
	/// triggering reference in one request.
	#[must_use]
	pub fn supports_definition_and_bound_span(&self) -> bool {
		self.at_least(2, 7)
	}

	fn at_least(&self, major: u64, minor: u64) -> bool {
		(self.0.major, self.0.minor) >= (major, minor)
	}
}

impl Default for ProtocolVersion {
	fn default() -> ProtocolVersion {
		ProtocolVersion::new(0, 0, 0)
	}
}

impl std::fmt::Display for ProtocolVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::ProtocolVersion;
	use pretty_assertions::assert_eq;

	#[test]
	fn test_from_display_name() {
		let version = ProtocolVersion::from_display_name("2.7.0");
		assert_eq!(version, ProtocolVersion::new(2, 7, 0));

		let version = ProtocolVersion::from_display_name("3.1.6");
		assert_eq!(version, ProtocolVersion::new(3, 1, 6));

		let version = ProtocolVersion::from_display_name(" 2.9.1 ");
		assert_eq!(version, ProtocolVersion::new(2, 9, 1));

		let version = ProtocolVersion::from_display_name("2.7.0-insiders.20180201");
		assert_eq!(version, ProtocolVersion::new(2, 7, 0));

		let version = ProtocolVersion::from_display_name("not a version");
		assert_eq!(version, ProtocolVersion::new(0, 0, 0));

		let version = ProtocolVersion::from_display_name("");
		assert_eq!(version, ProtocolVersion::new(0, 0, 0));
	}

	#[test]
	fn test_display_name() {
		let version = ProtocolVersion::new(2, 7, 0);
		assert_eq!(version.display_name(), "2.7.0");
		assert_eq!(version.to_string(), "2.7.0");
	}

	#[test]
	fn test_supports_definition_and_bound_span() {
		assert!(ProtocolVersion::new(2, 7, 0).supports_definition_and_bound_span());
		assert!(ProtocolVersion::new(2, 8, 1).supports_definition_and_bound_span());
		assert!(ProtocolVersion::new(3, 0, 0).supports_definition_and_bound_span());
		assert!(!ProtocolVersion::new(2, 6, 2).supports_definition_and_bound_span());
		assert!(!ProtocolVersion::new(1, 8, 0).supports_definition_and_bound_span());
		assert!(!ProtocolVersion::default().supports_definition_and_bound_span());
	}

	#[test]
	fn test_ordering() {
		assert!(ProtocolVersion::new(2, 7, 0) > ProtocolVersion::new(2, 6, 9));
		assert!(ProtocolVersion::new(3, 0, 0) > ProtocolVersion::new(2, 7, 0));
		assert_eq!(ProtocolVersion::default(), ProtocolVersion::new(0, 0, 0));
	}
}
