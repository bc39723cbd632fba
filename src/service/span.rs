/// A position in the service's addressing scheme. Lines and offsets are
/// one-based.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
	pub line: u32,
	pub offset: u32,
}

/// A span between two positions in one document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
	pub start: Location,
	pub end: Location,
}

/// A span in a document the service names by path.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSpan {
	pub file: String,
	pub start: Location,
	pub end: Location,
}
