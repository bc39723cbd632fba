pub use self::span::{FileSpan, Location, TextSpan};
use crate::{
	error::{Result, WrapErr},
	version::ProtocolVersion,
};
use async_trait::async_trait;
use lsp_types as lsp;
use tokio_util::sync::CancellationToken;

pub mod span;

/// A request to the language analysis service.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(tag = "command", content = "arguments", rename_all = "camelCase")]
pub enum Request {
	Definition(FileLocationArgs),
	DefinitionAndBoundSpan(FileLocationArgs),
	Implementation(FileLocationArgs),
	TypeDefinition(FileLocationArgs),
}

/// A response from the language analysis service.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize)]
#[serde(tag = "command", content = "body", rename_all = "camelCase")]
pub enum Response {
	Definition(Vec<FileSpan>),
	DefinitionAndBoundSpan(DefinitionAndBoundSpan),
	Implementation(Vec<FileSpan>),
	TypeDefinition(Vec<FileSpan>),
}

/// The arguments for every position-addressed operation.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileLocationArgs {
	pub file: String,
	pub line: u32,
	pub offset: u32,
}

/// The body of a definition and bound span response. The bound span is the
/// span of the reference that triggered the lookup, and the service may omit
/// it.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionAndBoundSpan {
	pub definitions: Vec<FileSpan>,
	pub text_span: Option<TextSpan>,
}

impl FileLocationArgs {
	#[must_use]
	pub fn new(file: String, position: lsp::Position) -> FileLocationArgs {
		let position = Location::from(position);
		FileLocationArgs {
			file,
			line: position.line,
			offset: position.offset,
		}
	}
}

impl Request {
	/// The service's name for the operation.
	#[must_use]
	pub fn command(&self) -> &'static str {
		match self {
			Request::Definition(_) => "definition",
			Request::DefinitionAndBoundSpan(_) => "definitionAndBoundSpan",
			Request::Implementation(_) => "implementation",
			Request::TypeDefinition(_) => "typeDefinition",
		}
	}
}

/// A handle to a running language analysis service.
///
/// The service is an external process with its own protocol framing and its
/// own document addressing scheme. This trait is the entire seam: send a
/// named operation with its arguments and receive the typed result or an
/// error. How the request travels is the implementation's concern.
#[async_trait]
pub trait Service: Send + Sync {
	/// The protocol version the service reported when it started.
	fn protocol_version(&self) -> &ProtocolVersion;

	/// Convert a document URI into the path the service addresses the
	/// document by. Returns `None` when the service cannot address the
	/// document.
	fn to_service_path(&self, uri: &lsp::Url) -> Option<String> {
		let path = uri.to_file_path().ok()?;
		Some(path.to_string_lossy().into_owned())
	}

	/// Convert a path reported by the service into a document URI.
	fn to_document_uri(&self, path: &str) -> Result<lsp::Url> {
		lsp::Url::from_file_path(path)
			.ok()
			.wrap_err_with(|| format!(r#"Failed to convert the path "{path}" into a URI."#))
	}

	/// Perform a request and await the response.
	///
	/// Implementations must return an error if `token` is cancelled before
	/// the response arrives, and must return an error for a response that
	/// arrives without a body. Callers treat both like any other failure.
	async fn execute(&self, request: Request, token: &CancellationToken) -> Result<Response>;
}
