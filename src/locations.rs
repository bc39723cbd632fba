use crate::{
	error::{return_error, Result},
	service::{FileLocationArgs, FileSpan, Request, Response, Service},
};
use lsp_types as lsp;
use tokio_util::sync::CancellationToken;

/// The plain location operations, which resolve symbol locations without a
/// bound span.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Lookup {
	Definition,
	Implementation,
	TypeDefinition,
}

impl Lookup {
	fn request(self, args: FileLocationArgs) -> Request {
		match self {
			Lookup::Definition => Request::Definition(args),
			Lookup::Implementation => Request::Implementation(args),
			Lookup::TypeDefinition => Request::TypeDefinition(args),
		}
	}

	fn spans(self, response: Response) -> Result<Vec<FileSpan>> {
		match (self, response) {
			(Lookup::Definition, Response::Definition(spans))
			| (Lookup::Implementation, Response::Implementation(spans))
			| (Lookup::TypeDefinition, Response::TypeDefinition(spans)) => Ok(spans),
			_ => return_error!("Unexpected response type."),
		}
	}
}

/// Resolve the locations of the symbol at `position` with one of the plain
/// location operations.
///
/// Returns `None` without a request when the service cannot address the
/// document. Any failure of the request degrades to an empty list.
pub(crate) async fn symbol_locations(
	service: &dyn Service,
	lookup: Lookup,
	document: &lsp::Url,
	position: lsp::Position,
	token: &CancellationToken,
) -> Option<Vec<lsp::Location>> {
	// Resolve the document to a path the service can address.
	let file = service.to_service_path(document)?;

	// Create the arguments.
	let args = FileLocationArgs::new(file, position);

	// Perform the lookup. Failures degrade to an empty list.
	match lookup_locations(service, lookup, args, token).await {
		Ok(locations) => Some(locations),
		Err(_) => Some(Vec::new()),
	}
}

async fn lookup_locations(
	service: &dyn Service,
	lookup: Lookup,
	args: FileLocationArgs,
	token: &CancellationToken,
) -> Result<Vec<lsp::Location>> {
	// Create the request.
	let request = lookup.request(args);
	tracing::trace!(command = request.command(), "Sending the request.");

	// Perform the request.
	let response = service.execute(request, token).await?;

	// Get the spans from the response.
	let spans = lookup.spans(response)?;

	// Convert the spans.
	let locations = spans
		.iter()
		.map(|span| {
			let uri = service.to_document_uri(&span.file)?;
			let range = lsp::Range::from(span);
			Ok(lsp::Location { uri, range })
		})
		.collect::<Result<_>>()?;

	Ok(locations)
}
