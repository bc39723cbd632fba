use crate::{
	error::{return_error, Result},
	locations::{self, Lookup},
	registry::{Registration, Registry},
	service::{FileLocationArgs, Request, Response, Service},
};
use lsp_types as lsp;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Provides "go to definition" for documents the service can analyze.
pub struct DefinitionProvider {
	service: Arc<dyn Service>,
}

/// Register a definition provider for the documents matched by `selector`.
pub fn register(
	registry: &Registry,
	selector: lsp::DocumentSelector,
	service: Arc<dyn Service>,
) -> Registration {
	registry.register_definition_provider(selector, DefinitionProvider::new(service))
}

impl DefinitionProvider {
	#[must_use]
	pub fn new(service: Arc<dyn Service>) -> DefinitionProvider {
		DefinitionProvider { service }
	}

	/// Resolve the definitions of the symbol at `position`.
	///
	/// The strategy depends on the service's protocol version. At 2.7 and
	/// above, one request resolves the definitions and the bound span of the
	/// triggering reference, and the result is a list of links. Below 2.7,
	/// the plain definition operation resolves a list of locations.
	///
	/// This call fails soft: any failure of the service request yields an
	/// empty list rather than an error, and cancelling `token` before the
	/// response arrives counts as a failure. Returns `None` without a
	/// request when the service cannot address the document.
	pub async fn provide_definition(
		&self,
		document: &lsp::Url,
		position: lsp::Position,
		token: &CancellationToken,
	) -> Option<lsp::GotoDefinitionResponse> {
		// Choose the strategy the service's protocol version supports.
		if self
			.service
			.protocol_version()
			.supports_definition_and_bound_span()
		{
			let links = self.definition_links(document, position, token).await?;
			return Some(lsp::GotoDefinitionResponse::Link(links));
		}

		let locations = locations::symbol_locations(
			self.service.as_ref(),
			Lookup::Definition,
			document,
			position,
			token,
		)
		.await?;
		Some(lsp::GotoDefinitionResponse::Array(locations))
	}

	async fn definition_links(
		&self,
		document: &lsp::Url,
		position: lsp::Position,
		token: &CancellationToken,
	) -> Option<Vec<lsp::LocationLink>> {
		// Resolve the document to a path the service can address.
		let file = self.service.to_service_path(document)?;

		// Create the arguments.
		let args = FileLocationArgs::new(file, position);

		// Perform the request. Failures degrade to an empty list.
		match self.request_links(args, token).await {
			Ok(links) => Some(links),
			Err(_) => Some(Vec::new()),
		}
	}

	async fn request_links(
		&self,
		args: FileLocationArgs,
		token: &CancellationToken,
	) -> Result<Vec<lsp::LocationLink>> {
		// Create the request.
		let request = Request::DefinitionAndBoundSpan(args);
		tracing::trace!(command = request.command(), "Sending the request.");

		// Perform the request.
		let response = self.service.execute(request, token).await?;

		// Get the response.
		let Response::DefinitionAndBoundSpan(body) = response else {
			return_error!("Unexpected response type.");
		};

		// Convert the bound span, if the service reported one.
		let origin = body.text_span.map(lsp::Range::from);

		// Convert the definitions.
		let links = body
			.definitions
			.iter()
			.map(|span| {
				let uri = self.service.to_document_uri(&span.file)?;
				let range = lsp::Range::from(span);
				Ok(lsp::LocationLink {
					origin_selection_range: origin,
					target_uri: uri,
					target_range: range,
					target_selection_range: range,
				})
			})
			.collect::<Result<_>>()?;

		Ok(links)
	}
}
