use crate::{
	locations::{self, Lookup},
	registry::{Registration, Registry},
	service::Service,
};
use lsp_types as lsp;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Provides "go to implementation" for documents the service can analyze.
pub struct ImplementationProvider {
	service: Arc<dyn Service>,
}

/// Register an implementation provider for the documents matched by
/// `selector`.
pub fn register(
	registry: &Registry,
	selector: lsp::DocumentSelector,
	service: Arc<dyn Service>,
) -> Registration {
	registry.register_implementation_provider(selector, ImplementationProvider::new(service))
}

impl ImplementationProvider {
	#[must_use]
	pub fn new(service: Arc<dyn Service>) -> ImplementationProvider {
		ImplementationProvider { service }
	}

	/// Resolve the implementations of the symbol at `position`.
	///
	/// Fails soft the same way the definition lookup does: failures degrade
	/// to an empty list, and a document the service cannot address yields
	/// `None` without a request.
	pub async fn provide_implementation(
		&self,
		document: &lsp::Url,
		position: lsp::Position,
		token: &CancellationToken,
	) -> Option<Vec<lsp::Location>> {
		locations::symbol_locations(
			self.service.as_ref(),
			Lookup::Implementation,
			document,
			position,
			token,
		)
		.await
	}
}
