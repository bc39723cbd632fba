use crate::{
	definition::DefinitionProvider,
	implementation::ImplementationProvider,
	type_definition::TypeDefinitionProvider,
};
use futures::future;
use lsp_types as lsp;
use std::sync::{Arc, Mutex, Weak};
use tokio_util::sync::CancellationToken;

/// The extension point providers register under.
///
/// Cloning a registry produces another handle to the same registrations.
#[derive(Clone, Default)]
pub struct Registry {
	state: Arc<Mutex<State>>,
}

/// Keeps a provider registered. Dropping it unregisters the provider.
#[must_use]
pub struct Registration {
	state: Weak<Mutex<State>>,
	kind: Kind,
	id: u64,
}

#[derive(Default)]
struct State {
	next_id: u64,
	definition: Vec<Entry<DefinitionProvider>>,
	implementation: Vec<Entry<ImplementationProvider>>,
	type_definition: Vec<Entry<TypeDefinitionProvider>>,
}

struct Entry<P> {
	id: u64,
	filters: Vec<Filter>,
	provider: Arc<P>,
}

#[derive(Clone, Copy, Debug)]
enum Kind {
	Definition,
	Implementation,
	TypeDefinition,
}

/// A compiled document filter. Components that are absent match anything.
struct Filter {
	language: Option<String>,
	scheme: Option<String>,
	pattern: Option<globset::GlobMatcher>,
	valid: bool,
}

impl Registry {
	#[must_use]
	pub fn new() -> Registry {
		Registry::default()
	}

	/// Register a definition provider for the documents matched by
	/// `selector`.
	pub fn register_definition_provider(
		&self,
		selector: lsp::DocumentSelector,
		provider: DefinitionProvider,
	) -> Registration {
		let mut state = self.state.lock().unwrap();
		let id = state.next_id;
		state.next_id += 1;
		state.definition.push(Entry {
			id,
			filters: compile(&selector),
			provider: Arc::new(provider),
		});
		tracing::debug!(id, "Registered a definition provider.");
		Registration {
			state: Arc::downgrade(&self.state),
			kind: Kind::Definition,
			id,
		}
	}

	/// Register an implementation provider for the documents matched by
	/// `selector`.
	pub fn register_implementation_provider(
		&self,
		selector: lsp::DocumentSelector,
		provider: ImplementationProvider,
	) -> Registration {
		let mut state = self.state.lock().unwrap();
		let id = state.next_id;
		state.next_id += 1;
		state.implementation.push(Entry {
			id,
			filters: compile(&selector),
			provider: Arc::new(provider),
		});
		tracing::debug!(id, "Registered an implementation provider.");
		Registration {
			state: Arc::downgrade(&self.state),
			kind: Kind::Implementation,
			id,
		}
	}

	/// Register a type definition provider for the documents matched by
	/// `selector`.
	pub fn register_type_definition_provider(
		&self,
		selector: lsp::DocumentSelector,
		provider: TypeDefinitionProvider,
	) -> Registration {
		let mut state = self.state.lock().unwrap();
		let id = state.next_id;
		state.next_id += 1;
		state.type_definition.push(Entry {
			id,
			filters: compile(&selector),
			provider: Arc::new(provider),
		});
		tracing::debug!(id, "Registered a type definition provider.");
		Registration {
			state: Arc::downgrade(&self.state),
			kind: Kind::TypeDefinition,
			id,
		}
	}

	/// Resolve definitions for the document with the providers registered
	/// for it.
	///
	/// The matching providers are queried concurrently and the first
	/// registered provider with a result wins. Returns `None` when no
	/// provider matches the document or every matching provider returns an
	/// absent result.
	pub async fn definition(
		&self,
		document: &lsp::Url,
		language: &str,
		position: lsp::Position,
		token: &CancellationToken,
	) -> Option<lsp::GotoDefinitionResponse> {
		let providers = {
			let state = self.state.lock().unwrap();
			state
				.definition
				.iter()
				.filter(|entry| entry.matches(document, language))
				.map(|entry| entry.provider.clone())
				.collect::<Vec<_>>()
		};
		let results = future::join_all(
			providers
				.iter()
				.map(|provider| provider.provide_definition(document, position, token)),
		)
		.await;
		results.into_iter().flatten().next()
	}

	/// Resolve type definitions for the document with the providers
	/// registered for it. Same semantics as [`Registry::definition`].
	pub async fn type_definition(
		&self,
		document: &lsp::Url,
		language: &str,
		position: lsp::Position,
		token: &CancellationToken,
	) -> Option<Vec<lsp::Location>> {
		let providers = {
			let state = self.state.lock().unwrap();
			state
				.type_definition
				.iter()
				.filter(|entry| entry.matches(document, language))
				.map(|entry| entry.provider.clone())
				.collect::<Vec<_>>()
		};
		let results = future::join_all(
			providers
				.iter()
				.map(|provider| provider.provide_type_definition(document, position, token)),
		)
		.await;
		results.into_iter().flatten().next()
	}

	/// Resolve implementations for the document with the providers
	/// registered for it. Same semantics as [`Registry::definition`].
	pub async fn implementation(
		&self,
		document: &lsp::Url,
		language: &str,
		position: lsp::Position,
		token: &CancellationToken,
	) -> Option<Vec<lsp::Location>> {
		let providers = {
			let state = self.state.lock().unwrap();
			state
				.implementation
				.iter()
				.filter(|entry| entry.matches(document, language))
				.map(|entry| entry.provider.clone())
				.collect::<Vec<_>>()
		};
		let results = future::join_all(
			providers
				.iter()
				.map(|provider| provider.provide_implementation(document, position, token)),
		)
		.await;
		results.into_iter().flatten().next()
	}
}

impl Drop for Registration {
	fn drop(&mut self) {
		let Some(state) = self.state.upgrade() else {
			return;
		};
		let mut state = state.lock().unwrap();
		match self.kind {
			Kind::Definition => state.definition.retain(|entry| entry.id != self.id),
			Kind::Implementation => state.implementation.retain(|entry| entry.id != self.id),
			Kind::TypeDefinition => state.type_definition.retain(|entry| entry.id != self.id),
		}
		tracing::debug!(id = self.id, "Unregistered the provider.");
	}
}

impl<P> Entry<P> {
	fn matches(&self, uri: &lsp::Url, language: &str) -> bool {
		self.filters.iter().any(|filter| filter.matches(uri, language))
	}
}

fn compile(selector: &lsp::DocumentSelector) -> Vec<Filter> {
	selector.iter().map(Filter::new).collect()
}

impl Filter {
	fn new(filter: &lsp::DocumentFilter) -> Filter {
		let mut valid = true;
		let pattern = filter.pattern.as_ref().and_then(|pattern| {
			match globset::Glob::new(pattern) {
				Ok(glob) => Some(glob.compile_matcher()),
				Err(error) => {
					// A filter with an invalid pattern matches nothing.
					tracing::debug!(?error, "Failed to compile the document filter pattern.");
					valid = false;
					None
				},
			}
		});
		Filter {
			language: filter.language.clone(),
			scheme: filter.scheme.clone(),
			pattern,
			valid,
		}
	}

	fn matches(&self, uri: &lsp::Url, language: &str) -> bool {
		if !self.valid {
			return false;
		}
		if let Some(expected) = &self.language {
			if expected != language {
				return false;
			}
		}
		if let Some(scheme) = &self.scheme {
			if scheme != uri.scheme() {
				return false;
			}
		}
		if let Some(pattern) = &self.pattern {
			if !pattern.is_match(uri.path()) {
				return false;
			}
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::Registry;
	use crate::{
		definition::DefinitionProvider,
		service::{DefinitionAndBoundSpan, FileSpan, Location, Response},
		testing::TestService,
		type_definition::TypeDefinitionProvider,
		version::ProtocolVersion,
	};
	use lsp_types as lsp;
	use pretty_assertions::assert_eq;
	use std::sync::Arc;
	use tokio_util::sync::CancellationToken;

	fn selector(language: &str) -> lsp::DocumentSelector {
		vec![lsp::DocumentFilter {
			language: Some(language.to_owned()),
			scheme: Some("file".to_owned()),
			pattern: None,
		}]
	}

	fn linking_service(target: &str) -> Arc<TestService> {
		let target = target.to_owned();
		Arc::new(
			TestService::new(ProtocolVersion::new(3, 0, 0)).with_handler(move |_| {
				Ok(Response::DefinitionAndBoundSpan(DefinitionAndBoundSpan {
					definitions: vec![FileSpan {
						file: target.clone(),
						start: Location { line: 1, offset: 1 },
						end: Location { line: 1, offset: 5 },
					}],
					text_span: None,
				}))
			}),
		)
	}

	fn link_targets(response: Option<lsp::GotoDefinitionResponse>) -> Vec<lsp::Url> {
		let Some(lsp::GotoDefinitionResponse::Link(links)) = response else {
			panic!("expected links");
		};
		links.into_iter().map(|link| link.target_uri).collect()
	}

	#[tokio::test]
	async fn test_selector_matching() {
		let registry = Registry::new();
		let _registration = registry.register_definition_provider(
			selector("typescript"),
			DefinitionProvider::new(linking_service("/workspace/lib.ts")),
		);
		let document = lsp::Url::parse("file:///workspace/main.ts").unwrap();
		let position = lsp::Position {
			line: 0,
			character: 0,
		};
		let token = CancellationToken::new();

		let response = registry
			.definition(&document, "typescript", position, &token)
			.await;
		assert_eq!(
			link_targets(response),
			vec![lsp::Url::parse("file:///workspace/lib.ts").unwrap()],
		);

		let response = registry
			.definition(&document, "javascript", position, &token)
			.await;
		assert!(response.is_none());
	}

	#[tokio::test]
	async fn test_pattern_matching() {
		let registry = Registry::new();
		let _registration = registry.register_definition_provider(
			vec![lsp::DocumentFilter {
				language: None,
				scheme: None,
				pattern: Some("*.d.ts".to_owned()),
			}],
			DefinitionProvider::new(linking_service("/workspace/lib.ts")),
		);
		let position = lsp::Position {
			line: 0,
			character: 0,
		};
		let token = CancellationToken::new();

		let document = lsp::Url::parse("file:///workspace/global.d.ts").unwrap();
		let response = registry
			.definition(&document, "typescript", position, &token)
			.await;
		assert!(response.is_some());

		let document = lsp::Url::parse("file:///workspace/main.ts").unwrap();
		let response = registry
			.definition(&document, "typescript", position, &token)
			.await;
		assert!(response.is_none());
	}

	#[tokio::test]
	async fn test_invalid_pattern_matches_nothing() {
		let registry = Registry::new();
		let _registration = registry.register_definition_provider(
			vec![lsp::DocumentFilter {
				language: None,
				scheme: None,
				pattern: Some("[".to_owned()),
			}],
			DefinitionProvider::new(linking_service("/workspace/lib.ts")),
		);
		let document = lsp::Url::parse("file:///workspace/main.ts").unwrap();
		let position = lsp::Position {
			line: 0,
			character: 0,
		};
		let token = CancellationToken::new();

		let response = registry
			.definition(&document, "typescript", position, &token)
			.await;
		assert!(response.is_none());
	}

	#[tokio::test]
	async fn test_first_registered_provider_wins() {
		let registry = Registry::new();
		let _first = registry.register_definition_provider(
			selector("typescript"),
			DefinitionProvider::new(linking_service("/workspace/first.ts")),
		);
		let _second = registry.register_definition_provider(
			selector("typescript"),
			DefinitionProvider::new(linking_service("/workspace/second.ts")),
		);
		let document = lsp::Url::parse("file:///workspace/main.ts").unwrap();
		let position = lsp::Position {
			line: 0,
			character: 0,
		};
		let token = CancellationToken::new();

		let response = registry
			.definition(&document, "typescript", position, &token)
			.await;
		assert_eq!(
			link_targets(response),
			vec![lsp::Url::parse("file:///workspace/first.ts").unwrap()],
		);
	}

	#[tokio::test]
	async fn test_absent_results_fall_through() {
		let registry = Registry::new();
		let _first = registry.register_definition_provider(
			selector("typescript"),
			DefinitionProvider::new(Arc::new(
				TestService::new(ProtocolVersion::new(3, 0, 0)).without_resolvable_paths(),
			)),
		);
		let _second = registry.register_definition_provider(
			selector("typescript"),
			DefinitionProvider::new(linking_service("/workspace/second.ts")),
		);
		let document = lsp::Url::parse("file:///workspace/main.ts").unwrap();
		let position = lsp::Position {
			line: 0,
			character: 0,
		};
		let token = CancellationToken::new();

		let response = registry
			.definition(&document, "typescript", position, &token)
			.await;
		assert_eq!(
			link_targets(response),
			vec![lsp::Url::parse("file:///workspace/second.ts").unwrap()],
		);
	}

	#[tokio::test]
	async fn test_dropping_a_registration_unregisters() {
		let registry = Registry::new();
		let registration = registry.register_definition_provider(
			selector("typescript"),
			DefinitionProvider::new(linking_service("/workspace/lib.ts")),
		);
		let document = lsp::Url::parse("file:///workspace/main.ts").unwrap();
		let position = lsp::Position {
			line: 0,
			character: 0,
		};
		let token = CancellationToken::new();

		let response = registry
			.definition(&document, "typescript", position, &token)
			.await;
		assert!(response.is_some());

		drop(registration);

		let response = registry
			.definition(&document, "typescript", position, &token)
			.await;
		assert!(response.is_none());
	}

	#[test]
	fn test_dropping_a_registration_after_the_registry() {
		let registration = {
			let registry = Registry::new();
			registry.register_definition_provider(
				selector("typescript"),
				DefinitionProvider::new(linking_service("/workspace/lib.ts")),
			)
		};

		// The registry is gone, so dropping the registration is a no-op.
		drop(registration);
	}

	#[tokio::test]
	async fn test_scheme_matching() {
		let registry = Registry::new();
		let _untitled = registry.register_definition_provider(
			vec![lsp::DocumentFilter {
				language: None,
				scheme: Some("untitled".to_owned()),
				pattern: None,
			}],
			DefinitionProvider::new(linking_service("/workspace/untitled.ts")),
		);
		let _file = registry.register_definition_provider(
			vec![lsp::DocumentFilter {
				language: None,
				scheme: Some("file".to_owned()),
				pattern: None,
			}],
			DefinitionProvider::new(linking_service("/workspace/lib.ts")),
		);
		let position = lsp::Position {
			line: 0,
			character: 0,
		};
		let token = CancellationToken::new();

		// The mismatched scheme excludes the first registered provider.
		let document = lsp::Url::parse("file:///workspace/main.ts").unwrap();
		let response = registry
			.definition(&document, "typescript", position, &token)
			.await;
		assert_eq!(
			link_targets(response),
			vec![lsp::Url::parse("file:///workspace/lib.ts").unwrap()],
		);

		let document = lsp::Url::parse("untitled:Untitled-1").unwrap();
		let response = registry
			.definition(&document, "typescript", position, &token)
			.await;
		assert!(response.is_none());
	}

	#[tokio::test]
	async fn test_type_definition_query() {
		let registry = Registry::new();
		let service = Arc::new(
			TestService::new(ProtocolVersion::new(2, 6, 0)).with_handler(|_| {
				Ok(Response::TypeDefinition(vec![FileSpan {
					file: "/workspace/types.ts".to_owned(),
					start: Location { line: 1, offset: 1 },
					end: Location { line: 1, offset: 5 },
				}]))
			}),
		);
		let _registration = registry
			.register_type_definition_provider(
				selector("typescript"),
				TypeDefinitionProvider::new(service),
			);
		let document = lsp::Url::parse("file:///workspace/main.ts").unwrap();
		let position = lsp::Position {
			line: 0,
			character: 0,
		};
		let token = CancellationToken::new();

		let locations = registry
			.type_definition(&document, "typescript", position, &token)
			.await
			.expect("expected locations");
		assert_eq!(
			locations[0].uri,
			lsp::Url::parse("file:///workspace/types.ts").unwrap(),
		);
	}
}
