use crate::{
	definition, implementation,
	registry::{Registration, Registry},
	service::Service,
	type_definition,
};
use lsp_types as lsp;
use std::sync::Arc;

/// The navigation features to register.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
	#[serde(default = "enabled")]
	pub definitions: bool,
	#[serde(default = "enabled")]
	pub type_definitions: bool,
	#[serde(default = "enabled")]
	pub implementations: bool,
}

impl Default for Config {
	fn default() -> Config {
		Config {
			definitions: true,
			type_definitions: true,
			implementations: true,
		}
	}
}

fn enabled() -> bool {
	true
}

/// Register a provider for each enabled feature. Dropping the returned
/// registrations unregisters the providers.
pub fn register_providers(
	registry: &Registry,
	selector: &lsp::DocumentSelector,
	service: &Arc<dyn Service>,
	config: &Config,
) -> Vec<Registration> {
	let mut registrations = Vec::new();
	if config.definitions {
		registrations.push(definition::register(
			registry,
			selector.clone(),
			service.clone(),
		));
	}
	if config.type_definitions {
		registrations.push(type_definition::register(
			registry,
			selector.clone(),
			service.clone(),
		));
	}
	if config.implementations {
		registrations.push(implementation::register(
			registry,
			selector.clone(),
			service.clone(),
		));
	}
	tracing::debug!(count = registrations.len(), "Registered the providers.");
	registrations
}
