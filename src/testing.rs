use crate::{
	error::{error, Result},
	service::{Request, Response, Service},
	version::ProtocolVersion,
};
use async_trait::async_trait;
use lsp_types as lsp;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

type Handler = Box<dyn Fn(&Request) -> Result<Response> + Send + Sync>;

/// A scripted service for tests.
///
/// Requests are recorded in order, so tests can assert which operations were
/// issued. A cancelled token fails the request before the handler runs.
pub struct TestService {
	version: ProtocolVersion,
	resolve_paths: bool,
	handler: Option<Handler>,
	requests: Mutex<Vec<Request>>,
}

impl TestService {
	#[must_use]
	pub fn new(version: ProtocolVersion) -> TestService {
		TestService {
			version,
			resolve_paths: true,
			handler: None,
			requests: Mutex::new(Vec::new()),
		}
	}

	/// Answer requests with `handler`.
	#[must_use]
	pub fn with_handler<F>(mut self, handler: F) -> TestService
	where
		F: Fn(&Request) -> Result<Response> + Send + Sync + 'static,
	{
		self.handler = Some(Box::new(handler));
		self
	}

	/// Make every document unaddressable by the service.
	#[must_use]
	pub fn without_resolvable_paths(mut self) -> TestService {
		self.resolve_paths = false;
		self
	}

	/// The requests executed so far, in order.
	#[must_use]
	pub fn requests(&self) -> Vec<Request> {
		self.requests.lock().unwrap().clone()
	}
}

#[async_trait]
impl Service for TestService {
	fn protocol_version(&self) -> &ProtocolVersion {
		&self.version
	}

	fn to_service_path(&self, uri: &lsp::Url) -> Option<String> {
		if !self.resolve_paths {
			return None;
		}
		let path = uri.to_file_path().ok()?;
		Some(path.to_string_lossy().into_owned())
	}

	async fn execute(&self, request: Request, token: &CancellationToken) -> Result<Response> {
		self.requests.lock().unwrap().push(request.clone());
		if token.is_cancelled() {
			return Err(error!("The request was cancelled."));
		}
		let Some(handler) = &self.handler else {
			return Err(error!("The service has no handler."));
		};
		handler(&request)
	}
}
