//! Client facade owning one token manager, one dispatcher, and the resource handles.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenManager, TokenSecret},
	config::{ClientConfig, Environment},
	error::ConfigError,
	http::{Dispatcher, RequestOptions, ResponseBody},
	resources::{Certificados, Empresas, Nfce},
};

/// Entry point for the Nuvem Fiscal API.
///
/// Cloning is cheap and clones share the same token cache. Separately constructed clients are
/// fully independent: their own credentials, their own cache slot.
#[derive(Clone, Debug)]
pub struct Client {
	dispatcher: Dispatcher,
	environment: Option<Environment>,
}
impl Client {
	/// Builds a client from `config`.
	pub fn new(config: ClientConfig) -> Result<Self> {
		config.validate()?;

		let http_client = match config.http_client.clone() {
			Some(client) => client,
			None => ReqwestClient::builder().build().map_err(ConfigError::http_client_build)?,
		};
		let tokens = Arc::new(TokenManager::new(
			Credentials::from(&config),
			config.scope.clone(),
			http_client.clone(),
			config.single_flight,
		));
		let dispatcher = Dispatcher::new(http_client, tokens, config.timeout);

		Ok(Self { dispatcher, environment: config.environment })
	}

	/// Builds a client from `NUVEM_FISCAL_*` environment variables.
	pub fn from_env() -> Result<Self> {
		Self::new(ClientConfig::from_env()?)
	}

	/// Deployment tag the client was configured with.
	pub fn environment(&self) -> Option<Environment> {
		self.environment
	}

	/// Underlying dispatcher.
	pub fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}

	/// Token manager owning this client's cache slot.
	pub fn token_manager(&self) -> &TokenManager {
		self.dispatcher.token_manager()
	}

	/// Returns a currently valid bearer token.
	pub async fn ensure_valid_token(&self) -> Result<TokenSecret> {
		self.token_manager().ensure_valid_token().await
	}

	/// Sends an authenticated call; see [`Dispatcher::send`].
	pub async fn send(&self, path: &str, options: RequestOptions) -> Result<ResponseBody> {
		self.dispatcher.send(path, options).await
	}

	/// Sends an authenticated call and deserializes its JSON body; see [`Dispatcher::send_json`].
	pub async fn send_json<T>(&self, path: &str, options: RequestOptions) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.dispatcher.send_json(path, options).await
	}

	/// Company registration endpoints.
	pub fn empresas(&self) -> Empresas<'_> {
		Empresas::new(self)
	}

	/// Digital certificate endpoints.
	pub fn certificados(&self) -> Certificados<'_> {
		Certificados::new(self)
	}

	/// Consumer invoice (NFC-e) endpoints.
	pub fn nfce(&self) -> Nfce<'_> {
		Nfce::new(self)
	}
}
