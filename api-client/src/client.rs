// api-client/src/client.rs
use crate::config::Config;
use anyhow::Result;
use api_factory::{Api, ApiMethod, Data, Method, Notifier, Options, ReqwestTransport, XhrMethod};
use serde_json::Value;

/// An `Api` over reqwest, set up from a `Config`
pub struct ApiClient {
    api: Api<ReqwestTransport>,
    defaults: Options,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        let mut transport = ReqwestTransport::new();
        if let Some(token) = &config.token {
            transport = transport.with_token(token.clone());
        }

        let notifier = Notifier::with_capacity(config.event_capacity);
        let api = Api::with_basename(transport, notifier, config.base_url.clone());

        let mut defaults = Options::new();
        if config.no_event {
            defaults = defaults.no_event(true);
        }

        Self { api, defaults }
    }

    pub fn from_config_file() -> Result<Self> {
        Ok(Self::new(&Config::load()?))
    }

    pub fn api(&self) -> &Api<ReqwestTransport> {
        &self.api
    }

    pub fn notifier(&self) -> &Notifier {
        self.api.notifier()
    }

    /// Request method with the configured defaults as its template options
    pub fn method(&self, method: Method, template: &str) -> ApiMethod<ReqwestTransport> {
        self.api.method(method, template, self.defaults.clone())
    }

    pub fn get_with_xhr(&self, template: &str) -> XhrMethod<ReqwestTransport> {
        self.api.get_with_xhr(template, self.defaults.clone())
    }

    /// One-shot request. `ApiError` is kept as the source for downcasting.
    pub async fn request(
        &self,
        method: Method,
        template: &str,
        data: Data,
        options: Options,
    ) -> Result<Value> {
        let body = self.method(method, template).call_with(data, options).await?;
        Ok(body)
    }
}
