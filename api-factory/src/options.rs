// api-factory/src/options.rs
use crate::data::Data;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// What a transform function sees besides the body
#[derive(Debug)]
pub struct TransformContext<'a> {
    /// Data left after placeholder substitution
    pub data: &'a Data,
}

pub type TransformFn = Arc<dyn Fn(Value, &TransformContext<'_>) -> Value + Send + Sync>;

/// One layer of request configuration.
///
/// Layers merge shallowly: a field set in a later layer replaces the whole
/// field of an earlier one, unset fields fall through.
#[derive(Clone, Default)]
pub struct Options {
    pub no_event: Option<bool>,
    pub transform_response: Option<TransformFn>,
    pub cancelled: Option<CancellationToken>,
    pub raw: Option<HashSet<String>>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("no_event", &self.no_event)
            .field("transform_response", &self.transform_response.is_some())
            .field("cancelled", &self.cancelled)
            .field("raw", &self.raw)
            .finish()
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_event(mut self, no_event: bool) -> Self {
        self.no_event = Some(no_event);
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Value, &TransformContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.transform_response = Some(Arc::new(f));
        self
    }

    pub fn cancelled(mut self, signal: CancellationToken) -> Self {
        self.cancelled = Some(signal);
        self
    }

    /// Exempt a placeholder from URL-encoding
    pub fn raw(mut self, name: impl Into<String>) -> Self {
        self.raw.get_or_insert_with(HashSet::new).insert(name.into());
        self
    }

    /// Layer `overrides` on top of `self`
    pub fn merge(self, overrides: Options) -> Options {
        Options {
            no_event: overrides.no_event.or(self.no_event),
            transform_response: overrides.transform_response.or(self.transform_response),
            cancelled: overrides.cancelled.or(self.cancelled),
            raw: overrides.raw.or(self.raw),
        }
    }

    /// Fill unset fields with the built-in defaults
    pub fn resolve(self) -> RequestConfig {
        RequestConfig {
            no_event: self.no_event.unwrap_or(false),
            transform_response: self.transform_response,
            cancelled: self.cancelled,
            raw: self.raw.unwrap_or_default(),
        }
    }
}

/// Fully merged configuration of a single call
#[derive(Clone)]
pub struct RequestConfig {
    pub no_event: bool,
    /// `None` is the identity transform
    pub transform_response: Option<TransformFn>,
    pub cancelled: Option<CancellationToken>,
    pub raw: HashSet<String>,
}

impl RequestConfig {
    pub fn transform(&self, body: Value, data: &Data) -> Value {
        match &self.transform_response {
            Some(f) => f(body, &TransformContext { data }),
            None => body,
        }
    }
}

/// Per-template options: a full layer, or the transform-only shorthand
#[derive(Clone)]
pub enum MethodOptions {
    Options(Options),
    Transform(TransformFn),
}

impl MethodOptions {
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(Value, &TransformContext<'_>) -> Value + Send + Sync + 'static,
    {
        Self::Transform(Arc::new(f))
    }

    pub fn into_options(self) -> Options {
        match self {
            Self::Options(options) => options,
            Self::Transform(f) => Options {
                transform_response: Some(f),
                ..Options::default()
            },
        }
    }
}

impl Default for MethodOptions {
    fn default() -> Self {
        Self::Options(Options::default())
    }
}

impl From<Options> for MethodOptions {
    fn from(options: Options) -> Self {
        Self::Options(options)
    }
}

impl From<TransformFn> for MethodOptions {
    fn from(f: TransformFn) -> Self {
        Self::Transform(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Options::new().resolve();
        assert!(!config.no_event);
        assert!(config.cancelled.is_none());
        assert!(config.raw.is_empty());
        assert_eq!(config.transform(json!({"a": 1}), &Data::new()), json!({"a": 1}));
    }

    #[test]
    fn test_later_layer_wins_field_by_field() {
        let template = Options::new().no_event(true).raw("path");
        let call = Options::new().raw("id");
        let config = template.merge(call).resolve();

        assert!(config.no_event);
        // raw is replaced as a whole, not unioned
        assert!(config.raw.contains("id"));
        assert!(!config.raw.contains("path"));
    }

    #[test]
    fn test_transform_shorthand() {
        let options = MethodOptions::transform(|body, _| body["data"].clone()).into_options();
        let config = options.resolve();
        assert_eq!(config.transform(json!({"data": [1]}), &Data::new()), json!([1]));
    }

    #[test]
    fn test_transform_sees_remaining_data() {
        let config = Options::new()
            .transform(|_, ctx| ctx.data.get("page").cloned().unwrap_or(Value::Null))
            .resolve();
        let data = Data::new().with("page", 2);
        assert_eq!(config.transform(json!({}), &data), json!(2));
    }
}
