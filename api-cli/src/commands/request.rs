// api-cli/src/commands/request.rs
use crate::output::{exit_code_for, print_response, ErrorResponse, ExitCode, Response};
use anyhow::{anyhow, bail, Result};
use api_factory::{ApiError, CancellationToken, Data, Method, Options};
use api_client::ApiClient;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(clap::Args, Clone, Debug)]
pub struct RequestArgs {
    /// URL template, e.g. /api/card/:id
    pub template: String,
    /// Parameter as NAME=VALUE; values that parse as JSON are sent as JSON
    #[arg(short, long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,
    /// Placeholder to substitute without URL-encoding
    #[arg(long, value_name = "NAME")]
    pub raw: Vec<String>,
    /// Don't publish a status notification for this request
    #[arg(long)]
    pub no_event: bool,
    /// Cancel the request after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Split `NAME=VALUE`, reading VALUE as JSON when it parses
pub fn parse_param(param: &str) -> Result<(String, Value)> {
    let (name, value) = param
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{}'", param))?;
    if name.is_empty() {
        bail!("parameter name cannot be empty in '{}'", param);
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

fn build(args: &RequestArgs) -> Result<(Data, Options)> {
    let mut data = Data::new();
    for param in &args.params {
        let (name, value) = parse_param(param)?;
        data.insert(name, Some(value));
    }

    let mut options = Options::new();
    for name in &args.raw {
        options = options.raw(name.clone());
    }
    if args.no_event {
        options = options.no_event(true);
    }
    Ok((data, options))
}

/// Signal that fires once `timeout` seconds have passed
fn arm_timeout(timeout: Option<u64>) -> Option<CancellationToken> {
    let secs = timeout?;
    let signal = CancellationToken::new();
    let trigger = signal.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(secs)).await;
        trigger.cancel();
    });
    Some(signal)
}

fn report(result: Result<Value, ApiError>) -> Result<ExitCode> {
    match result {
        Ok(body) => {
            print_response(&Response::ok(body))?;
            Ok(ExitCode::Success)
        }
        Err(err) => {
            print_response(&Response::<()>::error(ErrorResponse::from_api_error(&err)))?;
            Ok(exit_code_for(&err))
        }
    }
}

fn reject_arguments(err: anyhow::Error) -> Result<ExitCode> {
    print_response(&Response::<()>::error(ErrorResponse::validation_failed(
        err.to_string(),
    )))?;
    Ok(ExitCode::PermanentError)
}

pub async fn handle_request(client: &ApiClient, method: Method, args: RequestArgs) -> Result<ExitCode> {
    let (data, mut options) = match build(&args) {
        Ok(built) => built,
        Err(e) => return reject_arguments(e),
    };
    if let Some(signal) = arm_timeout(args.timeout) {
        options = options.cancelled(signal);
    }

    debug!(method = %method, template = %args.template, "sending request");
    let result = client
        .method(method, &args.template)
        .call_with(data, options)
        .await;
    report(result)
}

/// GET that Ctrl-C cancels
pub async fn handle_watch(client: &ApiClient, args: RequestArgs) -> Result<ExitCode> {
    let (data, mut options) = match build(&args) {
        Ok(built) => built,
        Err(e) => return reject_arguments(e),
    };
    if let Some(signal) = arm_timeout(args.timeout) {
        options = options.cancelled(signal);
    }

    let request = match client.get_with_xhr(&args.template).call_with(data, options) {
        Ok(request) => request,
        Err(e) => return report(Err(e)),
    };

    let cancel = request.promise.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupted, canceling request");
            cancel.cancel();
        }
    });

    let result = request.result().await;
    interrupt.abort();
    report(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(params: &[&str]) -> RequestArgs {
        RequestArgs {
            template: "/api/card/:id".to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            raw: Vec::new(),
            no_event: false,
            timeout: None,
        }
    }

    #[test]
    fn test_parse_param_json_and_text() {
        assert_eq!(parse_param("id=5").unwrap(), ("id".to_string(), json!(5)));
        assert_eq!(
            parse_param("name=Orders by month").unwrap(),
            ("name".to_string(), json!("Orders by month"))
        );
        assert_eq!(
            parse_param("ids=[1,2]").unwrap(),
            ("ids".to_string(), json!([1, 2]))
        );
        assert_eq!(parse_param("q=").unwrap(), ("q".to_string(), json!("")));
        assert_eq!(
            parse_param("expr=a=b").unwrap(),
            ("expr".to_string(), json!("a=b"))
        );
    }

    #[test]
    fn test_parse_param_rejects_malformed() {
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=5").is_err());
    }

    #[test]
    fn test_build_collects_data_and_options() {
        let mut a = args(&["id=5", "ignore_cache=true"]);
        a.raw = vec!["id".to_string()];
        a.no_event = true;

        let (data, options) = build(&a).unwrap();
        assert_eq!(data.get("id"), Some(&json!(5)));
        assert_eq!(data.get("ignore_cache"), Some(&json!(true)));

        let config = options.resolve();
        assert!(config.no_event);
        assert!(config.raw.contains("id"));
    }

    #[tokio::test]
    async fn test_timeout_signal_fires() {
        assert!(arm_timeout(None).is_none());
        let signal = arm_timeout(Some(0)).unwrap();
        signal.cancelled().await;
        assert!(signal.is_cancelled());
    }
}
