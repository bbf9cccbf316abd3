use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use tracing::debug;

use crate::data::{HttpReadOptions, TransportConfig};
use crate::error::{ErrorCode, Result};

/// Build the HTTP client described by `config`.
pub fn build_client(config: &TransportConfig) -> Result<Client> {
    let mut builder = Client::builder().danger_accept_invalid_certs(config.accepts_invalid_certs());
    if let Some(timeout) = config.get_timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(user_agent) = config.get_user_agent() {
        builder = builder.user_agent(user_agent);
    }

    builder
        .build()
        .map_err(|e| {
            let message = format!("failed to build http client: {e}");
            ErrorCode::HttpRequestCreate.with_source(e, message)
        })
}

pub fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.as_bytes())
        .map_err(|e| ErrorCode::HttpRequestCreate.with_source(e, format!("invalid http method [{method}]")))
}

pub fn header_map(headers: &HashMap<String, Vec<String>>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, values) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ErrorCode::HttpRequestCreate.with_source(e, format!("invalid header name [{name}]")))?;
        for value in values {
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                ErrorCode::HttpRequestCreate.with_source(e, format!("invalid value for header [{name}]"))
            })?;
            map.append(header_name.clone(), header_value);
        }
    }
    Ok(map)
}

/// Map a read-side response status onto the error taxonomy.
pub fn check_status(uri: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ErrorCode::ProtoFileNoExist.error(format!("http resource [{uri}] does not exist")));
    }
    Err(ErrorCode::StatusCode.error(format!("invalid http status code: {}", status.as_u16())))
}

/// Issue the read request and return the response once its status is known
/// to be successful.
pub async fn fetch(client: &Client, uri: &str, options: HttpReadOptions) -> Result<Response> {
    let method = parse_method(&options.effective_method())?;
    let headers = header_map(&options.headers)?;

    let mut request = client.request(method.clone(), uri).headers(headers);
    if !options.form.is_empty() {
        let query: Vec<(&str, &str)> = options
            .form
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
            .collect();
        request = request.query(&query);
    }
    if !options.req_body.is_empty() {
        request = request.body(options.req_body);
    }

    let request = request
        .build()
        .map_err(|e| {
            let message = format!("failed to create http request: {e}");
            ErrorCode::HttpRequestCreate.with_source(e, message)
        })?;

    debug!(%method, url = %request.url(), "requesting http source");
    let response = client
        .execute(request)
        .await
        .map_err(|e| {
            let message = format!("failed to request http resource: {e}");
            ErrorCode::HttpRequest.with_source(e, message)
        })?;

    check_status(uri, response.status())?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_success_range() {
        assert!(check_status("http://h/a", StatusCode::OK).is_ok());
        assert!(check_status("http://h/a", StatusCode::NO_CONTENT).is_ok());
    }

    #[test]
    fn test_status_not_found() {
        let err = check_status("http://h/a", StatusCode::NOT_FOUND).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProtoFileNoExist);
    }

    #[test]
    fn test_status_other() {
        let err = check_status("http://h/a", StatusCode::INTERNAL_SERVER_ERROR).unwrap_err();
        assert_eq!(err.code(), ErrorCode::StatusCode);
        assert!(err.message().contains("500"));

        let err = check_status("http://h/a", StatusCode::MOVED_PERMANENTLY).unwrap_err();
        assert_eq!(err.code(), ErrorCode::StatusCode);
    }

    #[test]
    fn test_header_map_multi_value() {
        let mut headers = HashMap::new();
        headers.insert("X-Tag".to_string(), vec!["a".to_string(), "b".to_string()]);

        let map = header_map(&headers).unwrap();
        assert_eq!(map.get_all("x-tag").iter().count(), 2);
    }

    #[test]
    fn test_header_map_rejects_bad_name() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), vec!["v".to_string()]);

        let err = header_map(&headers).unwrap_err();
        assert_eq!(err.code(), ErrorCode::HttpRequestCreate);
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("PUT").unwrap(), Method::PUT);
        assert_eq!(parse_method("BAD METHOD").unwrap_err().code(), ErrorCode::HttpRequestCreate);
    }

    #[test]
    fn test_build_client_default() {
        assert!(build_client(&TransportConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        use std::error::Error as _;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}/a.pdf", listener.local_addr().unwrap());
        drop(listener);

        let client = build_client(&TransportConfig::default()).unwrap();
        let err = fetch(&client, &uri, HttpReadOptions::default()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::HttpRequest);
        assert!(err.message().starts_with("failed to request http resource: "));
        assert!(err.source().is_some());
    }
}
