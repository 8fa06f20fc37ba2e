//! Proxy forwarder: relays an authorized request to the protected origin.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderName, StatusCode},
    response::{Html, IntoResponse, Response},
};

use gatehouse_common::GatehouseError;

use crate::state::AppState;

/// Forward a request to the origin, streaming the body both ways.
///
/// The origin sees the same method, headers, path, and query; its response
/// comes back with status and headers intact. Failures surface as
/// [`GatehouseError::Upstream`] for the caller to turn into the error page.
pub async fn forward(state: &AppState, req: Request) -> Result<Response, GatehouseError> {
    let (parts, body) = req.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{}", state.config.origin_url, path_and_query);

    let mut headers = HeaderMap::new();
    for (name, value) in parts.headers.iter() {
        if !skip_header(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    tracing::debug!(method = %parts.method, url = %url, "Forwarding to origin");

    let outbound = state
        .http
        .request(parts.method, &url)
        .headers(headers)
        .body(reqwest::Body::wrap_stream(body.into_data_stream()))
        .send()
        .await
        .map_err(|e| GatehouseError::Upstream(e.to_string()))?;

    let mut response = Response::builder().status(outbound.status());
    if let Some(response_headers) = response.headers_mut() {
        for (name, value) in outbound.headers() {
            if !skip_header(name) {
                response_headers.append(name.clone(), value.clone());
            }
        }
    }

    response
        .body(Body::from_stream(outbound.bytes_stream()))
        .map_err(|e| GatehouseError::Internal(e.to_string()))
}

/// Fixed error page shown when the origin cannot be reached.
///
/// The one place a fault is swallowed into a user-facing page: the
/// underlying error text is included for operator diagnosis.
pub fn unavailable_page(err: &GatehouseError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::SERVICE_UNAVAILABLE);

    let body = format!(
        "<!DOCTYPE html>\
         <html>\
         <head><title>Service Unavailable</title></head>\
         <body style=\"font-family: Arial, sans-serif; padding: 40px; text-align: center;\">\
         <h1>Service Temporarily Unavailable</h1>\
         <div class=\"error\">\
         <p>The service is currently unavailable. Please try again later.</p>\
         <p>Error: {err}</p>\
         </div>\
         <p><a href=\"/\">Try Again</a> | <a href=\"/logout\">Logout</a></p>\
         </body>\
         </html>"
    );

    (status, Html(body)).into_response()
}

/// Headers not relayed in either direction: connection-scoped framing plus
/// `Host`, which must name the origin, and `Content-Length`, which the
/// client recomputes for the streamed body.
fn skip_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "host"
            | "content-length"
            | "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_skip_header() {
        assert!(skip_header(&header::HOST));
        assert!(skip_header(&header::CONNECTION));
        assert!(skip_header(&header::TRANSFER_ENCODING));
        assert!(!skip_header(&header::ACCEPT));
        assert!(!skip_header(&header::COOKIE));
        assert!(!skip_header(&HeaderName::from_static("x-custom")));
    }

    #[test]
    fn test_unavailable_page_status() {
        let err = GatehouseError::Upstream("connection refused".to_string());
        let response = unavailable_page(&err);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
