//! Gate request handling: token lifecycle endpoints and the proxy fallback.

use axum::{
    Router,
    extract::{Query, Request, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use gatehouse_common::{
    constants::{ACCESS_TOKEN_COOKIE, paths},
    token,
};

use crate::{cookie, proxy, state::AppState};

/// Create the main application router.
///
/// The two fixed cookie-lifecycle paths are routed explicitly; everything
/// else falls through to the gatekeeper, which decides proxy-vs-redirect.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(paths::CHALLENGE_SUCCESS, get(challenge_success))
        .route(paths::LOGOUT, get(logout))
        .fallback(gatekeeper)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct SuccessQuery {
    #[serde(rename = "return")]
    return_url: Option<String>,
}

/// Success callback: mint a token, set the cookie, bounce back to the
/// originally requested URL.
///
/// This endpoint trusts any caller: there is no hand-off proof that Warden
/// actually approved the visitor, so whoever requests this path gets a
/// cookie. Kept to match the deployed behavior; closing the gap would need
/// a signed hand-off between Warden and the Gate.
async fn challenge_success(Query(query): Query<SuccessQuery>) -> Response {
    let target = query
        .return_url
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| "/".to_string());

    tracing::info!("Issuing access token");

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, target),
            (header::SET_COOKIE, cookie::issue_cookie(&token::issue())),
        ],
    )
        .into_response()
}

/// Clear the access cookie and confirm
async fn logout() -> Response {
    let body = "<div style=\"text-align: center; padding: 50px; font-family: Arial;\">\
                <h2>Logged Out</h2>\
                <p>You have been logged out. <a href=\"/\">Return to the site</a></p>\
                </div>";

    (
        [(header::SET_COOKIE, cookie::clear_cookie())],
        Html(body.to_string()),
    )
        .into_response()
}

/// Every other request: proxy if the cookie holds a valid token, otherwise
/// redirect to Warden with the full original URL as the `return` parameter.
async fn gatekeeper(State(state): State<AppState>, req: Request) -> Response {
    let authorized = req
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| cookie::cookie_value(h, ACCESS_TOKEN_COOKIE))
        .map(token::validate)
        .unwrap_or(false);

    if !authorized {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let original = format!("{}{}", state.config.public_url, path_and_query);
        let target = format!(
            "{}{}?return={}",
            state.config.challenge_url,
            paths::ACCESS_REQUIRED,
            urlencoding::encode(&original)
        );

        tracing::debug!(path = %req.uri().path(), "No valid token, redirecting to challenge");

        return (StatusCode::FOUND, [(header::LOCATION, target)]).into_response();
    }

    match proxy::forward(&state, req).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "Origin request failed");
            proxy::unavailable_page(&err)
        }
    }
}
