//! Challenge pages and submission handling.

use axum::{
    Json,
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::net::SocketAddr;

use gatehouse_common::{ApprovalStatus, SubmitOutcome, constants::paths};

use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReturnQuery {
    /// Originally requested URL, carried through the whole redirect chain
    #[serde(rename = "return")]
    return_url: Option<String>,
}

/// Entry page a gated visitor lands on first
pub async fn access_required(Query(query): Query<ReturnQuery>) -> Html<String> {
    let return_param = urlencoding::encode(query.return_url.as_deref().unwrap_or("/")).to_string();

    Html(page(
        "Access Required",
        &format!(
            "<h2>Access Required</h2>\
             <p>This service is protected. Answer a short question set to continue.</p>\
             <a href=\"{}?return={}\">Start challenge</a>",
            paths::CHALLENGE,
            return_param
        ),
    ))
}

/// The question form
pub async fn challenge_form(Query(query): Query<ReturnQuery>) -> Html<String> {
    let return_value = escape_html(query.return_url.as_deref().unwrap_or("/"));

    Html(page(
        "Challenge",
        &format!(
            "<h2>Challenge</h2>\
             <form method=\"post\" action=\"{}\">\
             <p><label>What is the favorite color? <input name=\"answer1\" autocomplete=\"off\"></label></p>\
             <p><label>What is the favorite fruit? <input name=\"answer2\" autocomplete=\"off\"></label></p>\
             <input type=\"hidden\" name=\"return\" value=\"{}\">\
             <p><button type=\"submit\">Submit</button></p>\
             </form>",
            paths::CHALLENGE,
            return_value
        ),
    ))
}

#[derive(Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    answer1: String,
    #[serde(default)]
    answer2: String,
    #[serde(rename = "return")]
    return_url: Option<String>,
}

/// Evaluate a submitted answer pair.
///
/// Success redirects to the Gate's success endpoint with the original URL in
/// tow; the rejected outcomes each render a status page with a link back to
/// the form.
pub async fn submit_challenge(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    axum::Form(form): axum::Form<SubmitForm>,
) -> Response {
    let identity = state.identity.identity(addr, &headers);
    let return_url = match form.return_url.as_deref() {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => format!("{}/", state.config.gate_url),
    };
    let back_link = format!(
        "<a href=\"{}?return={}\">Back</a>",
        paths::CHALLENGE,
        urlencoding::encode(&return_url)
    );

    let outcome = state
        .store
        .submit(&identity, &form.answer1, &form.answer2)
        .await;

    match outcome {
        SubmitOutcome::Approved => {
            let success_url = format!(
                "{}{}?return={}",
                state.config.gate_url,
                paths::CHALLENGE_SUCCESS,
                urlencoding::encode(&return_url)
            );
            (StatusCode::FOUND, [(header::LOCATION, success_url)]).into_response()
        }
        SubmitOutcome::WrongAnswer { remaining } => Html(page(
            "Wrong Answer",
            &format!(
                "<h2>Wrong Answer</h2>\
                 <p>Try again. Attempts remaining: {remaining}</p>\
                 {back_link}"
            ),
        ))
        .into_response(),
        SubmitOutcome::LockedOut { .. } => {
            let minutes = outcome.wait_minutes();
            Html(page(
                "Wrong Answer",
                &format!(
                    "<h2>Wrong Answer</h2>\
                     <p>You have reached max attempts. Please wait {minutes} minutes before trying again.</p>\
                     {back_link}"
                ),
            ))
            .into_response()
        }
        SubmitOutcome::TimeoutActive { .. } => {
            let minutes = outcome.wait_minutes();
            Html(page(
                "Timeout Active",
                &format!(
                    "<h2>Timeout Active</h2>\
                     <p>Please wait {minutes} minutes before trying again.</p>\
                     {back_link}"
                ),
            ))
            .into_response()
        }
    }
}

/// Approval inspection endpoint, keyed by the raw identity string
pub async fn check_identity(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Json<ApprovalStatus> {
    Json(ApprovalStatus {
        approved: state.store.is_approved(&identity).await,
    })
}

/// Static placeholder key set, kept for legacy clients that poll it
pub async fn keys() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "keys": [
            {
                "kty": "RSA",
                "kid": "dummy",
                "use": "sig",
                "alg": "RS256",
                "n": "00",
                "e": "AQAB"
            }
        ]
    }))
}

/// Minimal page wrapper shared by the challenge pages
fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html><head><title>{title}</title></head>\
         <body style=\"text-align: center; padding: 50px; font-family: Arial;\">\
         {body}\
         </body></html>"
    )
}

/// Escape a string for use inside an HTML attribute value
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
