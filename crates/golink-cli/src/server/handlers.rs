//! HTTP handlers
//!
//! Each handler runs exactly one registry call on the blocking pool and maps
//! the outcome to a response.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use golink_core::{Link, LinkRegistry, LinkStore};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::server::error::{AppError, Result};
use crate::server::state::AppState;

/// Body of the create-or-update form
#[derive(Debug, Clone, Deserialize)]
pub struct LinkForm {
    pub name: String,
    pub url: String,
}

/// A link together with a human-readable outcome
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub message: String,
    pub link: Link,
}

/// Run a registry call off the async runtime
async fn with_registry<T, F>(state: &AppState, call: F) -> Result<T>
where
    F: FnOnce(&LinkRegistry<Box<dyn LinkStore>>) -> T + Send + 'static,
    T: Send + 'static,
{
    let registry = state.registry();
    tokio::task::spawn_blocking(move || call(registry.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("registry task failed: {}", e)))
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// All links, most visited first
pub async fn list_handler(State(state): State<AppState>) -> Result<Json<Vec<Link>>> {
    let links = with_registry(&state, |registry| registry.list()).await?;
    Ok(Json(links.into_links()))
}

/// Create (201) or update (200) a link
pub async fn save_handler(
    State(state): State<AppState>,
    Form(form): Form<LinkForm>,
) -> Result<(StatusCode, Json<LinkResponse>)> {
    let (link, was_created) = with_registry(&state, move |registry| {
        registry.add_or_update_link(&form.name, &form.url)
    })
    .await??;

    let (status, message) = if was_created {
        (
            StatusCode::CREATED,
            format!("Added link from '{}' to {}", link.name, link.url),
        )
    } else {
        (
            StatusCode::OK,
            format!("Updated link '{}' to {}", link.name, link.url),
        )
    };

    Ok((status, Json(LinkResponse { message, link })))
}

/// Count the visit and redirect (303) to the link's URL
pub async fn goto_handler(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let lookup = name.clone();
    let resolved = with_registry(&state, move |registry| {
        registry.resolve_and_count(&lookup)
    })
    .await??;

    match resolved {
        Some(link) => redirect_to(&link),
        None => Err(AppError::not_found(
            name,
            "That link doesn't exist yet. Create it?",
        )),
    }
}

/// 303 See Other to the link's URL.
///
/// URLs are stored unvalidated, so one that can't be a header value is an
/// error response rather than a panic.
fn redirect_to(link: &Link) -> Result<Response> {
    let location = HeaderValue::try_from(link.url.as_str()).map_err(|_| {
        AppError::Internal(format!(
            "link '{}' has a URL that cannot be redirected to: {:?}",
            link.name, link.url
        ))
    })?;
    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response())
}

pub async fn delete_handler(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>> {
    let lookup = name.clone();
    let removed = with_registry(&state, move |registry| registry.delete_link(&lookup)).await??;

    match removed {
        Some(link) => Ok(Json(LinkResponse {
            message: format!("Deleted link {} to {}", link.name, link.url),
            link,
        })),
        None => Err(AppError::not_found(
            name.clone(),
            format!("The link {} doesn't even exist, cannot delete it", name),
        )),
    }
}

/// OpenSearch suggestions: `[prefix, [names...]]`
pub async fn suggest_handler(
    Path(prefix): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    suggestions(state, prefix).await
}

/// Suggestions for the empty prefix, i.e. every name
pub async fn suggest_all_handler(State(state): State<AppState>) -> Result<Response> {
    suggestions(state, String::new()).await
}

async fn suggestions(state: AppState, prefix: String) -> Result<Response> {
    let lookup = prefix.clone();
    let names = with_registry(&state, move |registry| registry.suggest(&lookup)).await?;
    let body = json!([prefix, names]).to_string();

    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/javascript; charset=utf-8"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("-1"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"f.txt\""),
    );
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("none"));
    headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
    Ok(response)
}

/// OpenSearch description so browsers can use golink as a search engine
pub async fn opensearch_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or(state.public_host())
        .to_string();

    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        opensearch_document(&host),
    )
        .into_response()
}

fn opensearch_document(host: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<OpenSearchDescription xmlns="http://a9.com/-/spec/opensearch/1.1/">
  <ShortName>golink</ShortName>
  <Description>Personal go-links</Description>
  <InputEncoding>UTF-8</InputEncoding>
  <Url type="text/html" method="get" template="http://{host}/{{searchTerms}}"/>
  <Url type="application/x-suggestions+json" method="get" template="http://{host}/search/suggest/{{searchTerms}}"/>
</OpenSearchDescription>
"#,
        host = xml_escape(host)
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
