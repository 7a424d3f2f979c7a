//! The status page itself: `GET /` with an optional `view` parameter.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::Query,
    extract::State,
    http::{header::HOST, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{debug, error, info};

use crate::{attempt_connection, DbSettings, ExtensionList, PageModel, StatusPage, ViewSelector};

// ---

pub fn router() -> Router<Arc<StatusPage>> {
    // ---
    Router::new().route("/", get(handler))
}

async fn handler(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    uri: Uri,
    State(page): State<Arc<StatusPage>>,
) -> Response {
    // ---
    let view = ViewSelector::from_param(params.get("view").map(String::as_str));
    info!("GET / - view={:?}", view);

    let host_header = request_host(&headers, &uri);

    let model = build_page_model(&page, view, host_header).await;

    match page.render(&model) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render status page: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// Host the client asked for: the `Host` header, else the URI authority
/// (HTTP/2 carries it as `:authority`).
fn request_host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    // ---
    headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .or_else(|| uri.authority().map(|a| a.to_string()))
}

/// Gather everything the selected view shows.
///
/// The database is contacted only for [`ViewSelector::Db`], and only once.
async fn build_page_model(
    page: &StatusPage,
    view: ViewSelector,
    host_header: Option<String>,
) -> PageModel {
    // ---
    let context = page.request_context(host_header);

    let extensions = match view {
        ViewSelector::Extensions => {
            let list = ExtensionList::new(page.runtime().loaded_extensions());
            debug!("Listing {} loaded extensions", list.names().len());
            Some(list)
        }
        _ => None,
    };

    let db = match view {
        ViewSelector::Db => {
            let settings = DbSettings::resolve(page.config());
            Some(attempt_connection(&settings).await)
        }
        _ => None,
    };

    PageModel {
        context,
        view,
        extensions,
        db,
    }
}
