//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::tags: Tag list
//! - routes::transactions: Transaction list, batch entry, detail (create/edit/delete)

pub mod context;
pub mod error;
pub mod forms;
pub mod routes;

use axum::{
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use sfinweb_config::Config;
use sfinweb_core::{Notice, NoticeLevel, Services, TRANSACTION_LIST_URL};
use tokio::net::TcpListener;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::tags::page_tags;
    use routes::transactions::{
        htmx_batch_description_suggest, htmx_description_suggest, htmx_transaction_batch_store,
        htmx_transaction_delete, htmx_transaction_store, page_transaction_batch,
        page_transaction_detail, page_transactions,
    };

    Router::new()
        .route("/api/health", get(health_check))
        .route("/", get(index_page))
        .route("/tags", get(page_tags))
        .route("/transactions", get(page_transactions))
        .route(
            "/transactions/batch",
            get(page_transaction_batch).post(htmx_transaction_batch_store),
        )
        .route("/transactions/batch/suggest", get(htmx_batch_description_suggest))
        .route(
            "/transactions/:id",
            get(page_transaction_detail).post(htmx_transaction_store),
        )
        .route("/transactions/:id/delete", post(htmx_transaction_delete))
        .route("/transactions/:id/suggest", get(htmx_description_suggest))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn index_page() -> Redirect {
    Redirect::to(TRANSACTION_LIST_URL)
}

// ==================== Template Functions ====================

/// Escape user-provided text for HTML output
pub fn escape_html(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - sfinapp</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
    <script>
    function selectDescription(el, inputId) {{
        document.getElementById(inputId).value = el.dataset.description;
        el.parentElement.classList.add('hidden');
    }}
    </script>
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/transactions", "Transactions", "transactions"),
        ("/transactions/batch", "Batch entry", "batch"),
        ("/tags", "Tags", "tags"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>sfinapp</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, id) in &links {
        // Batch lives under /transactions, so only exact matches count there
        let is_active = match *id {
            "transactions" => current_path == *path || (current_path.starts_with("/transactions/") && !current_path.starts_with("/transactions/batch")),
            _ => current_path.starts_with(path),
        };
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        let icon = match *id {
            "transactions" => "📋",
            "batch" => "🧾",
            "tags" => "🏷️",
            _ => "📄",
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Toasts for the collected notices
pub fn render_notices(notices: &[Notice]) -> String {
    if notices.is_empty() {
        return String::new();
    }

    let mut html = String::from("<div id='notices' class='space-y-2 mb-4'>");
    for notice in notices {
        let class = match notice.level {
            NoticeLevel::Info => "bg-blue-50 border-blue-200 text-blue-800",
            NoticeLevel::Success => "bg-green-50 border-green-200 text-green-800",
            NoticeLevel::Error => "bg-red-50 border-red-200 text-red-800",
        };
        html.push_str(&format!(
            r#"<div class='notice notice-{} border rounded-lg px-4 py-2 text-sm {}'>{}</div>"#,
            notice.level,
            class,
            escape_html(&notice.message)
        ));
    }
    html.push_str("</div>");
    html
}

/// Check if request is from HTMX (partial page update)
pub fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(r#"<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>"#, inner_content)
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path), inner_content))
    }
}

/// Redirect; HTMX requests get an `HX-Redirect` header instead of a 303
pub fn redirect_response(headers: &axum::http::HeaderMap, target: &str) -> Response {
    if is_htmx_request(headers) {
        ([("HX-Redirect", target.to_string())], "").into_response()
    } else {
        Redirect::to(target).into_response()
    }
}

pub async fn start_server(config: Config, services: Services) -> std::io::Result<()> {
    let addr = config.bind_addr();
    let state = AppState { services, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting sfinweb on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /transactions (Transaction list)");
    log::info!("  - /transactions/batch (Batch entry)");
    log::info!("  - /transactions/new (New transaction)");
    log::info!("  - /tags (Tags)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>Tom & Jerry's</b>"), "&lt;b&gt;Tom &amp; Jerry&#39;s&lt;/b&gt;");
    }

    #[test]
    fn test_nav_marks_batch_only() {
        let nav = nav_sidebar("/transactions/batch");
        assert!(nav.contains("<a href='/transactions/batch' class='flex items-center gap-2 px-3 py-2 rounded-lg bg-indigo-50"));
        assert!(nav.contains("<a href='/transactions' class='flex items-center gap-2 px-3 py-2 rounded-lg text-gray-600"));
    }

    #[test]
    fn test_render_notices_escapes_messages() {
        let html = render_notices(&[Notice {
            level: NoticeLevel::Error,
            message: "Bad <input>".to_string(),
        }]);
        assert!(html.contains("notice-error"));
        assert!(html.contains("Bad &lt;input&gt;"));
        assert!(render_notices(&[]).is_empty());
    }

    #[test]
    fn test_page_response_partial_for_htmx() {
        let mut headers = axum::http::HeaderMap::new();
        assert!(page_response(&headers, "Tags", "/tags", "body").contains("<!DOCTYPE html>"));

        headers.insert("hx-request", axum::http::HeaderValue::from_static("true"));
        let partial = page_response(&headers, "Tags", "/tags", "body");
        assert!(!partial.contains("<!DOCTYPE html>"));
        assert!(partial.contains("body"));
    }
}
