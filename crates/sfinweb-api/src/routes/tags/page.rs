use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use sfinweb_core::{resolve_tag_list, TagListController};

use crate::error::ApiResult;
use crate::{escape_html, page_response, AppState};

/// Tags page
pub async fn page_tags(state: State<AppState>, headers: HeaderMap) -> ApiResult<Html<String>> {
    let data = resolve_tag_list(&state.services).await?;
    let controller = TagListController::new(data);

    let rows: String = controller
        .tags()
        .iter()
        .map(|tag| {
            format!(
                r#"<tr class='border-b hover:bg-gray-50'><td class='px-4 py-2 text-gray-500'>{}</td><td class='px-4 py-2'>{}</td></tr>"#,
                tag.id,
                escape_html(&tag.name)
            )
        })
        .collect();

    let body = if controller.tags().is_empty() {
        "<p class='text-gray-500'>No tags yet.</p>".to_string()
    } else {
        format!(
            r#"<table class='min-w-full bg-white rounded-lg shadow text-sm'>
    <thead class='bg-gray-100 text-left'><tr><th class='px-4 py-2'>Id</th><th class='px-4 py-2'>Name</th></tr></thead>
    <tbody>{}</tbody>
</table>"#,
            rows
        )
    };

    let inner_content = format!(
        r#"<h2 class='text-2xl font-bold mb-4'>Tags</h2>
{}"#,
        body
    );
    Ok(Html(page_response(&headers, "Tags", "/tags", &inner_content)))
}
