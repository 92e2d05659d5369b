//! Transactions form posts and HTMX fragments
//!
//! Endpoints:
//! - htmx_transaction_batch_store: Save the batch, or add rows
//! - htmx_transaction_store: Create or update one transaction
//! - htmx_transaction_delete: Delete after confirmation
//! - htmx_description_suggest: Description suggestions (HTML fragment)
//! - htmx_batch_description_suggest: The same for batch rows
//!
//! Each post rebuilds the controller from freshly resolved data, binds the
//! form onto it and runs the action. A navigation requested by the
//! controller becomes a redirect; anything else re-renders the view.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use sfinweb_core::{
    resolve_transaction_batch, CoreError, Notice, RemoveOutcome, TransactionBatchController,
    TransactionId,
};

use super::page::{
    batch_controller, detail_controller, render_batch_page, render_delete_confirmation,
    render_detail_page, render_suggestions,
};
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::forms::{apply_batch, apply_transaction, FormData, FIELD_DESCRIPTION, MAX_BATCH_ROWS};
use crate::{redirect_response, AppState};

fn redirect_or(headers: &HeaderMap, context: &RequestContext, render: impl FnOnce() -> String) -> Response {
    match context.redirect_target() {
        Some(target) => redirect_response(headers, &target),
        None => Html(render()).into_response(),
    }
}

/// Re-render the posted values with one error notice per rejected field
fn reject_fields(context: &RequestContext, errors: Vec<String>, render: impl FnOnce(&[Notice]) -> String) -> Response {
    for message in errors {
        context.view().notifier.api_error(&CoreError::Validation { message });
    }
    (StatusCode::UNPROCESSABLE_ENTITY, Html(render(&context.notices()))).into_response()
}

/// Batch form post
pub async fn htmx_transaction_batch_store(
    state: State<AppState>,
    headers: HeaderMap,
    Form(fields): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let form = FormData::new(fields);
    let context = RequestContext::new(&state.services, false);
    let mut controller = batch_controller(&state, context.view(), Some(&form)).await?;

    let errors = apply_batch(&form, &mut controller)?;
    if !errors.is_empty() {
        log::debug!("Batch post rejected {} values", errors.len());
        return Ok(reject_fields(&context, errors, |notices| {
            render_batch_page(&headers, &controller, notices)
        }));
    }

    if form.get("action") == Some("extend") {
        let extra = state
            .config
            .batch
            .initial_rows
            .min(MAX_BATCH_ROWS.saturating_sub(controller.row_count()));
        controller.extend_transaction_list(extra);
        log::debug!("Batch extended to {} rows", controller.row_count());
    } else {
        let outcome = controller.save().await;
        log::debug!("Batch save finished: {:?}", outcome);
    }

    Ok(redirect_or(&headers, &context, || {
        render_batch_page(&headers, &controller, &context.notices())
    }))
}

/// Detail form post: creates for `new`, updates otherwise
pub async fn htmx_transaction_store(
    state: State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let form = FormData::new(fields);
    let context = RequestContext::new(&state.services, false);
    let mut controller = detail_controller(&state, &id, context.view()).await?;

    let errors = apply_transaction(&form, None, controller.transaction_mut());
    if !errors.is_empty() {
        return Ok(reject_fields(&context, errors, |notices| {
            render_detail_page(&headers, &controller, notices)
        }));
    }

    let outcome = controller.save().await;
    log::debug!("Transaction {} save finished: {:?}", id, outcome);

    Ok(redirect_or(&headers, &context, || {
        render_detail_page(&headers, &controller, &context.notices())
    }))
}

/// Delete post; without `confirmed=true` the confirmation is rendered
pub async fn htmx_transaction_delete(
    state: State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    if id.parse::<TransactionId>()?.is_new() {
        return Err(ApiError::bad_request("A new transaction cannot be deleted"));
    }

    let form = FormData::new(fields);
    let context = RequestContext::new(&state.services, form.flag("confirmed"));
    let controller = detail_controller(&state, &id, context.view()).await?;

    let response = match controller.remove().await {
        RemoveOutcome::Declined => {
            let prompt = context.confirm.prompt().unwrap_or_default();
            Html(render_delete_confirmation(&headers, &controller, &prompt)).into_response()
        }
        _ => redirect_or(&headers, &context, || {
            render_detail_page(&headers, &controller, &context.notices())
        }),
    };
    Ok(response)
}

/// Search term and target input of a suggestion request
///
/// The term is `q`, or the value of the posted description field itself.
fn suggest_params(params: Vec<(String, String)>) -> (String, String) {
    let params = FormData::new(params);
    let term = params
        .get("q")
        .or_else(|| params.get_prefixed(FIELD_DESCRIPTION))
        .unwrap_or_default()
        .to_string();
    let target: String = params
        .get("target")
        .unwrap_or(FIELD_DESCRIPTION)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    (term, target)
}

/// Description suggestions for the input named in `target`
pub async fn htmx_description_suggest(
    state: State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Html<String>> {
    let (term, target) = suggest_params(params);

    let context = RequestContext::new(&state.services, false);
    let controller = detail_controller(&state, &id, context.view()).await?;
    let suggestions = controller.suggest_description(&term);

    Ok(Html(render_suggestions(&suggestions, &target)))
}

/// Description suggestions for a batch row
pub async fn htmx_batch_description_suggest(
    state: State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Html<String>> {
    let (term, target) = suggest_params(params);

    let context = RequestContext::new(&state.services, false);
    let data = resolve_transaction_batch(&state.services).await?;
    let controller = TransactionBatchController::new(data, context.view(), 0);
    let suggestions = controller.suggest_description(&term);

    Ok(Html(render_suggestions(&suggestions, &target)))
}
