//! Transactions page rendering - Full page endpoints
//!
//! Endpoints:
//! - page_transactions: Transaction list, newest first
//! - page_transaction_batch: Batch entry grid
//! - page_transaction_detail: Create/edit form
//!
//! The render helpers are shared with the form posts in api.rs, which
//! re-render the same views with the notices of the failed action.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use sfinweb_core::{
    resolve_transaction_batch, resolve_transaction_detail, resolve_transaction_list, Account,
    Notice, NoticeLevel, Route, Tag, Transaction, TransactionBatchController,
    TransactionDetailController, TransactionId, TransactionType, ViewContext,
};
use std::collections::HashMap;

use crate::context::{known_flash, RequestContext};
use crate::error::{ApiError, ApiResult};
use crate::forms::{
    apply_skeleton, field_name, skeleton_field_name, FormData, FIELD_ACCOUNT, FIELD_AMOUNT,
    FIELD_DATE, FIELD_DESCRIPTION, FIELD_TAGS, FIELD_TO_ACCOUNT, FIELD_TYPE, MAX_BATCH_ROWS,
};
use crate::{escape_html, page_response, render_notices, AppState};

/// Transactions page
pub async fn page_transactions(
    state: State<AppState>,
    headers: HeaderMap,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Html<String>> {
    let mut data = resolve_transaction_list(&state.services).await?;
    data.transactions
        .sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    let per_page = state.config.pagination.records_per_page;
    let total = data.transactions.len();
    let page_count = total.div_ceil(per_page).max(1);
    let page = params
        .get("page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, page_count);

    let account_names: HashMap<i64, &str> = data
        .accounts
        .iter()
        .map(|a| (a.id, a.name.as_str()))
        .collect();
    let account_name = |id: Option<i64>| {
        id.and_then(|id| account_names.get(&id).copied())
            .map(escape_html)
            .unwrap_or_else(|| "-".to_string())
    };

    let mut rows = String::new();
    for tx in data.transactions.iter().skip((page - 1) * per_page).take(per_page) {
        let transaction_type = tx.effective_type();
        let account = match transaction_type {
            TransactionType::Transfer => format!("{} → {}", account_name(tx.account_id), account_name(tx.to_account_id)),
            _ => account_name(tx.account_id),
        };
        let amount_class = match transaction_type {
            TransactionType::Expense => "text-red-600",
            TransactionType::Income => "text-green-600",
            TransactionType::Transfer => "text-gray-700",
        };
        let href = tx
            .id
            .map(|id| Route::TransactionDetail(TransactionId::Existing(id)).path())
            .unwrap_or_default();
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50 cursor-pointer' onclick="window.location='{}'">
    <td class='px-4 py-2 whitespace-nowrap'>{}</td>
    <td class='px-4 py-2'>{}</td>
    <td class='px-4 py-2'>{}</td>
    <td class='px-4 py-2'>{}</td>
    <td class='px-4 py-2 text-right font-mono {}'>{}</td>
</tr>"#,
            href,
            tx.date.map(|d| d.to_string()).unwrap_or_default(),
            transaction_type,
            escape_html(tx.description.as_deref().unwrap_or("")),
            account,
            amount_class,
            tx.amount.map(|a| a.to_string()).unwrap_or_default()
        ));
    }

    let table = if total == 0 {
        "<p class='text-gray-500'>No transactions yet.</p>".to_string()
    } else {
        format!(
            r#"<table class='min-w-full bg-white rounded-lg shadow text-sm'>
    <thead class='bg-gray-100 text-left'>
        <tr><th class='px-4 py-2'>Date</th><th class='px-4 py-2'>Type</th><th class='px-4 py-2'>Description</th><th class='px-4 py-2'>Account</th><th class='px-4 py-2 text-right'>Amount</th></tr>
    </thead>
    <tbody>{}</tbody>
</table>"#,
            rows
        )
    };

    let mut pager = String::new();
    if page_count > 1 {
        pager.push_str("<div class='flex items-center gap-4 mt-4 text-sm'>");
        if page > 1 {
            pager.push_str(&format!("<a href='/transactions?page={}' class='text-indigo-600 hover:underline'>Previous</a>", page - 1));
        }
        pager.push_str(&format!("<span class='text-gray-500'>Page {} of {}</span>", page, page_count));
        if page < page_count {
            pager.push_str(&format!("<a href='/transactions?page={}' class='text-indigo-600 hover:underline'>Next</a>", page + 1));
        }
        pager.push_str("</div>");
    }

    let flash: Vec<Notice> = params
        .get("flash")
        .and_then(|f| known_flash(f))
        .map(|message| Notice { level: NoticeLevel::Success, message: message.to_string() })
        .into_iter()
        .collect();

    let inner_content = format!(
        r#"{}
<div class='flex items-center justify-between mb-4'>
    <h2 class='text-2xl font-bold'>Transactions</h2>
    <div class='flex gap-2'>
        <a href='/transactions/batch' class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Batch entry</a>
        <a href='/transactions/new' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>New transaction</a>
    </div>
</div>
<p class='text-sm text-gray-500 mb-2'>{} transactions</p>
{}
{}"#,
        render_notices(&flash),
        total,
        table,
        pager
    );

    Ok(Html(page_response(&headers, "Transactions", "/transactions", &inner_content)))
}

/// Batch entry page; `rows` asks for more than the initial rows
pub async fn page_transaction_batch(
    state: State<AppState>,
    headers: HeaderMap,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Html<String>> {
    let requested = match params.get("rows").filter(|r| !r.is_empty()) {
        Some(rows) => rows
            .parse::<usize>()
            .map_err(|_| ApiError::bad_request(format!("Invalid rows: {}", rows)))?,
        None => 0,
    };

    let context = RequestContext::new(&state.services, false);
    let mut controller = batch_controller(&state, context.view(), None).await?;
    let extra = requested.min(MAX_BATCH_ROWS).saturating_sub(controller.row_count());
    controller.extend_transaction_list(extra);

    Ok(Html(render_batch_page(&headers, &controller, &context.notices())))
}

/// Transaction detail page; `new` opens the create form
pub async fn page_transaction_detail(
    state: State<AppState>,
    headers: HeaderMap,
    path: Path<String>,
) -> ApiResult<Html<String>> {
    let context = RequestContext::new(&state.services, false);
    let controller = detail_controller(&state, &path, context.view()).await?;
    Ok(Html(render_detail_page(&headers, &controller, &context.notices())))
}

// ==================== Controller construction ====================

/// Batch controller; a posted form brings back the skeleton it was rendered from
pub(crate) async fn batch_controller(
    state: &AppState,
    view: &ViewContext,
    posted: Option<&FormData>,
) -> ApiResult<TransactionBatchController> {
    let mut data = resolve_transaction_batch(&state.services).await?;
    if let Some(form) = posted {
        apply_skeleton(form, &mut data.skeleton)?;
    }
    Ok(TransactionBatchController::new(data, view, state.config.batch.initial_rows))
}

pub(crate) async fn detail_controller(
    state: &AppState,
    id: &str,
    view: &ViewContext,
) -> ApiResult<TransactionDetailController> {
    let transaction_id: TransactionId = id.parse()?;
    let data = resolve_transaction_detail(&state.services, transaction_id).await?;
    Ok(TransactionDetailController::new(data, view))
}

// ==================== Render helpers ====================

fn date_input(tx: &Transaction, row: Option<usize>) -> String {
    format!(
        r#"<input type='date' name='{}' value='{}' class='border rounded px-2 py-1 w-full'>"#,
        field_name(FIELD_DATE, row),
        tx.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
    )
}

fn type_select(tx: &Transaction, row: Option<usize>) -> String {
    let mut html = format!(r#"<select name='{}' class='border rounded px-2 py-1 w-full'>"#, field_name(FIELD_TYPE, row));
    if tx.transaction_type.is_none() {
        html.push_str("<option value='' selected></option>");
    }
    for transaction_type in TransactionType::ALL {
        let selected = if tx.transaction_type == Some(transaction_type) { " selected" } else { "" };
        html.push_str(&format!("<option value='{0}'{1}>{0}</option>", transaction_type, selected));
    }
    html.push_str("</select>");
    html
}

fn amount_input(tx: &Transaction, row: Option<usize>) -> String {
    format!(
        r#"<input type='text' inputmode='decimal' name='{}' value='{}' placeholder='0.00' class='border rounded px-2 py-1 w-full text-right font-mono'>"#,
        field_name(FIELD_AMOUNT, row),
        tx.amount.map(|a| a.to_string()).unwrap_or_default()
    )
}

/// Description input with suggestions fetched while typing
fn description_input(tx: &Transaction, row: Option<usize>, suggest_url: &str) -> String {
    let name = field_name(FIELD_DESCRIPTION, row);
    let input_id = name.replace('.', "-");
    format!(
        r#"<div class='relative'>
    <input type='text' name='{name}' id='{input_id}' value='{value}' autocomplete='off'
        hx-get='{suggest_url}' hx-trigger='keyup changed delay:300ms' hx-target='#suggest-{input_id}'
        hx-vals='{{"target": "{input_id}"}}'
        class='border rounded px-2 py-1 w-full'>
    <div id='suggest-{input_id}' class='absolute z-10 w-full'></div>
</div>"#,
        name = name,
        input_id = input_id,
        value = escape_html(tx.description.as_deref().unwrap_or("")),
        suggest_url = suggest_url
    )
}

fn account_select(name: &str, selected: Option<i64>, accounts: &[Account]) -> String {
    let mut html = format!(r#"<select name='{}' class='border rounded px-2 py-1 w-full'>"#, name);
    let none_selected = if selected.is_none() { " selected" } else { "" };
    html.push_str(&format!("<option value=''{}>-</option>", none_selected));
    for account in accounts {
        let is_selected = if selected == Some(account.id) { " selected" } else { "" };
        html.push_str(&format!(
            "<option value='{}'{}>{}</option>",
            account.id,
            is_selected,
            escape_html(&account.name)
        ));
    }
    html.push_str("</select>");
    html
}

fn tag_checkboxes(tx: &Transaction, row: Option<usize>, tags: &[Tag]) -> String {
    let name = field_name(FIELD_TAGS, row);
    tags.iter()
        .map(|tag| {
            let checked = if tx.has_tag(tag.id) { " checked" } else { "" };
            format!(
                r#"<label class='inline-flex items-center gap-1 mr-2 text-xs'><input type='checkbox' name='{}' value='{}'{}>{}</label>"#,
                name,
                tag.id,
                checked,
                escape_html(&tag.name)
            )
        })
        .collect()
}

/// Hidden copy of the skeleton, so a post compares rows against what was shown
fn skeleton_inputs(skeleton: &Transaction) -> String {
    let hidden = |field: &str, value: String| {
        format!(
            "<input type='hidden' name='{}' value='{}'>",
            skeleton_field_name(field),
            escape_html(&value)
        )
    };

    let mut html = String::new();
    html.push_str(&hidden(FIELD_DATE, skeleton.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()));
    html.push_str(&hidden(FIELD_TYPE, skeleton.transaction_type.map(|t| t.to_string()).unwrap_or_default()));
    html.push_str(&hidden(FIELD_AMOUNT, skeleton.amount.map(|a| a.to_string()).unwrap_or_default()));
    html.push_str(&hidden(FIELD_DESCRIPTION, skeleton.description.clone().unwrap_or_default()));
    html.push_str(&hidden(FIELD_ACCOUNT, skeleton.account_id.map(|id| id.to_string()).unwrap_or_default()));
    html.push_str(&hidden(FIELD_TO_ACCOUNT, skeleton.to_account_id.map(|id| id.to_string()).unwrap_or_default()));
    for tag_id in &skeleton.tag_ids {
        html.push_str(&hidden(FIELD_TAGS, tag_id.to_string()));
    }
    html
}

pub(crate) fn render_batch_page(headers: &HeaderMap, controller: &TransactionBatchController, notices: &[Notice]) -> String {
    let suggest_url = format!("{}/suggest", Route::TransactionBatch.path());

    let mut rows = String::new();
    for (row, (tx, tags)) in controller
        .transactions()
        .iter()
        .zip(controller.tag_options())
        .enumerate()
    {
        let row_class = if controller.is_row_empty(row) { "" } else { " bg-indigo-50" };
        rows.push_str(&format!(
            r#"<tr class='border-b align-top{}'>
    <td class='px-2 py-1 text-gray-400 text-xs'>{}</td>
    <td class='px-2 py-1'>{}</td>
    <td class='px-2 py-1'>{}</td>
    <td class='px-2 py-1'>{}</td>
    <td class='px-2 py-1'>{}</td>
    <td class='px-2 py-1'>{}</td>
    <td class='px-2 py-1'>{}</td>
    <td class='px-2 py-1'>{}</td>
</tr>"#,
            row_class,
            row + 1,
            date_input(tx, Some(row)),
            type_select(tx, Some(row)),
            amount_input(tx, Some(row)),
            description_input(tx, Some(row), &suggest_url),
            account_select(&field_name(FIELD_ACCOUNT, Some(row)), tx.account_id, controller.accounts()),
            account_select(&field_name(FIELD_TO_ACCOUNT, Some(row)), tx.to_account_id, controller.accounts()),
            tag_checkboxes(tx, Some(row), tags)
        ));
    }

    let inner_content = format!(
        r#"{}
<h2 class='text-2xl font-bold mb-4'>Batch entry</h2>
<p class='text-sm text-gray-500 mb-4'>Rows left unchanged are not saved.</p>
<form method='post' action='{}'>
    <input type='hidden' name='rows' value='{}'>
    {}
    <div class='overflow-x-auto'>
    <table class='min-w-full bg-white rounded-lg shadow text-sm'>
        <thead class='bg-gray-100 text-left'>
            <tr><th></th><th class='px-2 py-2'>Date</th><th class='px-2 py-2'>Type</th><th class='px-2 py-2'>Amount</th><th class='px-2 py-2'>Description</th><th class='px-2 py-2'>Account</th><th class='px-2 py-2'>To account</th><th class='px-2 py-2'>Tags</th></tr>
        </thead>
        <tbody>{}</tbody>
    </table>
    </div>
    <div class='flex gap-2 mt-4'>
        <button type='submit' name='action' value='save' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Save</button>
        <button type='submit' name='action' value='extend' class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Add rows</button>
    </div>
</form>"#,
        render_notices(notices),
        Route::TransactionBatch.path(),
        controller.row_count(),
        skeleton_inputs(controller.skeleton()),
        rows
    );

    page_response(headers, "Batch entry", "/transactions/batch", &inner_content)
}

pub(crate) fn render_detail_page(headers: &HeaderMap, controller: &TransactionDetailController, notices: &[Notice]) -> String {
    let tx = controller.transaction();
    let path = Route::TransactionDetail(controller.transaction_id()).path();
    let title = if controller.is_new() {
        "New transaction".to_string()
    } else {
        format!("Transaction {}", controller.transaction_id())
    };

    let delete_form = if controller.is_new() {
        String::new()
    } else {
        format!(
            r#"<form method='post' action='{}/delete' class='mt-4'>
    <button type='submit' class='px-4 py-2 bg-red-50 text-red-700 rounded-lg hover:bg-red-100'>Delete</button>
</form>"#,
            path
        )
    };

    let field = |label: &str, input: String| {
        format!(
            r#"<label class='block'><span class='block text-sm text-gray-600 mb-1'>{}</span>{}</label>"#,
            label, input
        )
    };

    let inner_content = format!(
        r#"{notices}
<h2 class='text-2xl font-bold mb-4'>{title}</h2>
<form method='post' action='{path}' class='bg-white rounded-lg shadow p-6 grid grid-cols-2 gap-4 max-w-3xl'>
    {date}
    {kind}
    {amount}
    <div class='block'><span class='block text-sm text-gray-600 mb-1'>Description</span>{description}</div>
    {account}
    {to_account}
    <div class='col-span-2'><span class='block text-sm text-gray-600 mb-1'>Tags</span>{tags}</div>
    <div class='col-span-2 flex gap-2'>
        <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Save</button>
        <a href='/transactions' class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Cancel</a>
    </div>
</form>
{delete_form}"#,
        notices = render_notices(notices),
        title = escape_html(&title),
        path = path,
        date = field("Date", date_input(tx, None)),
        kind = field("Type", type_select(tx, None)),
        amount = field("Amount", amount_input(tx, None)),
        description = description_input(tx, None, &format!("{}/suggest", path)),
        account = field("Account", account_select(FIELD_ACCOUNT, tx.account_id, controller.accounts())),
        to_account = field("To account", account_select(FIELD_TO_ACCOUNT, tx.to_account_id, controller.accounts())),
        tags = tag_checkboxes(tx, None, controller.tags()),
        delete_form = delete_form
    );

    page_response(headers, &title, &path, &inner_content)
}

/// Ask again before deleting; posting the form answers the question
pub(crate) fn render_delete_confirmation(headers: &HeaderMap, controller: &TransactionDetailController, prompt: &str) -> String {
    let tx = controller.transaction();
    let path = Route::TransactionDetail(controller.transaction_id()).path();

    let inner_content = format!(
        r#"<div class='max-w-xl bg-white rounded-lg shadow p-6'>
    <h2 class='text-xl font-bold mb-2'>Delete transaction</h2>
    <p class='text-gray-700 mb-1'>{}</p>
    <p class='text-sm text-gray-500 mb-4'>{} {} {}</p>
    <form method='post' action='{}/delete' class='flex gap-2'>
        <input type='hidden' name='confirmed' value='true'>
        <button type='submit' class='px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700'>Delete</button>
        <a href='{}' class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Cancel</a>
    </form>
</div>"#,
        escape_html(prompt),
        tx.date.map(|d| d.to_string()).unwrap_or_default(),
        escape_html(tx.description.as_deref().unwrap_or("")),
        tx.amount.map(|a| a.to_string()).unwrap_or_default(),
        path,
        path
    );

    page_response(headers, "Delete transaction", &path, &inner_content)
}

/// Suggestion list fragment; a click copies the value into `target`
pub(crate) fn render_suggestions(suggestions: &[String], target: &str) -> String {
    if suggestions.is_empty() {
        return String::new();
    }

    let items: String = suggestions
        .iter()
        .map(|description| {
            let escaped = escape_html(description);
            format!(
                r#"<li class='px-3 py-1 hover:bg-indigo-50 cursor-pointer' data-description='{}' onclick="selectDescription(this, '{}')">{}</li>"#,
                escaped, target, escaped
            )
        })
        .collect();
    format!("<ul class='bg-white border rounded shadow text-sm'>{}</ul>", items)
}
