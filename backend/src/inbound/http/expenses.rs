//! Expense handlers.
//!
//! ```text
//! GET    /expenses?from=MM-DD-YYYY
//! GET    /expenses/{id}
//! POST   /expenses
//! PUT    /expenses/{id}
//! DELETE /expenses/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{ExpenseId, NewExpense};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::dto::{ExpenseRequest, ExpenseResponse, FromQuery};
use crate::inbound::http::error::{Group, map_service_error};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_from_date, parse_id};

fn expense_id(raw: &str) -> ApiResult<ExpenseId> {
    parse_id(raw, FieldName::new("id")).map(ExpenseId::new)
}

/// Expenses since a day, newest first.
#[utoipa::path(
    get,
    path = "/expenses",
    params(FromQuery),
    responses(
        (status = 200, description = "Expenses newest first", body = [ExpenseResponse]),
        (status = 400, description = "Malformed or future date", body = ErrorSchema),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "listExpenses"
)]
#[get("/expenses")]
pub async fn list_expenses(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    query: web::Query<FromQuery>,
) -> ApiResult<web::Json<Vec<ExpenseResponse>>> {
    let since = parse_from_date(query.from.as_deref(), state.clock.utc())?;
    let expenses = state
        .listing
        .expenses_by_time(since)
        .await
        .map_err(|err| map_service_error(err, Group::Expenses))?;
    Ok(web::Json(
        expenses.into_iter().map(ExpenseResponse::from).collect(),
    ))
}

/// Fetch one expense.
#[utoipa::path(
    get,
    path = "/expenses/{id}",
    params(("id" = i64, Path, description = "Expense id")),
    responses(
        (status = 200, description = "Expense", body = ExpenseResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Expense not found", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "getExpense"
)]
#[get("/expenses/{id}")]
pub async fn get_expense(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExpenseResponse>> {
    let id = expense_id(&path)?;
    let expense = state
        .listing
        .expense(id)
        .await
        .map_err(|err| map_service_error(err, Group::Expenses))?;
    Ok(web::Json(expense.into()))
}

/// Record an expense.
#[utoipa::path(
    post,
    path = "/expenses",
    request_body = ExpenseRequest,
    responses(
        (status = 201, description = "Expense created", body = ExpenseResponse),
        (status = 400, description = "Invalid expense", body = ErrorSchema),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 422, description = "Referenced activity or tag does not exist", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "createExpense"
)]
#[post("/expenses")]
pub async fn create_expense(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<ExpenseRequest>,
) -> ApiResult<HttpResponse> {
    let expense = NewExpense::try_from(payload.into_inner())?;
    let created = state
        .adding
        .new_expense(expense)
        .await
        .map_err(|err| map_service_error(err, Group::Expenses))?;
    Ok(HttpResponse::Created().json(ExpenseResponse::from(created)))
}

/// Replace an expense.
#[utoipa::path(
    put,
    path = "/expenses/{id}",
    params(("id" = i64, Path, description = "Expense id")),
    request_body = ExpenseRequest,
    responses(
        (status = 200, description = "Expense replaced", body = ExpenseResponse),
        (status = 400, description = "Invalid expense", body = ErrorSchema),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Expense not found", body = ErrorSchema),
        (status = 422, description = "Referenced activity or tag does not exist", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "updateExpense"
)]
#[put("/expenses/{id}")]
pub async fn update_expense(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ExpenseRequest>,
) -> ApiResult<web::Json<ExpenseResponse>> {
    let id = expense_id(&path)?;
    let expense = NewExpense::try_from(payload.into_inner())?;
    let updated = state
        .editing
        .edit_expense(id, expense)
        .await
        .map_err(|err| map_service_error(err, Group::Expenses))?;
    Ok(web::Json(updated.into()))
}

/// Delete an expense.
#[utoipa::path(
    delete,
    path = "/expenses/{id}",
    params(("id" = i64, Path, description = "Expense id")),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Expense not found", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "deleteExpense"
)]
#[delete("/expenses/{id}")]
pub async fn delete_expense(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = expense_id(&path)?;
    state
        .deleting
        .expense(id)
        .await
        .map_err(|err| map_service_error(err, Group::Expenses))?;
    Ok(HttpResponse::NoContent().finish())
}
