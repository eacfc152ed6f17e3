//! Activity handlers.
//!
//! ```text
//! GET    /activities?from=MM-DD-YYYY
//! GET    /activities/{id}
//! POST   /activities
//! PUT    /activities/{id}
//! DELETE /activities/{id}
//! GET    /activities/{id}/expenses
//! DELETE /activities/{id}/expenses
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{ActivityId, NewActivity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::dto::{
    ActivityRequest, ActivityResponse, DeletedResponse, ExpenseResponse, FromQuery,
};
use crate::inbound::http::error::{Group, map_service_error};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_from_date, parse_id};

fn activity_id(raw: &str) -> ApiResult<ActivityId> {
    parse_id(raw, FieldName::new("id")).map(ActivityId::new)
}

/// Activities since a day, newest first.
#[utoipa::path(
    get,
    path = "/activities",
    params(FromQuery),
    responses(
        (status = 200, description = "Activities newest first", body = [ActivityResponse]),
        (status = 400, description = "Malformed or future date", body = ErrorSchema),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "listActivities"
)]
#[get("/activities")]
pub async fn list_activities(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    query: web::Query<FromQuery>,
) -> ApiResult<web::Json<Vec<ActivityResponse>>> {
    let since = parse_from_date(query.from.as_deref(), state.clock.utc())?;
    let activities = state
        .listing
        .activities_by_time(since)
        .await
        .map_err(|err| map_service_error(err, Group::Activities))?;
    Ok(web::Json(
        activities.into_iter().map(ActivityResponse::from).collect(),
    ))
}

/// Fetch one activity.
#[utoipa::path(
    get,
    path = "/activities/{id}",
    params(("id" = i64, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity", body = ActivityResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Activity not found", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "getActivity"
)]
#[get("/activities/{id}")]
pub async fn get_activity(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ActivityResponse>> {
    let id = activity_id(&path)?;
    let activity = state
        .listing
        .activity(id)
        .await
        .map_err(|err| map_service_error(err, Group::Activities))?;
    Ok(web::Json(activity.into()))
}

/// Log an activity.
#[utoipa::path(
    post,
    path = "/activities",
    request_body = ActivityRequest,
    responses(
        (status = 201, description = "Activity created", body = ActivityResponse),
        (status = 400, description = "Invalid activity", body = ErrorSchema),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 422, description = "Referenced tag does not exist", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "createActivity"
)]
#[post("/activities")]
pub async fn create_activity(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<ActivityRequest>,
) -> ApiResult<HttpResponse> {
    let activity = NewActivity::try_from(payload.into_inner())?;
    let created = state
        .adding
        .new_activity(activity)
        .await
        .map_err(|err| map_service_error(err, Group::Activities))?;
    Ok(HttpResponse::Created().json(ActivityResponse::from(created)))
}

/// Replace an activity.
#[utoipa::path(
    put,
    path = "/activities/{id}",
    params(("id" = i64, Path, description = "Activity id")),
    request_body = ActivityRequest,
    responses(
        (status = 200, description = "Activity replaced", body = ActivityResponse),
        (status = 400, description = "Invalid activity", body = ErrorSchema),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Activity not found", body = ErrorSchema),
        (status = 422, description = "Referenced tag does not exist", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "updateActivity"
)]
#[put("/activities/{id}")]
pub async fn update_activity(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ActivityRequest>,
) -> ApiResult<web::Json<ActivityResponse>> {
    let id = activity_id(&path)?;
    let activity = NewActivity::try_from(payload.into_inner())?;
    let updated = state
        .editing
        .edit_activity(id, activity)
        .await
        .map_err(|err| map_service_error(err, Group::Activities))?;
    Ok(web::Json(updated.into()))
}

/// Delete an activity no expense references.
#[utoipa::path(
    delete,
    path = "/activities/{id}",
    params(("id" = i64, Path, description = "Activity id")),
    responses(
        (status = 204, description = "Activity deleted"),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Activity not found", body = ErrorSchema),
        (status = 422, description = "Activity still has expenses", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "deleteActivity"
)]
#[delete("/activities/{id}")]
pub async fn delete_activity(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = activity_id(&path)?;
    state
        .deleting
        .activity(id)
        .await
        .map_err(|err| map_service_error(err, Group::Activities))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Expenses linked to an activity, newest first.
#[utoipa::path(
    get,
    path = "/activities/{id}/expenses",
    params(("id" = i64, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Linked expenses", body = [ExpenseResponse]),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Activity not found", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "listActivityExpenses"
)]
#[get("/activities/{id}/expenses")]
pub async fn activity_expenses(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ExpenseResponse>>> {
    let id = activity_id(&path)?;
    let expenses = state
        .listing
        .expenses_by_activity(id)
        .await
        .map_err(|err| map_service_error(err, Group::Activities))?;
    Ok(web::Json(
        expenses.into_iter().map(ExpenseResponse::from).collect(),
    ))
}

/// Delete every expense linked to an activity.
#[utoipa::path(
    delete,
    path = "/activities/{id}/expenses",
    params(("id" = i64, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Number of expenses deleted", body = DeletedResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Activity not found", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "clearActivityExpenses"
)]
#[delete("/activities/{id}/expenses")]
pub async fn clear_activity_expenses(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let id = activity_id(&path)?;
    let deleted = state
        .deleting
        .activity_expenses(id)
        .await
        .map_err(|err| map_service_error(err, Group::Activities))?;
    Ok(web::Json(DeletedResponse { deleted }))
}
