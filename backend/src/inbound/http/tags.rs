//! Tag handlers.
//!
//! ```text
//! GET    /tags
//! POST   /tags {"name":"My-Tag"}
//! PUT    /tags/{id}
//! DELETE /tags/{id}
//! GET    /tags/{id}/expenses
//! GET    /tags/{id}/activities
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{NewTag, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::dto::{ActivityResponse, ExpenseResponse, TagRequest, TagResponse};
use crate::inbound::http::error::{Group, map_service_error};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

fn tag_id(raw: &str) -> ApiResult<TagId> {
    parse_id(raw, FieldName::new("id")).map(TagId::new)
}

/// List every tag by name.
#[utoipa::path(
    get,
    path = "/tags",
    responses(
        (status = 200, description = "Tags ordered by name", body = [TagResponse]),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(
    _auth: Authenticated,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state
        .listing
        .all_tags()
        .await
        .map_err(|err| map_service_error(err, Group::Tags))?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// Create a tag. Names are stored lowercased.
#[utoipa::path(
    post,
    path = "/tags",
    request_body = TagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Invalid tag name", body = ErrorSchema),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 409, description = "Tag name already taken", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "createTag"
)]
#[post("/tags")]
pub async fn create_tag(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<TagRequest>,
) -> ApiResult<HttpResponse> {
    let tag = NewTag::try_from(payload.into_inner())?;
    let created = state
        .adding
        .new_tag(tag)
        .await
        .map_err(|err| map_service_error(err, Group::Tags))?;
    Ok(HttpResponse::Created().json(TagResponse::from(created)))
}

/// Rename a tag.
#[utoipa::path(
    put,
    path = "/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag renamed", body = TagResponse),
        (status = 400, description = "Invalid tag name or id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Tag not found", body = ErrorSchema),
        (status = 409, description = "Tag name already taken", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "updateTag"
)]
#[put("/tags/{id}")]
pub async fn update_tag(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<TagRequest>,
) -> ApiResult<web::Json<TagResponse>> {
    let id = tag_id(&path)?;
    let tag = NewTag::try_from(payload.into_inner())?;
    let updated = state
        .editing
        .edit_tag(id, tag)
        .await
        .map_err(|err| map_service_error(err, Group::Tags))?;
    Ok(web::Json(updated.into()))
}

/// Delete a tag no activity or expense uses.
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Tag not found", body = ErrorSchema),
        (status = 422, description = "Tag still in use", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "deleteTag"
)]
#[delete("/tags/{id}")]
pub async fn delete_tag(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = tag_id(&path)?;
    state
        .deleting
        .tag(id)
        .await
        .map_err(|err| map_service_error(err, Group::Tags))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Expenses carrying a tag, newest first.
#[utoipa::path(
    get,
    path = "/tags/{id}/expenses",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tagged expenses", body = [ExpenseResponse]),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Tag not found", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "listTagExpenses"
)]
#[get("/tags/{id}/expenses")]
pub async fn tag_expenses(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ExpenseResponse>>> {
    let id = tag_id(&path)?;
    let expenses = state
        .listing
        .expenses_by_tag(id)
        .await
        .map_err(|err| map_service_error(err, Group::Tags))?;
    Ok(web::Json(
        expenses.into_iter().map(ExpenseResponse::from).collect(),
    ))
}

/// Activities carrying a tag, newest first.
#[utoipa::path(
    get,
    path = "/tags/{id}/activities",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tagged activities", body = [ActivityResponse]),
        (status = 401, description = "Missing or invalid access token", body = ErrorSchema),
        (status = 404, description = "Tag not found", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "listTagActivities"
)]
#[get("/tags/{id}/activities")]
pub async fn tag_activities(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ActivityResponse>>> {
    let id = tag_id(&path)?;
    let activities = state
        .listing
        .activities_by_tag(id)
        .await
        .map_err(|err| map_service_error(err, Group::Tags))?;
    Ok(web::Json(
        activities.into_iter().map(ActivityResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{id_of, memory_state, send, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn create(state: &HttpState, name: &str) -> (StatusCode, Value) {
        send(
            state,
            TestRequest::post().uri("/tags").set_json(json!({ "name": name })),
        )
        .await
    }

    #[actix_web::test]
    async fn created_tags_are_lowercased() {
        let state = memory_state();

        let (status, body) = create(&state, "My-Tag").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.get("name"), Some(&json!("my-tag")));

        let (status, list) = send(&state, TestRequest::get().uri("/tags")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([{ "id": id_of(&body), "name": "my-tag" }]));
    }

    #[actix_web::test]
    async fn duplicate_names_conflict() {
        let state = memory_state();
        create(&state, "walk").await;

        let (status, body) = create(&state, "WALK").await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.get("code"), Some(&json!("conflict")));
    }

    #[rstest]
    #[case("ab")]
    #[case("has space")]
    #[actix_web::test]
    async fn invalid_names_are_bad_requests(#[case] name: &str) {
        let (status, _) = create(&memory_state(), name).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn rename_keeps_the_id() {
        let state = memory_state();
        let (_, created) = create(&state, "food").await;
        let id = id_of(&created);

        let (status, body) = send(
            &state,
            TestRequest::put()
                .uri(&format!("/tags/{id}"))
                .set_json(json!({ "name": "Groceries" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": id, "name": "groceries" }));
    }

    #[actix_web::test]
    async fn delete_is_blocked_while_an_expense_uses_the_tag() {
        let state = memory_state();
        let (_, tag) = create(&state, "coffee").await;
        let tag_id = id_of(&tag);
        let (_, expense) = send(
            &state,
            TestRequest::post().uri("/expenses").set_json(json!({
                "label": "Flat white",
                "time": "2024-06-15T08:00:00Z",
                "value": 3.2,
                "unit": "EUR",
                "tagIds": [tag_id],
            })),
        )
        .await;

        let (status, body) =
            send(&state, TestRequest::delete().uri(&format!("/tags/{tag_id}"))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body.get("message"),
            Some(&json!(format!("tag {tag_id} is still used by expenses")))
        );

        let expense_id = id_of(&expense);
        send(&state, TestRequest::delete().uri(&format!("/expenses/{expense_id}"))).await;
        let (status, _) =
            send(&state, TestRequest::delete().uri(&format!("/tags/{tag_id}"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[rstest]
    #[case(TestRequest::delete().uri("/tags/99"))]
    #[case(TestRequest::get().uri("/tags/99/expenses"))]
    #[case(TestRequest::get().uri("/tags/99/activities"))]
    #[case(TestRequest::put().uri("/tags/99").set_json(json!({ "name": "ghost" })))]
    #[actix_web::test]
    async fn missing_tags_are_not_found(#[case] request: TestRequest) {
        let (status, _) = send(&memory_state(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_ids_are_bad_requests() {
        let (status, body) = send(&memory_state(), TestRequest::delete().uri("/tags/abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.pointer("/details/code"), Some(&json!("invalid_id")));
    }

    #[actix_web::test]
    async fn requests_without_a_token_are_unauthorised() {
        let app = test::init_service(test_app(memory_state())).await;
        let response =
            test::call_service(&app, TestRequest::get().uri("/tags").to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
