use super::{verify_auth, AppState};
use crate::{
    errors::ServiceError,
    models::{
        requests::{
            GuestSubscribeRequest, PatchSubscriptionRequest, SubscribeRequest, SubscriptionFilter,
            UnlikeRequest, UserRequest,
        },
        responses::{MessageResponse, MyBrandsResponse},
    },
    services::subscription_service::SubscribeOutcome,
};
use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/mybrands/")
            .route(web::post().to(create_subscription))
            .route(web::get().to(list_subscriptions)),
    )
    .route("/mybrands/users/", web::post().to(my_brands))
    .route("/mybrands/unlike/", web::post().to(unlike))
    .service(
        web::resource("/mybrands/{id:\\d+}/")
            .route(web::get().to(get_subscription))
            .route(web::put().to(update_subscription))
            .route(web::patch().to(patch_subscription))
            .route(web::delete().to(delete_subscription)),
    )
    .route("/guest/mybrands/", web::post().to(guest_subscribe));
}

/// Creates a subscription for one (user, brand) pair
/// POST /api/mybrands/
async fn create_subscription(
    state: web::Data<AppState>,
    req: web::Json<SubscribeRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, actix_web::error::Error> {
    verify_auth(&http_req, &state.auth_service)?;
    let data = req.into_inner();
    data.validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    match state
        .subscription_service
        .subscribe(data.user, data.brand)
        .await?
    {
        SubscribeOutcome::Created(subscription) => Ok(HttpResponse::Created().json(subscription)),
        SubscribeOutcome::Existing(subscription) => Ok(HttpResponse::Ok().json(subscription)),
    }
}

/// Lists subscription rows, optionally for a single user
/// GET /api/mybrands/?user={id}
async fn list_subscriptions(
    state: web::Data<AppState>,
    query: web::Query<SubscriptionFilter>,
    http_req: HttpRequest,
) -> Result<HttpResponse, actix_web::error::Error> {
    verify_auth(&http_req, &state.auth_service)?;
    let subscriptions = state
        .subscription_service
        .list_subscriptions(query.into_inner().user)
        .await?;
    Ok(HttpResponse::Ok().json(subscriptions))
}

async fn get_subscription(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse, actix_web::error::Error> {
    verify_auth(&http_req, &state.auth_service)?;
    let subscription = state
        .subscription_service
        .get_subscription(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(subscription))
}

/// Replaces both sides of a subscription row
/// PUT /api/mybrands/{id}/
async fn update_subscription(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<SubscribeRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, actix_web::error::Error> {
    verify_auth(&http_req, &state.auth_service)?;
    let data = req.into_inner();
    data.validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    let subscription = state
        .subscription_service
        .update_subscription(path.into_inner(), Some(data.user), Some(data.brand))
        .await?;
    Ok(HttpResponse::Ok().json(subscription))
}

/// PATCH /api/mybrands/{id}/
async fn patch_subscription(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<PatchSubscriptionRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, actix_web::error::Error> {
    verify_auth(&http_req, &state.auth_service)?;
    let data = req.into_inner();
    data.validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    let subscription = state
        .subscription_service
        .update_subscription(path.into_inner(), data.user, data.brand)
        .await?;
    Ok(HttpResponse::Ok().json(subscription))
}

async fn delete_subscription(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse, actix_web::error::Error> {
    verify_auth(&http_req, &state.auth_service)?;
    state
        .subscription_service
        .delete_subscription(path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Lists the brands a user follows, ordered by category then name
/// POST /api/mybrands/users/
async fn my_brands(
    state: web::Data<AppState>,
    req: web::Json<UserRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, actix_web::error::Error> {
    verify_auth(&http_req, &state.auth_service)?;
    let data = req.into_inner();
    data.validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    match state.subscription_service.my_brands(data.user_id).await {
        Ok(mybrand) => Ok(HttpResponse::Ok().json(MyBrandsResponse { mybrand })),
        Err(e) => {
            log::error!("Failed to list brands for user {}: {}", data.user_id, e);
            Err(e.into())
        }
    }
}

/// Cancels a subscription. Cancelling one that does not exist also succeeds.
/// POST /api/mybrands/unlike/
async fn unlike(
    state: web::Data<AppState>,
    req: web::Json<UnlikeRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, actix_web::error::Error> {
    verify_auth(&http_req, &state.auth_service)?;
    let data = req.into_inner();
    data.validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    state
        .subscription_service
        .unsubscribe(data.user_id, data.brand_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Brand subscription cancelled")))
}

/// Subscribes a new user to the brands picked during signup
/// POST /api/guest/mybrands/
async fn guest_subscribe(
    state: web::Data<AppState>,
    req: web::Json<GuestSubscribeRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, actix_web::error::Error> {
    verify_auth(&http_req, &state.auth_service)?;
    let data = req.into_inner();
    data.validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    state
        .subscription_service
        .subscribe_many(data.user_id, &data.brand_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Brand subscription succeeded")))
}

#[cfg(test)]
mod tests {
    use super::super::{init_routes, test_support::*};
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::{json, Value};

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(init_routes),
            )
            .await
        };
    }

    fn brand_ids(body: &Value) -> Vec<i64> {
        body["mybrand"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_i64().unwrap())
            .collect()
    }

    #[actix_web::test]
    async fn test_my_brands_empty_for_new_user() {
        let (state, _) = seeded_state().await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/mybrands/users/")
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "user_id": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "mybrand": [] }));
    }

    #[actix_web::test]
    async fn test_subscribe_then_list_sorted() {
        let (state, _) = seeded_state().await;
        let app = app!(state);

        for brand in [3, 1] {
            let req = test::TestRequest::post()
                .uri("/api/mybrands/")
                .insert_header(auth_header(&state, 1))
                .set_json(json!({ "user": 1, "brand": brand }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::post()
            .uri("/api/mybrands/users/")
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "user_id": 1 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        // vips is category 1, starbucks category 2
        assert_eq!(brand_ids(&body), vec![1, 3]);

        let vips = &body["mybrand"][0];
        assert_eq!(vips["name"], "vips");
        assert_eq!(vips["category_id"], 1);
        assert_eq!(vips["created_date"], "2021-07-11");
        assert!(vips["banner_image"].is_null());
    }

    #[actix_web::test]
    async fn test_duplicate_subscribe_returns_existing_row() {
        let (state, _) = seeded_state().await;
        let app = app!(state);

        let make_req = || {
            test::TestRequest::post()
                .uri("/api/mybrands/")
                .insert_header(auth_header(&state, 2))
                .set_json(json!({ "user": 2, "brand": 4 }))
                .to_request()
        };

        let first = test::call_service(&app, make_req()).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let first: Value = test::read_body_json(first).await;
        assert_eq!(first["user"], 2);
        assert_eq!(first["brand"], 4);

        let second = test::call_service(&app, make_req()).await;
        assert_eq!(second.status(), StatusCode::OK);
        let second: Value = test::read_body_json(second).await;
        assert_eq!(first, second);
    }

    #[actix_web::test]
    async fn test_subscribe_unknown_brand_is_not_found() {
        let (state, _) = seeded_state().await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/mybrands/")
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "user": 1, "brand": 99 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_unlike_twice_returns_same_message() {
        let (state, _) = seeded_state().await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/guest/mybrands/")
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "user_id": 1, "brand_id": [1, 3] }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let mut messages = Vec::new();
        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/api/mybrands/unlike/")
                .insert_header(auth_header(&state, 1))
                .set_json(json!({ "user_id": 1, "brand_id": 1 }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            messages.push(body["message"].clone());
        }
        assert_eq!(messages[0], messages[1]);

        let req = test::TestRequest::post()
            .uri("/api/mybrands/users/")
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "user_id": 1 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(brand_ids(&body), vec![3]);
    }

    #[actix_web::test]
    async fn test_guest_subscribe_rejects_empty_list() {
        let (state, _) = seeded_state().await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/guest/mybrands/")
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "user_id": 1, "brand_id": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_missing_field_is_bad_request() {
        let (state, _) = seeded_state().await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/mybrands/unlike/")
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "user_id": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("brand_id"));
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let (state, _) = seeded_state().await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/mybrands/users/")
            .set_json(json!({ "user_id": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_subscription_resource_get_list_delete() {
        let (state, _) = seeded_state().await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/guest/mybrands/")
            .insert_header(auth_header(&state, 2))
            .set_json(json!({ "user_id": 2, "brand_id": [2, 4] }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/mybrands/?user=2")
            .insert_header(auth_header(&state, 2))
            .to_request();
        let rows: Value = test::call_and_read_body_json(&app, req).await;
        let rows = rows.as_array().unwrap().clone();
        assert_eq!(rows.len(), 2);
        let id = rows[0]["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/mybrands/{}/", id))
            .insert_header(auth_header(&state, 2))
            .to_request();
        let row: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(row, rows[0]);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/mybrands/{}/", id))
            .insert_header(auth_header(&state, 2))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );

        let req = test::TestRequest::get()
            .uri(&format!("/api/mybrands/{}/", id))
            .insert_header(auth_header(&state, 2))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    // subscribes `user` to `brand` and evaluates to the row id
    macro_rules! subscribe_row {
        ($app:expr, $state:expr, $user:expr, $brand:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/mybrands/")
                .insert_header(auth_header(&$state, $user))
                .set_json(json!({ "user": $user, "brand": $brand }))
                .to_request();
            let row: Value = test::call_and_read_body_json(&$app, req).await;
            row["id"].as_i64().unwrap()
        }};
    }

    #[actix_web::test]
    async fn test_put_and_patch_update_subscription() {
        let (state, _) = seeded_state().await;
        let app = app!(state);
        let id = subscribe_row!(app, state, 1, 1);

        let req = test::TestRequest::put()
            .uri(&format!("/api/mybrands/{}/", id))
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "user": 2, "brand": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let row: Value = test::read_body_json(resp).await;
        assert_eq!(row, json!({ "id": id, "user": 2, "brand": 3 }));

        let req = test::TestRequest::patch()
            .uri(&format!("/api/mybrands/{}/", id))
            .insert_header(auth_header(&state, 2))
            .set_json(json!({ "brand": 4 }))
            .to_request();
        let row: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(row, json!({ "id": id, "user": 2, "brand": 4 }));
    }

    #[actix_web::test]
    async fn test_update_unknown_subscription_is_not_found() {
        let (state, _) = seeded_state().await;
        let app = app!(state);

        let req = test::TestRequest::put()
            .uri("/api/mybrands/999/")
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "user": 1, "brand": 1 }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );

        let id = subscribe_row!(app, state, 1, 1);
        let req = test::TestRequest::patch()
            .uri(&format!("/api/mybrands/{}/", id))
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "brand": 99 }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn test_update_to_existing_pair_is_bad_request() {
        let (state, _) = seeded_state().await;
        let app = app!(state);
        subscribe_row!(app, state, 1, 1);
        let id = subscribe_row!(app, state, 1, 2);

        let req = test::TestRequest::put()
            .uri(&format!("/api/mybrands/{}/", id))
            .insert_header(auth_header(&state, 1))
            .set_json(json!({ "user": 1, "brand": 1 }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = test::TestRequest::get()
            .uri(&format!("/api/mybrands/{}/", id))
            .insert_header(auth_header(&state, 1))
            .to_request();
        let row: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(row["brand"], 2);
    }
}
