use super::AppState;
use crate::{
    errors::ServiceError,
    models::{requests::UserRequest, responses::EventForYouResponse},
};
use actix_web::{web, HttpResponse};
use validator::Validate;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/eventforyou", web::post().to(event_for_you))
        .route("/eventforyou/", web::post().to(event_for_you));
}

/// Events of every brand the user follows, grouped per brand
/// POST /api/eventforyou
async fn event_for_you(
    state: web::Data<AppState>,
    req: web::Json<UserRequest>,
) -> Result<HttpResponse, actix_web::error::Error> {
    let data = req.into_inner();
    data.validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    let eventforyou = state
        .subscription_service
        .events_for_you(data.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(EventForYouResponse { eventforyou }))
}
