use crate::errors::ServiceError;
use crate::models::auth::Claims;
use crate::services::{auth_service::AuthService, subscription_service::SubscriptionService};
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde_json::json;
use std::sync::Arc;

pub mod events;
pub mod mybrands;

#[derive(Clone)]
pub struct AppState {
    pub subscription_service: Arc<SubscriptionService>,
    pub auth_service: Arc<AuthService>,
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected request body: {}", err);
        ServiceError::InvalidInput(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ServiceError::InvalidInput(err.to_string()).into()
    }))
    .route("/health", web::get().to(health))
    .service(
        web::scope("/api")
            .configure(mybrands::init_routes)
            .configure(events::init_routes),
    );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Verifies the JWT in the Authorization header and returns its claims
fn verify_auth(req: &HttpRequest, auth: &AuthService) -> Result<Claims, ServiceError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ServiceError::Auth("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| ServiceError::Auth("Invalid header format".to_string()))?;

    auth.verify_header(auth_header)
}
