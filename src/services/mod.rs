pub mod auth_service;
pub mod subscription_service;
