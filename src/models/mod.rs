pub mod auth;
pub mod brand;
pub mod event;
pub mod requests;
pub mod responses;
pub mod subscription;
