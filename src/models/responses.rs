use crate::models::{brand::Brand, event::Event};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MyBrandsResponse {
    pub mybrand: Vec<Brand>,
}

/// Events grouped per followed brand, in the same order as the brand listing
#[derive(Debug, Serialize)]
pub struct EventForYouResponse {
    pub eventforyou: Vec<Vec<Event>>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
