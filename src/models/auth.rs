use serde::{Deserialize, Serialize};

/// JWT claims carried in the Authorization header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub exp: usize,
}
