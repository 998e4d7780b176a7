use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Request structure for creating one subscription
///
/// # Examples
///
/// ```json
/// { "user": 1, "brand": 3 }
/// ```
#[derive(Debug, Validate, Deserialize)]
pub struct SubscribeRequest {
    #[validate(range(min = 1))]
    pub user: i64,
    #[validate(range(min = 1))]
    pub brand: i64,
}

/// Partial update of a subscription row; absent fields keep their value
///
/// # Examples
///
/// ```json
/// { "brand": 4 }
/// ```
#[derive(Debug, Default, Validate, Deserialize)]
pub struct PatchSubscriptionRequest {
    #[validate(range(min = 1))]
    pub user: Option<i64>,
    #[validate(range(min = 1))]
    pub brand: Option<i64>,
}

/// Request structure for the brand and event listings of one user
#[derive(Debug, Validate, Deserialize)]
pub struct UserRequest {
    #[validate(range(min = 1))]
    pub user_id: i64,
}

/// Request structure for cancelling a subscription
#[derive(Debug, Validate, Deserialize)]
pub struct UnlikeRequest {
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[validate(range(min = 1))]
    pub brand_id: i64,
}

/// Request structure for subscribing to several brands while signing up
///
/// # Examples
///
/// ```json
/// { "user_id": 1, "brand_id": [1, 3, 4] }
/// ```
#[derive(Debug, Validate, Deserialize)]
pub struct GuestSubscribeRequest {
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[validate(length(min = 1))]
    #[validate(custom(function = "validate_ids"))]
    pub brand_id: Vec<i64>,
}

/// Query string filter for the subscription listing
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionFilter {
    pub user: Option<i64>,
}

/// Validates that every id in a list is positive
pub fn validate_ids(ids: &[i64]) -> Result<(), ValidationError> {
    if ids.iter().any(|id| *id < 1) {
        return Err(ValidationError::new("ids must be positive integers"));
    }
    Ok(())
}
