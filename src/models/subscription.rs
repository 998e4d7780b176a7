use serde::Serialize;

/// A row of the subscription ledger linking one user to one brand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    #[serde(rename = "brand")]
    pub brand_id: i64,
}
