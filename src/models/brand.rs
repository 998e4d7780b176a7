use chrono::NaiveDate;
use serde::Serialize;

/// A brand as returned by the my-brands listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brand {
    pub id: i64,
    pub created_date: NaiveDate,
    pub update_date: NaiveDate,
    pub category_id: i64,
    pub image: String,
    pub banner_image: Option<String>,
    pub name: String,
    pub text: String,
}
