use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: i64,
    pub brand_id: i64,
    pub title: String,
    pub image: String,
    pub text: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_date: NaiveDate,
    pub update_date: NaiveDate,
}
