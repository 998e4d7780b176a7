use super::parse_date;
use crate::errors::ServiceError;
use crate::models::brand::Brand;
use mysql_async::{params, prelude::*, Conn, Params, Value};

type BrandRow = (i64, String, String, i64, String, Option<String>, String, String);

fn brand_from_row(row: BrandRow) -> Result<Brand, ServiceError> {
    let (id, created_date, update_date, category_id, image, banner_image, name, text) = row;
    Ok(Brand {
        id,
        created_date: parse_date(&created_date)?,
        update_date: parse_date(&update_date)?,
        category_id,
        image,
        banner_image,
        name,
        text,
    })
}

/// Brands followed by a user, ordered by category then name.
pub async fn get_subscribed_brands(conn: &mut Conn, user_id: i64) -> Result<Vec<Brand>, ServiceError> {
    let rows: Vec<BrandRow> = conn
        .exec(
            r"SELECT DISTINCT b.id,
                     DATE_FORMAT(b.created_date, '%Y-%m-%d'),
                     DATE_FORMAT(b.update_date, '%Y-%m-%d'),
                     b.category_id, b.image, b.banner_image, b.name, b.text
              FROM subscribe_brands s
              JOIN brands b ON b.id = s.brand_id
              WHERE s.user_id = :user_id
              ORDER BY b.category_id, b.name",
            params! { "user_id" => user_id },
        )
        .await?;

    rows.into_iter().map(brand_from_row).collect()
}

/// Returns the subset of `brand_ids` present in the catalog.
pub async fn get_existing_brand_ids(
    conn: &mut Conn,
    brand_ids: &[i64],
) -> Result<Vec<i64>, ServiceError> {
    if brand_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; brand_ids.len()].join(", ");
    let query = format!("SELECT id FROM brands WHERE id IN ({})", placeholders);
    let values: Vec<Value> = brand_ids.iter().map(|id| Value::from(*id)).collect();

    let ids: Vec<i64> = conn.exec(query.as_str(), Params::Positional(values)).await?;
    Ok(ids)
}
