use super::parse_date;
use crate::errors::ServiceError;
use crate::models::event::Event;
use mysql_async::{params, prelude::*, Conn};

type EventRow = (
    i64,
    i64,
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
);

fn event_from_row(row: EventRow) -> Result<Event, ServiceError> {
    let (id, brand_id, title, image, text, start_date, end_date, created_date, update_date) = row;
    Ok(Event {
        id,
        brand_id,
        title,
        image,
        text,
        start_date: parse_date(&start_date)?,
        end_date: end_date.as_deref().map(parse_date).transpose()?,
        created_date: parse_date(&created_date)?,
        update_date: parse_date(&update_date)?,
    })
}

/// All events of every brand the user follows, ordered by brand then event id.
pub async fn get_subscribed_events(conn: &mut Conn, user_id: i64) -> Result<Vec<Event>, ServiceError> {
    let rows: Vec<EventRow> = conn
        .exec(
            r"SELECT e.id, e.brand_id, e.title, e.image, e.text,
                     DATE_FORMAT(e.start_date, '%Y-%m-%d'),
                     DATE_FORMAT(e.end_date, '%Y-%m-%d'),
                     DATE_FORMAT(e.created_date, '%Y-%m-%d'),
                     DATE_FORMAT(e.update_date, '%Y-%m-%d')
              FROM events e
              JOIN subscribe_brands s ON s.brand_id = e.brand_id
              WHERE s.user_id = :user_id
              ORDER BY e.brand_id, e.id",
            params! { "user_id" => user_id },
        )
        .await?;

    rows.into_iter().map(event_from_row).collect()
}
