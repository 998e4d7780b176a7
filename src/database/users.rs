use crate::errors::ServiceError;
use mysql_async::{params, prelude::*, Conn};

/// Checks whether a user id is known to the user store
pub async fn user_exists(conn: &mut Conn, user_id: i64) -> Result<bool, ServiceError> {
    let id: Option<i64> = conn
        .exec_first(
            "SELECT id FROM users WHERE id = :id",
            params! { "id" => user_id },
        )
        .await?;
    Ok(id.is_some())
}
