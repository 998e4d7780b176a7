use crate::errors::ServiceError;
use crate::models::subscription::Subscription;
use mysql_async::{params, prelude::*, Conn, TxOpts};

type SubscriptionRow = (i64, i64, i64);

fn subscription_from_row((id, user_id, brand_id): SubscriptionRow) -> Subscription {
    Subscription {
        id,
        user_id,
        brand_id,
    }
}

/// Inserts one subscription per brand inside a single transaction.
/// Pairs that already exist are left untouched; returns how many rows were added.
pub async fn insert_subscriptions(
    conn: &mut Conn,
    user_id: i64,
    brand_ids: &[i64],
) -> Result<u64, ServiceError> {
    let mut tx = conn.start_transaction(TxOpts::default()).await?;

    let mut inserted = 0;
    for brand_id in brand_ids {
        tx.exec_drop(
            r"INSERT IGNORE INTO subscribe_brands (user_id, brand_id)
              VALUES (:user_id, :brand_id)",
            params! {
                "user_id" => user_id,
                "brand_id" => *brand_id,
            },
        )
        .await?;
        inserted += tx.affected_rows();
    }

    tx.commit().await?;
    Ok(inserted)
}

pub async fn find_subscription(
    conn: &mut Conn,
    user_id: i64,
    brand_id: i64,
) -> Result<Option<Subscription>, ServiceError> {
    let row: Option<SubscriptionRow> = conn
        .exec_first(
            "SELECT id, user_id, brand_id FROM subscribe_brands WHERE user_id = :user_id AND brand_id = :brand_id",
            params! { "user_id" => user_id, "brand_id" => brand_id },
        )
        .await?;
    Ok(row.map(subscription_from_row))
}

pub async fn get_subscription(conn: &mut Conn, id: i64) -> Result<Option<Subscription>, ServiceError> {
    let row: Option<SubscriptionRow> = conn
        .exec_first(
            "SELECT id, user_id, brand_id FROM subscribe_brands WHERE id = :id",
            params! { "id" => id },
        )
        .await?;
    Ok(row.map(subscription_from_row))
}

pub async fn list_subscriptions(
    conn: &mut Conn,
    user_id: Option<i64>,
) -> Result<Vec<Subscription>, ServiceError> {
    let rows: Vec<SubscriptionRow> = match user_id {
        Some(user_id) => {
            conn.exec(
                "SELECT id, user_id, brand_id FROM subscribe_brands WHERE user_id = :user_id ORDER BY id",
                params! { "user_id" => user_id },
            )
            .await?
        }
        None => {
            conn.query("SELECT id, user_id, brand_id FROM subscribe_brands ORDER BY id")
                .await?
        }
    };
    Ok(rows.into_iter().map(subscription_from_row).collect())
}

/// Deletes every row linking the user to the brand and returns how many went away.
pub async fn delete_subscriptions(
    conn: &mut Conn,
    user_id: i64,
    brand_id: i64,
) -> Result<u64, ServiceError> {
    conn.exec_drop(
        "DELETE FROM subscribe_brands WHERE user_id = :user_id AND brand_id = :brand_id",
        params! { "user_id" => user_id, "brand_id" => brand_id },
    )
    .await?;
    Ok(conn.affected_rows())
}

pub async fn delete_subscription(conn: &mut Conn, id: i64) -> Result<u64, ServiceError> {
    conn.exec_drop(
        "DELETE FROM subscribe_brands WHERE id = :id",
        params! { "id" => id },
    )
    .await?;
    Ok(conn.affected_rows())
}

/// Points an existing row at another user/brand pair. Returns the rows changed.
pub async fn update_subscription(
    conn: &mut Conn,
    id: i64,
    user_id: i64,
    brand_id: i64,
) -> Result<u64, ServiceError> {
    let result = conn
        .exec_drop(
            "UPDATE subscribe_brands SET user_id = :user_id, brand_id = :brand_id WHERE id = :id",
            params! { "id" => id, "user_id" => user_id, "brand_id" => brand_id },
        )
        .await;

    if let Err(mysql_async::Error::Server(err)) = &result {
        if err.code == 1062 {
            return Err(ServiceError::InvalidInput(format!(
                "User {} is already subscribed to brand {}",
                user_id, brand_id
            )));
        }
    }
    result?;

    Ok(conn.affected_rows())
}
