use log::info;
use mysql_async::{prelude::*, Pool};

/// Initializes the database schema by creating necessary tables if they don't exist
pub async fn init_schema(pool: &Pool) -> Result<(), mysql_async::Error> {
    let mut conn = pool.get_conn().await?;

    conn.query_drop(
        r"CREATE TABLE IF NOT EXISTS users (
            id BIGINT PRIMARY KEY AUTO_INCREMENT,
            username VARCHAR(150) NOT NULL UNIQUE,
            email VARCHAR(254) NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .await?;

    conn.query_drop(
        r"CREATE TABLE IF NOT EXISTS categories (
            id BIGINT PRIMARY KEY AUTO_INCREMENT,
            name VARCHAR(100) NOT NULL UNIQUE
        )",
    )
    .await?;

    conn.query_drop(
        r"CREATE TABLE IF NOT EXISTS brands (
            id BIGINT PRIMARY KEY AUTO_INCREMENT,
            created_date DATE NOT NULL,
            update_date DATE NOT NULL,
            category_id BIGINT NOT NULL,
            image VARCHAR(255) NOT NULL DEFAULT '',
            banner_image VARCHAR(255),
            name VARCHAR(100) NOT NULL UNIQUE,
            text TEXT NOT NULL,
            FOREIGN KEY (category_id) REFERENCES categories(id),
            INDEX idx_category_name (category_id, name)
        )",
    )
    .await?;

    conn.query_drop(
        r"CREATE TABLE IF NOT EXISTS events (
            id BIGINT PRIMARY KEY AUTO_INCREMENT,
            brand_id BIGINT NOT NULL,
            title VARCHAR(200) NOT NULL,
            image VARCHAR(255) NOT NULL DEFAULT '',
            text TEXT NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE,
            created_date DATE NOT NULL,
            update_date DATE NOT NULL,
            FOREIGN KEY (brand_id) REFERENCES brands(id) ON DELETE CASCADE,
            INDEX idx_brand_id (brand_id)
        )",
    )
    .await?;

    conn.query_drop(
        r"CREATE TABLE IF NOT EXISTS subscribe_brands (
            id BIGINT PRIMARY KEY AUTO_INCREMENT,
            user_id BIGINT NOT NULL,
            brand_id BIGINT NOT NULL,
            UNIQUE KEY uniq_user_brand (user_id, brand_id),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (brand_id) REFERENCES brands(id) ON DELETE CASCADE
        )",
    )
    .await?;

    info!("Database schema initialized");
    Ok(())
}
