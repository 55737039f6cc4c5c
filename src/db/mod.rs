use std::{env, fs, path::Path};

use sqlx::SqlitePool;

use crate::{
    auth::hash_password,
    models::{ROOM_AVAILABLE, ROOM_MAINTENANCE, ROOM_OCCUPIED},
};

pub mod analytics;
pub mod bookings;
pub mod catalog;
pub mod rooms;
pub mod users;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Seeds the admin account and the starter catalog. Idempotent: every seed
/// checks for an existing row on its unique column before inserting.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    seed_admin(pool).await?;
    seed_catalog(pool).await?;
    seed_rooms(pool).await?;
    Ok(())
}

async fn seed_admin(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@admin.com".to_string());

    let existing = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE email = ? LIMIT 1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    if password == "admin123" {
        log::warn!("ADMIN_PASSWORD not set. Using the default password. Set ADMIN_PASSWORD in production.");
    }

    let password_hash = hash_password(&password)
        .map_err(|_| sqlx::Error::Protocol("password hash failed".into()))?;

    sqlx::query("INSERT INTO users (email, password, full_name, is_admin) VALUES (?, ?, ?, 1)")
        .bind(&email)
        .bind(password_hash)
        .bind("Administrator")
        .execute(pool)
        .await?;

    Ok(())
}

async fn seed_catalog(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let categories = [
        ("Hair", "Cuts, coloring and styling"),
        ("Spa", "Treatments and massages"),
        ("Nails", "Manicure and pedicure"),
    ];

    for (name, description) in categories {
        let exists =
            sqlx::query_as::<_, (i64,)>("SELECT id FROM service_categories WHERE name = ? LIMIT 1")
                .bind(name)
                .fetch_optional(pool)
                .await?;
        if exists.is_some() {
            continue;
        }
        sqlx::query("INSERT INTO service_categories (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(pool)
            .await?;
    }

    let services = [
        ("Haircut", "Basic haircut service", 30.0, "Hair"),
        ("Hair Coloring", "Professional hair coloring", 75.0, "Hair"),
        ("Manicure", "Basic manicure service", 25.0, "Nails"),
        ("Facial", "Rejuvenating facial treatment", 50.0, "Spa"),
    ];

    for (name, description, price, category) in services {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM services WHERE name = ? LIMIT 1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }
        sqlx::query(
            r#"INSERT INTO services (category_id, name, description, price, status)
               VALUES ((SELECT id FROM service_categories WHERE name = ?), ?, ?, ?, 'active')"#,
        )
        .bind(category)
        .bind(name)
        .bind(description)
        .bind(price)
        .execute(pool)
        .await?;
    }

    let staff = [
        ("Maya Collins", "Hair stylist", "maya@serenova.local", "555-0101"),
        ("Elena Brooks", "Spa therapist", "elena@serenova.local", "555-0102"),
    ];

    for (full_name, specialty, email, phone) in staff {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM staff WHERE email = ? LIMIT 1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }
        sqlx::query("INSERT INTO staff (full_name, specialty, email, phone) VALUES (?, ?, ?, ?)")
            .bind(full_name)
            .bind(specialty)
            .bind(email)
            .bind(phone)
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn seed_rooms(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let rooms = [
        ("101", "Standard", 100.0, ROOM_AVAILABLE),
        ("102", "Standard", 100.0, ROOM_OCCUPIED),
        ("201", "Suite", 180.0, ROOM_MAINTENANCE),
    ];

    for (room_number, room_type, price_per_night, status) in rooms {
        let exists =
            sqlx::query_as::<_, (i64,)>("SELECT id FROM rooms WHERE room_number = ? LIMIT 1")
                .bind(room_number)
                .fetch_optional(pool)
                .await?;
        if exists.is_some() {
            continue;
        }
        sqlx::query(
            "INSERT INTO rooms (room_number, room_type, price_per_night, status) VALUES (?, ?, ?, ?)",
        )
        .bind(room_number)
        .bind(room_type)
        .bind(price_per_night)
        .bind(status)
        .execute(pool)
        .await?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_util {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use std::str::FromStr;

    /// In-memory pool capped at one connection so every statement sees the
    /// same database.
    pub async fn test_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        super::run_migrations(&pool).await.unwrap();
        pool
    }

    pub async fn seeded_pool() -> SqlitePool {
        let pool = test_pool().await;
        super::seed_defaults(&pool).await.unwrap();
        pool
    }
}
