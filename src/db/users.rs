use sqlx::SqlitePool;

use crate::error::DbError;
use crate::models::{CustomerRow, UserRow};

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password, full_name, is_admin FROM users WHERE email = ? LIMIT 1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    full_name: &str,
) -> Result<i64, DbError> {
    let result = sqlx::query("INSERT INTO users (email, password, full_name) VALUES (?, ?, ?)")
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .execute(pool)
        .await
        .map_err(DbError::on_insert("Email"))?;

    Ok(result.last_insert_rowid())
}

/// One customer profile per user, keyed on the unique user_id column.
pub async fn upsert_customer(
    pool: &SqlitePool,
    user_id: i64,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO customers (user_id, phone, address)
           VALUES (?, ?, ?)
           ON CONFLICT(user_id) DO UPDATE SET phone = excluded.phone, address = excluded.address"#,
    )
    .bind(user_id)
    .bind(phone)
    .bind(address)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_customer_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<CustomerRow>, sqlx::Error> {
    sqlx::query_as::<_, CustomerRow>(
        "SELECT id, user_id, phone, address FROM customers WHERE user_id = ? LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::test_pool;

    #[actix_web::test]
    async fn duplicate_email_is_a_conflict() {
        let pool = test_pool().await;

        let id = create_user(&pool, "a@x.com", "hash", "A").await.unwrap();
        assert!(id > 0);

        let err = create_user(&pool, "a@x.com", "other", "B")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));

        // The original record is untouched.
        let user = get_user_by_email(&pool, "a@x.com").await.unwrap().unwrap();
        assert_eq!(user.full_name, "A");
        assert_eq!(user.password, "hash");
    }

    #[actix_web::test]
    async fn lookup_by_missing_email_is_none() {
        let pool = test_pool().await;
        let user = get_user_by_email(&pool, "nobody@x.com").await.unwrap();
        assert!(user.is_none());
    }

    #[actix_web::test]
    async fn customer_profile_upserts_in_place() {
        let pool = test_pool().await;
        let user_id = create_user(&pool, "a@x.com", "hash", "A").await.unwrap();

        upsert_customer(&pool, user_id, Some("555-1234"), None)
            .await
            .unwrap();
        upsert_customer(&pool, user_id, Some("555-9999"), Some("12 Elm St"))
            .await
            .unwrap();

        let profile = get_customer_by_user(&pool, user_id).await.unwrap().unwrap();
        assert_eq!(profile.phone.as_deref(), Some("555-9999"));
        assert_eq!(profile.address.as_deref(), Some("12 Elm St"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
