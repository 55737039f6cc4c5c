use sqlx::SqlitePool;

use crate::error::DbError;
use crate::models::{CategoryRow, ProductRow, ServiceRow, StaffRow};

pub async fn create_category(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
) -> Result<i64, DbError> {
    let result = sqlx::query("INSERT INTO service_categories (name, description) VALUES (?, ?)")
        .bind(name)
        .bind(description)
        .execute(pool)
        .await
        .map_err(DbError::on_insert("Category"))?;

    Ok(result.last_insert_rowid())
}

pub async fn get_category_by_id(
    pool: &SqlitePool,
    category_id: i64,
) -> Result<Option<CategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, description FROM service_categories WHERE id = ?",
    )
    .bind(category_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<CategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, description FROM service_categories ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_services(
    pool: &SqlitePool,
    status: Option<&str>,
) -> Result<Vec<ServiceRow>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as::<_, ServiceRow>(
                "SELECT id, category_id, name, description, price, status FROM services WHERE status = ?",
            )
            .bind(status)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, ServiceRow>(
                "SELECT id, category_id, name, description, price, status FROM services",
            )
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn get_service_by_id(
    pool: &SqlitePool,
    service_id: i64,
) -> Result<Option<ServiceRow>, sqlx::Error> {
    sqlx::query_as::<_, ServiceRow>(
        "SELECT id, category_id, name, description, price, status FROM services WHERE id = ?",
    )
    .bind(service_id)
    .fetch_optional(pool)
    .await
}

pub async fn create_service(
    pool: &SqlitePool,
    category_id: Option<i64>,
    name: &str,
    description: Option<&str>,
    price: f64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"INSERT INTO services (category_id, name, description, price, status)
           VALUES (?, ?, ?, ?, 'active')"#,
    )
    .bind(category_id)
    .bind(name)
    .bind(description)
    .bind(price)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn set_service_status(
    pool: &SqlitePool,
    service_id: i64,
    status: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE services SET status = ? WHERE id = ?")
        .bind(status)
        .bind(service_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn create_product(
    pool: &SqlitePool,
    name: &str,
    price: f64,
    stock: i64,
) -> Result<i64, DbError> {
    let result = sqlx::query("INSERT INTO products (name, price, stock) VALUES (?, ?, ?)")
        .bind(name)
        .bind(price)
        .bind(stock)
        .execute(pool)
        .await
        .map_err(DbError::on_insert("Product"))?;

    Ok(result.last_insert_rowid())
}

pub async fn list_products(pool: &SqlitePool) -> Result<Vec<ProductRow>, sqlx::Error> {
    sqlx::query_as::<_, ProductRow>("SELECT id, name, price, stock FROM products ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn get_product_by_id(
    pool: &SqlitePool,
    product_id: i64,
) -> Result<Option<ProductRow>, sqlx::Error> {
    sqlx::query_as::<_, ProductRow>("SELECT id, name, price, stock FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_staff(
    pool: &SqlitePool,
    full_name: &str,
    specialty: Option<&str>,
    email: &str,
    phone: Option<&str>,
) -> Result<i64, DbError> {
    let result =
        sqlx::query("INSERT INTO staff (full_name, specialty, email, phone) VALUES (?, ?, ?, ?)")
            .bind(full_name)
            .bind(specialty)
            .bind(email)
            .bind(phone)
            .execute(pool)
            .await
            .map_err(DbError::on_insert("Staff email"))?;

    Ok(result.last_insert_rowid())
}

pub async fn list_staff(pool: &SqlitePool) -> Result<Vec<StaffRow>, sqlx::Error> {
    sqlx::query_as::<_, StaffRow>(
        "SELECT id, full_name, specialty, email, phone FROM staff ORDER BY full_name",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_staff_by_id(
    pool: &SqlitePool,
    staff_id: i64,
) -> Result<Option<StaffRow>, sqlx::Error> {
    sqlx::query_as::<_, StaffRow>(
        "SELECT id, full_name, specialty, email, phone FROM staff WHERE id = ?",
    )
    .bind(staff_id)
    .fetch_optional(pool)
    .await
}

pub async fn assign_service(
    pool: &SqlitePool,
    staff_id: i64,
    service_id: i64,
) -> Result<(), DbError> {
    sqlx::query("INSERT INTO staff_services (staff_id, service_id) VALUES (?, ?)")
        .bind(staff_id)
        .bind(service_id)
        .execute(pool)
        .await
        .map_err(DbError::on_insert("Assignment"))?;

    Ok(())
}

pub async fn services_for_staff(
    pool: &SqlitePool,
    staff_id: i64,
) -> Result<Vec<ServiceRow>, sqlx::Error> {
    sqlx::query_as::<_, ServiceRow>(
        r#"SELECT s.id, s.category_id, s.name, s.description, s.price, s.status
           FROM services s
           JOIN staff_services ss ON ss.service_id = s.id
           WHERE ss.staff_id = ?"#,
    )
    .bind(staff_id)
    .fetch_all(pool)
    .await
}
