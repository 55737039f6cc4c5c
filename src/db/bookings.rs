use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::DbError;
use crate::models::{BookingProductRow, BookingRow, PaymentRow, ReviewRow, STATUS_PENDING};

const BOOKING_SELECT: &str = r#"SELECT b.id, b.user_id, b.service_id, b.room_id, b.staff_id,
       b.date, b.time, b.status,
       s.name AS service_name, s.price AS service_price,
       u.email AS user_email, u.full_name AS user_full_name,
       st.full_name AS staff_name
  FROM bookings b
  LEFT JOIN services s ON b.service_id = s.id
  LEFT JOIN users u ON b.user_id = u.id
  LEFT JOIN staff st ON b.staff_id = st.id"#;

pub async fn create_booking(
    pool: &SqlitePool,
    user_id: i64,
    service_id: Option<i64>,
    room_id: Option<i64>,
    staff_id: Option<i64>,
    date: &str,
    time: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"INSERT INTO bookings (user_id, service_id, room_id, staff_id, date, time, status)
           VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(user_id)
    .bind(service_id)
    .bind(room_id)
    .bind(staff_id)
    .bind(date)
    .bind(time)
    .bind(STATUS_PENDING)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_booking_by_id(
    pool: &SqlitePool,
    booking_id: i64,
) -> Result<Option<BookingRow>, sqlx::Error> {
    let query = format!("{BOOKING_SELECT} WHERE b.id = ? LIMIT 1");
    sqlx::query_as::<_, BookingRow>(&query)
        .bind(booking_id)
        .fetch_optional(pool)
        .await
}

/// All bookings, or only those owned by `user_id` when given.
pub async fn list_bookings(
    pool: &SqlitePool,
    user_id: Option<i64>,
) -> Result<Vec<BookingRow>, sqlx::Error> {
    match user_id {
        Some(user_id) => {
            let query = format!("{BOOKING_SELECT} WHERE b.user_id = ?");
            sqlx::query_as::<_, BookingRow>(&query)
                .bind(user_id)
                .fetch_all(pool)
                .await
        }
        None => {
            sqlx::query_as::<_, BookingRow>(BOOKING_SELECT)
                .fetch_all(pool)
                .await
        }
    }
}

/// Writes any status string; the booking lifecycle has no enforced
/// transition graph.
pub async fn set_booking_status(
    pool: &SqlitePool,
    booking_id: i64,
    status: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
        .bind(status)
        .bind(booking_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn add_booking_product(
    pool: &SqlitePool,
    booking_id: i64,
    product_id: i64,
    quantity: i64,
) -> Result<(), DbError> {
    sqlx::query("INSERT INTO booking_products (booking_id, product_id, quantity) VALUES (?, ?, ?)")
        .bind(booking_id)
        .bind(product_id)
        .bind(quantity)
        .execute(pool)
        .await
        .map_err(DbError::on_insert("Line item"))?;

    Ok(())
}

pub async fn products_for_booking(
    pool: &SqlitePool,
    booking_id: i64,
) -> Result<Vec<BookingProductRow>, sqlx::Error> {
    sqlx::query_as::<_, BookingProductRow>(
        r#"SELECT bp.booking_id, bp.product_id, bp.quantity,
                  p.name AS product_name, p.price AS product_price
           FROM booking_products bp
           LEFT JOIN products p ON bp.product_id = p.id
           WHERE bp.booking_id = ?"#,
    )
    .bind(booking_id)
    .fetch_all(pool)
    .await
}

pub async fn create_payment(
    pool: &SqlitePool,
    booking_id: i64,
    amount: f64,
    status: &str,
) -> Result<i64, sqlx::Error> {
    let payment_date = Utc::now().format("%Y-%m-%d").to_string();
    let result = sqlx::query(
        "INSERT INTO payments (booking_id, amount, payment_date, status) VALUES (?, ?, ?, ?)",
    )
    .bind(booking_id)
    .bind(amount)
    .bind(payment_date)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn payments_for_booking(
    pool: &SqlitePool,
    booking_id: i64,
) -> Result<Vec<PaymentRow>, sqlx::Error> {
    sqlx::query_as::<_, PaymentRow>(
        "SELECT id, booking_id, amount, payment_date, status FROM payments WHERE booking_id = ?",
    )
    .bind(booking_id)
    .fetch_all(pool)
    .await
}

pub async fn create_review(
    pool: &SqlitePool,
    booking_id: i64,
    user_id: i64,
    rating: i64,
    comment: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result =
        sqlx::query("INSERT INTO reviews (booking_id, user_id, rating, comment) VALUES (?, ?, ?, ?)")
            .bind(booking_id)
            .bind(user_id)
            .bind(rating)
            .bind(comment)
            .execute(pool)
            .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list_reviews(pool: &SqlitePool) -> Result<Vec<ReviewRow>, sqlx::Error> {
    sqlx::query_as::<_, ReviewRow>(
        r#"SELECT r.id, r.booking_id, r.user_id, r.rating, r.comment, r.created_at,
                  u.full_name AS user_full_name
           FROM reviews r
           LEFT JOIN users u ON r.user_id = u.id
           ORDER BY r.created_at DESC, r.id DESC"#,
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::seeded_pool;
    use crate::db::{catalog, users};
    use crate::models::STATUS_CONFIRMED;

    async fn sample_user(pool: &SqlitePool, email: &str) -> i64 {
        users::create_user(pool, email, "hash", "Sample").await.unwrap()
    }

    #[actix_web::test]
    async fn booking_list_scopes_to_the_owner() {
        let pool = seeded_pool().await;
        let alice = sample_user(&pool, "alice@x.com").await;
        let bob = sample_user(&pool, "bob@x.com").await;
        let services = catalog::list_services(&pool, None).await.unwrap();

        create_booking(&pool, alice, Some(services[0].id), None, None, "2024-01-01", Some("10:00"))
            .await
            .unwrap();
        create_booking(&pool, bob, Some(services[1].id), None, None, "2024-01-02", Some("11:00"))
            .await
            .unwrap();

        let all = list_bookings(&pool, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let mine = list_bookings(&pool, Some(alice)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, alice);
        assert_eq!(mine[0].service_name.as_deref(), Some(services[0].name.as_str()));
        assert_eq!(mine[0].status, STATUS_PENDING);
    }

    #[actix_web::test]
    async fn null_references_do_not_drop_booking_rows() {
        let pool = seeded_pool().await;
        let alice = sample_user(&pool, "alice@x.com").await;

        // Room-only stay: no service, no staff.
        let rooms = crate::db::rooms::list_rooms(&pool).await.unwrap();
        let id = create_booking(&pool, alice, None, Some(rooms[0].id), None, "2024-02-01", None)
            .await
            .unwrap();

        let booking = get_booking_by_id(&pool, id).await.unwrap().unwrap();
        assert!(booking.service_name.is_none());
        assert!(booking.staff_name.is_none());
        assert_eq!(booking.room_id, Some(rooms[0].id));
        assert_eq!(booking.user_full_name.as_deref(), Some("Sample"));
    }

    #[actix_web::test]
    async fn status_update_reports_whether_a_row_matched() {
        let pool = seeded_pool().await;
        let alice = sample_user(&pool, "alice@x.com").await;
        let services = catalog::list_services(&pool, None).await.unwrap();
        let id = create_booking(&pool, alice, Some(services[0].id), None, None, "2024-01-01", None)
            .await
            .unwrap();

        assert!(set_booking_status(&pool, id, STATUS_CONFIRMED).await.unwrap());
        assert!(!set_booking_status(&pool, 9999, STATUS_CONFIRMED).await.unwrap());

        let booking = get_booking_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(booking.status, STATUS_CONFIRMED);
    }

    #[actix_web::test]
    async fn line_items_and_payments_attach_to_a_booking() {
        let pool = seeded_pool().await;
        let alice = sample_user(&pool, "alice@x.com").await;
        let services = catalog::list_services(&pool, None).await.unwrap();
        let booking = create_booking(&pool, alice, Some(services[0].id), None, None, "2024-01-01", None)
            .await
            .unwrap();

        let product = catalog::create_product(&pool, "Argan Oil", 18.0, 10)
            .await
            .unwrap();
        add_booking_product(&pool, booking, product, 2).await.unwrap();

        let items = products_for_booking(&pool, booking).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].product_name.as_deref(), Some("Argan Oil"));

        let err = add_booking_product(&pool, booking, product, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));

        create_payment(&pool, booking, 30.0, "completed").await.unwrap();
        create_payment(&pool, booking, 36.0, "completed").await.unwrap();
        let payments = payments_for_booking(&pool, booking).await.unwrap();
        assert_eq!(payments.len(), 2);
    }

    #[actix_web::test]
    async fn reviews_list_newest_first() {
        let pool = seeded_pool().await;
        let alice = sample_user(&pool, "alice@x.com").await;
        let services = catalog::list_services(&pool, None).await.unwrap();
        let booking = create_booking(&pool, alice, Some(services[0].id), None, None, "2024-01-01", None)
            .await
            .unwrap();

        create_review(&pool, booking, alice, 4, Some("Good")).await.unwrap();
        create_review(&pool, booking, alice, 5, Some("Great")).await.unwrap();

        let reviews = list_reviews(&pool).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].comment.as_deref(), Some("Great"));
        assert_eq!(reviews[0].user_full_name.as_deref(), Some("Sample"));
    }
}
