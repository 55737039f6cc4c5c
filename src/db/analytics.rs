use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use crate::models::{OccupancyCount, RevenuePoint, ServiceUsage, STATUS_COMPLETED};

/// Start of the trailing window as an ISO date string. Booking dates are
/// stored as `YYYY-MM-DD` text, so a lexicographic compare is a date compare.
/// A delta too large to represent clamps the cutoff to the distant past.
fn window_start(days: i64) -> String {
    Duration::try_days(days)
        .and_then(|delta| Utc::now().checked_sub_signed(delta))
        .map(|cutoff| cutoff.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "0000-01-01".to_string())
}

/// Service revenue from completed bookings in the window, grouped by day.
pub async fn revenue_by_day(
    pool: &SqlitePool,
    days: i64,
) -> Result<Vec<RevenuePoint>, sqlx::Error> {
    sqlx::query_as::<_, RevenuePoint>(
        r#"SELECT b.date AS date, SUM(s.price) AS total
           FROM bookings b
           JOIN services s ON b.service_id = s.id
           WHERE b.status = ? AND b.date >= ?
           GROUP BY b.date
           ORDER BY b.date ASC"#,
    )
    .bind(STATUS_COMPLETED)
    .bind(window_start(days))
    .fetch_all(pool)
    .await
}

/// Bookings per service name in the window, most used first.
pub async fn service_usage(pool: &SqlitePool, days: i64) -> Result<Vec<ServiceUsage>, sqlx::Error> {
    sqlx::query_as::<_, ServiceUsage>(
        r#"SELECT s.name AS name, COUNT(*) AS count
           FROM bookings b
           JOIN services s ON b.service_id = s.id
           WHERE b.date >= ?
           GROUP BY s.name
           ORDER BY count DESC"#,
    )
    .bind(window_start(days))
    .fetch_all(pool)
    .await
}

/// Room counts grouped by current status.
pub async fn room_occupancy(pool: &SqlitePool) -> Result<Vec<OccupancyCount>, sqlx::Error> {
    sqlx::query_as::<_, OccupancyCount>(
        "SELECT status, COUNT(*) AS count FROM rooms GROUP BY status",
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::seeded_pool;
    use crate::db::{bookings, catalog, users};
    use crate::models::{ROOM_OCCUPIED, STATUS_CANCELLED};

    fn days_ago(days: i64) -> String {
        (Utc::now() - Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    #[actix_web::test]
    async fn revenue_counts_only_completed_bookings_in_the_window() {
        let pool = seeded_pool().await;
        let user = users::create_user(&pool, "a@x.com", "hash", "A").await.unwrap();
        let services = catalog::list_services(&pool, None).await.unwrap();
        let haircut = services.iter().find(|s| s.name == "Haircut").unwrap();
        let facial = services.iter().find(|s| s.name == "Facial").unwrap();

        let in_window = days_ago(2);
        let earlier = days_ago(3);
        let out_of_window = days_ago(40);

        for (service, date, status) in [
            (haircut, &in_window, STATUS_COMPLETED),
            (haircut, &in_window, STATUS_COMPLETED),
            (facial, &earlier, STATUS_COMPLETED),
            (haircut, &in_window, STATUS_CANCELLED),
            (haircut, &out_of_window, STATUS_COMPLETED),
        ] {
            let id = bookings::create_booking(&pool, user, Some(service.id), None, None, date, None)
                .await
                .unwrap();
            bookings::set_booking_status(&pool, id, status).await.unwrap();
        }

        let revenue = revenue_by_day(&pool, 30).await.unwrap();
        assert_eq!(revenue.len(), 2);
        // Ascending by date: the older day first.
        assert_eq!(revenue[0].date, earlier);
        assert_eq!(revenue[0].total, 50.0);
        assert_eq!(revenue[1].date, in_window);
        assert_eq!(revenue[1].total, 60.0);
    }

    #[actix_web::test]
    async fn service_usage_orders_by_count_descending() {
        let pool = seeded_pool().await;
        let user = users::create_user(&pool, "a@x.com", "hash", "A").await.unwrap();
        let services = catalog::list_services(&pool, None).await.unwrap();
        let haircut = services.iter().find(|s| s.name == "Haircut").unwrap();
        let facial = services.iter().find(|s| s.name == "Facial").unwrap();

        let date = days_ago(1);
        for service in [haircut, haircut, haircut, facial] {
            bookings::create_booking(&pool, user, Some(service.id), None, None, &date, None)
                .await
                .unwrap();
        }

        let usage = service_usage(&pool, 7).await.unwrap();
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].name, "Haircut");
        assert_eq!(usage[0].count, 3);
        assert_eq!(usage[1].count, 1);
    }

    #[actix_web::test]
    async fn extreme_window_does_not_panic() {
        assert_eq!(window_start(i64::MAX), "0000-01-01");
        assert_eq!(window_start(i64::MIN), "0000-01-01");

        let pool = seeded_pool().await;
        let revenue = revenue_by_day(&pool, i64::MAX).await.unwrap();
        assert!(revenue.is_empty());
    }

    #[actix_web::test]
    async fn occupancy_groups_rooms_by_status() {
        let pool = seeded_pool().await;
        let rooms = crate::db::rooms::list_rooms(&pool).await.unwrap();
        // Seed data holds one room per status; move the available one.
        let available = rooms.iter().find(|r| r.status == "available").unwrap();
        crate::db::rooms::set_room_status(&pool, available.id, ROOM_OCCUPIED)
            .await
            .unwrap();

        let occupancy = room_occupancy(&pool).await.unwrap();
        let occupied = occupancy.iter().find(|o| o.status == ROOM_OCCUPIED).unwrap();
        assert_eq!(occupied.count, 2);
        assert!(occupancy.iter().all(|o| o.status != "available"));
    }
}
