use sqlx::SqlitePool;

use crate::error::DbError;
use crate::models::RoomRow;

pub async fn create_room(
    pool: &SqlitePool,
    room_number: &str,
    room_type: &str,
    price_per_night: f64,
) -> Result<i64, DbError> {
    let result = sqlx::query(
        r#"INSERT INTO rooms (room_number, room_type, price_per_night, status)
           VALUES (?, ?, ?, 'available')"#,
    )
    .bind(room_number)
    .bind(room_type)
    .bind(price_per_night)
    .execute(pool)
    .await
    .map_err(DbError::on_insert("Room number"))?;

    Ok(result.last_insert_rowid())
}

pub async fn list_rooms(pool: &SqlitePool) -> Result<Vec<RoomRow>, sqlx::Error> {
    sqlx::query_as::<_, RoomRow>(
        "SELECT id, room_number, room_type, price_per_night, status FROM rooms ORDER BY room_number",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_room_by_id(
    pool: &SqlitePool,
    room_id: i64,
) -> Result<Option<RoomRow>, sqlx::Error> {
    sqlx::query_as::<_, RoomRow>(
        "SELECT id, room_number, room_type, price_per_night, status FROM rooms WHERE id = ?",
    )
    .bind(room_id)
    .fetch_optional(pool)
    .await
}

pub async fn set_room_status(
    pool: &SqlitePool,
    room_id: i64,
    status: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE rooms SET status = ? WHERE id = ?")
        .bind(status)
        .bind(room_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
