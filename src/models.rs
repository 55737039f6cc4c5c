use serde::Serialize;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const SERVICE_ACTIVE: &str = "active";
pub const SERVICE_INACTIVE: &str = "inactive";

pub const ROOM_AVAILABLE: &str = "available";
pub const ROOM_OCCUPIED: &str = "occupied";
pub const ROOM_MAINTENANCE: &str = "maintenance";

/// Full user record, hash included. Deliberately not Serialize: the
/// sanitized [`crate::auth::AuthUser`] is what crosses the boundary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub is_admin: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: i64,
    pub user_id: i64,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StaffRow {
    pub id: i64,
    pub full_name: String,
    pub specialty: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ServiceRow {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RoomRow {
    pub id: i64,
    pub room_number: String,
    pub room_type: String,
    pub price_per_night: f64,
    pub status: String,
}

/// Booking plus display fields resolved via LEFT JOINs, so bookings with a
/// null service, room or staff reference still come back.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BookingRow {
    pub id: i64,
    pub user_id: i64,
    pub service_id: Option<i64>,
    pub room_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub date: String,
    pub time: Option<String>,
    pub status: String,
    pub service_name: Option<String>,
    pub service_price: Option<f64>,
    pub user_email: Option<String>,
    pub user_full_name: Option<String>,
    pub staff_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BookingProductRow {
    pub booking_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub product_name: Option<String>,
    pub product_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: i64,
    pub booking_id: i64,
    pub amount: f64,
    pub payment_date: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub booking_id: i64,
    pub user_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
    pub user_full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RevenuePoint {
    pub date: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ServiceUsage {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OccupancyCount {
    pub status: String,
    pub count: i64,
}
