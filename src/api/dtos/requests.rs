use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub slot_id: String,
    pub full_name: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct BookingListQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

#[derive(Deserialize)]
pub struct ChangesQuery {
    pub table: String,
    pub column: Option<String>,
    pub value: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateVenueRequest {
    pub name: String,
    pub address: String,
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateVenueRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub images: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct CreateSportRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSportRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// One operating-hours band. Times are `HH:MM` or `HH:MM:SS`.
#[derive(Deserialize)]
pub struct TimingInput {
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub is_morning: bool,
}

#[derive(Deserialize)]
pub struct ReplaceTimingsRequest {
    pub timings: Vec<TimingInput>,
}
