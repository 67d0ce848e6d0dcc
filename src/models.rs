use serde::Deserialize;

/// Teacher record, resolved once from the signed-in user id.
#[derive(Debug, Clone, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// One class a teacher teaches. The upstream subjects resource returns one
/// row per subject taught, so the same class can appear more than once.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassRef {
    pub class_id: i64,
    pub class_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatingChart {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub layout_type: String,
    pub rows: i64,
    pub columns: i64,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub assigned_count: i64,
    #[serde(default)]
    pub total_students: i64,
}

/// Seat occupancy within a chart. Positions are 1-indexed.
#[derive(Debug, Clone, Deserialize)]
pub struct SeatAssignment {
    pub row_num: i64,
    pub col_num: i64,
    pub student_id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Student in the chart's class with no seat in this chart.
#[derive(Debug, Clone, Deserialize)]
pub struct UnassignedStudent {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Full chart payload: the chart fields plus both derived collections.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartDetail {
    #[serde(flatten)]
    pub chart: SeatingChart,
    #[serde(default)]
    pub assignments: Vec<SeatAssignment>,
    #[serde(default)]
    pub unassigned_students: Vec<UnassignedStudent>,
}
