use std::collections::HashMap;

use chrono::{DateTime, Local};
use serde_json::json;

use crate::models::ChartDetail;

/// Avatar initials: first letter of each name part, uppercased.
pub fn initials(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .next()
        .into_iter()
        .chain(last_name.chars().next())
        .collect::<String>()
        .to_uppercase()
}

/// Project a loaded chart into the visual cell matrix: rows × columns cells,
/// 1-indexed, each either occupied or an empty drop target. Pure projection;
/// nothing here fetches or mutates.
pub fn grid_model(detail: &ChartDetail) -> serde_json::Value {
    // First assignment wins a contested cell. The server keeps seats unique,
    // but a stale payload must not break rendering.
    let mut by_cell = HashMap::new();
    for assignment in &detail.assignments {
        by_cell
            .entry((assignment.row_num, assignment.col_num))
            .or_insert(assignment);
    }

    let cells: Vec<Vec<serde_json::Value>> = (1..=detail.chart.rows)
        .map(|row_num| {
            (1..=detail.chart.columns)
                .map(|col_num| match by_cell.get(&(row_num, col_num)) {
                    Some(a) => json!({
                        "rowNum": row_num,
                        "colNum": col_num,
                        "occupied": true,
                        "studentId": a.student_id,
                        "firstName": a.first_name,
                        "initials": initials(&a.first_name, &a.last_name),
                        "removable": true,
                        "droppable": true,
                    }),
                    None => json!({
                        "rowNum": row_num,
                        "colNum": col_num,
                        "occupied": false,
                        "label": format!("R{row_num}C{col_num}"),
                        "droppable": true,
                    }),
                })
                .collect()
        })
        .collect();

    json!({
        "rows": detail.chart.rows,
        "columns": detail.chart.columns,
        "cells": cells,
    })
}

/// Printable document model: header fields, the grid, and the unassigned
/// roster. The host environment owns the actual printing.
pub fn print_model(
    detail: &ChartDetail,
    class_name: Option<&str>,
    generated_at: DateTime<Local>,
) -> serde_json::Value {
    json!({
        "chartName": detail.chart.name,
        "className": class_name,
        "roomName": detail.chart.room_name,
        "generatedAt": generated_at.format("%Y-%m-%d %H:%M").to_string(),
        "grid": grid_model(detail),
        "unassigned": detail.unassigned_students.iter().map(|s| json!({
            "studentId": s.id,
            "name": format!("{} {}", s.first_name, s.last_name).trim().to_string(),
        })).collect::<Vec<_>>(),
    })
}
