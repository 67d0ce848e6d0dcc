use std::collections::HashSet;

use serde_json::json;

use crate::models::{ChartDetail, ClassRef, SeatingChart, Teacher};

/// Token for an in-flight chart-list fetch. Applying with a token that is no
/// longer current means a newer selection superseded the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartsToken(u64);

/// Token for an in-flight chart-detail fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailToken(u64);

pub enum ChartsOutcome {
    /// A newer selection won; the fetched list was dropped.
    Stale,
    /// List installed and selection reconciled. `detail_fetch` carries the
    /// follow-up fetch when the reconciled chart has no loaded detail.
    Applied {
        detail_fetch: Option<(i64, DetailToken)>,
    },
}

/// Ephemeral view-state for the seating screen. Durable truth lives upstream;
/// mutations resynchronize by refetching, never by merging locally.
#[derive(Debug, Default)]
pub struct Session {
    pub teacher: Option<Teacher>,
    pub classes: Vec<ClassRef>,
    pub selected_class: Option<i64>,
    pub charts: Vec<SeatingChart>,
    pub selected_chart: Option<i64>,
    pub detail: Option<ChartDetail>,
    pub editor_open: bool,
    /// Chart id being edited. The update branch of save honors it, but no
    /// method populates it yet (see DESIGN.md).
    pub editing_chart: Option<i64>,
    pub held_student: Option<i64>,
    charts_epoch: u64,
    detail_epoch: u64,
}

impl Session {
    /// Wipe the view for a fresh sign-in and invalidate every in-flight
    /// fetch. The returned token guards the roster install that follows.
    pub fn begin_open(&mut self) -> ChartsToken {
        self.teacher = None;
        self.classes.clear();
        self.selected_class = None;
        self.charts.clear();
        self.selected_chart = None;
        self.detail = None;
        self.editor_open = false;
        self.editing_chart = None;
        self.held_student = None;
        self.detail_epoch += 1;
        self.begin_charts_fetch()
    }

    /// Install the resolved teacher and deduplicated class list, selecting
    /// the first class. Returns the charts fetch to run for it, or `None`
    /// when there is no class (or the open was superseded).
    pub fn install_roster(
        &mut self,
        token: ChartsToken,
        teacher: Teacher,
        classes: Vec<ClassRef>,
    ) -> Option<(i64, ChartsToken)> {
        if token != ChartsToken(self.charts_epoch) {
            return None;
        }
        self.teacher = Some(teacher);
        self.classes = dedupe_classes(classes);
        self.selected_class = self.classes.first().map(|c| c.class_id);
        self.selected_class.map(|class_id| (class_id, token))
    }

    /// Switch the selected class. `None` when the id is not in the class
    /// list. Any in-flight chart or detail fetch becomes stale.
    pub fn select_class(&mut self, class_id: i64) -> Option<ChartsToken> {
        if !self.classes.iter().any(|c| c.class_id == class_id) {
            return None;
        }
        self.selected_class = Some(class_id);
        self.detail_epoch += 1;
        Some(self.begin_charts_fetch())
    }

    /// Switch the selected chart. `None` when the id is not in the current
    /// chart list.
    pub fn select_chart(&mut self, chart_id: i64) -> Option<DetailToken> {
        if !self.charts.iter().any(|c| c.id == chart_id) {
            return None;
        }
        self.selected_chart = Some(chart_id);
        Some(self.begin_detail_fetch())
    }

    pub fn begin_charts_fetch(&mut self) -> ChartsToken {
        self.charts_epoch += 1;
        ChartsToken(self.charts_epoch)
    }

    pub fn begin_detail_fetch(&mut self) -> DetailToken {
        self.detail_epoch += 1;
        DetailToken(self.detail_epoch)
    }

    /// Install a fetched chart list and reconcile the chart selection: keep
    /// the selected id if still present, else prefer the active chart, else
    /// the first; an empty list clears selection and detail.
    pub fn apply_charts(&mut self, token: ChartsToken, charts: Vec<SeatingChart>) -> ChartsOutcome {
        if token != ChartsToken(self.charts_epoch) {
            return ChartsOutcome::Stale;
        }
        self.charts = charts;

        let kept = self
            .selected_chart
            .filter(|id| self.charts.iter().any(|c| c.id == *id));
        self.selected_chart = kept
            .or_else(|| self.charts.iter().find(|c| c.is_active).map(|c| c.id))
            .or_else(|| self.charts.first().map(|c| c.id));

        match self.selected_chart {
            None => {
                self.detail = None;
                self.detail_epoch += 1;
                ChartsOutcome::Applied { detail_fetch: None }
            }
            Some(chart_id) => {
                let loaded = self.detail.as_ref().map(|d| d.chart.id) == Some(chart_id);
                let detail_fetch = if loaded {
                    None
                } else {
                    Some((chart_id, self.begin_detail_fetch()))
                };
                ChartsOutcome::Applied { detail_fetch }
            }
        }
    }

    /// Install a fetched chart detail. `false` means the fetch was stale and
    /// the payload was dropped.
    pub fn apply_detail(&mut self, token: DetailToken, detail: ChartDetail) -> bool {
        if token != DetailToken(self.detail_epoch) {
            return false;
        }
        self.detail = Some(detail);
        true
    }

    pub fn selected_class_name(&self) -> Option<&str> {
        let class_id = self.selected_class?;
        self.classes
            .iter()
            .find(|c| c.class_id == class_id)
            .map(|c| c.class_name.as_str())
    }

    /// Full view snapshot in the protocol's camelCase shape.
    pub fn snapshot(&self) -> serde_json::Value {
        json!({
            "teacher": self.teacher.as_ref().map(|t| json!({
                "id": t.id,
                "userId": t.user_id,
                "firstName": t.first_name,
                "lastName": t.last_name,
            })),
            "classes": self.classes.iter().map(|c| json!({
                "classId": c.class_id,
                "className": c.class_name,
            })).collect::<Vec<_>>(),
            "selectedClassId": self.selected_class,
            "charts": self.charts.iter().map(chart_json).collect::<Vec<_>>(),
            "selectedChartId": self.selected_chart,
            "chart": self.detail.as_ref().map(detail_json),
            "editorOpen": self.editor_open,
            "editingChartId": self.editing_chart,
            "heldStudentId": self.held_student,
        })
    }
}

fn chart_json(chart: &SeatingChart) -> serde_json::Value {
    json!({
        "id": chart.id,
        "name": chart.name,
        "layoutType": chart.layout_type,
        "rows": chart.rows,
        "columns": chart.columns,
        "roomName": chart.room_name,
        "isActive": chart.is_active,
        "assignedCount": chart.assigned_count,
        "totalStudents": chart.total_students,
    })
}

fn detail_json(detail: &ChartDetail) -> serde_json::Value {
    let mut value = chart_json(&detail.chart);
    value["assignments"] = detail
        .assignments
        .iter()
        .map(|a| {
            json!({
                "rowNum": a.row_num,
                "colNum": a.col_num,
                "studentId": a.student_id,
                "firstName": a.first_name,
                "lastName": a.last_name,
            })
        })
        .collect();
    value["unassignedStudents"] = detail
        .unassigned_students
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "firstName": s.first_name,
                "lastName": s.last_name,
            })
        })
        .collect();
    value
}

/// The subjects resource returns one row per subject taught; collapse to one
/// entry per class, first occurrence order.
fn dedupe_classes(rows: Vec<ClassRef>) -> Vec<ClassRef> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|c| seen.insert(c.class_id))
        .collect()
}
