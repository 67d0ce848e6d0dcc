use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ChartDetail, ClassRef, SeatingChart, Teacher};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint}: request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint}: upstream returned {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("{endpoint}: could not decode response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Chart mutations all POST to the same resource with an `action` tag.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChartAction {
    CreateChart {
        class_id: i64,
        name: String,
        room_name: String,
        rows: i64,
        columns: i64,
        layout_type: String,
    },
    AssignSeat {
        chart_id: i64,
        student_id: i64,
        row_num: i64,
        col_num: i64,
    },
    RemoveAssignment {
        chart_id: i64,
        student_id: i64,
    },
    AutoAssign {
        chart_id: i64,
    },
    Shuffle {
        chart_id: i64,
    },
}

#[derive(Debug, Serialize)]
pub struct ChartUpdate {
    pub name: String,
    pub room_name: String,
    pub rows: i64,
    pub columns: i64,
}

#[derive(Deserialize)]
struct TeachersEnvelope {
    #[serde(default)]
    teachers: Vec<Teacher>,
}

#[derive(Deserialize)]
struct ClassesEnvelope {
    #[serde(default)]
    teacher_classes: Vec<ClassRef>,
}

#[derive(Deserialize)]
struct ChartsEnvelope {
    #[serde(default)]
    charts: Vec<SeatingChart>,
}

#[derive(Deserialize)]
struct DetailEnvelope {
    chart: ChartDetail,
}

/// Typed client for the school-management HTTP API. Mutation response bodies
/// are opaque acknowledgements; callers resynchronize by refetching.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// First matching teacher row wins; `None` when the user has no teacher record.
    pub async fn teacher_for_user(&self, user_id: i64) -> Result<Option<Teacher>, ApiError> {
        let env: TeachersEnvelope = self
            .get_json("GET /teachers", "teachers", &[("user_id", user_id)])
            .await?;
        Ok(env.teachers.into_iter().next())
    }

    pub async fn classes_for_teacher(&self, teacher_id: i64) -> Result<Vec<ClassRef>, ApiError> {
        let env: ClassesEnvelope = self
            .get_json(
                "GET /teacher_subjects",
                "teacher_subjects",
                &[("teacher_id", teacher_id)],
            )
            .await?;
        Ok(env.teacher_classes)
    }

    pub async fn charts_for_class(&self, class_id: i64) -> Result<Vec<SeatingChart>, ApiError> {
        let env: ChartsEnvelope = self
            .get_json(
                "GET /seating_chart?class_id",
                "seating_chart",
                &[("class_id", class_id)],
            )
            .await?;
        Ok(env.charts)
    }

    pub async fn chart_detail(&self, chart_id: i64) -> Result<ChartDetail, ApiError> {
        let env: DetailEnvelope = self
            .get_json("GET /seating_chart?id", "seating_chart", &[("id", chart_id)])
            .await?;
        Ok(env.chart)
    }

    pub async fn post_action(&self, action: &ChartAction) -> Result<(), ApiError> {
        let endpoint = "POST /seating_chart";
        let resp = self
            .http
            .post(self.url("seating_chart"))
            .json(action)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        Self::check_status(endpoint, &resp)
    }

    pub async fn update_chart(&self, chart_id: i64, update: &ChartUpdate) -> Result<(), ApiError> {
        let endpoint = "PUT /seating_chart";
        let resp = self
            .http
            .put(self.url("seating_chart"))
            .query(&[("id", chart_id)])
            .json(update)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        Self::check_status(endpoint, &resp)
    }

    pub async fn delete_chart(&self, chart_id: i64) -> Result<(), ApiError> {
        let endpoint = "DELETE /seating_chart";
        let resp = self
            .http
            .delete(self.url("seating_chart"))
            .query(&[("id", chart_id)])
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        Self::check_status(endpoint, &resp)
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        resource: &str,
        query: &[(&str, i64)],
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .get(self.url(resource))
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        Self::check_status(endpoint, &resp)?;
        resp.json::<T>()
            .await
            .map_err(|source| ApiError::Decode { endpoint, source })
    }

    fn check_status(endpoint: &'static str, resp: &reqwest::Response) -> Result<(), ApiError> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status { endpoint, status })
        }
    }
}
