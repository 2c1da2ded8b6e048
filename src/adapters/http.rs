use crate::domain::model::{Course, StudentRecord};
use crate::domain::ports::EnrollmentStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Enrollment store backed by a JSON HTTP API.
///
/// Expects `GET {base}/courses/{id}` to return a course (404 when absent) and
/// `GET {base}/courses/{id}/students` to return an array of student records.
#[derive(Debug, Clone)]
pub struct HttpEnrollmentStore {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpEnrollmentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Making API request to: {}", url);
        let request = self.client.get(url);
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }
}

#[async_trait]
impl EnrollmentStore for HttpEnrollmentStore {
    async fn get_course(&self, course_id: &str) -> Result<Option<Course>> {
        let response = self.get(&format!("/courses/{}", course_id)).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let course = response.error_for_status()?.json::<Course>().await?;
        Ok(Some(course))
    }

    async fn get_students_for_course(&self, course_id: &str) -> Result<Vec<StudentRecord>> {
        let response = self
            .get(&format!("/courses/{}/students", course_id))
            .send()
            .await?;
        tracing::debug!("API response status: {}", response.status());

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let mut students = response
            .error_for_status()?
            .json::<Vec<StudentRecord>>()
            .await?;
        students.sort_by(|a, b| a.canonical_cmp(b));
        Ok(students)
    }
}
