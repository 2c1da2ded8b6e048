use crate::domain::model::{Course, StudentRecord};
use crate::domain::ports::EnrollmentStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// JSON fixture of courses and students, keyed by arbitrary entry names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataBundle {
    #[serde(default)]
    pub courses: BTreeMap<String, Course>,
    #[serde(default)]
    pub students: BTreeMap<String, StudentRecord>,
}

impl DataBundle {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&content)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryEnrollmentStore {
    courses: BTreeMap<String, Course>,
    students: Vec<StudentRecord>,
}

impl InMemoryEnrollmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bundle(bundle: DataBundle) -> Self {
        let mut store = Self::new();
        for course in bundle.courses.into_values() {
            store.add_course(course);
        }
        for student in bundle.students.into_values() {
            store.add_student(student);
        }
        tracing::debug!(
            "Loaded {} courses and {} students into memory",
            store.courses.len(),
            store.students.len()
        );
        store
    }

    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_bundle(DataBundle::from_file(path).await?))
    }

    pub fn add_course(&mut self, course: Course) {
        self.courses.insert(course.id.clone(), course);
    }

    pub fn add_student(&mut self, student: StudentRecord) {
        self.students.push(student);
    }
}

#[async_trait]
impl EnrollmentStore for InMemoryEnrollmentStore {
    async fn get_course(&self, course_id: &str) -> Result<Option<Course>> {
        Ok(self.courses.get(course_id).cloned())
    }

    async fn get_students_for_course(&self, course_id: &str) -> Result<Vec<StudentRecord>> {
        let mut students: Vec<StudentRecord> = self
            .students
            .iter()
            .filter(|s| s.course == course_id)
            .cloned()
            .collect();
        students.sort_by(|a, b| a.canonical_cmp(b));
        Ok(students)
    }
}
