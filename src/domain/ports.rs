use crate::domain::model::{Course, ExportBundle, StudentRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Read access to courses and their enrollments.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn get_course(&self, course_id: &str) -> Result<Option<Course>>;

    /// All students of a course, in canonical roster order.
    async fn get_students_for_course(&self, course_id: &str) -> Result<Vec<StudentRecord>>;
}

#[async_trait]
impl<T: EnrollmentStore + ?Sized> EnrollmentStore for std::sync::Arc<T> {
    async fn get_course(&self, course_id: &str) -> Result<Option<Course>> {
        (**self).get_course(course_id).await
    }

    async fn get_students_for_course(&self, course_id: &str) -> Result<Vec<StudentRecord>> {
        (**self).get_students_for_course(course_id).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn course_id(&self) -> &str;
    fn output_path(&self) -> &str;
    fn archive_name(&self) -> String {
        format!("{}_roster.zip", self.course_id())
    }
    fn include_summary(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<StudentRecord>>;
    async fn transform(&self, students: Vec<StudentRecord>) -> Result<ExportBundle>;
    async fn load(&self, bundle: ExportBundle) -> Result<String>;
}
