use crate::core::courses::CourseService;
use crate::core::export;
use crate::core::partition::RosterPartitioner;
use crate::domain::model::{Course, CourseDetails, ExportBundle, StudentRecord};
use crate::domain::ports::{ConfigProvider, EnrollmentStore, Pipeline, Storage};
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;
use std::sync::OnceLock;
use zip::write::{FileOptions, ZipWriter};

pub const ROSTER_CSV: &str = "roster.csv";
pub const SUMMARY_JSON: &str = "summary.json";

#[derive(Serialize)]
struct Summary<'a> {
    generated_at: String,
    #[serde(flatten)]
    details: &'a CourseDetails,
    section_names: Vec<String>,
}

/// Exports one course roster: fetch, partition, then archive as zip.
pub struct RosterExportPipeline<S: Storage, E: EnrollmentStore, C: ConfigProvider> {
    storage: S,
    courses: CourseService<E>,
    config: C,
    // fetched once during extract
    course: OnceLock<Course>,
}

impl<S: Storage, E: EnrollmentStore, C: ConfigProvider> RosterExportPipeline<S, E, C> {
    pub fn new(storage: S, store: E, partitioner: RosterPartitioner, config: C) -> Self {
        Self {
            storage,
            courses: CourseService::with_partitioner(store, partitioner),
            config,
            course: OnceLock::new(),
        }
    }

    fn partitioner(&self) -> &RosterPartitioner {
        self.courses.partitioner()
    }

    async fn course(&self) -> Result<Course> {
        match self.course.get() {
            Some(course) => Ok(course.clone()),
            None => {
                self.courses
                    .verify_course_is_present(self.config.course_id())
                    .await
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, E: EnrollmentStore, C: ConfigProvider> Pipeline for RosterExportPipeline<S, E, C> {
    async fn extract(&self) -> Result<Vec<StudentRecord>> {
        let course_id = self.config.course_id();
        let (course, students) = self.courses.get_course_roster(course_id).await?;
        let _ = self.course.set(course);

        if students.is_empty() {
            tracing::warn!("Course {} has no enrolled students", course_id);
        }
        Ok(students)
    }

    async fn transform(&self, students: Vec<StudentRecord>) -> Result<ExportBundle> {
        let course = self.course().await?;
        let details = self.courses.partition_course(course, &students);
        let section_names = self.partitioner().section_names(&students);

        let csv_output = export::student_list_csv(&details, !section_names.is_empty())?;

        let summary_json = if self.config.include_summary() {
            let summary = Summary {
                generated_at: chrono::Utc::now().to_rfc3339(),
                details: &details,
                section_names,
            };
            Some(serde_json::to_string_pretty(&summary)?)
        } else {
            None
        };

        Ok(ExportBundle {
            details,
            csv_output,
            summary_json,
        })
    }

    async fn load(&self, bundle: ExportBundle) -> Result<String> {
        let archive_name = self.config.archive_name();
        let output_path = format!("{}/{}", self.config.output_path(), archive_name);

        tracing::debug!(
            "Creating ZIP file with {} files",
            1 + usize::from(bundle.summary_json.is_some())
        );

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>(ROSTER_CSV, FileOptions::default())?;
            zip.write_all(bundle.csv_output.as_bytes())?;

            if let Some(summary) = &bundle.summary_json {
                zip.start_file::<_, ()>(SUMMARY_JSON, FileOptions::default())?;
                zip.write_all(summary.as_bytes())?;
            }

            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&archive_name, &zip_data).await?;

        Ok(output_path)
    }
}
