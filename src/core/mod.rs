pub mod courses;
pub mod engine;
pub mod export;
pub mod partition;
pub mod pipeline;

pub use crate::domain::model::{
    Course, CourseDetails, ExportBundle, RosterStats, SectionGroup, StudentRecord, TeamGroup,
};
pub use crate::domain::ports::{ConfigProvider, EnrollmentStore, Pipeline, Storage};
pub use crate::utils::error::Result;
