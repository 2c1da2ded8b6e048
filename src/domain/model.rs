use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Section label given to students who were never assigned a section.
pub const DEFAULT_SECTION: &str = "None";

pub const STATUS_JOINED: &str = "Joined";
pub const STATUS_YET_TO_JOIN: &str = "Yet to join";

fn default_section() -> String {
    DEFAULT_SECTION.to_string()
}

/// One enrollment of a student in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub course: String,
    #[serde(default = "default_section")]
    pub section: String,
    pub team: String,
    pub name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
}

impl StudentRecord {
    /// A student is registered once a Google account is linked to the enrollment.
    pub fn registered(&self) -> bool {
        self.google_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn status(&self) -> &'static str {
        if self.registered() {
            STATUS_JOINED
        } else {
            STATUS_YET_TO_JOIN
        }
    }

    /// Ordering used by the partitioner: section, then team.
    pub fn cmp_by_section_and_team(&self, other: &Self) -> Ordering {
        self.section
            .cmp(&other.section)
            .then_with(|| self.team.cmp(&other.team))
    }

    /// Canonical roster order exposed by enrollment stores.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.cmp_by_section_and_team(other)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.email.cmp(&other.email))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamGroup {
    pub name: String,
    pub members: Vec<StudentRecord>,
}

impl TeamGroup {
    pub fn new(first: StudentRecord) -> Self {
        Self {
            name: first.team.clone(),
            members: vec![first],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionGroup {
    pub name: String,
    pub teams: Vec<TeamGroup>,
}

impl SectionGroup {
    pub fn new(first: StudentRecord) -> Self {
        Self {
            name: first.section.clone(),
            teams: vec![TeamGroup::new(first)],
        }
    }

    pub fn student_count(&self) -> usize {
        self.teams.iter().map(|t| t.members.len()).sum()
    }

    pub fn students(&self) -> impl Iterator<Item = &StudentRecord> {
        self.teams.iter().flat_map(|t| t.members.iter())
    }
}

/// Running totals collected during one partitioning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterStats {
    pub students_total: usize,
    pub unregistered_total: usize,
    pub teams_total: usize,
    pub sections_total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseDetails {
    pub course: Course,
    pub stats: RosterStats,
    pub sections: Vec<SectionGroup>,
}

/// Output of the transform phase of a roster export.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub details: CourseDetails,
    pub csv_output: String,
    pub summary_json: Option<String>,
}
