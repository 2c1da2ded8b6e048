//! Grouping of a flat roster into sections and teams.
//!
//! Both passes are linear over the ordered input and rely on equal keys being
//! contiguous. Under [`OrderingPolicy::Sorted`] the section pass establishes
//! that itself with a stable sort over a borrowed view of the records; under
//! [`OrderingPolicy::TrustInput`] the caller's order is used as given and the
//! groups are simply the contiguous runs found in it. The team-only pass
//! always sorts by team first.
//!
//! Records that arrive without a section carry [`DEFAULT_SECTION`]; they are
//! filed under the partitioner's configured default section label.

use crate::domain::model::{RosterStats, SectionGroup, StudentRecord, TeamGroup, DEFAULT_SECTION};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Stable sort by section then team before grouping.
    #[default]
    Sorted,
    /// Group the input as given. A team whose members are not adjacent is
    /// split into several groups. Only affects [`RosterPartitioner::partition`].
    TrustInput,
}

#[derive(Debug, Clone)]
pub struct RosterPartitioner {
    default_section: String,
    ordering: OrderingPolicy,
}

impl Default for RosterPartitioner {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterPartitioner {
    pub fn new() -> Self {
        Self {
            default_section: DEFAULT_SECTION.to_string(),
            ordering: OrderingPolicy::Sorted,
        }
    }

    pub fn with_default_section(mut self, label: impl Into<String>) -> Self {
        self.default_section = label.into();
        self
    }

    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn default_section(&self) -> &str {
        &self.default_section
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    pub fn is_default_section(&self, section: &str) -> bool {
        section == self.default_section || section == DEFAULT_SECTION
    }

    /// Section a student is grouped under.
    pub fn section_of<'a>(&'a self, student: &'a StudentRecord) -> &'a str {
        if student.section == DEFAULT_SECTION {
            &self.default_section
        } else {
            &student.section
        }
    }

    fn placed(&self, student: &StudentRecord) -> StudentRecord {
        let mut placed = student.clone();
        if placed.section == DEFAULT_SECTION {
            placed.section = self.default_section.clone();
        }
        placed
    }

    fn cmp_by_section_and_team(&self, a: &StudentRecord, b: &StudentRecord) -> Ordering {
        self.section_of(a)
            .cmp(self.section_of(b))
            .then_with(|| a.team.cmp(&b.team))
    }

    /// Groups students into sections, each holding its teams.
    ///
    /// When `stats` is given, its counters are incremented for every student,
    /// every unregistered student, every team opened and every section closed
    /// whose name is not the default section label. Empty input leaves `stats`
    /// untouched and returns no sections.
    pub fn partition(
        &self,
        students: &[StudentRecord],
        mut stats: Option<&mut RosterStats>,
    ) -> Vec<SectionGroup> {
        let mut sections = Vec::new();
        let mut current: Option<SectionGroup> = None;

        let mut view: Vec<&StudentRecord> = students.iter().collect();
        if self.ordering == OrderingPolicy::Sorted {
            view.sort_by(|a, b| self.cmp_by_section_and_team(a, b));
        }

        for student in view {
            let student = self.placed(student);
            if let Some(stats) = stats.as_deref_mut() {
                stats.students_total += 1;
                if !student.registered() {
                    stats.unregistered_total += 1;
                }
            }

            let opened_team = match current.as_mut() {
                Some(section) if section.name == student.section => {
                    match section.teams.last_mut() {
                        Some(team) if team.name == student.team => {
                            team.members.push(student);
                            false
                        }
                        _ => {
                            section.teams.push(TeamGroup::new(student));
                            true
                        }
                    }
                }
                _ => {
                    if let Some(closed) = current.take() {
                        self.close_section(closed, &mut sections, stats.as_deref_mut());
                    }
                    current = Some(SectionGroup::new(student));
                    true
                }
            };

            if opened_team {
                if let Some(stats) = stats.as_deref_mut() {
                    stats.teams_total += 1;
                }
            }
        }

        if let Some(closed) = current {
            self.close_section(closed, &mut sections, stats);
        }

        tracing::trace!(
            "Partitioned {} students into {} sections",
            students.len(),
            sections.len()
        );
        sections
    }

    fn close_section(
        &self,
        section: SectionGroup,
        sections: &mut Vec<SectionGroup>,
        stats: Option<&mut RosterStats>,
    ) {
        if let Some(stats) = stats {
            if !self.is_default_section(&section.name) {
                stats.sections_total += 1;
            }
        }
        sections.push(section);
    }

    /// Groups students into teams, ignoring section boundaries. The input is
    /// stably sorted by team whatever the ordering policy.
    pub fn partition_by_team(&self, students: &[StudentRecord]) -> Vec<TeamGroup> {
        let mut view: Vec<&StudentRecord> = students.iter().collect();
        view.sort_by(|a, b| a.team.cmp(&b.team));

        let mut teams: Vec<TeamGroup> = Vec::new();
        for student in view {
            let student = self.placed(student);
            match teams.last_mut() {
                Some(team) if team.name == student.team => team.members.push(student),
                _ => teams.push(TeamGroup::new(student)),
            }
        }

        teams
    }

    /// Distinct section names other than the default section, ascending.
    pub fn section_names(&self, students: &[StudentRecord]) -> Vec<String> {
        students
            .iter()
            .map(|s| self.section_of(s))
            .filter(|section| !self.is_default_section(section))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
