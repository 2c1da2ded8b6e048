use crate::core::export;
use crate::core::partition::RosterPartitioner;
use crate::domain::model::{
    Course, CourseDetails, RosterStats, SectionGroup, StudentRecord, TeamGroup,
};
use crate::domain::ports::EnrollmentStore;
use crate::utils::error::{Result, RosterError};
use std::collections::HashSet;

/// Course-level roster queries on top of an [`EnrollmentStore`].
pub struct CourseService<S: EnrollmentStore> {
    store: S,
    partitioner: RosterPartitioner,
}

impl<S: EnrollmentStore> CourseService<S> {
    pub fn new(store: S) -> Self {
        Self::with_partitioner(store, RosterPartitioner::new())
    }

    pub fn with_partitioner(store: S, partitioner: RosterPartitioner) -> Self {
        Self { store, partitioner }
    }

    pub fn partitioner(&self) -> &RosterPartitioner {
        &self.partitioner
    }

    pub async fn get_course(&self, course_id: &str) -> Result<Option<Course>> {
        self.store.get_course(course_id).await
    }

    pub async fn is_course_present(&self, course_id: &str) -> Result<bool> {
        Ok(self.get_course(course_id).await?.is_some())
    }

    pub async fn verify_course_is_present(&self, course_id: &str) -> Result<Course> {
        self.get_course(course_id)
            .await?
            .ok_or_else(|| RosterError::not_found("Course", course_id))
    }

    /// The course and its students, failing with `NotFound` for an unknown course.
    pub async fn get_course_roster(&self, course_id: &str) -> Result<(Course, Vec<StudentRecord>)> {
        let course = self.verify_course_is_present(course_id).await?;
        let students = self.store.get_students_for_course(course_id).await?;
        Ok((course, students))
    }

    async fn students(&self, course_id: &str) -> Result<Vec<StudentRecord>> {
        Ok(self.get_course_roster(course_id).await?.1)
    }

    pub async fn get_section_names_for_course(&self, course_id: &str) -> Result<Vec<String>> {
        let students = self.students(course_id).await?;
        Ok(self.partitioner.section_names(&students))
    }

    /// Teams of a single section. A section without students has no teams.
    pub async fn get_section_for_course(
        &self,
        section: &str,
        course_id: &str,
    ) -> Result<SectionGroup> {
        let students: Vec<StudentRecord> = self
            .students(course_id)
            .await?
            .into_iter()
            .filter(|s| self.partitioner.section_of(s) == section)
            .collect();

        Ok(SectionGroup {
            name: section.to_string(),
            teams: self.partitioner.partition_by_team(&students),
        })
    }

    pub async fn get_sections_for_course(&self, course_id: &str) -> Result<CourseDetails> {
        let (course, students) = self.get_course_roster(course_id).await?;
        Ok(self.partition_course(course, &students))
    }

    /// Partitions an already fetched roster and collects its stats.
    pub fn partition_course(&self, course: Course, students: &[StudentRecord]) -> CourseDetails {
        let mut stats = RosterStats::default();
        let sections = self.partitioner.partition(students, Some(&mut stats));

        tracing::debug!(
            "Course {}: {} students, {} unregistered, {} teams, {} sections",
            course.id,
            stats.students_total,
            stats.unregistered_total,
            stats.teams_total,
            stats.sections_total
        );

        CourseDetails {
            course,
            stats,
            sections,
        }
    }

    pub async fn get_sections_for_course_without_stats(
        &self,
        course_id: &str,
    ) -> Result<Vec<SectionGroup>> {
        let students = self.students(course_id).await?;
        Ok(self.partitioner.partition(&students, None))
    }

    pub async fn get_teams_for_course(&self, course_id: &str) -> Result<Vec<TeamGroup>> {
        let students = self.students(course_id).await?;
        Ok(self.partitioner.partition_by_team(&students))
    }

    pub async fn get_number_of_sections(&self, course_id: &str) -> Result<usize> {
        Ok(self.get_section_names_for_course(course_id).await?.len())
    }

    pub async fn get_number_of_teams(&self, course_id: &str) -> Result<usize> {
        let students = self.students(course_id).await?;
        let teams: HashSet<&str> = students.iter().map(|s| s.team.as_str()).collect();
        Ok(teams.len())
    }

    pub async fn get_total_enrolled_in_course(&self, course_id: &str) -> Result<usize> {
        Ok(self.students(course_id).await?.len())
    }

    pub async fn get_total_unregistered_in_course(&self, course_id: &str) -> Result<usize> {
        let students = self.students(course_id).await?;
        Ok(students.iter().filter(|s| !s.registered()).count())
    }

    pub async fn has_indicated_sections(&self, course_id: &str) -> Result<bool> {
        let students = self.students(course_id).await?;
        Ok(!self.partitioner.section_names(&students).is_empty())
    }

    pub async fn get_course_student_list_as_csv(&self, course_id: &str) -> Result<String> {
        let details = self.get_sections_for_course(course_id).await?;
        let has_sections = details
            .sections
            .iter()
            .any(|s| !self.partitioner.is_default_section(&s.name));
        export::student_list_csv(&details, has_sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryEnrollmentStore;
    use crate::core::partition::OrderingPolicy;
    use crate::domain::model::DEFAULT_SECTION;

    fn student(section: &str, team: &str, name: &str, google_id: Option<&str>) -> StudentRecord {
        StudentRecord {
            course: "CS101".to_string(),
            section: section.to_string(),
            team: team.to_string(),
            name: name.to_string(),
            last_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            google_id: google_id.map(str::to_string),
        }
    }

    fn service() -> CourseService<InMemoryEnrollmentStore> {
        let mut store = InMemoryEnrollmentStore::new();
        store.add_course(Course {
            id: "CS101".to_string(),
            name: "Programming Methodology".to_string(),
            archived: false,
        });
        store.add_course(Course {
            id: "EMPTY".to_string(),
            name: "Empty Course".to_string(),
            archived: false,
        });
        store.add_student(student("Tut 1", "Team A", "Ann", Some("ann.g")));
        store.add_student(student("Tut 1", "Team A", "Ben", None));
        store.add_student(student("Tut 1", "Team B", "Cat", Some("cat.g")));
        store.add_student(student("Tut 2", "Team C", "Dan", Some("")));
        store.add_student(student(DEFAULT_SECTION, "Team A", "Eve", Some("eve.g")));
        CourseService::new(store)
    }

    #[tokio::test]
    async fn test_unknown_course_is_not_found() {
        let service = service();

        assert!(!service.is_course_present("NOPE").await.unwrap());
        let err = service.get_sections_for_course("NOPE").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(service.get_teams_for_course("NOPE").await.unwrap_err().is_not_found());
        assert!(service
            .get_course_student_list_as_csv("NOPE")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_sections_with_stats() {
        let details = service().get_sections_for_course("CS101").await.unwrap();

        let names: Vec<&str> = details.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![DEFAULT_SECTION, "Tut 1", "Tut 2"]);
        assert_eq!(details.stats.students_total, 5);
        assert_eq!(details.stats.unregistered_total, 2);
        assert_eq!(details.stats.teams_total, 4);
        assert_eq!(details.stats.sections_total, 2);
    }

    #[tokio::test]
    async fn test_section_names_and_counts() {
        let service = service();

        assert_eq!(
            service.get_section_names_for_course("CS101").await.unwrap(),
            vec!["Tut 1", "Tut 2"]
        );
        assert_eq!(service.get_number_of_sections("CS101").await.unwrap(), 2);
        // "Team A" appears in two sections but is one team name
        assert_eq!(service.get_number_of_teams("CS101").await.unwrap(), 3);
        assert_eq!(service.get_total_enrolled_in_course("CS101").await.unwrap(), 5);
        assert_eq!(service.get_total_unregistered_in_course("CS101").await.unwrap(), 2);
        assert!(service.has_indicated_sections("CS101").await.unwrap());
        assert!(!service.has_indicated_sections("EMPTY").await.unwrap());
    }

    #[tokio::test]
    async fn test_single_section_and_teams() {
        let service = service();

        let section = service.get_section_for_course("Tut 1", "CS101").await.unwrap();
        assert_eq!(section.name, "Tut 1");
        assert_eq!(section.teams.len(), 2);
        assert_eq!(section.teams[0].members.len(), 2);

        let missing = service.get_section_for_course("Tut 9", "CS101").await.unwrap();
        assert!(missing.teams.is_empty());

        let teams = service.get_teams_for_course("CS101").await.unwrap();
        let shape: Vec<(&str, usize)> = teams
            .iter()
            .map(|t| (t.name.as_str(), t.members.len()))
            .collect();
        assert_eq!(shape, vec![("Team A", 3), ("Team B", 1), ("Team C", 1)]);
    }

    #[tokio::test]
    async fn test_empty_course_has_no_sections() {
        let service = service();

        let details = service.get_sections_for_course("EMPTY").await.unwrap();
        assert!(details.sections.is_empty());
        assert_eq!(details.stats, RosterStats::default());
        assert!(service
            .get_sections_for_course_without_stats("EMPTY")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_students_without_section_use_configured_label() {
        let bundle = crate::adapters::memory::DataBundle::from_json_str(
            r#"{
                "courses": { "c": { "id": "CS101", "name": "Programming" } },
                "students": {
                    "a": { "course": "CS101", "team": "T", "name": "Ann", "email": "a@example.com" },
                    "b": { "course": "CS101", "section": "1", "team": "U", "name": "Ben", "email": "b@example.com" }
                }
            }"#,
        )
        .unwrap();
        let partitioner = RosterPartitioner::new().with_default_section("unsectioned");
        let store = InMemoryEnrollmentStore::from_bundle(bundle);
        let service = CourseService::with_partitioner(store, partitioner);

        let details = service.get_sections_for_course("CS101").await.unwrap();
        let names: Vec<&str> = details.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["1", "unsectioned"]);
        assert_eq!(details.stats.sections_total, 1);
        assert_eq!(details.sections[1].teams[0].members[0].section, "unsectioned");

        assert_eq!(service.get_section_names_for_course("CS101").await.unwrap(), vec!["1"]);
        assert_eq!(service.get_number_of_sections("CS101").await.unwrap(), 1);

        let unsectioned = service
            .get_section_for_course("unsectioned", "CS101")
            .await
            .unwrap();
        assert_eq!(unsectioned.teams.len(), 1);
        assert_eq!(unsectioned.teams[0].members[0].name, "Ann");
    }

    #[tokio::test]
    async fn test_teams_merge_across_sections_when_trusting_input() {
        let mut store = InMemoryEnrollmentStore::new();
        store.add_course(Course {
            id: "CS101".to_string(),
            name: "Programming".to_string(),
            archived: false,
        });
        store.add_student(student("Tut 1", "Team A", "Ann", None));
        store.add_student(student("Tut 1", "Team B", "Ben", None));
        store.add_student(student("Tut 2", "Team A", "Cat", None));
        let partitioner = RosterPartitioner::new().with_ordering(OrderingPolicy::TrustInput);
        let service = CourseService::with_partitioner(store, partitioner);

        let teams = service.get_teams_for_course("CS101").await.unwrap();

        let shape: Vec<(&str, usize)> = teams
            .iter()
            .map(|t| (t.name.as_str(), t.members.len()))
            .collect();
        assert_eq!(shape, vec![("Team A", 2), ("Team B", 1)]);
    }
}
