use course_roster::{
    OrderingPolicy, RosterPartitioner, RosterStats, SectionGroup, StudentRecord, DEFAULT_SECTION,
};
use std::collections::BTreeSet;

fn student(section: &str, team: &str, name: &str, registered: bool) -> StudentRecord {
    StudentRecord {
        course: "CS2103".to_string(),
        section: section.to_string(),
        team: team.to_string(),
        name: name.to_string(),
        last_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        google_id: registered.then(|| format!("{}.google", name.to_lowercase())),
    }
}

/// A roster already in section, team order, with the default section present.
fn sorted_roster() -> Vec<StudentRecord> {
    let mut roster = vec![
        student("Lab 01", "Alpha", "Aaron", true),
        student("Lab 01", "Alpha", "Bella", false),
        student("Lab 01", "Bravo", "Chen", true),
        student("Lab 02", "Alpha", "Devi", true),
        student("Lab 02", "Charlie", "Eko", false),
        student("Lab 02", "Charlie", "Fatimah", false),
        student(DEFAULT_SECTION, "Delta", "Gwen", true),
        student(DEFAULT_SECTION, "Echo", "Hiro", true),
    ];
    roster.sort_by(|a, b| a.cmp_by_section_and_team(b));
    roster
}

fn flatten(sections: &[SectionGroup]) -> Vec<StudentRecord> {
    sections
        .iter()
        .flat_map(|s| s.teams.iter())
        .flat_map(|t| t.members.iter().cloned())
        .collect()
}

fn contiguous_team_runs(students: &[StudentRecord]) -> usize {
    students
        .iter()
        .enumerate()
        .filter(|(i, s)| {
            *i == 0 || {
                let prev = &students[i - 1];
                prev.team != s.team || prev.section != s.section
            }
        })
        .count()
}

#[test]
fn test_flattened_output_equals_sorted_input() {
    let roster = sorted_roster();

    let sections = RosterPartitioner::new().partition(&roster, None);

    assert_eq!(flatten(&sections), roster);
}

#[test]
fn test_group_membership_matches_labels() {
    let roster = sorted_roster();

    let sections = RosterPartitioner::new().partition(&roster, None);

    for section in &sections {
        assert!(!section.teams.is_empty());
        for team in &section.teams {
            assert!(!team.members.is_empty());
            assert!(team.members.iter().all(|m| m.section == section.name));
            assert!(team.members.iter().all(|m| m.team == team.name));
        }
    }
}

#[test]
fn test_counters_match_roster() {
    let roster = sorted_roster();
    let mut stats = RosterStats::default();

    RosterPartitioner::new().partition(&roster, Some(&mut stats));

    let distinct_sections: BTreeSet<&str> = roster.iter().map(|s| s.section.as_str()).collect();
    let expected_sections =
        distinct_sections.len() - usize::from(distinct_sections.contains(DEFAULT_SECTION));

    assert_eq!(stats.students_total, roster.len());
    assert_eq!(stats.unregistered_total, 3);
    assert_eq!(stats.teams_total, contiguous_team_runs(&roster));
    assert_eq!(stats.sections_total, expected_sections);
    assert_eq!(stats.sections_total, 2);
}

#[test]
fn test_stats_accumulate_across_passes() {
    let roster = sorted_roster();
    let mut stats = RosterStats::default();
    let partitioner = RosterPartitioner::new();

    let first = partitioner.partition(&roster, Some(&mut stats));
    let second = partitioner.partition(&roster, Some(&mut stats));

    assert_eq!(first, second);
    assert_eq!(stats.students_total, 2 * roster.len());
}

#[test]
fn test_documented_four_student_scenario() {
    let roster = vec![
        student("1", "A", "Ann", true),
        student("1", "A", "Ben", false),
        student("1", "B", "Cal", true),
        student("2", "C", "Dee", true),
    ];
    let mut stats = RosterStats::default();

    let sections = RosterPartitioner::new().partition(&roster, Some(&mut stats));

    let shape: Vec<(String, Vec<(String, usize)>)> = sections
        .iter()
        .map(|s| {
            (
                s.name.clone(),
                s.teams.iter().map(|t| (t.name.clone(), t.members.len())).collect(),
            )
        })
        .collect();
    assert_eq!(
        shape,
        vec![
            ("1".to_string(), vec![("A".to_string(), 2), ("B".to_string(), 1)]),
            ("2".to_string(), vec![("C".to_string(), 1)]),
        ]
    );
    assert_eq!(
        stats,
        RosterStats {
            students_total: 4,
            unregistered_total: 1,
            teams_total: 3,
            sections_total: 2,
        }
    );
}

#[test]
fn test_reserved_label_scenario() {
    let roster = vec![
        student("unsectioned", "T1", "Ann", true),
        student("unsectioned", "T1", "Ben", true),
        student("1", "T2", "Cal", true),
    ];

    for ordering in [OrderingPolicy::Sorted, OrderingPolicy::TrustInput] {
        let mut stats = RosterStats::default();
        let partitioner = RosterPartitioner::new()
            .with_default_section("unsectioned")
            .with_ordering(ordering);

        let sections = partitioner.partition(&roster, Some(&mut stats));

        assert_eq!(stats.sections_total, 1);
        let reserved = sections
            .iter()
            .find(|s| s.name == "unsectioned")
            .expect("reserved section still forms a group");
        assert_eq!(reserved.teams.len(), 1);
        assert_eq!(reserved.teams[0].members.len(), 2);
    }
}

#[test]
fn test_empty_roster() {
    let mut stats = RosterStats::default();

    let sections = RosterPartitioner::new().partition(&[], Some(&mut stats));

    assert!(sections.is_empty());
    assert_eq!(stats, RosterStats::default());
}

#[test]
fn test_labels_order_by_case_sensitive_ordinal() {
    let roster = vec![
        student("b", "y", "Ann", true),
        student("a", "x", "Ben", true),
        student("B", "Y", "Cal", true),
        student("b", "Y", "Dee", true),
        student("b", "y", "Eve", true),
    ];

    let sections = RosterPartitioner::new().partition(&roster, None);

    let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["B", "a", "b"]);
    let teams_in_b: Vec<&str> = sections[2].teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(teams_in_b, vec!["Y", "y"]);
    assert_eq!(sections[2].teams[1].members.len(), 2);

    let teams = RosterPartitioner::new().partition_by_team(&roster);
    let team_names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(team_names, vec!["Y", "x", "y"]);
}
