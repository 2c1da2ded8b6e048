use crate::domain::model::CourseDetails;
use crate::utils::error::{Result, RosterError};
use csv::{QuoteStyle, WriterBuilder};
use regex::Regex;
use std::sync::LazyLock;

static EXTRA_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Trims and collapses runs of whitespace into a single space.
pub fn remove_extra_space(value: &str) -> String {
    EXTRA_SPACE.replace_all(value.trim(), " ").into_owned()
}

fn write_rows(rows: &[Vec<String>]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RosterError::ProcessingError {
            message: format!("Failed to flush CSV writer: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| RosterError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// Renders the instructor-facing student list of a course.
///
/// Layout: a course preamble, two blank lines, then one row per student in
/// section, team, member order. The section column is emitted only when
/// `has_sections` is set.
pub fn student_list_csv(details: &CourseDetails, has_sections: bool) -> Result<String> {
    let preamble = write_rows(&[
        vec!["Course ID".to_string(), details.course.id.clone()],
        vec!["Course Name".to_string(), details.course.name.clone()],
    ])?;

    let mut header = Vec::with_capacity(6);
    if has_sections {
        header.push("Section".to_string());
    }
    header.extend(
        ["Team", "Full Name", "Last Name", "Status", "Email"]
            .iter()
            .map(|h| h.to_string()),
    );

    let mut rows = vec![header];
    for section in &details.sections {
        for team in &section.teams {
            for student in &team.members {
                let mut row = Vec::with_capacity(6);
                if has_sections {
                    row.push(section.name.clone());
                }
                row.push(team.name.clone());
                row.push(remove_extra_space(&student.name));
                row.push(remove_extra_space(&student.last_name));
                row.push(student.status().to_string());
                row.push(student.email.clone());
                rows.push(row);
            }
        }
    }
    let table = write_rows(&rows)?;

    tracing::debug!("Rendered CSV roster with {} student rows", rows.len() - 1);
    Ok(format!("{}\n\n{}", preamble, table))
}
