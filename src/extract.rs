//! Pure transformations from raw upstream payloads to flat records ready for
//! persistence. No I/O here; fallback policy for missing fields lives in the
//! named defaults below rather than inline at each call site.

use crate::sources::dto::{RawClass, RawCourseReview, RawEnrollGroup, RawMeeting, RawRating, RawSection};

/// Marker stored when a meeting resolves no instructors at all.
pub const UNKNOWN_INSTRUCTORS: &str = "Unknown";

/// Credit count stored when the enrollment group carries no minimum units.
pub const DEFAULT_CREDIT: i64 = 0;

/// Flat, source-independent representation of one roster class.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRecord {
    pub term: String,
    pub subject: String,
    pub number: String,
    pub title: String,
    pub description: String,
    pub credit: i64,
    pub grading_basis: String,
    pub meeting_days: Option<String>,
    pub meeting_time: Option<String>,
    pub meeting_location: Option<String>,
    pub instructors: String,
}

impl CourseRecord {
    pub fn code(&self) -> String {
        format!("{} {}", self.subject, self.number)
    }
}

/// Flatten one roster class into a [`CourseRecord`].
///
/// Tie-breaks mirror the roster's nesting: the first enrollment group wins,
/// a LEC section is preferred over the first section of any type, and the
/// first meeting carrying a schedule pattern or start/end time is preferred
/// over the first meeting of any kind.
pub fn course_record(raw: &RawClass, term: &str, subject: &str, number: &str) -> CourseRecord {
    let group = raw.enroll_groups.first();
    let section = group.and_then(pick_section);
    let meeting = section.and_then(pick_meeting);

    let credit = group
        .and_then(|g| g.units_minimum)
        .map(|units| units as i64)
        .unwrap_or(DEFAULT_CREDIT);

    let grading_basis = group
        .and_then(|g| g.grading_basis_short.clone())
        .unwrap_or_default();

    let meeting_days = meeting
        .and_then(|m| m.pattern.clone())
        .filter(|p| !p.is_empty());

    let meeting_time = meeting.and_then(|m| {
        let start = m.time_start.as_deref().unwrap_or("");
        let end = m.time_end.as_deref().unwrap_or("");
        if start.is_empty() && end.is_empty() {
            None
        } else {
            Some(format!("{}-{}", start, end))
        }
    });

    let meeting_location = meeting.and_then(|m| {
        m.location_descr
            .clone()
            .filter(|l| !l.is_empty())
            .or_else(|| m.facility_descr.clone().filter(|l| !l.is_empty()))
    });

    let instructors = meeting
        .map(instructor_line)
        .unwrap_or_else(|| UNKNOWN_INSTRUCTORS.to_string());

    CourseRecord {
        term: term.trim().to_string(),
        subject: subject.trim().to_string(),
        number: number.trim().to_string(),
        title: raw.title_long.clone().unwrap_or_default(),
        description: raw.description.as_deref().unwrap_or("").trim().to_string(),
        credit,
        grading_basis,
        meeting_days,
        meeting_time,
        meeting_location,
        instructors,
    }
}

fn pick_section(group: &RawEnrollGroup) -> Option<&RawSection> {
    group
        .class_sections
        .iter()
        .find(|s| s.ssr_component.as_deref() == Some("LEC"))
        .or_else(|| group.class_sections.first())
}

fn pick_meeting(section: &RawSection) -> Option<&RawMeeting> {
    section
        .meetings
        .iter()
        .find(|m| {
            m.pattern.as_deref().is_some_and(|p| !p.is_empty())
                || m.time_start.as_deref().is_some_and(|t| !t.is_empty())
                || m.time_end.as_deref().is_some_and(|t| !t.is_empty())
        })
        .or_else(|| section.meetings.first())
}

/// "First Last (netid)" per instructor, comma-joined, or the literal
/// [`UNKNOWN_INSTRUCTORS`] marker when nothing resolves.
fn instructor_line(meeting: &RawMeeting) -> String {
    let mut names = Vec::new();

    for instructor in &meeting.instructors {
        let first = instructor.first_name.as_deref().unwrap_or("");
        let last = instructor.last_name.as_deref().unwrap_or("");
        let netid = instructor.netid.as_deref().unwrap_or("");

        let full = [first, last]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        if !netid.is_empty() {
            if full.is_empty() {
                names.push(netid.to_string());
            } else {
                names.push(format!("{} ({})", full, netid));
            }
        } else if !full.is_empty() {
            names.push(full);
        }
    }

    if names.is_empty() {
        UNKNOWN_INSTRUCTORS.to_string()
    } else {
        names.join(", ")
    }
}

/// Flat representation of one CUReviews review item.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseReviewRecord {
    pub content: String,
    pub professors: String,
    pub majors: String,
    pub overall: Option<f64>,
    pub difficulty: Option<f64>,
    pub workload: Option<f64>,
}

pub fn review_record(raw: &RawCourseReview) -> CourseReviewRecord {
    CourseReviewRecord {
        content: raw.text.as_deref().unwrap_or("").trim().to_string(),
        professors: raw.professors.join(", "),
        majors: raw.major.join(", "),
        overall: raw.rating,
        difficulty: raw.difficulty,
        workload: raw.workload,
    }
}

/// Strip whitespace and upper-case, e.g. "cs 2110" -> "CS2110".
pub fn normalize_code(code: &str) -> String {
    code.split_whitespace().collect::<String>().to_uppercase()
}

/// Keep only ratings whose `class` field contains the target course code
/// after normalization. Substring containment, not equality: "CS2110" also
/// matches a class field of "CS21100". That over-match is intentional parity
/// with the upstream scraper, kept until the exact-match intent is confirmed.
pub fn ratings_for_course(ratings: Vec<RawRating>, course_code: &str) -> Vec<RawRating> {
    let target = normalize_code(course_code);
    ratings
        .into_iter()
        .filter(|r| {
            r.class
                .as_deref()
                .is_some_and(|c| !c.is_empty() && normalize_code(c).contains(&target))
        })
        .collect()
}

/// Split a stored course code into its (subject, number) pair. `None` unless
/// the code is exactly two whitespace-separated tokens.
pub fn split_course_code(code: &str) -> Option<(String, String)> {
    let mut parts = code.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(subject), Some(number), None) => Some((subject.to_string(), number.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_class(value: serde_json::Value) -> RawClass {
        serde_json::from_value(value).expect("Failed to build RawClass")
    }

    fn sample_class() -> RawClass {
        raw_class(json!({
            "subject": "CS",
            "catalogNbr": "3110",
            "titleLong": "Data Structures and Functional Programming",
            "description": "  Advanced programming course.  ",
            "enrollGroups": [{
                "unitsMinimum": 4,
                "gradingBasisShort": "GRD",
                "classSections": [
                    {
                        "ssrComponent": "DIS",
                        "meetings": [{
                            "pattern": "F",
                            "timeStart": "09:05AM",
                            "timeEnd": "09:55AM",
                            "instructors": []
                        }]
                    },
                    {
                        "ssrComponent": "LEC",
                        "meetings": [
                            { "pattern": "", "timeStart": "", "timeEnd": "" },
                            {
                                "pattern": "MWF",
                                "timeStart": "10:10AM",
                                "timeEnd": "11:00AM",
                                "locationDescr": "Statler Hall 185",
                                "instructors": [
                                    { "firstName": "Michael", "lastName": "Clarkson", "netid": "mrc26" },
                                    { "firstName": "", "lastName": "", "netid": "abc12" }
                                ]
                            }
                        ]
                    }
                ]
            }]
        }))
    }

    #[test]
    fn roster_extraction_is_deterministic() {
        let raw = sample_class();
        let first = course_record(&raw, "SP26", "CS", "3110");
        let second = course_record(&raw, "SP26", "CS", "3110");
        assert_eq!(first, second);
    }

    #[test]
    fn prefers_lecture_section_and_meeting_with_schedule() {
        let record = course_record(&sample_class(), "SP26", "CS", "3110");
        assert_eq!(record.meeting_days.as_deref(), Some("MWF"));
        assert_eq!(record.meeting_time.as_deref(), Some("10:10AM-11:00AM"));
        assert_eq!(record.meeting_location.as_deref(), Some("Statler Hall 185"));
        assert_eq!(record.instructors, "Michael Clarkson (mrc26), abc12");
        assert_eq!(record.code(), "CS 3110");
        assert_eq!(record.description, "Advanced programming course.");
        assert_eq!(record.credit, 4);
    }

    #[test]
    fn falls_back_to_first_section_without_lecture() {
        let raw = raw_class(json!({
            "subject": "CS",
            "catalogNbr": "4999",
            "titleLong": "Independent Research",
            "enrollGroups": [{
                "classSections": [{
                    "ssrComponent": "IND",
                    "meetings": [{ "pattern": "TR", "timeStart": "01:00PM", "timeEnd": "02:15PM" }]
                }]
            }]
        }));
        let record = course_record(&raw, "SP26", "CS", "4999");
        assert_eq!(record.meeting_days.as_deref(), Some("TR"));
    }

    #[test]
    fn missing_fields_use_named_defaults() {
        let raw = raw_class(json!({
            "subject": "CS",
            "catalogNbr": "1110",
            "enrollGroups": []
        }));
        let record = course_record(&raw, "SP26", "CS", "1110");
        assert_eq!(record.credit, DEFAULT_CREDIT);
        assert_eq!(record.title, "");
        assert_eq!(record.description, "");
        assert_eq!(record.grading_basis, "");
        assert_eq!(record.instructors, UNKNOWN_INSTRUCTORS);
        assert!(record.meeting_days.is_none());
        assert!(record.meeting_time.is_none());
    }

    #[test]
    fn meeting_without_instructors_yields_unknown_marker() {
        let raw = raw_class(json!({
            "subject": "CS",
            "catalogNbr": "2800",
            "enrollGroups": [{
                "unitsMinimum": 3,
                "classSections": [{
                    "ssrComponent": "LEC",
                    "meetings": [{ "pattern": "MW", "timeStart": "11:15AM", "timeEnd": "12:05PM" }]
                }]
            }]
        }));
        let record = course_record(&raw, "SP26", "CS", "2800");
        assert_eq!(record.instructors, UNKNOWN_INSTRUCTORS);
        assert_ne!(record.instructors, "");
    }

    #[test]
    fn review_record_renames_and_joins_fields() {
        let raw: RawCourseReview = serde_json::from_value(json!({
            "_id": "abc123",
            "text": "  Great course, tough exams.  ",
            "rating": 4.0,
            "difficulty": 3.5,
            "workload": 4.0,
            "professors": ["Clarkson", "White"],
            "major": ["CS", "Math"]
        }))
        .expect("Failed to build RawCourseReview");

        let record = review_record(&raw);
        assert_eq!(record.content, "Great course, tough exams.");
        assert_eq!(record.professors, "Clarkson, White");
        assert_eq!(record.majors, "CS, Math");
        assert_eq!(record.overall, Some(4.0));
    }

    #[test]
    fn normalize_code_strips_whitespace_and_uppercases() {
        assert_eq!(normalize_code("CS 2110"), "CS2110");
        assert_eq!(normalize_code("cs 2110"), "CS2110");
        assert_eq!(normalize_code(" cs  2110 "), "CS2110");
    }

    fn rating(class: &str) -> RawRating {
        serde_json::from_value(json!({ "class": class, "comment": "fine" }))
            .expect("Failed to build RawRating")
    }

    #[test]
    fn rating_filter_is_substring_containment() {
        let ratings = vec![
            rating("CS 2110 Fall"),
            rating("CS211"),
            rating("CS21100"),
            rating("ECON 1110"),
        ];

        let matched = ratings_for_course(ratings, "CS 2110");
        let classes: Vec<_> = matched.iter().map(|r| r.class.as_deref().unwrap()).collect();

        // "CS 2110 Fall" normalizes to CS2110FALL and contains CS2110.
        assert!(classes.contains(&"CS 2110 Fall"));
        // "CS211" does not contain CS2110.
        assert!(!classes.contains(&"CS211"));
        // "CS21100" contains CS2110 as a substring: the documented over-match.
        assert!(classes.contains(&"CS21100"));
        assert!(!classes.contains(&"ECON 1110"));
    }

    #[test]
    fn ratings_with_empty_class_field_are_dropped() {
        let ratings = vec![rating(""), rating("CS 2110")];
        let matched = ratings_for_course(ratings, "CS 2110");
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn split_course_code_requires_exactly_two_tokens() {
        assert_eq!(
            split_course_code("CS 3110"),
            Some(("CS".to_string(), "3110".to_string()))
        );
        assert_eq!(
            split_course_code("  CS   3110  "),
            Some(("CS".to_string(), "3110".to_string()))
        );
        assert_eq!(split_course_code("CS3110"), None);
        assert_eq!(split_course_code("CS 3110 honors"), None);
        assert_eq!(split_course_code(""), None);
    }
}
