//! Interview/status snapshot.
//!
//! Tracks which project-metadata questions the specification already answers,
//! alongside the counts and warnings of the run that produced it. The snapshot
//! contains no timestamps so repeated builds stay byte-identical.

use crate::core::graph::IdCollision;
use crate::core::manifest::JsonMap;
use crate::core::validate::DanglingReference;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// A question answered by a field of the project metadata document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    /// Question ID, also the project field that answers it
    pub id: &'static str,
    /// Section this question belongs to
    pub section: &'static str,
    /// The question text
    pub text: &'static str,
    /// Whether the spec is incomplete without an answer
    pub is_blocking: bool,
}

pub const QUESTIONS: &[Question] = &[
    Question {
        id: "name",
        section: "overview",
        text: "What is the name of this project?",
        is_blocking: true,
    },
    Question {
        id: "summary",
        section: "overview",
        text: "Describe this project in one sentence.",
        is_blocking: true,
    },
    Question {
        id: "problem",
        section: "purpose",
        text: "What problem does this project solve?",
        is_blocking: false,
    },
    Question {
        id: "audience",
        section: "purpose",
        text: "Who are the primary users?",
        is_blocking: false,
    },
    Question {
        id: "success",
        section: "purpose",
        text: "How will we know this project is successful?",
        is_blocking: false,
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSnapshot {
    pub answered: Vec<String>,
    pub missing: Vec<String>,
    /// First unanswered question, in question order
    pub next: Option<String>,
    /// Section of `next`
    pub next_section: Option<String>,
    pub is_complete: bool,
}

fn is_answered(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::String(s)) => !s.trim().is_empty(),
        Some(JsonValue::Array(items)) => !items.is_empty(),
        Some(JsonValue::Object(map)) => !map.is_empty(),
        Some(_) => true,
    }
}

pub fn assess(project: Option<&JsonMap>) -> InterviewSnapshot {
    let mut snapshot = InterviewSnapshot {
        is_complete: true,
        ..InterviewSnapshot::default()
    };
    for question in QUESTIONS {
        if is_answered(project.and_then(|p| p.get(question.id))) {
            snapshot.answered.push(question.id.to_string());
        } else {
            snapshot.missing.push(question.id.to_string());
            if snapshot.next.is_none() {
                snapshot.next = Some(question.id.to_string());
                snapshot.next_section = Some(question.section.to_string());
            }
            if question.is_blocking {
                snapshot.is_complete = false;
            }
        }
    }
    snapshot
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub documents: usize,
    pub entities: usize,
    pub relations: usize,
    pub backlinks: usize,
    pub warnings: usize,
    pub id_collisions: usize,
    pub parse_failures: usize,
    pub scan_failures: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub project: Option<String>,
    /// SHA-256 of the serialized manifest
    pub fingerprint: String,
    pub interview: InterviewSnapshot,
    pub summary: Summary,
    pub warnings: Vec<DanglingReference>,
    pub collisions: Vec<IdCollision>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(value: JsonValue) -> JsonMap {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn no_project_is_incomplete() {
        let snapshot = assess(None);
        assert!(!snapshot.is_complete);
        assert_eq!(snapshot.next.as_deref(), Some("name"));
        assert_eq!(snapshot.next_section.as_deref(), Some("overview"));
        assert_eq!(snapshot.missing.len(), QUESTIONS.len());
    }

    #[test]
    fn blocking_answers_complete_the_interview() {
        let p = project(json!({"name": "Shop", "summary": "Sells things", "audience": []}));
        let snapshot = assess(Some(&p));
        assert!(snapshot.is_complete);
        assert_eq!(snapshot.answered, vec!["name", "summary"]);
        assert_eq!(snapshot.next.as_deref(), Some("problem"));
        assert_eq!(snapshot.next_section.as_deref(), Some("purpose"));
    }

    #[test]
    fn fully_answered_project_has_no_next_question() {
        let p = project(json!({
            "name": "Shop",
            "summary": "Sells things",
            "problem": "Selling is hard",
            "audience": ["buyers"],
            "success": "Revenue"
        }));
        let snapshot = assess(Some(&p));
        assert!(snapshot.is_complete);
        assert!(snapshot.missing.is_empty());
        assert_eq!(snapshot.next, None);
        assert_eq!(snapshot.next_section, None);
    }

    #[test]
    fn blank_strings_do_not_count() {
        let p = project(json!({"name": "  ", "summary": "ok"}));
        let snapshot = assess(Some(&p));
        assert!(!snapshot.is_complete);
        assert_eq!(snapshot.next.as_deref(), Some("name"));
    }
}
