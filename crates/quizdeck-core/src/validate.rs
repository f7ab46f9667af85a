//! Content validation.
//!
//! These checks cover content-authoring rules. The quiz itself never enforces
//! them; they are run by `quizdeck validate` before content is published.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::LoadedFolder;

/// Required number of options per question.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A warning from content validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The folder the warning applies to (if applicable).
    pub folder: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn folder(folder: &str, message: impl Into<String>) -> Self {
        Self {
            folder: Some(folder.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.folder {
            Some(folder) => write!(f, "[{folder}] {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

fn folder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{7}-\d{4}$").expect("valid folder pattern"))
}

/// Returns `true` if `name` follows the `#######-####` folder convention.
pub fn is_valid_folder_name(name: &str) -> bool {
    folder_pattern().is_match(name)
}

/// Validate loaded content for common authoring mistakes.
pub fn validate_content(folders: &[LoadedFolder]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    // Question text -> first folder it appeared in.
    let mut seen_globally: HashMap<&str, &str> = HashMap::new();

    for folder in folders {
        let id = folder.id.as_str();
        let doc = &folder.document;

        if !is_valid_folder_name(id) {
            warnings.push(ValidationWarning::folder(
                id,
                "folder name does not match pattern #######-####",
            ));
        }

        for (field, value) in [
            ("username", &doc.user.username),
            ("profileImage", &doc.user.profile_image),
            ("socialLink", &doc.user.social_link),
        ] {
            if value.trim().is_empty() {
                warnings.push(ValidationWarning::folder(id, format!("user.{field} is empty")));
            }
        }

        let mut seen_locally = HashSet::new();
        for topic in &doc.topics {
            if topic.questions.is_empty() {
                warnings.push(ValidationWarning::folder(
                    id,
                    format!("topic '{}' has no questions", topic.name),
                ));
            }

            for q in &topic.questions {
                let text = q.question.as_str();

                if q.options.len() != OPTIONS_PER_QUESTION {
                    warnings.push(ValidationWarning::folder(
                        id,
                        format!(
                            "question '{text}' has {} options, expected {OPTIONS_PER_QUESTION}",
                            q.options.len()
                        ),
                    ));
                }

                let distinct: HashSet<&String> = q.options.iter().collect();
                if distinct.len() != q.options.len() {
                    warnings.push(ValidationWarning::folder(
                        id,
                        format!("question '{text}' has duplicate options"),
                    ));
                }

                if !q.options.contains(&q.answer) {
                    warnings.push(ValidationWarning::folder(
                        id,
                        format!(
                            "answer '{}' of question '{text}' is not among its options",
                            q.answer
                        ),
                    ));
                }

                if !seen_locally.insert(text) {
                    warnings.push(ValidationWarning::folder(
                        id,
                        format!("duplicate question within folder: '{text}'"),
                    ));
                } else if let Some(first) = seen_globally.get(text) {
                    warnings.push(ValidationWarning::folder(
                        id,
                        format!("duplicate question '{text}' already in folder {first}"),
                    ));
                } else {
                    seen_globally.insert(text, id);
                }
            }
        }
    }

    warnings
}

/// Compare the index against the folders present on disk.
pub fn check_index_coverage(index: &[String], on_disk: &[String]) -> Vec<ValidationWarning> {
    let listed: HashSet<&str> = index.iter().map(String::as_str).collect();
    let present: HashSet<&str> = on_disk.iter().map(String::as_str).collect();

    let mut warnings: Vec<ValidationWarning> = index
        .iter()
        .filter(|f| !present.contains(f.as_str()))
        .map(|f| ValidationWarning::folder(f, "listed in index.json but missing on disk"))
        .collect();
    warnings.extend(
        on_disk
            .iter()
            .filter(|f| !listed.contains(f.as_str()))
            .map(|f| ValidationWarning::folder(f, "present on disk but not listed in index.json")),
    );
    warnings
}
