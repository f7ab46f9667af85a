//! Core data model types for quizdeck.
//!
//! These types mirror the JSON content layout: an index listing content
//! folders, and one document per folder holding an author and their topics.

use serde::{Deserialize, Serialize};

/// The index resource listing every content folder, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderIndex {
    /// Folder identifiers (e.g. "1234567-2024").
    pub folders: Vec<String>,
}

/// One author's contributed content unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// The author of every question in this document.
    pub user: Author,
    /// Topics in document order.
    pub topics: Vec<Topic>,
}

/// Display metadata for a content author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub username: String,
    /// URL of the author's avatar.
    pub profile_image: String,
    pub social_link: String,
}

/// A named group of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Topic name (serialized as `topic`).
    #[serde(rename = "topic")]
    pub name: String,
    pub questions: Vec<QuestionSpec>,
}

/// A multiple-choice question as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    /// Question text.
    pub question: String,
    /// Answer options, in display order. Valid content has exactly four.
    pub options: Vec<String>,
    /// The correct option. Valid content has this among `options`.
    pub answer: String,
}

/// A question annotated with its author's display metadata.
///
/// This is the unit the quiz session iterates over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub profile_image: String,
    pub social_link: String,
    pub username: String,
}

impl FlattenedQuestion {
    /// Build a flattened question from a question and its owning author.
    pub fn new(question: &QuestionSpec, author: &Author) -> Self {
        Self {
            question: question.question.clone(),
            options: question.options.clone(),
            answer: question.answer.clone(),
            profile_image: author.profile_image.clone(),
            social_link: author.social_link.clone(),
            username: author.username.clone(),
        }
    }

    /// Returns `true` if `option` is the correct answer.
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }
}

/// A source document paired with the index identifier it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedFolder {
    /// Folder identifier as listed in the index.
    pub id: String,
    pub document: SourceDocument,
}

impl LoadedFolder {
    /// Total number of questions across all topics.
    pub fn question_count(&self) -> usize {
        self.document.topics.iter().map(|t| t.questions.len()).sum()
    }
}
