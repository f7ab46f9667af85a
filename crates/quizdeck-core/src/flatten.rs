//! Question flattening.

use crate::model::{FlattenedQuestion, SourceDocument};

/// Flatten source documents into the ordered sequence the quiz presents.
///
/// Order is documents as given, then topics in document order, then questions
/// in topic order. Each question carries its document author's metadata.
pub fn flatten(docs: &[SourceDocument]) -> Vec<FlattenedQuestion> {
    docs.iter()
        .flat_map(|doc| {
            doc.topics
                .iter()
                .flat_map(|topic| topic.questions.iter())
                .map(move |q| FlattenedQuestion::new(q, &doc.user))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, QuestionSpec, Topic};

    fn author(name: &str) -> Author {
        Author {
            username: name.into(),
            profile_image: format!("https://img.example/{name}.png"),
            social_link: format!("@{name}"),
        }
    }

    fn question(text: &str) -> QuestionSpec {
        QuestionSpec {
            question: text.into(),
            options: vec!["w".into(), "x".into(), "y".into(), "z".into()],
            answer: "x".into(),
        }
    }

    fn topic(name: &str, questions: &[&str]) -> Topic {
        Topic {
            name: name.into(),
            questions: questions.iter().map(|q| question(q)).collect(),
        }
    }

    fn sample_docs() -> Vec<SourceDocument> {
        vec![
            SourceDocument {
                user: author("first"),
                topics: vec![topic("t1", &["d1t1q1", "d1t1q2"]), topic("t2", &["d1t2q1"])],
            },
            SourceDocument {
                user: author("empty"),
                topics: vec![],
            },
            SourceDocument {
                user: author("second"),
                topics: vec![topic("t3", &[]), topic("t4", &["d2t4q1", "d2t4q2"])],
            },
        ]
    }

    #[test]
    fn preserves_nesting_order() {
        let flat = flatten(&sample_docs());
        let texts: Vec<&str> = flat.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["d1t1q1", "d1t1q2", "d1t2q1", "d2t4q1", "d2t4q2"]);
    }

    #[test]
    fn annotates_author_metadata() {
        let flat = flatten(&sample_docs());
        assert_eq!(flat[0].username, "first");
        assert_eq!(flat[2].profile_image, "https://img.example/first.png");
        assert_eq!(flat[3].username, "second");
        assert_eq!(flat[4].social_link, "@second");
        assert_eq!(flat[4].answer, "x");
        assert_eq!(flat[4].options.len(), 4);
    }

    #[test]
    fn idempotent_and_pure() {
        let docs = sample_docs();
        let before = docs.clone();
        let first = flatten(&docs);
        let second = flatten(&docs);
        assert_eq!(first, second);
        assert_eq!(docs, before);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(flatten(&[]).is_empty());
        let docs = vec![SourceDocument {
            user: author("nobody"),
            topics: vec![topic("t", &[])],
        }];
        assert!(flatten(&docs).is_empty());
    }
}
