//! Test definitions as fetched from the remote store and as cached locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A multiple-choice question. `correct_answer` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: u32,
}

impl Question {
    pub fn is_correct(&self, selected: Option<u32>) -> bool {
        selected == Some(self.correct_answer)
    }

    pub fn has_option(&self, index: u32) -> bool {
        (index as usize) < self.options.len()
    }
}

/// A test with its questions, as assembled from the remote `tests` and
/// `questions` collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDefinition {
    pub id: String,
    pub title: String,
    /// Minutes allowed for the attempt.
    pub duration: u32,
    pub questions: Vec<Question>,
}

/// A test definition stored for offline use.
///
/// Question order is the display order; recorded answer indices are only
/// meaningful against it, so a cached test is replaced whole, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTest {
    pub id: String,
    pub title: String,
    pub duration: u32,
    pub questions: Vec<Question>,
    #[serde(rename = "cachedAt", with = "chrono::serde::ts_milliseconds")]
    pub cached_at: DateTime<Utc>,
}

impl CachedTest {
    pub fn new(definition: TestDefinition) -> Self {
        Self {
            id: definition.id,
            title: definition.title,
            duration: definition.duration,
            questions: definition.questions,
            cached_at: Utc::now(),
        }
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration.saturating_mul(60)
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> CachedTest {
        CachedTest::new(TestDefinition {
            id: "t1".to_string(),
            title: "Algebra".to_string(),
            duration: 10,
            questions: vec![Question {
                id: "q1".to_string(),
                text: "2 + 2?".to_string(),
                options: vec!["3".to_string(), "4".to_string()],
                correct_answer: 1,
            }],
        })
    }

    #[test]
    fn test_cached_test_wire_format() {
        let test = sample();
        let value = serde_json::to_value(&test).unwrap();
        assert_eq!(value["cachedAt"], test.cached_at.timestamp_millis());
        assert_eq!(value["questions"][0]["correct_answer"], 1);
    }

    #[test]
    fn test_parse_cached_test_from_millis() {
        let json = r#"{"id":"t9","title":"Physics","duration":5,"questions":[],"cachedAt":1700000000000}"#;
        let test: CachedTest = serde_json::from_str(json).unwrap();
        assert_eq!(test.cached_at.timestamp(), 1_700_000_000);
        assert_eq!(test.duration_secs(), 300);
    }

    #[test]
    fn test_age_display() {
        let mut test = sample();
        assert_eq!(test.age_display(), "just now");

        test.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(test.age_display(), "5m ago");

        test.cached_at = Utc::now() - Duration::minutes(125);
        assert_eq!(test.age_display(), "2h ago");

        test.cached_at = Utc::now() - Duration::days(3);
        assert_eq!(test.age_display(), "3d ago");
    }

    #[test]
    fn test_question_is_correct() {
        let test = sample();
        let q = &test.questions[0];
        assert!(q.is_correct(Some(1)));
        assert!(!q.is_correct(Some(0)));
        assert!(!q.is_correct(None));
        assert!(q.has_option(1));
        assert!(!q.has_option(2));
    }
}
