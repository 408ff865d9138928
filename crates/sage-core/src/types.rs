use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How hard the user rates a subject. Harder subjects are weighted earlier
/// in the generated plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

impl std::str::FromStr for DifficultyLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty level: {other}")),
        }
    }
}

/// Single exam subject record as stored and served over the wire.
///
/// Field names match the original frontend contract — the difficulty field
/// is serialized as `DifficultyLevel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub sub: String,
    pub date: NaiveDate,
    pub syllabus: String,
    #[serde(rename = "DifficultyLevel")]
    pub difficulty: DifficultyLevel,
    #[serde(default)]
    pub comments: String,
}

/// Insert payload for POST /api/exam — everything but the assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
    pub sub: String,
    pub date: NaiveDate,
    pub syllabus: String,
    #[serde(rename = "DifficultyLevel")]
    pub difficulty: DifficultyLevel,
    #[serde(default)]
    pub comments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_round_trips_through_strings() {
        for (text, level) in [
            ("easy", DifficultyLevel::Easy),
            ("medium", DifficultyLevel::Medium),
            ("hard", DifficultyLevel::Hard),
        ] {
            assert_eq!(text.parse::<DifficultyLevel>().unwrap(), level);
            assert_eq!(level.to_string(), text);
        }
    }

    #[test]
    fn difficulty_rejects_unknown_values() {
        assert!("brutal".parse::<DifficultyLevel>().is_err());
        assert!("Easy".parse::<DifficultyLevel>().is_err());
        assert!("".parse::<DifficultyLevel>().is_err());
    }

    #[test]
    fn new_subject_wire_format() {
        let json = r#"{
            "sub": "Math",
            "date": "2024-06-01",
            "syllabus": "ch1-5",
            "DifficultyLevel": "hard",
            "comments": "algebra weak"
        }"#;
        let subject: NewSubject = serde_json::from_str(json).unwrap();
        assert_eq!(subject.sub, "Math");
        assert_eq!(subject.difficulty, DifficultyLevel::Hard);
        assert_eq!(subject.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn new_subject_comments_default_empty() {
        let json = r#"{
            "sub": "Physics",
            "date": "2024-07-10",
            "syllabus": "optics",
            "DifficultyLevel": "medium"
        }"#;
        let subject: NewSubject = serde_json::from_str(json).unwrap();
        assert_eq!(subject.comments, "");
    }

    #[test]
    fn new_subject_rejects_bad_difficulty_and_date() {
        let bad_difficulty = r#"{"sub":"x","date":"2024-06-01","syllabus":"y","DifficultyLevel":"impossible"}"#;
        assert!(serde_json::from_str::<NewSubject>(bad_difficulty).is_err());

        let bad_date = r#"{"sub":"x","date":"2024-13-40","syllabus":"y","DifficultyLevel":"easy"}"#;
        assert!(serde_json::from_str::<NewSubject>(bad_date).is_err());
    }
}
