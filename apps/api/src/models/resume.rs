use serde::{Deserialize, Serialize};

/// The fixed-shape resume returned by the structuring step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResume {
    pub name: String,
    pub education: Education,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
    pub other: Vec<OtherEntry>,
}

/// The model may answer with a list of entries or a single string.
/// Both shapes are passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Education {
    List(Vec<String>),
    Single(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherEntry {
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_education_as_list() {
        let education: Education = serde_json::from_value(json!(["BSc", "MBA"])).unwrap();
        assert_eq!(
            education,
            Education::List(vec!["BSc".to_string(), "MBA".to_string()])
        );
    }

    #[test]
    fn test_education_as_single_string_is_not_coerced() {
        let education: Education = serde_json::from_value(json!("BSc Physics")).unwrap();
        assert_eq!(education, Education::Single("BSc Physics".to_string()));
        assert_eq!(serde_json::to_value(&education).unwrap(), json!("BSc Physics"));
    }

    #[test]
    fn test_null_experience_fields_are_omitted_on_output() {
        let entry: ExperienceEntry = serde_json::from_value(json!({
            "company": "Google",
            "position": null,
            "duration": "2020-2022",
            "description": null
        }))
        .unwrap();
        assert_eq!(entry.position, None);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"company": "Google", "duration": "2020-2022"})
        );
    }

    #[test]
    fn test_structured_resume_full_deserializes_correctly() {
        let resume: StructuredResume = serde_json::from_value(json!({
            "name": "John Doe",
            "education": ["Bachelor of Science in Computer Science"],
            "experience": [{
                "company": "Google",
                "position": "Software Engineer",
                "duration": "2020-2022",
                "description": "Developed web applications"
            }],
            "skills": ["JavaScript", "React"],
            "other": [{"name": "Languages", "description": "English, Spanish"}]
        }))
        .unwrap();

        assert_eq!(resume.name, "John Doe");
        assert_eq!(resume.experience[0].company.as_deref(), Some("Google"));
        assert_eq!(resume.skills.len(), 2);
        assert_eq!(resume.other[0].name, "Languages");
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let result = serde_json::from_value::<StructuredResume>(json!({
            "name": "John Doe",
            "education": 42,
            "experience": [],
            "skills": [],
            "other": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_skills_is_rejected() {
        let result = serde_json::from_value::<StructuredResume>(json!({
            "name": "John Doe",
            "education": [],
            "experience": [],
            "other": []
        }));
        assert!(result.is_err());
    }
}
