use serde::Serialize;
use serde_json::Value;

/// A single failed check on a creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Creation payload that passed every field check.
///
/// Text fields are kept as raw JSON; casting them to strings is the store
/// model's job (see `NewWebtoon::try_from`).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedWebtoon {
    pub title: Value,
    pub description: Value,
    pub author: Value,
    pub characters: Vec<Value>,
}

const REQUIRED_TEXT: [(&str, &str); 3] = [
    ("title", "Title is required"),
    ("description", "Description is required"),
    ("author", "Author is required"),
];

/// Check a candidate webtoon body. All checks run; every failure is reported.
pub fn validate_webtoon(payload: &Value) -> Result<ValidatedWebtoon, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut text = Vec::with_capacity(REQUIRED_TEXT.len());

    for (field, message) in REQUIRED_TEXT {
        match payload.get(field).filter(|v| is_non_empty(v)) {
            Some(value) => text.push(value.clone()),
            None => errors.push(FieldError { field, message }),
        }
    }

    let characters = match payload.get("characters") {
        Some(Value::Array(items)) => Some(items.clone()),
        _ => {
            errors.push(FieldError {
                field: "characters",
                message: "Characters must be an array",
            });
            None
        }
    };

    match (errors.is_empty(), characters) {
        (true, Some(characters)) => {
            let mut text = text.into_iter();
            Ok(ValidatedWebtoon {
                title: text.next().unwrap_or_default(),
                description: text.next().unwrap_or_default(),
                author: text.next().unwrap_or_default(),
                characters,
            })
        }
        _ => Err(errors),
    }
}

/// Emptiness as seen on the stringified value: null, "" and [] are empty,
/// every other value (objects included) is not.
fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(_) | Value::Bool(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn accepts_complete_payload() {
        let payload = json!({"title": "A", "description": "B", "author": "C", "characters": ["x", "y"]});
        let validated = validate_webtoon(&payload).unwrap();
        assert_eq!(validated.title, json!("A"));
        assert_eq!(validated.author, json!("C"));
        assert_eq!(validated.characters, vec![json!("x"), json!("y")]);
    }

    #[test]
    fn accepts_empty_character_list() {
        let payload = json!({"title": "A", "description": "B", "author": "C", "characters": []});
        assert!(validate_webtoon(&payload).is_ok());
    }

    #[test]
    fn empty_title_is_reported() {
        let payload = json!({"title": "", "description": "B", "author": "C", "characters": []});
        let errors = validate_webtoon(&payload).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError { field: "title", message: "Title is required" }]
        );
    }

    #[test]
    fn collects_every_failure_in_order() {
        let errors = validate_webtoon(&json!({})).unwrap_err();
        assert_eq!(fields(&errors), vec!["title", "description", "author", "characters"]);
    }

    #[test]
    fn scalar_characters_are_rejected() {
        let payload = json!({"title": "A", "description": "B", "author": "C", "characters": "x"});
        let errors = validate_webtoon(&payload).unwrap_err();
        assert_eq!(fields(&errors), vec!["characters"]);
        assert_eq!(errors[0].message, "Characters must be an array");
    }

    #[test]
    fn null_and_empty_list_fields_are_missing() {
        let payload = json!({"title": null, "description": [], "author": 3, "characters": []});
        let errors = validate_webtoon(&payload).unwrap_err();
        assert_eq!(fields(&errors), vec!["title", "description"]);
    }

    #[test]
    fn object_text_fields_pass_validation() {
        let payload = json!({"title": {"a": 1}, "description": ["b"], "author": "C", "characters": []});
        let validated = validate_webtoon(&payload).unwrap();
        assert_eq!(validated.title, json!({"a": 1}));
        assert_eq!(validated.description, json!(["b"]));
    }

    #[test]
    fn non_object_body_fails_every_check() {
        let errors = validate_webtoon(&json!(["title"])).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
