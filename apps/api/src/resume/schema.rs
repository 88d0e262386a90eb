//! Resume record shape and its validator.
//!
//! The shape is a static tree checked against the raw `serde_json::Value`
//! returned by the model, so a conforming record is forwarded as the model
//! produced it rather than round-tripped through typed structs.
//!
//! Rules:
//! - `personal_info` is required; every other field is optional.
//! - An optional field may be `null` (treated as absent).
//! - Unknown keys are allowed.
//! - `email`, when non-empty, must be a valid address with a dotted domain.
//! - `certifications[].year` and `projects[].time_period` accept any value.

use serde::Serialize;
use serde_json::Value;
use validator::ValidateEmail;

#[derive(Debug)]
pub enum Shape {
    Any,
    Bool,
    Str,
    Email,
    List(&'static Shape),
    Object(&'static [Field]),
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl Field {
    const fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }

    const fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }
}

impl Shape {
    fn describe(&self) -> &'static str {
        match self {
            Shape::Any => "any value",
            Shape::Bool => "a boolean",
            Shape::Str | Shape::Email => "a string",
            Shape::List(_) => "an array",
            Shape::Object(_) => "an object",
        }
    }
}

static PERSONAL_INFO: [Field; 5] = [
    Field::optional("name", Shape::Str),
    Field::optional("email", Shape::Email),
    Field::optional("phone", Shape::Str),
    Field::optional("linkedin", Shape::Str),
    Field::optional("languages", Shape::Str),
];

static EDUCATION: [Field; 3] = [
    Field::optional("degree", Shape::Str),
    Field::optional("university", Shape::Str),
    Field::optional("year", Shape::Str),
];

static WORK_EXPERIENCE: [Field; 4] = [
    Field::optional("job_title", Shape::Str),
    Field::optional("company", Shape::Str),
    Field::optional("duration", Shape::Str),
    Field::optional("responsibilities", Shape::List(&Shape::Str)),
];

static SKILLS: [Field; 2] = [
    Field::optional("technical", Shape::List(&Shape::Str)),
    Field::optional("soft", Shape::List(&Shape::Str)),
];

static CERTIFICATION: [Field; 3] = [
    Field::optional("name", Shape::Str),
    Field::optional("issuer", Shape::Str),
    Field::optional("year", Shape::Any),
];

static PROJECT: [Field; 3] = [
    Field::optional("title", Shape::Str),
    Field::optional("technology", Shape::Str),
    Field::optional("time_period", Shape::Any),
];

static EDUCATION_ENTRY: Shape = Shape::Object(&EDUCATION);
static WORK_ENTRY: Shape = Shape::Object(&WORK_EXPERIENCE);
static CERTIFICATION_ENTRY: Shape = Shape::Object(&CERTIFICATION);
static PROJECT_ENTRY: Shape = Shape::Object(&PROJECT);

static RESUME_FIELDS: [Field; 7] = [
    Field::required("personal_info", Shape::Object(&PERSONAL_INFO)),
    Field::optional("education", Shape::List(&EDUCATION_ENTRY)),
    Field::optional("work_experience", Shape::List(&WORK_ENTRY)),
    Field::optional("skills", Shape::Object(&SKILLS)),
    Field::optional("certifications", Shape::List(&CERTIFICATION_ENTRY)),
    Field::optional("projects", Shape::List(&PROJECT_ENTRY)),
    Field::optional("spam", Shape::Bool),
];

/// The full record returned to callers when the document is not spam.
pub static RESUME_RECORD: Shape = Shape::Object(&RESUME_FIELDS);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

/// Checks a parsed completion against [`RESUME_RECORD`], collecting every violation.
pub fn validate(record: &Value) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();
    check(&RESUME_RECORD, record, "", &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check(shape: &Shape, value: &Value, path: &str, out: &mut Vec<Violation>) {
    match (shape, value) {
        (Shape::Any, _) | (Shape::Bool, Value::Bool(_)) | (Shape::Str, Value::String(_)) => {}
        (Shape::Email, Value::String(s)) => {
            if !s.trim().is_empty() && !is_valid_email(s.trim()) {
                out.push(violation(path, "must be a valid email address"));
            }
        }
        (Shape::List(item), Value::Array(items)) => {
            for (i, v) in items.iter().enumerate() {
                check(item, v, &format!("{path}[{i}]"), out);
            }
        }
        (Shape::Object(fields), Value::Object(map)) => {
            for field in fields.iter() {
                let field_path = if path.is_empty() {
                    field.name.to_string()
                } else {
                    format!("{path}.{}", field.name)
                };
                match map.get(field.name) {
                    None | Some(Value::Null) if field.required => {
                        out.push(violation(&field_path, "is required"));
                    }
                    None | Some(Value::Null) => {}
                    Some(v) => check(&field.shape, v, &field_path, out),
                }
            }
        }
        (expected, _) => out.push(violation(path, &format!("must be {}", expected.describe()))),
    }
}

fn violation(path: &str, message: &str) -> Violation {
    Violation {
        path: if path.is_empty() { "$".to_string() } else { path.to_string() },
        message: message.to_string(),
    }
}

/// RFC 5322 syntax via `validator`, plus at least two domain labels.
fn is_valid_email(s: &str) -> bool {
    s.validate_email()
        && s
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}
