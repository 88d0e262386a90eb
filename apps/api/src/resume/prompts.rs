// Resume parsing prompt template.
// `{resume_text}` is replaced verbatim with the extracted document text.

pub const RESUME_PARSE_PROMPT: &str = r#"Parse the following resume into a single strict JSON object.

OUTPUT SCHEMA:
{
  "personal_info": {"name": "string", "email": "string", "phone": "string", "linkedin": "string", "languages": "string"},
  "education": [{"degree": "string", "university": "string", "year": "string"}],
  "work_experience": [{"job_title": "string", "company": "string", "duration": "string", "responsibilities": ["string"]}],
  "skills": {"technical": ["string"], "soft": ["string"]},
  "certifications": [{"name": "string", "issuer": "string", "year": "string"}],
  "projects": [{"title": "string", "technology": "string", "time_period": "string"}],
  "spam": boolean
}

SPAM DETECTION:
Decide whether this is a genuine resume. Mark it as spam when required fields are missing,
the content is gibberish, the formatting is fake, or values are placeholders.
Check every field that is present: start and end years must be valid years, the email
must be a valid address, and the phone number must match the format of the country
the candidate lives in.
Set "spam": true for spam, otherwise "spam": false. Always include the "spam" key.

RULES:
1. Return ONLY the JSON object. No markdown, no code fences, no commentary.
2. Do not wrap the object in quotes or backticks.
3. All keys use double quotes.

RESUME TEXT:
{resume_text}"#;

pub fn build_parse_prompt(resume_text: &str) -> String {
    RESUME_PARSE_PROMPT.replace("{resume_text}", resume_text)
}
