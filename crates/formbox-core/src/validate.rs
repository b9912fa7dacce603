//! Field validation for incoming submissions.
//!
//! Input arrives as loosely-typed JSON so that a wrong type on one field is
//! reported against that field instead of rejecting the whole body. Every
//! field is checked and all failures are reported together, keyed by field
//! name.
//!
//! | Field | Rules |
//! |-------|-------|
//! | `full_name`, `category`, `sub_category` | required, non-blank, ≤ 255 chars |
//! | `email` | required, ≤ 254 chars, email syntax, unique in the store |
//! | `mobile_number` | required, ≤ 15 chars, `^\+?1?\d{9,15}$` |
//! | `agreed_to_terms` | must be `true` |

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  store::SubmissionStore,
  submission::NewSubmission,
};

// ─── Field names ─────────────────────────────────────────────────────────────

pub const FULL_NAME: &str = "full_name";
pub const EMAIL: &str = "email";
pub const MOBILE_NUMBER: &str = "mobile_number";
pub const CATEGORY: &str = "category";
pub const SUB_CATEGORY: &str = "sub_category";
pub const AGREED_TO_TERMS: &str = "agreed_to_terms";

// ─── Messages ────────────────────────────────────────────────────────────────

pub const REQUIRED: &str = "This field is required.";
pub const NULL: &str = "This field may not be null.";
pub const BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const INVALID_BOOLEAN: &str = "Must be a valid boolean.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const EMAIL_TAKEN: &str = "A submission with this email already exists.";
pub const INVALID_MOBILE: &str = "Phone number must be entered in the format: \
                                  '+999999999'. Up to 15 digits allowed.";
pub const MUST_AGREE: &str = "You must agree to the terms and conditions.";

const TEXT_MAX_LEN: usize = 255;
const EMAIL_MAX_LEN: usize = 254;
const MOBILE_MAX_LEN: usize = 15;

static MOBILE_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^\+?1?\d{9,15}$").expect("Failed to compile mobile number regex")
});

static EMAIL_USER_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r#"(?i)^(?:[-!#$%&'*+/=?^_`{}|~0-9a-z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9a-z]+)*|"(?:[^"\\\r\n]|\\[^\r\n])*")$"#,
  )
  .expect("Failed to compile email user regex")
});

static EMAIL_DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9-]{2,63}$")
    .expect("Failed to compile email domain regex")
});

// ─── Input ───────────────────────────────────────────────────────────────────

/// A raw, unvalidated submission as posted by a client.
///
/// Each field distinguishes "absent" (`None`) from an explicit JSON `null`
/// (`Some(Value::Null)`).
#[derive(Debug, Clone, Default)]
pub struct SubmissionInput {
  pub full_name:       Option<Value>,
  pub email:           Option<Value>,
  pub mobile_number:   Option<Value>,
  pub category:        Option<Value>,
  pub sub_category:    Option<Value>,
  pub agreed_to_terms: Option<Value>,
}

impl SubmissionInput {
  /// Accept a decoded request body. Anything other than a JSON object is
  /// rejected with a message naming what was sent instead.
  pub fn from_json(body: Value) -> std::result::Result<Self, String> {
    match body {
      Value::Object(fields) => Ok(Self::from(fields)),
      other => Err(format!(
        "Invalid data. Expected a dictionary, but got {}.",
        json_kind(&other)
      )),
    }
  }
}

impl From<Map<String, Value>> for SubmissionInput {
  fn from(mut fields: Map<String, Value>) -> Self {
    SubmissionInput {
      full_name:       fields.remove(FULL_NAME),
      email:           fields.remove(EMAIL),
      mobile_number:   fields.remove(MOBILE_NUMBER),
      category:        fields.remove(CATEGORY),
      sub_category:    fields.remove(SUB_CATEGORY),
      agreed_to_terms: fields.remove(AGREED_TO_TERMS),
    }
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "list",
    Value::Object(_) => "dictionary",
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Validation failures keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_owned()).or_default().push(message.into());
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn fields(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }

  /// Record the messages of a failed check; pass a successful value through.
  fn collect<T>(&mut self, field: &str, checked: Checked<T>) -> Option<T> {
    match checked {
      Ok(value) => Some(value),
      Err(messages) => {
        for message in messages {
          self.add(field, message);
        }
        None
      }
    }
  }
}

/// Outcome of a single field check: the cleaned value or every failure message.
pub type Checked<T> = std::result::Result<T, Vec<String>>;

// ─── Validator ───────────────────────────────────────────────────────────────

/// Validate `input` and return a normalised [`NewSubmission`].
///
/// The store is consulted read-only, and only when the email passed its own
/// syntax checks.
pub async fn validate<S>(store: &S, input: &SubmissionInput) -> Result<NewSubmission>
where
  S: SubmissionStore,
{
  let mut errors = FieldErrors::default();

  let full_name = errors.collect(FULL_NAME, clean_text(input.full_name.as_ref()));
  let mut email = errors.collect(EMAIL, clean_email(input.email.as_ref()));
  let mobile_number =
    errors.collect(MOBILE_NUMBER, clean_mobile_number(input.mobile_number.as_ref()));
  let category = errors.collect(CATEGORY, clean_text(input.category.as_ref()));
  let sub_category = errors.collect(SUB_CATEGORY, clean_text(input.sub_category.as_ref()));
  let agreed_to_terms =
    errors.collect(AGREED_TO_TERMS, clean_agreement(input.agreed_to_terms.as_ref()));

  if let Some(candidate) = email.as_deref()
    && store.email_exists(candidate).await.map_err(Error::store)?
  {
    errors.add(EMAIL, EMAIL_TAKEN);
    email = None;
  }

  match (full_name, email, mobile_number, category, sub_category, agreed_to_terms) {
    (
      Some(full_name),
      Some(email),
      Some(mobile_number),
      Some(category),
      Some(sub_category),
      Some(agreed_to_terms),
    ) => Ok(NewSubmission {
      full_name,
      email,
      mobile_number,
      category,
      sub_category,
      agreed_to_terms,
    }),
    _ => Err(Error::Invalid(errors)),
  }
}

// ─── Field checks ────────────────────────────────────────────────────────────

/// A required free-text field (`full_name`, `category`, `sub_category`).
pub fn clean_text(value: Option<&Value>) -> Checked<String> {
  clean_string(value, TEXT_MAX_LEN, &[])
}

pub fn clean_email(value: Option<&Value>) -> Checked<String> {
  clean_string(value, EMAIL_MAX_LEN, &[email_syntax])
}

pub fn clean_mobile_number(value: Option<&Value>) -> Checked<String> {
  clean_string(value, MOBILE_MAX_LEN, &[mobile_pattern])
}

/// `agreed_to_terms` must be present and truthy.
pub fn clean_agreement(value: Option<&Value>) -> Checked<bool> {
  let agreed = match value {
    None => false,
    Some(Value::Null) => return Err(vec![NULL.to_owned()]),
    Some(v) => parse_bool(v).ok_or_else(|| vec![INVALID_BOOLEAN.to_owned()])?,
  };
  if agreed { Ok(true) } else { Err(vec![MUST_AGREE.to_owned()]) }
}

/// Coerce, trim and check a required string. Every failing validator adds a
/// message; the blank/type checks short-circuit.
fn clean_string(
  value: Option<&Value>,
  max_len: usize,
  validators: &[fn(&str) -> Option<&'static str>],
) -> Checked<String> {
  let text = match value {
    None => return Err(vec![REQUIRED.to_owned()]),
    Some(Value::Null) => return Err(vec![NULL.to_owned()]),
    Some(Value::String(s)) => s.trim().to_owned(),
    Some(Value::Number(n)) => n.to_string(),
    Some(_) => return Err(vec![NOT_A_STRING.to_owned()]),
  };
  if text.is_empty() {
    return Err(vec![BLANK.to_owned()]);
  }

  let mut messages = Vec::new();
  if text.chars().count() > max_len {
    messages.push(format!("Ensure this field has no more than {max_len} characters."));
  }
  messages.extend(
    validators
      .iter()
      .filter_map(|check| check(&text))
      .map(str::to_owned),
  );

  if messages.is_empty() { Ok(text) } else { Err(messages) }
}

fn email_syntax(s: &str) -> Option<&'static str> {
  (!is_valid_email(s)).then_some(INVALID_EMAIL)
}

fn mobile_pattern(s: &str) -> Option<&'static str> {
  (!MOBILE_RE.is_match(s)).then_some(INVALID_MOBILE)
}

fn parse_bool(value: &Value) -> Option<bool> {
  match value {
    Value::Bool(b) => Some(*b),
    Value::Number(n) => match n.as_f64() {
      Some(f) if f == 1.0 => Some(true),
      Some(f) if f == 0.0 => Some(false),
      _ => None,
    },
    Value::String(s) => match s.as_str() {
      "t" | "T" | "y" | "Y" | "yes" | "Yes" | "YES" | "true" | "True" | "TRUE"
      | "on" | "On" | "ON" | "1" => Some(true),
      "f" | "F" | "n" | "N" | "no" | "No" | "NO" | "false" | "False" | "FALSE"
      | "off" | "Off" | "OFF" | "0" => Some(false),
      _ => None,
    },
    _ => None,
  }
}

/// Syntactic email check: a dot-atom or quoted local part, `@`, and a
/// dotted hostname (or `localhost`).
pub fn is_valid_email(value: &str) -> bool {
  let Some((user, domain)) = value.rsplit_once('@') else {
    return false;
  };
  if !EMAIL_USER_RE.is_match(user) {
    return false;
  }
  if domain.eq_ignore_ascii_case("localhost") {
    return true;
  }
  let tld = domain.rsplit('.').next().unwrap_or_default();
  EMAIL_DOMAIN_RE.is_match(domain) && !tld.starts_with('-') && !tld.ends_with('-')
}
