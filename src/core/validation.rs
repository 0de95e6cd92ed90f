//! Validation module for request payloads
//!
//! Request shapes are checked against declarative rule sets. Each rule maps a field to an
//! ordered list of constraints; rules are evaluated in declaration order and the first
//! violation wins, so the reported message is deterministic.

/// Minimum length for email addresses
pub const MIN_EMAIL_LENGTH: usize = 6;

/// Minimum length for passwords
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum length for full names
pub const MIN_FULLNAME_LENGTH: usize = 1;

/// Maximum length for email addresses (`users.email`)
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Maximum length for full names (`users.fullname`)
pub const MAX_FULLNAME_LENGTH: usize = 255;

/// Maximum length for member classifications (`users.member`)
pub const MAX_MEMBER_LENGTH: usize = 64;

/// A single check applied to a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Field must be present
    Required,
    /// Field must not be an empty string
    NonEmpty,
    /// Field must be a syntactically valid email address
    Email,
    /// Field must have at least this many characters
    MinLength(usize),
    /// Field must have at most this many characters
    MaxLength(usize),
}

/// Ordered constraints for one named field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraints: &'static [Constraint],
}

impl FieldRule {
    pub const fn new(field: &'static str, constraints: &'static [Constraint]) -> Self {
        Self { field, constraints }
    }
}

/// Rules for the registration payload
pub const REGISTER_RULES: &[FieldRule] = &[
    FieldRule::new(
        "email",
        &[
            Constraint::Required,
            Constraint::NonEmpty,
            Constraint::Email,
            Constraint::MinLength(MIN_EMAIL_LENGTH),
            Constraint::MaxLength(MAX_EMAIL_LENGTH),
        ],
    ),
    FieldRule::new(
        "fullname",
        &[
            Constraint::Required,
            Constraint::NonEmpty,
            Constraint::MinLength(MIN_FULLNAME_LENGTH),
            Constraint::MaxLength(MAX_FULLNAME_LENGTH),
        ],
    ),
    FieldRule::new(
        "password",
        &[
            Constraint::Required,
            Constraint::NonEmpty,
            Constraint::MinLength(MIN_PASSWORD_LENGTH),
        ],
    ),
    FieldRule::new(
        "member",
        &[
            Constraint::Required,
            Constraint::NonEmpty,
            Constraint::MaxLength(MAX_MEMBER_LENGTH),
        ],
    ),
];

/// Rules for the login payload
pub const LOGIN_RULES: &[FieldRule] = &[
    FieldRule::new(
        "email",
        &[
            Constraint::Required,
            Constraint::NonEmpty,
            Constraint::Email,
            Constraint::MinLength(MIN_EMAIL_LENGTH),
            Constraint::MaxLength(MAX_EMAIL_LENGTH),
        ],
    ),
    FieldRule::new(
        "password",
        &[
            Constraint::Required,
            Constraint::NonEmpty,
            Constraint::MinLength(MIN_PASSWORD_LENGTH),
        ],
    ),
];

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is missing
    Required { field: String },
    /// Field is present but empty
    Empty { field: String },
    /// Field is not a valid email address
    InvalidEmail { field: String },
    /// Field is shorter than allowed
    TooShort { field: String, min: usize },
    /// Field is longer than allowed
    TooLong { field: String, max: usize },
    /// Payload could not be decoded at all
    Malformed(String),
}

impl ValidationError {
    /// Name of the violated field, if the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Required { field }
            | ValidationError::Empty { field }
            | ValidationError::InvalidEmail { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. } => Some(field),
            ValidationError::Malformed(_) => None,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Required { field } => write!(f, "\"{}\" is required", field),
            ValidationError::Empty { field } => {
                write!(f, "\"{}\" is not allowed to be empty", field)
            }
            ValidationError::InvalidEmail { field } => {
                write!(f, "\"{}\" must be a valid email", field)
            }
            ValidationError::TooShort { field, min } => write!(
                f,
                "\"{}\" length must be at least {} characters long",
                field, min
            ),
            ValidationError::TooLong { field, max } => write!(
                f,
                "\"{}\" length must be less than or equal to {} characters long",
                field, max
            ),
            ValidationError::Malformed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Access to string fields of a payload by name
pub trait Fields {
    /// Value of the named field, `None` when absent
    fn field(&self, name: &str) -> Option<&str>;
}

/// Evaluate `rules` against `input`, returning the first violation
pub fn validate<T: Fields>(input: &T, rules: &[FieldRule]) -> Result<(), ValidationError> {
    for rule in rules {
        check_field(rule, input.field(rule.field))?;
    }
    Ok(())
}

fn check_field(rule: &FieldRule, value: Option<&str>) -> Result<(), ValidationError> {
    let field = rule.field.to_string();

    for constraint in rule.constraints {
        match (constraint, value) {
            (Constraint::Required, None) => return Err(ValidationError::Required { field }),
            // Absent optional fields skip the remaining checks
            (_, None) => return Ok(()),
            (Constraint::Required, Some(_)) => {}
            (Constraint::NonEmpty, Some(v)) => {
                if v.is_empty() {
                    return Err(ValidationError::Empty { field });
                }
            }
            (Constraint::Email, Some(v)) => {
                if !is_valid_email(v) {
                    return Err(ValidationError::InvalidEmail { field });
                }
            }
            (Constraint::MinLength(min), Some(v)) => {
                if v.chars().count() < *min {
                    return Err(ValidationError::TooShort { field, min: *min });
                }
            }
            (Constraint::MaxLength(max), Some(v)) => {
                if v.chars().count() > *max {
                    return Err(ValidationError::TooLong { field, max: *max });
                }
            }
        }
    }

    Ok(())
}

/// Check email syntax: `local@domain.tld`
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    // Every label between dots must be non-empty
    !domain.split('.').any(str::is_empty)
}
