// Field-level validation for booking and guest payloads.
//
// Each validator appends to a shared error list so the caller can report
// every problem in one response.

use chrono::{Months, NaiveDate};

use crate::domain::entities::GuestDetails;
use crate::domain::errors::FieldError;

const MAX_NAME_LEN: usize = 64;
const MAX_CODE_LEN: usize = 64;
const MAX_AGE_YEARS: u32 = 120;
const MAX_DOCUMENT_NAME_LEN: usize = 64;

pub fn validate_property_id(value: &str, errors: &mut Vec<FieldError>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new("property_id", "property_id is required"));
    } else if trimmed.chars().count() > MAX_CODE_LEN {
        errors.push(FieldError::new("property_id", "property_id is too long"));
    }
    trimmed.to_string()
}

pub fn validate_confirmation_code(value: &str, errors: &mut Vec<FieldError>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(
            "confirmation_code",
            "confirmation_code is required",
        ));
    } else if trimmed.chars().count() > MAX_CODE_LEN {
        errors.push(FieldError::new(
            "confirmation_code",
            "confirmation_code is too long",
        ));
    } else if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        errors.push(FieldError::new(
            "confirmation_code",
            "confirmation_code may only contain letters, digits and '-'",
        ));
    }
    trimmed.to_string()
}

pub fn validate_stay(check_in: NaiveDate, check_out: NaiveDate, errors: &mut Vec<FieldError>) {
    if check_out <= check_in {
        errors.push(FieldError::new(
            "check_out",
            "check_out must be after check_in",
        ));
    }
}

// Validates one guest entry; `prefix` scopes field names, e.g. `guests[0]`.
pub fn validate_guest(
    prefix: &str,
    details: &GuestDetails,
    today: NaiveDate,
    errors: &mut Vec<FieldError>,
) {
    let field = |name: &str| format!("{prefix}.{name}");

    if let Some(message) = name_problem(&details.first_name) {
        errors.push(FieldError::new(field("first_name"), message));
    }
    if let Some(message) = name_problem(&details.last_name) {
        errors.push(FieldError::new(field("last_name"), message));
    }

    if details.date_of_birth > today {
        errors.push(FieldError::new(
            field("date_of_birth"),
            "date_of_birth is in the future",
        ));
    } else if today
        .checked_sub_months(Months::new(12 * MAX_AGE_YEARS))
        .is_some_and(|limit| details.date_of_birth < limit)
    {
        errors.push(FieldError::new(
            field("date_of_birth"),
            "date_of_birth is too far in the past",
        ));
    }

    let nationality = &details.nationality;
    if nationality.len() != 2 || !nationality.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(FieldError::new(
            field("nationality"),
            "nationality must be an ISO 3166 alpha-2 code",
        ));
    }

    let document_number = details.document_number.trim();
    let len = document_number.chars().count();
    if !(4..=32).contains(&len) || !document_number.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(FieldError::new(
            field("document_number"),
            "document_number must be 4-32 letters or digits",
        ));
    }

    if let Some(email) = non_blank(&details.email) {
        if !is_plausible_email(email) {
            errors.push(FieldError::new(field("email"), "invalid email"));
        }
    }

    if let Some(phone) = non_blank(&details.phone) {
        if !is_plausible_phone(phone) {
            errors.push(FieldError::new(field("phone"), "invalid phone"));
        }
    }
}

// A guest may only reference a document uploaded for their own booking,
// i.e. a URL of the form `<allowed_prefix><file name>`.
pub fn validate_document_url(
    prefix: &str,
    document_url: &Option<String>,
    allowed_prefix: &str,
    errors: &mut Vec<FieldError>,
) {
    let Some(url) = non_blank(document_url) else {
        return;
    };

    let file_name_ok = url
        .strip_prefix(allowed_prefix)
        .filter(|name| !name.is_empty() && name.len() <= MAX_DOCUMENT_NAME_LEN)
        .is_some_and(|name| {
            !name.starts_with('.')
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        });
    if allowed_prefix.is_empty() || !file_name_ok {
        errors.push(FieldError::new(
            format!("{prefix}.document_url"),
            "document_url must reference a document uploaded for this booking",
        ));
    }
}

// Returns the trimmed value when present and not blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn name_problem(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Some("required");
    }
    if len > MAX_NAME_LEN {
        return Some("too long");
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphabetic() || matches!(c, ' ' | '\'' | '-' | '.'))
    {
        return Some("contains invalid characters");
    }
    None
}

fn is_plausible_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !value.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn is_plausible_phone(value: &str) -> bool {
    let rest = value.strip_prefix('+').unwrap_or(value);
    let digits = rest.chars().filter(char::is_ascii_digit).count();
    (6..=20).contains(&digits)
        && rest
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-'))
}
