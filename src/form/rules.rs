// Validation engine - runs the field-rule battery over one form snapshot
//
// One pass evaluates every field in declaration order and collects every
// failure; nothing short-circuits. The returned ValidationResult carries
// the accepted data record only when the whole battery passed.

use super::{Field, FieldError, FormSnapshot, ValidationResult};
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

pub const MSG_NAME_REQUIRED: &str = "Nome é obrigatório";
pub const MSG_EMAIL_INVALID: &str = "E-mail inválido";
pub const MSG_DOCUMENT_INVALID: &str = "CPF inválido (11 números)";
pub const MSG_PHONE_INVALID: &str = "Telefone inválido";
pub const MSG_BIRTH_DATE_REQUIRED: &str = "Data de nascimento obrigatória";
pub const MSG_BIRTH_DATE_INVALID: &str = "Data de nascimento inválida";
pub const MSG_AGE_OUT_OF_RANGE: &str = "Você deve ter entre 18 e 90 anos para se cadastrar";
pub const MSG_ADDRESS_REQUIRED: &str = "Endereço obrigatório";
pub const MSG_POSTAL_CODE_INVALID: &str = "CEP inválido";
pub const MSG_CITY_REQUIRED: &str = "Cidade obrigatória";
pub const MSG_STATE_INVALID: &str = "Informe UF (2 letras)";

/// Accepted age range, inclusive on both ends
const MIN_AGE: i32 = 18;
const MAX_AGE: i32 = 90;

/// Loose email shape: something@something.something, no whitespace. The
/// match is deliberately unanchored; any value containing the shape passes.
fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

/// Count only the digit characters, so formatted values like
/// "123.456.789-00" validate on their substance
fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

/// Whole years between `birth` and `today`, decremented when today's
/// month/day has not yet reached the birth month/day
fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Validate a form snapshot against today's date.
pub fn validate(snapshot: &FormSnapshot) -> ValidationResult {
    validate_at(snapshot, Local::now().date_naive())
}

/// Validate with an explicit "today", so the age boundaries are testable.
pub fn validate_at(snapshot: &FormSnapshot, today: NaiveDate) -> ValidationResult {
    let mut errors = Vec::new();
    let mut fail = |field: Field, message: &str| {
        errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    };

    let trimmed_empty = |v: Option<&str>| v.map_or(true, |v| v.trim().is_empty());

    if trimmed_empty(snapshot.value(Field::Name)) {
        fail(Field::Name, MSG_NAME_REQUIRED);
    }

    let email_ok = snapshot
        .value(Field::Email)
        .is_some_and(|v| email_re().is_match(v));
    if !email_ok {
        fail(Field::Email, MSG_EMAIL_INVALID);
    }

    if snapshot
        .value(Field::DocumentId)
        .map_or(0, digit_count)
        < 11
    {
        fail(Field::DocumentId, MSG_DOCUMENT_INVALID);
    }

    if snapshot.value(Field::Phone).map_or(0, digit_count) < 10 {
        fail(Field::Phone, MSG_PHONE_INVALID);
    }

    match snapshot.value(Field::BirthDate) {
        None | Some("") => fail(Field::BirthDate, MSG_BIRTH_DATE_REQUIRED),
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(birth) => {
                let age = age_in_years(birth, today);
                if !(MIN_AGE..=MAX_AGE).contains(&age) {
                    fail(Field::BirthDate, MSG_AGE_OUT_OF_RANGE);
                }
            }
            Err(_) => fail(Field::BirthDate, MSG_BIRTH_DATE_INVALID),
        },
    }

    if trimmed_empty(snapshot.value(Field::Address)) {
        fail(Field::Address, MSG_ADDRESS_REQUIRED);
    }

    if snapshot.value(Field::PostalCode).map_or(0, digit_count) < 8 {
        fail(Field::PostalCode, MSG_POSTAL_CODE_INVALID);
    }

    if trimmed_empty(snapshot.value(Field::City)) {
        fail(Field::City, MSG_CITY_REQUIRED);
    }

    // UF is exactly two characters after trimming. Nothing constrains the
    // characters themselves, so "12" passes just like "SP".
    let state_ok = snapshot
        .value(Field::State)
        .is_some_and(|v| v.trim().chars().count() == 2);
    if !state_ok {
        fail(Field::State, MSG_STATE_INVALID);
    }

    let valid = errors.is_empty();
    ValidationResult {
        valid,
        data: if valid {
            snapshot.entries().to_vec()
        } else {
            Vec::new()
        },
        errors,
    }
}
