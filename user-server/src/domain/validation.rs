use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Default, Clone, Copy)]
pub struct UserPayload<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
}

pub fn is_valid_email_format(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_password_length(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

pub fn validate_user_payload(payload: &UserPayload<'_>, for_update: bool) -> Option<String> {
    if for_update {
        check_user_update(payload).err()
    } else {
        check_new_user(payload).err()
    }
}

// Fields are checked one at a time: name, then email and its format.
pub fn check_user_update<'a>(payload: &UserPayload<'a>) -> Result<ValidUser<'a>, String> {
    let name = present(payload.name).ok_or_else(|| missing("name"))?;

    let email = present(payload.email).ok_or_else(|| missing("email"))?;
    if !is_valid_email_format(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(ValidUser { name, email })
}

pub fn check_new_user<'a>(payload: &UserPayload<'a>) -> Result<(ValidUser<'a>, &'a str), String> {
    let user = check_user_update(payload)?;

    let password = present(payload.password).ok_or_else(|| missing("password"))?;
    if !is_valid_password_length(password) {
        return Err("Password too short".to_string());
    }

    Ok((user, password))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn missing(field: &str) -> String {
    format!("Missing or empty {}", field)
}
