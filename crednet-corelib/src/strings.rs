//! String libraries.

use chrono::{DateTime, SecondsFormat, Utc};
use hex;
use hmac::Hmac;
use pbkdf2;
use rand::{Rng, distr::Alphanumeric, rng};
use regex::Regex;
use sha2::{Digest, Sha256};
use url::Url;

const PASSWORD_ROUNDS: u32 = 10000;

/// To check if the account is valid.
pub fn is_account(account: &str) -> bool {
    let name_regex = Regex::new(r"^[a-z0-9]{1}[a-z0-9_-]*$").unwrap();
    let email_regex = Regex::new(
        r"^([a-z0-9_+]([a-z0-9_+.]*[a-z0-9_+])?)@([a-z0-9]+([\-\.]{1}[a-z0-9]+)*\.[a-z]{2,6})",
    )
    .unwrap();

    name_regex.is_match(account) || email_regex.is_match(account)
}

/// To check if the (client) scope is valid.
pub fn is_scope(scope: &str) -> bool {
    let regex = Regex::new(r"^[a-z0-9]+([_\.]{1}[a-z0-9]+)*$").unwrap();
    regex.is_match(scope)
}

/// To check if the (redirect) URI is valid.
pub fn is_uri(uri: &str) -> bool {
    Url::parse(uri).is_ok()
}

/// To check if the symbolic name is in the canonical `§(name)` form.
pub fn is_symbolic_name(name: &str) -> bool {
    let regex = Regex::new(r"^§\([A-Za-z0-9_]{2,20}\)$").unwrap();
    regex.is_match(name)
}

/// To wrap a plain display name into the `§(name)` symbolic form.
///
/// Names that already carry the `§` marker are returned unchanged.
pub fn format_symbolic_name(name: &str) -> String {
    if name.len() == 0 {
        return "§(Anonymous)".to_string();
    } else if name.starts_with("§") {
        return name.to_string();
    }
    format!("§({})", name)
}

/// To extract the plain name from the `§(name)` symbolic form.
pub fn symbolic_name_plain(symbolic_name: &str) -> String {
    if symbolic_name.len() == 0 {
        return "Anonymous".to_string();
    }
    let regex = Regex::new(r"§\(([^)]+)\)").unwrap();
    match regex.captures(symbolic_name) {
        None => symbolic_name.replace("§", ""),
        Some(caps) => caps.get(1).unwrap().as_str().to_string(),
    }
}

/// To hash the password.
pub fn password_hash(password: &str, salt: &str) -> String {
    let mut res: [u8; 32] = [0; 32];
    let _ = pbkdf2::pbkdf2::<Hmac<Sha256>>(
        password.as_bytes(),
        salt.as_bytes(),
        PASSWORD_ROUNDS,
        &mut res,
    );
    hex::encode(res)
}

/// To generate item ID in `[timestamp-milliseconds]-[random-alphanumeric]` format.
pub fn random_id(time: &DateTime<Utc>, len: usize) -> String {
    format!("{}-{}", time.timestamp_millis(), randomstring(len))
}

/// To generate hex-string item ID using [`random_id`] and additional hash.
pub fn random_id_sha(time: &DateTime<Utc>, len: usize) -> String {
    let str = random_id(time, len);
    let mut hasher = Sha256::new();
    hasher.update(str.as_bytes());
    hex::encode(hasher.finalize())
}

/// To generate random alphanumeric string with the specified length.
pub fn randomstring(len: usize) -> String {
    let mut rng = rng();
    std::iter::repeat(())
        .map(|()| rng.sample(Alphanumeric))
        .map(char::from)
        .take(len)
        .collect()
}

/// To convert time to ISO8601 format with milliseconds precision (`YYYY-MM-DDThh:mm:ss.SSSZ`).
pub fn time_str(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
