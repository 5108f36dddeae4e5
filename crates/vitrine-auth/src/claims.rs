//! Bearer credential claims extraction.
//!
//! Credentials arrive as three dot-separated base64url segments; only the
//! middle (claims) segment is read here. No signature verification happens
//! in this module. The claims feed display and expiry checks, not a trust
//! decision, and the issuer's key casing is inconsistent, so alternate
//! spellings are folded into one canonical record.

use base64::{engine::general_purpose::URL_SAFE, Engine};
use serde_json::{Map, Value};

/// Claims extracted from a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialClaims {
    /// Stable subject id.
    pub subject: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Given name.
    pub given_name: Option<String>,
    /// Family name.
    pub family_name: Option<String>,
    /// Login handle.
    pub username: Option<String>,
    /// Expiry as epoch seconds.
    pub expires_at: Option<i64>,
    /// Issue time as epoch seconds.
    pub issued_at: Option<i64>,
}

/// Decode the claims segment of a bearer credential.
///
/// Returns `None` for anything that is not a three-segment token carrying
/// a base64url JSON object in the middle. Never panics.
pub fn decode_claims(token: &str) -> Option<CredentialClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let bytes = decode_segment(segments[1])?;
    let value: Value = serde_json::from_slice(&bytes).ok()?;
    let map = value.as_object()?;

    Some(CredentialClaims {
        subject: string_claim(map, &["sub", "id", "userId", "nameid"]),
        email: string_claim(map, &["email", "Email"]),
        name: string_claim(map, &["name", "Name"]),
        given_name: string_claim(map, &["given_name", "firstName", "first_name"]),
        family_name: string_claim(map, &["family_name", "lastName", "last_name"]),
        username: string_claim(map, &["username", "preferred_username", "unique_name"]),
        expires_at: epoch_claim(map, &["exp"]),
        issued_at: epoch_claim(map, &["iat"]),
    })
}

/// Base64url-decode one segment, restoring padding first. Stored tokens
/// often arrive with the trailing `=` stripped.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let padded = match segment.len() % 4 {
        2 => format!("{}==", segment),
        3 => format!("{}=", segment),
        _ => segment.to_string(),
    };
    URL_SAFE.decode(padded).ok()
}

/// First matching key wins. Numeric values are stringified so numeric
/// subject ids normalize the same way string ids do.
fn string_claim(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match map.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn epoch_claim(map: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    for key in keys {
        match map.get(*key) {
            Some(Value::Number(n)) => {
                return n.as_i64().or_else(|| n.as_f64().map(|f| f as i64));
            }
            Some(Value::String(s)) => {
                if let Ok(epoch) = s.parse::<i64>() {
                    return Some(epoch);
                }
            }
            _ => {}
        }
    }
    None
}
