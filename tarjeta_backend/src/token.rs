//! Stateless authentication tokens.
//!
//! A token has the form `user_id.issued.nonce.hmac`, where `issued` is a Unix
//! timestamp in seconds and `nonce` and `hmac` are unpadded base64url.
//! The HMAC-SHA512 covers the first three fields.

use super::errors::*;
use crypto::hmac::Hmac;
use crypto::mac::Mac;
use crypto::sha2::Sha512;
use chrono::{DateTime, Duration, TimeZone, offset::Utc};
use data_encoding::BASE64URL_NOPAD;

pub const NONCE_BITS: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub struct AuthToken {
    pub user_id: i32,
    pub issued: DateTime<Utc>,
}

pub fn fresh_nonce() -> Result<[u8; NONCE_BITS / 8]> {
    use rand::RngCore;
    use rand::rngs::OsRng;
    let mut nonce = [0_u8; NONCE_BITS / 8];
    OsRng.try_fill_bytes(&mut nonce)
        .chain_err(|| "Unable to connect to the system random number generator!")?;
    Ok(nonce)
}

fn hmac_for(payload: &str, secret_key: &[u8]) -> Vec<u8> {
    let mut hmac_maker = Hmac::new(Sha512::new(), secret_key);
    hmac_maker.input(payload.as_bytes());
    hmac_maker.result().code().to_vec()
}

pub fn issue(user_id: i32, secret_key: &[u8], now: DateTime<Utc>) -> Result<String> {
    let nonce = fresh_nonce()?;
    let payload = format!("{}.{}.{}", user_id, now.timestamp(), BASE64URL_NOPAD.encode(&nonce[..]));
    let hmac = hmac_for(&payload, secret_key);
    Ok(format!("{}.{}", payload, BASE64URL_NOPAD.encode(&hmac)))
}

pub fn verify(token: &str,
              secret_key: &[u8],
              max_age: Duration,
              now: DateTime<Utc>)
              -> Result<AuthToken> {
    use crypto::util::fixed_time_eq;

    let split_at = token.rfind('.').ok_or(ErrorKind::BadToken)?;
    let (payload, hmac) = (&token[..split_at], &token[split_at + 1..]);

    let mut fields = payload.split('.');
    let (user_id, issued, nonce) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(u), Some(i), Some(n), None) => (u, i, n),
        _ => bail!(ErrorKind::BadToken),
    };
    let user_id: i32 = user_id.parse().chain_err(|| ErrorKind::BadToken)?;
    let issued: i64 = issued.parse().chain_err(|| ErrorKind::BadToken)?;
    BASE64URL_NOPAD.decode(nonce.as_bytes()).chain_err(|| ErrorKind::BadToken)?;
    let hmac = BASE64URL_NOPAD.decode(hmac.as_bytes()).chain_err(|| ErrorKind::BadToken)?;

    if !fixed_time_eq(&hmac_for(payload, secret_key), &hmac) {
        warn!("The HMAC doesn't agree with the token!");
        bail!(ErrorKind::AuthError);
    }

    let issued = Utc.timestamp_opt(issued, 0).single().ok_or(ErrorKind::BadToken)?;
    let expired = issued.checked_add_signed(max_age).map_or(true, |expires| expires < now);
    if expired {
        debug!("Token of user {} issued at {} has expired.", user_id, issued);
        bail!(ErrorKind::AuthError);
    }

    Ok(AuthToken { user_id, issued })
}


#[cfg(test)]
const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

#[test]
fn test_issue_verify() {
    let now = Utc::now();
    let token = issue(42, KEY, now).unwrap();
    let auth = verify(&token, KEY, Duration::days(30), now).unwrap();
    assert_eq!(auth.user_id, 42);
    assert_eq!(auth.issued.timestamp(), now.timestamp());
}

#[test]
fn test_tokens_are_unique() {
    let now = Utc::now();
    assert_ne!(issue(1, KEY, now).unwrap(), issue(1, KEY, now).unwrap());
}

#[test]
fn test_wrong_key() {
    let now = Utc::now();
    let token = issue(42, KEY, now).unwrap();
    match verify(&token, b"another key entirely", Duration::days(30), now) {
        Err(Error(ErrorKind::AuthError, _)) => (),
        other => panic!("Expected AuthError, got {:?}", other),
    }
}

#[test]
fn test_tampered_user_id() {
    let now = Utc::now();
    let token = issue(42, KEY, now).unwrap();
    let tampered = token.replacen("42.", "43.", 1);
    match verify(&tampered, KEY, Duration::days(30), now) {
        Err(Error(ErrorKind::AuthError, _)) => (),
        other => panic!("Expected AuthError, got {:?}", other),
    }
}

#[test]
fn test_expired() {
    let issued = Utc::now() - Duration::days(31);
    let token = issue(42, KEY, issued).unwrap();
    assert!(verify(&token, KEY, Duration::days(30), Utc::now()).is_err());
    assert!(verify(&token, KEY, Duration::days(32), Utc::now()).is_ok());
}

#[test]
fn test_expiry_overflow_counts_as_expired() {
    let now = Utc::now();
    let token = issue(42, KEY, now).unwrap();
    match verify(&token, KEY, Duration::max_value(), now) {
        Err(Error(ErrorKind::AuthError, _)) => (),
        other => panic!("Expected AuthError, got {:?}", other),
    }
}

#[test]
fn test_malformed() {
    let now = Utc::now();
    for token in &["", "garbage", "1.2.3", "a.b.c.d", "1.2.3.4.5", "1.2.!!!.AAAA"] {
        match verify(token, KEY, Duration::days(30), now) {
            Err(Error(ErrorKind::BadToken, _)) => (),
            other => panic!("Expected BadToken for {:?}, got {:?}", token, other),
        }
    }
}
