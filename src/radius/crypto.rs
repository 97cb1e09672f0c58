//! Cryptographic primitives required by the RADIUS wire format: RFC 2865
//! §5.2 attribute hiding and its salted variant, CHAP verification, and the
//! request/response authenticator digests.

use crate::error::{Error, Result};

/// Hides a plaintext under the RFC 2865 keystream.
///
/// The plaintext is zero-padded to a multiple of 16 bytes, then XORed block
/// by block:
///
/// ```text
/// b1 = MD5(secret | authenticator | salt)    c1 = p1 ^ b1
/// bi = MD5(secret | c(i-1))                  ci = pi ^ bi
/// ```
///
/// `salt` is empty for plain hiding and two bytes for the salted variant.
pub fn hide(plain: &[u8], authenticator: &[u8; 16], secret: &[u8], salt: &[u8]) -> Vec<u8> {
    let blocks = (plain.len() + 15) / 16;
    let blocks = blocks.max(1);
    let mut padded = plain.to_vec();
    padded.resize(blocks * 16, 0);

    let mut out = Vec::with_capacity(padded.len());
    let mut ctx = md5::Context::new();
    ctx.consume(secret);
    ctx.consume(authenticator);
    ctx.consume(salt);
    let mut keystream = ctx.compute().0;

    for block in padded.chunks_exact(16) {
        let start = out.len();
        for (p, b) in block.iter().zip(keystream.iter()) {
            out.push(p ^ b);
        }
        let mut ctx = md5::Context::new();
        ctx.consume(secret);
        ctx.consume(&out[start..start + 16]);
        keystream = ctx.compute().0;
    }
    out
}

/// Inverse of [`hide`]. The result is the zero-padded plaintext; callers
/// with an internal length prefix trim it afterwards.
pub fn unhide(
    cipher: &[u8],
    authenticator: &[u8; 16],
    secret: &[u8],
    salt: &[u8],
) -> Result<Vec<u8>> {
    if cipher.is_empty() || cipher.len() % 16 != 0 {
        return Err(Error::BadLength(format!(
            "hidden payload of {} bytes is not a multiple of 16",
            cipher.len()
        )));
    }

    let mut out = Vec::with_capacity(cipher.len());
    let mut ctx = md5::Context::new();
    ctx.consume(secret);
    ctx.consume(authenticator);
    ctx.consume(salt);
    let mut keystream = ctx.compute().0;

    for block in cipher.chunks_exact(16) {
        for (c, b) in block.iter().zip(keystream.iter()) {
            out.push(c ^ b);
        }
        let mut ctx = md5::Context::new();
        ctx.consume(secret);
        ctx.consume(block);
        keystream = ctx.compute().0;
    }
    Ok(out)
}

/// CHAP check: the response is `MD5(id | password | challenge)` where the
/// 17-byte attribute is `id | response`.
pub fn verify_chap(password: &[u8], chap_password: &[u8], challenge: &[u8]) -> bool {
    if chap_password.len() != 17 {
        return false;
    }
    let mut ctx = md5::Context::new();
    ctx.consume([chap_password[0]]);
    ctx.consume(password);
    ctx.consume(challenge);
    ctx.compute().0 == chap_password[1..]
}

/// The shared digest of the authenticator rules:
/// `MD5(code | id | length | auth_field | attributes | secret)`.
pub fn packet_digest(
    code: u8,
    identifier: u8,
    length: u16,
    auth_field: &[u8; 16],
    attributes: &[u8],
    secret: &[u8],
) -> [u8; 16] {
    let mut ctx = md5::Context::new();
    ctx.consume([code, identifier]);
    ctx.consume(length.to_be_bytes());
    ctx.consume(auth_field);
    ctx.consume(attributes);
    ctx.consume(secret);
    ctx.compute().0
}

pub fn random_authenticator() -> [u8; 16] {
    rand::random()
}

/// Two random salt bytes; the most significant bit is always set, per
/// RFC 2868 §3.5.
pub fn random_salt() -> [u8; 2] {
    let salt: [u8; 2] = rand::random();
    [salt[0] | 0x80, salt[1]]
}

/// Checks the authenticator of a received Accounting/Disconnect/CoA-Request
/// buffer: the digest is computed with the authenticator field zeroed.
pub fn validate_request_authenticator(buf: &[u8], secret: &[u8]) -> bool {
    validate(buf, &[0u8; 16], secret)
}

/// Checks the authenticator of a received response buffer against the
/// authenticator of the request it answers.
pub fn validate_response_authenticator(
    buf: &[u8],
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> bool {
    validate(buf, request_authenticator, secret)
}

/// [`validate_request_authenticator`] as a propagatable error.
pub fn check_request_authenticator(buf: &[u8], secret: &[u8]) -> Result<()> {
    if validate_request_authenticator(buf, secret) {
        Ok(())
    } else {
        Err(Error::CryptoMismatch("request authenticator".into()))
    }
}

/// [`validate_response_authenticator`] as a propagatable error.
pub fn check_response_authenticator(
    buf: &[u8],
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> Result<()> {
    if validate_response_authenticator(buf, request_authenticator, secret) {
        Ok(())
    } else {
        Err(Error::CryptoMismatch("response authenticator".into()))
    }
}

fn validate(buf: &[u8], auth_field: &[u8; 16], secret: &[u8]) -> bool {
    if buf.len() < 20 {
        return false;
    }
    let length = u16::from_be_bytes([buf[2], buf[3]]);
    if length as usize != buf.len() {
        return false;
    }
    let digest = packet_digest(buf[0], buf[1], length, auth_field, &buf[20..], secret);
    digest == buf[4..20]
}
