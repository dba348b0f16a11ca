//! Derived-key request signing (AWS Signature Version 4 scheme).
//!
//! Pure, stateless primitives: canonical request -> string-to-sign ->
//! HMAC-SHA256 chain of date-key, region-key, service-key, signing-key ->
//! final signature. Fully deterministic given identical inputs; no network,
//! no state.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::domain::errors::{CredentialError, CredentialResult};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const TERMINATOR: &str = "aws4_request";

/// The pieces of a request that participate in the canonical form.
///
/// `headers` must hold lowercase names sorted lexicographically, with values
/// trimmed; `payload_hash` is the lowercase hex SHA-256 of the request body.
#[derive(Debug)]
pub struct CanonicalRequest<'a> {
    /// HTTP method, uppercase.
    pub method: &'a str,
    /// URI path component, already encoded.
    pub canonical_uri: &'a str,
    /// Canonical query string (sorted, encoded), empty for POST bodies.
    pub canonical_query: &'a str,
    /// Lowercase header name/value pairs in sorted order.
    pub headers: &'a [(String, String)],
    /// Lowercase hex SHA-256 of the payload.
    pub payload_hash: &'a str,
}

/// Lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> CredentialResult<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CredentialError::SigningFailed(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Derive the signing key from the long-lived secret via the HMAC chain:
/// `AWS4<secret>` -> date -> region -> service -> terminator.
///
/// `date` is the `YYYYMMDD` scope date.
pub fn derive_signing_key(
    secret_key: &str,
    date: &str,
    region: &str,
    service: &str,
) -> CredentialResult<[u8; 32]> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes())?;
    let region_key = hmac_sha256(&date_key, region.as_bytes())?;
    let service_key = hmac_sha256(&region_key, service.as_bytes())?;
    hmac_sha256(&service_key, TERMINATOR.as_bytes())
}

/// Compute the full `Authorization` header value for a request.
///
/// `amz_date` is the `YYYYMMDDTHHMMSSZ` timestamp that was placed in the
/// `x-amz-date` header; its first eight characters form the credential scope
/// date. Deterministic: identical inputs always produce identical output.
pub fn authorization_header(
    request: &CanonicalRequest<'_>,
    amz_date: &str,
    region: &str,
    service: &str,
    access_key_id: &str,
    secret_key: &str,
) -> CredentialResult<String> {
    if amz_date.len() < 8 {
        return Err(CredentialError::SigningFailed(format!(
            "invalid signing timestamp: {amz_date}"
        )));
    }
    let scope_date = &amz_date[..8];

    let canonical_headers = request
        .headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n");
    let signed_headers = request
        .headers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n\n{}\n{}",
        request.method,
        request.canonical_uri,
        request.canonical_query,
        canonical_headers,
        signed_headers,
        request.payload_hash
    );

    let credential_scope = format!("{scope_date}/{region}/{service}/{TERMINATOR}");
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{credential_scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let signing_key = derive_signing_key(secret_key, scope_date, region, service)?;
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

    Ok(format!(
        "{ALGORITHM} Credential={access_key_id}/{credential_scope}, \
         SignedHeaders={signed_headers}, Signature={signature}"
    ))
}
