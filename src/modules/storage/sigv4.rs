//! Minimal AWS Signature Version 4 signing for the few raw S3 calls that
//! rust-s3 does not expose (bucket policy).

use chrono::{DateTime, Utc};
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

pub struct Credentials<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub region: &'a str,
}

/// A request to sign. `query` must already be in canonical form.
pub struct CanonicalRequest<'a> {
    pub method: &'a str,
    pub host: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub payload: &'a [u8],
}

/// Header values to attach to the signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub amz_date: String,
    pub content_sha256: String,
    pub authorization: String,
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derive the per-day signing key for `service`
pub fn signing_key(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, InvalidLength> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date_stamp.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// Sign an S3 request at time `now`
pub fn sign_s3(
    creds: &Credentials<'_>,
    req: &CanonicalRequest<'_>,
    now: DateTime<Utc>,
) -> Result<SignedHeaders, InvalidLength> {
    let date_stamp = now.format("%Y%m%d").to_string();
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let content_sha256 = hex::encode(Sha256::digest(req.payload));

    let canonical = format!(
        "{}\n{}\n{}\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n\n{}\n{}",
        req.method,
        req.path,
        req.query,
        req.host,
        content_sha256,
        amz_date,
        SIGNED_HEADERS,
        content_sha256
    );

    let scope = format!("{}/{}/s3/aws4_request", date_stamp, creds.region);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex::encode(Sha256::digest(canonical.as_bytes()))
    );

    let key = signing_key(creds.secret_key, &date_stamp, creds.region, "s3")?;
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

    Ok(SignedHeaders {
        amz_date,
        content_sha256,
        authorization: format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, creds.access_key, scope, SIGNED_HEADERS, signature
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_signing_key_matches_aws_example() {
        // Published example from the AWS SigV4 documentation
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_sign_s3_header_layout() {
        let creds = Credentials {
            access_key: "minioadmin",
            secret_key: "minioadmin",
            region: "us-east-1",
        };
        let req = CanonicalRequest {
            method: "PUT",
            host: "localhost:9000",
            path: "/kompas-pacitan",
            query: "policy=",
            payload: b"{}",
        };
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();

        let signed = sign_s3(&creds, &req, now).unwrap();

        assert_eq!(signed.amz_date, "20260301T083000Z");
        assert_eq!(
            signed.content_sha256,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
        let prefix = "AWS4-HMAC-SHA256 Credential=minioadmin/20260301/us-east-1/s3/aws4_request, \
                      SignedHeaders=host;x-amz-content-sha256;x-amz-date, Signature=";
        assert!(signed.authorization.starts_with(prefix));
        assert_eq!(signed.authorization.len(), prefix.len() + 64);

        // Deterministic for identical inputs, sensitive to payload
        assert_eq!(sign_s3(&creds, &req, now).unwrap(), signed);
        let other = CanonicalRequest { payload: b"[]", ..req };
        assert_ne!(sign_s3(&creds, &other, now).unwrap(), signed);
    }
}
