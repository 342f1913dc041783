//! # Certificate trust
//!
//! A certificate is trusted when it is the issuer itself, when it appears in the trust list,
//! or when its signature verifies against the issuer or one of the trusted certificates.
//! Every check fails closed: parse and verification errors count as "not trusted".

use bedrock_errors::FoundationError;
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use x509_parser::certificate::X509Certificate;
use x509_parser::parse_x509_certificate;
use x509_parser::pem::Pem;

const PEM_LABEL: &str = "CERTIFICATE";

/// An X.509 certificate held as DER, with its names and validity period extracted up front.
///
/// Equality and hashing use the DER bytes only.
#[derive(Clone)]
pub struct Certificate {
    der: Vec<u8>,
    subject: String,
    issuer: String,
    subject_raw: Vec<u8>,
    issuer_raw: Vec<u8>,
    not_before: i64,
    not_after: i64,
}

impl Certificate {
    /// # Errors
    /// Returns [`FoundationError::Certificate`] if `der` is not a complete X.509 certificate.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Result<Self, FoundationError> {
        let der = der.into();
        let (subject, issuer, subject_raw, issuer_raw, not_before, not_after) = {
            let (rest, cert) = parse_x509_certificate(&der).map_err(|e| {
                FoundationError::certificate(format!("invalid DER certificate: {e}"))
            })?;
            if !rest.is_empty() {
                return Err(FoundationError::certificate("trailing data after DER certificate"));
            }
            let validity = cert.validity();
            (
                cert.subject().to_string(),
                cert.issuer().to_string(),
                cert.subject().as_raw().to_vec(),
                cert.issuer().as_raw().to_vec(),
                validity.not_before.timestamp(),
                validity.not_after.timestamp(),
            )
        };

        Ok(Self { der, subject, issuer, subject_raw, issuer_raw, not_before, not_after })
    }

    /// Parses the first `CERTIFICATE` block of a PEM document.
    ///
    /// # Errors
    /// Returns [`FoundationError::Certificate`] if no certificate block is found or it is invalid.
    pub fn from_pem(pem: &str) -> Result<Self, FoundationError> {
        Self::bundle_from_pem(pem)?
            .into_iter()
            .next()
            .ok_or_else(|| FoundationError::certificate("no CERTIFICATE block in PEM input"))
    }

    /// Parses every `CERTIFICATE` block of a PEM bundle, skipping other block types.
    ///
    /// # Errors
    /// Returns [`FoundationError::Certificate`] if any block is malformed.
    pub fn bundle_from_pem(pem: &str) -> Result<Vec<Self>, FoundationError> {
        let mut certificates = Vec::new();
        for block in Pem::iter_from_buffer(pem.as_bytes()) {
            let block = block
                .map_err(|e| FoundationError::certificate(format!("invalid PEM block: {e}")))?;
            if block.label == PEM_LABEL {
                certificates.push(Self::from_der(block.contents)?);
            }
        }
        Ok(certificates)
    }

    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Distinguished name of the subject, RFC 4514 style (`CN=example, O=Org`).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Lowercase hex SHA-256 of the DER encoding.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.der))
    }

    /// Whether `unix_seconds` falls inside the validity period.
    #[must_use]
    pub const fn is_valid_at(&self, unix_seconds: i64) -> bool {
        self.not_before <= unix_seconds && unix_seconds <= self.not_after
    }

    /// Whether the certificate is currently inside its validity period.
    #[must_use]
    pub fn is_currently_valid(&self) -> bool {
        self.is_valid_at(now())
    }

    /// Subject equals issuer and the signature verifies with the certificate's own key.
    #[must_use]
    pub fn is_self_signed(&self) -> bool {
        self.is_signed_by(self).unwrap_or(false)
    }

    /// Whether `signer` issued this certificate: its subject must equal this certificate's
    /// issuer name and its public key must verify this certificate's signature.
    ///
    /// # Errors
    /// Returns [`FoundationError::Certificate`] if either certificate cannot be re-parsed.
    pub fn is_signed_by(&self, signer: &Self) -> Result<bool, FoundationError> {
        if signer.subject_raw != self.issuer_raw {
            return Ok(false);
        }

        let cert = parse(&self.der)?;
        let issuer = parse(&signer.der)?;
        let verified = cert.verify_signature(Some(issuer.public_key())).is_ok();
        debug!(
            subject = %self.subject,
            signer = %signer.subject,
            verified,
            "Checked certificate signature"
        );

        Ok(verified)
    }
}

fn parse(der: &[u8]) -> Result<X509Certificate<'_>, FoundationError> {
    parse_x509_certificate(der)
        .map(|(_, cert)| cert)
        .map_err(|e| FoundationError::certificate(format!("invalid DER certificate: {e}")))
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs().cast_signed())
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for Certificate {}

impl Hash for Certificate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.der.hash(state);
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject)
            .field("issuer", &self.issuer)
            .field("fingerprint", &self.fingerprint())
            .finish_non_exhaustive()
    }
}

/// Why a certificate was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustDecision {
    /// The certificate is the issuer itself.
    Identical,
    /// The certificate is a member of the trust list.
    ExplicitlyTrusted,
    /// The issuer's key verifies the certificate's signature.
    SignedByIssuer,
    /// The trusted certificate at `index` verifies the certificate's signature.
    SignedByTrusted { index: usize },
}

impl fmt::Display for TrustDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identical => f.write_str("identical to issuer"),
            Self::ExplicitlyTrusted => f.write_str("explicitly trusted"),
            Self::SignedByIssuer => f.write_str("signed by issuer"),
            Self::SignedByTrusted { index } => write!(f, "signed by trusted certificate #{index}"),
        }
    }
}

/// Decides whether `cert` is trusted given its claimed `issuer` and a trust list.
///
/// Checks, in order: identity with `issuer`, membership in `trusted`, a signature by `issuer`,
/// and a signature by each trusted certificate. Signature-based decisions also require `cert`
/// and its signer to be inside their validity periods.
///
/// # Errors
/// Returns [`FoundationError::Certificate`] when no check succeeds.
pub fn verify_trust(
    cert: &Certificate,
    issuer: &Certificate,
    trusted: &[Certificate],
) -> Result<TrustDecision, FoundationError> {
    evaluate(cert, Some(issuer), trusted, true)
}

/// [`verify_trust`] as a boolean.
#[must_use]
pub fn is_trusted(cert: &Certificate, issuer: &Certificate, trusted: &[Certificate]) -> bool {
    verify_trust(cert, issuer, trusted).is_ok()
}

fn evaluate(
    cert: &Certificate,
    issuer: Option<&Certificate>,
    trusted: &[Certificate],
    check_validity: bool,
) -> Result<TrustDecision, FoundationError> {
    if issuer.is_some_and(|issuer| issuer == cert) {
        return Ok(TrustDecision::Identical);
    }
    if trusted.contains(cert) {
        return Ok(TrustDecision::ExplicitlyTrusted);
    }

    let vouches = |signer: &Certificate| {
        if !cert.is_signed_by(signer).unwrap_or(false) {
            return false;
        }
        if check_validity && !signer.is_currently_valid() {
            warn!(signer = %signer.subject, "Ignored signer outside its validity period");
            return false;
        }
        true
    };
    let decision = if issuer.is_some_and(vouches) {
        Some(TrustDecision::SignedByIssuer)
    } else {
        trusted
            .iter()
            .position(vouches)
            .map(|index| TrustDecision::SignedByTrusted { index })
    };

    match decision {
        Some(_) if check_validity && !cert.is_currently_valid() => {
            warn!(subject = %cert.subject, "Rejected certificate outside its validity period");
            Err(FoundationError::certificate_for(
                cert.subject.clone(),
                "certificate is outside its validity period",
            ))
        },
        Some(decision) => Ok(decision),
        None => {
            warn!(subject = %cert.subject, issuer = %cert.issuer, "Rejected untrusted certificate");
            Err(FoundationError::certificate_for(
                cert.subject.clone(),
                format!("certificate issued by '{}' is not trusted", cert.issuer),
            ))
        },
    }
}

/// An owned trust list.
#[derive(Debug, Clone)]
pub struct TrustChain {
    trusted: Vec<Certificate>,
    check_validity: bool,
}

impl Default for TrustChain {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TrustChain {
    /// A chain over `trusted` with validity checking enabled.
    #[must_use]
    pub const fn new(trusted: Vec<Certificate>) -> Self {
        Self { trusted, check_validity: true }
    }

    /// A chain over every certificate in a PEM bundle.
    ///
    /// # Errors
    /// Returns [`FoundationError::Certificate`] if the bundle is malformed.
    pub fn from_pem_bundle(pem: &str) -> Result<Self, FoundationError> {
        Ok(Self::new(Certificate::bundle_from_pem(pem)?))
    }

    /// Enables or disables the validity-period check of signature-based decisions. The check
    /// covers both the certificate and the signer that vouches for it.
    #[must_use]
    pub const fn with_validity_check(mut self, enabled: bool) -> Self {
        self.check_validity = enabled;
        self
    }

    pub fn push(&mut self, cert: Certificate) {
        self.trusted.push(cert);
    }

    #[must_use]
    pub fn contains(&self, cert: &Certificate) -> bool {
        self.trusted.contains(cert)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.trusted.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.trusted.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.trusted.iter()
    }

    /// Accepts `cert` if it is in the list or signed by a member of it.
    ///
    /// # Errors
    /// Returns [`FoundationError::Certificate`] when neither holds.
    pub fn verify(&self, cert: &Certificate) -> Result<TrustDecision, FoundationError> {
        evaluate(cert, None, &self.trusted, self.check_validity)
    }

    /// Like [`verify_trust`] but using this chain's trust list and validity setting.
    ///
    /// # Errors
    /// Returns [`FoundationError::Certificate`] when no check succeeds.
    pub fn verify_with_issuer(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
    ) -> Result<TrustDecision, FoundationError> {
        evaluate(cert, Some(issuer), &self.trusted, self.check_validity)
    }
}

impl FromIterator<Certificate> for TrustChain {
    fn from_iter<I: IntoIterator<Item = Certificate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
