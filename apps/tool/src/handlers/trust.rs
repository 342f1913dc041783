use anyhow::{Context, Result};
use bedrock::crypto::{Certificate, TrustChain};
use std::fs;
use std::path::Path;
use tracing::debug;

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn check_trust(
    cert: &Path,
    issuer: &Path,
    trusted: Option<&Path>,
    ignore_validity: bool,
) -> Result<()> {
    let certificate = Certificate::from_pem(&read(cert)?)
        .with_context(|| format!("Failed to parse {}", cert.display()))?;
    let issuer = Certificate::from_pem(&read(issuer)?)
        .with_context(|| format!("Failed to parse {}", issuer.display()))?;
    let chain = match trusted {
        Some(bundle) => TrustChain::from_pem_bundle(&read(bundle)?)
            .with_context(|| format!("Failed to parse {}", bundle.display()))?,
        None => TrustChain::default(),
    }
    .with_validity_check(!ignore_validity);
    debug!(trusted = chain.len(), ignore_validity, "Loaded trust list");

    let decision = chain
        .verify_with_issuer(&certificate, &issuer)
        .with_context(|| format!("{} is not trusted", certificate.subject()))?;

    println!("trusted: {} ({decision})", certificate.subject());
    println!("fingerprint: {}", certificate.fingerprint());
    Ok(())
}
