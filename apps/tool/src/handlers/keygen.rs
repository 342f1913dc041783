use anyhow::{Context, Result, bail};
use bedrock::crypto::{KeySpec, PemKeyPair, generate, generate_ed25519};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const PRIVATE_KEY_FILE: &str = "private.pem";
const PUBLIC_KEY_FILE: &str = "public.pem";

pub fn generate_keys(spec: &str, out: Option<&Path>, raw: bool) -> Result<()> {
    let spec: KeySpec = spec.parse()?;
    debug!(%spec, raw, "Generating key pair");

    if raw {
        if spec != KeySpec::Ed25519 {
            bail!("--raw is only available for ed25519 keys, not {spec}");
        }
        let pair = generate_ed25519()?;
        println!("private: {}", hex::encode(pair.private_bytes()));
        println!("public: {}", hex::encode(pair.public_bytes()));
        return Ok(());
    }

    let pair = generate(spec)?;
    match out {
        Some(dir) => write_pair(&pair, dir)?,
        None => print!("{}{}", pair.private_pem(), pair.public_pem()),
    }
    println!("fingerprint: {}", pair.fingerprint());

    Ok(())
}

fn write_pair(pair: &PemKeyPair, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let private = dir.join(PRIVATE_KEY_FILE);
    fs::write(&private, pair.private_pem())
        .with_context(|| format!("Failed to write {}", private.display()))?;
    restrict(&private)?;

    let public = dir.join(PUBLIC_KEY_FILE);
    fs::write(&public, pair.public_pem())
        .with_context(|| format!("Failed to write {}", public.display()))?;

    info!(dir = %dir.display(), "Wrote key pair");
    println!("wrote {} and {}", private.display(), public.display());
    Ok(())
}

#[cfg(unix)]
fn restrict(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to restrict permissions of {}", path.display()))
}

#[cfg(not(unix))]
fn restrict(_path: &Path) -> Result<()> {
    Ok(())
}
