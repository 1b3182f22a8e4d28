use std::path::Path;

use anyhow::{bail, Context, Error};
use serde::{Deserialize, Serialize};

use casper_deploy_types::{AlgorithmTag, PublicKey, SecretKey};

/// The TOML form of a signer's key pair.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct KeyFile {
    /// `ed25519` or `secp256k1`.
    pub algorithm: String,
    /// Raw secret key bytes, hex encoded.
    pub secret_key: String,
    /// Checked against the secret key when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<PublicKey>,
}

impl KeyFile {
    /// Describes `secret_key` and its public key.
    pub fn new(secret_key: &SecretKey) -> Self {
        KeyFile {
            algorithm: secret_key.algorithm().to_string(),
            secret_key: secret_key.to_hex(),
            public_key: Some(PublicKey::from(secret_key)),
        }
    }

    /// Parses the secret key, checking it against the recorded public key.
    pub fn secret_key(&self) -> Result<SecretKey, Error> {
        let algorithm: AlgorithmTag = self.algorithm.parse()?;
        let secret_key = SecretKey::from_hex(algorithm, &self.secret_key)?;
        if let Some(public_key) = &self.public_key {
            if *public_key != PublicKey::from(&secret_key) {
                bail!("public key {} does not match the secret key", public_key);
            }
        }
        Ok(secret_key)
    }
}

/// Reads the secret key stored in the key file at `path`.
pub fn read_secret_key<P: AsRef<Path>>(path: P) -> Result<SecretKey, Error> {
    let path = path.as_ref();
    let toml_content = std::fs::read_to_string(path)
        .with_context(|| format!("Error reading key file {}", path.display()))?;
    let key_file: KeyFile = toml::from_str(&toml_content)
        .with_context(|| format!("Error parsing key file {}", path.display()))?;
    key_file
        .secret_key()
        .with_context(|| format!("Invalid key in {}", path.display()))
}

/// Generates a fresh key pair of `algorithm`.
pub fn generate(algorithm: AlgorithmTag) -> KeyFile {
    KeyFile::new(&SecretKey::generate(algorithm))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn generated_key_file_should_read_back() {
        for algorithm in [AlgorithmTag::Ed25519, AlgorithmTag::Secp256k1] {
            let key_file = generate(algorithm);
            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(toml::to_string(&key_file).unwrap().as_bytes())
                .unwrap();

            let secret_key = read_secret_key(file.path()).unwrap();
            assert_eq!(secret_key.algorithm(), algorithm);
            assert_eq!(Some(PublicKey::from(&secret_key)), key_file.public_key);
        }
    }

    #[test]
    fn mismatched_public_key_should_be_rejected() {
        let mut key_file = generate(AlgorithmTag::Ed25519);
        key_file.public_key = generate(AlgorithmTag::Ed25519).public_key;
        assert!(key_file.secret_key().is_err());
    }

    #[test]
    fn public_key_should_be_optional() {
        let key_file: KeyFile = toml::from_str(&format!(
            "algorithm = \"secp256k1\"\nsecret_key = \"{}\"\n",
            "07".repeat(32)
        ))
        .unwrap();
        assert_eq!(
            key_file.secret_key().unwrap().algorithm(),
            AlgorithmTag::Secp256k1
        );
    }

    #[test]
    fn missing_file_should_name_the_path() {
        let error = read_secret_key("no/such/key.toml").unwrap_err();
        assert!(error.to_string().contains("no/such/key.toml"));
    }
}
