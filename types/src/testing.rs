//! Testing utilities.
//!
//! Helpers for building signed deploys in tests of this crate and of its dependents.

use rand::Rng;

use crate::{
    crypto::{AlgorithmTag, SecretKey, SECRET_KEY_LENGTH},
    Deploy, TimeDiff, Timestamp,
};

/// Returns a random secret key of the given algorithm drawn from `rng`, so that seeded tests
/// are reproducible.
pub fn random_secret_key<R: Rng + ?Sized>(rng: &mut R, algorithm: AlgorithmTag) -> SecretKey {
    loop {
        let mut bytes = [0u8; SECRET_KEY_LENGTH];
        rng.fill_bytes(&mut bytes);
        let maybe_key = match algorithm {
            AlgorithmTag::Ed25519 => SecretKey::ed25519_from_bytes(&bytes),
            // Rejected only for the zero scalar or one above the curve order.
            AlgorithmTag::Secp256k1 => SecretKey::secp256k1_from_bytes(&bytes),
        };
        if let Ok(secret_key) = maybe_key {
            return secret_key;
        }
    }
}

/// Creates a test deploy created at given instant and with given ttl.
pub fn create_test_deploy<R: Rng + ?Sized>(
    created_ago: TimeDiff,
    ttl: TimeDiff,
    now: Timestamp,
    rng: &mut R,
) -> Deploy {
    let secret_key = random_secret_key(rng, AlgorithmTag::Ed25519);
    Deploy::random_with_timestamp_and_ttl(rng, now - created_ago, ttl, &secret_key)
}

/// Creates a random deploy that is considered expired.
pub fn create_expired_deploy<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> Deploy {
    create_test_deploy(
        TimeDiff::from_seconds(20),
        TimeDiff::from_seconds(10),
        now,
        rng,
    )
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn expired_deploy_should_expire_before_now() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Timestamp::from(1_700_000_000_000);
        let deploy = create_expired_deploy(now, &mut rng);
        assert!(deploy.header().expires() < now);
        assert!(deploy.is_valid().is_ok());
    }

    #[test]
    fn seeded_keys_should_be_reproducible() {
        let first = random_secret_key(&mut StdRng::seed_from_u64(9), AlgorithmTag::Secp256k1);
        let second = random_secret_key(&mut StdRng::seed_from_u64(9), AlgorithmTag::Secp256k1);
        assert_eq!(first.to_hex(), second.to_hex());
    }
}
