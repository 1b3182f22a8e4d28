use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
#[cfg(any(feature = "testing", test))]
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    bytesrepr::{self, FromBytes, ToBytes},
    crypto::{self, PublicKey, SecretKey, Signature},
    digest::Digest,
    executable_deploy_item::ExecutableDeployItem,
    timestamp::{TimeDiff, Timestamp},
    validation::{DeployConfigurationFailure, DeployValidationFailure, ExcessiveSizeError},
};

/// The maximum permissible size in bytes of a Deploy when serialized via `ToBytes`.
///
/// Note: this should be kept in sync with the value of `[deploys.max_deploy_size]` in the
/// production chainspec.
pub const MAX_SERIALIZED_SIZE_OF_DEPLOY: u32 = 1_024 * 1_024;

/// A cryptographic hash uniquely identifying a [`Deploy`].
#[derive(
    Copy, Clone, Default, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, Debug,
)]
#[serde(deny_unknown_fields)]
pub struct DeployHash(Digest);

impl DeployHash {
    /// Returns a new `DeployHash`.
    pub fn new(digest: Digest) -> Self {
        DeployHash(digest)
    }

    /// Returns a copy of the wrapped `Digest`.
    pub fn inner(&self) -> Digest {
        self.0
    }
}

impl From<Digest> for DeployHash {
    fn from(digest: Digest) -> Self {
        Self(digest)
    }
}

impl From<DeployHash> for Digest {
    fn from(deploy_hash: DeployHash) -> Self {
        deploy_hash.0
    }
}

impl Display for DeployHash {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl ToBytes for DeployHash {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.0.write_bytes(writer)
    }
}

impl FromBytes for DeployHash {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        Digest::from_bytes(bytes).map(|(digest, remainder)| (DeployHash(digest), remainder))
    }
}

impl AsRef<[u8]> for DeployHash {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// The header portion of a [`Deploy`].
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct DeployHeader {
    account: PublicKey,
    timestamp: Timestamp,
    ttl: TimeDiff,
    gas_price: u64,
    body_hash: Digest,
    dependencies: Vec<DeployHash>,
    chain_name: String,
}

impl DeployHeader {
    /// Returns the account within which the deploy will be run.
    pub fn account(&self) -> &PublicKey {
        &self.account
    }

    /// Returns the deploy creation timestamp.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the duration for which the deploy will stay valid.
    pub fn ttl(&self) -> TimeDiff {
        self.ttl
    }

    /// Returns the price per gas unit for this deploy.
    pub fn gas_price(&self) -> u64 {
        self.gas_price
    }

    /// Returns the hash of the body of this deploy.
    pub fn body_hash(&self) -> Digest {
        self.body_hash
    }

    /// Other deploys that have to be run before this one.
    pub fn dependencies(&self) -> &[DeployHash] {
        &self.dependencies
    }

    /// Returns the chain name of the network the deploy is supposed to be run on.
    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }

    /// Returns the moment after which the deploy is no longer accepted.
    pub fn expires(&self) -> Timestamp {
        self.timestamp + self.ttl
    }
}

impl Display for DeployHeader {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "deploy header {{ account {}, timestamp {}, ttl {}, body hash {}, chain name {} }}",
            self.account, self.timestamp, self.ttl, self.body_hash, self.chain_name,
        )
    }
}

impl ToBytes for DeployHeader {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        self.account.serialized_length()
            + self.timestamp.serialized_length()
            + self.ttl.serialized_length()
            + self.gas_price.serialized_length()
            + self.body_hash.serialized_length()
            + self.dependencies.serialized_length()
            + self.chain_name.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.account.write_bytes(writer)?;
        self.timestamp.write_bytes(writer)?;
        self.ttl.write_bytes(writer)?;
        self.gas_price.write_bytes(writer)?;
        self.body_hash.write_bytes(writer)?;
        self.dependencies.write_bytes(writer)?;
        self.chain_name.write_bytes(writer)
    }
}

impl FromBytes for DeployHeader {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (account, remainder) = PublicKey::from_bytes(bytes)?;
        let (timestamp, remainder) = Timestamp::from_bytes(remainder)?;
        let (ttl, remainder) = TimeDiff::from_bytes(remainder)?;
        let (gas_price, remainder) = u64::from_bytes(remainder)?;
        let (body_hash, remainder) = Digest::from_bytes(remainder)?;
        let (dependencies, remainder) = Vec::<DeployHash>::from_bytes(remainder)?;
        let (chain_name, remainder) = String::from_bytes(remainder)?;
        let header = DeployHeader {
            account,
            timestamp,
            ttl,
            gas_price,
            body_hash,
            dependencies,
            chain_name,
        };
        Ok((header, remainder))
    }
}

/// The signature of a deploy and the public key of the signer.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Approval {
    signer: PublicKey,
    signature: Signature,
}

impl Approval {
    /// Returns an approval built from a signature produced elsewhere.
    pub fn new(signer: PublicKey, signature: Signature) -> Self {
        Self { signer, signature }
    }

    /// Signs `hash` with `secret_key`.
    pub fn create(hash: &DeployHash, secret_key: &SecretKey) -> Self {
        let signer = PublicKey::from(secret_key);
        let signature = crypto::sign(hash, secret_key);
        Self { signer, signature }
    }

    /// Returns the public key.
    pub fn signer(&self) -> &PublicKey {
        &self.signer
    }

    /// Returns the signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl ToBytes for Approval {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        self.signer.serialized_length() + self.signature.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.signer.write_bytes(writer)?;
        self.signature.write_bytes(writer)
    }
}

impl FromBytes for Approval {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (signer, remainder) = PublicKey::from_bytes(bytes)?;
        let (signature, remainder) = Signature::from_bytes(remainder)?;
        Ok((Approval { signer, signature }, remainder))
    }
}

/// A signed item sent to the network used to request execution of Wasm.
///
/// Everything except the approvals is fixed once constructed. Deserializing does not recompute
/// the hashes; use [`Deploy::validate`] to check a deploy of unknown provenance.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Deploy {
    hash: DeployHash,
    header: DeployHeader,
    payment: ExecutableDeployItem,
    session: ExecutableDeployItem,
    approvals: Vec<Approval>,
}

impl Deploy {
    /// The default time-to-live for `Deploy`s, i.e. 30 minutes.
    pub const DEFAULT_TTL: TimeDiff = TimeDiff::from_millis(30 * 60 * 1_000);
    /// The default gas price for `Deploy`s, i.e. `1`.
    pub const DEFAULT_GAS_PRICE: u64 = 1;

    /// Constructs a new, unsigned `Deploy`, computing its body hash and hash.
    ///
    /// Repeated dependencies are dropped, keeping the first occurrence.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp: Timestamp,
        ttl: TimeDiff,
        gas_price: u64,
        dependencies: Vec<DeployHash>,
        chain_name: String,
        account: PublicKey,
        payment: ExecutableDeployItem,
        session: ExecutableDeployItem,
    ) -> Result<Deploy, bytesrepr::Error> {
        let body_hash = compute_body_hash(&payment, &session)?;

        // Remove duplicates.
        let dependencies = dependencies.into_iter().unique().collect();
        let header = DeployHeader {
            account,
            timestamp,
            ttl,
            gas_price,
            body_hash,
            dependencies,
            chain_name,
        };
        let hash = compute_deploy_hash(&header)?;
        info!(
            "Constructed deploy {} ({} payment, {} session)",
            hash,
            payment.discriminant(),
            session.discriminant()
        );

        Ok(Deploy {
            hash,
            header,
            payment,
            session,
            approvals: vec![],
        })
    }

    /// Adds a signature of this deploy's hash to its approvals.
    ///
    /// The algorithm is that of `secret_key`. Approvals are appended in call order and repeated
    /// signers are kept.
    pub fn sign(&mut self, secret_key: &SecretKey) {
        let approval = Approval::create(&self.hash, secret_key);
        debug!("Signed deploy {} as {}", self.hash, approval.signer);
        self.approvals.push(approval);
    }

    /// Appends an approval produced elsewhere, without checking it.
    pub fn add_approval(&mut self, approval: Approval) {
        debug!("Added approval by {} to deploy {}", approval.signer, self.hash);
        self.approvals.push(approval);
    }

    /// Returns the hash uniquely identifying this deploy.
    pub fn hash(&self) -> &DeployHash {
        &self.hash
    }

    /// Returns the header portion of the deploy.
    pub fn header(&self) -> &DeployHeader {
        &self.header
    }

    /// Returns the payment code of the deploy.
    pub fn payment(&self) -> &ExecutableDeployItem {
        &self.payment
    }

    /// Returns the session code of the deploy.
    pub fn session(&self) -> &ExecutableDeployItem {
        &self.session
    }

    /// Returns the approvals, in the order they were added.
    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    /// Recomputes the body hash and the hash and compares them with the stored ones.
    pub fn validate(&self) -> Result<(), DeployValidationFailure> {
        let computed_body_hash = compute_body_hash(&self.payment, &self.session)?;
        if computed_body_hash != self.header.body_hash {
            warn!(
                "Deploy {} has invalid body hash: provided {}, computed {}",
                self.hash,
                self.header.body_hash.to_hex(),
                computed_body_hash.to_hex()
            );
            return Err(DeployValidationFailure::InvalidBodyHash {
                provided: self.header.body_hash,
                computed: computed_body_hash,
            });
        }

        let computed_hash = compute_deploy_hash(&self.header)?;
        if computed_hash != self.hash {
            warn!(
                "Deploy {} has invalid hash: computed {}",
                self.hash.inner().to_hex(),
                computed_hash.inner().to_hex()
            );
            return Err(DeployValidationFailure::InvalidDeployHash {
                provided: self.hash.inner(),
                computed: computed_hash.inner(),
            });
        }

        Ok(())
    }

    /// Checks the hashes, then that there is at least one approval and that every approval's
    /// signature verifies against the deploy hash.
    pub fn is_valid(&self) -> Result<(), DeployValidationFailure> {
        self.validate()?;

        if self.approvals.is_empty() {
            warn!("Deploy {} has no approvals", self.hash);
            return Err(DeployValidationFailure::EmptyApprovals);
        }

        for (index, approval) in self.approvals.iter().enumerate() {
            if let Err(error) = crypto::verify(self.hash, &approval.signature, &approval.signer) {
                warn!("Deploy {} has invalid approval {}: {}", self.hash, index, error);
                return Err(DeployValidationFailure::InvalidApproval {
                    index,
                    error_msg: error.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Checks the deploy against the limits of the chain named `chain_name`.
    pub fn is_config_compliant(
        &self,
        chain_name: &str,
        max_ttl: TimeDiff,
        max_dependencies: u8,
    ) -> Result<(), DeployConfigurationFailure> {
        if self.header.chain_name != chain_name {
            return Err(DeployConfigurationFailure::InvalidChainName {
                expected: chain_name.to_string(),
                got: self.header.chain_name.clone(),
            });
        }

        if self.header.dependencies.len() > max_dependencies as usize {
            return Err(DeployConfigurationFailure::ExcessiveDependencies {
                max_dependencies,
                got: self.header.dependencies.len(),
            });
        }

        if self.header.ttl > max_ttl {
            return Err(DeployConfigurationFailure::ExcessiveTimeToLive {
                max_ttl,
                got: self.header.ttl,
            });
        }

        let deploy_size = self.serialized_length();
        if deploy_size > MAX_SERIALIZED_SIZE_OF_DEPLOY as usize {
            return Err(ExcessiveSizeError {
                max_deploy_size: MAX_SERIALIZED_SIZE_OF_DEPLOY,
                actual_deploy_size: deploy_size,
            }
            .into());
        }

        Ok(())
    }

    /// Generates a random instance signed by `secret_key`.
    #[cfg(any(feature = "testing", test))]
    pub fn random<R: Rng + ?Sized>(rng: &mut R, secret_key: &SecretKey) -> Self {
        let timestamp = Timestamp::random(rng);
        let ttl = TimeDiff::from_millis(rng.gen_range(60_000..3_600_000));
        Deploy::random_with_timestamp_and_ttl(rng, timestamp, ttl, secret_key)
    }

    /// Generates a random instance but using the specified `timestamp` and `ttl`.
    #[cfg(any(feature = "testing", test))]
    pub fn random_with_timestamp_and_ttl<R: Rng + ?Sized>(
        rng: &mut R,
        timestamp: Timestamp,
        ttl: TimeDiff,
        secret_key: &SecretKey,
    ) -> Self {
        let gas_price = rng.gen_range(1..100);

        let dependencies = vec![
            DeployHash::new(Digest::hash(rng.gen::<u64>().to_le_bytes())),
            DeployHash::new(Digest::hash(rng.gen::<u64>().to_le_bytes())),
            DeployHash::new(Digest::hash(rng.gen::<u64>().to_le_bytes())),
        ];
        let chain_name = String::from("casper-example");

        let payment = ExecutableDeployItem::new_standard_payment(rng.gen_range(1..1_000_000u64))
            .unwrap_or_else(|error| panic!("should build standard payment: {}", error));
        let session = rng.gen();

        let mut deploy = Deploy::new(
            timestamp,
            ttl,
            gas_price,
            dependencies,
            chain_name,
            PublicKey::from(secret_key),
            payment,
            session,
        )
        .unwrap_or_else(|error| panic!("should construct random deploy: {}", error));
        deploy.sign(secret_key);
        deploy
    }
}

impl Display for Deploy {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "deploy {{ {}, account {}, timestamp {}, ttl {}, body hash {}, chain name {} }}",
            self.hash,
            self.header.account,
            self.header.timestamp,
            self.header.ttl,
            self.header.body_hash,
            self.header.chain_name
        )
    }
}

impl ToBytes for Deploy {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut buffer = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }

    fn serialized_length(&self) -> usize {
        self.header.serialized_length()
            + self.hash.serialized_length()
            + self.payment.serialized_length()
            + self.session.serialized_length()
            + self.approvals.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.header.write_bytes(writer)?;
        self.hash.write_bytes(writer)?;
        self.payment.write_bytes(writer)?;
        self.session.write_bytes(writer)?;
        self.approvals.write_bytes(writer)
    }
}

impl FromBytes for Deploy {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (header, remainder) = DeployHeader::from_bytes(bytes)?;
        let (hash, remainder) = DeployHash::from_bytes(remainder)?;
        let (payment, remainder) = ExecutableDeployItem::from_bytes(remainder)?;
        let (session, remainder) = ExecutableDeployItem::from_bytes(remainder)?;
        let (approvals, remainder) = Vec::<Approval>::from_bytes(remainder)?;
        let deploy = Deploy {
            hash,
            header,
            payment,
            session,
            approvals,
        };
        Ok((deploy, remainder))
    }
}

/// Hashes the payment and session encodings, concatenated.
fn compute_body_hash(
    payment: &ExecutableDeployItem,
    session: &ExecutableDeployItem,
) -> Result<Digest, bytesrepr::Error> {
    let mut buffer = Vec::with_capacity(payment.serialized_length() + session.serialized_length());
    payment.write_bytes(&mut buffer)?;
    session.write_bytes(&mut buffer)?;
    Ok(Digest::hash(buffer))
}

fn compute_deploy_hash(header: &DeployHeader) -> Result<DeployHash, bytesrepr::Error> {
    let serialized_header = header.to_bytes()?;
    Ok(DeployHash::new(Digest::hash(serialized_header)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        bytesrepr::Bytes,
        crypto::tests::{ed25519_secret_key, secp256k1_secret_key},
        runtime_args,
        uint::U512,
    };

    struct Inputs {
        timestamp: Timestamp,
        ttl: TimeDiff,
        gas_price: u64,
        dependencies: Vec<DeployHash>,
        chain_name: String,
        account: PublicKey,
        payment: ExecutableDeployItem,
        session: ExecutableDeployItem,
    }

    impl Inputs {
        fn fixed() -> Self {
            Inputs {
                timestamp: Timestamp::from(1_605_573_564_072),
                ttl: TimeDiff::from_seconds(3_600),
                gas_price: 1,
                dependencies: vec![DeployHash::new(Digest::hash(b"dependency"))],
                chain_name: "casper-test".to_string(),
                account: PublicKey::from(&ed25519_secret_key(1)),
                payment: ExecutableDeployItem::new_standard_payment(2_500_000_000u64).unwrap(),
                session: ExecutableDeployItem::new_stored_contract_by_name(
                    "faucet".to_string(),
                    "call_faucet".to_string(),
                    runtime_args! { "amount" => U512::from(1_000u64) }.unwrap(),
                ),
            }
        }

        fn build(self) -> Deploy {
            Deploy::new(
                self.timestamp,
                self.ttl,
                self.gas_price,
                self.dependencies,
                self.chain_name,
                self.account,
                self.payment,
                self.session,
            )
            .unwrap()
        }
    }

    #[test]
    fn construction_should_be_deterministic() {
        let first = Inputs::fixed().build();
        let second = Inputs::fixed().build();
        assert_eq!(first.hash(), second.hash());
        assert_eq!(first.header().body_hash(), second.header().body_hash());
        assert!(first.validate().is_ok());
    }

    #[test]
    fn hashes_should_follow_the_encoding() {
        let deploy = Inputs::fixed().build();
        let mut body = deploy.payment().to_bytes().unwrap();
        body.extend(deploy.session().to_bytes().unwrap());
        assert_eq!(deploy.header().body_hash(), Digest::hash(&body));
        assert_eq!(
            deploy.hash().inner(),
            Digest::hash(deploy.header().to_bytes().unwrap())
        );
    }

    #[test]
    fn changing_any_single_input_should_change_the_hash() {
        let reference = Inputs::fixed().build();
        let variations: Vec<Box<dyn Fn(&mut Inputs)>> = vec![
            Box::new(|inputs| inputs.timestamp = Timestamp::from(1_605_573_564_073)),
            Box::new(|inputs| inputs.ttl = TimeDiff::from_seconds(3_601)),
            Box::new(|inputs| inputs.gas_price = 2),
            Box::new(|inputs| inputs.dependencies.clear()),
            Box::new(|inputs| inputs.chain_name = "casper-tesu".to_string()),
            Box::new(|inputs| inputs.account = PublicKey::from(&ed25519_secret_key(2))),
            Box::new(|inputs| {
                inputs.payment =
                    ExecutableDeployItem::new_standard_payment(2_500_000_001u64).unwrap()
            }),
            Box::new(|inputs| {
                inputs.session = ExecutableDeployItem::new_stored_contract_by_name(
                    "faucet".to_string(),
                    "call_faucez".to_string(),
                    runtime_args! { "amount" => U512::from(1_000u64) }.unwrap(),
                )
            }),
        ];
        for (index, vary) in variations.iter().enumerate() {
            let mut inputs = Inputs::fixed();
            vary(&mut inputs);
            let deploy = inputs.build();
            assert_ne!(deploy.hash(), reference.hash(), "variation {}", index);
        }
    }

    #[test]
    fn body_changes_should_change_the_body_hash() {
        let reference = Inputs::fixed().build();
        let mut inputs = Inputs::fixed();
        inputs.payment = ExecutableDeployItem::new_module_bytes(
            Bytes::from(vec![0]),
            runtime_args! { "amount" => U512::from(2_500_000_000u64) }.unwrap(),
        );
        let deploy = inputs.build();
        assert_ne!(deploy.header().body_hash(), reference.header().body_hash());
    }

    #[test]
    fn dependencies_should_be_deduplicated_in_order() {
        let a = DeployHash::new(Digest::hash(b"a"));
        let b = DeployHash::new(Digest::hash(b"b"));
        let mut inputs = Inputs::fixed();
        inputs.dependencies = vec![b, a, b, a];
        let deploy = inputs.build();
        assert_eq!(deploy.header().dependencies(), &[b, a]);
    }

    #[test]
    fn validate_should_report_tampered_body_hash() {
        let mut deploy = Inputs::fixed().build();
        let original = deploy.header.body_hash;
        deploy.header.body_hash = Digest::hash(b"tampered");
        let failure = deploy.validate().unwrap_err();
        assert_eq!(
            failure,
            DeployValidationFailure::InvalidBodyHash {
                provided: Digest::hash(b"tampered"),
                computed: original,
            }
        );
        assert!(failure.to_string().contains(&original.to_hex()));
    }

    #[test]
    fn validate_should_report_corrupted_hash() {
        let mut deploy = Inputs::fixed().build();
        let original = deploy.hash;
        deploy.hash = DeployHash::new(Digest::hash(b"corrupt"));
        assert_eq!(
            deploy.validate(),
            Err(DeployValidationFailure::InvalidDeployHash {
                provided: Digest::hash(b"corrupt"),
                computed: original.inner(),
            })
        );
    }

    #[test]
    fn validate_should_catch_tampering_through_json() {
        let deploy = Inputs::fixed().build();
        let mut json = serde_json::to_value(&deploy).unwrap();
        json["header"]["gas_price"] = serde_json::json!(5);
        let tampered: Deploy = serde_json::from_value(json).unwrap();
        assert!(matches!(
            tampered.validate(),
            Err(DeployValidationFailure::InvalidDeployHash { .. })
        ));
    }

    #[test]
    fn signing_should_append_approvals_in_call_order() {
        let first_key = ed25519_secret_key(1);
        let second_key = secp256k1_secret_key(2);
        let mut deploy = Inputs::fixed().build();
        let hash = *deploy.hash();
        let header = deploy.header().clone();

        deploy.sign(&first_key);
        deploy.sign(&second_key);

        let signers: Vec<PublicKey> = deploy.approvals().iter().map(|a| *a.signer()).collect();
        assert_eq!(
            signers,
            vec![PublicKey::from(&first_key), PublicKey::from(&second_key)]
        );
        assert_eq!(
            deploy.approvals()[0].signature().algorithm(),
            crypto::AlgorithmTag::Ed25519
        );
        assert_eq!(
            deploy.approvals()[1].signature().algorithm(),
            crypto::AlgorithmTag::Secp256k1
        );
        assert_eq!(deploy.hash(), &hash);
        assert_eq!(deploy.header(), &header);
        assert!(deploy.is_valid().is_ok());
    }

    #[test]
    fn duplicate_signers_should_be_kept() {
        let key = ed25519_secret_key(1);
        let mut deploy = Inputs::fixed().build();
        deploy.sign(&key);
        deploy.sign(&key);
        assert_eq!(deploy.approvals().len(), 2);
    }

    #[test]
    fn is_valid_should_require_an_approval() {
        let deploy = Inputs::fixed().build();
        assert_eq!(deploy.is_valid(), Err(DeployValidationFailure::EmptyApprovals));
    }

    #[test]
    fn is_valid_should_reject_approval_for_another_deploy() {
        let key = ed25519_secret_key(1);
        let mut deploy = Inputs::fixed().build();
        deploy.sign(&key);
        let foreign = Approval::create(&DeployHash::new(Digest::hash(b"other")), &key);
        deploy.add_approval(foreign);
        assert!(matches!(
            deploy.is_valid(),
            Err(DeployValidationFailure::InvalidApproval { index: 1, .. })
        ));
    }

    #[test]
    fn config_compliance_should_check_chain_limits() {
        let deploy = Inputs::fixed().build();
        assert_eq!(
            deploy.is_config_compliant("casper-test", TimeDiff::from_seconds(86_400), 10),
            Ok(())
        );
        assert!(matches!(
            deploy.is_config_compliant("casper", TimeDiff::from_seconds(86_400), 10),
            Err(DeployConfigurationFailure::InvalidChainName { .. })
        ));
        assert_eq!(
            deploy.is_config_compliant("casper-test", TimeDiff::from_seconds(60), 10),
            Err(DeployConfigurationFailure::ExcessiveTimeToLive {
                max_ttl: TimeDiff::from_seconds(60),
                got: TimeDiff::from_seconds(3_600),
            })
        );
        assert_eq!(
            deploy.is_config_compliant("casper-test", TimeDiff::from_seconds(86_400), 0),
            Err(DeployConfigurationFailure::ExcessiveDependencies {
                max_dependencies: 0,
                got: 1,
            })
        );
    }

    #[test]
    fn signed_deploy_should_survive_bytes_and_json() {
        let mut rng = StdRng::seed_from_u64(11);
        let deploy = Deploy::random(&mut rng, &secp256k1_secret_key(4));
        assert_eq!(deploy.to_bytes().unwrap().len(), deploy.serialized_length());

        let decoded: Deploy = bytesrepr::deserialize(deploy.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, deploy);

        let json = serde_json::to_string(&deploy).unwrap();
        let decoded: Deploy = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, deploy);
        assert!(decoded.is_valid().is_ok());
    }

    #[test]
    fn expiry_should_be_timestamp_plus_ttl() {
        let deploy = Inputs::fixed().build();
        assert_eq!(
            deploy.header().expires(),
            Timestamp::from(1_605_573_564_072 + 3_600_000)
        );
    }
}
