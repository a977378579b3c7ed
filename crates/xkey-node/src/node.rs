use xkey_crypto::Signature;
use xkey_types::{CurveAlgorithm, DerivationConfig, NetworkDescriptor};
use zeroize::Zeroizing;

use crate::ed25519::Ed25519Node;
use crate::error::{KeyError, KeyResult};
use crate::payload::{ExtendedKeyPayload, KEY_DATA_SIZE};
use crate::secp256k1::Secp256k1Node;

/// A node in an HD key tree on either supported curve.
///
/// The variant is fixed by the network's curve when the node is created and
/// never changes along a tree. Every operation returns a new node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyNode {
    Ed25519(Ed25519Node),
    Secp256k1(Secp256k1Node),
}

macro_rules! dispatch {
    ($self:expr, $node:ident => $body:expr) => {
        match $self {
            KeyNode::Ed25519($node) => $body,
            KeyNode::Secp256k1($node) => $body,
        }
    };
}

impl KeyNode {
    /// Master node for `seed` on `network`.
    ///
    /// `config` selects the MAC and digest of an ed25519 tree; secp256k1
    /// trees always use BIP32's HMAC-SHA512.
    pub fn from_seed(
        seed: &[u8],
        network: NetworkDescriptor,
        config: DerivationConfig,
    ) -> KeyResult<Self> {
        match network.curve() {
            CurveAlgorithm::Ed25519 => Ed25519Node::from_seed(seed, network, config).map(Self::Ed25519),
            CurveAlgorithm::Secp256k1 => Secp256k1Node::from_seed(seed, network).map(Self::Secp256k1),
        }
    }

    /// Decode a Base58Check extended key for `network`.
    pub fn from_base58(
        encoded: &str,
        network: NetworkDescriptor,
        config: DerivationConfig,
    ) -> KeyResult<Self> {
        let payload = ExtendedKeyPayload::from_base58(encoded)?;
        Self::from_payload(&payload, network, config)
    }

    /// Build a node of the payload's network curve.
    pub fn from_payload(
        payload: &ExtendedKeyPayload,
        network: NetworkDescriptor,
        config: DerivationConfig,
    ) -> KeyResult<Self> {
        match network.curve() {
            CurveAlgorithm::Ed25519 => {
                Ed25519Node::from_payload(payload, network, config).map(Self::Ed25519)
            }
            CurveAlgorithm::Secp256k1 => {
                Secp256k1Node::from_payload(payload, network).map(Self::Secp256k1)
            }
        }
    }

    /// Binary extended-key payload.
    pub fn to_payload(&self) -> ExtendedKeyPayload {
        dispatch!(self, n => n.to_payload())
    }

    /// Base58Check extended key.
    pub fn to_base58(&self) -> String {
        dispatch!(self, n => n.to_base58())
    }

    /// Curve of the underlying tree.
    pub fn curve(&self) -> CurveAlgorithm {
        dispatch!(self, n => n.curve())
    }

    /// Network this node encodes for.
    pub fn network(&self) -> NetworkDescriptor {
        dispatch!(self, n => n.network())
    }

    /// Derive the child at `index` under the curve's rules.
    pub fn derive(&self, index: u32) -> KeyResult<Self> {
        match self {
            Self::Ed25519(n) => n.derive(index).map(Self::Ed25519),
            Self::Secp256k1(n) => n.derive(index).map(Self::Secp256k1),
        }
    }

    /// Derive the hardened child `index + 2^31`.
    pub fn derive_hardened(&self, index: u32) -> KeyResult<Self> {
        match self {
            Self::Ed25519(n) => n.derive_hardened(index).map(Self::Ed25519),
            Self::Secp256k1(n) => n.derive_hardened(index).map(Self::Secp256k1),
        }
    }

    /// Walk `path` from this node.
    pub fn derive_path(&self, path: &str) -> KeyResult<Self> {
        match self {
            Self::Ed25519(n) => n.derive_path(path).map(Self::Ed25519),
            Self::Secp256k1(n) => n.derive_path(path).map(Self::Secp256k1),
        }
    }

    /// Public-only projection of this node.
    pub fn neutered(&self) -> Self {
        match self {
            Self::Ed25519(n) => Self::Ed25519(n.neutered()),
            Self::Secp256k1(n) => Self::Secp256k1(n.neutered()),
        }
    }

    /// True when the node carries no private key.
    pub fn is_neutered(&self) -> bool {
        dispatch!(self, n => n.is_neutered())
    }

    /// True at depth zero.
    pub fn is_master(&self) -> bool {
        dispatch!(self, n => n.is_master())
    }

    /// Private scalar, or `MissingPrivateKey` on a neutered node.
    pub fn private_key(&self) -> KeyResult<Zeroizing<[u8; 32]>> {
        match self {
            Self::Ed25519(n) => n.private_key().map(|k| Zeroizing::new(*k)),
            Self::Secp256k1(n) => n.private_key(),
        }
    }

    /// Raw public key: the 32-byte point on ed25519, the 33-byte compressed
    /// point on secp256k1.
    pub fn public_key(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(n) => n.public_key().to_vec(),
            Self::Secp256k1(n) => n.public_key().to_vec(),
        }
    }

    /// The public key as it appears in a public payload.
    pub fn key_data(&self) -> [u8; KEY_DATA_SIZE] {
        match self {
            Self::Ed25519(n) => n.key_data(),
            Self::Secp256k1(n) => n.public_key(),
        }
    }

    /// `hash160` of the public key.
    pub fn identifier(&self) -> [u8; 20] {
        dispatch!(self, n => n.identifier())
    }

    /// First four identifier bytes, big-endian.
    pub fn fingerprint(&self) -> u32 {
        dispatch!(self, n => n.fingerprint())
    }

    /// Chain code fed to child derivation.
    pub fn chain_code(&self) -> &[u8; 32] {
        dispatch!(self, n => n.chain_code())
    }

    /// Distance from the master node.
    pub fn depth(&self) -> u8 {
        dispatch!(self, n => n.depth())
    }

    /// Index this node was derived at.
    pub fn child_index(&self) -> u32 {
        dispatch!(self, n => n.child_index())
    }

    /// Fingerprint of the parent, zero for a master node.
    pub fn parent_fingerprint(&self) -> u32 {
        dispatch!(self, n => n.parent_fingerprint())
    }

    /// EdDSA on ed25519, ECDSA over SHA-256 on secp256k1.
    pub fn sign(&self, message: &[u8]) -> KeyResult<Signature> {
        dispatch!(self, n => n.sign(message))
    }

    /// Check `signature` over `message` with the curve's scheme.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        dispatch!(self, n => n.verify(message, signature))
    }

    /// Salted shared key with `their_public_key`. ed25519 only.
    pub fn derive_shared_key(
        &self,
        salt: &[u8; 32],
        their_public_key: &[u8; 32],
    ) -> KeyResult<[u8; 32]> {
        match self {
            Self::Ed25519(n) => n.derive_shared_key(salt, their_public_key),
            Self::Secp256k1(_) => Err(KeyError::UnsupportedOperation {
                operation: "shared-key derivation",
                curve: CurveAlgorithm::Secp256k1,
            }),
        }
    }
}

impl From<Ed25519Node> for KeyNode {
    fn from(node: Ed25519Node) -> Self {
        Self::Ed25519(node)
    }
}

impl From<Secp256k1Node> for KeyNode {
    fn from(node: Secp256k1Node) -> Self {
        Self::Secp256k1(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::HARDENED_OFFSET;
    use xkey_crypto::encode_check;
    use xkey_types::{DigestAlgorithm, MacAlgorithm};

    const SEED_1: &str = "000102030405060708090a0b0c0d0e0f";
    const SEED_2: &str = "fffcf9f6f3f0edeae7e4e1dedbd8d5d2cfccc9c6c3c0bdbab7b4b1aeaba8a5a29f9c999693908d8a8784817e7b7875726f6c696663605d5a5754514e4b484542";

    // (path, private key, key data)
    const VECTOR_1: [(&str, &str, &str); 5] = [
        (
            "m/0'",
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3",
            "008c8a13df77a28f3445213a0f432fde644acaa215fc72dcdf300d5efaa85d350c",
        ),
        (
            "m/0'/1'",
            "b1d0bad404bf35da785a64ca1ac54b2617211d2777696fbffaf208f746ae84f2",
            "001932a5270f335bed617d5b935c80aedb1a35bd9fc1e31acafd5372c30f5c1187",
        ),
        (
            "m/0'/1'/2'",
            "92a5b23c0b8a99e37d07df3fb9966917f5d06e02ddbd909c7e184371463e9fc9",
            "00ae98736566d30ed0e9d2f4486a64bc95740d89c7db33f52121f8ea8f76ff0fc1",
        ),
        (
            "m/0'/1'/2'/2'",
            "30d1dc7e5fc04c31219ab25a27ae00b50f6fd66622f6e9c913253d6511d1e662",
            "008abae2d66361c879b900d204ad2cc4984fa2aa344dd7ddc46007329ac76c429c",
        ),
        (
            "m/0'/1'/2'/2'/1000000000'",
            "8f94d394a8e8fd6b1bc2f3f49f5c47e385281d5c17e65324b0f62483e37e8793",
            "003c24da049451555d51a7014a37337aa4e12d41e485abccfa46b47dfb2af54b7a",
        ),
    ];

    const VECTOR_2: [(&str, &str, &str); 5] = [
        (
            "m/0'",
            "1559eb2bbec5790b0c65d8693e4d0875b1747f4970ae8b650486ed7470845635",
            "0086fab68dcb57aa196c77c5f264f215a112c22a912c10d123b0d03c3c28ef1037",
        ),
        (
            "m/0'/2147483647'",
            "ea4f5bfe8694d8bb74b7b59404632fd5968b774ed545e810de9c32a4fb4192f4",
            "005ba3b9ac6e90e83effcd25ac4e58a1365a9e35a3d3ae5eb07b9e4d90bcf7506d",
        ),
        (
            "m/0'/2147483647'/1'",
            "3757c7577170179c7868353ada796c839135b3d30554bbb74a4b1e4a5a58505c",
            "002e66aa57069c86cc18249aecf5cb5a9cebbfd6fadeab056254763874a9352b45",
        ),
        (
            "m/0'/2147483647'/1'/2147483646'",
            "5837736c89570de861ebc173b1086da4f505d4adb387c6a1b1342d5e4ac9ec72",
            "00e33c0f7d81d843c572275f287498e8d408654fdf0d1e065b84e2e6f157aab09b",
        ),
        (
            "m/0'/2147483647'/1'/2147483646'/2'",
            "551d333177df541ad876a60ea71f00447931c0a9da16f227c11ea080d7391b8d",
            "0047150c75db263559a70d5778bf36abbab30fb061ad69f69ece61a72b0cfa4fc0",
        ),
    ];

    fn master(seed: &str, network: NetworkDescriptor) -> KeyNode {
        KeyNode::from_seed(&hex::decode(seed).unwrap(), network, DerivationConfig::default())
            .unwrap()
    }

    fn check_vector(seed: &str, vector: &[(&str, &str, &str)]) {
        let m = master(seed, NetworkDescriptor::CATAPULT);
        let mut parent = m.clone();
        for (path, private_key, key_data) in vector {
            let node = m.derive_path(path).unwrap();
            assert_eq!(hex::encode(*node.private_key().unwrap()), *private_key, "{path}");
            assert_eq!(hex::encode(node.key_data()), *key_data, "{path}");
            assert_eq!(node.parent_fingerprint(), parent.fingerprint(), "{path}");
            assert_eq!(node.depth(), parent.depth() + 1);
            assert!(node.child_index() >= HARDENED_OFFSET);
            parent = node;
        }
    }

    #[test]
    fn slip10_ed25519_vector1() {
        check_vector(SEED_1, &VECTOR_1);
    }

    #[test]
    fn slip10_ed25519_vector2() {
        check_vector(SEED_2, &VECTOR_2);
    }

    #[test]
    fn curve_follows_network() {
        assert_eq!(master(SEED_1, NetworkDescriptor::CATAPULT).curve(), CurveAlgorithm::Ed25519);
        assert_eq!(master(SEED_1, NetworkDescriptor::BITCOIN).curve(), CurveAlgorithm::Secp256k1);
        assert_eq!(
            master(SEED_1, NetworkDescriptor::CATAPULT_PUBLIC).network(),
            NetworkDescriptor::CATAPULT
        );
    }

    #[test]
    fn hardened_only_on_ed25519() {
        let m = master(SEED_1, NetworkDescriptor::CATAPULT);
        for index in [0, 1, HARDENED_OFFSET - 1] {
            assert_eq!(m.derive(index).unwrap_err(), KeyError::UnsupportedDerivation);
            assert_eq!(
                m.neutered().derive(index).unwrap_err(),
                KeyError::UnsupportedDerivation
            );
        }
        assert_eq!(
            m.neutered().derive(HARDENED_OFFSET).unwrap_err(),
            KeyError::MissingPrivateKey
        );

        let btc = master(SEED_1, NetworkDescriptor::BITCOIN);
        assert!(btc.derive(0).is_ok());
    }

    #[test]
    fn path_grammar_errors() {
        let m = master(SEED_1, NetworkDescriptor::CATAPULT);
        let child = m.derive_path("m/0'").unwrap();
        assert_eq!(child.derive_path("m/0'").unwrap_err(), KeyError::ExpectedMasterNode);
        assert!(matches!(m.derive_path("m/0'/x"), Err(KeyError::InvalidPath(_))));
    }

    #[test]
    fn base58_round_trip_both_curves() {
        for network in [NetworkDescriptor::CATAPULT, NetworkDescriptor::BITCOIN] {
            let node = master(SEED_2, network).derive_path("m/7'/8'").unwrap();
            for n in [node.clone(), node.neutered()] {
                let decoded =
                    KeyNode::from_base58(&n.to_base58(), network, DerivationConfig::default())
                        .unwrap();
                assert_eq!(decoded, n);
            }
        }
    }

    #[test]
    fn decoded_node_keeps_deriving() {
        let m = master(SEED_1, NetworkDescriptor::CATAPULT);
        let child = m.derive_path("m/0'").unwrap();
        let decoded =
            KeyNode::from_base58(&child.to_base58(), NetworkDescriptor::CATAPULT, DerivationConfig::default())
                .unwrap();
        assert_eq!(
            decoded.derive_path("1'").unwrap(),
            m.derive_path("m/0'/1'").unwrap()
        );
    }

    #[test]
    fn decode_errors() {
        let node = master(SEED_1, NetworkDescriptor::CATAPULT);
        let config = DerivationConfig::default();

        let short = encode_check(&[0u8; 77]);
        assert_eq!(
            KeyNode::from_base58(&short, NetworkDescriptor::CATAPULT, config.clone()).unwrap_err(),
            KeyError::InvalidPayloadLength(77)
        );

        let mut payload = node.to_payload();
        payload.version = 0x0435_8394;
        assert_eq!(
            KeyNode::from_payload(&payload, NetworkDescriptor::CATAPULT, config.clone()).unwrap_err(),
            KeyError::UnknownVersion(0x0435_8394)
        );

        let mut payload = node.to_payload();
        payload.child_index = 1;
        assert_eq!(
            KeyNode::from_payload(&payload, NetworkDescriptor::CATAPULT, config.clone()).unwrap_err(),
            KeyError::InconsistentMasterNode {
                parent_fingerprint: 0,
                child_index: 1
            }
        );

        let mut payload = node.to_payload();
        payload.key_data[0] = 0x01;
        assert_eq!(
            KeyNode::from_payload(&payload, NetworkDescriptor::CATAPULT, config.clone()).unwrap_err(),
            KeyError::MalformedPrivateKey(0x01)
        );

        let mut encoded = node.to_base58();
        let last = encoded.pop().unwrap();
        encoded.push(if last == 'z' { 'y' } else { 'z' });
        assert!(matches!(
            KeyNode::from_base58(&encoded, NetworkDescriptor::CATAPULT, config),
            Err(KeyError::Base58(_))
        ));
    }

    #[test]
    fn network_mismatch_is_unknown_version() {
        let custom = NetworkDescriptor::new(0x0100_0000, 0x0100_0001, CurveAlgorithm::Ed25519);
        let node = master(SEED_1, NetworkDescriptor::CATAPULT);
        assert_eq!(
            KeyNode::from_base58(&node.to_base58(), custom, DerivationConfig::default()).unwrap_err(),
            KeyError::UnknownVersion(NetworkDescriptor::CATAPULT.private_prefix())
        );
    }

    #[test]
    fn mac_algorithms_build_distinct_trees() {
        let seed = hex::decode(SEED_1).unwrap();
        let hmac = master(SEED_1, NetworkDescriptor::CATAPULT);
        let kmac = KeyNode::from_seed(&seed, NetworkDescriptor::CATAPULT, DerivationConfig::kmac())
            .unwrap();
        assert_ne!(hmac.chain_code(), kmac.chain_code());
        assert_ne!(*hmac.private_key().unwrap(), *kmac.private_key().unwrap());

        // the MAC selector has no effect on BIP32
        let btc_kmac =
            KeyNode::from_seed(&seed, NetworkDescriptor::BITCOIN, DerivationConfig::kmac()).unwrap();
        assert_eq!(btc_kmac, master(SEED_1, NetworkDescriptor::BITCOIN));
    }

    #[test]
    fn config_from_toml_drives_tree() {
        let config = DerivationConfig::from_toml_str(
            r#"
            mac = "kmac256"
            digest = "sha3-512"
            kmac_salt = "symbol"
            "#,
        )
        .unwrap();
        assert_eq!(config.mac, MacAlgorithm::Kmac256);
        assert_eq!(config.digest, DigestAlgorithm::Sha3_512);

        let seed = hex::decode(SEED_1).unwrap();
        let node = KeyNode::from_seed(&seed, NetworkDescriptor::CATAPULT, config.clone())
            .unwrap()
            .derive_path("m/44'/4343'")
            .unwrap();
        let KeyNode::Ed25519(inner) = &node else {
            panic!("expected an ed25519 node");
        };
        assert_eq!(inner.config(), &config);

        let sig = node.sign(b"payload").unwrap();
        assert!(node.verify(b"payload", &sig));
    }

    #[test]
    fn shared_key_is_ed25519_only() {
        let m = master(SEED_1, NetworkDescriptor::CATAPULT);
        let a = m.derive_hardened(0).unwrap();
        let b = m.derive_hardened(1).unwrap();
        let b_pub: [u8; 32] = b.public_key().try_into().unwrap();
        let a_pub: [u8; 32] = a.public_key().try_into().unwrap();
        let salt = [3u8; 32];
        assert_eq!(
            a.derive_shared_key(&salt, &b_pub).unwrap(),
            b.derive_shared_key(&salt, &a_pub).unwrap()
        );

        let btc = master(SEED_1, NetworkDescriptor::BITCOIN);
        assert!(matches!(
            btc.derive_shared_key(&salt, &a_pub),
            Err(KeyError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn public_key_sizes() {
        assert_eq!(master(SEED_1, NetworkDescriptor::CATAPULT).public_key().len(), 32);
        assert_eq!(master(SEED_1, NetworkDescriptor::BITCOIN).public_key().len(), 33);
    }

    #[test]
    fn parallel_derivation_from_shared_parent() {
        let parent = master(SEED_2, NetworkDescriptor::CATAPULT)
            .derive_path("m/44'/4343'")
            .unwrap();
        let parallel: Vec<KeyNode> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8u32)
                .map(|i| {
                    let parent = &parent;
                    s.spawn(move || parent.derive_hardened(i).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for (i, child) in parallel.iter().enumerate() {
            assert_eq!(*child, parent.derive_hardened(i as u32).unwrap());
        }
    }

    proptest::proptest! {
        #[test]
        fn payload_round_trip(
            seed in proptest::collection::vec(proptest::prelude::any::<u8>(), 16..=64),
            indices in proptest::collection::vec(0u32..HARDENED_OFFSET, 0..4),
            kmac in proptest::prelude::any::<bool>(),
        ) {
            let config = if kmac { DerivationConfig::kmac() } else { DerivationConfig::default() };
            let mut node =
                KeyNode::from_seed(&seed, NetworkDescriptor::CATAPULT, config.clone()).unwrap();
            for index in indices {
                node = node.derive_hardened(index).unwrap();
            }
            for n in [node.clone(), node.neutered()] {
                let decoded =
                    KeyNode::from_base58(&n.to_base58(), NetworkDescriptor::CATAPULT, config.clone())
                        .unwrap();
                proptest::prop_assert_eq!(decoded, n);
            }
        }

        #[test]
        fn derivation_is_deterministic(
            seed in proptest::collection::vec(proptest::prelude::any::<u8>(), 16..=64),
            index in 0u32..HARDENED_OFFSET,
        ) {
            let a = KeyNode::from_seed(&seed, NetworkDescriptor::CATAPULT, DerivationConfig::default())
                .unwrap()
                .derive_hardened(index)
                .unwrap();
            let b = KeyNode::from_seed(&seed, NetworkDescriptor::CATAPULT, DerivationConfig::default())
                .unwrap()
                .derive_hardened(index)
                .unwrap();
            proptest::prop_assert_eq!(a, b);
        }
    }
}
