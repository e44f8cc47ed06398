//! The transaction sum type and its canonical serialization.
//!
//! Canonical byte layout (frozen — this is the hash-chain contract):
//!
//! ```text
//! kind tag (1) ||
//! sender len (8 BE)    || sender utf8    ||
//! recipient len (8 BE) || recipient utf8 ||
//! amount raw (16 BE)   || fee raw (16 BE) ||
//! description len (8 BE) || description utf8 ||
//! timestamp secs (8 BE)
//! ```
//!
//! Signature material is excluded, so the transaction id (SHA-256 of the
//! canonical bytes) is derivable before signing, and the signature signs
//! exactly the id preimage.

use serde::{Deserialize, Serialize};
use std::fmt;

use zeta_crypto::{hash::hash_transaction, sign_payload, verify_payload};
use zeta_types::{Address, Amount, KeyPair, PublicKey, Signature, Timestamp, TxHash};

use crate::error::TransactionError;
use crate::kind::TxKind;

/// Signing material attached to a user-signed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub public_key: PublicKey,
    pub signature: Signature,
}

/// A user-signed transaction: transfer, reward, penalty, purchase or refund.
///
/// `credentials` is `None` only when the sender is the reserved system
/// address (platform-issued rewards, where the signature is waived).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedTx {
    pub id: TxHash,
    pub kind: TxKind,
    pub sender: Address,
    pub recipient: Address,
    pub amount: Amount,
    pub fee: Amount,
    pub description: String,
    pub timestamp: Timestamp,
    pub credentials: Option<Credentials>,
}

/// A system-originated transaction: mining reward or other system issuance.
///
/// The sender is always the reserved system address and there is never a
/// signature; the shape makes both facts unrepresentable otherwise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemTx {
    pub id: TxHash,
    pub kind: TxKind,
    pub recipient: Address,
    pub amount: Amount,
    pub description: String,
    pub timestamp: Timestamp,
}

/// A ledger transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Transaction {
    Signed(SignedTx),
    System(SystemTx),
}

fn canonical_bytes_of(
    kind: TxKind,
    sender: &Address,
    recipient: &Address,
    amount: Amount,
    fee: Amount,
    description: &str,
    timestamp: Timestamp,
) -> Vec<u8> {
    let sender = sender.as_str().as_bytes();
    let recipient = recipient.as_str().as_bytes();
    let description = description.as_bytes();

    let mut buf = Vec::with_capacity(1 + 8 * 4 + 16 * 2 + sender.len() + recipient.len() + description.len());
    buf.push(kind.tag());
    buf.extend_from_slice(&(sender.len() as u64).to_be_bytes());
    buf.extend_from_slice(sender);
    buf.extend_from_slice(&(recipient.len() as u64).to_be_bytes());
    buf.extend_from_slice(recipient);
    buf.extend_from_slice(&amount.raw().to_be_bytes());
    buf.extend_from_slice(&fee.raw().to_be_bytes());
    buf.extend_from_slice(&(description.len() as u64).to_be_bytes());
    buf.extend_from_slice(description);
    buf.extend_from_slice(&timestamp.as_secs().to_be_bytes());
    buf
}

impl SignedTx {
    /// Build a user-signed transaction from already-produced parts.
    ///
    /// The id is computed here; any id the submitter claims is ignored.
    /// Signature validity is checked separately during submission, but
    /// the structural invariants (signable kind, positive amount, a
    /// signature unless the sender is the system address) hold from
    /// construction on.
    pub fn create(
        kind: TxKind,
        sender: Address,
        recipient: Address,
        amount: Amount,
        fee: Amount,
        description: String,
        timestamp: Timestamp,
        credentials: Option<Credentials>,
    ) -> Result<Self, TransactionError> {
        if !kind.is_signable() {
            return Err(TransactionError::NotSignableKind { kind });
        }
        if amount.is_zero() {
            return Err(TransactionError::ZeroAmount { kind });
        }
        if credentials.is_none() && !sender.is_system() {
            return Err(TransactionError::MissingSignature(sender));
        }
        let id = hash_transaction(&canonical_bytes_of(
            kind,
            &sender,
            &recipient,
            amount,
            fee,
            &description,
            timestamp,
        ));
        Ok(Self {
            id,
            kind,
            sender,
            recipient,
            amount,
            fee,
            description,
            timestamp,
            credentials,
        })
    }

    /// Build and sign a transaction in one step with the sender's key pair.
    #[allow(clippy::too_many_arguments)]
    pub fn create_and_sign(
        kind: TxKind,
        sender: Address,
        recipient: Address,
        amount: Amount,
        fee: Amount,
        description: String,
        timestamp: Timestamp,
        keys: &KeyPair,
    ) -> Result<Self, TransactionError> {
        if !kind.is_signable() {
            return Err(TransactionError::NotSignableKind { kind });
        }
        if amount.is_zero() {
            return Err(TransactionError::ZeroAmount { kind });
        }
        let payload = canonical_bytes_of(
            kind,
            &sender,
            &recipient,
            amount,
            fee,
            &description,
            timestamp,
        );
        let signature = sign_payload(&payload, keys);
        let id = hash_transaction(&payload);
        Ok(Self {
            id,
            kind,
            sender,
            recipient,
            amount,
            fee,
            description,
            timestamp,
            credentials: Some(Credentials {
                public_key: PublicKey(keys.public.0),
                signature,
            }),
        })
    }
}

impl SystemTx {
    fn new(kind: TxKind, recipient: Address, amount: Amount, description: String, timestamp: Timestamp) -> Self {
        let id = hash_transaction(&canonical_bytes_of(
            kind,
            &Address::system(),
            &recipient,
            amount,
            Amount::ZERO,
            &description,
            timestamp,
        ));
        Self {
            id,
            kind,
            recipient,
            amount,
            description,
            timestamp,
        }
    }
}

impl Transaction {
    /// A signed user-to-user transfer.
    pub fn transfer(
        sender: Address,
        recipient: Address,
        amount: Amount,
        fee: Amount,
        description: String,
        timestamp: Timestamp,
        keys: &KeyPair,
    ) -> Result<Self, TransactionError> {
        SignedTx::create_and_sign(
            TxKind::Transfer,
            sender,
            recipient,
            amount,
            fee,
            description,
            timestamp,
            keys,
        )
        .map(Transaction::Signed)
    }

    /// A platform-issued reward (system sender, signature waived).
    pub fn reward(
        recipient: Address,
        amount: Amount,
        reason: String,
        timestamp: Timestamp,
    ) -> Result<Self, TransactionError> {
        SignedTx::create(
            TxKind::Reward,
            Address::system(),
            recipient,
            amount,
            Amount::ZERO,
            reason,
            timestamp,
            None,
        )
        .map(Transaction::Signed)
    }

    /// The reward minted to the miner when a block is sealed.
    pub fn mining_reward(miner: Address, amount: Amount, timestamp: Timestamp) -> Self {
        Transaction::System(SystemTx::new(
            TxKind::MiningReward,
            miner,
            amount,
            "block mining reward".to_string(),
            timestamp,
        ))
    }

    /// A generic system-originated transaction.
    pub fn system(
        recipient: Address,
        amount: Amount,
        description: String,
        timestamp: Timestamp,
    ) -> Self {
        Transaction::System(SystemTx::new(
            TxKind::System,
            recipient,
            amount,
            description,
            timestamp,
        ))
    }

    pub fn id(&self) -> TxHash {
        match self {
            Transaction::Signed(tx) => tx.id,
            Transaction::System(tx) => tx.id,
        }
    }

    pub fn kind(&self) -> TxKind {
        match self {
            Transaction::Signed(tx) => tx.kind,
            Transaction::System(tx) => tx.kind,
        }
    }

    pub fn sender(&self) -> Address {
        match self {
            Transaction::Signed(tx) => tx.sender.clone(),
            Transaction::System(_) => Address::system(),
        }
    }

    pub fn recipient(&self) -> &Address {
        match self {
            Transaction::Signed(tx) => &tx.recipient,
            Transaction::System(tx) => &tx.recipient,
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Transaction::Signed(tx) => tx.amount,
            Transaction::System(tx) => tx.amount,
        }
    }

    pub fn fee(&self) -> Amount {
        match self {
            Transaction::Signed(tx) => tx.fee,
            Transaction::System(_) => Amount::ZERO,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Transaction::Signed(tx) => &tx.description,
            Transaction::System(tx) => &tx.description,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            Transaction::Signed(tx) => tx.timestamp,
            Transaction::System(tx) => tx.timestamp,
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Transaction::Signed(tx) => tx.credentials.as_ref(),
            Transaction::System(_) => None,
        }
    }

    /// Whether this transaction touches the given address as sender or recipient.
    pub fn touches(&self, address: &Address) -> bool {
        self.recipient() == address || &self.sender() == address
    }

    /// The canonical serialization of this transaction's content fields.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_bytes_of(
            self.kind(),
            &self.sender(),
            self.recipient(),
            self.amount(),
            self.fee(),
            self.description(),
            self.timestamp(),
        )
    }

    /// Recompute the content-derived id. Equals `id()` for an uncorrupted
    /// transaction.
    pub fn compute_id(&self) -> TxHash {
        hash_transaction(&self.canonical_bytes())
    }

    /// Verify the signature over the canonical payload.
    ///
    /// System-originated transactions and system-sender rewards carry no
    /// signature and verify trivially.
    pub fn verify(&self) -> bool {
        match self {
            Transaction::System(_) => true,
            Transaction::Signed(tx) => match &tx.credentials {
                None => tx.sender.is_system(),
                Some(creds) => {
                    verify_payload(&self.canonical_bytes(), &creds.signature, &creds.public_key)
                }
            },
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}: {} ({})",
            self.kind(),
            self.sender(),
            self.recipient(),
            self.amount(),
            self.id()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeta_crypto::keypair_from_seed;

    fn addr(c: char) -> Address {
        Address::parse(std::iter::repeat(c).take(32).collect::<String>()).unwrap()
    }

    #[test]
    fn transfer_is_signed_and_verifies() {
        let keys = keypair_from_seed(&[7u8; 32]);
        let tx = Transaction::transfer(
            addr('a'),
            addr('b'),
            Amount::from_zeta(5),
            Amount::ZERO,
            "coffee".into(),
            Timestamp::new(1000),
            &keys,
        )
        .unwrap();
        assert!(tx.verify());
        assert_eq!(tx.id(), tx.compute_id());
    }

    #[test]
    fn tampered_amount_changes_computed_id() {
        let keys = keypair_from_seed(&[7u8; 32]);
        let tx = Transaction::transfer(
            addr('a'),
            addr('b'),
            Amount::from_zeta(5),
            Amount::ZERO,
            String::new(),
            Timestamp::new(1000),
            &keys,
        )
        .unwrap();
        let Transaction::Signed(mut inner) = tx else {
            unreachable!()
        };
        inner.amount = Amount::from_zeta(500);
        let tampered = Transaction::Signed(inner);
        assert_ne!(tampered.id(), tampered.compute_id());
        assert!(!tampered.verify());
    }

    #[test]
    fn reward_waives_signature_for_system_sender() {
        let tx = Transaction::reward(
            addr('c'),
            Amount::from_zeta(10),
            "weekly reward".into(),
            Timestamp::new(2000),
        )
        .unwrap();
        assert!(tx.verify());
        assert!(tx.sender().is_system());
        assert_eq!(tx.kind(), TxKind::Reward);
    }

    #[test]
    fn unsigned_transfer_from_user_is_rejected() {
        let err = SignedTx::create(
            TxKind::Transfer,
            addr('a'),
            addr('b'),
            Amount::from_zeta(1),
            Amount::ZERO,
            String::new(),
            Timestamp::new(0),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::MissingSignature(_)));
    }

    #[test]
    fn zero_amount_is_rejected_for_signed_kinds() {
        let keys = keypair_from_seed(&[1u8; 32]);
        let err = Transaction::transfer(
            addr('a'),
            addr('b'),
            Amount::ZERO,
            Amount::ZERO,
            String::new(),
            Timestamp::new(0),
            &keys,
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::ZeroAmount { .. }));
    }

    #[test]
    fn mining_reward_kind_cannot_be_created_as_signed() {
        let keys = keypair_from_seed(&[1u8; 32]);
        let err = SignedTx::create_and_sign(
            TxKind::MiningReward,
            addr('a'),
            addr('b'),
            Amount::from_zeta(1),
            Amount::ZERO,
            String::new(),
            Timestamp::new(0),
            &keys,
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::NotSignableKind { .. }));
    }

    #[test]
    fn mining_reward_originates_from_system() {
        let tx = Transaction::mining_reward(addr('m'), Amount::from_zeta(1), Timestamp::new(5));
        assert!(tx.sender().is_system());
        assert!(tx.verify());
        assert_eq!(tx.kind(), TxKind::MiningReward);
        assert!(tx.credentials().is_none());
    }

    #[test]
    fn id_is_content_derived_and_stable() {
        let t1 = Transaction::reward(addr('x'), Amount::from_zeta(3), "r".into(), Timestamp::new(9))
            .unwrap();
        let t2 = Transaction::reward(addr('x'), Amount::from_zeta(3), "r".into(), Timestamp::new(9))
            .unwrap();
        assert_eq!(t1.id(), t2.id());

        let t3 = Transaction::reward(addr('x'), Amount::from_zeta(4), "r".into(), Timestamp::new(9))
            .unwrap();
        assert_ne!(t1.id(), t3.id());
    }

    #[test]
    fn canonical_bytes_exclude_signature() {
        let keys1 = keypair_from_seed(&[1u8; 32]);
        let keys2 = keypair_from_seed(&[2u8; 32]);
        let make = |keys| {
            Transaction::transfer(
                addr('a'),
                addr('b'),
                Amount::from_zeta(5),
                Amount::ZERO,
                String::new(),
                Timestamp::new(1000),
                keys,
            )
            .unwrap()
        };
        // Same content signed by different keys hashes identically.
        assert_eq!(make(&keys1).id(), make(&keys2).id());
    }

    #[test]
    fn touches_matches_both_sides() {
        let tx = Transaction::reward(addr('a'), Amount::from_zeta(1), String::new(), Timestamp::new(0))
            .unwrap();
        assert!(tx.touches(&addr('a')));
        assert!(tx.touches(&Address::system()));
        assert!(!tx.touches(&addr('z')));
    }
}
