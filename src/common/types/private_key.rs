use std::ops::{Add, AddAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use rand::distributions::Standard;
use rand::prelude::*;

use clvmr::allocator::NodePtr;

use chia_bls;
use chia_bls::signature::{sign, verify};
use clvm_traits::{ClvmEncoder, ToClvm, ToClvmError};

use crate::common::types::{check_for_hex, Error, Hash, IntoErr};

fn fixed_bytes<const N: usize>(by: &[u8], what: &str) -> Result<[u8; N], Error> {
    if by.len() != N {
        return Err(Error::StrErr(format!(
            "bad {what} length {} (expected {N})",
            by.len()
        )));
    }
    let mut fixed: [u8; N] = [0; N];
    fixed.copy_from_slice(by);
    Ok(fixed)
}

/// Public key
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct PublicKey(chia_bls::PublicKey);

impl PublicKey {
    pub fn to_bls(&self) -> chia_bls::PublicKey {
        self.0
    }

    pub fn bytes(&self) -> [u8; 48] {
        self.0.to_bytes()
    }

    pub fn from_bytes(bytes: [u8; 48]) -> Result<PublicKey, Error> {
        Ok(PublicKey(
            chia_bls::PublicKey::from_bytes(&bytes).into_gen()?,
        ))
    }

    pub fn from_slice(by: &[u8]) -> Result<PublicKey, Error> {
        PublicKey::from_bytes(fixed_bytes::<48>(by, "public key")?)
    }

    pub fn from_bls(pk: chia_bls::PublicKey) -> PublicKey {
        PublicKey(pk)
    }
}

impl AddAssign for PublicKey {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += &rhs.0;
    }
}

impl Add for PublicKey {
    type Output = PublicKey;

    fn add(mut self, rhs: Self) -> PublicKey {
        self += rhs;
        self
    }
}

impl<E: ClvmEncoder<Node = NodePtr>> ToClvm<E> for PublicKey {
    fn to_clvm(&self, encoder: &mut E) -> Result<<E as ClvmEncoder>::Node, ToClvmError> {
        encoder.encode_atom(clvm_traits::Atom::Borrowed(&self.0.to_bytes()))
    }
}

impl Distribution<PrivateKey> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PrivateKey {
        let hash: Hash = rng.gen();
        PrivateKey(chia_bls::SecretKey::from_seed(hash.bytes()))
    }
}

/// Aggsig
///
/// The default value is the identity of the signature group, so folding
/// signatures together can start from it.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Aggsig(chia_bls::Signature);

impl Serialize for Aggsig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex_0x())
    }
}

impl<'de> Deserialize<'de> for Aggsig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_sig = String::deserialize(deserializer)?;
        Aggsig::from_hex(&hex_sig)
            .map_err(|e| serde::de::Error::custom(format!("couldn't make aggsig: {e:?}")))
    }
}

impl Aggsig {
    pub fn from_bls(bls: chia_bls::Signature) -> Aggsig {
        Aggsig(bls)
    }

    pub fn from_bytes(by: [u8; 96]) -> Result<Aggsig, Error> {
        Ok(Aggsig(chia_bls::Signature::from_bytes(&by).into_gen()?))
    }

    pub fn from_slice(by: &[u8]) -> Result<Aggsig, Error> {
        Aggsig::from_bytes(fixed_bytes::<96>(by, "aggsig")?)
    }

    pub fn from_hex(s: &str) -> Result<Aggsig, Error> {
        Aggsig::from_slice(&check_for_hex(s.trim())?)
    }

    pub fn bytes(&self) -> [u8; 96] {
        self.0.to_bytes()
    }

    pub fn to_hex_0x(&self) -> String {
        format!("0x{}", hex::encode(self.bytes()))
    }

    pub fn to_bls(&self) -> chia_bls::Signature {
        self.0.clone()
    }

    pub fn verify(&self, public_key: &PublicKey, msg: &[u8]) -> bool {
        verify(&self.0, &public_key.to_bls(), msg)
    }
}

impl AddAssign for Aggsig {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += &rhs.0;
    }
}

impl Add for Aggsig {
    type Output = Aggsig;

    fn add(mut self, rhs: Self) -> Aggsig {
        self += rhs;
        self
    }
}

impl<E: ClvmEncoder<Node = NodePtr>> ToClvm<E> for Aggsig {
    fn to_clvm(&self, encoder: &mut E) -> Result<<E as ClvmEncoder>::Node, ToClvmError> {
        encoder.encode_atom(clvm_traits::Atom::Borrowed(&self.0.to_bytes()))
    }
}

/// Private Key
#[derive(Clone, Debug)]
pub struct PrivateKey(chia_bls::SecretKey);

impl Default for PrivateKey {
    fn default() -> Self {
        PrivateKey(chia_bls::SecretKey::from_seed(&[0; 32]))
    }
}

impl AddAssign for PrivateKey {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += &rhs.0;
    }
}

impl Add for PrivateKey {
    type Output = PrivateKey;

    fn add(mut self, rhs: Self) -> PrivateKey {
        self += rhs;
        self
    }
}

impl PrivateKey {
    pub fn from_bls(sk: chia_bls::SecretKey) -> PrivateKey {
        PrivateKey(sk)
    }

    pub fn from_bytes(by: &[u8; 32]) -> Result<PrivateKey, Error> {
        Ok(PrivateKey::from_bls(
            chia_bls::SecretKey::from_bytes(by).into_gen()?,
        ))
    }

    /// Raw 32 byte secret exponent, hex with or without 0x.
    pub fn from_hex(s: &str) -> Result<PrivateKey, Error> {
        let bytes = check_for_hex(s.trim())?;
        PrivateKey::from_bytes(&fixed_bytes::<32>(&bytes, "private key")?)
    }

    pub fn to_bls(&self) -> &chia_bls::SecretKey {
        &self.0
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bls(self.0.public_key())
    }

    pub fn sign<Msg: AsRef<[u8]>>(&self, msg: Msg) -> Aggsig {
        Aggsig(sign(&self.0, msg))
    }

    pub fn bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }
}
