use std::io;

use serde::{Deserialize, Serialize, Serializer};

use clvm_traits::ToClvmError;
use clvmr::reduction::EvalErr;

use crate::common::types::Amount;

/// Error type
#[derive(Debug)]
pub enum Error {
    ClvmErr(EvalErr),
    IoErr(io::Error),
    EncodeErr(ToClvmError),
    StrErr(String),
    BlsErr(chia_bls::Error),
    JsonErr(serde_json::Error),
    TomlErr(toml::de::Error),
    HexErr(hex::FromHexError),
    /// A signing operation was attempted before `signing::init_signing`.
    SigningUninitialized,
    /// Needed, available.
    InsufficientFunds(Amount, Amount),
    Timeout(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::StrErr(s) => write!(f, "{s}"),
            Error::SigningUninitialized => write!(f, "BLS not initialized"),
            Error::InsufficientFunds(needed, available) => write!(
                f,
                "insufficient funds: need {} have {}",
                needed.to_u64(),
                available.to_u64()
            ),
            Error::Timeout(what) => write!(f, "timed out: {what}"),
            _ => write!(f, "{self:?}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SerializedError {
    error: String,
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SerializedError {
            error: format!("{self:?}"),
        }
        .serialize(serializer)
    }
}

pub trait ErrToError {
    fn into_gen(self) -> Error;
}

impl ErrToError for EvalErr {
    fn into_gen(self) -> Error {
        Error::ClvmErr(self)
    }
}

impl ErrToError for io::Error {
    fn into_gen(self) -> Error {
        Error::IoErr(self)
    }
}

impl ErrToError for String {
    fn into_gen(self) -> Error {
        Error::StrErr(self)
    }
}

impl ErrToError for chia_bls::Error {
    fn into_gen(self) -> Error {
        Error::BlsErr(self)
    }
}

impl ErrToError for ToClvmError {
    fn into_gen(self) -> Error {
        Error::EncodeErr(self)
    }
}

impl ErrToError for serde_json::Error {
    fn into_gen(self) -> Error {
        Error::JsonErr(self)
    }
}

impl ErrToError for toml::de::Error {
    fn into_gen(self) -> Error {
        Error::TomlErr(self)
    }
}

impl ErrToError for hex::FromHexError {
    fn into_gen(self) -> Error {
        Error::HexErr(self)
    }
}

pub trait IntoErr<X> {
    fn into_gen(self) -> Result<X, Error>;
}

impl<X, E> IntoErr<X> for Result<X, E>
where
    E: ErrToError,
{
    fn into_gen(self) -> Result<X, Error> {
        self.map_err(|e| e.into_gen())
    }
}
