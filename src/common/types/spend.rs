use serde::{Deserialize, Serialize};

use crate::common::types::{
    Aggsig, Amount, CoinID, CoinString, Error, GetCoinStringParts, Hash, IntoErr, Program, Puzzle,
    PuzzleHash,
};

/// One coin being spent: the coin, the revealed puzzle and its solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinSpend {
    pub coin: CoinString,
    pub puzzle_reveal: Puzzle,
    pub solution: Program,
}

/// An ordered set of coin spends plus the signature covering all of them.
/// Bundles assembled piecewise may not carry a signature yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpendBundle {
    pub aggregated_signature: Option<Aggsig>,
    pub coin_spends: Vec<CoinSpend>,
}

/// Form of a spend used by coinset.org
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct CoinsetCoin {
    pub amount: u64,
    pub parent_coin_info: String,
    pub puzzle_hash: String,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct CoinsetSpendRecord {
    pub coin: CoinsetCoin,
    pub puzzle_reveal: String,
    pub solution: String,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct CoinsetSpendBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregated_signature: Option<String>,
    pub coin_spends: Vec<CoinsetSpendRecord>,
}

pub fn check_for_hex(hex_with_prefix: &str) -> Result<Vec<u8>, Error> {
    if let Some(value) = hex_with_prefix.strip_prefix("0x") {
        return hex::decode(value).into_gen();
    }

    hex::decode(hex_with_prefix).into_gen()
}

pub fn convert_coinset_org_spend_to_spend(
    parent_coin_info: &str,
    puzzle_hash: &str,
    amount: u64,
    puzzle_reveal: &str,
    solution: &str,
) -> Result<CoinSpend, Error> {
    let parent_id = CoinID::new(Hash::from_exact_slice(&check_for_hex(parent_coin_info)?)?);
    let puzzle_hash = PuzzleHash::from_hash(Hash::from_exact_slice(&check_for_hex(puzzle_hash)?)?);
    let coin_string = CoinString::from_parts(&parent_id, &puzzle_hash, &Amount::new(amount));
    Ok(CoinSpend {
        coin: coin_string,
        puzzle_reveal: Program::from_hex(puzzle_reveal)?.into(),
        solution: Program::from_hex(solution)?,
    })
}

impl CoinSpend {
    pub fn to_coinset(&self) -> Result<CoinsetSpendRecord, Error> {
        let (parent, puzzle_hash, amount) = self.coin.get_coin_string_parts()?;
        Ok(CoinsetSpendRecord {
            coin: CoinsetCoin {
                amount: amount.to_u64(),
                parent_coin_info: parent.to_hex_0x(),
                puzzle_hash: puzzle_hash.to_hex_0x(),
            },
            puzzle_reveal: self.puzzle_reveal.to_program().to_hex_0x(),
            solution: self.solution.to_hex_0x(),
        })
    }

    pub fn from_coinset(record: &CoinsetSpendRecord) -> Result<CoinSpend, Error> {
        convert_coinset_org_spend_to_spend(
            &record.coin.parent_coin_info,
            &record.coin.puzzle_hash,
            record.coin.amount,
            &record.puzzle_reveal,
            &record.solution,
        )
    }
}

impl SpendBundle {
    pub fn to_coinset(&self) -> Result<CoinsetSpendBundle, Error> {
        let coin_spends = self
            .coin_spends
            .iter()
            .map(|cs| cs.to_coinset())
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(CoinsetSpendBundle {
            aggregated_signature: self.aggregated_signature.as_ref().map(|s| s.to_hex_0x()),
            coin_spends,
        })
    }

    /// An empty or missing signature string means the bundle is unsigned.
    pub fn from_coinset(bundle: &CoinsetSpendBundle) -> Result<SpendBundle, Error> {
        let aggregated_signature = match bundle.aggregated_signature.as_deref() {
            None | Some("") | Some("0x") => None,
            Some(s) => Some(Aggsig::from_hex(s)?),
        };
        let coin_spends = bundle
            .coin_spends
            .iter()
            .map(CoinSpend::from_coinset)
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(SpendBundle {
            aggregated_signature,
            coin_spends,
        })
    }
}
