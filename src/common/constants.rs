use lazy_static::lazy_static;

use crate::common::types::Hash;

pub const AGG_SIG_UNSAFE: u32 = 49;
pub const AGG_SIG_ME: u32 = 50;
pub const CREATE_COIN: u32 = 51;
pub const RESERVE_FEE: u32 = 52;
pub const CREATE_COIN_ANNOUNCEMENT: u32 = 60;
pub const ASSERT_COIN_ANNOUNCEMENT: u32 = 61;

pub const AGG_SIG_UNSAFE_ATOM: [u8; 1] = [49];
pub const AGG_SIG_ME_ATOM: [u8; 1] = [50];
pub const CREATE_COIN_ATOM: [u8; 1] = [51];

/// Magic condition the CAT layer reads as "run the tail" (-113).
pub const RUN_TAIL_MAGIC: i64 = -113;

/// Characters replaced by `_` in user supplied memos.
pub const UNSAFE_MEMO_CHARS: &str = "&/\\#,+()$~%.'\":*?<>{}[] ";

pub const P2_DELEGATED_PUZZLE_OR_HIDDEN_PUZZLE_HEX: &str =
    include_str!("../../resources/p2_delegated_puzzle_or_hidden_puzzle.clsp.hex");
pub const DEFAULT_HIDDEN_PUZZLE_HEX: &str = include_str!("../../resources/default_hidden_puzzle.hex");

lazy_static! {
    pub static ref GROUP_ORDER: Vec<u8> = {
        vec![
            0x73, 0xED, 0xA7, 0x53, 0x29, 0x9D, 0x7D, 0x48, 0x33, 0x39, 0xD8, 0x08, 0x09, 0xA1,
            0xD8, 0x05, 0x53, 0xBD, 0xA4, 0x02, 0xFF, 0xFE, 0x5B, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF,
            0x00, 0x00, 0x00, 0x01,
        ]
    };

    /// Spends to this puzzle hash are only used to choose coins.
    pub static ref PLACEHOLDER_PUZZLE_HASH: Hash = Hash::from_bytes([0; 32]);

    pub static ref MAINNET_GENESIS_CHALLENGE: Hash = Hash::from_bytes([
        0xcc, 0xd5, 0xbb, 0x71, 0x18, 0x35, 0x32, 0xbf, 0xf2, 0x20, 0xba, 0x46, 0xc2, 0x68, 0x99,
        0x1a, 0x3f, 0xf0, 0x7e, 0xb3, 0x58, 0xe8, 0x25, 0x5a, 0x65, 0xc3, 0x0a, 0x2d, 0xce, 0x0e,
        0x5f, 0xbb,
    ]);

    pub static ref TESTNET11_GENESIS_CHALLENGE: Hash = Hash::from_bytes([
        0x37, 0xa9, 0x0e, 0xb5, 0x18, 0x5a, 0x9c, 0x44, 0x39, 0xa9, 0x1d, 0xdc, 0x98, 0xbb, 0xad,
        0xce, 0x7b, 0x4f, 0xeb, 0xa0, 0x60, 0xd5, 0x01, 0x16, 0xa0, 0x67, 0xde, 0x66, 0xbf, 0x23,
        0x66, 0x15,
    ]);
}
