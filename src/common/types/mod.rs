pub mod alloc_encoder;
pub mod coin_condition;
pub mod coin_id;
pub mod coin_string;
pub mod error;
pub mod hash;
pub mod private_key;
pub mod program;
pub mod puzzle;
pub mod spend;

pub use self::alloc_encoder::*;
pub use self::coin_condition::*;
pub use self::coin_id::*;
pub use self::coin_string::*;
pub use self::error::*;
pub use self::hash::*;
pub use self::private_key::*;
pub use self::program::*;
pub use self::puzzle::*;
pub use self::spend::*;
