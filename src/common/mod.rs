pub mod constants;
pub mod load_clvm;
pub mod standard_coin;
pub mod types;
