use std::borrow::Cow;

/// Provider identifier - mostly static constants
pub type ProviderId = Cow<'static, str>;

/// On-chain token address (mint address on Solana, contract address elsewhere)
pub type TokenAddress = String;
