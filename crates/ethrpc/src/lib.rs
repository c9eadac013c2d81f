pub mod alloy;
pub mod signer;

use ::alloy::providers::DynProvider;

pub type AlloyProvider = DynProvider;
