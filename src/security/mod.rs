pub mod entropy;
pub mod nonce;

pub use entropy::{EntropySource, OsEntropy};
pub use nonce::{Nonce, NonceGenerator};
