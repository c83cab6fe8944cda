use crate::error::CspError;
use getrandom::getrandom;

/// Source of cryptographically secure random bytes.
///
/// Implementations must fill the whole destination or fail; a short read is
/// reported as an error.
pub trait EntropySource: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CspError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    #[inline]
    fn fill(&self, dest: &mut [u8]) -> Result<(), CspError> {
        getrandom(dest)?;
        Ok(())
    }
}
