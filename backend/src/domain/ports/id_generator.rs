//! Port for minting store identifiers supplied explicitly by adapters.

use crate::domain::StoreId;

/// Source of opaque store identifiers.
///
/// Implementations must be safe to call concurrently; each call is
/// independent and no uniqueness guarantee is made beyond the statistical
/// improbability of collisions.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> StoreId;
}
