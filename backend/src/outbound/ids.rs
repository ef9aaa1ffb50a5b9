//! Random identifier generator for the key-value and document adapters.

use crate::domain::StoreId;
use crate::domain::ports::IdGenerator;

/// Mints identifiers from a random `u64` rendered in decimal.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn new_id(&self) -> StoreId {
        StoreId::new(rand::random::<u64>().to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_decimal_u64_values() {
        let id = RandomIdGenerator.new_id();
        assert!(id.as_str().parse::<u64>().is_ok(), "not a u64: {id}");
    }

    #[test]
    fn consecutive_ids_do_not_collide() {
        let ids: HashSet<String> = (0..256)
            .map(|_| RandomIdGenerator.new_id().as_str().to_owned())
            .collect();
        assert_eq!(ids.len(), 256);
    }
}
