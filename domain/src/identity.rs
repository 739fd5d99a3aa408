//! Identity of persisted records.
//!
//! Records are the same entity when both carry an identifier and the
//! identifiers are equal. A record that was never saved has no identity, so it
//! is not the same entity as anything, including an identical unsaved record.

/// Compares two optional identifiers by entity identity.
pub fn same_identity<I: PartialEq>(left: Option<I>, right: Option<I>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

pub trait Entity {
    type Id: Copy + PartialEq;

    fn id(&self) -> Option<Self::Id>;

    fn is_same_entity(&self, other: &Self) -> bool {
        same_identity(self.id(), other.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ids_are_the_same_identity() {
        assert!(same_identity(Some(7), Some(7)));
    }

    #[test]
    fn different_ids_are_different_identities() {
        assert!(!same_identity(Some(7), Some(8)));
    }

    #[test]
    fn missing_ids_never_match() {
        assert!(!same_identity::<i64>(None, None));
        assert!(!same_identity(Some(7), None));
        assert!(!same_identity(None, Some(7)));
    }
}
