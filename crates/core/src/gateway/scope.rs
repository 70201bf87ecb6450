//! Ownership predicates for gateway queries.

use std::collections::BTreeSet;

use pennywise_shared::types::CardId;

/// The set of cards a variable-expense query is restricted to.
///
/// There is no "all cards" value: an empty scope matches nothing, so a budget
/// without cards can never pull in unrelated expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CardScope {
    cards: BTreeSet<CardId>,
}

impl CardScope {
    /// A scope matching no card.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if the scope matches no card.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if expenses charged to `card_id` are in scope.
    #[must_use]
    pub fn matches(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    /// Cards in scope, in ID order.
    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }
}

impl FromIterator<CardId> for CardScope {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a CardId> for CardScope {
    fn from_iter<I: IntoIterator<Item = &'a CardId>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}
