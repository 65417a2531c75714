//! Cash holders.

use tw_core::{EntityId, Money};

/// Side of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Account {
    Bank,
    Entity(EntityId),
}

impl From<EntityId> for Account {
    fn from(id: EntityId) -> Self {
        Account::Entity(id)
    }
}

/// The bank may run negative; a broken bank ends the game elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bank {
    pub cash: Money,
}

impl Bank {
    pub fn new(cash: Money) -> Self {
        Self { cash }
    }

    pub fn is_broken(&self) -> bool {
        self.cash < 0
    }
}
