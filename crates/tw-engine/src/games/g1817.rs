//! 1817: mines, the Pittsburgh Steel Mill and corporate loans.

use tw_core::{EntityId, Money, TwError, TwResult};

use crate::ability::AbilityType;
use crate::action::LayTileAction;
use crate::bank::Account;
use crate::restriction::TrackRestriction;
use crate::rules::{BaseRules, Rules};
use crate::schedule::TileLay;
use crate::state::GameState;

pub const PITTSBURGH_PRIVATE_NAME: &str = "PSM";
pub const PITTSBURGH_PRIVATE_HEX: &str = "F13";
/// Hex assignment marking a mine.
pub const MINE: &str = "mine";
pub const LOAN_VALUE: Money = 100;
pub const MAX_LOANS: u32 = 5;

#[derive(Debug, Clone)]
pub struct G1817Rules {
    pub base: BaseRules,
    pub loan_value: Money,
    /// Loans a corporation may hold at once.
    pub max_loans: u32,
}

impl Default for G1817Rules {
    fn default() -> Self {
        Self {
            base: BaseRules::new(
                vec![TileLay::new(true, true)],
                TrackRestriction::SemiRestrictive,
            ),
            loan_value: LOAN_VALUE,
            max_loans: MAX_LOANS,
        }
    }
}

impl G1817Rules {
    fn loans_left(&self, state: &GameState, entity: EntityId) -> u32 {
        match state.entity(entity) {
            Ok(e) if e.is_corporation() => self.max_loans.saturating_sub(e.loans),
            _ => 0,
        }
    }
}

impl Rules for G1817Rules {
    fn tile_lays(&self, state: &GameState, operator: EntityId) -> Vec<TileLay> {
        self.base.tile_lays(state, operator)
    }

    fn track_restriction(&self) -> TrackRestriction {
        self.base.track_restriction
    }

    /// Cash plus whatever the corporation could still borrow.
    fn buying_power(&self, state: &GameState, entity: EntityId) -> Money {
        let cash = state.entity(entity).map(|e| e.cash).unwrap_or(0);
        cash + Money::from(self.loans_left(state, entity)) * self.loan_value
    }

    fn try_take_loan(&self, state: &mut GameState, entity: EntityId, cost: Money) -> TwResult<()> {
        while state.entity(entity)?.cash < cost && self.loans_left(state, entity) > 0 {
            state.transfer(Account::Bank, Account::Entity(entity), self.loan_value)?;
            let borrower = state.entities.get_mut(entity)?;
            borrower.loans += 1;
            let message = format!(
                "{} takes a loan of {}",
                borrower.name,
                state.currency.format(self.loan_value)
            );
            state.log.push(message);
        }
        Ok(())
    }

    fn before_lay_tile(&self, state: &GameState, action: &LayTileAction) -> TwResult<()> {
        if state.map.hex(action.hex)?.is_assigned(MINE) {
            return Err(TwError::illegal("Cannot upgrade mines"));
        }
        Ok(())
    }

    /// Anything laid on Pittsburgh ends the steel mill's special lay.
    fn after_lay_tile(&self, state: &mut GameState, action: &LayTileAction) -> TwResult<()> {
        if state.map.hex(action.hex)?.name != PITTSBURGH_PRIVATE_HEX {
            return Ok(());
        }
        let Some(psm) = state.entities.by_sym(PITTSBURGH_PRIVATE_NAME).map(|c| c.id) else {
            return Ok(());
        };
        if state.entity(psm)?.closed {
            return Ok(());
        }
        if state.remove_ability(psm, AbilityType::TileLay)?.is_none() {
            return Ok(());
        }
        let name = state.entity(psm)?.name.clone();
        state.log.push(format!("{name} closes as it can no longer be used"));
        state.close(psm)
    }
}
