//! The tracker: validates and applies tile lays for the entity whose turn it is.
//!
//! A lay is checked against a staged copy of the map and only committed once
//! every rule has passed, so a rejected lay leaves the game untouched.

mod cost;
mod effects;
mod lay;
mod legality;
mod query;

use tw_core::{EntityId, TileColor, TwError, TwResult};

use crate::ability::{AbilityKind, AbilityType, Timing};
use crate::action::LayTileAction;
use crate::round::RoundState;
use crate::rules::Rules;
use crate::schedule::Entitlement;
use crate::state::GameState;

pub use query::UpgradeOption;

pub struct Tracker<'r, R: Rules + ?Sized> {
    rules: &'r R,
    /// Step window abilities are matched against.
    timing: Timing,
}

impl<'r, R: Rules + ?Sized> Tracker<'r, R> {
    pub fn new(rules: &'r R) -> Self {
        Self {
            rules,
            timing: Timing::Track,
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn rules(&self) -> &R {
        self.rules
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Start of a turn.
    pub fn setup(&self, round: &mut RoundState) {
        round.reset();
    }

    /// What the next lay of this turn may do, if anything.
    pub fn get_tile_lay(
        &self,
        state: &GameState,
        round: &RoundState,
        entity: EntityId,
    ) -> Option<Entitlement> {
        let operator = state.operator_of(entity).ok()?;
        let schedule = self.rules.tile_lays(state, operator);
        schedule
            .get(round.num_laid_track)
            .map(|lay| lay.resolve(round.upgraded_track))
    }

    pub fn can_lay_tile(&self, state: &GameState, round: &RoundState, entity: EntityId) -> bool {
        if self.tile_lay_abilities_should_block(state, entity)
            || self.can_buy_tile_laying_company(state, entity)
        {
            return true;
        }
        let Some(lay) = self.get_tile_lay(state, round, entity) else {
            return false;
        };
        state.placed_tokens(entity) > 0
            && self.rules.buying_power(state, entity) >= lay.cost
            && (lay.lay || lay.upgrade)
    }

    /// An active tile-lay ability that does not use up a scheduled lay keeps
    /// the step open.
    pub fn tile_lay_abilities_should_block(&self, state: &GameState, entity: EntityId) -> bool {
        state
            .abilities(entity, AbilityType::TileLay, Some(self.timing), false)
            .into_iter()
            .any(|a| match &a.kind {
                AbilityKind::TileLay(t) => !t.consume_tile_lay,
                _ => false,
            })
    }

    pub fn can_buy_tile_laying_company(&self, state: &GameState, entity: EntityId) -> bool {
        if state.current_entity != Some(entity) || !state.phase.has_status("can_buy_companies") {
            return false;
        }
        let power = self.rules.buying_power(state, entity);
        self.rules
            .purchasable_companies(state, entity)
            .into_iter()
            .filter_map(|id| state.entity(id).ok())
            .filter(|c| c.min_price().is_some_and(|p| p <= power))
            .any(|c| {
                c.abilities.iter().any(|a| {
                    a.ability_type() == AbilityType::TileLay && a.active_at(self.timing)
                })
            })
    }

    /// Lay a tile as one of the turn's scheduled lays.
    ///
    /// Checks the schedule, charges the scheduled surcharge and advances the
    /// round counters.
    pub fn lay_tile_action(
        &self,
        state: &mut GameState,
        round: &mut RoundState,
        action: &LayTileAction,
        entity: Option<EntityId>,
        spender: Option<EntityId>,
    ) -> TwResult<()> {
        let color = state.map.tile(action.tile)?.color;
        let lay = self.get_tile_lay(state, round, action.entity);
        let yellow = color == TileColor::Yellow;

        if !yellow && !lay.is_some_and(|l| l.upgrade) {
            return Err(TwError::illegal("Cannot lay an upgrade now"));
        }
        let Some(lay) = lay.filter(|l| !yellow || l.lay) else {
            return Err(TwError::illegal("Cannot lay a yellow now"));
        };
        if lay.cannot_reuse_same_hex && round.laid_hexes.contains(&action.hex) {
            let hex = state.map.hex(action.hex)?;
            return Err(TwError::illegal(format!(
                "{} cannot be layed as this hex was already layed on this turn",
                hex.name
            )));
        }

        let extra_cost = if yellow { lay.cost } else { lay.upgrade_cost };
        self.lay_tile(state, round, action, extra_cost, entity, spender)?;

        if !yellow {
            round.upgraded_track = true;
        }
        round.num_laid_track += 1;
        round.laid_hexes.push(action.hex);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entities, Entity};
    use crate::rules::BaseRules;
    use crate::schedule::{Condition, TileLay};
    use crate::TrackRestriction;
    use proptest::prelude::*;
    use tw_core::Axial;
    use tw_map::MapBuilder;

    fn ireland_like() -> BaseRules {
        BaseRules::new(
            vec![
                TileLay::new(true, true),
                TileLay::new(Condition::NotIfUpgraded, false).with_cost(20),
            ],
            TrackRestriction::SemiRestrictive,
        )
    }

    fn state() -> (GameState, EntityId) {
        let mut builder = MapBuilder::new();
        builder.add_hex(
            "A1",
            Axial::new(0, 0),
            tw_map::Tile::new("home", tw_core::TileColor::Yellow).with_city(1, 20),
        );
        let mut entities = Entities::new();
        let corp = entities.add(Entity::corporation("GSWR", "Great Southern").with_cash(100));
        let rules = BaseRules::default();
        (GameState::new(builder.build().unwrap(), entities, &rules), corp)
    }

    #[test]
    fn second_lay_after_an_upgrade() {
        let rules = ireland_like();
        let tracker = Tracker::new(&rules);
        let (state, corp) = state();
        let round = RoundState {
            num_laid_track: 1,
            upgraded_track: true,
            ..RoundState::default()
        };
        let lay = tracker.get_tile_lay(&state, &round, corp).unwrap();
        assert!(!lay.lay);
        assert!(!lay.upgrade);
        assert_eq!(lay.cost, 20);

        let round = RoundState {
            num_laid_track: 2,
            ..RoundState::default()
        };
        assert!(tracker.get_tile_lay(&state, &round, corp).is_none());
    }

    #[test]
    fn needs_a_placed_token() {
        let rules = BaseRules::default();
        let tracker = Tracker::new(&rules);
        let (mut state, corp) = state();
        let round = RoundState::new();
        assert!(!tracker.can_lay_tile(&state, &round, corp));

        let hex = state.map.hex_by_name("A1").unwrap().id;
        state.map.place_token(corp, hex, 0).unwrap();
        assert!(tracker.can_lay_tile(&state, &round, corp));

        let done = RoundState {
            num_laid_track: 1,
            ..RoundState::default()
        };
        assert!(!tracker.can_lay_tile(&state, &done, corp));
    }

    #[test]
    fn lay_schedule_gates_colors() {
        let rules = ireland_like();
        let tracker = Tracker::new(&rules);
        let (mut state, corp) = state();
        let yellow = state.map.hexes()[0].tile();
        let round = RoundState {
            num_laid_track: 1,
            upgraded_track: true,
            ..RoundState::default()
        };
        let mut after = round.clone();
        let action = LayTileAction::new(corp, state.map.hexes()[0].id, yellow, 0);
        let err = tracker
            .lay_tile_action(&mut state, &mut after, &action, None, None)
            .unwrap_err();
        assert_eq!(err, TwError::illegal("Cannot lay a yellow now"));
        assert_eq!(after, round);
    }

    proptest! {
        #[test]
        fn nth_lay_uses_nth_entry(len in 1usize..6, laid in 0usize..8, upgraded: bool) {
            let schedule: Vec<TileLay> = (0..len)
                .map(|i| TileLay::new(true, i % 2 == 0).with_cost(i as i64 * 10))
                .collect();
            let rules = BaseRules::new(schedule.clone(), TrackRestriction::Permissive);
            let tracker = Tracker::new(&rules);
            let (state, corp) = state();
            let round = RoundState {
                num_laid_track: laid,
                upgraded_track: upgraded,
                ..RoundState::default()
            };
            let got = tracker.get_tile_lay(&state, &round, corp);
            if laid < len {
                prop_assert_eq!(got, Some(schedule[laid].resolve(upgraded)));
            } else {
                prop_assert!(got.is_none());
            }
        }
    }
}
