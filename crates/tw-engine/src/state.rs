//! Game state shared by every tracker operation.

use std::rc::Rc;

use tw_core::{CurrencyFormat, EntityId, Money, TileColor, TwError, TwResult};
use tw_map::{Connectivity, GraphCache, Map};

use crate::ability::{Ability, AbilityType, Timing};
use crate::bank::{Account, Bank};
use crate::entity::{Entities, Entity};
use crate::log::GameLog;
use crate::rules::Rules;

/// The current game phase, as far as track laying cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub name: String,
    /// Tile colors that may be laid.
    pub tiles: Vec<TileColor>,
    /// Phase flags such as `can_buy_companies`.
    pub status: Vec<String>,
}

impl Phase {
    pub fn new(name: impl Into<String>, tiles: impl IntoIterator<Item = TileColor>) -> Self {
        Self {
            name: name.into(),
            tiles: tiles.into_iter().collect(),
            status: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status.push(status.into());
        self
    }

    pub fn allows(&self, color: TileColor) -> bool {
        self.tiles.contains(&color)
    }

    pub fn has_status(&self, status: &str) -> bool {
        self.status.iter().any(|s| s == status)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::new("1", [TileColor::Yellow])
    }
}

#[derive(Debug)]
pub struct GameState {
    pub map: Map,
    pub entities: Entities,
    pub bank: Bank,
    pub graph: GraphCache,
    pub log: GameLog,
    pub phase: Phase,
    pub currency: CurrencyFormat,
    /// Replaying saved actions: interactive checks are skipped.
    pub loading: bool,
    /// Entity whose turn it is.
    pub current_entity: Option<EntityId>,
}

impl GameState {
    /// The station graph skips whatever gauge `rules` says it does not run over.
    pub fn new<R: Rules + ?Sized>(map: Map, entities: Entities, rules: &R) -> Self {
        Self {
            map,
            entities,
            bank: Bank::default(),
            graph: GraphCache::new(rules.graph_skip_track()),
            log: GameLog::new(),
            phase: Phase::default(),
            currency: CurrencyFormat::default(),
            loading: false,
            current_entity: None,
        }
    }

    pub fn format_currency(&self, amount: Money) -> String {
        self.currency.format(amount)
    }

    pub fn entity(&self, id: EntityId) -> TwResult<&Entity> {
        self.entities.get(id)
    }

    /// A company acts for its owner; anything else acts for itself.
    pub fn operator_of(&self, id: EntityId) -> TwResult<EntityId> {
        let entity = self.entity(id)?;
        if entity.is_company() {
            entity
                .owner
                .ok_or_else(|| TwError::illegal(format!("{} has no owner", entity.name)))
        } else {
            Ok(id)
        }
    }

    /// Abilities of `id` and of the open companies it owns.
    pub fn all_abilities(&self, id: EntityId) -> Vec<&Ability> {
        let Ok(entity) = self.entity(id) else {
            return Vec::new();
        };
        if entity.closed {
            return Vec::new();
        }
        entity
            .abilities
            .iter()
            .chain(self.entities.companies_of(id).flat_map(|c| c.abilities.iter()))
            .collect()
    }

    /// Abilities of one type usable by `id`.
    ///
    /// `time` limits the result to abilities active in that window; passive
    /// abilities are dropped unless `passive_ok`.
    pub fn abilities(
        &self,
        id: EntityId,
        ty: AbilityType,
        time: Option<Timing>,
        passive_ok: bool,
    ) -> Vec<&Ability> {
        self.all_abilities(id)
            .into_iter()
            .filter(|a| a.ability_type() == ty)
            .filter(|a| time.is_none_or(|t| a.active_at(t)))
            .filter(|a| passive_ok || !a.passive)
            .collect()
    }

    /// Open companies holding an ability of type `ty`, with that ability.
    pub fn companies_with_ability(&self, ty: AbilityType) -> Vec<(&Entity, &Ability)> {
        self.entities
            .iter()
            .filter(|e| e.is_company() && !e.closed)
            .flat_map(|c| {
                c.abilities
                    .iter()
                    .filter(move |a| a.ability_type() == ty)
                    .map(move |a| (c, a))
            })
            .collect()
    }

    /// Move cash. Entities cannot go below zero; the bank can.
    pub fn transfer(&mut self, from: Account, to: Account, amount: Money) -> TwResult<()> {
        if amount < 0 {
            return Err(TwError::Invariant {
                what: "negative transfer",
            });
        }
        match from {
            Account::Bank => self.bank.cash -= amount,
            Account::Entity(id) => {
                let payer = self.entities.get_mut(id)?;
                if payer.cash < amount {
                    let reason = format!(
                        "{} does not have {}",
                        payer.name,
                        self.currency.format(amount)
                    );
                    return Err(TwError::illegal(reason));
                }
                payer.cash -= amount;
            }
        }
        match to {
            Account::Bank => self.bank.cash += amount,
            Account::Entity(id) => self.entities.get_mut(id)?.cash += amount,
        }
        Ok(())
    }

    /// Pay the bank.
    pub fn spend(&mut self, id: EntityId, amount: Money) -> TwResult<()> {
        self.transfer(Account::Entity(id), Account::Bank, amount)
    }

    pub fn placed_tokens(&self, id: EntityId) -> usize {
        self.map.tokens_of(id).filter(|t| t.is_placed()).count()
    }

    /// The entity's station network on the current map.
    pub fn connectivity(&self, id: EntityId) -> Rc<Connectivity> {
        self.graph.connectivity(&self.map, id)
    }

    /// Take the first ability of type `ty` off an entity.
    pub fn remove_ability(&mut self, id: EntityId, ty: AbilityType) -> TwResult<Option<Ability>> {
        let entity = self.entities.get_mut(id)?;
        let removed = entity
            .abilities
            .iter()
            .position(|a| a.ability_type() == ty)
            .map(|pos| entity.abilities.remove(pos));
        Ok(removed)
    }

    pub fn close(&mut self, id: EntityId) -> TwResult<()> {
        let entity = self.entities.get_mut(id)?;
        entity.closed = true;
        tracing::debug!(entity = %entity.sym, "closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityKind, TileLayAbility};
    use crate::games::IrelandRules;
    use crate::rules::BaseRules;
    use tw_core::Axial;
    use tw_map::MapBuilder;

    fn state() -> (GameState, EntityId, EntityId) {
        let mut builder = MapBuilder::new();
        builder.add_blank_hex("A1", Axial::new(0, 0));
        let map = builder.build().unwrap();
        let mut entities = Entities::new();
        let corp = entities.add(Entity::corporation("GSWR", "Great Southern").with_cash(100));
        let company = entities.add(
            Entity::company("DKR", "Dublin & Kingstown", 20)
                .with_owner(corp)
                .with_ability(
                    Ability::new(AbilityKind::TileLay(TileLayAbility::default()))
                        .with_when([Timing::Track]),
                ),
        );
        (
            GameState::new(map, entities, &BaseRules::default()),
            corp,
            company,
        )
    }

    #[test]
    fn corporation_sees_owned_company_abilities() {
        let (mut state, corp, company) = state();
        assert_eq!(state.abilities(corp, AbilityType::TileLay, None, false).len(), 1);
        assert!(state
            .abilities(corp, AbilityType::TileLay, Some(Timing::Token), false)
            .is_empty());

        state.close(company).unwrap();
        assert!(state.all_abilities(corp).is_empty());
    }

    #[test]
    fn company_operates_for_owner() {
        let (state, corp, company) = state();
        assert_eq!(state.operator_of(company).unwrap(), corp);
        assert_eq!(state.operator_of(corp).unwrap(), corp);
    }

    #[test]
    fn transfers_check_funds() {
        let (mut state, corp, _) = state();
        state.spend(corp, 60).unwrap();
        assert_eq!(state.entity(corp).unwrap().cash, 40);
        assert_eq!(state.bank.cash, 60);

        let err = state.spend(corp, 50).unwrap_err();
        assert_eq!(err.to_string(), "Illegal action: Great Southern does not have $50");
        assert_eq!(state.entity(corp).unwrap().cash, 40);
    }

    #[test]
    fn station_graph_follows_the_rules() {
        let (state, _, _) = state();
        assert_eq!(state.graph.skip_track(), None);

        let mut builder = MapBuilder::new();
        builder.add_blank_hex("A1", Axial::new(0, 0));
        let ireland = GameState::new(
            builder.build().unwrap(),
            Entities::new(),
            &IrelandRules::default(),
        );
        assert_eq!(ireland.graph.skip_track(), Some(tw_core::Track::Narrow));
    }
}
