//! What a committed lay sets off: payment, ability use, displaced tokens and
//! tile income.

use tw_core::{EntityId, Money, Terrain, TwError, TwResult};
use tw_map::{Hex, Tile};

use super::Tracker;
use crate::ability::{AbilityKind, AbilityType, TileIncomeAbility};
use crate::bank::Account;
use crate::entity::Entity;
use crate::round::{PendingToken, RoundState};
use crate::rules::Rules;
use crate::state::GameState;

impl<R: Rules + ?Sized> Tracker<'_, R> {
    /// Spend one use of each matched ability. Used-up abilities are removed,
    /// and the holder closes if one of them says so.
    pub(super) fn use_abilities(
        &self,
        state: &mut GameState,
        entity: EntityId,
        used: &[usize],
    ) -> TwResult<()> {
        let holder = state.entities.get_mut(entity)?;
        let mut closes = false;
        for &index in used.iter().rev() {
            let Some(ability) = holder.abilities.get_mut(index) else {
                continue;
            };
            if ability.use_once() {
                let ability = holder.abilities.remove(index);
                closes |= ability.closed_when_used_up;
            }
        }
        if closes {
            let name = holder.name.clone();
            state.close(entity)?;
            state.log.push(format!("{name} closes"));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn pay_tile_cost(
        &self,
        state: &mut GameState,
        entity: &Entity,
        spender: &Entity,
        tile: &Tile,
        rotation: u8,
        hex: &Hex,
        cost: Money,
    ) -> TwResult<()> {
        if cost > 0 {
            state.spend(spender.id, cost)?;
        }

        let via = if spender.id == entity.id || !entity.is_company() {
            String::new()
        } else {
            format!(" ({})", entity.sym)
        };
        let spends = if cost == 0 {
            String::new()
        } else {
            format!(" spends {} and", state.format_currency(cost))
        };
        let location = tile
            .location_name
            .as_ref()
            .or(hex.location_name.as_ref())
            .map(|name| format!(" ({name})"))
            .unwrap_or_default();
        state.log.push(format!(
            "{}{via}{spends} lays tile #{} with rotation {rotation} on {}{location}",
            spender.name, tile.name, hex.name
        ));
        Ok(())
    }

    /// Laying track on a bare multi-city hex unseats its tokens; their owner
    /// picks a city later.
    pub(super) fn update_token(
        &self,
        state: &mut GameState,
        round: &mut RoundState,
        entity: &Entity,
        hex: &Hex,
        old_tile: &Tile,
    ) -> TwResult<()> {
        let tile = state.map.hex_tile(hex.id)?;
        if old_tile.has_paths() || !tile.has_paths() || tile.cities.len() <= 1 {
            return Ok(());
        }
        let tokens: Vec<_> = tile.tokens().collect();
        if tokens.is_empty() {
            return Ok(());
        }

        let actor = if entity.is_company() {
            entity.owner.ok_or(TwError::Invariant {
                what: "company without owner laid a tile",
            })?
        } else {
            entity.id
        };
        let actor_name = state.entity(actor)?.name.clone();
        for token in tokens {
            round.pending_tokens.push(PendingToken {
                entity: actor,
                hexes: vec![hex.id],
                token,
            });
            state.log.push(format!("{actor_name} must choose city for token"));
            state.map.remove_token(token)?;
        }
        Ok(())
    }

    /// Pay every open company with a tile-income ability that this lay triggers.
    pub(super) fn pay_tile_income(
        &self,
        state: &mut GameState,
        terrain: &[Terrain],
        entity: EntityId,
        spender: EntityId,
    ) -> TwResult<()> {
        let payouts: Vec<(String, EntityId, TileIncomeAbility)> = state
            .companies_with_ability(AbilityType::TileIncome)
            .into_iter()
            .filter_map(|(company, ability)| match (&ability.kind, company.owner) {
                (AbilityKind::TileIncome(income), Some(owner)) => {
                    Some((company.name.clone(), owner, income.clone()))
                }
                _ => None,
            })
            .collect();

        for (company, owner, ability) in payouts {
            let (income, what) = match ability.terrain {
                None => (ability.income, "the tile".to_string()),
                Some(kind) => {
                    if !terrain.contains(&kind) {
                        continue;
                    }
                    if ability.owner_only && owner != entity && owner != spender {
                        continue;
                    }
                    // Each crossed border of the terrain counts
                    let count = terrain.iter().filter(|&&t| t == kind).count() as Money;
                    (ability.income * count, format!("the {kind} tile"))
                }
            };
            state.transfer(Account::Bank, Account::Entity(owner), income)?;
            let owner_name = &state.entity(owner)?.name;
            let message = format!(
                "{owner_name} earns {} for {what} built by {company}",
                state.format_currency(income)
            );
            state.log.push(message);
        }
        Ok(())
    }
}
