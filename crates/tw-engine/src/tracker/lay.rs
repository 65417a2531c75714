//! Applying a single lay.

use tw_core::{EntityId, Money, TwError, TwResult, validate_rotation};
use tw_map::{Connectivity, WalkOptions};

use super::Tracker;
use crate::ability::AbilityKind;
use crate::action::LayTileAction;
use crate::entity::Entity;
use crate::round::RoundState;
use crate::rules::Rules;
use crate::state::GameState;

/// What the entity's own abilities say about a lay.
#[derive(Debug, Default)]
pub(super) struct AbilityScan {
    pub found: bool,
    pub teleport: bool,
    pub free: bool,
    pub discount: Money,
    pub extra_cost: Money,
    /// Charged on top of the lay, one entry per teleport.
    pub teleport_costs: Vec<Money>,
    pub reachable: bool,
    /// Indices into the entity's ability list.
    pub used: Vec<usize>,
}

/// Errors after the map is committed mean the pre-commit checks missed something.
fn committed<T>(result: TwResult<T>) -> TwResult<T> {
    result.map_err(|err| match err {
        TwError::IllegalAction { reason } => {
            tracing::error!(%reason, "lay failed after commit");
            TwError::Invariant {
                what: "lay failed after commit",
            }
        }
        other => other,
    })
}

impl<R: Rules + ?Sized> Tracker<'_, R> {
    /// Validate and apply a lay.
    ///
    /// `extra_cost` is added to the charge, `entity` overrides the acting
    /// entity and `spender` the payer. Nothing changes if an error is returned.
    pub fn lay_tile(
        &self,
        state: &mut GameState,
        round: &mut RoundState,
        action: &LayTileAction,
        extra_cost: Money,
        entity: Option<EntityId>,
        spender: Option<EntityId>,
    ) -> TwResult<()> {
        let entity_id = entity.unwrap_or(action.entity);
        let spender_id = spender.unwrap_or(entity_id);
        let entity = state.entity(entity_id)?.clone();
        let spender = state.entity(spender_id)?.clone();
        let rotation = validate_rotation(action.rotation)?;
        let hex = state.map.hex(action.hex)?.clone();

        self.rules.before_lay_tile(state, action)?;
        if !state.loading {
            self.check_blocked_hex(state, entity_id, &hex)?;
        }

        if !state.map.is_available(action.tile) {
            let name = &state.map.tile(action.tile)?.name;
            return Err(TwError::illegal(format!("Tile {name} is not available")));
        }
        let old_tile = state.map.tile(hex.tile())?.clone();
        let mut tile = state.map.tile(action.tile)?.clone();
        tile.rotate(rotation);

        let special = entity.is_company();
        let selected = special.then_some(entity_id);
        if !self.rules.upgrades_to(state, &old_tile, &tile, special, selected) {
            return Err(TwError::illegal(format!(
                "{} is not upgradeable to {}",
                old_tile.name, tile.name
            )));
        }

        let scan = self.scan_abilities(&entity, &hex.name, &tile.name);
        if !state.loading && !self.rotation_is_legal(state, entity_id, &hex, &tile, scan.teleport) {
            return Err(TwError::illegal(format!(
                "{} is not legally rotated for {}",
                old_tile.name, tile.name
            )));
        }

        let mut staged = state.map.clone();
        staged.rotate_tile(tile.id, rotation)?;
        staged.update_tile_lists(tile.id, old_tile.id)?;
        staged.lay(hex.id, tile.id)?;

        if scan.reachable && !state.loading && spender.home() != Some(hex.id) {
            let walk = WalkOptions {
                skip_track: state.graph.skip_track(),
                ignore_tokens: false,
            };
            if !Connectivity::compute(&staged, spender_id, walk).is_reachable(hex.id) {
                return Err(TwError::illegal(format!(
                    "Track laid must be connected to one of {}'s stations",
                    spender.sym
                )));
            }
        }
        if entity.is_company() && !scan.found {
            return Err(TwError::illegal(format!(
                "{} does not have an ability that allows them to lay this tile",
                entity.name
            )));
        }
        if !scan.teleport {
            self.check_track_restrictions(state, &staged, &entity, hex.id, &old_tile)?;
        }

        let borders = self.remove_border_calculate_cost(state, &mut staged, &entity, &hex)?;
        let placed = staged.tile(tile.id)?.clone();
        let mut terrain = old_tile.terrain();
        let surcharge = extra_cost + scan.extra_cost;
        let cost = if scan.free {
            surcharge
        } else {
            if borders.total > 0 {
                terrain.extend(borders.types.iter().copied());
            }
            let base = self.rules.upgrade_cost(state, &old_tile, &placed, &hex, entity_id)
                + borders.total
                + surcharge
                - scan.discount;
            self.rules
                .tile_cost_with_discount(state, &placed, &hex, entity_id, base)
        };

        let due = cost.max(0) + scan.teleport_costs.iter().sum::<Money>();
        if due > 0 && self.rules.buying_power(state, spender_id) < due {
            return Err(TwError::illegal(format!(
                "{} cannot afford {}",
                spender.name,
                state.format_currency(due)
            )));
        }

        state.map = staged;
        tracing::debug!(
            entity = %entity.sym,
            hex = %hex.name,
            tile = %placed.name,
            rotation,
            cost,
            "tile laid"
        );

        for message in borders.discounts {
            state.log.push(message);
        }
        committed(self.use_abilities(state, entity_id, &scan.used))?;
        // Borrow for teleports and the lay together, before anything is spent
        committed(self.rules.try_take_loan(state, spender_id, due))?;
        for teleport_cost in &scan.teleport_costs {
            committed(state.spend(spender_id, *teleport_cost))?;
            let location = hex.location_name.as_deref().unwrap_or_default();
            let message = format!(
                "{} ({}) spends {} and teleports to {} ({location})",
                spender.name,
                entity.sym,
                state.format_currency(*teleport_cost),
                hex.name
            );
            state.log.push(message);
        }
        committed(self.pay_tile_cost(state, &entity, &spender, &placed, rotation, &hex, cost))?;
        committed(self.update_token(state, round, &entity, &hex, &old_tile))?;
        committed(self.pay_tile_income(state, &terrain, entity_id, spender_id))?;
        committed(self.rules.after_lay_tile(state, action))
    }

    /// Match the acting entity's own tile-lay and teleport abilities.
    ///
    /// Later matches override `free` and `discount`; surcharges add up.
    pub(super) fn scan_abilities(&self, entity: &Entity, hex: &str, tile: &str) -> AbilityScan {
        let mut scan = AbilityScan::default();
        for (index, ability) in entity.abilities.iter().enumerate() {
            if !ability.active_at(self.timing) || !ability.matches_lay(hex, tile) {
                continue;
            }
            match &ability.kind {
                AbilityKind::Teleport(teleport) => {
                    scan.teleport = true;
                    if teleport.free_tile_lay {
                        scan.free = true;
                    }
                    if teleport.cost > 0 {
                        scan.teleport_costs.push(teleport.cost);
                    }
                }
                AbilityKind::TileLay(lay) => {
                    scan.reachable |= lay.reachable;
                    scan.free = lay.free;
                    scan.discount = lay.discount;
                    scan.extra_cost += lay.cost;
                }
                AbilityKind::BlocksHexes { .. }
                | AbilityKind::TileDiscount(_)
                | AbilityKind::TileIncome(_) => continue,
            }
            scan.found = true;
            scan.used.push(index);
        }
        scan
    }
}
