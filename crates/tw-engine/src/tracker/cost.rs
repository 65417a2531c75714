//! Border removal costs.

use tw_core::{Money, Terrain, TwResult};
use tw_map::{Border, Hex, Map};

use super::Tracker;
use crate::ability::AbilityKind;
use crate::entity::Entity;
use crate::rules::Rules;
use crate::state::GameState;

/// Borders removed by a lay.
#[derive(Debug, Default)]
pub(super) struct BorderCost {
    pub total: Money,
    pub types: Vec<Terrain>,
    /// Game log lines for discounts granted.
    pub discounts: Vec<String>,
}

impl<R: Rules + ?Sized> Tracker<'_, R> {
    /// Remove every costed border the new track crosses, on both sides, and
    /// total what it costs.
    pub(super) fn remove_border_calculate_cost(
        &self,
        state: &GameState,
        staged: &mut Map,
        entity: &Entity,
        hex: &Hex,
    ) -> TwResult<BorderCost> {
        let mut out = BorderCost::default();
        let borders = staged.hex_tile(hex.id)?.borders.clone();
        for border in borders {
            let Some(cost) = border.cost else {
                continue;
            };
            let Some(neighbor) = staged.neighbor(hex.id, border.edge) else {
                continue;
            };
            if !staged.targeting(hex.id, neighbor) || !staged.targeting(neighbor, hex.id) {
                continue;
            }
            if let Some(terrain) = border.terrain {
                out.types.push(terrain);
            }
            staged.remove_shared_border(hex.id, border.edge)?;
            out.total +=
                cost - self.border_cost_discount(state, entity, &border, hex, &mut out.discounts);
        }
        Ok(out)
    }

    fn border_cost_discount(
        &self,
        state: &GameState,
        entity: &Entity,
        border: &Border,
        hex: &Hex,
        log: &mut Vec<String>,
    ) -> Money {
        let found = state.all_abilities(entity.id).into_iter().find_map(|a| match &a.kind {
            AbilityKind::TileDiscount(d)
                if d.terrain.is_some()
                    && d.terrain == border.terrain
                    && d.hexes.as_ref().is_none_or(|h| h.contains(&hex.name)) =>
            {
                Some((a.owner, d.discount))
            }
            _ => None,
        });
        let Some((owner, discount)) = found else {
            return 0;
        };
        if discount > 0 {
            let from = state.entity(owner).map(|o| o.name.as_str()).unwrap_or_default();
            log.push(format!(
                "{} receives a discount of {} from {from}",
                entity.name,
                state.format_currency(discount)
            ));
        }
        discount
    }
}
