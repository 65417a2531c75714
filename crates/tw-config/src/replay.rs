//! Replaying a scenario's actions through the tracker.

use serde::Serialize;
use tw_core::{EntityId, HexId, TwError, TwResult};
use tw_engine::{GameState, LayTileAction, RoundState, Rules, Tracker};

use crate::build::LoadedScenario;
use crate::schema::ActionDef;

#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub index: usize,
    pub action: ActionDef,
    /// Why the tracker refused the action, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub outcomes: Vec<ActionOutcome>,
    pub round: RoundState,
    pub log: Vec<String>,
}

impl ReplayReport {
    pub fn rejected(&self) -> impl Iterator<Item = &ActionOutcome> + '_ {
        self.outcomes.iter().filter(|o| o.rejected.is_some())
    }
}

fn entity_named(state: &GameState, sym: &str) -> TwResult<EntityId> {
    state
        .entities
        .by_sym(sym)
        .map(|e| e.id)
        .ok_or_else(|| TwError::NotFound {
            what: "Entity",
            name: sym.to_string(),
        })
}

fn hex_named(state: &GameState, name: &str) -> TwResult<HexId> {
    state
        .map
        .hex_by_name(name)
        .map(|h| h.id)
        .ok_or_else(|| TwError::NotFound {
            what: "Hex",
            name: name.to_string(),
        })
}

/// Apply one action. Illegal actions leave the game untouched.
pub fn apply(
    tracker: &Tracker<'_, dyn Rules>,
    state: &mut GameState,
    round: &mut RoundState,
    action: &ActionDef,
) -> TwResult<()> {
    match action {
        ActionDef::NewTurn { entity } => {
            state.current_entity = Some(entity_named(state, entity)?);
            tracker.setup(round);
            Ok(())
        }
        ActionDef::LayTile {
            entity,
            hex,
            tile,
            rotation,
            spender,
        } => {
            let entity = entity_named(state, entity)?;
            let hex = hex_named(state, hex)?;
            let tile = state
                .map
                .available_tile_named(tile)
                .ok_or_else(|| TwError::illegal(format!("Tile {tile} is not available")))?;
            let spender = spender
                .as_deref()
                .map(|sym| entity_named(state, sym))
                .transpose()?;
            let lay = LayTileAction::new(entity, hex, tile, *rotation);
            tracker.lay_tile_action(state, round, &lay, None, spender)
        }
    }
}

/// Run every action in order. Rejected actions are reported and skipped;
/// any other error stops the replay.
pub fn replay(loaded: &mut LoadedScenario) -> TwResult<ReplayReport> {
    let tracker = Tracker::new(loaded.rules.as_ref());
    let state = &mut loaded.state;
    let mut round = RoundState::new();
    tracker.setup(&mut round);

    let mut outcomes = Vec::with_capacity(loaded.actions.len());
    for (index, action) in loaded.actions.iter().enumerate() {
        let rejected = match apply(&tracker, state, &mut round, action) {
            Ok(()) => None,
            Err(err) if err.is_illegal_action() => {
                tracing::warn!(index, %err, "action rejected");
                Some(err.to_string())
            }
            Err(err) => return Err(err),
        };
        outcomes.push(ActionOutcome {
            index,
            action: action.clone(),
            rejected,
        });
    }

    Ok(ReplayReport {
        outcomes,
        round,
        log: state.log.entries().to_vec(),
    })
}
