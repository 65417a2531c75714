//! Players, corporations and private companies.

use tw_core::{EntityId, HexId, Money, TwError, TwResult};

use crate::ability::{Ability, AbilityType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    /// Operates on the map. `home` is the hex of its first station.
    Corporation { home: Option<HexId> },
    /// Private company. Lays tiles only through abilities, on its owner's behalf.
    Company { min_price: Money },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    /// Short symbol, e.g. `DKR` or `PSM`.
    pub sym: String,
    pub name: String,
    pub kind: EntityKind,
    pub cash: Money,
    pub owner: Option<EntityId>,
    pub closed: bool,
    pub loans: u32,
    pub abilities: Vec<Ability>,
}

impl Entity {
    fn new(sym: impl Into<String>, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: EntityId::from_index(0),
            sym: sym.into(),
            name: name.into(),
            kind,
            cash: 0,
            owner: None,
            closed: false,
            loans: 0,
            abilities: Vec::new(),
        }
    }

    pub fn player(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name, EntityKind::Player)
    }

    pub fn corporation(sym: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(sym, name, EntityKind::Corporation { home: None })
    }

    pub fn company(sym: impl Into<String>, name: impl Into<String>, min_price: Money) -> Self {
        Self::new(sym, name, EntityKind::Company { min_price })
    }

    pub fn with_cash(mut self, cash: Money) -> Self {
        self.cash = cash;
        self
    }

    pub fn with_home(mut self, hex: HexId) -> Self {
        if let EntityKind::Corporation { home } = &mut self.kind {
            *home = Some(hex);
        }
        self
    }

    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player)
    }

    pub fn is_corporation(&self) -> bool {
        matches!(self.kind, EntityKind::Corporation { .. })
    }

    pub fn is_company(&self) -> bool {
        matches!(self.kind, EntityKind::Company { .. })
    }

    /// Runs a turn on the map.
    pub fn is_operator(&self) -> bool {
        self.is_corporation() && !self.closed
    }

    pub fn home(&self) -> Option<HexId> {
        match self.kind {
            EntityKind::Corporation { home } => home,
            _ => None,
        }
    }

    pub fn min_price(&self) -> Option<Money> {
        match self.kind {
            EntityKind::Company { min_price } => Some(min_price),
            _ => None,
        }
    }

    pub fn has_ability(&self, ty: AbilityType) -> bool {
        self.abilities.iter().any(|a| a.ability_type() == ty)
    }
}

/// Registry of every entity in the game, indexed by `EntityId`.
#[derive(Debug, Clone, Default)]
pub struct Entities {
    list: Vec<Entity>,
}

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity. Its abilities are stamped with the new id.
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId::from_index(self.list.len() as u32);
        entity.id = id;
        for ability in &mut entity.abilities {
            ability.owner = id;
        }
        self.list.push(entity);
        id
    }

    pub fn get(&self, id: EntityId) -> TwResult<&Entity> {
        self.list.get(id.slot()).ok_or_else(|| TwError::NotFound {
            what: "entity",
            name: id.to_string(),
        })
    }

    pub fn get_mut(&mut self, id: EntityId) -> TwResult<&mut Entity> {
        self.list.get_mut(id.slot()).ok_or_else(|| TwError::NotFound {
            what: "entity",
            name: id.to_string(),
        })
    }

    pub fn by_sym(&self, sym: &str) -> Option<&Entity> {
        self.list.iter().find(|e| e.sym == sym)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Open companies owned by `owner`.
    pub fn companies_of(&self, owner: EntityId) -> impl Iterator<Item = &Entity> + '_ {
        self.list
            .iter()
            .filter(move |e| e.is_company() && !e.closed && e.owner == Some(owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityKind, TileLayAbility};

    #[test]
    fn registration_stamps_ability_owner() {
        let mut entities = Entities::new();
        entities.add(Entity::player("Ann"));
        let id = entities.add(
            Entity::company("DKR", "Dublin & Kingstown", 20).with_ability(Ability::new(
                AbilityKind::TileLay(TileLayAbility::default()),
            )),
        );
        let company = entities.get(id).unwrap();
        assert_eq!(company.abilities[0].owner, id);
        assert_eq!(entities.by_sym("DKR").map(|e| e.id), Some(id));
    }

    #[test]
    fn closed_companies_are_not_listed() {
        let mut entities = Entities::new();
        let corp = entities.add(Entity::corporation("GSWR", "Great Southern"));
        let a = entities.add(Entity::company("A", "A", 10).with_owner(corp));
        entities.add(Entity::company("B", "B", 10).with_owner(corp));
        entities.get_mut(a).unwrap().closed = true;
        let syms: Vec<_> = entities.companies_of(corp).map(|c| c.sym.as_str()).collect();
        assert_eq!(syms, ["B"]);
    }

    #[test]
    fn unknown_entity() {
        let entities = Entities::new();
        let err = entities.get(EntityId::from_index(3)).unwrap_err();
        assert!(matches!(err, TwError::NotFound { what: "entity", .. }));
    }
}
