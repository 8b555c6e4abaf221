//! Item entity - objects owned by an actor, optionally nested in containers
//!
//! Containment is modeled with plain back-references rather than ownership:
//! `parent` holds the id of the enclosing container (or `None` for top
//! level), and a container's `children` lists the ids directly inside it.
//! The [`crate::forest::ContainerForest`] keeps both sides consistent; code
//! outside the forest should treat `parent`/`children` as read-only.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ActorId, ItemId};
use crate::value_objects::ItemName;

/// Inventory classification for an item.
///
/// A closed set: only `Container` carries nesting semantics. Everything else
/// differs solely in which sheet group it renders under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Equipment,
    Consumable,
    Tool,
    Container,
}

impl ItemKind {
    /// Sheet label for the inventory group of this kind.
    pub fn group_label(&self) -> &'static str {
        match self {
            Self::Weapon => "Weapons",
            Self::Equipment => "Equipment",
            Self::Consumable => "Consumables",
            Self::Tool => "Tools",
            Self::Container => "Containers",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weapon => write!(f, "weapon"),
            Self::Equipment => write!(f, "equipment"),
            Self::Consumable => write!(f, "consumable"),
            Self::Tool => write!(f, "tool"),
            Self::Container => write!(f, "container"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weapon" => Ok(Self::Weapon),
            "equipment" => Ok(Self::Equipment),
            "consumable" => Ok(Self::Consumable),
            "tool" => Ok(Self::Tool),
            "container" => Ok(Self::Container),
            other => Err(DomainError::parse(format!("Unknown item kind: {other}"))),
        }
    }
}

/// An object owned by an actor
///
/// This is a data-carrying struct with public fields. The containment links
/// (`parent`, `children`) are maintained by the forest; any combination of
/// the remaining fields is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub actor_id: ActorId,
    pub name: ItemName,
    pub kind: ItemKind,
    pub description: Option<String>,
    /// Marks an extradimensional container; meaningful only when
    /// `kind == Container`
    pub dimensional: bool,
    /// Enclosing container, `None` when the item sits at top level
    pub parent: Option<ItemId>,
    /// Ids directly contained in this item, in drop order; empty unless
    /// `kind == Container`
    pub children: Vec<ItemId>,
}

impl Item {
    pub fn new(actor_id: ActorId, name: ItemName, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            actor_id,
            name,
            kind,
            description: None,
            dimensional: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_dimensional(mut self, dimensional: bool) -> Self {
        self.dimensional = dimensional;
        self
    }

    /// Whether this item can hold other items.
    pub fn is_container(&self) -> bool {
        self.kind == ItemKind::Container
    }

    /// Whether this item is an extradimensional container.
    ///
    /// The `dimensional` flag on a non-container is stale data and is ignored.
    pub fn is_dimensional_container(&self) -> bool {
        self.is_container() && self.dimensional
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn named(name: &str) -> ItemName {
        ItemName::new(name).unwrap()
    }

    #[test]
    fn kind_display_from_str_round_trip() {
        for kind in [
            ItemKind::Weapon,
            ItemKind::Equipment,
            ItemKind::Consumable,
            ItemKind::Tool,
            ItemKind::Container,
        ] {
            assert_eq!(ItemKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = ItemKind::from_str("potion").unwrap_err();
        assert!(err.to_string().contains("potion"));
    }

    #[test]
    fn new_item_starts_top_level() {
        let item = Item::new(ActorId::new(), named("Longsword"), ItemKind::Weapon);
        assert_eq!(item.parent, None);
        assert!(item.children.is_empty());
        assert!(!item.is_container());
    }

    #[test]
    fn dimensional_flag_only_counts_on_containers() {
        let actor = ActorId::new();
        let sword =
            Item::new(actor, named("Glowing Sword"), ItemKind::Weapon).with_dimensional(true);
        assert!(!sword.is_dimensional_container());

        let bag =
            Item::new(actor, named("Bag of Holding"), ItemKind::Container).with_dimensional(true);
        assert!(bag.is_dimensional_container());
    }

    #[test]
    fn item_serde_round_trip() {
        let item = Item::new(ActorId::new(), named("Handy Haversack"), ItemKind::Container)
            .with_description("A sturdy pack")
            .with_dimensional(true);
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
