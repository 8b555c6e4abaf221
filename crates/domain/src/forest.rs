//! Containment forest for a single actor's item collection
//!
//! [`ContainerForest`] indexes one actor's items by id and maintains the
//! parent/children back-references under drag-and-drop reparenting.
//!
//! # Invariants
//!
//! After every committed operation:
//! 1. `child.parent == Some(container.id)` iff `child.id` appears in
//!    `container.children`
//! 2. Parent chains are acyclic and reach top level within the item count
//! 3. Only containers have non-empty `children`
//! 4. No `children` list contains duplicates
//! 5. No dangling parent/children references
//!
//! A proposed move that would violate acyclicity fails with
//! [`ForestError::Cycle`] before anything is mutated. Everything else is
//! tolerant of externally-mutated state: corrupted links found in loaded
//! snapshots are healed, and removing an id that is already absent is a
//! no-op rather than an error.
//!
//! Items themselves are created and destroyed by an external owner; the
//! forest only rewires `parent`/`children` of items it was handed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{Item, ItemKind};
use crate::events::DimensionalNesting;
use crate::ids::{ActorId, ItemId};

/// Structural errors of the containment forest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForestError {
    /// The id does not resolve to an item in this actor's collection.
    #[error("Item not found in forest: {0}")]
    UnknownItem(ItemId),

    /// An item with this id is already registered.
    #[error("Item already registered: {0}")]
    DuplicateItem(ItemId),

    /// The proposed move would make the item its own ancestor.
    #[error("Inserting item would create a loop: {item} is an ancestor of {target}")]
    Cycle { item: ItemId, target: ItemId },

    /// An invariant audit found a violation.
    #[error("Forest inconsistency: {0}")]
    Inconsistent(String),
}

/// Where an item ended up after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    TopLevel,
    Inside(ItemId),
}

/// Result of a committed [`ContainerForest::move_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub placement: Placement,
    /// False when the drop was a tolerated no-op (self-drop, or detaching an
    /// item that was already at top level).
    pub changed: bool,
    /// Present when the move nested one extradimensional container inside
    /// another; at most one per move.
    pub dimensional_nesting: Option<DimensionalNesting>,
    /// Ids whose snapshots were mutated, for the persistence collaborator.
    pub touched: Vec<ItemId>,
}

/// A top-level container with its direct contents materialized for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerEntry {
    pub container: Item,
    /// Direct children in the container's drop order. Nested containers
    /// appear here as plain items; their own contents are not expanded.
    pub contents: Vec<Item>,
}

/// Display grouping of an actor's inventory: top-level items by kind, with
/// each top-level container carrying its direct contents inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryView {
    pub weapons: Vec<Item>,
    pub equipment: Vec<Item>,
    pub consumables: Vec<Item>,
    pub tools: Vec<Item>,
    pub containers: Vec<ContainerEntry>,
}

/// One actor's items, indexed by id, with containment links kept consistent.
#[derive(Debug, Clone)]
pub struct ContainerForest {
    actor_id: ActorId,
    items: HashMap<ItemId, Item>,
    /// Collection insertion order; drives iteration and display grouping.
    order: Vec<ItemId>,
}

impl ContainerForest {
    // =========================================================================
    // Construction
    // =========================================================================

    pub fn new(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            items: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Bulk-load externally stored item snapshots.
    ///
    /// Corrupted links are healed rather than rejected: dangling parents go
    /// to top level, dangling or duplicate children entries are dropped,
    /// children of non-containers are cleared, missing back-references are
    /// re-added, and a parent cycle present in the input is broken at the
    /// link that closes it. The one hard error is a duplicate item id.
    pub fn from_items(
        actor_id: ActorId,
        items: impl IntoIterator<Item = Item>,
    ) -> Result<Self, ForestError> {
        let mut forest = Self::new(actor_id);
        for item in items {
            if forest.items.contains_key(&item.id) {
                return Err(ForestError::DuplicateItem(item.id));
            }
            forest.order.push(item.id);
            forest.items.insert(item.id, item);
        }
        forest.heal();
        Ok(forest)
    }

    // =========================================================================
    // Read queries
    // =========================================================================

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Items in collection insertion order.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Walk the parent chain of `id`, innermost container first.
    ///
    /// Guarded by a visited set so the walk terminates even if the parent
    /// chain was corrupted into a loop by external data.
    pub fn ancestors(&self, id: ItemId) -> impl Iterator<Item = &Item> + '_ {
        let mut seen = HashSet::new();
        seen.insert(id);
        let first = self
            .items
            .get(&id)
            .and_then(|item| item.parent)
            .and_then(|parent| self.items.get(&parent));
        std::iter::successors(first, move |item| {
            if !seen.insert(item.id) {
                return None;
            }
            item.parent.and_then(|parent| self.items.get(&parent))
        })
    }

    /// True if `ancestor` appears in the parent chain of `item`.
    pub fn is_ancestor_of(&self, ancestor: ItemId, item: ItemId) -> bool {
        self.ancestors(item).any(|i| i.id == ancestor)
    }

    /// True if `id` or any container above it is extradimensional.
    pub fn has_dimensional_ancestor(&self, id: ItemId) -> bool {
        self.items
            .get(&id)
            .map(Item::is_dimensional_container)
            .unwrap_or(false)
            || self.ancestors(id).any(Item::is_dimensional_container)
    }

    /// True if `id` or anything nested inside it is an extradimensional
    /// container.
    ///
    /// Iterative depth-first walk with a visited guard, so corrupted
    /// children links cannot recurse unboundedly.
    pub fn subtree_has_dimensional(&self, id: ItemId) -> bool {
        let mut stack = vec![id];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(item) = self.items.get(&current) else {
                continue;
            };
            if item.is_dimensional_container() {
                return true;
            }
            stack.extend(item.children.iter().copied());
        }
        false
    }

    // =========================================================================
    // Lifecycle hooks (item creation/destruction happens outside)
    // =========================================================================

    /// Register an externally created item. Its links are healed the same
    /// way bulk loads are.
    pub fn insert(&mut self, item: Item) -> Result<(), ForestError> {
        if self.items.contains_key(&item.id) {
            return Err(ForestError::DuplicateItem(item.id));
        }
        self.order.push(item.id);
        self.items.insert(item.id, item);
        self.heal();
        Ok(())
    }

    /// Unregister an externally destroyed item.
    ///
    /// The item is detached from its parent and its direct children are
    /// lifted to top level.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let item = self.items.remove(&id)?;
        self.order.retain(|other| *other != id);
        if let Some(parent) = item.parent {
            if let Some(container) = self.items.get_mut(&parent) {
                container.children.retain(|child| *child != id);
            }
        }
        for child in &item.children {
            if let Some(child_item) = self.items.get_mut(child) {
                child_item.parent = None;
            }
        }
        Some(item)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Reparent `item_id` into `target` (a container) or to top level.
    ///
    /// Precondition checks, in order:
    /// - unknown item or target id fails with [`ForestError::UnknownItem`];
    /// - dropping an item onto itself is a silent no-op;
    /// - a target inside the dragged item's subtree fails with
    ///   [`ForestError::Cycle`] and leaves the forest untouched;
    /// - a non-container target degrades to a top-level drop, like dropping
    ///   onto empty space.
    ///
    /// Nesting one extradimensional container inside another is allowed; the
    /// outcome carries a [`DimensionalNesting`] event for the notification
    /// collaborator.
    pub fn move_item(
        &mut self,
        item_id: ItemId,
        target: Option<ItemId>,
    ) -> Result<MoveOutcome, ForestError> {
        if !self.items.contains_key(&item_id) {
            return Err(ForestError::UnknownItem(item_id));
        }
        if let Some(target_id) = target {
            if !self.items.contains_key(&target_id) {
                return Err(ForestError::UnknownItem(target_id));
            }
        }

        let old_parent = self.items.get(&item_id).and_then(|item| item.parent);

        // Dropping an item onto itself: success without mutation.
        if target == Some(item_id) {
            return Ok(MoveOutcome {
                placement: old_parent.map(Placement::Inside).unwrap_or(Placement::TopLevel),
                changed: false,
                dimensional_nesting: None,
                touched: Vec::new(),
            });
        }

        // The target must not sit inside the dragged item's subtree: walking
        // its parent chain must never reach the dragged item. Checked before
        // anything mutates, so a rejected move leaves the forest unchanged.
        if let Some(target_id) = target {
            let mut seen = HashSet::new();
            let mut current = target_id;
            loop {
                if current == item_id {
                    return Err(ForestError::Cycle {
                        item: item_id,
                        target: target_id,
                    });
                }
                if !seen.insert(current) {
                    break;
                }
                match self.items.get(&current).and_then(|item| item.parent) {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
        }

        // Dropping onto a non-container behaves like dropping onto empty
        // space: the item goes to top level.
        let dest = target.filter(|target_id| {
            self.items
                .get(target_id)
                .map(Item::is_container)
                .unwrap_or(false)
        });

        // Already top level and dropped to top level: nothing to rewire.
        if old_parent.is_none() && dest.is_none() {
            return Ok(MoveOutcome {
                placement: Placement::TopLevel,
                changed: false,
                dimensional_nesting: None,
                touched: Vec::new(),
            });
        }

        // Two-sided extradimensional check, computed before the mutation:
        // the target side looks at the container and its ancestors, the
        // dragged side at the item and its whole subtree.
        let dimensional_nesting = dest.and_then(|target_id| {
            if self.has_dimensional_ancestor(target_id) && self.subtree_has_dimensional(item_id) {
                let dragged = self.items.get(&item_id)?.name.clone();
                let target_name = self.items.get(&target_id)?.name.clone();
                Some(DimensionalNesting::new(self.actor_id, dragged, target_name))
            } else {
                None
            }
        });

        // Detach from the old container, then attach to the new one. Single
        // threaded and infallible from here on, so the caller never observes
        // a partial state.
        if let Some(parent) = old_parent {
            if let Some(container) = self.items.get_mut(&parent) {
                container.children.retain(|child| *child != item_id);
            }
        }
        if let Some(item) = self.items.get_mut(&item_id) {
            item.parent = dest;
        }
        if let Some(target_id) = dest {
            if let Some(container) = self.items.get_mut(&target_id) {
                container.children.push(item_id);
            }
        }

        let mut touched = vec![item_id];
        if let Some(parent) = old_parent {
            if !touched.contains(&parent) {
                touched.push(parent);
            }
        }
        if let Some(target_id) = dest {
            if !touched.contains(&target_id) {
                touched.push(target_id);
            }
        }

        Ok(MoveOutcome {
            placement: dest.map(Placement::Inside).unwrap_or(Placement::TopLevel),
            changed: true,
            dimensional_nesting,
            touched,
        })
    }

    /// Remove `item_id` from its parent's `children` without touching the
    /// item's own `parent` field.
    ///
    /// Callers pair this with a subsequent [`Self::move_item`], mirroring the
    /// detach-then-attach transaction the move itself performs. Both an item
    /// already at top level and a children entry that is already missing are
    /// tolerated no-ops, so the operation is idempotent and heals rather
    /// than rejects externally-inconsistent state.
    pub fn remove_from_container(&mut self, item_id: ItemId) -> Result<(), ForestError> {
        let parent = self
            .items
            .get(&item_id)
            .ok_or(ForestError::UnknownItem(item_id))?
            .parent;
        let Some(parent) = parent else {
            return Ok(());
        };
        if let Some(container) = self.items.get_mut(&parent) {
            container.children.retain(|child| *child != item_id);
        }
        Ok(())
    }

    // =========================================================================
    // Invariant audit
    // =========================================================================

    /// Read-only check of the forest invariants.
    ///
    /// Intended for callers that hand item snapshots to code outside the
    /// forest and want to audit them afterwards.
    pub fn validate(&self) -> Result<(), ForestError> {
        if self.order.len() != self.items.len() {
            return Err(ForestError::Inconsistent(format!(
                "order list has {} entries for {} items",
                self.order.len(),
                self.items.len()
            )));
        }
        for item in self.items.values() {
            if !item.is_container() && !item.children.is_empty() {
                return Err(ForestError::Inconsistent(format!(
                    "non-container {} has children",
                    item.id
                )));
            }
            let mut seen = HashSet::new();
            for child in &item.children {
                if !seen.insert(*child) {
                    return Err(ForestError::Inconsistent(format!(
                        "container {} lists child {} twice",
                        item.id, child
                    )));
                }
                let child_item = self.items.get(child).ok_or_else(|| {
                    ForestError::Inconsistent(format!(
                        "container {} lists unknown child {}",
                        item.id, child
                    ))
                })?;
                if child_item.parent != Some(item.id) {
                    return Err(ForestError::Inconsistent(format!(
                        "child {} of container {} points at {:?}",
                        child, item.id, child_item.parent
                    )));
                }
            }
            if let Some(parent) = item.parent {
                let container = self.items.get(&parent).ok_or_else(|| {
                    ForestError::Inconsistent(format!(
                        "item {} has unknown parent {}",
                        item.id, parent
                    ))
                })?;
                if !container.children.contains(&item.id) {
                    return Err(ForestError::Inconsistent(format!(
                        "container {} is missing back-reference to {}",
                        parent, item.id
                    )));
                }
            }
            // The parent chain must reach top level within the item count.
            let mut steps = 0usize;
            let mut current = item.parent;
            while let Some(parent) = current {
                steps += 1;
                if steps > self.items.len() {
                    return Err(ForestError::Inconsistent(format!(
                        "parent chain of {} does not terminate",
                        item.id
                    )));
                }
                current = self.items.get(&parent).and_then(|i| i.parent);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Display grouping
    // =========================================================================

    /// Partition the collection for sheet rendering.
    ///
    /// Top-level items group by kind; every top-level container materializes
    /// its direct children inline, in the container's own `children` order.
    /// Items inside a container are dropped from the top-level groups, so a
    /// container nested two levels deep renders under its immediate
    /// container, not at the root.
    pub fn inventory_view(&self) -> InventoryView {
        let mut view = InventoryView::default();
        for item in self.items() {
            let nested = item
                .parent
                .and_then(|parent| self.items.get(&parent))
                .map(Item::is_container)
                .unwrap_or(false);
            if nested {
                continue;
            }
            match item.kind {
                ItemKind::Weapon => view.weapons.push(item.clone()),
                ItemKind::Equipment => view.equipment.push(item.clone()),
                ItemKind::Consumable => view.consumables.push(item.clone()),
                ItemKind::Tool => view.tools.push(item.clone()),
                ItemKind::Container => {
                    let contents = item
                        .children
                        .iter()
                        .filter_map(|child| self.items.get(child))
                        .cloned()
                        .collect();
                    view.containers.push(ContainerEntry {
                        container: item.clone(),
                        contents,
                    });
                }
            }
        }
        view
    }

    // =========================================================================
    // Link healing
    // =========================================================================

    /// Normalize links after a bulk load or insert.
    ///
    /// The parent pointer is authoritative for membership; the children list
    /// is authoritative for ordering. Idempotent.
    fn heal(&mut self) {
        let ids: Vec<ItemId> = self.order.clone();

        // Only containers keep children; entries must exist, no self-links,
        // no duplicates.
        for id in &ids {
            let (is_container, children) = match self.items.get(id) {
                Some(item) => (item.is_container(), item.children.clone()),
                None => continue,
            };
            let mut kept = Vec::new();
            if is_container {
                let mut seen = HashSet::new();
                for child in children {
                    if child != *id && self.items.contains_key(&child) && seen.insert(child) {
                        kept.push(child);
                    }
                }
            }
            if let Some(item) = self.items.get_mut(id) {
                item.children = kept;
            }
        }

        // Parent pointers must reference an existing container.
        for id in &ids {
            let parent = self.items.get(id).and_then(|item| item.parent);
            let valid = parent.filter(|p| *p != *id).filter(|p| {
                self.items
                    .get(p)
                    .map(Item::is_container)
                    .unwrap_or(false)
            });
            if let Some(item) = self.items.get_mut(id) {
                item.parent = valid;
            }
        }

        // Membership must match the parent pointers: drop entries whose item
        // points elsewhere, re-add missing back-references.
        for id in &ids {
            let kept: Vec<ItemId> = self
                .items
                .get(id)
                .map(|item| item.children.clone())
                .unwrap_or_default()
                .into_iter()
                .filter(|child| {
                    self.items
                        .get(child)
                        .map(|c| c.parent == Some(*id))
                        .unwrap_or(false)
                })
                .collect();
            if let Some(item) = self.items.get_mut(id) {
                item.children = kept;
            }
        }
        for id in &ids {
            let Some(parent) = self.items.get(id).and_then(|item| item.parent) else {
                continue;
            };
            let listed = self
                .items
                .get(&parent)
                .map(|container| container.children.contains(id))
                .unwrap_or(true);
            if !listed {
                if let Some(container) = self.items.get_mut(&parent) {
                    container.children.push(*id);
                }
            }
        }

        // Break any parent cycle at the link that closes it.
        for id in &ids {
            let mut seen = HashSet::new();
            seen.insert(*id);
            let mut current = *id;
            while let Some(parent) = self.items.get(&current).and_then(|item| item.parent) {
                if !seen.insert(parent) {
                    if let Some(container) = self.items.get_mut(&parent) {
                        container.children.retain(|child| *child != current);
                    }
                    if let Some(item) = self.items.get_mut(&current) {
                        item.parent = None;
                    }
                    break;
                }
                current = parent;
            }
        }
    }
}
