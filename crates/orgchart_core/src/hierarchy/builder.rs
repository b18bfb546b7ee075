//! Flat contact list to reporting forest.
//!
//! # Invariants
//! - Every input contact appears exactly once in the forest.
//! - A parent reference that resolves to no contact yields a root.
//! - Members of a parent cycle are all detached to roots; contacts hanging
//!   below a cycle stay attached to their cycle member.
//! - Roots and children keep input order.

use crate::model::contact::{Contact, ContactId};
use log::{debug, warn};
use std::collections::HashMap;

/// Arena index of a node inside one [`Forest`].
pub type NodeIndex = usize;

/// Why a contact with a `parent_id` ended up as a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachReason {
    /// `parent_id` names no contact in the input (deleted or foreign).
    MissingParent(ContactId),
    /// `parent_id` points at the contact itself.
    SelfReference,
    /// The contact is part of a reports-to cycle.
    Cycle,
}

/// One contact that was placed at root level against its `parent_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detachment {
    pub node: NodeIndex,
    pub contact_id: ContactId,
    pub reason: DetachReason,
}

/// One contact plus its resolved position in the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestNode {
    pub contact: Contact,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    /// 0-based distance from the node's root.
    pub depth: usize,
}

/// Zero or more rooted trees covering every contact of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    nodes: Vec<ForestNode>,
    roots: Vec<NodeIndex>,
    detached: Vec<Detachment>,
}

impl Forest {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn node(&self, index: NodeIndex) -> Option<&ForestNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[ForestNode] {
        &self.nodes
    }

    /// Contacts that were placed at root level despite a `parent_id`.
    pub fn detached(&self) -> &[Detachment] {
        &self.detached
    }

    /// Finds the node that owns `id` for child attachment.
    ///
    /// With duplicate ids this is the last occurrence in the input.
    pub fn find(&self, id: ContactId) -> Option<NodeIndex> {
        self.nodes.iter().rposition(|node| node.contact.id == id)
    }

    /// Resolved parent contact id of `id`, if it is attached to one.
    pub fn parent_of(&self, id: ContactId) -> Option<ContactId> {
        let node = self.nodes.get(self.find(id)?)?;
        node.parent.map(|parent| self.nodes[parent].contact.id)
    }

    /// Child contact ids of `id` in attachment order.
    pub fn children_of(&self, id: ContactId) -> Vec<ContactId> {
        self.find(id)
            .map(|index| {
                self.nodes[index]
                    .children
                    .iter()
                    .map(|child| self.nodes[*child].contact.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Node indexes in depth-first pre-order, roots in order.
    pub fn depth_first(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeIndex> = self.roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.nodes[index].children.iter().rev().copied());
        }
        order
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    OnPath,
    Done,
}

/// Builds the reporting forest for one organization's contacts.
///
/// Never fails: malformed references degrade to root placement so every
/// contact stays visible.
pub fn build_forest(contacts: &[Contact]) -> Forest {
    let mut index_by_id: HashMap<ContactId, NodeIndex> = HashMap::with_capacity(contacts.len());
    for (index, contact) in contacts.iter().enumerate() {
        index_by_id.insert(contact.id, index);
    }

    let mut detached = Vec::new();
    let mut parents: Vec<Option<NodeIndex>> = Vec::with_capacity(contacts.len());
    for (index, contact) in contacts.iter().enumerate() {
        let Some(parent_id) = contact.parent_id else {
            parents.push(None);
            continue;
        };
        match index_by_id.get(&parent_id) {
            Some(&parent) if parent == index => {
                detached.push(Detachment {
                    node: index,
                    contact_id: contact.id,
                    reason: DetachReason::SelfReference,
                });
                parents.push(None);
            }
            Some(&parent) => parents.push(Some(parent)),
            None => {
                detached.push(Detachment {
                    node: index,
                    contact_id: contact.id,
                    reason: DetachReason::MissingParent(parent_id),
                });
                parents.push(None);
            }
        }
    }

    for member in break_cycles(&mut parents) {
        detached.push(Detachment {
            node: member,
            contact_id: contacts[member].id,
            reason: DetachReason::Cycle,
        });
    }
    detached.sort_by_key(|detachment| detachment.node);

    let mut nodes: Vec<ForestNode> = contacts
        .iter()
        .zip(parents.iter())
        .map(|(contact, parent)| ForestNode {
            contact: contact.clone(),
            parent: *parent,
            children: Vec::new(),
            depth: 0,
        })
        .collect();

    let mut roots = Vec::new();
    for (index, parent) in parents.iter().enumerate() {
        match parent {
            Some(parent) => nodes[*parent].children.push(index),
            None => roots.push(index),
        }
    }

    let mut stack: Vec<NodeIndex> = roots.clone();
    while let Some(index) = stack.pop() {
        let child_depth = nodes[index].depth + 1;
        let children = nodes[index].children.clone();
        for child in children {
            nodes[child].depth = child_depth;
            stack.push(child);
        }
    }

    for detachment in &detached {
        warn!(
            "event=forest_detach module=hierarchy status=ok node={} reason={}",
            detachment.contact_id,
            match detachment.reason {
                DetachReason::MissingParent(_) => "missing_parent",
                DetachReason::SelfReference => "self_reference",
                DetachReason::Cycle => "cycle",
            }
        );
    }
    debug!(
        "event=forest_build module=hierarchy status=ok nodes={} roots={} detached={}",
        nodes.len(),
        roots.len(),
        detached.len()
    );

    Forest {
        nodes,
        roots,
        detached,
    }
}

/// Clears the parent link of every node that sits on a parent cycle.
///
/// Returns the affected nodes in discovery order. Each parent chain is
/// walked once, so the pass is linear in the number of nodes.
fn break_cycles(parents: &mut [Option<NodeIndex>]) -> Vec<NodeIndex> {
    let mut state = vec![Visit::Unseen; parents.len()];
    let mut members = Vec::new();
    let mut path = Vec::new();

    for start in 0..parents.len() {
        if state[start] != Visit::Unseen {
            continue;
        }

        path.clear();
        let mut cursor = Some(start);
        while let Some(current) = cursor {
            match state[current] {
                Visit::Done => break,
                Visit::OnPath => {
                    let cycle_start = path
                        .iter()
                        .position(|node| *node == current)
                        .unwrap_or(0);
                    for &member in &path[cycle_start..] {
                        parents[member] = None;
                        members.push(member);
                    }
                    break;
                }
                Visit::Unseen => {
                    state[current] = Visit::OnPath;
                    path.push(current);
                    cursor = parents[current];
                }
            }
        }

        for &node in &path {
            state[node] = Visit::Done;
        }
    }

    members
}

#[cfg(test)]
mod tests {
    use super::{break_cycles, build_forest, DetachReason};
    use crate::model::contact::Contact;
    use uuid::Uuid;

    fn contact(org: Uuid, name: &str) -> Contact {
        Contact::new(org, name, "Test")
    }

    #[test]
    fn break_cycles_detaches_every_member_only() {
        // 0 -> 1 -> 2 -> 1, 3 -> 0
        let mut parents = vec![Some(1), Some(2), Some(1), Some(0)];
        let mut members = break_cycles(&mut parents);
        members.sort_unstable();
        assert_eq!(members, vec![1, 2]);
        assert_eq!(parents, vec![Some(1), None, None, Some(0)]);
    }

    #[test]
    fn break_cycles_leaves_acyclic_chain_alone() {
        let mut parents = vec![None, Some(0), Some(1), Some(2)];
        assert!(break_cycles(&mut parents).is_empty());
        assert_eq!(parents, vec![None, Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn depth_is_distance_from_root_not_level() {
        let org = Uuid::new_v4();
        let ceo = contact(org, "Ceo");
        let mut vp = contact(org, "Vp");
        vp.parent_id = Some(ceo.id);
        vp.level = 3;
        let mut lead = contact(org, "Lead");
        lead.parent_id = Some(vp.id);
        lead.level = 1;

        let forest = build_forest(&[lead.clone(), ceo.clone(), vp.clone()]);
        let depths: Vec<usize> = [ceo.id, vp.id, lead.id]
            .iter()
            .map(|id| forest.node(forest.find(*id).unwrap()).unwrap().depth)
            .collect();
        assert_eq!(depths, vec![0, 1, 2]);
        assert_eq!(forest.node(forest.find(lead.id).unwrap()).unwrap().contact.level, 1);
    }

    #[test]
    fn self_reference_is_reported() {
        let org = Uuid::new_v4();
        let mut solo = contact(org, "Solo");
        solo.parent_id = Some(solo.id);

        let forest = build_forest(std::slice::from_ref(&solo));
        assert_eq!(forest.roots(), &[0]);
        assert_eq!(forest.detached().len(), 1);
        assert_eq!(forest.detached()[0].reason, DetachReason::SelfReference);
    }

    #[test]
    fn depth_first_visits_children_in_order() {
        let org = Uuid::new_v4();
        let root = contact(org, "Root");
        let mut a = contact(org, "A");
        a.parent_id = Some(root.id);
        let mut b = contact(org, "B");
        b.parent_id = Some(root.id);
        let mut a1 = contact(org, "A1");
        a1.parent_id = Some(a.id);

        let forest = build_forest(&[root, a, b, a1]);
        assert_eq!(forest.depth_first(), vec![0, 1, 3, 2]);
    }
}
