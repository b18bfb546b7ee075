//! Nested view of a [`Forest`] for serialization.
//!
//! Each node flattens the contact's fields and adds `full_name` plus a
//! `subordinates` array mirroring the tree shape.

use crate::hierarchy::builder::{Forest, NodeIndex};
use crate::model::contact::Contact;
use serde::Serialize;

/// One contact with its direct and indirect reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    #[serde(flatten)]
    pub contact: Contact,
    pub full_name: String,
    pub subordinates: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .subordinates
            .iter()
            .map(HierarchyNode::subtree_len)
            .sum::<usize>()
    }
}

impl Forest {
    /// Converts the arena into nested nodes, roots and children in order.
    pub fn to_tree(&self) -> Vec<HierarchyNode> {
        self.roots()
            .iter()
            .map(|root| nest(self, *root))
            .collect()
    }
}

fn nest(forest: &Forest, index: NodeIndex) -> HierarchyNode {
    let node = &forest.nodes()[index];
    HierarchyNode {
        contact: node.contact.clone(),
        full_name: node.contact.full_name(),
        subordinates: node
            .children
            .iter()
            .map(|child| nest(forest, *child))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::hierarchy::build_forest;
    use crate::model::contact::Contact;
    use uuid::Uuid;

    #[test]
    fn tree_mirrors_forest_shape() {
        let org = Uuid::new_v4();
        let boss = Contact::new(org, "Grace", "Hopper");
        let mut report = Contact::new(org, "Alan", "Turing");
        report.parent_id = Some(boss.id);
        let loner = Contact::new(org, "Ken", "Thompson");

        let tree = build_forest(&[boss.clone(), report.clone(), loner.clone()]).to_tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].contact.id, boss.id);
        assert_eq!(tree[0].full_name, "Grace Hopper");
        assert_eq!(tree[0].subordinates.len(), 1);
        assert_eq!(tree[0].subordinates[0].contact.id, report.id);
        assert!(tree[1].subordinates.is_empty());
        assert_eq!(tree.iter().map(|node| node.subtree_len()).sum::<usize>(), 3);
    }

    #[test]
    fn serialized_node_carries_subordinates_field() {
        let org = Uuid::new_v4();
        let boss = Contact::new(org, "Grace", "Hopper");
        let tree = build_forest(std::slice::from_ref(&boss)).to_tree();

        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value[0]["id"], boss.id.to_string());
        assert_eq!(value[0]["first_name"], "Grace");
        assert_eq!(value[0]["full_name"], "Grace Hopper");
        assert!(value[0]["subordinates"].as_array().unwrap().is_empty());
    }
}
