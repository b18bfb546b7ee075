//! Narrowing a contact list to a subset while keeping chains of command.

use crate::model::contact::{Contact, ContactId};
use std::collections::{HashMap, HashSet};

/// Keeps `members` plus every manager above them, in input order.
///
/// The upward walk stops at a missing parent or at a contact that is
/// already kept, so stored cycles cannot loop it.
pub fn with_management_chain(contacts: &[Contact], members: &[ContactId]) -> Vec<Contact> {
    let by_id: HashMap<ContactId, &Contact> =
        contacts.iter().map(|contact| (contact.id, contact)).collect();

    let mut kept: HashSet<ContactId> = members.iter().copied().collect();
    for member in members {
        let mut cursor = by_id.get(member).copied();
        while let Some(current) = cursor {
            let Some(parent_id) = current.parent_id else {
                break;
            };
            if !kept.insert(parent_id) {
                break;
            }
            cursor = by_id.get(&parent_id).copied();
        }
    }

    contacts
        .iter()
        .filter(|contact| kept.contains(&contact.id))
        .cloned()
        .collect()
}
