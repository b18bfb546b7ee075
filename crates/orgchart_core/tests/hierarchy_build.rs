use orgchart_core::db::open_db_in_memory;
use orgchart_core::{
    build_forest, ChartService, Contact, ContactId, ContactService, DetachReason, Forest,
    Organization, OrganizationService, SqliteContactRepository, SqliteOrganizationRepository,
    SqliteProjectRepository,
};
use std::collections::BTreeSet;
use uuid::Uuid;

fn contact(org: Uuid, name: &str, parent: Option<&Contact>) -> Contact {
    let mut contact = Contact::new(org, name, "Test");
    contact.parent_id = parent.map(|parent| parent.id);
    contact
}

fn root_ids(forest: &Forest) -> BTreeSet<ContactId> {
    forest
        .roots()
        .iter()
        .map(|root| forest.nodes()[*root].contact.id)
        .collect()
}

fn edges(forest: &Forest) -> BTreeSet<(ContactId, ContactId)> {
    forest
        .nodes()
        .iter()
        .filter_map(|node| {
            node.parent
                .map(|parent| (forest.nodes()[parent].contact.id, node.contact.id))
        })
        .collect()
}

#[test]
fn dangling_parent_becomes_root() {
    let org = Uuid::new_v4();
    let one = contact(org, "One", None);
    let two = contact(org, "Two", Some(&one));
    let three = contact(org, "Three", Some(&one));
    let mut four = contact(org, "Four", None);
    let ghost = Uuid::new_v4();
    four.parent_id = Some(ghost);

    let forest = build_forest(&[one.clone(), two.clone(), three.clone(), four.clone()]);

    assert_eq!(forest.len(), 4);
    assert_eq!(root_ids(&forest), BTreeSet::from([one.id, four.id]));
    assert_eq!(forest.children_of(one.id), vec![two.id, three.id]);
    assert!(forest.children_of(four.id).is_empty());
    assert_eq!(forest.detached().len(), 1);
    assert_eq!(forest.detached()[0].contact_id, four.id);
    assert_eq!(forest.detached()[0].reason, DetachReason::MissingParent(ghost));
}

#[test]
fn two_node_cycle_detaches_both() {
    let org = Uuid::new_v4();
    let mut a = contact(org, "A", None);
    let mut b = contact(org, "B", None);
    a.parent_id = Some(b.id);
    b.parent_id = Some(a.id);

    let forest = build_forest(&[a.clone(), b.clone()]);

    assert_eq!(forest.len(), 2);
    assert_eq!(forest.roots(), &[0, 1]);
    assert!(forest.children_of(a.id).is_empty());
    assert!(forest.children_of(b.id).is_empty());
    assert!(forest
        .detached()
        .iter()
        .all(|detachment| detachment.reason == DetachReason::Cycle));
}

#[test]
fn descendants_of_cycle_stay_attached() {
    let org = Uuid::new_v4();
    let mut a = contact(org, "A", None);
    let mut b = contact(org, "B", None);
    a.parent_id = Some(b.id);
    b.parent_id = Some(a.id);
    let under_a = contact(org, "UnderA", Some(&a));

    let forest = build_forest(&[under_a.clone(), a.clone(), b.clone()]);
    assert_eq!(forest.parent_of(under_a.id), Some(a.id));
    assert_eq!(root_ids(&forest), BTreeSet::from([a.id, b.id]));
    assert_eq!(forest.detached().len(), 2);
}

#[test]
fn every_contact_is_kept_whatever_its_parent() {
    let org = Uuid::new_v4();
    let root = contact(org, "Root", None);
    let mut selfish = contact(org, "Selfish", None);
    selfish.parent_id = Some(selfish.id);
    let mut lost = contact(org, "Lost", None);
    lost.parent_id = Some(Uuid::new_v4());
    let child = contact(org, "Child", Some(&root));
    let grandchild = contact(org, "Grandchild", Some(&child));

    let input = vec![grandchild, lost, child, selfish, root];
    let forest = build_forest(&input);
    assert_eq!(forest.len(), input.len());
    assert_eq!(forest.depth_first().len(), input.len());
    let tree_total: usize = forest.to_tree().iter().map(|node| node.subtree_len()).sum();
    assert_eq!(tree_total, input.len());
}

#[test]
fn rebuild_in_any_order_gives_same_structure() {
    let org = Uuid::new_v4();
    let ceo = contact(org, "Ceo", None);
    let ops = contact(org, "Ops", Some(&ceo));
    let eng = contact(org, "Eng", Some(&ceo));
    let shift = contact(org, "Shift", Some(&ops));
    let mut x = contact(org, "X", None);
    let mut y = contact(org, "Y", None);
    x.parent_id = Some(y.id);
    y.parent_id = Some(x.id);
    let below_y = contact(org, "BelowY", Some(&y));

    let forward = vec![ceo, ops, eng, shift, x, y, below_y];
    let mut backward = forward.clone();
    backward.reverse();
    let mut shuffled = forward.clone();
    shuffled.rotate_left(3);

    let reference = build_forest(&forward);
    for input in [&backward, &shuffled, &forward] {
        let forest = build_forest(input);
        assert_eq!(root_ids(&forest), root_ids(&reference));
        assert_eq!(edges(&forest), edges(&reference));
    }
}

#[test]
fn duplicate_ids_attach_children_to_the_later_record() {
    let org = Uuid::new_v4();
    let first = contact(org, "First", None);
    let mut second = first.clone();
    second.first_name = "Second".to_string();
    let child = contact(org, "Child", Some(&first));

    let forest = build_forest(&[first, second, child.clone()]);
    assert_eq!(forest.len(), 3);
    assert_eq!(forest.roots(), &[0, 1]);
    assert!(forest.nodes()[0].children.is_empty());
    assert_eq!(forest.nodes()[1].children, vec![2]);
    assert_eq!(forest.nodes()[2].contact.id, child.id);
}

#[test]
fn deleted_manager_reports_surface_as_roots_on_next_chart() {
    let conn = open_db_in_memory().unwrap();
    let org = OrganizationService::new(SqliteOrganizationRepository::new(&conn))
        .create_organization(&Organization::new("Coastal EPC", "EPC"))
        .unwrap();
    let contacts = ContactService::new(
        SqliteContactRepository::new(&conn),
        SqliteOrganizationRepository::new(&conn),
    );
    let charts = ChartService::new(
        SqliteOrganizationRepository::new(&conn),
        SqliteContactRepository::new(&conn),
        SqliteProjectRepository::new(&conn),
    );

    let ceo = contacts
        .create_contact(&contact(org.id, "Ceo", None))
        .unwrap();
    let manager = contacts
        .create_contact(&contact(org.id, "Manager", Some(&ceo)))
        .unwrap();
    let worker = contacts
        .create_contact(&contact(org.id, "Worker", Some(&manager)))
        .unwrap();

    let before = charts.org_chart(org.id, None).unwrap();
    assert_eq!(root_ids(&before), BTreeSet::from([ceo.id]));

    contacts.delete_contact(manager.id).unwrap();
    let after = charts.org_chart(org.id, None).unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(root_ids(&after), BTreeSet::from([ceo.id, worker.id]));
    assert_eq!(
        after.detached()[0].reason,
        DetachReason::MissingParent(manager.id)
    );
}
