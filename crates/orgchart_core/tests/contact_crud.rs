use orgchart_core::db::open_db_in_memory;
use orgchart_core::{
    Contact, ContactService, ContactValidationError, Organization, OrganizationService,
    OrganizationValidationError, ServiceError, SqliteContactRepository,
    SqliteOrganizationRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn contact_service(
    conn: &Connection,
) -> ContactService<SqliteContactRepository<'_>, SqliteOrganizationRepository<'_>> {
    ContactService::new(
        SqliteContactRepository::new(conn),
        SqliteOrganizationRepository::new(conn),
    )
}

fn create_org(conn: &Connection, name: &str) -> Organization {
    OrganizationService::new(SqliteOrganizationRepository::new(conn))
        .create_organization(&Organization::new(name, "Petrochemical"))
        .unwrap()
}

fn report_to(org: &Organization, manager: &Contact, first: &str) -> Contact {
    let mut contact = Contact::new(org.id, first, "Report");
    contact.parent_id = Some(manager.id);
    contact
}

#[test]
fn organization_requires_name_and_industry() {
    let conn = setup();
    let service = OrganizationService::new(SqliteOrganizationRepository::new(&conn));

    let err = service
        .create_organization(&Organization::new("  ", "LNG"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidOrganization(OrganizationValidationError::MissingName)
    ));

    let stored = service
        .create_organization(&Organization::new("  Bayou Refining ", "Refining"))
        .unwrap();
    assert_eq!(stored.name, "Bayou Refining");
    assert_eq!(service.get_organization(stored.id).unwrap(), stored);
}

#[test]
fn create_and_read_back_contact() {
    let conn = setup();
    let org = create_org(&conn, "Bayou Refining");
    let service = contact_service(&conn);

    let mut contact = Contact::new(org.id, "  Maria ", "Santos");
    contact.title = Some("Plant Manager".to_string());
    contact.email = Some("maria@bayou.example".to_string());
    contact.level = 1;
    let stored = service.create_contact(&contact).unwrap();

    assert_eq!(stored.first_name, "Maria");
    assert_eq!(service.get_contact(contact.id).unwrap(), stored);
}

#[test]
fn create_rejects_unknown_org_and_bad_fields() {
    let conn = setup();
    let org = create_org(&conn, "Bayou Refining");
    let service = contact_service(&conn);

    let orphan_org = Uuid::new_v4();
    assert!(matches!(
        service.create_contact(&Contact::new(orphan_org, "A", "B")),
        Err(ServiceError::OrganizationNotFound(id)) if id == orphan_org
    ));

    let mut bad_email = Contact::new(org.id, "A", "B");
    bad_email.email = Some("not-an-email".to_string());
    assert!(matches!(
        service.create_contact(&bad_email),
        Err(ServiceError::InvalidContact(ContactValidationError::InvalidEmail(_)))
    ));

    let mut bad_level = Contact::new(org.id, "A", "B");
    bad_level.level = 7;
    assert!(matches!(
        service.create_contact(&bad_level),
        Err(ServiceError::InvalidContact(ContactValidationError::LevelOutOfRange(7)))
    ));
}

#[test]
fn manager_must_exist_in_same_organization() {
    let conn = setup();
    let org = create_org(&conn, "Bayou Refining");
    let other_org = create_org(&conn, "Gulf LNG");
    let service = contact_service(&conn);

    let foreign_boss = service
        .create_contact(&Contact::new(other_org.id, "Foreign", "Boss"))
        .unwrap();

    let missing = Uuid::new_v4();
    let mut dangling = Contact::new(org.id, "No", "Boss");
    dangling.parent_id = Some(missing);
    assert!(matches!(
        service.create_contact(&dangling),
        Err(ServiceError::ParentNotFound(id)) if id == missing
    ));

    let cross = report_to(&org, &foreign_boss, "Cross");
    assert!(matches!(
        service.create_contact(&cross),
        Err(ServiceError::ParentInOtherOrganization { .. })
    ));
}

#[test]
fn set_parent_rejects_self_and_cycles() {
    let conn = setup();
    let org = create_org(&conn, "Bayou Refining");
    let service = contact_service(&conn);

    let ceo = service
        .create_contact(&Contact::new(org.id, "Chief", "Exec"))
        .unwrap();
    let vp = service.create_contact(&report_to(&org, &ceo, "Vice")).unwrap();
    let lead = service.create_contact(&report_to(&org, &vp, "Lead")).unwrap();

    assert!(matches!(
        service.set_parent(ceo.id, Some(ceo.id)),
        Err(ServiceError::CycleDetected { .. })
    ));
    assert!(matches!(
        service.set_parent(ceo.id, Some(lead.id)),
        Err(ServiceError::CycleDetected { contact_id, parent_id })
            if contact_id == ceo.id && parent_id == lead.id
    ));

    service.set_parent(lead.id, Some(ceo.id)).unwrap();
    assert_eq!(service.get_contact(lead.id).unwrap().parent_id, Some(ceo.id));

    service.set_parent(lead.id, None).unwrap();
    assert_eq!(service.get_contact(lead.id).unwrap().parent_id, None);
}

#[test]
fn update_cannot_move_contact_between_organizations() {
    let conn = setup();
    let org = create_org(&conn, "Bayou Refining");
    let other_org = create_org(&conn, "Gulf LNG");
    let service = contact_service(&conn);

    let stored = service
        .create_contact(&Contact::new(org.id, "Tom", "Nguyen"))
        .unwrap();
    let moved = Contact {
        org_id: other_org.id,
        ..stored.clone()
    };
    assert!(matches!(
        service.update_contact(&moved),
        Err(ServiceError::OrganizationChanged(id)) if id == stored.id
    ));

    let renamed = Contact {
        title: Some("Turnaround Lead".to_string()),
        level: 3,
        ..stored.clone()
    };
    service.update_contact(&renamed).unwrap();
    assert_eq!(service.get_contact(stored.id).unwrap(), renamed);
}

#[test]
fn list_orders_by_level_then_last_name() {
    let conn = setup();
    let org = create_org(&conn, "Bayou Refining");
    let service = contact_service(&conn);

    let mut engineer = Contact::new(org.id, "Eve", "Adams");
    engineer.level = 4;
    let mut director = Contact::new(org.id, "Dan", "Zimmer");
    director.level = 1;
    let mut manager = Contact::new(org.id, "Mia", "Brown");
    manager.level = 1;
    for contact in [&engineer, &director, &manager] {
        service.create_contact(contact).unwrap();
    }

    let names: Vec<String> = service
        .list_contacts(org.id)
        .unwrap()
        .into_iter()
        .map(|contact| contact.last_name)
        .collect();
    assert_eq!(names, vec!["Brown", "Zimmer", "Adams"]);
}

#[test]
fn delete_leaves_reports_dangling() {
    let conn = setup();
    let org = create_org(&conn, "Bayou Refining");
    let service = contact_service(&conn);

    let boss = service
        .create_contact(&Contact::new(org.id, "Big", "Boss"))
        .unwrap();
    let first = service.create_contact(&report_to(&org, &boss, "One")).unwrap();
    let second = service.create_contact(&report_to(&org, &boss, "Two")).unwrap();

    assert_eq!(service.delete_contact(boss.id).unwrap(), 2);
    assert!(matches!(
        service.get_contact(boss.id),
        Err(ServiceError::ContactNotFound(_))
    ));
    assert_eq!(service.get_contact(first.id).unwrap().parent_id, Some(boss.id));
    assert_eq!(service.get_contact(second.id).unwrap().parent_id, Some(boss.id));
    assert!(matches!(
        service.delete_contact(boss.id),
        Err(ServiceError::ContactNotFound(_))
    ));
}

#[test]
fn deleting_organization_cascades_to_contacts() {
    let conn = setup();
    let org = create_org(&conn, "Bayou Refining");
    let service = contact_service(&conn);
    let contact = service
        .create_contact(&Contact::new(org.id, "Gone", "Soon"))
        .unwrap();

    OrganizationService::new(SqliteOrganizationRepository::new(&conn))
        .delete_organization(org.id)
        .unwrap();
    assert!(matches!(
        service.get_contact(contact.id),
        Err(ServiceError::ContactNotFound(_))
    ));
}
