use ecovida_core::db::open_db_in_memory;
use ecovida_core::{
    CommunityService, NewCommunity, NewResident, ResidentPatch, ResidentService, ServiceError,
    SqliteCommunityRepository, SqliteResidentRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn resident_service(conn: &Connection) -> ResidentService<SqliteResidentRepository<'_>> {
    ResidentService::new(SqliteResidentRepository::try_new(conn).unwrap())
}

fn create_community(conn: &Connection, name: &str) -> ecovida_core::Community {
    let service = CommunityService::new(SqliteCommunityRepository::try_new(conn).unwrap());
    service
        .create_community(&NewCommunity {
            name: name.to_string(),
            location: "São Paulo, SP".to_string(),
            ..NewCommunity::default()
        })
        .unwrap()
}

fn sample_request(community_id: Uuid) -> NewResident {
    NewResident {
        name: "Ana Souza".to_string(),
        email: "ana@exemplo.com".to_string(),
        phone: Some("+55 11 99999-0000".to_string()),
        birth_date: Some(662_688_000_000),
        community_id,
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let community = create_community(&conn, "Comunidade Teste");
    let service = resident_service(&conn);

    let created = service.create_resident(&sample_request(community.id)).unwrap();
    let loaded = service.get_resident(created.id).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.community_id, community.id);
    assert_eq!(loaded.phone.as_deref(), Some("+55 11 99999-0000"));
}

#[test]
fn create_requires_existing_community() {
    let conn = open_db_in_memory().unwrap();
    let service = resident_service(&conn);

    let missing = Uuid::new_v4();
    let err = service.create_resident(&sample_request(missing)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: "community",
            id
        } if id == missing
    ));
    assert!(service.list_residents().unwrap().is_empty());
}

#[test]
fn create_requires_name_and_email() {
    let conn = open_db_in_memory().unwrap();
    let community = create_community(&conn, "Comunidade Teste");
    let service = resident_service(&conn);

    let err = service
        .create_resident(&NewResident {
            name: String::new(),
            ..sample_request(community.id)
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::MissingField {
            entity: "resident",
            field: "name"
        }
    ));

    let err = service
        .create_resident(&NewResident {
            email: "   ".to_string(),
            ..sample_request(community.id)
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::MissingField {
            entity: "resident",
            field: "email"
        }
    ));
}

#[test]
fn create_rejects_malformed_email_before_touching_storage() {
    let conn = open_db_in_memory().unwrap();
    let community = create_community(&conn, "Comunidade Teste");
    let service = resident_service(&conn);

    let err = service
        .create_resident(&NewResident {
            email: "ana-sem-arroba.com".to_string(),
            ..sample_request(community.id)
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidEmail { .. }));
    assert!(service.list_residents().unwrap().is_empty());
}

#[test]
fn duplicate_email_surfaces_as_email_taken() {
    let conn = open_db_in_memory().unwrap();
    let community = create_community(&conn, "Comunidade Teste");
    let service = resident_service(&conn);

    service.create_resident(&sample_request(community.id)).unwrap();

    let err = service
        .create_resident(&NewResident {
            name: "Outra Ana".to_string(),
            ..sample_request(community.id)
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::EmailTaken { email } if email == "ana@exemplo.com"
    ));
    assert_eq!(service.list_residents().unwrap().len(), 1);
}

#[test]
fn update_into_existing_email_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let community = create_community(&conn, "Comunidade Teste");
    let service = resident_service(&conn);

    service.create_resident(&sample_request(community.id)).unwrap();
    let second = service
        .create_resident(&NewResident {
            name: "João Lima".to_string(),
            email: "joao@exemplo.com".to_string(),
            phone: None,
            birth_date: None,
            community_id: community.id,
        })
        .unwrap();

    let patch = ResidentPatch {
        email: Some("ana@exemplo.com".to_string()),
        ..ResidentPatch::default()
    };
    let err = service.update_resident(second.id, &patch).unwrap_err();
    assert!(matches!(err, ServiceError::EmailTaken { .. }));

    let loaded = service.get_resident(second.id).unwrap().unwrap();
    assert_eq!(loaded.email, "joao@exemplo.com");
}

#[test]
fn update_moving_resident_requires_target_community() {
    let conn = open_db_in_memory().unwrap();
    let community = create_community(&conn, "Comunidade Teste");
    let service = resident_service(&conn);
    let created = service.create_resident(&sample_request(community.id)).unwrap();

    let missing = Uuid::new_v4();
    let patch = ResidentPatch {
        community_id: Some(missing),
        ..ResidentPatch::default()
    };
    let err = service.update_resident(created.id, &patch).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: "community",
            id
        } if id == missing
    ));

    let target = create_community(&conn, "Comunidade Nova");
    let patch = ResidentPatch {
        community_id: Some(target.id),
        ..ResidentPatch::default()
    };
    let moved = service.update_resident(created.id, &patch).unwrap();
    assert_eq!(moved.community_id, target.id);
    assert_eq!(moved.email, created.email);
}

#[test]
fn update_with_current_values_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let community = create_community(&conn, "Comunidade Teste");
    let service = resident_service(&conn);
    let created = service.create_resident(&sample_request(community.id)).unwrap();

    let patch = ResidentPatch {
        name: Some(created.name.clone()),
        email: Some(created.email.clone()),
        phone: created.phone.clone(),
        birth_date: created.birth_date,
        community_id: Some(created.community_id),
    };
    let updated = service.update_resident(created.id, &patch).unwrap();

    assert_eq!(updated, created);
    assert_eq!(service.get_resident(created.id).unwrap().unwrap(), created);
}

#[test]
fn delete_removes_record_and_reports_missing_target() {
    let conn = open_db_in_memory().unwrap();
    let community = create_community(&conn, "Comunidade Teste");
    let service = resident_service(&conn);
    let created = service.create_resident(&sample_request(community.id)).unwrap();

    service.delete_resident(created.id).unwrap();
    assert!(service.get_resident(created.id).unwrap().is_none());

    let err = service.delete_resident(created.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}
