use ecovida_core::db::open_db_in_memory;
use ecovida_core::{
    CommunityPatch, CommunityService, NewCommunity, NewResident, RepoError, ResidentService,
    ServiceError, SqliteCommunityRepository, SqliteResidentRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn community_service(conn: &Connection) -> CommunityService<SqliteCommunityRepository<'_>> {
    CommunityService::new(SqliteCommunityRepository::try_new(conn).unwrap())
}

fn sample_request() -> NewCommunity {
    NewCommunity {
        name: "Comunidade Teste".to_string(),
        location: "São Paulo, SP".to_string(),
        description: Some("Comunidade para testes".to_string()),
        founded_at: Some(1_672_531_200_000),
        sustainability_goal: Some("Reduzir emissões em 30%".to_string()),
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = community_service(&conn);

    let created = service.create_community(&sample_request()).unwrap();
    let loaded = service.get_community(created.id).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "Comunidade Teste");
    assert_eq!(loaded.location, "São Paulo, SP");
    assert_eq!(loaded.founded_at, Some(1_672_531_200_000));
}

#[test]
fn create_without_name_is_rejected_and_not_persisted() {
    let conn = open_db_in_memory().unwrap();
    let service = community_service(&conn);

    let request = NewCommunity {
        name: "  ".to_string(),
        ..sample_request()
    };
    let err = service.create_community(&request).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::MissingField {
            entity: "community",
            field: "name"
        }
    ));
    assert!(service.list_communities().unwrap().is_empty());
}

#[test]
fn create_without_location_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = community_service(&conn);

    let request = NewCommunity {
        location: String::new(),
        ..sample_request()
    };
    let err = service.create_community(&request).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::MissingField {
            entity: "community",
            field: "location"
        }
    ));
}

#[test]
fn update_replaces_only_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = community_service(&conn);
    let created = service.create_community(&sample_request()).unwrap();

    let patch = CommunityPatch {
        location: Some("Campinas, SP".to_string()),
        ..CommunityPatch::default()
    };
    let updated = service.update_community(created.id, &patch).unwrap();

    assert_eq!(updated.location, "Campinas, SP");
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.description, created.description);

    let loaded = service.get_community(created.id).unwrap().unwrap();
    assert_eq!(loaded, updated);
}

#[test]
fn update_with_current_values_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = community_service(&conn);
    let created = service.create_community(&sample_request()).unwrap();

    let patch = CommunityPatch {
        name: Some(created.name.clone()),
        location: Some(created.location.clone()),
        description: created.description.clone(),
        founded_at: created.founded_at,
        sustainability_goal: created.sustainability_goal.clone(),
    };
    let updated = service.update_community(created.id, &patch).unwrap();

    assert_eq!(updated, created);
    assert_eq!(service.get_community(created.id).unwrap().unwrap(), created);
}

#[test]
fn update_with_blank_name_is_rejected_without_mutation() {
    let conn = open_db_in_memory().unwrap();
    let service = community_service(&conn);
    let created = service.create_community(&sample_request()).unwrap();

    let patch = CommunityPatch {
        name: Some("   ".to_string()),
        location: Some("Santos, SP".to_string()),
        ..CommunityPatch::default()
    };
    let err = service.update_community(created.id, &patch).unwrap_err();
    assert!(matches!(err, ServiceError::MissingField { .. }));

    let loaded = service.get_community(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn update_unknown_community_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = community_service(&conn);

    let missing = Uuid::new_v4();
    let err = service
        .update_community(missing, &CommunityPatch::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: "community",
            id
        } if id == missing
    ));
}

#[test]
fn delete_removes_record_and_reports_missing_target() {
    let conn = open_db_in_memory().unwrap();
    let service = community_service(&conn);
    let created = service.create_community(&sample_request()).unwrap();

    service.delete_community(created.id).unwrap();
    assert!(service.get_community(created.id).unwrap().is_none());

    let err = service.delete_community(created.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[test]
fn delete_is_permissive_while_residents_still_reference_it() {
    let conn = open_db_in_memory().unwrap();
    let communities = community_service(&conn);
    let residents = ResidentService::new(SqliteResidentRepository::try_new(&conn).unwrap());

    let community = communities.create_community(&sample_request()).unwrap();
    let resident = residents
        .create_resident(&NewResident {
            name: "Ana Souza".to_string(),
            email: "ana@exemplo.com".to_string(),
            phone: None,
            birth_date: None,
            community_id: community.id,
        })
        .unwrap();

    communities.delete_community(community.id).unwrap();

    // The orphaned resident survives and still points at the removed owner.
    let orphan = residents.get_resident(resident.id).unwrap().unwrap();
    assert_eq!(orphan.community_id, community.id);
}

#[test]
fn list_orders_latest_update_first() {
    let conn = open_db_in_memory().unwrap();
    let service = community_service(&conn);

    let first = service.create_community(&sample_request()).unwrap();
    let second = service
        .create_community(&NewCommunity {
            name: "Comunidade Nova".to_string(),
            location: "Belo Horizonte, MG".to_string(),
            ..NewCommunity::default()
        })
        .unwrap();

    conn.execute(
        "UPDATE communities SET updated_at = 2000 WHERE id = ?1;",
        [first.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE communities SET updated_at = 1000 WHERE id = ?1;",
        [second.id.to_string()],
    )
    .unwrap();

    let listed = service.list_communities().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteCommunityRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}
