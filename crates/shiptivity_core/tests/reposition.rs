use rusqlite::Connection;
use shiptivity_core::db::open_db_in_memory;
use shiptivity_core::{
    Client, ClientRepository, ClientService, ClientServiceError, InvalidIdReason, Lane,
    NewClient, SqliteClientRepository,
};

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn add(service: &ClientService<SqliteClientRepository<'_>>, name: &str, lane: Lane) -> Client {
    service.add_client(&NewClient::new(name, lane)).unwrap()
}

fn lane_names(service: &ClientService<SqliteClientRepository<'_>>, lane: Lane) -> Vec<String> {
    service
        .list_clients(Some(lane.as_str()))
        .unwrap()
        .into_iter()
        .map(|client| client.name)
        .collect()
}

fn assert_all_lanes_dense(service: &ClientService<SqliteClientRepository<'_>>) {
    let violations = service.audit_lanes().unwrap();
    assert!(violations.is_empty(), "lane violations: {violations:?}");
}

#[test]
fn moving_to_front_within_lane_shifts_earlier_members_down() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    let a = add(&service, "A", Lane::Backlog);
    let b = add(&service, "B", Lane::Backlog);
    let c = add(&service, "C", Lane::Backlog);

    let moved = service.reposition(&b.id.to_string(), None, Some(1)).unwrap();

    assert_eq!((moved.lane, moved.priority), (Lane::Backlog, 1));
    assert_eq!(lane_names(&service, Lane::Backlog), vec!["B", "A", "C"]);
    let repo = service.repository();
    assert_eq!(repo.get_client(a.id).unwrap().unwrap().priority, 2);
    assert_eq!(repo.get_client(c.id).unwrap().unwrap().priority, 3);
}

#[test]
fn moving_down_within_lane_shifts_only_members_in_between() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    let a = add(&service, "A", Lane::InProgress);
    for name in ["B", "C", "D", "E"] {
        add(&service, name, Lane::InProgress);
    }

    let moved = service.reposition(&a.id.to_string(), None, Some(4)).unwrap();

    assert_eq!(moved.priority, 4);
    assert_eq!(
        lane_names(&service, Lane::InProgress),
        vec!["B", "C", "D", "A", "E"]
    );
    assert_all_lanes_dense(&service);
}

#[test]
fn lane_change_without_priority_appends_and_closes_source_gap() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    let a = add(&service, "A", Lane::Backlog);
    let b = add(&service, "B", Lane::Backlog);
    add(&service, "C", Lane::InProgress);

    let moved = service
        .reposition(&a.id.to_string(), Some("in-progress"), None)
        .unwrap();

    assert_eq!((moved.lane, moved.priority), (Lane::InProgress, 2));
    assert_eq!(lane_names(&service, Lane::InProgress), vec!["C", "A"]);
    let b = service.repository().get_client(b.id).unwrap().unwrap();
    assert_eq!((b.lane, b.priority), (Lane::Backlog, 1));
    assert_all_lanes_dense(&service);
}

#[test]
fn lane_change_into_empty_lane_lands_at_one() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    let a = add(&service, "A", Lane::Backlog);

    let moved = service
        .reposition(&a.id.to_string(), Some("complete"), Some(3))
        .unwrap();

    assert_eq!((moved.lane, moved.priority), (Lane::Complete, 1));
    assert!(lane_names(&service, Lane::Backlog).is_empty());
}

#[test]
fn lane_change_with_priority_inserts_before_existing_member() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    let a = add(&service, "A", Lane::Backlog);
    add(&service, "X", Lane::Complete);
    add(&service, "Y", Lane::Complete);

    let moved = service
        .reposition(&a.id.to_string(), Some("complete"), Some(2))
        .unwrap();

    assert_eq!(moved.priority, 2);
    assert_eq!(lane_names(&service, Lane::Complete), vec!["X", "A", "Y"]);
    assert_all_lanes_dense(&service);
}

#[test]
fn non_positive_priority_clamps_to_front() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    add(&service, "A", Lane::Backlog);
    add(&service, "B", Lane::Backlog);
    let c = add(&service, "C", Lane::Backlog);

    let moved = service.reposition(&c.id.to_string(), None, Some(0)).unwrap();
    assert_eq!(moved.priority, 1);
    assert_eq!(lane_names(&service, Lane::Backlog), vec!["C", "A", "B"]);

    let moved = service.reposition(&c.id.to_string(), None, Some(-5)).unwrap();
    assert_eq!(moved.priority, 1);
    assert_eq!(lane_names(&service, Lane::Backlog), vec!["C", "A", "B"]);
    assert_all_lanes_dense(&service);
}

#[test]
fn high_priority_within_lane_clamps_to_last_slot() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    let a = add(&service, "A", Lane::Backlog);
    add(&service, "B", Lane::Backlog);
    add(&service, "C", Lane::Backlog);

    let moved = service
        .reposition(&a.id.to_string(), None, Some(10_000))
        .unwrap();

    assert_eq!(moved.priority, 3);
    assert_eq!(lane_names(&service, Lane::Backlog), vec!["B", "C", "A"]);
    assert_all_lanes_dense(&service);
}

#[test]
fn high_priority_across_lanes_clamps_past_last_member() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    let a = add(&service, "A", Lane::Backlog);
    add(&service, "X", Lane::Complete);
    add(&service, "Y", Lane::Complete);

    let moved = service
        .reposition(&a.id.to_string(), Some("complete"), Some(99))
        .unwrap();

    assert_eq!((moved.lane, moved.priority), (Lane::Complete, 3));
    assert_eq!(lane_names(&service, Lane::Complete), vec!["X", "Y", "A"]);
}

#[test]
fn empty_request_returns_record_unchanged() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    add(&service, "A", Lane::Backlog);
    let b = add(&service, "B", Lane::Backlog);

    let returned = service.reposition(&b.id.to_string(), None, None).unwrap();

    assert_eq!(returned, b);
    assert_eq!(lane_names(&service, Lane::Backlog), vec!["A", "B"]);
}

// Naming the current lane without a priority is kept as a silent no-op,
// even though the caller may have meant something else.
#[test]
fn same_lane_without_priority_is_documented_noop() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    let a = add(&service, "A", Lane::Backlog);
    add(&service, "B", Lane::Backlog);

    let returned = service
        .reposition(&a.id.to_string(), Some("backlog"), None)
        .unwrap();

    assert_eq!(returned, a);
    assert_eq!(lane_names(&service, Lane::Backlog), vec!["A", "B"]);
}

#[test]
fn same_lane_move_leaves_other_lane_counts_untouched() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    add(&service, "A", Lane::Backlog);
    let b = add(&service, "B", Lane::Backlog);
    add(&service, "X", Lane::InProgress);
    add(&service, "Y", Lane::Complete);
    add(&service, "Z", Lane::Complete);

    service
        .reposition(&b.id.to_string(), Some("backlog"), Some(1))
        .unwrap();

    let repo = service.repository();
    assert_eq!(repo.count_in_lane(Lane::Backlog).unwrap(), 2);
    assert_eq!(repo.count_in_lane(Lane::InProgress).unwrap(), 1);
    assert_eq!(repo.count_in_lane(Lane::Complete).unwrap(), 2);
    assert_eq!(lane_names(&service, Lane::Backlog), vec!["B", "A"]);
}

#[test]
fn missing_id_is_rejected_as_invalid_id() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    add(&service, "A", Lane::Backlog);

    let err = service.reposition("999", None, Some(1)).unwrap_err();
    match err {
        ClientServiceError::InvalidId(invalid) => {
            assert_eq!(invalid.reason, InvalidIdReason::NotFound);
            assert_eq!(invalid.long_message(), "Cannot find client with that id.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_numeric_id_is_rejected_as_invalid_id() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));

    let err = service.reposition("abc", Some("backlog"), None).unwrap_err();
    assert!(matches!(
        err,
        ClientServiceError::InvalidId(ref invalid) if invalid.reason == InvalidIdReason::NotANumber
    ));
    assert_eq!(err.message(), "Invalid id provided.");
}

#[test]
fn unknown_lane_is_rejected_before_any_write() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    let a = add(&service, "A", Lane::Backlog);
    add(&service, "B", Lane::Backlog);

    let err = service
        .reposition(&a.id.to_string(), Some("done"), Some(2))
        .unwrap_err();

    assert!(matches!(err, ClientServiceError::InvalidLane(ref lane) if lane.value == "done"));
    assert_eq!(lane_names(&service, Lane::Backlog), vec!["A", "B"]);
}

#[test]
fn get_client_validates_id() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    let a = add(&service, "A", Lane::Complete);

    assert_eq!(service.get_client(&format!(" {} ", a.id)).unwrap(), a);
    assert!(matches!(
        service.get_client("12x").unwrap_err(),
        ClientServiceError::InvalidId(_)
    ));
}

#[test]
fn list_clients_rejects_unknown_lane_filter() {
    let conn = setup();
    let service = ClientService::new(SqliteClientRepository::new(&conn));
    add(&service, "A", Lane::Backlog);
    add(&service, "B", Lane::Complete);

    assert_eq!(service.list_clients(None).unwrap().len(), 2);
    assert!(matches!(
        service.list_clients(Some("archived")).unwrap_err(),
        ClientServiceError::InvalidLane(_)
    ));
}
