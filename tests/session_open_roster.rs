
use serde_json::{json, Value};
use test_support::{
    error_code, request, request_ok, spawn_sidecar, spawn_sidecar_unconfigured, StubApi,
};

fn seeded() -> StubApi {
    let stub = StubApi::start();
    stub.add_teacher(1, 10, "Pat", "Lee");
    // 4A appears twice because the teacher takes it for two subjects.
    stub.add_class_row(1, 4, "4A", "Mathematics");
    stub.add_class_row(1, 4, "4A", "Science");
    stub.add_class_row(1, 9, "9C", "History");
    stub.set_roster(4, &[(21, "Ana", "Silva")]);
    stub.add_chart(7, 4, "Front rows", 3, 3, false);
    stub
}

#[test]
fn open_loads_roster_dedupes_classes_and_cascades() {
    let stub = seeded();
    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.base_url);

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.open",
        json!({ "userId": 10 }),
    );
    let state = &opened["state"];
    assert_eq!(state["teacher"]["id"], 1);
    assert_eq!(state["teacher"]["firstName"], "Pat");

    let classes = state["classes"].as_array().expect("classes");
    assert_eq!(classes.len(), 2, "duplicate subject rows must collapse");
    assert_eq!(classes[0]["classId"], 4);
    assert_eq!(classes[1]["classId"], 9);

    assert_eq!(state["selectedClassId"], 4);
    assert_eq!(state["selectedChartId"], 7);
    assert_eq!(state["chart"]["id"], 7);
    assert_eq!(state["chart"]["unassignedStudents"][0]["id"], 21);

    // One call per dependency, cascading in order.
    assert_eq!(stub.count_calls("GET /teachers?user_id=10"), 1);
    assert_eq!(stub.count_calls("GET /teacher_subjects?teacher_id=1"), 1);
    assert_eq!(stub.count_calls("GET /seating_chart?class_id=4"), 1);
    assert_eq!(stub.count_calls("GET /seating_chart?id=7"), 1);
}

#[test]
fn open_for_unknown_user_shows_empty_state() {
    let stub = seeded();
    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.base_url);

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.open",
        json!({ "userId": 999 }),
    );
    let state = &opened["state"];
    assert_eq!(state["teacher"], Value::Null);
    assert_eq!(state["classes"].as_array().expect("classes").len(), 0);
    assert_eq!(state["selectedClassId"], Value::Null);
    assert_eq!(stub.count_calls("GET /teacher_subjects"), 0);
}

#[test]
fn open_swallows_upstream_failure_and_shows_empty_state() {
    let stub = seeded();
    stub.set_fail("teachers");
    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.base_url);

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.open",
        json!({ "userId": 10 }),
    );
    let state = &opened["state"];
    assert_eq!(state["teacher"], Value::Null);
    assert_eq!(state["selectedClassId"], Value::Null);
    assert_eq!(stub.count_calls("GET /teacher_subjects"), 0);
}

#[test]
fn open_requires_configured_base_url_and_accepts_override() {
    let stub = seeded();
    let (_child, mut stdin, mut reader) = spawn_sidecar_unconfigured();

    let denied = request(
        &mut stdin,
        &mut reader,
        "1",
        "session.open",
        json!({ "userId": 10 }),
    );
    assert_eq!(denied["ok"], false);
    assert_eq!(error_code(&denied), "not_configured");

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "session.open",
        json!({ "userId": 10, "apiBaseUrl": stub.base_url.as_str() }),
    );
    assert_eq!(opened["state"]["teacher"]["id"], 1);

    let health = request_ok(&mut stdin, &mut reader, "3", "health", json!({}));
    assert_eq!(health["apiBaseUrl"].as_str(), Some(stub.base_url.as_str()));
}

#[test]
fn open_without_user_id_is_bad_params() {
    let stub = seeded();
    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.base_url);

    let denied = request(&mut stdin, &mut reader, "1", "session.open", json!({}));
    assert_eq!(denied["ok"], false);
    assert_eq!(error_code(&denied), "bad_params");
}
