
use serde_json::json;
use test_support::{request_ok, spawn_sidecar, StubApi};

fn seeded() -> StubApi {
    let stub = StubApi::start();
    stub.add_teacher(1, 10, "Pat", "Lee");
    stub.add_class_row(1, 4, "4A", "Mathematics");
    stub.add_class_row(1, 5, "5B", "Science");
    stub.set_roster(4, &[(21, "Ana", "Silva"), (22, "Ben", "Okafor")]);
    stub.set_roster(5, &[(31, "Dee", "Patel")]);
    stub.add_chart(7, 4, "Front rows", 2, 2, true);
    stub.add_chart(8, 4, "Alternate", 2, 2, false);
    stub.add_chart(9, 5, "Labs", 2, 2, false);
    stub.seed_assignment(7, 1, 1, 21);
    stub
}

#[test]
fn failed_chart_list_fetch_keeps_the_previous_view() {
    let stub = seeded();
    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.base_url);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.open",
        json!({ "userId": 10 }),
    );
    stub.set_fail("charts_list");

    let switched = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "classes.select",
        json!({ "classId": 5 }),
    );
    // The class switch itself lands; the stale chart list stays visible
    // until a fetch succeeds.
    let state = &switched["state"];
    assert_eq!(state["selectedClassId"], 5);
    assert_eq!(state["charts"].as_array().expect("charts").len(), 2);
    assert_eq!(state["selectedChartId"], 7);
    assert_eq!(state["chart"]["id"], 7);
}

#[test]
fn failed_detail_fetch_keeps_the_previous_detail() {
    let stub = seeded();
    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.base_url);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.open",
        json!({ "userId": 10 }),
    );
    stub.set_fail("chart_detail");

    let switched = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "charts.select",
        json!({ "chartId": 8 }),
    );
    assert_eq!(switched["state"]["selectedChartId"], 8);
    assert_eq!(switched["state"]["chart"]["id"], 7);
}

#[test]
fn failed_assignment_mutations_are_swallowed() {
    let stub = seeded();
    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.base_url);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.open",
        json!({ "userId": 10 }),
    );
    let details_before = stub.count_calls("GET /seating_chart?id=7");

    stub.set_fail("assign_seat");
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "seats.dragBegin",
        json!({ "studentId": 22 }),
    );
    let dropped = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "seats.drop",
        json!({ "rowNum": 2, "colNum": 2 }),
    );
    assert_eq!(dropped["assigned"], false);
    assert_eq!(dropped["state"]["heldStudentId"], serde_json::Value::Null);
    assert_eq!(
        dropped["state"]["chart"]["assignments"]
            .as_array()
            .expect("assignments")
            .len(),
        1
    );

    stub.set_fail("remove_assignment");
    let removed = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "seats.remove",
        json!({ "studentId": 21 }),
    );
    assert_eq!(removed["removed"], false);
    assert_eq!(stub.chart(7).expect("chart 7").assignments.len(), 1);

    stub.set_fail("auto_assign");
    let auto = request_ok(&mut stdin, &mut reader, "5", "seats.autoAssign", json!({}));
    assert_eq!(auto["autoAssigned"], false);

    stub.set_fail("shuffle");
    let shuffled = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "seats.shuffle",
        json!({ "confirm": true }),
    );
    assert_eq!(shuffled["shuffled"], false);

    // No refetch happens after a failed mutation.
    assert_eq!(stub.count_calls("GET /seating_chart?id=7"), details_before);
}

#[test]
fn failed_delete_keeps_the_chart_and_skips_the_refetch() {
    let stub = seeded();
    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.base_url);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.open",
        json!({ "userId": 10 }),
    );
    let lists_before = stub.count_calls("GET /seating_chart?class_id=4");
    stub.set_fail("delete_chart");

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "charts.delete",
        json!({ "chartId": 7, "confirm": true }),
    );
    assert_eq!(deleted["deleted"], false);
    assert_eq!(
        deleted["state"]["charts"].as_array().expect("charts").len(),
        2
    );
    assert_eq!(deleted["state"]["selectedChartId"], 7);
    assert_eq!(
        stub.count_calls("GET /seating_chart?class_id=4"),
        lists_before
    );
    assert!(stub.chart(7).is_some());
}
