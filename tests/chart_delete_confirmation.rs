
use serde_json::json;
use test_support::{error_code, request, request_ok, spawn_sidecar, StubApi};

fn seeded() -> StubApi {
    let stub = StubApi::start();
    stub.add_teacher(1, 10, "Pat", "Lee");
    stub.add_class_row(1, 4, "4A", "Mathematics");
    stub.set_roster(4, &[(21, "Ana", "Silva")]);
    stub.add_chart(7, 4, "Front rows", 3, 3, true);
    stub.add_chart(8, 4, "Alternate", 3, 3, false);
    stub
}

#[test]
fn delete_without_confirmation_performs_no_upstream_call() {
    let stub = seeded();
    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.base_url);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.open",
        json!({ "userId": 10 }),
    );

    let answered = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "charts.delete",
        json!({ "chartId": 7 }),
    );
    assert_eq!(answered["deleted"], false);
    assert_eq!(answered["confirmRequired"], true);
    assert_eq!(stub.count_calls("DELETE /seating_chart"), 0);
    assert_eq!(
        answered["state"]["charts"].as_array().expect("charts").len(),
        2
    );
    assert_eq!(answered["state"]["selectedChartId"], 7);
}

#[test]
fn confirmed_delete_issues_one_delete_and_one_refetch() {
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

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "charts.delete",
        json!({ "chartId": 7, "confirm": true }),
    );
    assert_eq!(deleted["deleted"], true);
    assert_eq!(stub.count_calls("DELETE /seating_chart?id=7"), 1);
    assert_eq!(
        stub.count_calls("GET /seating_chart?class_id=4"),
        lists_before + 1
    );

    // Selection falls to the remaining chart and its detail is loaded.
    let state = &deleted["state"];
    assert_eq!(state["charts"].as_array().expect("charts").len(), 1);
    assert_eq!(state["selectedChartId"], 8);
    assert_eq!(state["chart"]["id"], 8);
    assert_eq!(stub.count_calls("GET /seating_chart?id=8"), 1);
}

#[test]
fn deleting_an_unknown_chart_is_rejected() {
    let stub = seeded();
    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.base_url);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.open",
        json!({ "userId": 10 }),
    );
    let denied = request(
        &mut stdin,
        &mut reader,
        "2",
        "charts.delete",
        json!({ "chartId": 99, "confirm": true }),
    );
    assert_eq!(denied["ok"], false);
    assert_eq!(error_code(&denied), "bad_params");
    assert_eq!(stub.count_calls("DELETE /seating_chart"), 0);
}
