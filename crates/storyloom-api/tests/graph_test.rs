//! Integration tests for graph projection.

mod common;

use axum::http::StatusCode;
use storyloom_test_support::fixtures;

#[tokio::test]
async fn test_graph_of_cave_labels_effects_on_request() {
    let state = common::test_state();
    let scenario_id = common::import(&state, fixtures::CAVE_JSON).await;

    let (status, graph) = common::get_json(
        common::build_test_app(&state),
        &format!("/api/v1/graph/{scenario_id}?label_effects=true"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        graph["nodes"],
        serde_json::json!(["entrance", "hall", "treasure", "exit"])
    );
    // "Walk home" has an empty next_scene and draws no edge.
    assert_eq!(graph["edges"].as_array().unwrap().len(), 5);
    assert_eq!(graph["edges"][1]["label"], "Fight (health: -100)");
    assert_eq!(graph["dangling_edges"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_graph_of_draft_shows_dangling_edges_unless_validity_required() {
    let state = common::test_state();
    let scenario_id = common::import(&state, fixtures::START_END_JSON).await;
    common::post_json(
        common::build_test_app(&state),
        &format!("/api/v1/scenarios/{scenario_id}/delete-scene"),
        &serde_json::json!({ "scene_id": "end" }),
    )
    .await;

    let (status, graph) = common::get_json(
        common::build_test_app(&state),
        &format!("/api/v1/graph/{scenario_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(graph["dangling_edges"][0]["target"], "end");

    let (status, json) = common::get_json(
        common::build_test_app(&state),
        &format!("/api/v1/graph/{scenario_id}?require_valid=true"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "invalid_scenario");
}

#[tokio::test]
async fn test_dot_output_marks_the_entry_scene() {
    let state = common::test_state();
    let scenario_id = common::import(&state, fixtures::START_END_JSON).await;

    let (status, dot) = common::get_text(
        common::build_test_app(&state),
        &format!("/api/v1/graph/{scenario_id}/dot"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(dot.contains("\"start\" [peripheries=2];"));
    assert!(dot.trim_end().ends_with('}'));
}
