//! Tests for the command table: name lookup, argument parsing, results

mod common;

use std::sync::Arc;

use serde_json::json;

use redash::cli::commands::dispatch;
use redash::cli::CliError;
use redash::exitcode;
use redash::util::testing;

use common::{body_of, client_for, FakeRedash};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn given_unknown_command_when_dispatching_then_rejected_with_exit_code_1() {
    let fake = Arc::new(FakeRedash::new());
    let client = client_for(fake.clone());

    let err = dispatch(&client, "delete_query", &args(&["1"])).unwrap_err();

    assert!(matches!(err, CliError::UnknownCommand(ref name) if name == "delete_query"));
    assert_eq!(err.to_string(), "delete_query is not valid command");
    assert_eq!(err.exit_code(), exitcode::FAILURE);
    assert!(fake.requests().is_empty());
}

#[test]
fn given_create_query_args_when_dispatching_then_returns_published_query() {
    let fake = Arc::new(FakeRedash::new());
    let client = client_for(fake.clone());

    let result = dispatch(
        &client,
        "create_query",
        &args(&["daily_rev", "pg_main", "SELECT 1", "revenue"]),
    )
    .unwrap();

    assert_eq!(result["name"], json!("daily_rev"));
    assert_eq!(result["description"], json!("revenue"));
    assert_eq!(result["is_draft"], json!(false));
    assert_eq!(fake.requests().len(), 3);
}

#[test]
fn given_publish_false_text_when_creating_then_query_stays_draft() {
    let client = client_for(Arc::new(FakeRedash::new()));

    let result = dispatch(
        &client,
        "create_query",
        &args(&["daily_rev", "pg_main", "SELECT 1", "", "false"]),
    )
    .unwrap();

    assert_eq!(result["is_draft"], json!(true));
    assert_eq!(result["description"], json!(""));
}

#[test]
fn given_empty_positionals_when_updating_then_only_description_is_sent() {
    let fake = Arc::new(FakeRedash::new().with_query(42, "old", 1, "SELECT 0"));
    let client = client_for(fake.clone());

    dispatch(&client, "update_query", &args(&["42", "", "", "", "x"])).unwrap();

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        body_of(&requests[0]),
        json!({"description": "x", "is_draft": false})
    );
}

#[test]
fn given_missing_query_when_checking_existence_then_prints_false() {
    let client = client_for(Arc::new(FakeRedash::new()));

    let result = dispatch(&client, "query_exists", &args(&["999"])).unwrap();

    assert_eq!(result, json!(false));
}

#[test]
fn given_legacy_alias_when_listing_data_sources_then_passes_fields_through() {
    let client = client_for(Arc::new(FakeRedash::new()));

    let result = dispatch(&client, "get_data_sources", &[]).unwrap();

    assert_eq!(result[0]["name"], json!("pg_main"));
    assert_eq!(result[0]["type"], json!("pg"));
    assert_eq!(result[0]["view_only"], json!(false));
    assert_eq!(result[0]["paused"], json!(0));
}

#[test]
fn given_upsert_for_missing_id_when_dispatching_then_new_record_returned() {
    let client = client_for(Arc::new(FakeRedash::new()));

    let result = dispatch(
        &client,
        "update_or_create_query",
        &args(&["7", "daily_rev", "pg_main", "SELECT 1"]),
    )
    .unwrap();

    assert_ne!(result["id"], json!(7));
}

#[test]
fn given_too_many_args_when_dispatching_then_usage_error() {
    let fake = Arc::new(FakeRedash::new());
    let client = client_for(fake.clone());

    let err = dispatch(&client, "get_query_by_id", &args(&["1", "2"])).unwrap_err();

    assert!(matches!(err, CliError::InvalidArgs(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
    assert!(fake.requests().is_empty());
}

#[test]
fn given_non_numeric_id_when_dispatching_then_usage_error_without_request() {
    let fake = Arc::new(FakeRedash::new());
    let client = client_for(fake.clone());

    let err = dispatch(&client, "get_query_by_id", &args(&["forty-two"])).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
    assert!(fake.requests().is_empty());
}

#[test]
fn given_missing_record_when_dispatching_then_not_found_exit_code() {
    let client = client_for(Arc::new(FakeRedash::new()));

    let err = dispatch(&client, "get_data_source_by_name", &args(&["nope"])).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
    assert_eq!(err.to_string(), "nope is not found");
}
