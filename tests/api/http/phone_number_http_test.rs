//! Phone number sub-resource HTTP tests

use super::{build_test_router, delete, get_json, patch_json, post_json, put_json, TestAppState};
use crate::api::{phone, student};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use students_core::domain::{PhoneNumber, StringUuid, Student};

async fn setup(phones: Vec<PhoneNumber>) -> (axum::Router, String) {
    let state = TestAppState::new();
    let mut existing = student("Ana", "1");
    existing.phone_numbers = phones;
    state.student_repo.add_student(existing.clone()).await;
    (
        build_test_router(state),
        format!("/api/v1/students/{}/phone-numbers", existing.id),
    )
}

#[tokio::test]
async fn test_add_phone_returns_201_with_index_location() {
    let (app, base) = setup(vec![phone(51, 1111, "a")]).await;

    let response = post_json(
        &app,
        &base,
        &json!({ "ddd": 11, "number": 2222, "description": "work" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.location(), Some(format!("{}/1", base).as_str()));
    assert_eq!(response.json::<PhoneNumber>(), Some(phone(11, 2222, "work")));

    let (_, fetched): (_, Option<PhoneNumber>) = get_json(&app, &format!("{}/1", base)).await;
    assert_eq!(fetched, Some(phone(11, 2222, "work")));
}

#[tokio::test]
async fn test_add_phone_to_unknown_student_returns_404() {
    let app = build_test_router(TestAppState::new());

    let response = post_json(
        &app,
        &format!("/api/v1/students/{}/phone-numbers", StringUuid::new_v4()),
        &json!({ "ddd": 11, "number": 2222 }),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_phones_in_order() {
    let phones = vec![phone(51, 1111, "a"), phone(51, 2222, "b")];
    let (app, base) = setup(phones.clone()).await;

    let (status, listed): (_, Option<Vec<PhoneNumber>>) = get_json(&app, &base).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.unwrap(), phones);
}

#[rstest]
#[case("2")]
#[case("99")]
#[case("-1")]
#[tokio::test]
async fn test_out_of_range_index_returns_404(#[case] index: &str) {
    let (app, base) = setup(vec![phone(51, 1111, "a"), phone(51, 2222, "b")]).await;
    let path = format!("{}/{}", base, index);

    let (status, body): (_, Option<Value>) = get_json(&app, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["message"], "Phone number not found");

    assert_eq!(delete(&app, &path).await.status, StatusCode::NOT_FOUND);
    let response = put_json(&app, &path, &json!({ "ddd": 1, "number": 1 })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_index_returns_400() {
    let (app, base) = setup(vec![phone(51, 1111, "a")]).await;

    let (status, body): (_, Option<Value>) = get_json(&app, &format!("{}/first", base)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"], "bad_request");
}

#[tokio::test]
async fn test_replace_phone_overwrites_every_field() {
    let (app, base) = setup(vec![phone(51, 1111, "a")]).await;
    let path = format!("{}/0", base);

    let response = put_json(&app, &path, &json!({ "ddd": 11, "number": 0 })).await;
    assert_eq!(response.status, StatusCode::OK);

    let (_, fetched): (_, Option<PhoneNumber>) = get_json(&app, &path).await;
    assert_eq!(
        fetched.unwrap(),
        PhoneNumber {
            ddd: 11,
            number: 0,
            description: None,
        }
    );
}

#[tokio::test]
async fn test_merge_phone_keeps_zero_and_omitted_values() {
    let (app, base) = setup(vec![phone(51, 999999999, "mobile")]).await;
    let path = format!("{}/0", base);

    let response = patch_json(&app, &path, &json!({ "ddd": 0, "description": "home" })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json::<PhoneNumber>(),
        Some(phone(51, 999999999, "home"))
    );

    let response = patch_json(&app, &path, &json!({ "number": 123 })).await;
    assert_eq!(response.json::<PhoneNumber>(), Some(phone(51, 123, "home")));
}

#[tokio::test]
async fn test_remove_phone_shifts_later_positions() {
    let (app, base) = setup(vec![
        phone(51, 1111, "a"),
        phone(51, 2222, "b"),
        phone(51, 3333, "c"),
    ])
    .await;

    let response = delete(&app, &format!("{}/1", base)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let (_, listed): (_, Option<Vec<PhoneNumber>>) = get_json(&app, &base).await;
    assert_eq!(listed.unwrap(), vec![phone(51, 1111, "a"), phone(51, 3333, "c")]);

    let (_, moved): (_, Option<PhoneNumber>) = get_json(&app, &format!("{}/1", base)).await;
    assert_eq!(moved, Some(phone(51, 3333, "c")));
}

#[tokio::test]
async fn test_phone_changes_visible_on_student() {
    let (app, base) = setup(vec![]).await;
    post_json(&app, &base, &json!({ "ddd": 51, "number": 1111 })).await;

    let student_path = base.trim_end_matches("/phone-numbers");
    let (_, fetched): (_, Option<Student>) = get_json(&app, student_path).await;
    let fetched = fetched.unwrap();

    assert_eq!(fetched.phone_numbers.len(), 1);
    assert!(fetched.updated_at >= fetched.created_at);
}
