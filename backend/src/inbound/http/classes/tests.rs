//! Tests for class listing handlers.

use super::*;
use crate::domain::ports::{MockClassRepository, StoreError};
use crate::inbound::http::test_utils::{
    StateBuilder, bearer, email, init_app, listing, send, users_with_roles,
};
use actix_web::http::{StatusCode, header};
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

#[actix_web::test]
async fn approved_classes_are_public() {
    let mut classes = MockClassRepository::new();
    classes
        .expect_list()
        .withf(|filter| *filter == ClassFilter::Approved)
        .times(1)
        .returning(|_| Ok(vec![listing("sensei@example.com", 4)]));
    let app = init_app(StateBuilder::default().classes(classes).build()).await;

    let (status, body) = send(&app, actix_test::TestRequest::get().uri("/classes")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["seatCapacity"], Value::from(4));
    assert_eq!(body[0]["status"], Value::from("approved"));
}

#[rstest]
#[case("/classes/popular", 6)]
#[case("/classes/popular?limit=3", 3)]
#[actix_web::test]
async fn popular_classes_honour_the_limit(#[case] uri: &str, #[case] expected: u32) {
    let mut classes = MockClassRepository::new();
    classes
        .expect_popular()
        .withf(move |limit| *limit == expected)
        .times(1)
        .returning(|_| Ok(Vec::new()));
    let app = init_app(StateBuilder::default().classes(classes).build()).await;

    let (status, body) = send(&app, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[rstest]
#[case("/classes/popular?limit=0")]
#[case("/classes/popular?limit=51")]
#[actix_web::test]
async fn popular_classes_reject_out_of_range_limits(#[case] uri: &str) {
    let app = init_app(StateBuilder::default().build()).await;
    let (status, body) = send(&app, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], Value::from("limit"));
}

#[actix_web::test]
async fn single_classes_are_found_by_id() {
    let stored = listing("sensei@example.com", 8);
    let id = stored.id;
    let mut classes = MockClassRepository::new();
    classes
        .expect_find()
        .withf(move |candidate| *candidate == id)
        .times(1)
        .returning(move |_| Ok(Some(stored.clone())));
    let app = init_app(StateBuilder::default().classes(classes).build()).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/classes/{id}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], Value::from(id.to_string()));
}

#[rstest]
#[case("/classes/not-a-uuid", StatusCode::BAD_REQUEST)]
#[case("/classes/3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn unknown_classes_are_reported(#[case] uri: &str, #[case] expected: StatusCode) {
    let mut classes = MockClassRepository::new();
    classes.expect_find().times(0..=1).returning(|_| Ok(None));
    let app = init_app(StateBuilder::default().classes(classes).build()).await;

    let (status, body) = send(&app, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, expected);
    assert_eq!(body["error"], Value::Bool(true));
}

#[actix_web::test]
async fn store_outages_surface_as_service_unavailable() {
    let mut classes = MockClassRepository::new();
    classes
        .expect_list()
        .times(1)
        .returning(|_| Err(StoreError::connection("pool exhausted")));
    let app = init_app(StateBuilder::default().classes(classes).build()).await;

    let (status, body) = send(&app, actix_test::TestRequest::get().uri("/classes")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], Value::from("service_unavailable"));
}

#[actix_web::test]
async fn instructors_create_pending_classes() {
    let mut classes = MockClassRepository::new();
    classes
        .expect_insert()
        .withf(|listing| {
            listing.status == ClassStatus::Pending
                && listing.enrolled == 0
                && listing.instructor_email == email("sensei@example.com")
        })
        .times(1)
        .returning(|_| Ok(()));
    let state = StateBuilder::default()
        .users(users_with_roles(&[("sensei@example.com", UserRole::Instructor)]))
        .classes(classes)
        .build();
    let token = bearer(&state, "sensei@example.com");
    let app = init_app(state).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/classes")
            .insert_header((header::AUTHORIZATION, token))
            .set_json(json!({
                "title": "Business Korean",
                "priceCents": 6000,
                "seatCapacity": 10
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], Value::from("pending"));
    assert_eq!(body["instructorName"], Value::from("Test User"));
}

#[rstest]
#[case(UserRole::Student, json!({ "title": "x", "priceCents": 1, "seatCapacity": 1 }), StatusCode::FORBIDDEN)]
#[case(UserRole::Instructor, json!({ "title": " ", "priceCents": 1, "seatCapacity": 1 }), StatusCode::BAD_REQUEST)]
#[case(UserRole::Instructor, json!({ "title": "x", "priceCents": 1, "seatCapacity": -1 }), StatusCode::BAD_REQUEST)]
#[case(UserRole::Instructor, json!({ "title": "x", "priceCents": 1, "seatCapacity": 3_000_000_000_i64 }), StatusCode::BAD_REQUEST)]
#[case(UserRole::Instructor, json!({ "title": "x", "priceCents": u64::MAX, "seatCapacity": 1 }), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn class_creation_is_validated(
    #[case] role: UserRole,
    #[case] payload: Value,
    #[case] expected: StatusCode,
) {
    let state = StateBuilder::default()
        .users(users_with_roles(&[("someone@example.com", role)]))
        .build();
    let token = bearer(&state, "someone@example.com");
    let app = init_app(state).await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/classes")
            .insert_header((header::AUTHORIZATION, token))
            .set_json(payload),
    )
    .await;

    assert_eq!(status, expected);
}

#[rstest]
#[case("sensei@example.com", StatusCode::OK)]
#[case("intruder@example.com", StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn only_the_owner_edits_a_class(#[case] caller: &str, #[case] expected: StatusCode) {
    let stored = listing("sensei@example.com", 8);
    let id = stored.id;
    let mut classes = MockClassRepository::new();
    let found = stored.clone();
    classes
        .expect_find()
        .times(1)
        .returning(move |_| Ok(Some(found.clone())));
    classes
        .expect_update_details()
        .withf(|_, edit| edit.title.as_deref() == Some("Advanced Kanji") && edit.seat_capacity.is_none())
        .times(0..=1)
        .returning(move |_, edit| {
            let mut updated = stored.clone();
            edit.apply_to(&mut updated);
            Ok(Some(updated))
        });
    let state = StateBuilder::default().classes(classes).build();
    let token = bearer(&state, caller);
    let app = init_app(state).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/classes/{id}"))
            .insert_header((header::AUTHORIZATION, token))
            .set_json(json!({ "title": "Advanced Kanji" })),
    )
    .await;

    assert_eq!(status, expected);
    if expected == StatusCode::OK {
        assert_eq!(body["title"], Value::from("Advanced Kanji"));
    }
}

#[rstest]
#[case(json!({ "seatCapacity": 3_000_000_000_i64 }), "seatCapacity")]
#[case(json!({ "priceCents": u64::MAX }), "priceCents")]
#[actix_web::test]
async fn edits_beyond_storable_ranges_are_rejected(#[case] payload: Value, #[case] field: &str) {
    let state = StateBuilder::default().build();
    let token = bearer(&state, "sensei@example.com");
    let app = init_app(state).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/classes/{}", ClassId::random()))
            .insert_header((header::AUTHORIZATION, token))
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], Value::from("invalid_request"));
    assert_eq!(body["details"]["field"], Value::from(field));
}

#[actix_web::test]
async fn admins_moderate_classes() {
    let stored = listing("sensei@example.com", 8);
    let id = stored.id;
    let mut classes = MockClassRepository::new();
    classes
        .expect_set_status()
        .withf(|_, change| {
            change.status == ClassStatus::Denied && change.feedback.as_deref() == Some("Add a syllabus")
        })
        .times(1)
        .returning(move |_, change| {
            let mut updated = stored.clone();
            updated.status = change.status;
            updated.feedback = change.feedback.clone();
            Ok(Some(updated))
        });
    let state = StateBuilder::default()
        .users(users_with_roles(&[("root@example.com", UserRole::Admin)]))
        .classes(classes)
        .build();
    let token = bearer(&state, "root@example.com");
    let app = init_app(state).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/classes/{id}/status"))
            .insert_header((header::AUTHORIZATION, token))
            .set_json(json!({ "status": "denied", "feedback": "Add a syllabus" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], Value::from("denied"));
    assert_eq!(body["feedback"], Value::from("Add a syllabus"));
}

#[actix_web::test]
async fn all_classes_are_admin_only() {
    let state = StateBuilder::default()
        .users(users_with_roles(&[("ada@example.com", UserRole::Student)]))
        .build();
    let token = bearer(&state, "ada@example.com");
    let app = init_app(state).await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/classes/all")
            .insert_header((header::AUTHORIZATION, token)),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn instructors_list_their_own_classes() {
    let mut classes = MockClassRepository::new();
    classes
        .expect_list()
        .withf(|filter| *filter == ClassFilter::Instructor(email("sensei@example.com")))
        .times(1)
        .returning(|_| Ok(vec![listing("sensei@example.com", 3)]));
    let state = StateBuilder::default().classes(classes).build();
    let token = bearer(&state, "sensei@example.com");
    let app = init_app(state).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/classes/instructor/sensei@example.com")
            .insert_header((header::AUTHORIZATION, token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}
