//! Tests for the in-memory store.

use super::*;
use crate::domain::{BookingStatus, NewClassListing};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn listing(seats: i64) -> ClassListing {
    NewClassListing::new(email("sensei@example.com"), "Sensei", "Kanji", None, 3_000, seats)
        .expect("valid listing")
        .into_listing(ClassId::random())
}

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

#[rstest]
#[tokio::test]
async fn claiming_a_seat_moves_it_into_enrolled(store: InMemoryStore) {
    let class = listing(5);
    ClassRepository::insert(&store, &class).await.expect("insert");

    let claim = store.try_claim_seat(&class.id, 0).await.expect("claim");

    assert_eq!(
        claim,
        SeatClaim::Claimed {
            seat_capacity: 4,
            enrolled: 1
        }
    );
}

#[rstest]
#[tokio::test]
async fn full_classes_are_left_untouched(store: InMemoryStore) {
    let class = listing(0);
    ClassRepository::insert(&store, &class).await.expect("insert");

    let claim = store.try_claim_seat(&class.id, 0).await.expect("claim");
    let stored = ClassRepository::find(&store, &class.id)
        .await
        .expect("find")
        .expect("present");

    assert_eq!(
        claim,
        SeatClaim::Full {
            seat_capacity: 0,
            enrolled: 0
        }
    );
    assert_eq!(stored, class);
}

#[rstest]
#[tokio::test]
async fn threshold_holds_seats_back(store: InMemoryStore) {
    let class = listing(2);
    ClassRepository::insert(&store, &class).await.expect("insert");

    assert!(matches!(
        store.try_claim_seat(&class.id, 1).await,
        Ok(SeatClaim::Claimed { seat_capacity: 1, .. })
    ));
    assert!(matches!(
        store.try_claim_seat(&class.id, 1).await,
        Ok(SeatClaim::Full { seat_capacity: 1, .. })
    ));
}

#[rstest]
#[tokio::test]
async fn enrolled_overflow_leaves_the_listing_untouched(store: InMemoryStore) {
    let mut class = listing(1);
    class.enrolled = u32::MAX;
    ClassRepository::insert(&store, &class).await.expect("insert");

    let claim = store.try_claim_seat(&class.id, 0).await;
    let stored = ClassRepository::find(&store, &class.id)
        .await
        .expect("find")
        .expect("present");

    assert!(claim.is_err());
    assert_eq!(stored, class);
}

#[rstest]
#[tokio::test]
async fn unknown_classes_are_not_found(store: InMemoryStore) {
    assert_eq!(
        store.try_claim_seat(&ClassId::random(), 0).await,
        Ok(SeatClaim::NotFound)
    );
}

#[rstest]
#[tokio::test]
async fn upsert_keeps_one_record_with_latest_values(store: InMemoryStore) {
    let first = UserUpsert::new(email("ada@example.com"), "Ada", None, Some(UserRole::Instructor))
        .expect("valid");
    let second = UserUpsert::new(email("ADA@example.com"), "Ada Lovelace", None, None)
        .expect("valid");

    store.upsert(first).await.expect("first upsert");
    store.upsert(second).await.expect("second upsert");

    let users = UserRepository::list(&store, None).await.expect("list");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Ada Lovelace");
    assert_eq!(users[0].role, UserRole::Instructor);
}

#[rstest]
#[tokio::test]
async fn popular_orders_by_enrollment(store: InMemoryStore) {
    let mut quiet = listing(5);
    quiet.status = ClassStatus::Approved;
    let mut busy = listing(5);
    busy.status = ClassStatus::Approved;
    busy.enrolled = 9;
    let mut hidden = listing(5);
    hidden.enrolled = 50;
    for class in [&quiet, &busy, &hidden] {
        ClassRepository::insert(&store, class).await.expect("insert");
    }

    let popular = store.popular(6).await.expect("popular");

    let ids: Vec<ClassId> = popular.iter().map(|listing| listing.id).collect();
    assert_eq!(ids, vec![busy.id, quiet.id]);
}

#[rstest]
#[tokio::test]
async fn booking_delete_is_idempotent(store: InMemoryStore) {
    let class = listing(3);
    ClassRepository::insert(&store, &class).await.expect("insert class");
    let booking = Booking::for_listing(BookingId::random(), &class, email("kid@example.com"));
    BookingRepository::insert(&store, &booking)
        .await
        .expect("insert booking");

    assert_eq!(store.delete(&booking.id).await, Ok(true));
    assert_eq!(store.delete(&booking.id).await, Ok(false));
}

#[rstest]
#[tokio::test]
async fn bookings_for_missing_classes_are_rejected(store: InMemoryStore) {
    let class = listing(3);
    let booking = Booking::for_listing(BookingId::random(), &class, email("kid@example.com"));

    assert!(BookingRepository::insert(&store, &booking).await.is_err());
}

#[rstest]
#[tokio::test]
async fn recording_a_payment_marks_the_booking_paid(store: InMemoryStore) {
    let class = listing(3);
    ClassRepository::insert(&store, &class).await.expect("insert class");
    let booking = Booking::for_listing(BookingId::random(), &class, email("kid@example.com"));
    BookingRepository::insert(&store, &booking)
        .await
        .expect("insert booking");
    let payment = PaymentRecord {
        transaction_id: "pi_42".into(),
        paid_at: Utc
            .with_ymd_and_hms(2026, 5, 1, 9, 0, 0)
            .single()
            .expect("valid time"),
    };

    let updated = store
        .record_payment(&booking.id, &payment)
        .await
        .expect("record")
        .expect("present");

    assert_eq!(updated.status, BookingStatus::Paid);
    assert_eq!(updated.payment, Some(payment));
}
