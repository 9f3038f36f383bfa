//! Tests for the contact service: ownership scoping, partial updates,
//! birthday windows and repository error mapping.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockContactRepository;
use crate::domain::{ContactChanges, ErrorCode, NewContact};
use crate::test_support::{InMemoryContactRepository, SteppingClock};

struct Harness {
    repo: Arc<InMemoryContactRepository>,
    service: ContactsService<InMemoryContactRepository>,
    owner: UserId,
    stranger: UserId,
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn today() -> NaiveDate {
    start().date_naive()
}

fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).expect("valid email")
}

fn new_contact(raw_email: &str, birth_date: NaiveDate) -> NewContact {
    NewContact::try_new("Grace", "Hopper", email(raw_email), "+1 555 0100", birth_date, Some("admiral"))
        .expect("valid contact")
}

#[fixture]
fn harness() -> Harness {
    let repo = Arc::new(InMemoryContactRepository::new());
    let clock = Arc::new(SteppingClock::new(start(), TimeDelta::seconds(1)));
    Harness {
        service: ContactsService::new(repo.clone(), clock),
        repo,
        owner: UserId::new(1).expect("owner id"),
        stranger: UserId::new(2).expect("stranger id"),
    }
}

async fn create(h: &Harness, user_id: UserId, raw_email: &str, birth_date: NaiveDate) -> Contact {
    h.service
        .create_contact(CreateContactRequest {
            user_id,
            contact: new_contact(raw_email, birth_date),
        })
        .await
        .expect("create contact")
}

#[rstest]
#[tokio::test]
async fn created_contacts_get_fresh_ids(harness: Harness) {
    let first = create(&harness, harness.owner, "c1@x.com", today()).await;
    let second = create(&harness, harness.owner, "c2@x.com", today()).await;
    let third = create(&harness, harness.stranger, "c1@x.com", today()).await;

    assert_ne!(first.id, second.id);
    assert_ne!(second.id, third.id);
    assert_ne!(first.id, third.id);
    assert_eq!(first.created_at, first.updated_at);
}

#[rstest]
#[tokio::test]
async fn duplicate_email_for_same_owner_conflicts(harness: Harness) {
    create(&harness, harness.owner, "c@x.com", today()).await;
    let error = harness
        .service
        .create_contact(CreateContactRequest {
            user_id: harness.owner,
            contact: new_contact("c@x.com", today()),
        })
        .await
        .expect_err("duplicate email");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "Email already exists!");
    assert_eq!(harness.repo.snapshot().len(), 1);
}

#[rstest]
#[tokio::test]
async fn lookups_by_email_are_owner_scoped(harness: Harness) {
    let contact = create(&harness, harness.owner, "c@x.com", today()).await;

    let foreign = harness
        .service
        .find_by_email(&harness.stranger, &email("c@x.com"))
        .await
        .expect_err("foreign lookup");
    assert_eq!(foreign.code(), ErrorCode::NotFound);

    let own = harness
        .service
        .find_by_email(&harness.owner, &email("c@x.com"))
        .await
        .expect("own lookup");
    assert_eq!(own, contact);
}

#[rstest]
#[tokio::test]
async fn foreign_update_is_not_found_and_leaves_record(harness: Harness) {
    let contact = create(&harness, harness.owner, "c@x.com", today()).await;

    let error = harness
        .service
        .update_contact(UpdateContactRequest {
            user_id: harness.stranger,
            contact_id: contact.id,
            changes: ContactChanges {
                additional_data: Some("hijacked".to_owned()),
                ..ContactChanges::default()
            },
        })
        .await
        .expect_err("foreign update");
    assert_eq!(error.code(), ErrorCode::NotFound);

    let unchanged = harness
        .service
        .get_contact(&harness.owner, contact.id)
        .await
        .expect("still present");
    assert_eq!(unchanged, contact);
}

#[rstest]
#[tokio::test]
async fn partial_update_changes_only_supplied_fields(harness: Harness) {
    let contact = create(&harness, harness.owner, "c@x.com", today()).await;
    let new_birthday = NaiveDate::from_ymd_opt(1906, 12, 9).expect("date");

    let updated = harness
        .service
        .update_contact(UpdateContactRequest {
            user_id: harness.owner,
            contact_id: contact.id,
            changes: ContactChanges {
                birth_date: Some(new_birthday),
                ..ContactChanges::default()
            },
        })
        .await
        .expect("update");

    assert_eq!(updated.birth_date, new_birthday);
    assert_eq!(updated.email, contact.email);
    assert_eq!(updated.additional_data, contact.additional_data);
    assert_eq!(updated.first_name, contact.first_name);
    assert_eq!(updated.phone_number, contact.phone_number);
    assert_eq!(updated.created_at, contact.created_at);
    assert!(updated.updated_at > contact.updated_at);
}

#[rstest]
#[tokio::test]
async fn updating_to_a_taken_email_conflicts(harness: Harness) {
    create(&harness, harness.owner, "a@x.com", today()).await;
    let second = create(&harness, harness.owner, "b@x.com", today()).await;

    let error = harness
        .service
        .update_contact(UpdateContactRequest {
            user_id: harness.owner,
            contact_id: second.id,
            changes: ContactChanges {
                email: Some(email("a@x.com")),
                ..ContactChanges::default()
            },
        })
        .await
        .expect_err("taken email");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn foreign_remove_is_not_found_and_keeps_record(harness: Harness) {
    let contact = create(&harness, harness.owner, "c@x.com", today()).await;

    let error = harness
        .service
        .remove_contact(RemoveContactRequest {
            user_id: harness.stranger,
            contact_id: contact.id,
        })
        .await
        .expect_err("foreign remove");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(harness.repo.snapshot(), vec![contact]);
}

#[rstest]
#[tokio::test]
async fn owned_remove_returns_prior_state(harness: Harness) {
    let contact = create(&harness, harness.owner, "c@x.com", today()).await;

    let removed = harness
        .service
        .remove_contact(RemoveContactRequest {
            user_id: harness.owner,
            contact_id: contact.id,
        })
        .await
        .expect("remove");
    assert_eq!(removed, contact);

    let error = harness
        .service
        .get_contact(&harness.owner, contact.id)
        .await
        .expect_err("gone");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn upcoming_birthdays_use_inclusive_week(harness: Harness) {
    let soon = create(&harness, harness.owner, "today@x.com", today()).await;
    let edge = create(
        &harness,
        harness.owner,
        "edge@x.com",
        today() + TimeDelta::days(7),
    )
    .await;
    create(&harness, harness.owner, "later@x.com", today() + TimeDelta::days(10)).await;
    create(&harness, harness.stranger, "other@x.com", today()).await;

    let found = harness
        .service
        .upcoming_birthdays(&harness.owner, 7)
        .await
        .expect("birthdays");
    assert_eq!(found, vec![soon, edge]);
}

#[rstest]
#[tokio::test]
async fn name_searches_are_exact_and_scoped(harness: Harness) {
    let contact = create(&harness, harness.owner, "c@x.com", today()).await;
    create(&harness, harness.stranger, "c@x.com", today()).await;

    let by_last = harness
        .service
        .search_by_last_name(&harness.owner, " Hopper ")
        .await
        .expect("search");
    assert_eq!(by_last, vec![contact.clone()]);

    let partial = harness
        .service
        .search_by_first_name(&harness.owner, "Gra")
        .await
        .expect("search");
    assert!(partial.is_empty());

    let listed = harness.service.list_contacts(&harness.owner).await.expect("list");
    assert_eq!(listed, vec![contact]);
}

#[rstest]
#[case(ContactRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(ContactRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[case(ContactRepositoryError::duplicate_email("c@x.com"), ErrorCode::Conflict)]
#[tokio::test]
async fn repository_errors_map_to_domain_codes(
    #[case] failure: ContactRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockContactRepository::new();
    repo.expect_list_contacts()
        .times(1)
        .return_once(move |_| Err(failure));
    let service = ContactsService::new(Arc::new(repo), Arc::new(SteppingClock::frozen(start())));

    let error = service
        .list_contacts(&UserId::new(1).expect("id"))
        .await
        .expect_err("mapped error");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn unique_violation_on_insert_still_conflicts() {
    let mut repo = MockContactRepository::new();
    repo.expect_get_by_email().times(1).return_once(|_, _| Ok(None));
    repo.expect_create()
        .times(1)
        .return_once(|contact, _, _| Err(ContactRepositoryError::duplicate_email(contact.email().as_str())));
    let service = ContactsService::new(Arc::new(repo), Arc::new(SteppingClock::frozen(start())));

    let error = service
        .create_contact(CreateContactRequest {
            user_id: UserId::new(1).expect("id"),
            contact: new_contact("race@x.com", today()),
        })
        .await
        .expect_err("race lost");
    assert_eq!(error.code(), ErrorCode::Conflict);
}
