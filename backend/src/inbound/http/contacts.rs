//! Contacts API handlers.
//!
//! ```text
//! GET    /api/v1/contacts
//! GET    /api/v1/contacts/{id}
//! GET    /api/v1/contacts/search_by_last_name/{name}
//! GET    /api/v1/contacts/search_by_first_name/{name}
//! GET    /api/v1/contacts/search_by_email/{email}
//! GET    /api/v1/contacts/birthdays?days=7
//! POST   /api/v1/contacts
//! PUT    /api/v1/contacts/{id}
//! DELETE /api/v1/contacts/{id}
//! ```
//!
//! Every handler requires a session; the session user scopes every lookup.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CreateContactRequest, RemoveContactRequest, UpdateContactRequest};
use crate::domain::{
    Contact, ContactChanges, ContactId, DEFAULT_BIRTHDAY_WINDOW_DAYS, Error, NewContact,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DATE_FORMAT, FieldName, check_birthday_days, contact_validation_error, parse_birth_date,
    parse_email, parse_optional_birth_date,
};

const EMAIL: FieldName = FieldName::new("email");
const BIRTH_DATE: FieldName = FieldName::new("birthDate");

/// Request body for `POST /api/v1/contacts`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    /// ISO date, `YYYY-MM-DD`.
    #[schema(example = "1990-05-17")]
    pub birth_date: String,
    #[serde(default)]
    pub additional_data: Option<String>,
}

impl TryFrom<ContactRequest> for NewContact {
    type Error = Error;

    fn try_from(value: ContactRequest) -> Result<Self, Self::Error> {
        let email = parse_email(&value.email, EMAIL)?;
        let birth_date = parse_birth_date(&value.birth_date, BIRTH_DATE)?;
        NewContact::try_new(
            &value.first_name,
            &value.last_name,
            email,
            &value.phone_number,
            birth_date,
            value.additional_data.as_deref(),
        )
        .map_err(contact_validation_error)
    }
}

/// Request body for `PUT /api/v1/contacts/{id}`. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdateRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub additional_data: Option<String>,
    #[serde(default)]
    #[schema(example = "1990-05-17")]
    pub birth_date: Option<String>,
}

impl TryFrom<ContactUpdateRequest> for ContactChanges {
    type Error = Error;

    fn try_from(value: ContactUpdateRequest) -> Result<Self, Self::Error> {
        let email = value
            .email
            .as_deref()
            .map(|raw| parse_email(raw, EMAIL))
            .transpose()?;
        let birth_date = parse_optional_birth_date(value.birth_date.as_deref(), BIRTH_DATE)?;
        Ok(ContactChanges::new(
            email,
            value.additional_data.as_deref(),
            birth_date,
        ))
    }
}

/// Contact as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[schema(example = "1990-05-17")]
    pub birth_date: String,
    pub additional_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(value: Contact) -> Self {
        Self {
            id: value.id.as_i32(),
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email.into(),
            phone_number: value.phone_number,
            birth_date: value.birth_date.format(DATE_FORMAT).to_string(),
            additional_data: value.additional_data,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Query string for `GET /api/v1/contacts/birthdays`.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct BirthdaysQuery {
    /// Look-ahead in days from today, inclusive. Defaults to 7, at most 365.
    pub days: Option<u32>,
}

fn contact_id(raw: &str) -> Result<ContactId, Error> {
    // The route only admits digits; anything outside the positive i32 range
    // can never exist, so it reads as absent.
    raw.parse::<i32>()
        .ok()
        .and_then(|id| ContactId::new(id).ok())
        .ok_or_else(|| Error::not_found("contact not found"))
}

fn to_responses(contacts: Vec<Contact>) -> Vec<ContactResponse> {
    contacts.into_iter().map(ContactResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/v1/contacts",
    responses(
        (status = 200, description = "Caller's contacts", body = [ContactResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "listContacts"
)]
#[get("/contacts")]
pub async fn list_contacts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ContactResponse>>> {
    let user_id = session.require_user_id()?;
    let contacts = state.contacts_query.list_contacts(&user_id).await?;
    Ok(web::Json(to_responses(contacts)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contacts/birthdays",
    params(BirthdaysQuery),
    responses(
        (status = 200, description = "Contacts with a birthday in the window", body = [ContactResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "upcomingBirthdays"
)]
#[get("/contacts/birthdays")]
pub async fn upcoming_birthdays(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<BirthdaysQuery>,
) -> ApiResult<web::Json<Vec<ContactResponse>>> {
    let user_id = session.require_user_id()?;
    let days = check_birthday_days(query.days.unwrap_or(DEFAULT_BIRTHDAY_WINDOW_DAYS))?;
    let contacts = state
        .contacts_query
        .upcoming_birthdays(&user_id, days)
        .await?;
    Ok(web::Json(to_responses(contacts)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contacts/search_by_last_name/{name}",
    params(("name" = String, Path, description = "Exact last name")),
    responses(
        (status = 200, description = "Matching contacts", body = [ContactResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "searchContactsByLastName"
)]
#[get("/contacts/search_by_last_name/{name}")]
pub async fn search_by_last_name(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ContactResponse>>> {
    let user_id = session.require_user_id()?;
    let contacts = state
        .contacts_query
        .search_by_last_name(&user_id, &path.into_inner())
        .await?;
    Ok(web::Json(to_responses(contacts)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contacts/search_by_first_name/{name}",
    params(("name" = String, Path, description = "Exact first name")),
    responses(
        (status = 200, description = "Matching contacts", body = [ContactResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "searchContactsByFirstName"
)]
#[get("/contacts/search_by_first_name/{name}")]
pub async fn search_by_first_name(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ContactResponse>>> {
    let user_id = session.require_user_id()?;
    let contacts = state
        .contacts_query
        .search_by_first_name(&user_id, &path.into_inner())
        .await?;
    Ok(web::Json(to_responses(contacts)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contacts/search_by_email/{email}",
    params(("email" = String, Path, description = "Contact email")),
    responses(
        (status = 200, description = "Contact", body = ContactResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "findContactByEmail"
)]
#[get("/contacts/search_by_email/{email}")]
pub async fn search_by_email(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ContactResponse>> {
    let user_id = session.require_user_id()?;
    let email = parse_email(&path.into_inner(), EMAIL)?;
    let contact = state.contacts_query.find_by_email(&user_id, &email).await?;
    Ok(web::Json(contact.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/contacts/{id}",
    params(("id" = i32, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact", body = ContactResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "getContact"
)]
#[get("/contacts/{id:\\d+}")]
pub async fn get_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ContactResponse>> {
    let user_id = session.require_user_id()?;
    let id = contact_id(&path.into_inner())?;
    let contact = state.contacts_query.get_contact(&user_id, id).await?;
    Ok(web::Json(contact.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/contacts",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Email already exists", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "createContact"
)]
#[post("/contacts")]
pub async fn create_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let contact = NewContact::try_from(payload.into_inner())?;
    let created = state
        .contacts
        .create_contact(CreateContactRequest { user_id, contact })
        .await?;
    Ok(HttpResponse::Created().json(ContactResponse::from(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/contacts/{id}",
    params(("id" = i32, Path, description = "Contact id")),
    request_body = ContactUpdateRequest,
    responses(
        (status = 200, description = "Contact updated", body = ContactResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Email already exists", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "updateContact"
)]
#[put("/contacts/{id:\\d+}")]
pub async fn update_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ContactUpdateRequest>,
) -> ApiResult<web::Json<ContactResponse>> {
    let user_id = session.require_user_id()?;
    let contact_id = contact_id(&path.into_inner())?;
    let changes = ContactChanges::try_from(payload.into_inner())?;
    let updated = state
        .contacts
        .update_contact(UpdateContactRequest {
            user_id,
            contact_id,
            changes,
        })
        .await?;
    Ok(web::Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/contacts/{id}",
    params(("id" = i32, Path, description = "Contact id")),
    responses(
        (status = 204, description = "Contact removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "removeContact"
)]
#[delete("/contacts/{id:\\d+}")]
pub async fn remove_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let contact_id = contact_id(&path.into_inner())?;
    state
        .contacts
        .remove_contact(RemoveContactRequest {
            user_id,
            contact_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register every contact route on `cfg`.
///
/// `birthdays` and the search routes are registered before `{id}`; the id
/// segment only matches digits, so order does not change routing.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_contacts)
        .service(upcoming_birthdays)
        .service(search_by_last_name)
        .service(search_by_first_name)
        .service(search_by_email)
        .service(get_contact)
        .service(create_contact)
        .service(update_contact)
        .service(remove_contact);
}

#[cfg(test)]
#[path = "contacts_tests.rs"]
mod tests;
