use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use service::{ContactId, NewContact, ServiceError};
use tracing::{debug, info};

use crate::errors::ApiError;
use crate::metrics;
use crate::routes::ServerState;
use crate::views::{self, FormData, Page, FIELD_EMAIL};

pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already exists";

/// `GET /`: full page with an empty form and the current contact list.
pub async fn index(State(state): State<ServerState>) -> Result<Html<String>, ApiError> {
    let page = Page { form: FormData::new(), contacts: state.contacts.list().await };
    Ok(Html(views::index(&page)?))
}

/// `POST /contacts`
///
/// 200: empty form followed by the new row as an out-of-band fragment.
/// 422: the form again, with the submitted values and an email error.
pub async fn create(
    State(state): State<ServerState>,
    Form(input): Form<NewContact>,
) -> Result<Response, ApiError> {
    let NewContact { name, email } = input;
    match state.contacts.add_if_absent(name.clone(), email.clone()).await {
        Ok(contact) => {
            metrics::CONTACTS_ADDED_TOTAL.inc();
            metrics::CONTACTS_CURRENT.inc();
            let mut body = views::form(&FormData::new())?;
            body.push_str(&views::oob_contact(&contact)?);
            Ok((StatusCode::OK, Html(body)).into_response())
        }
        Err(ServiceError::DuplicateEmail(_)) => {
            metrics::CONTACTS_DUPLICATE_REJECTED_TOTAL.inc();
            info!(%email, "contact rejected: duplicate email");
            let form = FormData::with_values(&name, &email)
                .with_error(FIELD_EMAIL, DUPLICATE_EMAIL_MESSAGE);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(views::form(&form)?)).into_response())
        }
    }
}

/// `DELETE /contacts/:id`
///
/// Sleeps for the configured delay first to simulate a slow backing call.
/// The store is not locked while sleeping.
pub async fn remove(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.delete_delay.is_zero() {
        debug!(delay_ms = state.delete_delay.as_millis() as u64, "simulating slow delete");
        tokio::time::sleep(state.delete_delay).await;
    }

    // any integer is a valid id; negatives simply never match
    let id: i64 = raw_id.parse().map_err(|_| ApiError::InvalidId)?;
    let removed = match ContactId::try_from(id) {
        Ok(id) => state.contacts.remove(id).await,
        Err(_) => false,
    };

    if !removed {
        metrics::CONTACTS_REMOVE_NOT_FOUND_TOTAL.inc();
        return Err(ApiError::NotFound);
    }
    metrics::CONTACTS_REMOVED_TOTAL.inc();
    metrics::CONTACTS_CURRENT.dec();
    Ok(StatusCode::OK)
}
