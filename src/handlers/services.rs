use std::sync::Arc;

use askama::Template;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use crate::auth::AdminSession;
use crate::errors::AppError;
use crate::models::Flash;
use crate::services::assets::ImageUpload;
use crate::services::catalog;
use crate::state::AppState;
use crate::templates::ServicesPage;
use crate::views::ServiceRow;

use super::{failure_flash, parse_id};

// GET /admin/services
pub async fn services_page(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
) -> Result<Html<String>, AppError> {
    render_services(&state, &session, None)
}

#[derive(Debug, Default)]
struct ServiceForm {
    action: String,
    service_id: String,
    name: String,
    description: String,
    icon: Option<ImageUpload>,
}

fn unreadable_form(e: MultipartError) -> AppError {
    tracing::warn!(error = %e, "failed to read service form");
    AppError::Validation("The form could not be read. Check the icon size and try again.".to_string())
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(unreadable_form)
}

async fn read_service_form(mut multipart: Multipart) -> Result<ServiceForm, AppError> {
    let mut form = ServiceForm::default();

    while let Some(field) = multipart.next_field().await.map_err(unreadable_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "action" => form.action = field_text(field).await?,
            "service_id" => form.service_id = field_text(field).await?,
            "name" => form.name = field_text(field).await?,
            "description" => form.description = field_text(field).await?,
            "icon_image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(unreadable_form)?;
                // Browsers send an empty part when no file was chosen.
                if !file_name.is_empty() && !data.is_empty() {
                    form.icon = Some(ImageUpload {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            other => tracing::debug!(field = other, "ignoring unknown service form field"),
        }
    }

    Ok(form)
}

// POST /admin/services
pub async fn services_action(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let form = match read_service_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            let flash = failure_flash(e, "Failed to save service.");
            return render_services(&state, &session, Some(flash));
        }
    };

    let flash = match form.action.as_str() {
        "add" => match catalog::add_service(&state, &form.name, &form.description, form.icon).await
        {
            Ok(_) => Flash::success("Service added successfully!"),
            Err(e) => failure_flash(e, "Failed to save service."),
        },
        "edit" => match parse_id(&form.service_id) {
            Some(id) => {
                match catalog::edit_service(&state, id, &form.name, &form.description, form.icon)
                    .await
                {
                    Ok(()) => Flash::success("Service updated successfully!"),
                    Err(e) => failure_flash(e, "Failed to save service."),
                }
            }
            None => Flash::danger("Invalid service id"),
        },
        "delete" => match parse_id(&form.service_id) {
            Some(id) => match catalog::delete_service(&state, id).await {
                Ok(()) => Flash::success("Service deleted successfully!"),
                Err(e) => failure_flash(e, "Failed to delete service."),
            },
            None => Flash::danger("Invalid service id"),
        },
        other => {
            tracing::warn!(action = other, "unknown service action");
            Flash::danger("Unknown action")
        }
    };

    render_services(&state, &session, Some(flash))
}

// GET /admin/services/:id/data
pub async fn service_data(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(id): Path<i64>,
) -> Response {
    match catalog::find_service(&state, id) {
        Ok(service) => {
            let icon_url = service
                .icon_image
                .as_deref()
                .map(|p| state.assets.public_url(p));
            Json(serde_json::json!({
                "success": true,
                "service": {
                    "id": service.id,
                    "name": service.name,
                    "description": service.description,
                    "icon_image": service.icon_image,
                    "icon_url": icon_url,
                }
            }))
            .into_response()
        }
        Err(AppError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "success": false, "error": "service not found" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

fn render_services(
    state: &AppState,
    session: &AdminSession,
    flash: Option<Flash>,
) -> Result<Html<String>, AppError> {
    let services = catalog::list_services(state)?;
    let now = Utc::now().naive_utc();

    let page = ServicesPage {
        admin: session.username.clone(),
        flash,
        services: services
            .iter()
            .map(|s| ServiceRow::new(s, state.assets.as_ref(), now))
            .collect(),
    };
    Ok(Html(page.render()?))
}
