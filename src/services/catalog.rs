//! Service catalog mutations.
//!
//! Row changes run in a transaction. A newly uploaded icon is written before the
//! row changes and removed again if they fail; a replaced or orphaned icon is
//! removed only after the row change has committed.

use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Service, ServiceInput};
use crate::services::assets::ImageUpload;
use crate::state::AppState;

fn name_required() -> AppError {
    AppError::Validation("Service name is required".to_string())
}

fn service_not_found() -> AppError {
    AppError::NotFound("Service".to_string())
}

pub fn list_services(state: &AppState) -> Result<Vec<Service>, AppError> {
    let db = state.conn()?;
    Ok(queries::list_services(&db)?)
}

pub fn find_service(state: &AppState, id: i64) -> Result<Service, AppError> {
    let db = state.conn()?;
    queries::get_service(&db, id)?.ok_or_else(service_not_found)
}

pub async fn add_service(
    state: &AppState,
    name: &str,
    description: &str,
    icon: Option<ImageUpload>,
) -> Result<i64, AppError> {
    let input = ServiceInput::new(name, description).ok_or_else(name_required)?;

    let icon_path = match icon {
        Some(upload) => store_icon(state, &upload).await,
        None => None,
    };

    let result = state
        .conn()
        .and_then(|db| Ok(queries::insert_service(&db, &input, icon_path.as_deref())?));

    match result {
        Ok(id) => {
            tracing::info!(service_id = id, name = %input.name, icon = ?icon_path, "service added");
            Ok(id)
        }
        Err(e) => {
            if let Some(path) = &icon_path {
                discard_icon(state, path).await;
            }
            Err(e)
        }
    }
}

pub async fn edit_service(
    state: &AppState,
    id: i64,
    name: &str,
    description: &str,
    icon: Option<ImageUpload>,
) -> Result<(), AppError> {
    let input = ServiceInput::new(name, description).ok_or_else(name_required)?;

    let new_icon = match icon {
        Some(upload) => store_icon(state, &upload).await,
        None => None,
    };

    let result = state
        .conn()
        .and_then(|mut db| apply_edit(&mut db, id, &input, new_icon.as_deref()));

    match result {
        Ok(replaced) => {
            tracing::info!(service_id = id, name = %input.name, icon = ?new_icon, "service updated");
            if let Some(old) = replaced {
                discard_icon(state, &old).await;
            }
            Ok(())
        }
        Err(e) => {
            if let Some(path) = &new_icon {
                discard_icon(state, path).await;
            }
            Err(e)
        }
    }
}

/// Returns the icon path that the edit made obsolete, if any.
fn apply_edit(
    conn: &mut Connection,
    id: i64,
    input: &ServiceInput,
    new_icon: Option<&str>,
) -> Result<Option<String>, AppError> {
    let tx = conn.transaction()?;
    let old_icon = queries::get_service_icon(&tx, id)?.ok_or_else(service_not_found)?;

    match new_icon {
        Some(path) => {
            queries::update_service_with_icon(&tx, id, input, path)?;
        }
        None => {
            queries::update_service(&tx, id, input)?;
        }
    }
    tx.commit()?;

    Ok(match new_icon {
        Some(new) => old_icon.filter(|old| old != new),
        None => None,
    })
}

pub async fn delete_service(state: &AppState, id: i64) -> Result<(), AppError> {
    let icon = state.conn().and_then(|mut db| {
        let tx = db.transaction()?;
        let icon = queries::get_service_icon(&tx, id)?.ok_or_else(service_not_found)?;
        queries::delete_service(&tx, id)?;
        tx.commit()?;
        Ok(icon)
    })?;

    tracing::info!(service_id = id, "service deleted");

    if let Some(path) = icon {
        discard_icon(state, &path).await;
    }
    Ok(())
}

/// Upload failures are tolerated: the service is saved without an icon.
async fn store_icon(state: &AppState, upload: &ImageUpload) -> Option<String> {
    match state.assets.store(upload).await {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(file_name = %upload.file_name, error = %e, "icon upload rejected");
            None
        }
    }
}

async fn discard_icon(state: &AppState, path: &str) {
    if let Err(e) = state.assets.remove(path).await {
        tracing::warn!(path, error = %e, "failed to remove icon");
    }
}
