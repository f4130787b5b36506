// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use pb_core::{DraftAttachment, DraftEntity, MutationQueue};

use crate::cli::{EnqueueCommand, PhotoArgs};
use crate::context::Context;
use crate::error::{Error, Result};

pub async fn run(ctx: &Context, command: EnqueueCommand) -> Result<()> {
    let queue = ctx.open_offline_queue().await?;
    let rendered = run_impl(&queue, command).await;
    super::finish(queue, rendered).await
}

/// Internal implementation that accepts the queue for testing.
///
/// Prints the id of the queued mutation.
pub(crate) async fn run_impl(queue: &MutationQueue, command: EnqueueCommand) -> Result<String> {
    let id = match command {
        EnqueueCommand::Create {
            name,
            lat,
            lon,
            description,
            photo,
        } => {
            let mut entity = DraftEntity::new(name, lat, lon);
            entity.description = description;
            entity.user_id = Some(photo.user_id.clone());
            queue
                .enqueue_create_entity(entity, read_photo(&photo)?)
                .await?
        }
        EnqueueCommand::Attach { entity_id, photo } => {
            queue
                .enqueue_attach_to_entity(read_photo(&photo)?, entity_id)
                .await?
        }
        EnqueueCommand::Replace {
            attachment_id,
            entity_id,
            photo,
        } => {
            queue
                .enqueue_replace_attachment(read_photo(&photo)?, attachment_id, entity_id)
                .await?
        }
        EnqueueCommand::Delete {
            attachment_id,
            owner_id,
        } => {
            queue
                .enqueue_delete_attachment(attachment_id, owner_id)
                .await?
        }
    };

    Ok(format!("{}\n", id))
}

fn read_photo(photo: &PhotoArgs) -> Result<DraftAttachment> {
    if photo.user_id.trim().is_empty() {
        return Err(Error::FieldEmpty { field: "user id" });
    }
    if photo.user_name.trim().is_empty() {
        return Err(Error::FieldEmpty { field: "user name" });
    }

    let data = std::fs::read(&photo.file).map_err(|source| Error::ReadFile {
        path: photo.file.display().to_string(),
        source,
    })?;

    let mut attachment = DraftAttachment::new(photo.user_id.clone(), photo.user_name.clone(), data);
    attachment.caption = photo.caption.clone();
    attachment.content_type = photo
        .content_type
        .clone()
        .or_else(|| guess_content_type(&photo.file).map(str::to_string));
    Ok(attachment)
}

/// MIME type for common photo extensions.
pub fn guess_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
