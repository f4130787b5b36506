// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use pb_core::{MutationKind, Payload, PendingMutation};

/// Format a single mutation line for list output.
///
/// ```text
/// pending_1718000000000_k3j9x0a1b  attach_to_entity  loc-42  2024-06-10 06:13
/// ```
pub fn format_mutation_line(mutation: &PendingMutation) -> String {
    format!(
        "{}  {}  {}  {}",
        mutation.id,
        mutation.kind.name(),
        mutation.subject(),
        mutation.created_at.format("%Y-%m-%d %H:%M")
    )
}

/// Format mutation details for the show command.
pub fn format_mutation_details(mutation: &PendingMutation) -> String {
    let mut output = Vec::new();

    output.push(format!("[{}] {}", mutation.kind.name(), mutation.id));
    output.push(format!(
        "Created: {}",
        mutation.created_at.format("%Y-%m-%d %H:%M:%S")
    ));

    match &mutation.kind {
        MutationKind::CreateEntity { draft_entity, .. } => {
            output.push(format!("Name: {}", draft_entity.name));
            output.push(format!(
                "Position: {}, {}",
                draft_entity.latitude, draft_entity.longitude
            ));
            if let Some(description) = &draft_entity.description {
                output.push(format!("Description: {}", description));
            }
        }
        MutationKind::AttachToEntity {
            target_entity_id, ..
        } => {
            output.push(format!("Location: {}", target_entity_id));
        }
        MutationKind::ReplaceAttachment {
            attachment_id,
            target_entity_id,
            ..
        } => {
            output.push(format!("Location: {}", target_entity_id));
            output.push(format!("Replaces: {}", attachment_id));
        }
        MutationKind::DeleteAttachment {
            attachment_id,
            owner_id,
        } => {
            output.push(format!("Location: {}", owner_id));
            output.push(format!("Photo: {}", attachment_id));
        }
    }

    if let Some(attachment) = mutation.draft_attachment() {
        output.push(String::new());
        output.push("Photo:".to_string());
        output.push(format!(
            "  By: {} ({})",
            attachment.user_name, attachment.user_id
        ));
        if let Some(caption) = &attachment.caption {
            output.push(format!("  Caption: {}", caption));
        }
        if let Some(content_type) = &attachment.content_type {
            output.push(format!("  Type: {}", content_type));
        }
        output.push(format!("  Payload: {}", format_payload(&attachment.payload)));
    }

    output.join("\n")
}

/// Describe a payload without printing its bytes.
pub fn format_payload(payload: &Payload) -> String {
    match payload {
        Payload::Blob(blob) => blob.to_string(),
        Payload::Inline(data) => format_size(data.len()),
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    let size = bytes as f64;
    if size >= MIB {
        format!("{:.1} MiB", size / MIB)
    } else if size >= KIB {
        format!("{:.1} KiB", size / KIB)
    } else if bytes == 1 {
        "1 byte".to_string()
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
