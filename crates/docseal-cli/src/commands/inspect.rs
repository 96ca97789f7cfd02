use std::io::Write;

use chrono::{TimeZone, Utc};
use docseal::{ArtifactStore, DocumentId, FileArtifactStore};

use super::Status;

pub fn run(
    store: &FileArtifactStore,
    id: &DocumentId,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<Status> {
    let record = store.get(id)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
        return Ok(Status::Ok);
    }

    let created = Utc
        .timestamp_millis_opt(record.created_at)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| record.created_at.to_string());

    writeln!(out, "document:  {}", record.document_id)?;
    writeln!(out, "created:   {}", created)?;
    if let Some(digest) = &record.digest {
        writeln!(out, "digest:    {}", digest)?;
    }
    writeln!(out, "signature: {}", hex::encode(&record.signature))?;
    writeln!(out, "public key:")?;
    for line in String::from_utf8_lossy(&record.public_key).lines() {
        writeln!(out, "  {}", line)?;
    }
    Ok(Status::Ok)
}

pub fn list(store: &FileArtifactStore, out: &mut dyn Write) -> anyhow::Result<Status> {
    for id in store.list()? {
        writeln!(out, "{}", id)?;
    }
    Ok(Status::Ok)
}
