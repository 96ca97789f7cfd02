use std::io::Write;
use std::sync::Arc;

use docseal::{ArtifactStore, Document, VerificationOutcome, VerificationWorkflow};

use super::Status;

pub fn run(
    store: Arc<dyn ArtifactStore>,
    document: &Document,
    out: &mut dyn Write,
) -> anyhow::Result<Status> {
    let outcome = VerificationWorkflow::new(store).verify(document)?;

    match outcome {
        VerificationOutcome::Success => {
            writeln!(out, "{} {}", console::style("SUCCESS").green().bold(), document.id)?;
            Ok(Status::Ok)
        }
        VerificationOutcome::Failed { details } => {
            writeln!(out, "{} {}", console::style("FAILED").yellow().bold(), document.id)?;
            if let Some(details) = details {
                writeln!(out, "  {}", details)?;
            }
            Ok(Status::NotVerified)
        }
    }
}
