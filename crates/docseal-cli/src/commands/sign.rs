use std::io::Write;
use std::sync::Arc;

use docseal::{ArtifactStore, Document, SigningConfig, SigningWorkflow};

use super::Status;

pub fn run(
    config: SigningConfig,
    store: Arc<dyn ArtifactStore>,
    document: &Document,
    out: &mut dyn Write,
) -> anyhow::Result<Status> {
    let workflow = SigningWorkflow::new(config, store)?;
    let receipt = workflow.sign(document)?;

    writeln!(out, "{} {}", console::style("Signed").green().bold(), receipt.document_id)?;
    writeln!(out, "  digest:    {}", receipt.digest)?;
    writeln!(out, "  signature: {}", hex::encode(receipt.signature.as_bytes()))?;
    writeln!(out, "  public key:")?;
    for line in receipt.public_key_pem().lines() {
        writeln!(out, "    {}", line)?;
    }
    Ok(Status::Ok)
}
