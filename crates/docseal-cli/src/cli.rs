use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use docseal::{ResignPolicy, SigningConfig};

#[derive(Debug, Parser)]
#[command(name = "docseal", version, about = "Sign documents and verify their signatures")]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Directory holding signature artifacts
    #[arg(long, global = true, env = "DOCSEAL_STORAGE_DIR", default_value = "./storage")]
    pub storage_dir: PathBuf,

    /// RSA modulus size for newly generated keys (minimum 2048)
    #[arg(long, global = true, default_value_t = docseal::docsign::DEFAULT_KEY_BITS)]
    pub key_bits: u32,

    /// Refuse to re-sign a document that already has an artifact
    #[arg(long, global = true)]
    pub reject_resign: bool,
}

impl StoreArgs {
    pub fn signing_config(&self) -> SigningConfig {
        let policy = if self.reject_resign {
            ResignPolicy::Reject
        } else {
            ResignPolicy::Overwrite
        };
        SigningConfig::default()
            .with_key_bits(self.key_bits)
            .with_resign_policy(policy)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign a document and store its public key and signature
    Sign {
        file: PathBuf,
        /// Document identifier (defaults to the file name)
        #[arg(long)]
        id: Option<String>,
    },
    /// Verify a document against its stored signature
    Verify {
        file: PathBuf,
        /// Document identifier (defaults to the file name)
        #[arg(long)]
        id: Option<String>,
    },
    /// Show the stored artifact for a document
    Inspect {
        id: String,
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List signed documents
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sign_defaults() {
        let cli = Cli::try_parse_from(["docseal", "sign", "report.pdf"]).unwrap();
        assert_eq!(cli.store.storage_dir, PathBuf::from("./storage"));
        assert_eq!(cli.store.key_bits, 2048);
        assert!(matches!(cli.command, Command::Sign { id: None, .. }));
        assert_eq!(
            cli.store.signing_config().resign_policy,
            ResignPolicy::Overwrite
        );
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docseal",
            "verify",
            "report.pdf",
            "--id",
            "contracts/report.pdf",
            "--storage-dir",
            "/tmp/sigs",
            "--reject-resign",
        ])
        .unwrap();
        assert_eq!(cli.store.storage_dir, PathBuf::from("/tmp/sigs"));
        assert_eq!(cli.store.signing_config().resign_policy, ResignPolicy::Reject);
        match cli.command {
            Command::Verify { id, .. } => assert_eq!(id.as_deref(), Some("contracts/report.pdf")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_inspect_requires_id() {
        assert!(Cli::try_parse_from(["docseal", "inspect"]).is_err());
    }
}
