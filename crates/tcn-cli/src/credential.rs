//! # Credential Subcommands
//!
//! One registry operation per invocation, against a ledger snapshot file.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::json;

use tcn_core::VerificationStatus;
use tcn_ledger::MemoryLedger;
use tcn_registry::{CredentialService, ListingMode, SingleVerifierPolicy, DEFAULT_VERIFIER_MSPID};

use crate::print_json;

/// Ledger and identity options shared by every credential command.
#[derive(Args, Debug, Clone)]
pub struct LedgerOptions {
    /// Ledger snapshot file. Created on the first write.
    #[arg(long, global = true, default_value = "tcn-ledger.json")]
    pub ledger: PathBuf,

    /// MSP ID of the calling organization.
    #[arg(long, global = true, default_value = DEFAULT_VERIFIER_MSPID)]
    pub org: String,

    /// MSP ID of the organization allowed to approve and revoke.
    #[arg(long, global = true, default_value = DEFAULT_VERIFIER_MSPID)]
    pub verifier_org: String,

    /// Fail listings on records of an unrecognized type instead of
    /// returning their common fields.
    #[arg(long, global = true)]
    pub strict_listing: bool,
}

impl LedgerOptions {
    /// Open the snapshot and build a service acting as `--org`.
    pub fn open_service(&self) -> Result<CredentialService> {
        let ledger = MemoryLedger::open_snapshot(self.org.clone(), &self.ledger)
            .with_context(|| format!("failed to open ledger {}", self.ledger.display()))?;
        let policy = Arc::new(SingleVerifierPolicy::new(self.verifier_org.clone()));
        let listing = if self.strict_listing {
            ListingMode::Strict
        } else {
            ListingMode::Lenient
        };
        Ok(CredentialService::on_ledger(Arc::new(ledger), policy).with_listing_mode(listing))
    }
}

/// Which view `tcn get` decodes.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GetView {
    /// Common fields only; works for every record.
    Base,
    /// Fails unless the record is academic.
    Academic,
    /// Fails unless the record is professional.
    Professional,
}

/// Credential subcommands.
#[derive(Subcommand, Debug)]
pub enum CredentialCommand {
    /// Write the four sample credentials, overwriting records with the same IDs.
    Init,

    /// Issue a new credential in Pending state.
    #[command(subcommand)]
    Create(CreateCommand),

    /// Show one credential.
    Get {
        id: String,
        /// Decode as this view. Defaults to the stored variant.
        #[arg(long = "type", value_enum)]
        view: Option<GetView>,
    },

    /// List credentials in ID order.
    List {
        /// Only credentials about this talent.
        #[arg(long)]
        talent: Option<String>,
    },

    /// Mark a credential verified (verifier organization only).
    Approve {
        id: String,
        /// Name recorded as the verifier. Defaults to `--org` without its MSP suffix.
        #[arg(long)]
        verified_by: Option<String>,
    },

    /// Mark a credential revoked (verifier organization only).
    Revoke {
        id: String,
        /// Name recorded as the verifier. Defaults to `--org` without its MSP suffix.
        #[arg(long)]
        verified_by: Option<String>,
    },

    /// Replace a credential's skills.
    Skills { id: String, skills: String },

    /// Replace the holder's first and last name.
    Name {
        id: String,
        first_name: String,
        last_name: String,
    },

    /// Delete a credential permanently.
    Delete { id: String },
}

/// Variant-specific creation commands.
#[derive(Subcommand, Debug)]
pub enum CreateCommand {
    /// Issue an academic credential.
    Academic {
        id: String,
        talent_id: String,
        first_name: String,
        last_name: String,
        skills: String,
        education: String,
        institution: String,
    },

    /// Issue a professional credential.
    Professional {
        id: String,
        talent_id: String,
        first_name: String,
        last_name: String,
        skills: String,
        work_experience: String,
        company: String,
    },
}

/// Execute a credential subcommand, writing JSON to `out`.
pub fn run_credential(
    command: &CredentialCommand,
    options: &LedgerOptions,
    out: &mut dyn Write,
) -> Result<u8> {
    let service = options.open_service()?;

    match command {
        CredentialCommand::Init => {
            let written = service.init_ledger()?;
            tracing::info!(count = written.len(), "ledger initialized");
            print_json(out, &written)?;
        }

        CredentialCommand::Create(CreateCommand::Academic {
            id,
            talent_id,
            first_name,
            last_name,
            skills,
            education,
            institution,
        }) => {
            let created = service.create_academic(
                id,
                talent_id,
                first_name,
                last_name,
                skills,
                education,
                institution,
            )?;
            print_json(out, &created)?;
        }

        CredentialCommand::Create(CreateCommand::Professional {
            id,
            talent_id,
            first_name,
            last_name,
            skills,
            work_experience,
            company,
        }) => {
            let created = service.create_professional(
                id,
                talent_id,
                first_name,
                last_name,
                skills,
                work_experience,
                company,
            )?;
            print_json(out, &created)?;
        }

        CredentialCommand::Get { id, view } => match view {
            None => print_json(out, &service.get_any(id)?)?,
            Some(GetView::Base) => print_json(out, &service.get_base(id)?)?,
            Some(GetView::Academic) => print_json(out, &service.get_academic(id)?)?,
            Some(GetView::Professional) => print_json(out, &service.get_professional(id)?)?,
        },

        CredentialCommand::List { talent } => {
            let listing = match talent {
                Some(t) => service.list_by_talent(t)?,
                None => service.list_all()?,
            };
            print_json(out, &listing)?;
        }

        CredentialCommand::Approve { id, verified_by } => {
            let updated = set_status(
                &service,
                options,
                id,
                VerificationStatus::Verified,
                verified_by.as_deref(),
            )?;
            print_json(out, &updated)?;
        }

        CredentialCommand::Revoke { id, verified_by } => {
            let updated = set_status(
                &service,
                options,
                id,
                VerificationStatus::Revoked,
                verified_by.as_deref(),
            )?;
            print_json(out, &updated)?;
        }

        CredentialCommand::Skills { id, skills } => {
            print_json(out, &service.update_skills(id, skills)?)?;
        }

        CredentialCommand::Name {
            id,
            first_name,
            last_name,
        } => {
            if first_name.trim().is_empty() && last_name.trim().is_empty() {
                bail!("first and last name must not both be empty");
            }
            print_json(out, &service.update_name(id, first_name, last_name)?)?;
        }

        CredentialCommand::Delete { id } => {
            service.delete(id)?;
            print_json(out, &json!({ "deleted": id }))?;
        }
    }

    Ok(0)
}

fn set_status(
    service: &CredentialService,
    options: &LedgerOptions,
    id: &str,
    status: VerificationStatus,
    verified_by: Option<&str>,
) -> Result<tcn_vc::TalentCredential> {
    let verified_by = verified_by
        .map(str::to_string)
        .unwrap_or_else(|| organization_name(&options.org).to_string());
    let caller = service.caller_identity()?;
    Ok(service.update_verification_status(id, status.as_str(), &verified_by, &caller)?)
}

/// `Org1MSP` → `Org1`.
fn organization_name(msp_id: &str) -> &str {
    msp_id
        .strip_suffix("MSP")
        .filter(|s| !s.is_empty())
        .unwrap_or(msp_id)
}
