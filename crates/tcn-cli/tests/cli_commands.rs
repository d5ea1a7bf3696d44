//! Credential commands run against a snapshot file in a temp directory, the
//! way consecutive `tcn` invocations share state.

use std::path::Path;

use serde_json::Value;
use tcn_cli::credential::{run_credential, CreateCommand, CredentialCommand, GetView, LedgerOptions};

fn options(ledger: &Path, org: &str) -> LedgerOptions {
    LedgerOptions {
        ledger: ledger.to_path_buf(),
        org: org.to_string(),
        verifier_org: "Org1MSP".to_string(),
        strict_listing: false,
    }
}

fn run(command: CredentialCommand, opts: &LedgerOptions) -> anyhow::Result<Value> {
    let mut out = Vec::new();
    run_credential(&command, opts, &mut out)?;
    Ok(serde_json::from_slice(&out).unwrap())
}

fn create_c1() -> CredentialCommand {
    CredentialCommand::Create(CreateCommand::Academic {
        id: "c1".into(),
        talent_id: "t1".into(),
        first_name: "Ann".into(),
        last_name: "Lee".into(),
        skills: "Go".into(),
        education: "BSc CS".into(),
        institution: "X Univ".into(),
    })
}

#[test]
fn state_persists_between_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");
    let org1 = options(&ledger, "Org1MSP");

    let created = run(create_c1(), &org1).unwrap();
    assert_eq!(created["VerificationStatus"], "Pending");
    assert!(ledger.exists());

    let approved = run(
        CredentialCommand::Approve {
            id: "c1".into(),
            verified_by: Some("X Univ".into()),
        },
        &org1,
    )
    .unwrap();
    assert_eq!(approved["VerificationStatus"], "Verified");

    let fetched = run(
        CredentialCommand::Get {
            id: "c1".into(),
            view: Some(GetView::Academic),
        },
        &org1,
    )
    .unwrap();
    assert_eq!(fetched["VerifiedBy"], "X Univ");

    let listed = run(CredentialCommand::List { talent: None }, &org1).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[test]
fn duplicate_create_fails() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir.path().join("ledger.json"), "Org1MSP");
    run(create_c1(), &opts).unwrap();
    let err = run(create_c1(), &opts).unwrap_err();
    assert!(err.to_string().contains("already exists"), "{err}");
}

#[test]
fn approve_by_other_org_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.json");
    run(create_c1(), &options(&ledger, "Org1MSP")).unwrap();

    let err = run(
        CredentialCommand::Approve {
            id: "c1".into(),
            verified_by: None,
        },
        &options(&ledger, "Org2MSP"),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Org2MSP"), "{err}");

    let fetched = run(
        CredentialCommand::Get {
            id: "c1".into(),
            view: None,
        },
        &options(&ledger, "Org1MSP"),
    )
    .unwrap();
    assert_eq!(fetched["VerificationStatus"], "Pending");
}

#[test]
fn approve_defaults_verifier_to_org_name() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir.path().join("ledger.json"), "Org1MSP");
    run(create_c1(), &opts).unwrap();
    let approved = run(
        CredentialCommand::Approve {
            id: "c1".into(),
            verified_by: None,
        },
        &opts,
    )
    .unwrap();
    assert_eq!(approved["VerifiedBy"], "Org1");
}

#[test]
fn init_then_filter_by_talent() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir.path().join("ledger.json"), "Org1MSP");
    let written = run(CredentialCommand::Init, &opts).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 4);

    let charlie = run(
        CredentialCommand::List {
            talent: Some("charliebrown02".into()),
        },
        &opts,
    )
    .unwrap();
    let ids: Vec<&str> = charlie
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["CredentialID"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["credential3", "credential4"]);
}

#[test]
fn update_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir.path().join("ledger.json"), "Org1MSP");
    run(create_c1(), &opts).unwrap();

    let updated = run(
        CredentialCommand::Skills {
            id: "c1".into(),
            skills: "Go, Rust".into(),
        },
        &opts,
    )
    .unwrap();
    assert_eq!(updated["Skills"], "Go, Rust");

    let renamed = run(
        CredentialCommand::Name {
            id: "c1".into(),
            first_name: "Anna".into(),
            last_name: "Li".into(),
        },
        &opts,
    )
    .unwrap();
    assert_eq!(renamed["FirstName"], "Anna");
    assert_eq!(renamed["Skills"], "Go, Rust");

    let deleted = run(CredentialCommand::Delete { id: "c1".into() }, &opts).unwrap();
    assert_eq!(deleted["deleted"], "c1");

    let err = run(
        CredentialCommand::Get {
            id: "c1".into(),
            view: None,
        },
        &opts,
    )
    .unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{err}");
}

#[test]
fn wrong_view_is_type_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir.path().join("ledger.json"), "Org1MSP");
    run(create_c1(), &opts).unwrap();
    let err = run(
        CredentialCommand::Get {
            id: "c1".into(),
            view: Some(GetView::Professional),
        },
        &opts,
    )
    .unwrap_err();
    assert!(err.to_string().contains("not of type"), "{err}");
}
