//! Sample credentials written by `init_ledger`.

use tcn_core::{CredentialId, TalentId, ValidationError, VerificationStatus};
use tcn_vc::{AcademicCredential, Credential, ProfessionalCredential, TalentCredential};

/// The four bootstrap credentials of the sample network: two academic, two
/// professional, two of them already verified.
pub fn sample_credentials() -> Result<Vec<TalentCredential>, ValidationError> {
    let mut alice = AcademicCredential::new(
        CredentialId::new("credential1")?,
        TalentId::new("alicesmith01")?,
        "Alice",
        "Smith",
        "Python, Data Analysis",
        "B.Sc. in Computer Science",
        "Concordia University",
    );
    alice.set_verification(VerificationStatus::Verified, "Concordia University");

    let mut bob = ProfessionalCredential::new(
        CredentialId::new("credential2")?,
        TalentId::new("bobjohnson01")?,
        "Bob",
        "Johnson",
        "Project Management, Leadership",
        "5 years as Project Manager",
        "Company ABCDEF",
    );
    bob.set_verification(VerificationStatus::Verified, "Company ABCDEF");

    let charlie_academic = AcademicCredential::new(
        CredentialId::new("credential3")?,
        TalentId::new("charliebrown02")?,
        "Charlie",
        "Brown",
        "Java, Software Engineering",
        "M.Sc. in Software Engineering",
        "Polytechnique Montréal",
    );

    let charlie_professional = ProfessionalCredential::new(
        CredentialId::new("credential4")?,
        TalentId::new("charliebrown02")?,
        "Charlie",
        "Brown",
        "C, C++, Python, Shell",
        "4-Month Internship as a Software Developer",
        "Company XYZ",
    );

    Ok(vec![
        alice.into(),
        bob.into(),
        charlie_academic.into(),
        charlie_professional.into(),
    ])
}
