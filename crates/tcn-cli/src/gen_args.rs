//! # Bulk Argument Generation
//!
//! `tcn gen-args` writes a JSON array of academic creation arguments, one
//! row per synthetic talent: `[talentId, firstName, lastName, skills,
//! education, institution]`. Load generators feed these rows to
//! `create academic` with their own credential IDs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

const SKILLS: &[&str] = &[
    "Python",
    "Java",
    "Go",
    "Rust",
    "C++",
    "Kubernetes",
    "React",
    "ML",
    "Data Science",
];
const DEGREES: &[&str] = &["B.Sc.", "M.Sc.", "PhD"];
const SCHOOLS: &[&str] = &[
    "Concordia University",
    "McGill",
    "Université de Montréal",
    "Polytechnique",
];

/// Arguments for `tcn gen-args`.
#[derive(Args, Debug)]
pub struct GenArgsArgs {
    /// Number of rows.
    #[arg(long, default_value_t = 500)]
    pub count: usize,

    /// Output file.
    #[arg(long, default_value = "args.json")]
    pub out: PathBuf,
}

/// One row of creation arguments. Serializes as a JSON array.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArgsRow(
    pub String,
    pub String,
    pub String,
    pub String,
    pub String,
    pub String,
);

impl ArgsRow {
    pub fn talent_id(&self) -> &str {
        &self.0
    }

    pub fn skills(&self) -> &str {
        &self.3
    }
}

/// Build `count` rows. Row `i` has talent `talent{i:04}`, name `User{i}
/// Test{i}`, two to five distinct skills, and a random degree and school.
pub fn generate_rows(count: usize, rng: &mut impl Rng) -> Vec<ArgsRow> {
    (0..count)
        .map(|i| {
            let n = rng.gen_range(2..=5);
            let skills: Vec<&str> = SKILLS.choose_multiple(rng, n).copied().collect();
            let degree = DEGREES.choose(rng).copied().unwrap_or(DEGREES[0]);
            let school = SCHOOLS.choose(rng).copied().unwrap_or(SCHOOLS[0]);
            ArgsRow(
                format!("talent{i:04}"),
                format!("User{i}"),
                format!("Test{i}"),
                skills.join(", "),
                degree.to_string(),
                school.to_string(),
            )
        })
        .collect()
}

fn write_rows(path: &Path, rows: &[ArgsRow]) -> Result<()> {
    let rendered = serde_json::to_string_pretty(rows).context("failed to render rows")?;
    std::fs::write(path, rendered)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Execute `tcn gen-args`.
pub fn run_gen_args(args: &GenArgsArgs) -> Result<u8> {
    if args.count == 0 {
        bail!("--count must be at least 1");
    }
    let rows = generate_rows(args.count, &mut rand::thread_rng());
    write_rows(&args.out, &rows)?;
    tracing::info!(count = rows.len(), path = %args.out.display(), "generated creation arguments");
    println!("Generated {} with {} entries", args.out.display(), rows.len());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rows_follow_the_naming_scheme() {
        let rows = generate_rows(12, &mut StdRng::seed_from_u64(7));
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].talent_id(), "talent0000");
        assert_eq!(rows[11].talent_id(), "talent0011");
        assert_eq!(rows[11].1, "User11");
        assert_eq!(rows[11].2, "Test11");
    }

    #[test]
    fn skills_are_two_to_five_distinct_known_values() {
        for row in generate_rows(200, &mut StdRng::seed_from_u64(1)) {
            let skills: Vec<&str> = row.skills().split(", ").collect();
            assert!((2..=5).contains(&skills.len()), "{skills:?}");
            let mut unique = skills.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), skills.len());
            assert!(skills.iter().all(|s| SKILLS.contains(s)));
            assert!(DEGREES.contains(&row.4.as_str()));
            assert!(SCHOOLS.contains(&row.5.as_str()));
        }
    }

    #[test]
    fn row_serializes_as_array() {
        let row = ArgsRow(
            "talent0000".into(),
            "User0".into(),
            "Test0".into(),
            "Go, Rust".into(),
            "PhD".into(),
            "McGill".into(),
        );
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"["talent0000","User0","Test0","Go, Rust","PhD","McGill"]"#
        );
    }

    #[test]
    fn zero_count_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = GenArgsArgs {
            count: 0,
            out: dir.path().join("args.json"),
        };
        assert!(run_gen_args(&args).is_err());
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("args.json");
        let args = GenArgsArgs {
            count: 3,
            out: out.clone(),
        };
        assert_eq!(run_gen_args(&args).unwrap(), 0);
        let parsed: Vec<Vec<String>> =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(parsed.len(), 3);
        assert!(parsed.iter().all(|row| row.len() == 6));
    }
}
