use std::io::Write;

use engine::{
    Currency, Gateway,
    diagnostics::{self, CheckStatus},
};

use crate::error::Result;

/// Runs the backend checks and prints one line per check.
/// Returns whether every check passed.
pub async fn run<G: Gateway, W: Write>(gateway: &G, currency: Currency, out: &mut W) -> Result<bool> {
    let checks = diagnostics::run_checks(gateway, currency).await;

    for check in &checks {
        match &check.status {
            CheckStatus::Success(detail) => writeln!(out, "✓ {}: {detail}", check.name)?,
            CheckStatus::Failed(message) => writeln!(out, "✗ {}: {message}", check.name)?,
        }
    }

    let passed = checks.iter().filter(|p| p.passed()).count();
    writeln!(out, "{passed}/{} checks passed", checks.len())?;
    Ok(passed == checks.len())
}
