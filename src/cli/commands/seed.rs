use std::path::PathBuf;

use crate::cli::utils::output_success;
use crate::cli::CliContext;
use crate::fixtures::Fixture;

pub async fn handle(ctx: &CliContext, path: PathBuf) -> anyhow::Result<()> {
    let fixture = Fixture::from_path(&path)?;
    let report = fixture.seed(&ctx.stores, &ctx.limits()).await?;
    output_success(
        ctx.output,
        &format!(
            "Seeded {} instructors and {} reviews from {} ({} new accounts)",
            report.instructors,
            report.reviews,
            path.display(),
            report.accounts_created
        ),
        Some(serde_json::to_value(&report)?),
    )
}
