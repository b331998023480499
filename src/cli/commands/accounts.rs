use clap::Subcommand;

use crate::auth::normalize_email;
use crate::cli::utils::{output_rows, output_success};
use crate::cli::CliContext;

#[derive(Subcommand)]
pub enum AccountCommands {
    #[command(about = "List accounts with their roles")]
    List,

    #[command(about = "Elevate an account to instructor (idempotent)")]
    Promote {
        #[arg(help = "Account email")]
        email: String,
    },
}

pub async fn handle(ctx: &CliContext, cmd: AccountCommands) -> anyhow::Result<()> {
    match cmd {
        AccountCommands::List => {
            let accounts = ctx.stores.accounts.list_accounts().await?;
            output_rows(ctx.output, &accounts, "No accounts", |a| {
                format!("{:<36} {:<32} {}", a.id, a.email, a.role)
            })
        }
        AccountCommands::Promote { email } => {
            let email = normalize_email(&email)?;
            let account = ctx
                .stores
                .accounts
                .find_account_by_email(&email)
                .await?
                .ok_or_else(|| anyhow::anyhow!("No account with email {}", email))?;

            let account = ctx.stores.accounts.elevate_to_instructor(account.id).await?;
            ctx.stores.directory.ensure_instructor(account.id).await?;

            output_success(
                ctx.output,
                &format!("{} is now an instructor", account.email),
                Some(serde_json::to_value(&account)?),
            )
        }
    }
}
