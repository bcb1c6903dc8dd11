//! Set the developer account's password.

use crate::action::{Action, Disposition, StepContext};
use crate::command::Cmd;
use crate::error::Result;
use crate::password::Issued;
use crate::paths;

/// Applies the configured [`crate::password::PasswordPolicy`].
///
/// A generated passphrase is written to `los.password` in the working root
/// (mode 0600) before `chpasswd` runs, so a crash between the two never
/// leaves the account with a password nobody knows. The passphrase itself
/// is never broadcast or logged.
#[derive(Debug, Clone, Default)]
pub struct SetPassword;

impl Action for SetPassword {
    fn description(&self) -> &str {
        "Set the password"
    }

    fn execute(&self, ctx: &mut StepContext<'_>) -> Result<Disposition> {
        let account = ctx.config.account.as_str();
        let issued = ctx.config.password.issue(&mut rand::thread_rng())?;
        let Some(issued) = issued else {
            tracing::info!(account, "password left unchanged");
            return Ok(Disposition::Continue);
        };

        if let Issued::Generated(secret) = &issued {
            let path = paths::password_path(ctx.root);
            ctx.host
                .write_file(&path, format!("{secret}\n").as_bytes(), Some(0o600))?;
            ctx.host.broadcast(&format!(
                "The password for {account} has been saved to {}.",
                path.display()
            ))?;
        }

        ctx.host.run(
            &Cmd::new("chpasswd").stdin(format!("{account}:{}", issued.secret())),
        )?;
        Ok(Disposition::Continue)
    }
}
