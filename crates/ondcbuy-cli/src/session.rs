//! Session inspection and reset.

use clap::Subcommand;

use crate::App;

/// Sub-commands available under `session`.
#[derive(Debug, Subcommand)]
pub enum SessionCommands {
    /// Show the current transaction and signed-in user
    Show,
    /// Start a new transaction
    Reset {
        /// Also forget the stored token and profile
        #[arg(long)]
        sign_out: bool,
    },
}

pub(crate) fn run(app: &App, command: SessionCommands) -> anyhow::Result<()> {
    let session = app.session();
    let profile = app.profile();
    match command {
        SessionCommands::Show => {
            match session.current_transaction_id()? {
                Some(txn) => println!("transaction {txn}"),
                None => println!("no transaction started"),
            }
            match profile.profile()? {
                Some(user) => println!("signed in as {} <{}>", user.name, user.email),
                None => println!("not registered"),
            }
        }
        SessionCommands::Reset { sign_out } => {
            let txn = session.start_new_transaction()?;
            println!("new transaction {txn}");
            if sign_out {
                profile.sign_out()?;
                println!("signed out");
            }
        }
    }
    Ok(())
}
