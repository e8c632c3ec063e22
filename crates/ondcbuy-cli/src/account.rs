//! Account registration.

use clap::Args;
use ondcbuy_core::RegistrationForm;

use crate::App;

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// Ten-digit mobile number, optionally prefixed with +91
    #[arg(long)]
    pub phone: String,
    /// Account password (at least 8 characters)
    #[arg(long, env = "ONDCBUY_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub address: Option<String>,
}

impl std::fmt::Debug for RegisterArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterArgs")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"[redacted]")
            .field("address", &self.address)
            .finish()
    }
}

impl From<RegisterArgs> for RegistrationForm {
    fn from(args: RegisterArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            phone: args.phone,
            password: args.password,
            address: args.address,
        }
    }
}

pub(crate) async fn run_register(app: &App, args: RegisterArgs) -> anyhow::Result<()> {
    let form = RegistrationForm::from(args);
    let response = app.client()?.register(&form).await?;
    app.profile().save_registration(&response)?;
    tracing::info!(user_id = %response.user.id, "registration stored");
    println!(
        "registered {} <{}>",
        response.user.name, response.user.email
    );
    Ok(())
}
