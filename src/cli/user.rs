//! User commands

use clap::Subcommand;

use crate::infrastructure::user::CreateUserRequest;
use crate::state::AccessContext;

use super::print_json;

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a user
    Create {
        username: String,
        /// Password for interactive login
        #[arg(long)]
        password: Option<String>,
        /// Grant administrator rights
        #[arg(long)]
        admin: bool,
    },

    /// List users
    List,
}

pub async fn run(context: &AccessContext, command: UserCommand) -> anyhow::Result<()> {
    match command {
        UserCommand::Create {
            username,
            password,
            admin,
        } => {
            let user = context
                .users
                .create(CreateUserRequest {
                    username,
                    password,
                    admin,
                })
                .await?;
            print_json(&user)
        }
        UserCommand::List => print_json(&context.users.list().await?),
    }
}
