//! Application token commands

use clap::Subcommand;
use serde_json::json;

use crate::domain::application_token::ApplicationTokenId;
use crate::state::AccessContext;

use super::{print_json, require_user};

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Create a token; the secret is printed once
    Issue {
        #[arg(long)]
        user: String,
        #[arg(long)]
        application: String,
        /// Use this secret instead of generating one
        #[arg(long)]
        secret: Option<String>,
    },

    /// List a user's tokens
    List {
        #[arg(long)]
        user: String,
    },

    /// Delete a token owned by the user
    Delete {
        #[arg(long)]
        user: String,
        id: i64,
    },

    /// Authenticate a `<username>:<application>:<secret>` header value
    Verify { header: String },
}

pub async fn run(context: &AccessContext, command: TokenCommand) -> anyhow::Result<()> {
    match command {
        TokenCommand::Issue {
            user,
            application,
            secret,
        } => {
            let owner = require_user(context, &user).await?;

            let (token, secret) = match secret {
                Some(secret) => {
                    let token = context.tokens.create(owner.id(), &application, &secret).await?;
                    (token, secret)
                }
                None => {
                    let issued = context.tokens.issue(owner.id(), &application).await?;
                    (issued.token, issued.secret)
                }
            };

            print_json(&json!({
                "token": token,
                "header": context.authenticator.header_name(),
                "value": format!("{}:{}:{}", owner.username(), token.application(), secret),
            }))
        }
        TokenCommand::List { user } => {
            let owner = require_user(context, &user).await?;
            print_json(&context.tokens.list_for_user(owner.id()).await?)
        }
        TokenCommand::Delete { user, id } => {
            let owner = require_user(context, &user).await?;
            let deleted = context
                .tokens
                .delete(ApplicationTokenId::new(id), owner.id())
                .await?;
            print_json(&deleted)
        }
        TokenCommand::Verify { header } => {
            let principal = context.authenticator.authenticate(&header).await?;
            print_json(&principal)
        }
    }
}
