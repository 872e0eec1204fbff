//! Team commands, run on behalf of a user

use clap::{Args, Subcommand};

use crate::domain::auth::Principal;
use crate::domain::team::{TeamId, TeamRole};
use crate::infrastructure::team::CreateTeamRequest;
use crate::state::AccessContext;

use super::{print_json, require_user};

#[derive(Args)]
pub struct Actor {
    /// Act as this user
    #[arg(long = "as", value_name = "USERNAME")]
    pub username: String,
}

#[derive(Subcommand)]
pub enum TeamCommand {
    /// Create a team
    Create {
        #[command(flatten)]
        actor: Actor,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Owner username, defaults to the acting user
        #[arg(long)]
        owner: Option<String>,
    },

    /// List visible teams
    List {
        #[command(flatten)]
        actor: Actor,
    },

    /// Show one team
    Show {
        #[command(flatten)]
        actor: Actor,
        id: TeamId,
    },

    /// List team members
    Members {
        #[command(flatten)]
        actor: Actor,
        id: TeamId,
    },

    /// Add a member to a team
    AddMember {
        #[command(flatten)]
        actor: Actor,
        id: TeamId,
        username: String,
        #[arg(long, default_value = "viewer")]
        role: TeamRole,
    },

    /// Remove a member from a team
    RemoveMember {
        #[command(flatten)]
        actor: Actor,
        id: TeamId,
        username: String,
    },

    /// List namespaces owned by a team
    Namespaces {
        #[command(flatten)]
        actor: Actor,
        id: TeamId,
    },
}

pub async fn run(context: &AccessContext, command: TeamCommand) -> anyhow::Result<()> {
    match command {
        TeamCommand::Create {
            actor,
            name,
            description,
            owner,
        } => {
            let principal = resolve(context, &actor).await?;
            let owner_id = match owner {
                Some(username) => Some(require_user(context, &username).await?.id()),
                None => None,
            };

            let team = context
                .teams
                .create_team(
                    &principal,
                    CreateTeamRequest {
                        name,
                        description,
                        owner_id,
                    },
                )
                .await?;
            print_json(&team)
        }
        TeamCommand::List { actor } => {
            let principal = resolve(context, &actor).await?;
            print_json(&context.teams.list_teams(&principal).await?)
        }
        TeamCommand::Show { actor, id } => {
            let principal = resolve(context, &actor).await?;
            print_json(&context.teams.get_team(&principal, id).await?)
        }
        TeamCommand::Members { actor, id } => {
            let principal = resolve(context, &actor).await?;
            print_json(&context.teams.list_members(&principal, id).await?)
        }
        TeamCommand::AddMember {
            actor,
            id,
            username,
            role,
        } => {
            let principal = resolve(context, &actor).await?;
            let member = require_user(context, &username).await?;
            let membership = context
                .teams
                .add_member(&principal, id, member.id(), role)
                .await?;
            print_json(&membership)
        }
        TeamCommand::RemoveMember { actor, id, username } => {
            let principal = resolve(context, &actor).await?;
            let member = require_user(context, &username).await?;
            context.teams.remove_member(&principal, id, member.id()).await?;
            println!("Removed '{}' from team {}", username, id);
            Ok(())
        }
        TeamCommand::Namespaces { actor, id } => {
            let principal = resolve(context, &actor).await?;
            print_json(&context.teams.list_namespaces(&principal, id).await?)
        }
    }
}

async fn resolve(context: &AccessContext, actor: &Actor) -> anyhow::Result<Principal> {
    Ok(context.sessions.impersonate(&actor.username).await?)
}
