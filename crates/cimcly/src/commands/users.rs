//! Local user account commands.

use cimcly_core::{AccountStatus, ManagedObject, UserPrivilege, UserRequest};

use crate::cli::{UserArgs, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, View, apply, query, util};

const USER_COLUMNS: &[&str] = &["id", "name", "priv", "accountStatus"];

fn user_request(args: UserArgs) -> Result<UserRequest, CliError> {
    let privilege: UserPrivilege = util::device_value(&args.privilege)?;
    let account_status: AccountStatus = util::device_value(&args.status)?;
    let password = util::password_or_prompt(args.password, &format!("Password for {}", args.name))?;
    Ok(UserRequest {
        name: args.name,
        password,
        privilege,
        account_status,
    })
}

pub async fn handle(ctx: &Context, args: UsersArgs) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let view = View {
                table: |_, users: &[ManagedObject]| output::objects_table(users, USER_COLUMNS),
                plain: |_, users: &[ManagedObject]| {
                    users
                        .iter()
                        .map(|u| u.get_or_empty("name"))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            };
            query(ctx, &view, async |server| server.users().await).await
        }

        UsersCommand::Create(args) => {
            let request = user_request(args)?;
            apply(ctx, &format!("user {} created", request.name), async |server| {
                server.create_user(&request).await
            })
            .await
        }

        UsersCommand::Update(args) => {
            let request = user_request(args)?;
            apply(ctx, &format!("user {} updated", request.name), async |server| {
                server.update_user(&request).await
            })
            .await
        }

        UsersCommand::SetPassword { name, password } => {
            let password = util::password_or_prompt(password, &format!("New password for {name}"))?;
            apply(ctx, &format!("password changed for {name}"), async |server| {
                server.set_password(&name, &password).await
            })
            .await
        }
    }
}
