//! `kubechat admin ...` commands.

use kubechat_api::{
    BackendClient, ManagedResource, NewApiKey, NewKubeconfig, NewUser, UserRole,
};

use crate::cli::{AdminCommand, ApiKeyAction, KubeconfigAction, ResourceAction, UserAction};
use crate::context::AppContext;
use crate::error::CliError;
use crate::input::Input;
use crate::render;

pub async fn run(ctx: &AppContext, input: &mut Input, command: AdminCommand) -> Result<(), CliError> {
    ctx.sign_in_admin(input).await?;
    let client = ctx.client.as_ref();

    match command {
        AdminCommand::Users { action } => users(client, input, action).await,
        AdminCommand::Logs { limit, user } => {
            let logs = client.activity_logs(limit, user).await?;
            print!("{}", render::activity(&logs));
            Ok(())
        }
        AdminCommand::Kubeconfigs { action } => kubeconfigs(client, action).await,
        AdminCommand::ApiKeys { action } => api_keys(client, input, action).await,
    }
}

async fn users(client: &BackendClient, input: &mut Input, action: UserAction) -> Result<(), CliError> {
    match action {
        UserAction::List => print!("{}", render::users(&client.list_users().await?)),
        UserAction::Create {
            username,
            email,
            admin,
        } => {
            let password = input.required("Password for the new account: ").await?;
            let role = if admin { UserRole::Admin } else { UserRole::User };
            let user = client
                .create_user(&NewUser {
                    username,
                    email,
                    password,
                    role,
                })
                .await?;
            println!("Created user {} (id {})", user.username, user.id);
        }
        UserAction::Ban { id } => {
            client.ban_user(id).await?;
            println!("User {id} banned.");
        }
        UserAction::Unban { id } => {
            client.unban_user(id).await?;
            println!("User {id} unbanned.");
        }
    }
    Ok(())
}

async fn kubeconfigs(client: &BackendClient, action: KubeconfigAction) -> Result<(), CliError> {
    match action {
        KubeconfigAction::List => print!("{}", render::kubeconfigs(&client.list_kubeconfigs().await?)),
        KubeconfigAction::Add {
            name,
            file,
            description,
        } => {
            let content = tokio::fs::read_to_string(&file).await?;
            let stored = client
                .create_kubeconfig(&NewKubeconfig {
                    name,
                    description,
                    content,
                })
                .await?;
            println!("Stored kubeconfig {} (id {})", stored.name, stored.id);
        }
        KubeconfigAction::Update {
            id,
            name,
            file,
            description,
        } => {
            let content = tokio::fs::read_to_string(&file).await?;
            client
                .update_kubeconfig(
                    id,
                    &NewKubeconfig {
                        name,
                        description,
                        content,
                    },
                )
                .await?;
            println!("Kubeconfig {id} updated.");
        }
        KubeconfigAction::Common(action) => {
            resource_action(client, ManagedResource::Kubeconfigs, action).await?
        }
    }
    Ok(())
}

async fn api_keys(client: &BackendClient, input: &mut Input, action: ApiKeyAction) -> Result<(), CliError> {
    match action {
        ApiKeyAction::List => print!("{}", render::api_keys(&client.list_api_keys().await?)),
        ApiKeyAction::Add { name, provider } => {
            let key = input.required("API key: ").await?;
            let stored = client
                .create_api_key(&NewApiKey {
                    name,
                    provider,
                    key,
                })
                .await?;
            println!("Stored API key {} (id {})", stored.name, stored.id);
        }
        ApiKeyAction::Update { id, name, provider } => {
            let key = input.required("API key: ").await?;
            client
                .update_api_key(id, &NewApiKey { name, provider, key })
                .await?;
            println!("API key {id} updated.");
        }
        ApiKeyAction::Common(action) => {
            resource_action(client, ManagedResource::ApiKeys, action).await?
        }
    }
    Ok(())
}

async fn resource_action(
    client: &BackendClient,
    kind: ManagedResource,
    action: ResourceAction,
) -> Result<(), CliError> {
    match action {
        ResourceAction::Delete { id } => {
            client.delete_resource(kind, id).await?;
            println!("Deleted {} {id}.", kind.path());
        }
        ResourceAction::Activate { id } => {
            client.activate_resource(kind, id).await?;
            println!("Activated {} {id}.", kind.path());
        }
        ResourceAction::Test { id } => {
            let result = client.test_resource(kind, id).await?;
            let verdict = if result.success { "ok" } else { "failed" };
            match result.message {
                Some(message) => println!("{verdict}: {message}"),
                None => println!("{verdict}"),
            }
        }
    }
    Ok(())
}
