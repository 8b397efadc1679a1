use super::session::{report, Session};
use crate::output::{new_table, Output};
use crate::ActorCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use medialist_core::{ActorDirectory, MedialistError};
use medialist_models::{Actor, ActorId, Permission};

pub async fn run_actor(cmd: ActorCommands, acting: ActorId, output: &Output) -> Result<()> {
    let session = Session::open().await?;
    let caller = session.actor(acting).await?;

    match cmd {
        ActorCommands::Add { name, permission } => {
            if !caller.has_permission(Permission::ManageUsers) {
                return Err(eyre!(
                    "Actor {} does not have permission to manage users (status 403)",
                    caller.id
                ));
            }
            let name = name.trim();
            if name.is_empty() {
                return Err(report(MedialistError::Validation(
                    "Actor name is required".to_string(),
                )));
            }
            let actor = session.store.insert_actor(name, &permission).await?;
            session.save().await?;

            output.value(&actor);
            output.success(format!("Created actor {} '{}'", actor.id, actor.display_name));
        }
        ActorCommands::Ls => {
            let actors = session.store.list_actors().await?;
            output.value(&actors);
            output.table(actor_table(&actors));
        }
    }
    Ok(())
}

fn actor_table(actors: &[Actor]) -> comfy_table::Table {
    let mut table = new_table(&["Id", "Name", "Permissions"]);
    for actor in actors {
        let permissions: Vec<&str> = actor.permissions.iter().map(|p| p.as_str()).collect();
        table.add_row(vec![
            actor.id.to_string(),
            actor.display_name.clone(),
            permissions.join(", "),
        ]);
    }
    table
}
