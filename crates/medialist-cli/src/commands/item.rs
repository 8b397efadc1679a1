use super::list::item_table;
use super::session::{report, Session};
use crate::output::Output;
use crate::ItemCommands;
use color_eyre::Result;
use medialist_core::{add_item_to_list, MedialistRepository};
use medialist_models::{ActorId, ItemDescriptor};

pub async fn run_item(cmd: ItemCommands, acting: ActorId, output: &Output) -> Result<()> {
    let session = Session::open().await?;

    match cmd {
        ItemCommands::Add {
            list_id,
            name,
            year,
            media_type,
            tmdb,
            tvdb,
            imdb,
            season,
            episode,
            user,
        } => {
            let caller = session.actor(acting).await?;
            let ctx = session.reconcile_context()?;
            let descriptor = ItemDescriptor {
                name,
                year,
                media_type,
                tmdb_id: tmdb,
                tvdb_id: tvdb,
                imdb_id: imdb,
                season,
                episode,
                user_id: user,
            };

            let result = add_item_to_list(&ctx, list_id, &descriptor, &caller).await;
            // A media record may have been created even when the item insert failed
            session.save().await?;
            let list = result.map_err(report)?;

            let items = session.store.items_for_list(list.id).await?;
            output.value(&items.last());
            output.success(format!("Added item to medialist {} '{}'", list.id, list.name));
            if let Some(item) = items.last() {
                output.table(item_table(std::slice::from_ref(item)));
            }
        }
    }
    Ok(())
}
