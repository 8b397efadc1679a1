use super::session::{report, Session};
use crate::output::{detail_table, new_table, or_dash, Output};
use crate::{ListCommands, SortArg};
use color_eyre::Result;
use medialist_core::{
    count_lists, create_list, delete_list, get_list, query_lists, ListFilter, NewListRequest,
};
use medialist_models::{ActorId, Medialist, MedialistItem};
use serde_json::json;

pub async fn run_list(cmd: ListCommands, acting: ActorId, output: &Output) -> Result<()> {
    let session = Session::open().await?;
    let store = session.store.as_ref();

    match cmd {
        ListCommands::Create {
            name,
            overview,
            backdrop_url,
            poster_url,
            source_url,
            source_limit,
            auto_update,
        } => {
            let caller = session.actor(acting).await?;
            let request = NewListRequest {
                name: Some(name),
                overview,
                backdrop_url,
                poster_url,
                source_url,
                source_limit,
                auto_update: Some(auto_update),
            };
            let list = create_list(store, &caller, request, &session.config.lists)
                .await
                .map_err(report)?;
            session.save().await?;

            output.value(&list);
            output.success(format!("Created medialist {} '{}'", list.id, list.name));
            if let (Some(source), Some(source_type)) = (list.source, list.source_type) {
                output.info(format!("  Source: {} ({})", source, source_type));
            }
        }
        ListCommands::Ls {
            filter,
            owner,
            sort,
            take,
            skip,
        } => {
            let caller = session.actor(acting).await?;
            let page = query_lists(
                store,
                &caller,
                ListFilter {
                    filter,
                    created_by: owner,
                    sort_modified: sort == SortArg::Modified,
                    take,
                    skip,
                },
                &session.config.lists,
            )
            .await
            .map_err(report)?;

            output.value(&page);
            output.table(list_table(&page.results));
            output.info(format!(
                "Page {} of {} ({} medialist(s))",
                page.page_info.page,
                page.page_info.pages.max(1),
                page.page_info.results
            ));
        }
        ListCommands::Show { id } => {
            let caller = session.actor(acting).await?;
            let list = get_list(store, &caller, id).await.map_err(report)?;

            output.value(&list);
            output.table(list_detail(&list.list));
            if list.items.is_empty() {
                output.info("No items yet");
            } else {
                output.table(item_table(&list.items));
            }
        }
        ListCommands::Rm { id } => {
            let caller = session.actor(acting).await?;
            let list = delete_list(store, &caller, id).await.map_err(report)?;
            session.save().await?;

            output.value(&json!({ "deleted": list.id }));
            output.success(format!("Deleted medialist {} '{}'", list.id, list.name));
        }
        ListCommands::Count => {
            let total = count_lists(store).await.map_err(report)?;
            output.value(&json!({ "total": total }));
            output.info(format!("{} medialist(s)", total));
        }
    }
    Ok(())
}

fn list_table(lists: &[Medialist]) -> comfy_table::Table {
    let mut table = new_table(&["Id", "Name", "Owner", "Source", "Auto update", "Created"]);
    for list in lists {
        table.add_row(vec![
            list.id.to_string(),
            list.name.clone(),
            list.created_by.to_string(),
            or_dash(list.source_type),
            if list.auto_update { "yes" } else { "no" }.to_string(),
            list.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    table
}

fn list_detail(list: &Medialist) -> comfy_table::Table {
    detail_table(
        &list.name,
        vec![
            ("Id", list.id.to_string()),
            ("Owner", list.created_by.to_string()),
            ("Overview", or_dash(list.overview.as_deref())),
            ("Source", or_dash(list.source)),
            ("Source type", or_dash(list.source_type)),
            ("Source URL", or_dash(list.source_url.as_deref())),
            ("Source limit", or_dash(list.source_limit)),
            ("Auto update", list.auto_update.to_string()),
            ("Updated", list.updated_at.to_rfc3339()),
        ],
    )
}

pub fn item_table(items: &[MedialistItem]) -> comfy_table::Table {
    let mut table = new_table(&[
        "Id", "Name", "Year", "Type", "TMDB", "TVDB", "IMDb", "Media", "Added by",
    ]);
    for item in items {
        table.add_row(vec![
            item.id.to_string(),
            or_dash(item.name.as_deref()),
            or_dash(item.year),
            or_dash(item.media_type),
            or_dash(item.tmdb_id),
            or_dash(item.tvdb_id),
            or_dash(item.imdb_id.as_deref()),
            or_dash(item.media_id),
            or_dash(item.added_by),
        ]);
    }
    table
}
