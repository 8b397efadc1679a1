use crate::output::{detail_table, or_dash, Output};
use color_eyre::Result;
use medialist_core::classify;
use serde_json::json;

pub fn run_classify(url: &str, output: &Output) -> Result<()> {
    let Some(info) = classify(url) else {
        output.warn(format!("Unrecognized source: {}", url));
        output.value(&json!({ "url": url, "source": null }));
        return Ok(());
    };

    output.value(&info);
    output.table(detail_table(
        "Source URL",
        vec![
            ("Source", info.source.to_string()),
            ("Type", info.source_type.to_string()),
            ("Media type", or_dash(info.media_type)),
            ("Base URL", or_dash(info.base_url.as_deref())),
            ("Path", or_dash(info.url_path.as_deref())),
            ("List id", or_dash(info.list_id.as_deref())),
            ("Username", or_dash(info.username.as_deref())),
            ("Params", or_dash(info.params.as_deref())),
            ("Timeframe", or_dash(info.timeframe.as_deref())),
        ],
    ));
    Ok(())
}
