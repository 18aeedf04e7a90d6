mod args;
mod error;
mod text;

use std::fs::File;
use std::time::Instant;

use simplelog::Config;
use simplelog::WriteLogger;
use vgrid_lib::Grid;
use vgrid_lib::GridConfig;
use vgrid_lib::filter;
use vgrid_lib::filter::AllowSet;
use vgrid_lib::filter::EMPTY_LABEL;
use vgrid_lib::model::records_from_json;
use vgrid_lib::pagination::ScrollEvent;
use vgrid_lib::source::DataSource;

use crate::args::Args;
use crate::args::FilterArg;
use crate::error::CliError;
use crate::text::TextDisplay;

#[tokio::main]
async fn main() {
    if let Err(e) = run(std::env::args().skip(1)).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(raw: impl Iterator<Item = String>) -> Result<(), CliError> {
    let args = Args::parse(raw)?;

    let log_file = File::create("vgrid.log")?;
    WriteLogger::init(args.log_level, Config::default(), log_file)?;

    let text = tokio::fs::read_to_string(&args.path).await?;
    let records = records_from_json(&text).map_err(vgrid_lib::GridError::from)?;
    log::info!("loaded {} records from {}", records.len(), args.path.display());

    let mut config = GridConfig::default();
    if let Some(height) = args.height {
        config = config.with_viewport_height(height);
    }
    let glyph_width = config.average_glyph_width;
    let mut grid = Grid::builder(TextDisplay::new(args.width, glyph_width))
        .config(config)
        .build_from(DataSource::ready(records))
        .await?;

    for filter_arg in &args.filters {
        let allowed = allow_set(&grid, filter_arg);
        grid.set_column_filter(&filter_arg.key, allowed)?;
    }
    if let Some(term) = &args.search {
        grid.search(term)?;
    }
    if let Some(spec) = args.sort.clone() {
        grid.sort_by(Some(spec))?;
    }
    if args.scroll > 0 {
        let content = grid.content_height();
        let top = args.scroll.min(content.saturating_sub(grid.config().viewport_height));
        let event = ScrollEvent::new(top, content + grid.config().bottom_slack);
        grid.on_scroll(event, Instant::now())?;
    }

    println!("{}", grid.display().render());
    println!(
        "\n{} rows drawn, {} in view, {} loaded; scrolled to {}px of {}px",
        grid.display().row_count(),
        grid.rows().len(),
        grid.original_records().len(),
        grid.scroll_top(),
        grid.display().content_height(),
    );

    if let Some(path) = &args.export {
        grid.export();
        if let Some(export) = grid.display_mut().take_export() {
            tokio::fs::write(path, export.content).await?;
            log::info!("wrote {} to {}", export.file_name, path.display());
            println!("exported to {}", path.display());
        }
    }
    Ok(())
}

/// Distinct values of the filtered column whose display text is listed.
/// `(Empty)` or an empty entry selects null and blank values.
fn allow_set(grid: &Grid<TextDisplay>, filter_arg: &FilterArg) -> AllowSet {
    filter::unique_values(grid.original_records(), &filter_arg.key)
        .into_iter()
        .filter(|value| {
            filter_arg.values.iter().any(|wanted| {
                if value.is_blank() {
                    wanted.is_empty() || wanted == EMPTY_LABEL
                } else {
                    value.to_string() == *wanted
                }
            })
        })
        .collect()
}
