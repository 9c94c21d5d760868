mod args;
mod paths;
mod render;

use std::fs::{self, File};
use std::process::ExitCode;

use clap::Parser;
use datagrid::persist::ViewStateStore;
use datagrid::{DataTable, SortState, TableConfig};
use log::{info, warn};
use prospect_lib::{Origin, SqliteBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::args::Cli;

type BoxError = Box<dyn std::error::Error>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to `<cache dir>/latest.log`, rotating the previous run's log.
/// Logging is skipped when no cache dir is available.
fn init_logging(verbose: bool) {
    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent()
        && fs::create_dir_all(dir).is_err()
    {
        return;
    }
    paths::rotate_logs();

    let Ok(file) = File::create(&path) else { return };
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = WriteLogger::init(level, Config::default(), file);
}

async fn run(cli: Cli) -> Result<ExitCode, BoxError> {
    let store = if cli.no_persist {
        None
    } else {
        open_store().await
    };

    if cli.saved {
        let Some(store) = &store else {
            return Err("no settings database available".into());
        };
        for id in store.table_ids().await? {
            println!("{id}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = table_config(&cli)?;
    let mut table = DataTable::new(cli.dataset.columns(), config);
    if let Some(store) = store {
        table = table.with_store(store);
    }

    if cli.clear {
        table.clear_all().await;
        println!("Cleared saved filters and sorting for {}", cli.dataset);
        return Ok(ExitCode::SUCCESS);
    }

    if table.restore().await {
        info!("Restored saved view state for {}", cli.dataset);
    }

    let origin = match (&cli.url, &cli.file) {
        (Some(url), _) => Origin::http(url, cli.token.clone())?,
        (None, Some(file)) => Origin::File(file.clone()),
        (None, None) => return Err("either --url or --file is required".into()),
    };

    // The error state is rendered below.
    let loaded = cli.dataset.load(&mut table, &origin).await;
    if let Ok(count) = loaded {
        info!("Loaded {count} {} rows", cli.dataset);
    }

    apply_flags(&mut table, &cli);
    table.flush().await;

    print!("{}", render::render(&table));
    Ok(if loaded.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn open_store() -> Option<ViewStateStore> {
    let path = paths::settings_db()?;
    if let Some(dir) = path.parent()
        && let Err(e) = fs::create_dir_all(dir)
    {
        warn!("Cannot create {}: {e}", dir.display());
        return None;
    }
    match SqliteBackend::open(&path).await {
        Ok(backend) => Some(ViewStateStore::new(backend)),
        Err(e) => {
            warn!("Cannot open settings database {}: {e}", path.display());
            None
        }
    }
}

/// Dataset defaults, then the JSON config file (explicit or from the
/// config dir), then flags.
fn table_config(cli: &Cli) -> Result<TableConfig, BoxError> {
    let explicit = cli.config.clone();
    let implicit = paths::table_config(cli.dataset.name()).filter(|path| path.exists());

    let mut config = match explicit.or(implicit) {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            let mut config: TableConfig = serde_json::from_str(&text)
                .map_err(|e| format!("invalid table config {}: {e}", path.display()))?;
            if config.table_id.is_none() {
                config.table_id = Some(cli.dataset.name().to_string());
            }
            config
        }
        None => cli.dataset.config(),
    };

    if let Some(table_id) = &cli.table_id {
        config = config.with_table_id(table_id.clone());
    }
    if cli.no_persist {
        config = config.with_persistent_filters(false);
    }
    if let Some(page_size) = cli.page_size {
        config = config.with_pagination(page_size);
        if !config.page_size_options.contains(&page_size) {
            config.page_size_options.push(page_size);
            config.page_size_options.sort_unstable();
        }
    }
    if let Some(density) = cli.density {
        config = config.with_density(density);
    }
    Ok(config)
}

/// Flags override the restored view state.
fn apply_flags(table: &mut DataTable, cli: &Cli) {
    if let Some(term) = &cli.search {
        table.set_global_filter(term.as_str());
    }
    for (column, value) in &cli.filters {
        match value {
            Some(value) => table.set_column_filter(column, Some(value.clone())),
            None => table.remove_column_filter(column),
        }
    }
    if !cli.sort.is_empty() {
        table.set_sorting(SortState(cli.sort.clone()));
    }

    table.set_viewport(cli.height, cli.width);
    if table.config().enable_pagination {
        table.set_page(cli.page.saturating_sub(1));
    }
    if let Some(offset) = cli.scroll {
        table.scroll_to(offset);
    }
    if let Some(row) = cli.row {
        table.scroll_to_row(row);
    }
}
