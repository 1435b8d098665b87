mod app;
mod cli;
mod config;
mod error;
mod paths;
mod render;
mod terminal;
mod text;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use datagrid::column::ColumnDef;
use datagrid::grid::{Grid, GridProps};
use datagrid::metrics::{invalidate_scrollbar_width, scrollbar_width};
use datagrid::sort::parse_date;
use datagrid::value::{Dataset, Row, Value};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::App;
use crate::cli::CliArgs;
use crate::error::AppError;
use crate::terminal::{TerminalGuard, TerminalProbe};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn init_logging(level: LevelFilter) -> Result<(), AppError> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = File::create(&path)?;
    WriteLogger::init(level, Config::default(), file).map_err(|e| AppError::Logging(e.to_string()))
}

fn load_dataset(args: &CliArgs) -> Result<Dataset, AppError> {
    let file = File::open(&args.data).map_err(|e| AppError::load(&args.data, e.into()))?;
    let data = Dataset::from_json_reader(std::io::BufReader::new(file))
        .map_err(|e| AppError::load(&args.data, e))?;
    Ok(if args.nested { data.nested(true) } else { data })
}

/// Column schema from the keys found in the data, sorted by name.
///
/// A key whose every non-empty value parses with the date format becomes
/// a date column.
fn infer_columns(data: &Dataset, date_format: &str) -> Vec<ColumnDef> {
    fn collect<'a>(rows: &'a [Row], out: &mut BTreeMap<&'a str, Vec<&'a Value>>) {
        for row in rows {
            for (key, value) in &row.values {
                out.entry(key.as_str()).or_default().push(value);
            }
            collect(&row.sub_rows, out);
        }
    }

    let mut keys = BTreeMap::new();
    collect(&data.rows, &mut keys);
    keys.into_iter()
        .map(|(key, values)| {
            let mut present = values.into_iter().filter(|v| !v.display().is_empty()).peekable();
            let is_date = present.peek().is_some()
                && present.all(|v| parse_date(v, date_format).is_some());
            let def = ColumnDef::new(key, key);
            if is_date { def.date() } else { def }
        })
        .collect()
}

fn run(args: CliArgs) -> Result<(), AppError> {
    let data = load_dataset(&args)?;
    let (_, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let config = config::load(args.config.as_deref(), rows)?;
    let columns = infer_columns(&data, &config.date_format);
    log::info!(
        "loaded {} rows, {} columns from {}",
        data.len(),
        columns.len(),
        args.data.display()
    );

    let grid = Grid::with_config(GridProps::new(data, columns).error(args.error), config);
    let mut terminal = TerminalGuard::new()?;
    let mut app = App::new(grid, scrollbar_width(&mut TerminalProbe));
    event_loop(&mut app, &mut terminal)
}

fn event_loop(app: &mut App, terminal: &mut TerminalGuard) -> Result<(), AppError> {
    let mut needs_paint = true;
    while !app.should_quit() {
        if needs_paint || app.grid().is_dirty() {
            let (width, height) = terminal.size()?;
            app.ensure_cursor_visible(width);
            let lines = render::compose(app, width, height);
            render::paint(terminal.stdout(), &lines)?;
            app.grid().clear_dirty();
            needs_paint = false;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.handle_key(key);
                needs_paint = true;
            }
            Event::Resize(_, rows) => {
                invalidate_scrollbar_width();
                app.set_scrollbar_width(scrollbar_width(&mut TerminalProbe));
                app.resize_viewport(rows);
                needs_paint = true;
            }
            _ => {}
        }
    }
    log::info!("quit");
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    if let Err(e) = init_logging(args.log_level) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
