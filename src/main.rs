use anyhow::{bail, Context};
use clap::Parser;
use jotter::core::logging::{init_logging, LogTarget};
use jotter::search::matcher::segments;
use jotter::storage::notes::NoteRow;
use jotter::ui::cli::{Cli, Commands};
use jotter::{Config, NoteService, NoteStore, NoteView, NotesTui, UpsertStatus};
use std::io::IsTerminal;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::new(cli.base_dir.as_deref().map(PathBuf::from))?;
    let target = if cli.command.is_none() { LogTarget::File } else { LogTarget::Stderr };
    init_logging(&config, target)?;

    match cli.command {
        None => handle_interactive(&config),
        Some(Commands::Init) => handle_init(&config),
        Some(Commands::List { json }) => handle_list(&config, json),
        Some(Commands::Search { term }) => handle_search(&config, &term),
        Some(Commands::Add { title, content }) => handle_add(&config, &title, &content),
        Some(Commands::Edit { id, title, content }) => {
            handle_edit(&config, id, title.as_deref(), content.as_deref())
        }
        Some(Commands::Delete { id }) => handle_delete(&config, id),
    }
}

fn open_service(config: &Config) -> anyhow::Result<NoteService<NoteStore>> {
    let store = NoteStore::open(config)
        .with_context(|| format!("opening note database at {:?}", config.database_path))?;
    Ok(NoteService::open(store))
}

fn handle_init(config: &Config) -> anyhow::Result<()> {
    if config.is_initialized() && config.database_path.exists() {
        println!("jotter is already initialized at: {:?}", config.base_dir);
        return Ok(());
    }

    config.init()?;
    NoteStore::open(config)?;
    println!("✓ Created data directory: {:?}", config.base_dir);
    println!("✓ Created note database: {:?}", config.database_path);
    Ok(())
}

fn handle_interactive(config: &Config) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let mut tui = NotesTui::new(service, config.title_limit);
    tui.run()?;
    Ok(())
}

/// Wrap highlighted runs in reverse video when printing to a terminal
fn emphasise(text: &str, spans: &[jotter::Span], color: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (segment, highlighted) in segments(text, spans) {
        if highlighted && color {
            out.push_str("\x1b[7m");
            out.push_str(segment);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(segment);
        }
    }
    out
}

fn print_views(views: &[NoteView]) {
    let color = std::io::stdout().is_terminal();
    for view in views {
        println!(
            "#{:<4} {}  ({})",
            view.id,
            emphasise(&view.title, &view.title_spans, color),
            view.modified
        );
        for line in emphasise(&view.content, &view.content_spans, color).lines() {
            println!("      {}", line);
        }
        println!();
    }
}

fn handle_list(config: &Config, json: bool) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let hits = service.search("")?;

    if json {
        let rows: Vec<NoteRow> = hits.iter().map(|hit| NoteRow::from(hit.note)).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{} notes", hits.len());
    let views: Vec<NoteView> = hits
        .iter()
        .map(|hit| NoteView::new(hit, "", config.title_limit))
        .collect();
    print_views(&views);
    Ok(())
}

fn handle_search(config: &Config, term: &str) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let hits = service.search(term)?;

    if hits.is_empty() {
        println!("No notes match \"{}\".", term.trim());
        return Ok(());
    }

    println!("Found {} notes:", hits.len());
    let views: Vec<NoteView> = hits
        .iter()
        .map(|hit| NoteView::new(hit, term, config.title_limit))
        .collect();
    print_views(&views);
    Ok(())
}

fn report(status: UpsertStatus, verb: &str) -> anyhow::Result<()> {
    status
        .into_result(&format!("could not {} note", verb))
        .context("see log output for details")?;
    println!("✓ Note {}d", verb);
    Ok(())
}

fn handle_add(config: &Config, title: &str, content: &str) -> anyhow::Result<()> {
    let mut service = open_service(config)?;
    report(service.create_note(title, content), "create")
}

fn handle_edit(
    config: &Config,
    id: i64,
    title: Option<&str>,
    content: Option<&str>,
) -> anyhow::Result<()> {
    let mut service = open_service(config)?;
    if !service.index().is_available() {
        return Err(jotter::Error::StorageUnavailable.into());
    }
    let (current_title, current_content) = match service.note(id) {
        Some(note) => (note.title().to_string(), note.content().to_string()),
        None => return Err(jotter::Error::NoteNotFound(id).into()),
    };

    let status = service.edit_note(
        id,
        title.unwrap_or(&current_title),
        content.unwrap_or(&current_content),
    );
    if status == UpsertStatus::NoContent {
        bail!("Nothing to save. Use `jotter delete {}` to remove the note instead.", id);
    }
    report(status, "update")
}

fn handle_delete(config: &Config, id: i64) -> anyhow::Result<()> {
    let mut service = open_service(config)?;
    report(service.delete_note(id), "delete")
}
