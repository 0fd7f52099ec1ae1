//! `gcis` - CLI for the clearance-gated records archive
//!
//! This binary drives the archive core from a terminal: it renders the
//! record and project views, submits passphrases and forms, and manages
//! annotations for the local clearance profile.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;

use gcis::annotations::{self, AnnotationLog, PageReply};
use gcis::charter::{CharterReader, ReadOutcome};
use gcis::cli::{
    AnnotationsCommand, Cli, ClearanceCommand, Command, ConfigCommand, OutputFormat,
    ProjectsCommand, RecordsCommand, VisibilityCommand,
};
use gcis::directory::view::{
    projects_table, records_table, ProjectView, RecordPage, RecordView, RowAction, RowMarker,
    MISSING_RECORD,
};
use gcis::forms::{submit_and_export, Form};
use gcis::visibility::{Page, ACCESS_RESTRICTED_NOTICE};
use gcis::{init_logging, ClearanceStore, Config, Directory, Exporter, Storage, Viewer};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    let command = match cli.command {
        Command::Config(config_cmd) => return handle_config(&config, config_cmd),
        command => command,
    };

    let storage = Storage::open(config.database_path())?;
    let directory = Directory::load(&config.data)?;
    let clearance = ClearanceStore::new(&storage);

    match command {
        Command::Clearance(cmd) => handle_clearance(&clearance, &cmd),
        Command::Passphrase(cmd) => {
            let outcome = clearance.submit_passphrase(&cmd.value)?;
            println!("{}", outcome.notice());
            Ok(())
        }
        Command::Records(cmd) => handle_records(&config, &directory, &clearance, cmd),
        Command::Projects(cmd) => handle_projects(&directory, cmd),
        Command::FileRecord(cmd) => {
            let mut form = Form::record();
            submit_form(&config, &clearance, &mut form, &cmd.field_values())
        }
        Command::RegisterProject(cmd) => {
            let mut form = Form::project();
            submit_form(&config, &clearance, &mut form, &cmd.field_values())
        }
        Command::Annotations(cmd) => handle_annotations(&storage, &directory, &clearance, cmd),
        Command::Visibility(cmd) => handle_visibility(&clearance, &cmd),
        // Handled before the profile is opened.
        Command::Config(_) => Ok(()),
    }
}

fn viewer(clearance: &ClearanceStore<&Storage>) -> gcis::Result<Viewer> {
    Ok(Viewer::new(clearance.get()?, clearance.is_admin()?))
}

fn handle_clearance(
    clearance: &ClearanceStore<&Storage>,
    cmd: &ClearanceCommand,
) -> anyhow::Result<()> {
    match cmd {
        ClearanceCommand::Show => {
            let level = clearance.get()?;
            println!("Clearance: {}", level.label());
            println!("Admin:     {}", clearance.is_admin()?);
        }
        ClearanceCommand::Set { level } => {
            if clearance.set_raw(level)? {
                println!("Clearance: {}", clearance.get()?.label());
            } else {
                println!("No change.");
            }
        }
        ClearanceCommand::Admin { revoke } => {
            clearance.set_admin(!revoke)?;
            println!("Admin:     {}", !revoke);
        }
    }
    Ok(())
}

fn marker(marker: RowMarker) -> &'static str {
    match marker {
        RowMarker::None => "",
        RowMarker::Archived => " (archived)",
        RowMarker::Decayed => " (decayed)",
    }
}

fn handle_records(
    config: &Config,
    directory: &Directory,
    clearance: &ClearanceStore<&Storage>,
    cmd: RecordsCommand,
) -> anyhow::Result<()> {
    match cmd {
        RecordsCommand::List { format } => {
            let rows = records_table(directory);
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            for row in rows {
                println!(
                    "{:<10} {:<32} {:<10} {:>4}  {}{}",
                    row.id,
                    row.title,
                    row.division,
                    row.year,
                    row.status_label,
                    marker(row.marker)
                );
            }
        }
        RecordsCommand::Open { id } => {
            let level = clearance.get()?;
            let row = records_table(directory).into_iter().find(|row| row.id == id);
            match row.map(|row| row.open(level)) {
                Some(RowAction::Navigate(href)) => println!("{href}"),
                Some(RowAction::Notice(notice)) => println!("{notice}"),
                None => println!("{MISSING_RECORD}"),
            }
        }
        RecordsCommand::Show { id, read, format } => {
            let view = RecordView::render(directory, Some(&id), clearance.get()?);
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_record(&view);
            }
            if let RecordView::Page(page) = &view {
                if read && page.charter_text_shown {
                    read_charter(config, clearance)?;
                }
            }
        }
    }
    Ok(())
}

fn print_record(view: &RecordView) {
    let RecordView::Page(page) = view else {
        println!("{}", view.title());
        return;
    };
    let RecordPage {
        title,
        fields,
        archival,
        status_line,
        content,
        ..
    } = page;
    println!("{title}");
    println!();
    println!("Id:        {}", fields.id);
    println!("Division:  {}", fields.division);
    println!("Medium:    {}", fields.medium);
    println!("Year:      {}", fields.year);
    println!("Status:    {}", fields.status);
    if let Some((term, note)) = archival {
        println!("{term}:  {note}");
    }
    println!();
    if !status_line.is_empty() {
        println!("{status_line}");
    }
    if !content.is_empty() {
        println!("{content}");
    }
}

/// Hold the charter open for the read delay. The whole text is already on
/// the terminal, so the end of the content counts as in view.
fn read_charter(config: &Config, clearance: &ClearanceStore<&Storage>) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start the charter timer")?;
    let (_scrolls, receiver) = mpsc::channel(1);
    let reader = CharterReader::new(clearance, config.read_delay());

    match runtime.block_on(reader.run(true, receiver))? {
        ReadOutcome::Completed(level) => println!("Clearance: {}", level.label()),
        ReadOutcome::AlreadyInitiated | ReadOutcome::Abandoned => {}
    }
    Ok(())
}

fn handle_projects(directory: &Directory, cmd: ProjectsCommand) -> anyhow::Result<()> {
    match cmd {
        ProjectsCommand::List { format } => {
            let rows = projects_table(directory);
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            for row in rows {
                println!(
                    "{:<12} {:<28} {:<11} {}",
                    row.id, row.name, row.status, row.description
                );
            }
        }
        ProjectsCommand::Show { id, format } => {
            let view = ProjectView::render(directory, Some(&id));
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }
            println!("{}", view.title());
            if let ProjectView::Page(page) = view {
                println!("Status:    {}", page.status);
                if !page.description.is_empty() {
                    println!();
                    println!("{}", page.description);
                }
                println!();
                for row in page.records {
                    println!("  {:<10} {}{}", row.id, row.title, marker(row.marker));
                }
            }
        }
    }
    Ok(())
}

fn submit_form(
    config: &Config,
    clearance: &ClearanceStore<&Storage>,
    form: &mut Form,
    values: &[(&'static str, &str)],
) -> anyhow::Result<()> {
    let exporter = Exporter::new(config.export_dir());
    let submission = submit_and_export(form, viewer(clearance)?, values, &exporter)?;
    println!("{}", submission.notice());
    if let Some(path) = submission.exported {
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_annotations(
    storage: &Storage,
    directory: &Directory,
    clearance: &ClearanceStore<&Storage>,
    cmd: AnnotationsCommand,
) -> anyhow::Result<()> {
    let viewer = viewer(clearance)?;
    let log = AnnotationLog::new(storage);

    let reply = match cmd {
        AnnotationsCommand::List { record } => log.list_on_page(directory, viewer, &record)?,
        AnnotationsCommand::Add { record, text } => {
            log.add_on_page(directory, viewer, &record, &text)?
        }
    };
    match reply {
        PageReply::MissingRecord => println!("{MISSING_RECORD}"),
        PageReply::Hidden => println!("{ACCESS_RESTRICTED_NOTICE}"),
        PageReply::Listed(items) if items.is_empty() => println!("{}", annotations::EMPTY_NOTICE),
        PageReply::Listed(items) => {
            for item in items {
                println!("{}", item.body);
                println!("  {}", item.meta());
            }
        }
        PageReply::Recorded => println!("{}", annotations::RECORDED_NOTICE),
        PageReply::Ignored => {}
    }
    Ok(())
}

fn handle_visibility(
    clearance: &ClearanceStore<&Storage>,
    cmd: &VisibilityCommand,
) -> anyhow::Result<()> {
    let visibility = viewer(clearance)?.visibility(cmd.page);
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&visibility)?);
        return Ok(());
    }

    println!("Page:             {}", visibility.page);
    let nav: Vec<&str> = visibility.visible_nav().map(Page::name).collect();
    println!("Navigation:       {}", nav.join(", "));
    println!("Internal tools:   {}", visibility.internal_tools);
    println!("Forms locked:     {}", visibility.forms_locked);
    println!("Annotations:      {}", visibility.annotations);
    println!("Annotation form:  {}", visibility.annotation_form);
    if let Some(badge) = visibility.badge {
        println!("Badge:            {badge}");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Data]");
                let records = config.data.records_path.as_deref();
                let projects = config.data.projects_path.as_deref();
                println!("  Records:            {}", display_source(records));
                println!("  Projects:           {}", display_source(projects));
                println!();
                println!("[Export]");
                println!("  Directory:          {}", config.export_dir().display());
                println!();
                println!("[Charter]");
                println!("  Read delay (secs):  {}", config.charter.read_delay_secs);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn display_source(path: Option<&Path>) -> String {
    path.map_or_else(|| "built-in".to_string(), |path| path.display().to_string())
}
