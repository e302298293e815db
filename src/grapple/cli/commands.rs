//! # CLI Layer
//!
//! This module is **one possible client** for grapple; an editor plugin
//! drives the same API.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the tracing subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Session
//!
//! One invocation is one editor session: the configuration is loaded, a
//! single operation runs, and the configuration is saved on the way out
//! (the equivalent of leaving the editor). Mutations may already have saved
//! through `save_on_change`; the final save is a refresh-merge and is safe to
//! repeat.

use super::render::{
    print_messages, render_export, render_mark, render_mark_list, render_settings, render_target,
};
use super::setup::{print_grouped_help, print_help_for_command, Cli, Commands, FocusArgs};
use clap::Parser;
use grapple::api::{Focus, GrappleApi};
use grapple::config::ConfigLayer;
use grapple::editor::{edit_text, open_at};
use grapple::error::Result;
use grapple::init::initialize;
use grapple::menu::MenuAction;
use grapple::model::Cursor;
use grapple::store::fs::FileStore;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Filter directives for the stderr log, e.g. `GRAPPLE_LOG=grapple=debug`.
const LOG_ENV: &str = "GRAPPLE_LOG";

struct AppContext {
    api: GrappleApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.help {
        match &cli.command {
            None => print_grouped_help(),
            Some(command) => print_help_for_command(command_name(command)),
        }
        return Ok(());
    }
    if let Some(Commands::Help { command }) = &cli.command {
        return handle_help(command.as_deref());
    }

    let mut ctx = init_context(&cli)?;

    let result = match cli.command {
        Some(Commands::Add(focus)) => handle_add(&mut ctx, &focus),
        Some(Commands::Rm { id }) => handle_remove(&mut ctx, &id),
        Some(Commands::Toggle(focus)) => handle_toggle(&mut ctx, &focus),
        Some(Commands::SetAt { index, focus }) => handle_set_at(&mut ctx, index, &focus),
        Some(Commands::Leave(focus)) => handle_leave(&mut ctx, &focus),
        Some(Commands::Get { id }) => handle_get(&mut ctx, &id),
        Some(Commands::Goto { id, open }) => handle_goto(&mut ctx, &id, open),
        Some(Commands::Next { from }) => handle_cycle(&mut ctx, &from, true),
        Some(Commands::Prev { from }) => handle_cycle(&mut ctx, &from, false),
        Some(Commands::Status { file }) => handle_status(&mut ctx, &file),
        Some(Commands::List) | None => handle_list(&mut ctx),
        Some(Commands::Edit) => handle_edit(&mut ctx),
        Some(Commands::Export { json }) => handle_export(&mut ctx, json),
        Some(Commands::Clear) => handle_clear(&mut ctx),
        Some(Commands::Config) => handle_config(&mut ctx),
        Some(Commands::Help { .. }) => Ok(()),
    };
    result?;

    leave(&mut ctx)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "grapple=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let cwd = match &cli.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let overrides = if cli.branch {
        ConfigLayer::mark_branch(true)
    } else {
        ConfigLayer::default()
    };

    let api = initialize(&cwd, overrides)?;
    debug!(project = %api.active_key(), "session started");
    Ok(AppContext { api })
}

fn leave(ctx: &mut AppContext) -> Result<()> {
    ctx.api.save()
}

fn focus(args: &FocusArgs) -> Focus {
    let focus = Focus::new(args.file.clone()).with_cursor(Cursor::new(args.row, args.col));
    match &args.filetype {
        Some(filetype) => focus.with_filetype(filetype.clone()),
        None => focus,
    }
}

fn handle_add(ctx: &mut AppContext, args: &FocusArgs) -> Result<()> {
    let result = ctx.api.add_mark(&focus(args))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.remove_mark(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_toggle(ctx: &mut AppContext, args: &FocusArgs) -> Result<()> {
    let result = ctx.api.toggle_mark(&focus(args))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_set_at(ctx: &mut AppContext, index: usize, args: &FocusArgs) -> Result<()> {
    let result = ctx.api.set_current_at(index, &focus(args))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_leave(ctx: &mut AppContext, args: &FocusArgs) -> Result<()> {
    ctx.api.store_cursor_offset(&focus(args))?;
    Ok(())
}

fn handle_get(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.get_mark(id)?;
    if let Some(mark) = result.mark.as_ref().filter(|m| !m.filename.is_empty()) {
        print!("{}", render_mark(mark));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_goto(ctx: &mut AppContext, id: &str, open: bool) -> Result<()> {
    let result = ctx.api.nav_file(id)?;
    print_messages(&result.messages);
    let Some(target) = result.target else {
        return Ok(());
    };

    let context = ctx.api.store().context();
    if open {
        open_at(context.resolve_path(&target.filename), target.row)
    } else {
        print!("{}", render_target(&target, context));
        Ok(())
    }
}

fn handle_cycle(ctx: &mut AppContext, from: &str, forward: bool) -> Result<()> {
    let result = if forward {
        ctx.api.nav_next(from)?
    } else {
        ctx.api.nav_prev(from)?
    };
    if let Some(target) = &result.target {
        print!("{}", render_target(target, ctx.api.store().context()));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_status(ctx: &mut AppContext, file: &str) -> Result<()> {
    let result = ctx.api.status(file)?;
    if let Some(status) = result.status.filter(|s| !s.is_empty()) {
        println!("{}", status);
    }
    Ok(())
}

fn handle_list(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.list_marks()?;
    print!(
        "{}",
        render_mark_list(&result.listed_marks, ctx.api.settings().zero_index)
    );
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext) -> Result<()> {
    let mut session = ctx.api.open_menu();
    let outcome = edit_text(session.contents())?;
    session.set_contents(outcome.contents);

    let action = if outcome.saved {
        MenuAction::Write
    } else {
        MenuAction::Close
    };
    let result = ctx.api.apply_menu(&session, action)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &mut AppContext, json: bool) -> Result<()> {
    let result = ctx.api.export()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result.export)?);
    } else {
        print!("{}", render_export(&result.export));
    }
    Ok(())
}

fn handle_clear(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.clear_marks()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.show_config()?;
    if let Some(settings) = &result.settings {
        print!("{}", render_settings(settings, &result.projects));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_help(command: Option<&str>) -> Result<()> {
    match command {
        Some(name) => print_help_for_command(name),
        None => print_grouped_help(),
    }
    Ok(())
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Add(_) => "add",
        Commands::Rm { .. } => "rm",
        Commands::Toggle(_) => "toggle",
        Commands::SetAt { .. } => "set-at",
        Commands::Leave(_) => "leave",
        Commands::Get { .. } => "get",
        Commands::Goto { .. } => "goto",
        Commands::Next { .. } => "next",
        Commands::Prev { .. } => "prev",
        Commands::Status { .. } => "status",
        Commands::List => "list",
        Commands::Edit => "edit",
        Commands::Export { .. } => "export",
        Commands::Clear => "clear",
        Commands::Config => "config",
        Commands::Help { .. } => "help",
    }
}
