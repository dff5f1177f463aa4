use adtarget::attributes::RuleSet;
use adtarget::commands::projections::{
    admissible_schedules, schedule_options, slot_info, SelectionState,
};
use adtarget::commands::{CmdMessage, MessageLevel, RelationEdit};
use adtarget::config::TargetingConfig;
use adtarget::error::{Result, TargetingError};
use adtarget::model::{Anchor, EntityId, ScheduleId, SlotId};
use adtarget::session::EditorSession;
use adtarget::store::fs::FileStore;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, FilterOpts, SaveOpts, SlotState};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    data_dir: PathBuf,
    config: TargetingConfig,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Show { anchor } => handle_show(&ctx, anchor),
        Commands::Candidates {
            anchor,
            filter,
            visible,
        } => handle_candidates(&ctx, anchor, filter, visible),
        Commands::Toggle { anchor, ids, save } => handle_toggle(&ctx, anchor, ids, save),
        Commands::Slot {
            anchor,
            id,
            slot,
            state,
            save,
        } => handle_slot(&ctx, anchor, id, slot, state, save),
        Commands::Schedules {
            anchor,
            id,
            slot,
            schedules,
            force,
            save,
        } => handle_schedules(&ctx, anchor, id, slot, schedules, force, save),
        Commands::Add { anchor, ids, save } => handle_add(&ctx, anchor, ids, save),
        Commands::ToggleAll {
            anchor,
            filter,
            save,
        } => handle_toggle_all(&ctx, anchor, filter, save),
        Commands::Apply {
            anchor,
            edits,
            save,
        } => handle_apply(&ctx, anchor, &edits, save),
        Commands::Config { key, value } => handle_config(ctx, key, value),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "adtarget=debug" } else { "adtarget=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("com", "adtarget", "adtarget")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| TargetingError::Api("Could not determine data dir".into()))?,
    };
    tracing::debug!(data_dir = %data_dir.display(), "using data dir");

    let config = TargetingConfig::load(&data_dir)?;
    Ok(AppContext { data_dir, config })
}

fn open_session(ctx: &AppContext, anchor: Anchor) -> Result<EditorSession<FileStore>> {
    EditorSession::open(FileStore::new(ctx.data_dir.clone()), anchor)
}

fn handle_show(ctx: &AppContext, anchor: Anchor) -> Result<()> {
    let session = open_session(ctx, anchor)?;
    print_relation(&session, ctx.config.show_blocked_schedules);
    Ok(())
}

/// Rules for a picker or table: a rules file, no rules, or the seeded default.
fn resolve_rules(
    ctx: &AppContext,
    session: &EditorSession<FileStore>,
    filter: &FilterOpts,
) -> Result<RuleSet> {
    match &filter.rules {
        Some(path) => load_rules(path),
        None if filter.no_seed => Ok(RuleSet::default()),
        None => Ok(session.seed_rules(&ctx.config.default_rules)),
    }
}

fn handle_candidates(ctx: &AppContext, anchor: Anchor, filter: FilterOpts, visible: bool) -> Result<()> {
    let session = open_session(ctx, anchor)?;
    let rules = resolve_rules(ctx, &session, &filter)?;
    let mut selector = session.selector(rules);
    selector.set_search(filter.search.as_str());

    let rows = if visible {
        session.visible(&mut selector)
    } else {
        session.candidates(&mut selector)
    };

    if rows.is_empty() {
        println!("No candidates found.");
        return Ok(());
    }

    if visible {
        let marker = match session.visible_summary(&mut selector).state() {
            SelectionState::All => "[x]",
            SelectionState::Some => "[-]",
            SelectionState::None => "[ ]",
        };
        println!("{} {}", marker, "select all".dimmed());
    }

    for row in &rows {
        let targeted = session.relation().is_targeted(row.id);
        let prefix = if targeted { TARGET_MARKER } else { " " };
        let id_str = format!("{:>6}  ", row.id);
        let available = LINE_WIDTH.saturating_sub(id_str.width() + 4);
        let name = truncate_to_width(&row.name, available);
        if targeted {
            println!("  {} {}{}", prefix.green(), id_str.yellow(), name);
        } else {
            println!("  {} {}{}", prefix, id_str.yellow(), name);
        }
    }
    Ok(())
}

fn handle_toggle(ctx: &AppContext, anchor: Anchor, ids: Vec<EntityId>, save: SaveOpts) -> Result<()> {
    let mut session = open_session(ctx, anchor)?;
    let edits: Vec<RelationEdit> = ids
        .into_iter()
        .map(|id| RelationEdit::ToggleEntity { id })
        .collect();
    let messages = session.apply_all(&edits);
    finish(&mut session, messages, &save)
}

fn handle_slot(
    ctx: &AppContext,
    anchor: Anchor,
    id: EntityId,
    slot: SlotId,
    state: SlotState,
    save: SaveOpts,
) -> Result<()> {
    let mut session = open_session(ctx, anchor)?;
    let result = session.apply(&RelationEdit::ToggleSlot {
        id,
        slot,
        enabled: state == SlotState::On,
    });
    finish(&mut session, result.messages, &save)
}

fn handle_schedules(
    ctx: &AppContext,
    anchor: Anchor,
    id: EntityId,
    slot: SlotId,
    schedules: Vec<ScheduleId>,
    force: bool,
    save: SaveOpts,
) -> Result<()> {
    let mut session = open_session(ctx, anchor)?;
    let requested: BTreeSet<ScheduleId> = schedules.into_iter().collect();

    let mut messages = Vec::new();
    let schedules = if force {
        requested
    } else {
        let current = slot_info(session.relation(), id, slot).schedule_ids;
        let allowed = admissible_schedules(&session.catalogs().schedules, &current, &requested);
        let skipped: Vec<String> = requested
            .difference(&allowed)
            .map(|s| s.to_string())
            .collect();
        if !skipped.is_empty() {
            messages.push(CmdMessage::warning(format!(
                "Skipped blocked schedule(s): {}",
                skipped.join(", ")
            )));
        }
        allowed
    };

    let result = session.apply(&RelationEdit::SetSchedules { id, slot, schedules });
    messages.extend(result.messages);
    finish(&mut session, messages, &save)
}

fn handle_add(ctx: &AppContext, anchor: Anchor, ids: Vec<EntityId>, save: SaveOpts) -> Result<()> {
    let mut session = open_session(ctx, anchor)?;
    let result = session.apply(&RelationEdit::BulkAdd { ids });
    finish(&mut session, result.messages, &save)
}

fn handle_toggle_all(ctx: &AppContext, anchor: Anchor, filter: FilterOpts, save: SaveOpts) -> Result<()> {
    let mut session = open_session(ctx, anchor)?;
    let rules = resolve_rules(ctx, &session, &filter)?;
    let result = session.toggle_all_visible(&rules, &filter.search);
    finish(&mut session, result.messages, &save)
}

fn handle_apply(ctx: &AppContext, anchor: Anchor, edits: &Path, save: SaveOpts) -> Result<()> {
    let content = fs::read_to_string(edits).map_err(TargetingError::Io)?;
    let edits: Vec<RelationEdit> =
        serde_json::from_str(&content).map_err(TargetingError::Serialization)?;

    let mut session = open_session(ctx, anchor)?;
    let messages = session.apply_all(&edits);
    finish(&mut session, messages, &save)
}

fn handle_config(mut ctx: AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key.as_deref(), value) {
        (None, _) => {
            println!(
                "show-blocked-schedules = {}",
                ctx.config.show_blocked_schedules
            );
            let rules = serde_json::to_string(&ctx.config.default_rules)
                .map_err(TargetingError::Serialization)?;
            println!("default-rules = {}", rules);
        }
        (Some("show-blocked-schedules"), None) => {
            println!(
                "show-blocked-schedules = {}",
                ctx.config.show_blocked_schedules
            );
        }
        (Some(key), Some(value)) => {
            ctx.config.set_flag(key, &value)?;
            ctx.config.save(&ctx.data_dir)?;
            print_messages(&[CmdMessage::success(format!("Set {} = {}", key, value))]);
        }
        (Some(other), None) => {
            return Err(TargetingError::Api(format!("Unknown config key: {}", other)));
        }
    }
    Ok(())
}

/// Print edit messages, then save unless this is a dry run.
fn finish(session: &mut EditorSession<FileStore>, messages: Vec<CmdMessage>, save: &SaveOpts) -> Result<()> {
    print_messages(&messages);
    if save.dry_run {
        if session.is_dirty() {
            print_messages(&[CmdMessage::info("Dry run: changes not saved")]);
        }
        session.cancel();
        return Ok(());
    }
    let saved = session.save()?;
    print_messages(&saved);
    Ok(())
}

fn load_rules(path: &Path) -> Result<RuleSet> {
    let content = fs::read_to_string(path).map_err(TargetingError::Io)?;
    serde_json::from_str(&content).map_err(TargetingError::Serialization)
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

const LINE_WIDTH: usize = 100;
const TARGET_MARKER: &str = "●";

fn print_relation(session: &EditorSession<FileStore>, show_blocked: bool) {
    let anchor = session.anchor();
    let catalogs = session.catalogs();
    let kind = anchor.counterpart_kind().label();

    println!("{}", anchor.to_string().bold());
    if session.relation().is_empty() {
        println!("No targeted {}s.", kind);
        return;
    }

    for edge in session.relation().edges() {
        let id_str = format!("{:>6}  ", edge.counterpart_id);
        let name = catalogs
            .counterpart_name(anchor, edge.counterpart_id)
            .unwrap_or("(unknown)");
        let available = LINE_WIDTH.saturating_sub(id_str.width() + 4);
        println!(
            "  {} {}{}",
            TARGET_MARKER.green(),
            id_str.yellow(),
            truncate_to_width(name, available)
        );

        for slot in &edge.slots {
            let slot_name = catalogs
                .placement(slot.slot_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("slot {}", slot.slot_id));

            let mut parts = Vec::new();
            let mut hidden = 0;
            let options = schedule_options(&catalogs.schedules, &slot.schedule_ids);
            for option in options.iter().filter(|o| o.selected) {
                if option.selectable {
                    parts.push(option.schedule.name.clone());
                } else if show_blocked {
                    parts.push(format!("{} (blocked)", option.schedule.name).red().to_string());
                } else {
                    hidden += 1;
                }
            }
            for id in slot.schedule_ids.iter().filter(|id| catalogs.schedule(**id).is_none()) {
                parts.push(format!("schedule {}", id));
            }
            if hidden > 0 {
                parts.push(format!("{} blocked hidden", hidden).dimmed().to_string());
            }
            let schedules = if parts.is_empty() {
                "no schedules".dimmed().to_string()
            } else {
                parts.join(", ")
            };
            println!("{:>12}{}: {}", "", slot_name, schedules);
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
