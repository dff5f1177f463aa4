use adtarget::model::{Anchor, EntityId, ScheduleId, SlotId};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "adtarget")]
#[command(version)]
#[command(about = "Campaign targeting for restaurant placements", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory holding catalogs.json, config.json and relations/
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SaveOpts {
    /// Apply and report, but do not save
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FilterOpts {
    /// Case-insensitive name filter
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// JSON file with a rule set, e.g. {"locations":{"mode":"allowed","values":[10]}}
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Do not seed the rules from the campaign or the configured defaults
    #[arg(long, conflicts_with = "rules")]
    pub no_seed: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    On,
    Off,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the targeting of an anchor (restaurant:<id> or campaign:<id>)
    #[command(alias = "s")]
    Show { anchor: Anchor },

    /// List counterparts that could be added (or all visible ones with --visible)
    #[command(alias = "c")]
    Candidates {
        anchor: Anchor,

        #[command(flatten)]
        filter: FilterOpts,

        /// Include already targeted counterparts
        #[arg(long)]
        visible: bool,
    },

    /// Target or untarget counterparts
    #[command(alias = "t")]
    Toggle {
        anchor: Anchor,

        #[arg(required = true, num_args = 1..)]
        ids: Vec<EntityId>,

        #[command(flatten)]
        save: SaveOpts,
    },

    /// Enable or disable a placement on a counterpart
    Slot {
        anchor: Anchor,
        id: EntityId,
        slot: SlotId,
        state: SlotState,

        #[command(flatten)]
        save: SaveOpts,
    },

    /// Replace the schedules of an enabled placement
    Schedules {
        anchor: Anchor,
        id: EntityId,
        slot: SlotId,
        schedules: Vec<ScheduleId>,

        /// Store the ids as given, including newly added blocked schedules
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        save: SaveOpts,
    },

    /// Target several counterparts at once (already targeted ones are kept)
    #[command(alias = "a")]
    Add {
        anchor: Anchor,

        #[arg(required = true, num_args = 1..)]
        ids: Vec<EntityId>,

        #[command(flatten)]
        save: SaveOpts,
    },

    /// Select-all over the counterparts visible under a filter
    ToggleAll {
        anchor: Anchor,

        #[command(flatten)]
        filter: FilterOpts,

        #[command(flatten)]
        save: SaveOpts,
    },

    /// Apply a JSON list of edits, e.g. [{"op":"toggle_entity","id":3}]
    Apply {
        anchor: Anchor,
        edits: PathBuf,

        #[command(flatten)]
        save: SaveOpts,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., show-blocked-schedules)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
