//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Countdown and quote widget renderer
#[derive(Parser, Debug)]
#[command(name = "countdown", version)]
#[command(about = "Render countdown, since and quote widgets from JSON or Notion exports")]
pub struct Cli {
    /// Config file (defaults to <config dir>/countdown/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the single event a widget parameter selects
    Render {
        #[command(flatten)]
        events: EventArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Show the page of events a list or grid widget would show
    List {
        #[command(flatten)]
        events: EventArgs,
    },
    /// Print the structured form of a widget parameter
    Parse {
        /// Widget parameter, e.g. "since.weeks.gym"
        param: String,
    },
    /// Show the quote a quote widget would pick
    Quote {
        /// Quote rows: a JSON array or a Notion query response ("-" for stdin)
        #[arg(short, long, value_name = "FILE")]
        quotes: PathBuf,

        /// Widget parameter, e.g. "stoic,m" or "author:seneca"
        #[arg(short, long, default_value = "")]
        param: String,

        /// Moment to pick for (RFC 3339, defaults to now)
        #[arg(long)]
        now: Option<String>,

        /// How often the quote changes
        #[arg(long, value_enum, default_value_t = Interval::Daily)]
        interval: Interval,

        /// Widget family, which implies the quote size
        #[arg(long, value_enum, default_value_t = Family::Small)]
        family: Family,
    },
}

/// Arguments shared by the event subcommands.
#[derive(clap::Args, Debug)]
pub struct EventArgs {
    /// Event rows: a JSON array or a Notion query response ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub events: PathBuf,

    /// Widget parameter, e.g. "since,3" or "col,pg2"
    #[arg(short, long, default_value = "")]
    pub param: String,

    /// Date to render for (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub today: Option<String>,

    /// IANA timezone used to determine today
    #[arg(long)]
    pub tz: Option<String>,

    /// Widget family
    #[arg(long, value_enum, default_value_t = Family::Small)]
    pub family: Family,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Text,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interval {
    Hourly,
    Daily,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    Small,
    Medium,
    Large,
    #[value(alias = "inline")]
    AccessoryInline,
    #[value(alias = "circular")]
    AccessoryCircular,
    #[value(alias = "rectangular")]
    AccessoryRectangular,
}
