//! Subcommand implementations.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use countdown_engine::params::DisplayVariant;
use countdown_engine::{
    parse_config, parse_quote_config, pick_color_pair, select_event, select_quote,
    today_in_timezone, DisplayBundle, EngineError, QuoteCard, RefreshInterval, WidgetFamily,
};
use serde::Serialize;

use crate::cli::{Cli, Command, EventArgs, Family, Format, Interval};
use crate::config::CliConfig;
use crate::input;

pub fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Render { events, format } => render(&config, &events, format),
        Command::List { events } => list(&config, &events),
        Command::Parse { param } => print_json(&parse_config(&param)),
        Command::Quote {
            quotes,
            param,
            now,
            interval,
            family,
        } => {
            let quotes = input::load_quotes(&quotes, &config.notion.quotes)?;
            let mut quote_config = parse_quote_config(&param, &config.quote_categories);
            let size = quote_config.size_for(family.into());
            quote_config.size = Some(size);
            let now = resolve_now(now.as_deref())?;
            let interval = RefreshInterval::from(interval);
            let colors = pick_color_pair(&config.color_pairs, size, now, interval);

            let output = match select_quote(&quotes, &quote_config, now, interval) {
                Ok(pick) => QuoteOutput {
                    card: QuoteCard::for_pick(pick, &quote_config, colors),
                    filtered: pick.filtered,
                },
                Err(EngineError::EmptySet) => QuoteOutput {
                    card: QuoteCard::placeholder(colors),
                    filtered: false,
                },
                Err(e) => return Err(e.into()),
            };
            print_json(&output)
        }
    }
}

#[derive(Serialize)]
struct RenderOutput {
    display: Option<DisplayVariant>,
    explicit: bool,
    #[serde(flatten)]
    bundle: DisplayBundle,
}

#[derive(Serialize)]
struct ListOutput {
    view: &'static str,
    page: u32,
    per_page: usize,
    items: Vec<DisplayBundle>,
}

#[derive(Serialize)]
struct QuoteOutput {
    #[serde(flatten)]
    card: QuoteCard,
    filtered: bool,
}

fn render(config: &CliConfig, args: &EventArgs, format: Format) -> Result<()> {
    let family = WidgetFamily::from(args.family);
    let events = input::load_events(&args.events, &config.notion.events)?;
    let params = parse_config(&args.param);
    let today = resolve_today(config, args)?;
    let display = family.display_for(&params);

    let output = match select_event(&events, &params, today) {
        Ok(selection) => RenderOutput {
            display,
            explicit: selection.explicit,
            bundle: config.render.bundle(&selection, &params, today),
        },
        Err(EngineError::EmptySet) => {
            log::info!("no events to render");
            RenderOutput {
                display,
                explicit: false,
                bundle: config.render.placeholder(),
            }
        }
        Err(e) => return Err(e.into()),
    };

    match format {
        Format::Json => print_json(&output),
        Format::Text => {
            println!("{}", render_text(&output));
            Ok(())
        }
    }
}

fn render_text(output: &RenderOutput) -> String {
    let bundle = &output.bundle;
    let mut lines = match output.display {
        Some(DisplayVariant::Topbar) => vec![bundle.topbar_line()],
        Some(DisplayVariant::Circular) => vec![bundle.value_line()],
        _ => vec![
            format!("{} {}", bundle.icon_glyph, bundle.title),
            bundle.value_line(),
        ],
    };
    if let Some(age) = &bundle.age_text {
        lines.push(age.clone());
    }
    lines.retain(|l| !l.trim().is_empty());
    lines.join("\n")
}

fn list(config: &CliConfig, args: &EventArgs) -> Result<()> {
    let family = WidgetFamily::from(args.family);
    let events = input::load_events(&args.events, &config.notion.events)?;
    let params = parse_config(&args.param);
    let today = resolve_today(config, args)?;
    let per_page = family.page_size(params.grid_view);

    print_json(&ListOutput {
        view: if params.grid_view { "grid" } else { "list" },
        page: params.page,
        per_page,
        items: config.render.page_bundles(&events, &params, today, per_page),
    })
}

/// `--today`, else today in `--tz` or the configured timezone, else the
/// local date.
fn resolve_today(config: &CliConfig, args: &EventArgs) -> Result<NaiveDate> {
    if let Some(raw) = &args.today {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid --today '{}', expected YYYY-MM-DD", raw));
    }
    match args.tz.as_ref().or(config.timezone.as_ref()) {
        Some(tz) => Ok(today_in_timezone(Utc::now(), tz)?),
        None => Ok(Local::now().date_naive()),
    }
}

fn resolve_now(raw: Option<&str>) -> Result<NaiveDateTime> {
    match raw {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --now '{}', expected RFC 3339", raw))?
            .naive_local()),
        None => Ok(Local::now().naive_local()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl From<Interval> for RefreshInterval {
    fn from(interval: Interval) -> Self {
        match interval {
            Interval::Hourly => RefreshInterval::Hourly,
            Interval::Daily => RefreshInterval::Daily,
        }
    }
}

impl From<Family> for WidgetFamily {
    fn from(family: Family) -> Self {
        match family {
            Family::Small => WidgetFamily::Small,
            Family::Medium => WidgetFamily::Medium,
            Family::Large => WidgetFamily::Large,
            Family::AccessoryInline => WidgetFamily::AccessoryInline,
            Family::AccessoryCircular => WidgetFamily::AccessoryCircular,
            Family::AccessoryRectangular => WidgetFamily::AccessoryRectangular,
        }
    }
}
