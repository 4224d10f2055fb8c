mod loader;
mod reports;

use anyhow::{Context, Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use loader::{FsDataLoader, read_record};
use reports::TravelReport;
use wagonwise_core::{Advisor, ConfirmOutcome, PlayerState, TravelSelection, WagonState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Coloured human-readable output
    Console,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "wagonwise", version = "0.1.0")]
#[command(about = "Economy advice and fast-travel planning for frontier players")]
struct Args {
    /// Advisor config JSON (thresholds and travel tuning)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Topology JSON (locations and edges); defaults to the built-in frontier map
    #[arg(long, global = true)]
    topology: Option<PathBuf>,

    /// Optional path to write the report output instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Output report format
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recommend the next action for a player snapshot
    Advise(ProfileArgs),
    /// Recommend and show why every earlier rule was skipped
    Explain(ProfileArgs),
    /// Shortest route and fare between two locations
    Route {
        /// Origin location id
        #[arg(long = "from")]
        origin: String,
        /// Destination location id
        #[arg(long = "to")]
        destination: String,
    },
    /// Select a route, confirm it, and wait out the commit hold
    Travel {
        /// Origin location id
        #[arg(long = "from")]
        origin: String,
        /// Destination location id
        #[arg(long = "to")]
        destination: String,
        /// Funds available for the fare
        #[arg(long)]
        funds: f64,
    },
    /// List known locations and their neighbors
    Locations,
}

#[derive(Debug, Clone, Default, ClapArgs)]
struct ProfileArgs {
    /// Player profile JSON; a `wagon` field, if present, supplies the wagon load
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Player rank
    #[arg(long)]
    rank: Option<f64>,

    /// Cash on hand
    #[arg(long)]
    cash: Option<f64>,

    /// Gold bars on hand
    #[arg(long)]
    gold: Option<f64>,

    /// Role XP as name=xp (repeatable)
    #[arg(long = "role", value_parser = parse_role)]
    roles: Vec<(String, f64)>,

    /// Trader wagon load in percent
    #[arg(long)]
    wagon_load: Option<f64>,
}

fn parse_role(raw: &str) -> Result<(String, f64), String> {
    let (name, xp) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=xp, got '{raw}'"))?;
    let xp = xp
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid xp for role '{name}': {err}"))?;
    Ok((name.trim().to_string(), xp))
}

impl ProfileArgs {
    /// Merge the profile file with flag overrides into a loose record.
    fn to_record(&self) -> Result<Value> {
        let mut record = match &self.profile {
            Some(path) => read_record(path)?,
            None => Value::Object(Map::new()),
        };
        let Some(fields) = record.as_object_mut() else {
            bail!("player profile must be a JSON object");
        };
        for (key, value) in [("rank", self.rank), ("cash", self.cash), ("gold", self.gold)] {
            if let Some(value) = value {
                fields.insert(key.to_string(), Value::from(value));
            }
        }
        if !self.roles.is_empty() {
            let roles = fields
                .entry("roles")
                .or_insert_with(|| Value::Object(Map::new()));
            if !roles.is_object() {
                *roles = Value::Object(Map::new());
            }
            if let Some(roles) = roles.as_object_mut() {
                for (name, xp) in &self.roles {
                    roles.insert(name.clone(), Value::from(*xp));
                }
            }
        }
        if let Some(load) = self.wagon_load {
            fields.insert("wagon".to_string(), Value::from(load));
        }
        Ok(record)
    }

    fn snapshot(&self) -> Result<(PlayerState, WagonState)> {
        let record = self.to_record()?;
        let wagon = record
            .get("wagon")
            .map_or_else(WagonState::empty, WagonState::from_record);
        Ok((PlayerState::from_record(&record), wagon))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run(&args).await
}

async fn run(args: &Args) -> Result<()> {
    let loader = FsDataLoader::new(args.config.clone(), args.topology.clone());
    let advisor = Advisor::load(&loader).context("failed to load advisor data")?;
    let mut output_target = OutputTarget::open(args.output.as_deref())?;

    match &args.command {
        Command::Advise(profile) => {
            let (player, wagon) = profile.snapshot()?;
            let advice = advisor.analyze(&player, &wagon);
            log::info!("selected rule {}", advice.rule_id);
            match args.report {
                ReportFormat::Json => reports::write_json(&mut output_target, &advice)?,
                ReportFormat::Console => {
                    reports::write_advice_console(&mut output_target, &advice)?;
                }
            }
        }
        Command::Explain(profile) => {
            let (player, wagon) = profile.snapshot()?;
            let explanation = advisor.explain(&player, &wagon);
            match args.report {
                ReportFormat::Json => reports::write_json(&mut output_target, &explanation)?,
                ReportFormat::Console => {
                    reports::write_explanation_console(&mut output_target, &explanation)?;
                }
            }
        }
        Command::Route {
            origin,
            destination,
        } => {
            let quote = advisor
                .quote(origin, destination)
                .with_context(|| format!("unknown location in {origin} -> {destination}"))?;
            match args.report {
                ReportFormat::Json => reports::write_json(&mut output_target, &quote)?,
                ReportFormat::Console => {
                    reports::write_route_console(&mut output_target, advisor.routes(), &quote)?;
                }
            }
        }
        Command::Travel {
            origin,
            destination,
            funds,
        } => {
            let report = simulate_travel(&advisor, origin, destination, *funds).await?;
            match args.report {
                ReportFormat::Json => reports::write_json(&mut output_target, &report)?,
                ReportFormat::Console => {
                    reports::write_travel_console(&mut output_target, advisor.routes(), &report)?;
                }
            }
        }
        Command::Locations => match args.report {
            ReportFormat::Json => {
                reports::write_locations_json(&mut output_target, advisor.routes())?;
            }
            ReportFormat::Console => {
                reports::write_locations_console(&mut output_target, advisor.routes())?;
            }
        },
    }

    output_target.flush()?;
    Ok(())
}

async fn simulate_travel(
    advisor: &Advisor,
    origin: &str,
    destination: &str,
    funds: f64,
) -> Result<TravelReport> {
    let mut selection = TravelSelection::starting_at(advisor.routes(), origin)?;
    selection.pick(destination)?;
    let path = selection.path().to_vec();

    let hold = advisor.config().travel.commit_hold();
    if !hold.is_zero() && selection.can_afford(funds) {
        eprintln!(
            "{}",
            format!("⏳ Saddling up ({:.1}s)...", hold.as_secs_f64()).cyan()
        );
    }

    let mut landed = None;
    let outcome = selection
        .commit_travel(funds, |node, cost| landed = Some((node.clone(), cost)))
        .await?;
    let ConfirmOutcome::Started(pending) = outcome else {
        bail!("a trip is already being committed");
    };
    let Some((arrived, cost)) = landed else {
        bail!("travel to {} did not complete", pending.destination);
    };

    Ok(TravelReport {
        origin: pending.origin,
        destination: arrived,
        path,
        cost,
        funds_before: funds,
        funds_after: funds - f64::from(cost),
        arrived_at: chrono::Utc::now(),
    })
}

/// Report sink: the `--output` file when given, stdout otherwise.
struct OutputTarget(BufWriter<Box<dyn Write>>);

impl OutputTarget {
    fn open(path: Option<&Path>) -> Result<Self> {
        let sink: Box<dyn Write> = match path {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            ),
            None => Box::new(stdout()),
        };
        Ok(Self(BufWriter::new(sink)))
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}
