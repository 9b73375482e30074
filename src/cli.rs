//! CLI definition and dispatch.

use chrono::{NaiveTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::alpha::RankBlendParams;
use crate::domain::calendar::{RebalanceCalendar, Schedule};
use crate::domain::config_validation::{
    parse_burn_in, parse_date, parse_weekday, validate_calendar_config, validate_session_config,
    validate_strategy_config, validate_universe_config,
};
use crate::domain::error::RotatorError;
use crate::domain::session::SessionConfig;
use crate::domain::universe::{parse_assets, StaticUniverse};
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "rotator", about = "Rank-rotation rebalance scheduler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the rebalance schedule for a configuration
    Calendar {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Override the configured end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Calendar { config, start, end } => {
            run_calendar(&config, start.as_deref(), end.as_deref())
        }
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = RotatorError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build the rebalance calendar from the `[calendar]` section.
pub fn build_calendar(config: &dyn ConfigPort) -> Result<RebalanceCalendar, RotatorError> {
    let selector = config.get_string("calendar", "periodicity").ok_or_else(|| {
        RotatorError::ConfigMissing {
            section: "calendar".into(),
            key: "periodicity".into(),
        }
    })?;

    let weekday_str = config
        .get_string("calendar", "weekday")
        .unwrap_or_else(|| "mon".to_string());
    let weekday = parse_weekday(&weekday_str, "calendar", "weekday")?;

    let offset = config.get_int("calendar", "offset_business_days", 0);
    if offset < 0 {
        return Err(RotatorError::ConfigInvalid {
            section: "calendar".into(),
            key: "offset_business_days".into(),
            reason: "must not be negative".into(),
        });
    }

    let schedule = Schedule::from_selector(&selector, weekday, offset as u32)?;
    Ok(RebalanceCalendar::new(
        schedule,
        config.get_bool("calendar", "pre_market", false),
    ))
}

/// Build the rank-blend parameters from the `[strategy]` section.
pub fn build_strategy_params(config: &dyn ConfigPort) -> Result<RankBlendParams, RotatorError> {
    let defaults = RankBlendParams::default();
    let params = RankBlendParams {
        heat_signal: config
            .get_string("strategy", "heat_signal")
            .unwrap_or(defaults.heat_signal),
        chill_signal: config
            .get_string("strategy", "chill_signal")
            .unwrap_or(defaults.chill_signal),
        heat_lookback: config.get_int("strategy", "heat_lookback", defaults.heat_lookback as i64)
            as usize,
        chill_lookback: config.get_int(
            "strategy",
            "chill_lookback",
            defaults.chill_lookback as i64,
        ) as usize,
        heat_weight: config.get_double("strategy", "heat_weight", defaults.heat_weight),
        top_n: config
            .get_int("strategy", "top_n", defaults.top_n as i64)
            .max(0) as usize,
    };
    params.validate()?;
    Ok(params)
}

/// Build the session range from the `[session]` section. The range covers
/// the whole of both endpoint dates.
pub fn build_session_config(config: &dyn ConfigPort) -> Result<SessionConfig, RotatorError> {
    let start_str = config.get_string("session", "start_date").ok_or_else(|| {
        RotatorError::ConfigMissing {
            section: "session".into(),
            key: "start_date".into(),
        }
    })?;
    let end_str = config.get_string("session", "end_date").ok_or_else(|| {
        RotatorError::ConfigMissing {
            section: "session".into(),
            key: "end_date".into(),
        }
    })?;

    let start_date = parse_date(&start_str, "session", "start_date")?;
    let end_date = parse_date(&end_str, "session", "end_date")?;

    let start = Utc.from_utc_datetime(&start_date.and_time(NaiveTime::MIN));
    let end = Utc.from_utc_datetime(&end_date.and_hms_opt(23, 59, 0).unwrap());

    let burn_in = match config.get_string("session", "burn_in") {
        Some(spec) => Some(parse_burn_in(&spec, start)?),
        None => None,
    };

    Ok(SessionConfig {
        start,
        end,
        burn_in,
    })
}

/// Build the static universe from the `[universe]` section.
pub fn build_universe(config: &dyn ConfigPort) -> Result<StaticUniverse, RotatorError> {
    let assets_str = config.get_string("universe", "assets").ok_or_else(|| {
        RotatorError::ConfigMissing {
            section: "universe".into(),
            key: "assets".into(),
        }
    })?;
    let assets = parse_assets(&assets_str)?;
    Ok(StaticUniverse::new(assets))
}

fn run_calendar(
    config_path: &PathBuf,
    start_override: Option<&str>,
    end_override: Option<&str>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let calendar = match build_calendar(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut session = match build_session_config(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if let Some(start) = start_override {
        match parse_date(start, "session", "start_date") {
            Ok(date) => session.start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }
    if let Some(end) = end_override {
        match parse_date(end, "session", "end_date") {
            Ok(date) => session.end = Utc.from_utc_datetime(&date.and_hms_opt(23, 59, 0).unwrap()),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    let events = calendar.generate(session.start, session.end);

    for event in &events {
        let phase = if event.pre_market {
            "pre-market"
        } else {
            "post-market"
        };
        println!("{} {}", event.at.format("%Y-%m-%d %H:%M:%S"), phase);
    }

    eprintln!(
        "{} rebalance events from {} to {}",
        events.len(),
        session.start.format("%Y-%m-%d"),
        session.end.format("%Y-%m-%d"),
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    type SectionCheck = fn(&dyn ConfigPort) -> Result<(), RotatorError>;
    let checks: [(&str, SectionCheck); 4] = [
        ("calendar", validate_calendar_config),
        ("strategy", validate_strategy_config),
        ("session", validate_session_config),
        ("universe", validate_universe_config),
    ];
    for (section, validate) in checks {
        if let Err(e) = validate(&adapter) {
            eprintln!("error in [{section}]: {e}");
            return (&e).into();
        }
    }

    // Echo the parsed policy so mistakes are visible at a glance
    match build_calendar(&adapter) {
        Ok(calendar) => eprintln!(
            "  calendar: {:?}, {}",
            calendar.schedule,
            if calendar.pre_market {
                "pre-market"
            } else {
                "post-market"
            }
        ),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    match build_strategy_params(&adapter) {
        Ok(params) => eprintln!(
            "  strategy: top {} by {}({}) / {}({}), heat weight {}",
            params.top_n,
            params.heat_signal,
            params.heat_lookback,
            params.chill_signal,
            params.chill_lookback,
            params.heat_weight,
        ),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    match build_universe(&adapter) {
        Ok(universe) => eprintln!("  universe: {} assets", universe.count()),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("Configuration is valid");
    ExitCode::SUCCESS
}
