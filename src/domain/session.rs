//! Backtest session driver.
//!
//! Walks business days in order, feeding one observation period per session
//! date to the signal set and evaluating the alpha model at each rebalance
//! event. Pre-market events run before that day's close is observed,
//! post-market events after. The output is the ordered target-allocation
//! history; execution, fees, and statistics are out of scope.

use chrono::{DateTime, Utc};

use crate::domain::alpha::AlphaModel;
use crate::domain::calendar::{business_days_between, RebalanceCalendar, RebalanceEvent};
use crate::domain::error::RotatorError;
use crate::domain::signals::SignalSet;
use crate::domain::weights::TargetWeights;
use crate::ports::data_port::DataPort;
use crate::ports::universe_port::UniversePort;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Events before this instant are suppressed while signals warm up from
    /// `start`.
    pub burn_in: Option<DateTime<Utc>>,
}

/// One evaluated rebalance event.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRecord {
    pub at: DateTime<Utc>,
    pub weights: TargetWeights,
}

#[derive(Debug, Clone, Default)]
pub struct SessionResult {
    /// Target allocations in strictly increasing event order.
    pub allocations: Vec<AllocationRecord>,
    /// Session dates that produced an observation.
    pub observation_days: usize,
}

/// Run one simulation: generate the calendar once, then evaluate the model
/// at every event in order.
///
/// Independent sessions share no mutable state and may run concurrently.
pub fn run_session(
    config: &SessionConfig,
    calendar: &RebalanceCalendar,
    model: &AlphaModel,
    universe: &dyn UniversePort,
    signals: &mut SignalSet,
    data: &dyn DataPort,
) -> Result<SessionResult, RotatorError> {
    let events: Vec<RebalanceEvent> = calendar
        .generate(config.start, config.end)
        .into_iter()
        .filter(|event| config.burn_in.is_none_or(|burn_in| event.at >= burn_in))
        .collect();

    let mut pending = events.into_iter().peekable();
    let mut result = SessionResult::default();
    let signal_names = model.signal_names();

    for day in business_days_between(config.start.date_naive(), config.end.date_naive()) {
        // Events dated before this session day (weekend or holiday-dated
        // timestamps) and this day's pre-market events are evaluated against
        // the observations accumulated so far.
        while let Some(event) = pending.next_if(|event| {
            let event_date = event.at.date_naive();
            event_date < day || (event_date == day && event.pre_market)
        }) {
            evaluate_event(&event, model, universe, signals, &signal_names, &mut result)?;
        }

        let closes = data.close_prices(day)?;
        if !closes.is_empty() {
            signals.observe(&closes);
            result.observation_days += 1;
        }

        while let Some(event) = pending.next_if(|event| event.at.date_naive() == day) {
            evaluate_event(&event, model, universe, signals, &signal_names, &mut result)?;
        }
    }

    // Anchors shifted past the end of the range still get their evaluation;
    // the calendar guarantee is one call per emitted event.
    for event in pending {
        evaluate_event(&event, model, universe, signals, &signal_names, &mut result)?;
    }

    Ok(result)
}

fn evaluate_event(
    event: &RebalanceEvent,
    model: &AlphaModel,
    universe: &dyn UniversePort,
    signals: &SignalSet,
    signal_names: &[&str],
    result: &mut SessionResult,
) -> Result<(), RotatorError> {
    let warmup = signals.min_warmup(signal_names)?;
    let weights = model.evaluate(event.at, universe, signals, warmup)?;
    result.allocations.push(AllocationRecord {
        at: event.at,
        weights,
    });
    Ok(())
}
