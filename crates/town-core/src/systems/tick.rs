//! Tick Driver
//!
//! Runs the town one tick at a time. Every agent plans, acts and is observed
//! first; only then do agents rate, remember and move, so everyone acts
//! against the rosters left by the previous tick. Splitting the tick into
//! these two phases is deliberate: a move made early in the order must not
//! change who a later agent acts alongside.

use town_events::{EventKind, Hour, MoveResult, SimTimestamp, TownSnapshot};
use town_oracle::TextOracle;

use crate::config::{SimulationConfig, Topic};
use crate::error::SimError;
use crate::output::{listing_header, EventLogger, Transcript};
use crate::prompts;
use crate::systems::perception::{AgentId, Town};

/// Counts for one completed tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub hour: Hour,
    pub actions: usize,
    pub observations: usize,
    pub moves: usize,
    pub rejected_moves: usize,
    /// Rating replies with no number in them, scored 0
    pub unparsed_ratings: usize,
}

/// Drives a town through its ticks and owns the clock.
pub struct Simulation<O = Box<dyn TextOracle>> {
    town: Town,
    oracle: O,
    settings: SimulationConfig,
    transcript: Transcript,
    events: EventLogger,
    clock: SimTimestamp,
}

impl<O: TextOracle> Simulation<O> {
    pub fn new(
        town: Town,
        oracle: O,
        settings: SimulationConfig,
        transcript: Transcript,
        events: EventLogger,
    ) -> Self {
        let clock = SimTimestamp::start(Hour(settings.start_hour));
        Self {
            town,
            oracle,
            settings,
            transcript,
            events,
            clock,
        }
    }

    pub fn town(&self) -> &Town {
        &self.town
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Timestamp of the next tick to run
    pub fn clock(&self) -> SimTimestamp {
        self.clock
    }

    pub fn run_id(&self) -> &str {
        self.events.run_id()
    }

    pub fn snapshot(&self) -> TownSnapshot {
        self.town.snapshot(self.events.run_id(), self.clock)
    }

    /// Run the configured number of ticks.
    ///
    /// Stops at the first oracle or output failure.
    pub fn run(&mut self) -> Result<Vec<TickReport>, SimError> {
        let mut reports = Vec::new();
        for _ in 0..self.settings.repeats {
            reports.push(self.step()?);
        }
        self.flush()?;
        Ok(reports)
    }

    /// Flush the transcript and event log to disk
    pub fn flush(&mut self) -> Result<(), SimError> {
        self.transcript.flush()?;
        self.events.flush()?;
        Ok(())
    }

    /// Run a single tick and advance the clock.
    pub fn step(&mut self) -> Result<TickReport, SimError> {
        let timestamp = self.clock;
        let span = tracing::info_span!("tick", tick = timestamp.tick, hour = %timestamp.hour);
        let _enter = span.enter();

        let locations: Vec<String> = self
            .town
            .directory()
            .names()
            .into_iter()
            .map(String::from)
            .collect();
        self.transcript
            .begin_tick(timestamp.tick, locations.iter().map(String::as_str));
        self.transcript.note(Topic::Locations, &listing_header(timestamp.tick));
        let listing = self.town.listing();
        self.transcript.note(Topic::Locations, &format!("{listing}\n"));

        let mut report = TickReport {
            tick: timestamp.tick,
            hour: timestamp.hour,
            ..TickReport::default()
        };

        let order = self.town.location_index().visiting_order();
        let phases = self
            .act_phase(timestamp, &order, &mut report)
            .and_then(|_| self.settle_phase(timestamp, &order, &mut report));

        let sections = match phases {
            Ok(()) => self.transcript.finish_tick()?,
            Err(e) => {
                if let Err(io) = self.transcript.finish_tick() {
                    tracing::warn!(error = %io, "failed to write partial tick");
                }
                tracing::warn!(error = %e, "tick aborted");
                return Err(e);
            }
        };

        if self.settings.summarize {
            for section in sections.iter().filter(|s| s.has_entries) {
                let summary = self.oracle.generate(&prompts::summary(&section.text))?;
                self.transcript.summary(section, &summary)?;
            }
        }

        tracing::info!(
            actions = report.actions,
            observations = report.observations,
            moves = report.moves,
            rejected = report.rejected_moves,
            unparsed = report.unparsed_ratings,
            "tick complete"
        );
        self.clock.advance();
        Ok(report)
    }

    /// Plan, act and broadcast for every agent.
    fn act_phase(
        &mut self,
        timestamp: SimTimestamp,
        order: &[(String, AgentId)],
        report: &mut TickReport,
    ) -> Result<(), SimError> {
        for (here, id) in order {
            self.act(timestamp, here, *id, report)
                .map_err(|e| self.agent_failed(*id, e))?;
        }
        Ok(())
    }

    /// Rate memories, compress them, rate locations and move, per agent.
    fn settle_phase(
        &mut self,
        timestamp: SimTimestamp,
        order: &[(String, AgentId)],
        report: &mut TickReport,
    ) -> Result<(), SimError> {
        for (here, id) in order {
            self.settle(timestamp, here, *id, report)
                .map_err(|e| self.agent_failed(*id, e))?;
        }
        Ok(())
    }

    fn agent_failed(&self, id: AgentId, error: SimError) -> SimError {
        let agent = self.town.agent(id);
        tracing::warn!(
            agent = %agent.name(),
            phase = ?agent.phase(),
            error = %error,
            "agent could not finish its turn"
        );
        error
    }

    fn act(
        &mut self,
        timestamp: SimTimestamp,
        here: &str,
        id: AgentId,
        report: &mut TickReport,
    ) -> Result<(), SimError> {
        let hour = timestamp.hour;
        let name = self.town.agent(id).name().to_string();

        let plans = self.town.agent_mut(id).plan(&mut self.oracle, hour)?.to_string();
        self.transcript
            .record(here, Topic::Plans, &format!("{name} plans: {plans}"));
        self.events.emit(timestamp, &name, here, EventKind::Plan { plans })?;

        let location = self.town.location(here)?.clone();
        let company = self.town.company_of(id);
        let action = self
            .town
            .agent_mut(id)
            .execute_action(&mut self.oracle, hour, &location, &company)?;
        self.transcript
            .record(here, Topic::Actions, &format!("{name} action: {action}"));
        self.events.emit(
            timestamp,
            &name,
            here,
            EventKind::Action {
                action: action.clone(),
                company: company.into_iter().map(|a| a.name).collect(),
            },
        )?;
        report.actions += 1;

        for recipient in self.town.broadcast(id, hour, &action) {
            let observer = self.town.agent(recipient).name().to_string();
            self.events.emit(
                timestamp,
                &observer,
                here,
                EventKind::Observation {
                    source: name.clone(),
                    text: action.clone(),
                },
            )?;
            report.observations += 1;
        }
        Ok(())
    }

    fn settle(
        &mut self,
        timestamp: SimTimestamp,
        here: &str,
        id: AgentId,
        report: &mut TickReport,
    ) -> Result<(), SimError> {
        let hour = timestamp.hour;
        let policy = self.settings.rating_policy();
        let name = self.town.agent(id).name().to_string();

        let ratings = self
            .town
            .agent_mut(id)
            .rate_memories(&mut self.oracle, hour, policy)?
            .to_vec();
        for rated in &ratings {
            self.transcript.record(
                here,
                Topic::Ratings,
                &format!("{name} rates memory {}: {}", rated.memory, rated.rating),
            );
        }
        self.events
            .emit(timestamp, &name, here, EventKind::MemoryRatings { ratings })?;

        let recollection = self
            .town
            .agent(id)
            .compress_memories(hour, self.settings.memory_limit);
        self.transcript
            .record(here, Topic::Memories, &format!("{name} remembers: {recollection}"));
        self.events
            .emit(timestamp, &name, here, EventKind::Recollection { recollection })?;

        let places = self
            .town
            .rate_locations(id, &mut self.oracle, hour, policy)?
            .to_vec();
        for place in &places {
            self.transcript.record(
                here,
                Topic::Ratings,
                &format!("{name} rates {}: {}", place.location, place.rating),
            );
        }
        self.events
            .emit(timestamp, &name, here, EventKind::PlaceRatings { ratings: places })?;
        report.unparsed_ratings += self.town.agent_mut(id).take_unparsed();

        let target = self
            .town
            .agent(id)
            .preferred_destination()
            .map(String::from);
        if let Some(target) = target {
            let outcome = self.town.move_agent(id, &target);
            self.transcript
                .record(here, Topic::Locations, &format!("{name} {outcome}"));
            match outcome.result() {
                MoveResult::Moved => report.moves += 1,
                MoveResult::Unreachable => report.rejected_moves += 1,
                MoveResult::Stayed => {}
            }
            self.events.emit(
                timestamp,
                &name,
                here,
                EventKind::Movement {
                    from: here.to_string(),
                    to: target,
                    result: outcome.result(),
                },
            )?;
        }
        Ok(())
    }
}
