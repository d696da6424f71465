//! The dashboard engine: owns the current dataset and runs one
//! synchronous refresh per trigger.
//!
//! FLOW (one direction per refresh):
//!   generator -> snapshot store -> filter engine -> analytics -> view
//!
//! RULES:
//!   - Each refresh reads exactly one published snapshot.
//!   - Regeneration builds a whole new snapshot before publishing it.
//!   - All randomness flows through the RngBank.
//!   - Commands that change state or get rejected are recorded in the
//!     event log. Reads (refresh, options) are not.
//!   - The event log keeps at most `event_capacity` entries; the oldest
//!     are dropped first and ids keep counting up.

use crate::{
    analytics::{self, AnalyticsReport},
    command::DashboardCommand,
    config::DashboardConfig,
    error::{DashError, DashResult},
    event::{DashboardEvent, EventLogEntry},
    export::{self, ExportTables},
    filter::{apply_filters, FilterOptions, FilterSelection, FilteredTables},
    format::KpiStrings,
    generator::MockDataGenerator,
    rng::RngBank,
    snapshot::{RowCounts, Snapshot},
    store::SnapshotStore,
    types::Generation,
};
use serde::Serialize;
use std::{collections::HashSet, path::Path, sync::Arc};

pub const EVENT_LOG_CAPACITY: usize = 4096;

/// What the presentation layer renders after a filter change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub generation: Generation,
    pub selection: FilterSelection,
    pub kpi_strings: KpiStrings,
    pub report: AnalyticsReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Regenerated {
    pub generation: Generation,
    pub counts: RowCounts,
    pub options: FilterOptions,
    /// The published dataset, all four tables.
    pub tables: Arc<Snapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Regenerated(Regenerated),
    View(Box<DashboardView>),
    Exported { path: String, bytes: u64 },
    Options(FilterOptions),
}

pub struct Dashboard {
    config:    DashboardConfig,
    rng_bank:  RngBank,
    store:     Arc<SnapshotStore>,
    selection: FilterSelection,
    events:    Vec<EventLogEntry>,
    next_event_id: u64,
    event_capacity: usize,
}

impl Dashboard {
    /// An engine with an empty generation-0 dataset.
    pub fn new(config: DashboardConfig, seed: u64) -> DashResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng_bank:  RngBank::new(seed),
            store:     Arc::new(SnapshotStore::new()),
            selection: FilterSelection::default(),
            events:    Vec::new(),
            next_event_id: 1,
            event_capacity: EVENT_LOG_CAPACITY,
        })
    }

    /// Keep at most `capacity` event log entries (minimum 1).
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self.trim_events();
        self
    }

    /// Build an engine and publish its first dataset.
    /// Call this instead of new() + regenerate().
    pub fn build(config: DashboardConfig, seed: u64) -> DashResult<Self> {
        let mut dashboard = Self::new(config, seed)?;
        dashboard.regenerate()?;
        Ok(dashboard)
    }

    /// Small dataset for tests.
    pub fn build_test(seed: u64) -> DashResult<Self> {
        Self::build(DashboardConfig::default_test(), seed)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    /// Shared handle for readers on other threads.
    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    pub fn selection(&self) -> FilterSelection {
        self.selection
    }

    pub fn events(&self) -> &[EventLogEntry] {
        &self.events
    }

    pub fn options(&self) -> FilterOptions {
        FilterOptions::from_snapshot(&self.snapshot())
    }

    /// Generate the next dataset and publish it as one unit.
    pub fn regenerate(&mut self) -> DashResult<Regenerated> {
        let generation = self.store.generation() + 1;
        let snapshot = MockDataGenerator::new(&self.config.generator)
            .generate(&self.rng_bank, generation)?;
        let counts = snapshot.row_counts();
        let options = FilterOptions::from_snapshot(&snapshot);
        self.store.publish(snapshot);
        let tables = self.store.current();

        self.record(generation, DashboardEvent::DatasetRegenerated { generation, counts })?;
        Ok(Regenerated { generation, counts, options, tables })
    }

    /// Filtered tables for the current selection.
    pub fn filtered(&self) -> FilteredTables {
        apply_filters(&self.snapshot(), &self.selection)
    }

    /// Select filters and recompute.
    pub fn apply_filters(&mut self, selection: FilterSelection) -> DashResult<DashboardView> {
        self.selection = selection;
        let snapshot = self.snapshot();
        let filtered = apply_filters(&snapshot, &selection);
        let view = self.view_of(&snapshot, &filtered)?;

        self.record(
            snapshot.generation,
            DashboardEvent::FiltersApplied {
                generation: snapshot.generation,
                selection,
                tracking_rows: filtered.tracking.len(),
                payout_rows: filtered.payouts.len(),
            },
        )?;
        Ok(view)
    }

    /// Recompute with the current selection without recording anything.
    pub fn refresh(&self) -> DashResult<DashboardView> {
        let snapshot = self.snapshot();
        let filtered = apply_filters(&snapshot, &self.selection);
        self.view_of(&snapshot, &filtered)
    }

    /// The four tables an export would contain right now.
    ///
    /// With no filter active the whole dataset is exported. Otherwise
    /// influencers and posts are narrowed to the influencers that still
    /// have tracking rows, the same rule payouts follow.
    pub fn export_tables(&self) -> ExportTables {
        let snapshot = self.snapshot();
        let FilteredTables { tracking, payouts } = apply_filters(&snapshot, &self.selection);
        if self.selection.is_unfiltered() {
            return ExportTables {
                tracking,
                payouts,
                influencers: snapshot.influencers.clone(),
                posts: snapshot.posts.clone(),
            };
        }

        let visible: HashSet<&str> = tracking.iter().map(|t| t.influencer_id.as_str()).collect();
        let influencers = snapshot
            .influencers
            .iter()
            .filter(|i| visible.contains(i.id.as_str()))
            .cloned()
            .collect();
        let posts = snapshot
            .posts
            .iter()
            .filter(|p| visible.contains(p.influencer_id.as_str()))
            .cloned()
            .collect();
        ExportTables { tracking, payouts, influencers, posts }
    }

    pub fn export_to(&mut self, path: &Path) -> DashResult<u64> {
        let generation = self.store.generation();
        let bytes = export::export_to_path(path, &self.export_tables())?;
        self.record(
            generation,
            DashboardEvent::ArchiveExported {
                generation,
                path: path.display().to_string(),
                bytes,
            },
        )?;
        Ok(bytes)
    }

    /// Dispatch one trigger. Rejected commands are logged and returned as errors.
    pub fn handle(&mut self, command: DashboardCommand) -> DashResult<CommandOutcome> {
        let name = command.name();
        match self.dispatch(command) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                log::warn!("{name} rejected: {e}");
                let generation = self.store.generation();
                self.record(
                    generation,
                    DashboardEvent::CommandRejected {
                        command: name.to_string(),
                        reason: e.to_string(),
                    },
                )?;
                Err(e)
            }
        }
    }

    fn dispatch(&mut self, command: DashboardCommand) -> DashResult<CommandOutcome> {
        match command {
            DashboardCommand::Regenerate => self.regenerate().map(CommandOutcome::Regenerated),
            DashboardCommand::ApplyFilters { brand, product, category, platform } => {
                let selection = FilterSelection::parse(&brand, &product, &category, &platform)?;
                self.apply_filters(selection)
                    .map(|view| CommandOutcome::View(Box::new(view)))
            }
            DashboardCommand::Refresh => self.refresh().map(|view| CommandOutcome::View(Box::new(view))),
            DashboardCommand::Export { path } => {
                if path.trim().is_empty() {
                    return Err(DashError::invalid("path", "must not be empty"));
                }
                let bytes = self.export_to(Path::new(&path))?;
                Ok(CommandOutcome::Exported { path, bytes })
            }
            DashboardCommand::GetOptions => Ok(CommandOutcome::Options(self.options())),
        }
    }

    fn view_of(&self, snapshot: &Snapshot, filtered: &FilteredTables) -> DashResult<DashboardView> {
        let report = analytics::analyze(
            filtered,
            &snapshot.influencers,
            &snapshot.posts,
            &self.config.analytics,
        )?;
        Ok(DashboardView {
            generation: snapshot.generation,
            selection: self.selection,
            kpi_strings: KpiStrings::from(&report.kpis),
            report,
        })
    }

    fn record(&mut self, generation: Generation, event: DashboardEvent) -> DashResult<()> {
        let entry = EventLogEntry {
            id:         self.next_event_id,
            generation,
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(&event)?,
        };
        self.next_event_id += 1;
        self.events.push(entry);
        self.trim_events();
        Ok(())
    }

    fn trim_events(&mut self) {
        if self.events.len() > self.event_capacity {
            let excess = self.events.len() - self.event_capacity;
            self.events.drain(..excess);
        }
    }
}
