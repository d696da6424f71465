//! Dashboard engine: regeneration, commands, event log, determinism.

mod common;

use influencer_core::{
    command::DashboardCommand,
    config::DashboardConfig,
    engine::{CommandOutcome, Dashboard},
    error::DashError,
    filter::FilterSelection,
    format::KpiStrings,
};

fn filters(brand: &str, product: &str, category: &str, platform: &str) -> DashboardCommand {
    DashboardCommand::ApplyFilters {
        brand: brand.into(),
        product: product.into(),
        category: category.into(),
        platform: platform.into(),
    }
}

#[test]
fn build_publishes_generation_one_with_default_counts() {
    common::init_logging();
    let dashboard = Dashboard::build(DashboardConfig::default(), 42).unwrap();
    let snap = dashboard.snapshot();
    assert_eq!(snap.generation, 1);
    assert_eq!(snap.influencers.len(), 20);
    assert_eq!(snap.posts.len(), 100);
    assert_eq!(snap.tracking.len(), 300);
    assert_eq!(snap.payouts.len(), 100);
}

#[test]
fn regenerate_swaps_the_whole_dataset() {
    let mut dashboard = Dashboard::build_test(7).unwrap();
    let before = dashboard.snapshot();

    let regenerated = dashboard.regenerate().unwrap();
    let after = dashboard.snapshot();

    assert_eq!(regenerated.generation, 2);
    assert_eq!(after.generation, 2);
    assert_eq!(before.generation, 1, "held snapshot is untouched");
    assert_ne!(before.influencers, after.influencers);

    // Every table of the new snapshot points at the new influencers.
    let ids: std::collections::HashSet<&str> =
        after.influencers.iter().map(|i| i.id.as_str()).collect();
    assert!(after.tracking.iter().all(|t| ids.contains(t.influencer_id.as_str())));
    assert!(after.payouts.iter().all(|p| ids.contains(p.influencer_id.as_str())));
    assert_eq!(regenerated.options.brands[0], "All");
}

#[test]
fn same_seed_builds_identical_dashboards() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;
    let mut a = Dashboard::build_test(SEED).unwrap();
    let mut b = Dashboard::build_test(SEED).unwrap();
    a.regenerate().unwrap();
    b.regenerate().unwrap();

    assert_eq!(*a.snapshot(), *b.snapshot());
    assert_eq!(a.refresh().unwrap(), b.refresh().unwrap());
}

#[test]
fn different_seeds_produce_different_data() {
    let a = Dashboard::build_test(42).unwrap();
    let b = Dashboard::build_test(99).unwrap();
    assert_ne!(a.snapshot().tracking, b.snapshot().tracking);
}

#[test]
fn apply_filters_command_returns_a_view() {
    let mut dashboard = Dashboard::build_test(11).unwrap();
    let outcome = dashboard.handle(filters("All", "All", "All", "All")).unwrap();
    let CommandOutcome::View(view) = outcome else {
        panic!("expected a view");
    };
    assert_eq!(view.generation, 1);
    assert_eq!(view.kpi_strings, KpiStrings::from(&view.report.kpis));
    assert!(view.report.kpis.total_revenue > 0);
    assert!(view.report.rankings.top_by_revenue.len() <= 5);
}

#[test]
fn filters_persist_until_changed() {
    let mut dashboard = Dashboard::build_test(12).unwrap();
    let selection = FilterSelection::parse("Gritzo", "All", "All", "All").unwrap();
    dashboard.apply_filters(selection).unwrap();

    let view = dashboard.refresh().unwrap();
    assert_eq!(view.selection, selection);
    assert!(dashboard.filtered().tracking.iter().all(|t| t.brand.label() == "Gritzo"));

    // A regeneration keeps the selection and applies it to the new data.
    dashboard.handle(DashboardCommand::Regenerate).unwrap();
    assert_eq!(dashboard.refresh().unwrap().generation, 2);
    assert_eq!(dashboard.selection(), selection);
}

#[test]
fn unknown_filter_value_is_rejected_and_logged() {
    let mut dashboard = Dashboard::build_test(13).unwrap();
    let err = dashboard.handle(filters("All", "Whey", "All", "All")).unwrap_err();
    assert!(matches!(err, DashError::InvalidParameter { ref name, .. } if name == "product"));

    let last = dashboard.events().last().unwrap();
    assert_eq!(last.event_type, "command_rejected");
    assert!(last.payload.contains("Whey"));
    assert!(dashboard.selection().is_unfiltered(), "rejected filters are not applied");
}

#[test]
fn empty_export_path_is_rejected() {
    let mut dashboard = Dashboard::build_test(14).unwrap();
    let err = dashboard
        .handle(DashboardCommand::Export { path: "  ".into() })
        .unwrap_err();
    assert!(matches!(err, DashError::InvalidParameter { .. }));
}

#[test]
fn export_command_writes_archive_and_records_event() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.zip");
    let mut dashboard = Dashboard::build_test(15).unwrap();

    let outcome = dashboard
        .handle(DashboardCommand::Export { path: path.display().to_string() })
        .unwrap();
    match outcome {
        CommandOutcome::Exported { bytes, .. } => assert!(bytes > 0),
        other => panic!("expected Exported, got {other:?}"),
    }
    assert!(path.exists());
    assert_eq!(dashboard.events().last().unwrap().event_type, "archive_exported");
}

#[test]
fn event_log_records_state_changes_in_order() {
    let mut dashboard = Dashboard::build_test(16).unwrap();
    dashboard.handle(filters("MuscleBlaze", "All", "All", "Instagram")).unwrap();
    dashboard.handle(DashboardCommand::Regenerate).unwrap();

    let types: Vec<&str> = dashboard.events().iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["dataset_regenerated", "filters_applied", "dataset_regenerated"]);

    let ids: Vec<u64> = dashboard.events().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let payload: serde_json::Value =
        serde_json::from_str(&dashboard.events()[1].payload).unwrap();
    assert_eq!(payload["type"], "filters_applied");
    assert_eq!(payload["selection"]["brand"], "MuscleBlaze");
    assert_eq!(payload["selection"]["platform"], "Instagram");
}

#[test]
fn outcomes_serialize_for_the_presentation_layer() {
    let mut dashboard = Dashboard::build_test(17).unwrap();
    let outcome = dashboard.handle(DashboardCommand::GetOptions).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["outcome"], "options");
    assert_eq!(json["categories"][0], "All");

    let outcome = dashboard.handle(filters("All", "All", "All", "All")).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["outcome"], "view");
    assert!(json["report"]["kpis"]["total_revenue"].is_u64());

    let outcome = dashboard.handle(DashboardCommand::Regenerate).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["outcome"], "regenerated");
    assert_eq!(json["generation"], 2);
    assert_eq!(json["tables"]["influencers"].as_array().unwrap().len(), 8);
    assert_eq!(json["tables"]["posts"].as_array().unwrap().len(), 24);
    assert_eq!(json["tables"]["tracking"].as_array().unwrap().len(), 48);
    assert_eq!(json["tables"]["payouts"].as_array().unwrap().len(), 24);
    assert_eq!(json["options"]["brands"][0], "All");
}

#[test]
fn regenerated_outcome_hands_back_the_published_dataset() {
    let mut dashboard = Dashboard::build_test(19).unwrap();
    let regenerated = dashboard.regenerate().unwrap();
    assert_eq!(regenerated.tables.generation, regenerated.generation);
    assert_eq!(*regenerated.tables, *dashboard.snapshot());
}

#[test]
fn reads_leave_the_event_log_alone() {
    let mut dashboard = Dashboard::build_test(20).unwrap();
    dashboard.handle(DashboardCommand::Refresh).unwrap();
    dashboard.handle(DashboardCommand::GetOptions).unwrap();
    assert_eq!(dashboard.events().len(), 1);
}

#[test]
fn event_log_drops_oldest_entries_past_capacity() {
    let mut dashboard = Dashboard::build_test(21).unwrap().with_event_capacity(2);
    for _ in 0..3 {
        dashboard.handle(filters("All", "All", "All", "All")).unwrap();
    }

    let ids: Vec<u64> = dashboard.events().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![3, 4]);
    assert!(dashboard.events().iter().all(|e| e.event_type == "filters_applied"));
}

#[test]
fn readers_on_other_threads_see_whole_snapshots() {
    let mut dashboard = Dashboard::build_test(18).unwrap();
    let store = dashboard.store();
    let reader = std::thread::spawn(move || {
        for _ in 0..50 {
            let snap = store.current();
            let ids: std::collections::HashSet<&str> =
                snap.influencers.iter().map(|i| i.id.as_str()).collect();
            assert!(snap.tracking.iter().all(|t| ids.contains(t.influencer_id.as_str())));
        }
    });
    for _ in 0..10 {
        dashboard.regenerate().unwrap();
    }
    reader.join().unwrap();
    assert_eq!(dashboard.snapshot().generation, 11);
}
