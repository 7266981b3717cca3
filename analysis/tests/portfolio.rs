use prodly_analysis::{
    AnalysisError, Analyzers, ExitStage, MigrationTask, ScoringConfig, VendorProfile,
};

fn profile(id: &str, value: f64, months: u32, custom: bool) -> VendorProfile {
    VendorProfile {
        vendor_id: id.to_string(),
        vendor_name: id.to_uppercase(),
        contract_value: value,
        contract_months: months,
        data_volume_gb: 250.0,
        api_dependencies: 4,
        has_custom_integration: custom,
        switching_cost: value * 0.1,
    }
}

fn task(id: &str, days: u32, deps: &[&str]) -> MigrationTask {
    MigrationTask {
        task_id: id.to_string(),
        task_name: id.to_string(),
        difficulty: 5,
        estimated_days: days,
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
    }
}

fn portfolio() -> Analyzers {
    let mut a = Analyzers::default();
    a.lock_in.add_vendor(profile("crm", 2_000_000.0, 36, true));
    a.lock_in.add_vendor(profile("mail", 100_000.0, 12, false));
    a.lock_in.add_dependency("crm", "mail");

    a.migration.add_task(task("export", 10, &[]));
    a.migration.add_task(task("transform", 5, &["export"]));
    a.migration.add_task(task("load", 5, &["transform"]));
    a
}

#[test]
fn test_end_to_end_assessment() {
    let mut a = portfolio();

    let crm = a.assess_exit("crm", 40.0, 20.0, 70.0).unwrap();
    let mail = a.assess_exit("mail", 90.0, 80.0, 10.0).unwrap();
    assert!(mail > crm, "mail {} should be readier than crm {}", mail, crm);

    let ranked = a.readiness.vendors_by_readiness();
    assert_eq!(ranked[0].0, "mail");
    assert_eq!(ranked[1].0, "crm");

    let path = a.readiness.optimal_exit_path("crm", ExitStage::Exited).unwrap();
    assert_eq!(path.steps.first().map(|s| s.as_str()), Some("crm"));
    assert_eq!(path.steps.last().map(|s| s.as_str()), Some("exited"));
    assert!(path.total_cost.is_finite());
}

#[test]
fn test_assess_unknown_vendor() {
    let mut a = portfolio();
    assert!(matches!(
        a.assess_exit("nobody", 0.0, 0.0, 0.0),
        Err(AnalysisError::UnknownVendor(_))
    ));
}

#[test]
fn test_assess_twice_rejected() {
    let mut a = portfolio();
    a.assess_exit("crm", 40.0, 20.0, 70.0).unwrap();
    assert!(matches!(
        a.assess_exit("crm", 40.0, 20.0, 70.0),
        Err(AnalysisError::DuplicateVendor(_))
    ));
}

#[test]
fn test_cyclic_plan_blocks_assessment() {
    let mut a = portfolio();
    a.migration.add_task(task("export", 10, &["load"]));
    assert!(matches!(
        a.assess_exit("crm", 40.0, 20.0, 70.0),
        Err(AnalysisError::Graph(_))
    ));
    assert_eq!(a.readiness.vendor_count(), 0);
}

#[test]
fn test_config_drives_all_analyzers() {
    let config = ScoringConfig::from_json_str(
        r#"{
            "lock_in": { "custom_integration_points": 0.0 },
            "readiness": { "exit_stage_factor": 0.0 }
        }"#,
    )
    .unwrap();
    let mut a = Analyzers::new(&config);

    let with_custom = a.lock_in.add_vendor(profile("v", 1_000_000.0, 12, true));
    let without = a.lock_in.add_vendor(profile("v", 1_000_000.0, 12, false));
    assert_eq!(with_custom, without);

    a.assess_exit("v", 50.0, 50.0, 50.0).unwrap();
    let full = a.readiness.optimal_exit_path("v", ExitStage::Exited).unwrap();
    let migrated = a
        .readiness
        .optimal_exit_path("v", ExitStage::Migration)
        .unwrap();
    // the final transition is free
    assert_eq!(full.total_cost, migrated.total_cost);
}

#[test]
fn test_dependencies_of_profiled_vendor() {
    let a = portfolio();
    assert_eq!(a.lock_in.dependencies("crm").unwrap(), vec!["mail"]);
    assert_eq!(
        a.migration.migration_sequence().unwrap(),
        vec!["export", "transform", "load"]
    );
}
