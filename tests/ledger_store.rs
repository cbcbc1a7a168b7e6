use keepsake::persistence::ModuleRecord;
use keepsake::DeploymentLedger;
use std::path::PathBuf;

fn scratch_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("keepsake-ledger-{}", uuid::Uuid::new_v4()))
        .join("output.json")
}

#[test]
fn missing_ledger_reads_empty() {
    let ledger = DeploymentLedger::load(&scratch_file()).unwrap();
    assert!(ledger.modules.is_empty());
    assert!(ledger.individual.is_empty());
}

/// Records survive a save/load cycle, untouched entries and unknown fields included.
#[test]
fn rewrite_keeps_other_packages_and_unknown_fields() {
    let path = scratch_file();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{
	"other": { "packageObjectId": "0xother", "createdObjects": [], "owner_note": "alice" },
	"nft": { "packageObjectId": false, "createdObjects": [] }
}"#,
    )
    .unwrap();

    let mut ledger = DeploymentLedger::load(&path).unwrap();
    ledger.record_package(
        "nft",
        ModuleRecord {
            package_object_id: Some("0xnew".to_string()),
            market: Some("0xmarket".to_string()),
            ..ModuleRecord::default()
        },
    );
    ledger.record_individual("dev_utils", ModuleRecord::default());
    ledger.save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n\t\""), "ledger should be tab indented: {text}");

    let reloaded = DeploymentLedger::load(&path).unwrap();
    assert_eq!(reloaded, ledger);
    assert_eq!(reloaded.module("other").unwrap().extra["owner_note"], "alice");
    assert_eq!(reloaded.module("nft").unwrap().market().unwrap(), "0xmarket");
    assert!(reloaded.individual.contains_key("dev_utils"));

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}
