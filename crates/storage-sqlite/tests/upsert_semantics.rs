//! Integration tests for the ledger upsert semantics on a real SQLite file.

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal_macros::dec;
use tempfile::TempDir;

use fleetdesk_core::closures::{
    ClosureRepositoryTrait, PeriodTotals, ReconciliationResult,
};
use fleetdesk_core::drivers::{DriverRepositoryTrait, NewDriver, Role};
use fleetdesk_core::journeys::{JourneyRepositoryTrait, NewJourney};
use fleetdesk_core::settlements::{SettlementRepositoryTrait, SettlementUpsert};
use fleetdesk_core::statements::StatementRefs;
use fleetdesk_storage_sqlite::closures::ClosureRepository;
use fleetdesk_storage_sqlite::db;
use fleetdesk_storage_sqlite::drivers::DriverRepository;
use fleetdesk_storage_sqlite::journeys::JourneyRepository;
use fleetdesk_storage_sqlite::settlements::SettlementRepository;

struct TestDb {
    // Held so the database file outlives the repositories.
    _tmp: TempDir,
    drivers: DriverRepository,
    journeys: JourneyRepository,
    settlements: SettlementRepository,
    closures: ClosureRepository,
}

#[test]
fn init_creates_the_database_at_the_given_path() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("nested").join("fleet.db");
    let reported = db::init(target.to_str().unwrap()).unwrap();
    assert_eq!(reported, target.to_str().unwrap());
    assert!(target.exists());
}

async fn setup() -> TestDb {
    let tmp = TempDir::new().unwrap();
    let db_path = db::init(&db::get_db_path(tmp.path().to_str().unwrap())).unwrap();
    let pool = db::create_pool(&db_path).unwrap();
    db::run_migrations(&pool).unwrap();
    let writer = db::spawn_writer((*pool).clone());

    TestDb {
        _tmp: tmp,
        drivers: DriverRepository::new(pool.clone(), writer.clone()),
        journeys: JourneyRepository::new(pool.clone(), writer.clone()),
        settlements: SettlementRepository::new(pool.clone(), writer.clone()),
        closures: ClosureRepository::new(pool.clone(), writer.clone()),
    }
}

async fn seed_driver(db: &TestDb, national_id: &str, name: &str) -> String {
    let created = db
        .drivers
        .insert_if_absent(NewDriver {
            national_id: national_id.to_string(),
            password_hash: "$argon2id$unused".to_string(),
            display_name: name.to_string(),
            license: "361".to_string(),
            vehicle_owner: "Elena Fontelles".to_string(),
            role: Role::Driver,
        })
        .await
        .unwrap();
    assert!(created);
    db.drivers
        .find_by_national_id(national_id)
        .unwrap()
        .unwrap()
        .id
}

fn journey_input(date: &str, hours: rust_decimal::Decimal, signature: Option<&str>) -> NewJourney {
    NewJourney {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        shift_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        shift_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        breaks: Vec::new(),
        effective_hours: hours,
        signature: signature.map(str::to_string),
    }
}

fn settlement_input(
    driver_id: &str,
    date: &str,
    takings: rust_decimal::Decimal,
    notes: Option<&str>,
) -> SettlementUpsert {
    SettlementUpsert {
        driver_id: driver_id.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        license: "361".to_string(),
        company: "PROVETAXI".to_string(),
        shift_label: "Mañana".to_string(),
        closing_number: None,
        rides: 10,
        kilometers: dec!(120),
        tickets: 0,
        tariff_tier: "Básica".to_string(),
        takings,
        internal_services: dec!(0),
        toll_incidents: dec!(0),
        card_fees: dec!(0),
        subscriber_revenue: dec!(0),
        fuel: dec!(0),
        gas: dec!(0),
        other_expenses: dec!(0),
        salary_adjustment: dec!(0),
        garnishment: dec!(0),
        company_due: takings,
        driver_share: dec!(0),
        notes: notes.map(str::to_string),
    }
}

#[tokio::test]
async fn driver_provisioning_is_idempotent() {
    let db = setup().await;
    seed_driver(&db, "12345678A", "Raul Maraver").await;

    let created_again = db
        .drivers
        .insert_if_absent(NewDriver {
            national_id: "12345678A".to_string(),
            password_hash: "other-hash".to_string(),
            display_name: "Someone Else".to_string(),
            license: "999".to_string(),
            vehicle_owner: "N/A".to_string(),
            role: Role::Admin,
        })
        .await
        .unwrap();
    assert!(!created_again);

    let stored = db.drivers.find_by_national_id("12345678A").unwrap().unwrap();
    assert_eq!(stored.display_name, "Raul Maraver");
    assert_eq!(db.drivers.list().unwrap().len(), 1);
}

#[tokio::test]
async fn journal_upsert_replaces_in_full_and_keeps_one_row() {
    let db = setup().await;
    let driver_id = seed_driver(&db, "12345678A", "Raul Maraver").await;

    let first = db
        .journeys
        .upsert(&driver_id, journey_input("2025-01-10", dec!(6), Some("sig-1")))
        .await
        .unwrap();
    let second = db
        .journeys
        .upsert(&driver_id, journey_input("2025-01-10", dec!(7.5), None))
        .await
        .unwrap();

    // Same logical row, replaced in full: the omitted signature is cleared.
    assert_eq!(second.id, first.id);
    assert_eq!(second.effective_hours, dec!(7.5));
    assert_eq!(second.signature, None);
    assert_eq!(second.driver_name, "Raul Maraver");

    let all = db.journeys.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].effective_hours, dec!(7.5));
}

#[tokio::test]
async fn journal_listings_are_date_descending_and_scoped() {
    let db = setup().await;
    let raul = seed_driver(&db, "12345678A", "Raul Maraver").await;
    let pedro = seed_driver(&db, "87654321B", "Pedro Cifuentes").await;

    for (driver, date) in [
        (&raul, "2025-01-10"),
        (&pedro, "2025-01-12"),
        (&raul, "2025-01-11"),
    ] {
        db.journeys
            .upsert(driver, journey_input(date, dec!(5), None))
            .await
            .unwrap();
    }

    let all = db.journeys.list_all().unwrap();
    let dates: Vec<String> = all.iter().map(|j| j.date.to_string()).collect();
    assert_eq!(dates, vec!["2025-01-12", "2025-01-11", "2025-01-10"]);

    let own = db.journeys.list_for_driver(&raul).unwrap();
    assert_eq!(own.len(), 2);
    assert!(own.iter().all(|j| j.driver_id == raul));
}

#[tokio::test]
async fn settlement_upsert_is_full_replace_per_driver_and_date() {
    let db = setup().await;
    let driver_id = seed_driver(&db, "12345678A", "Raul Maraver").await;

    db.settlements
        .upsert(settlement_input(&driver_id, "2025-01-15", dec!(100), Some("primera")))
        .await
        .unwrap();
    let replaced = db
        .settlements
        .upsert(settlement_input(&driver_id, "2025-01-15", dec!(250), None))
        .await
        .unwrap();

    assert_eq!(replaced.takings, dec!(250));
    assert_eq!(replaced.notes, None);

    let all = db.settlements.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].takings, dec!(250));
}

#[tokio::test]
async fn settlement_range_covers_the_month_inclusively() {
    let db = setup().await;
    let driver_id = seed_driver(&db, "12345678A", "Raul Maraver").await;

    for (date, takings) in [
        ("2024-12-31", dec!(1)),
        ("2025-01-01", dec!(10)),
        ("2025-01-31", dec!(20)),
        ("2025-02-01", dec!(2)),
    ] {
        db.settlements
            .upsert(settlement_input(&driver_id, date, takings, None))
            .await
            .unwrap();
    }

    let january = db
        .settlements
        .list_range(
            &driver_id,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .unwrap();
    assert_eq!(january.len(), 2);
    assert_eq!(january[0].takings, dec!(10));
    assert_eq!(january[1].takings, dec!(20));
}

#[tokio::test]
async fn attach_statements_merges_per_source_and_save_result_keeps_refs() {
    let db = setup().await;
    let driver_id = seed_driver(&db, "12345678A", "Raul Maraver").await;

    db.closures
        .attach_statements(
            &driver_id,
            2025,
            1,
            &StatementRefs {
                bank: Some("1-banco.csv".to_string()),
                freenow: Some("2-freenow.csv".to_string()),
                uber: None,
            },
        )
        .await
        .unwrap();

    // Re-uploading the bank statement must not disturb the freenow slot.
    let merged = db
        .closures
        .attach_statements(
            &driver_id,
            2025,
            1,
            &StatementRefs {
                bank: Some("3-banco-v2.csv".to_string()),
                freenow: None,
                uber: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(merged.statements.bank.as_deref(), Some("3-banco-v2.csv"));
    assert_eq!(merged.statements.freenow.as_deref(), Some("2-freenow.csv"));
    assert!(merged.statements.uber.is_none());
    assert!(merged.result.is_none());

    let result = ReconciliationResult {
        totals: PeriodTotals {
            company_due: dec!(100),
            rides: 12,
            kilometers: dec!(140),
            takings: dec!(180),
            days_recorded: 2,
        },
        flags: Vec::new(),
        skipped: Vec::new(),
        processed_at: Utc::now(),
    };
    let processed = db
        .closures
        .save_result(&driver_id, 2025, 1, &result)
        .await
        .unwrap();
    assert_eq!(processed.statements.bank.as_deref(), Some("3-banco-v2.csv"));
    assert_eq!(processed.result.as_ref().unwrap().totals, result.totals);

    // Saving a second result replaces the first in full.
    let second = ReconciliationResult {
        totals: PeriodTotals {
            company_due: dec!(999),
            rides: 1,
            kilometers: dec!(1),
            takings: dec!(1),
            days_recorded: 1,
        },
        flags: Vec::new(),
        skipped: Vec::new(),
        processed_at: Utc::now(),
    };
    db.closures
        .save_result(&driver_id, 2025, 1, &second)
        .await
        .unwrap();

    let stored = db.closures.find(&driver_id, 2025, 1).unwrap().unwrap();
    assert_eq!(stored.result.as_ref().unwrap().totals.company_due, dec!(999));
    assert_eq!(db.closures.list_for_driver(&driver_id).unwrap().len(), 1);
}
