use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use fleetdesk_core::closures::{ClosureService, ClosureServiceTrait};
use fleetdesk_core::drivers::{DriverService, DriverServiceTrait, Role, SeedDriver};
use fleetdesk_core::journeys::{JourneyService, JourneyServiceTrait};
use fleetdesk_core::settlements::{SettlementService, SettlementServiceTrait};
use fleetdesk_core::statements::{
    CsvStatementParser, DiskStatementStore, StatementParserTrait, StatementService,
    StatementServiceTrait, StatementStoreTrait,
};
use fleetdesk_storage_sqlite::{
    closures::ClosureRepository, db, drivers::DriverRepository, journeys::JourneyRepository,
    settlements::SettlementRepository,
};

use crate::{auth::AuthManager, config::Config};

/// Accounts created at startup when absent. Passwords are initial
/// credentials for a closed fleet; rotation is out of band.
const SEED_DRIVERS: &[SeedDriver] = &[
    SeedDriver {
        national_id: "12345678A",
        password: "taxi361",
        display_name: "Raul Maraver",
        license: "361",
        vehicle_owner: "Elena Fontelles",
        role: Role::Driver,
    },
    SeedDriver {
        national_id: "87654321B",
        password: "taxi1061",
        display_name: "Ivan Alsina",
        license: "1061",
        vehicle_owner: "Ivan Tintoré",
        role: Role::Driver,
    },
    SeedDriver {
        national_id: "11223344C",
        password: "taxi092",
        display_name: "Salvador Carmona",
        license: "092",
        vehicle_owner: "Ivan Tintoré",
        role: Role::Driver,
    },
    SeedDriver {
        national_id: "99887766D",
        password: "admin2025",
        display_name: "Elena Fontelles",
        license: "ADMIN",
        vehicle_owner: "Elena Fontelles",
        role: Role::Admin,
    },
];

pub struct AppState {
    pub driver_service: Arc<dyn DriverServiceTrait>,
    pub journey_service: Arc<dyn JourneyServiceTrait>,
    pub settlement_service: Arc<dyn SettlementServiceTrait>,
    pub statement_service: Arc<dyn StatementServiceTrait>,
    pub closure_service: Arc<dyn ClosureServiceTrait>,
    pub auth: Arc<AuthManager>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("FD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let driver_repo = Arc::new(DriverRepository::new(pool.clone(), writer.clone()));
    let driver_service: Arc<dyn DriverServiceTrait> = Arc::new(DriverService::new(driver_repo)?);
    let created = driver_service.provision(SEED_DRIVERS).await?;
    if created > 0 {
        tracing::info!("Provisioned {created} seed accounts");
    }

    let journey_repo = Arc::new(JourneyRepository::new(pool.clone(), writer.clone()));
    let journey_service: Arc<dyn JourneyServiceTrait> =
        Arc::new(JourneyService::new(journey_repo));

    let settlement_repo = Arc::new(SettlementRepository::new(pool.clone(), writer.clone()));
    let settlement_service: Arc<dyn SettlementServiceTrait> =
        Arc::new(SettlementService::new(settlement_repo.clone()));

    let closure_repo = Arc::new(ClosureRepository::new(pool.clone(), writer.clone()));
    let statement_store: Arc<dyn StatementStoreTrait> =
        Arc::new(DiskStatementStore::new(&config.uploads_dir)?);
    let statement_parser: Arc<dyn StatementParserTrait> =
        Arc::new(CsvStatementParser::new(statement_store.clone()));
    let statement_service: Arc<dyn StatementServiceTrait> = Arc::new(StatementService::new(
        statement_store,
        closure_repo.clone(),
        driver_service.clone(),
        config.classifier.clone(),
    ));
    let closure_service: Arc<dyn ClosureServiceTrait> = Arc::new(ClosureService::new(
        closure_repo,
        settlement_repo,
        driver_service.clone(),
        statement_parser,
        config.tolerance,
    ));

    let auth = Arc::new(AuthManager::new(&config.secret_key, config.token_ttl));

    Ok(Arc::new(AppState {
        driver_service,
        journey_service,
        settlement_service,
        statement_service,
        closure_service,
        auth,
        db_path,
    }))
}
