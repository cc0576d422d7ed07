#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;
use uuid::Uuid;

use custodia_api::{
    auth::{hash_password, AuthConfig, AuthService, AuthUser, RoleRegistry},
    config::AppConfig,
    db,
    entities::{category, item, location, user},
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

/// Test harness backed by an in-memory SQLite database with the full
/// migration set applied.
pub struct TestApp {
    pub state: AppState,
    pub roles: Arc<RoleRegistry>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            3600,
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let roles = Arc::new(RoleRegistry::builtin());
        let auth_cfg = AuthConfig::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            std::time::Duration::from_secs(cfg.jwt_expiration),
        );
        let auth = Arc::new(AuthService::new(auth_cfg, db_arc.clone(), roles.clone()));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
            auth,
            roles: roles.clone(),
        };

        Self {
            state,
            roles,
            _event_task: event_task,
        }
    }

    /// Inserts a user with the given role and returns both the row and a
    /// matching actor with the role's resolved permissions.
    pub async fn seed_user(&self, name: &str, role: &str) -> (user::Model, AuthUser) {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let record = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.clone()),
            password_hash: Set(hash_password("correct horse").expect("hash")),
            role: Set(role.to_string()),
            active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        let row = record
            .insert(self.state.db.as_ref())
            .await
            .expect("seed user");

        let actor = AuthUser {
            id: row.id,
            name: row.name.clone(),
            email,
            role: role.to_string(),
            permissions: self.roles.role_permissions(role),
        };
        (row, actor)
    }

    pub async fn seed_category(&self, code: &str) -> category::Model {
        category::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.to_string()),
            name: Set(format!("Category {}", code)),
            description: Set(None),
            deleted_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed category")
    }

    pub async fn seed_location(&self, code: &str) -> location::Model {
        location::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.to_string()),
            name: Set(format!("Location {}", code)),
            building: Set(Some("Main".to_string())),
            room: Set(None),
            deleted_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed location")
    }

    /// Inserts an available item referencing freshly seeded category and
    /// location rows.
    pub async fn seed_item(&self, property_number: &str) -> item::Model {
        let cat = self.seed_category(&format!("CAT-{}", property_number)).await;
        let loc = self.seed_location(&format!("LOC-{}", property_number)).await;

        item::ActiveModel {
            id: Set(Uuid::new_v4()),
            property_number: Set(property_number.to_string()),
            serial_number: Set(None),
            barcode: Set(None),
            qr_code: Set(None),
            name: Set(format!("Item {}", property_number)),
            description: Set(None),
            status: Set(item::ItemStatus::Available),
            condition: Set(item::ItemCondition::Good),
            acquisition_cost: Set(dec!(500.00)),
            acquisition_date: Set(Utc::now()),
            warranty_expiry: Set(None),
            category_id: Set(cat.id),
            location_id: Set(loc.id),
            deleted_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed item")
    }

    /// An actor that exists only as a token-holder, not as a user row.
    /// Fine for commands that do not write the actor id as a foreign key.
    pub fn actor_with_role(&self, role: &str) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            name: format!("{} actor", role),
            email: format!("{}@example.com", role),
            role: role.to_string(),
            permissions: self.roles.role_permissions(role),
        }
    }
}
