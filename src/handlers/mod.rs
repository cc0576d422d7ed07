pub mod assignments;
pub mod categories;
pub mod disposals;
pub mod items;
pub mod locations;
pub mod maintenance;
pub mod requests;
pub mod returns;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub items: Arc<crate::services::items::ItemService>,
    pub categories: Arc<crate::services::categories::CategoryService>,
    pub locations: Arc<crate::services::locations::LocationService>,
    pub assignments: Arc<crate::services::assignments::AssignmentService>,
    pub returns: Arc<crate::services::returns::ReturnService>,
    pub disposals: Arc<crate::services::disposals::DisposalService>,
    pub maintenance: Arc<crate::services::maintenance::MaintenanceService>,
    pub requests: Arc<crate::services::requests::RequestService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            items: Arc::new(crate::services::items::ItemService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            categories: Arc::new(crate::services::categories::CategoryService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            locations: Arc::new(crate::services::locations::LocationService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            assignments: Arc::new(crate::services::assignments::AssignmentService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            returns: Arc::new(crate::services::returns::ReturnService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            disposals: Arc::new(crate::services::disposals::DisposalService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            maintenance: Arc::new(crate::services::maintenance::MaintenanceService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            requests: Arc::new(crate::services::requests::RequestService::new(
                db_pool,
                event_sender,
            )),
        }
    }
}
