//! OpenAPI component registry for the JSON surface.

use utoipa::OpenApi;

use crate::auth::{LoginRequest, TokenResponse};
use crate::entities::{
    disposal::{DisposalMethod, DisposalStatus},
    item::{ItemCondition, ItemStatus},
    item_return::ReturnStatus,
    maintenance::{MaintenancePriority, MaintenanceStatus, MaintenanceType},
    request::{RequestPriority, RequestStatus, RequestType},
};
use crate::errors::ErrorResponse;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Custodia API",
        description = "Institutional asset management backend",
        license(name = "MIT")
    ),
    components(schemas(
        ErrorResponse,
        LoginRequest,
        TokenResponse,
        ItemStatus,
        ItemCondition,
        ReturnStatus,
        DisposalStatus,
        DisposalMethod,
        MaintenanceStatus,
        MaintenanceType,
        MaintenancePriority,
        RequestStatus,
        RequestType,
        RequestPriority,
        handlers::items::CreateItemRequest,
        handlers::items::UpdateItemRequest,
        handlers::assignments::CreateAssignmentRequest,
        handlers::assignments::ReturnAssignmentRequest,
        handlers::returns::InspectReturnRequest,
        handlers::returns::RejectReturnRequest,
        handlers::disposals::CreateDisposalRequest,
        handlers::disposals::RejectDisposalRequest,
        handlers::disposals::ExecuteDisposalRequest,
        handlers::maintenance::CreateMaintenanceRequest,
        handlers::maintenance::ScheduleMaintenanceRequest,
        handlers::maintenance::CompleteMaintenanceRequest,
        handlers::requests::SubmitRequestRequest,
        handlers::requests::UpdateRequestRequest,
        handlers::requests::AddCommentRequest,
        handlers::requests::RequestDetail,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert!(doc.components.is_some());
    }
}
