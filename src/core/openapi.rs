use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::access::UserRole;
use crate::features::approvals::{
    dtos as approvals_dtos, handlers as approvals_handlers, models as approvals_models,
};
use crate::features::desa::{dtos as desa_dtos, handlers as desa_handlers, models as desa_models};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers, models as files_models};
use crate::features::investments::{
    dtos as investments_dtos, handlers as investments_handlers, models as investments_models,
};
use crate::features::locations::{
    dtos as locations_dtos, handlers as locations_handlers, models as locations_models,
};
use crate::features::recommendations::{
    dtos as recommendations_dtos, handlers as recommendations_handlers,
    models as recommendations_models,
};
use crate::features::regions::{dtos as regions_dtos, handlers as regions_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Regions (public)
        regions_handlers::list_kecamatan,
        regions_handlers::list_desa_in_kecamatan,
        // Locations
        locations_handlers::list_locations,
        locations_handlers::get_location,
        locations_handlers::create_location,
        locations_handlers::list_my_locations,
        locations_handlers::admin_list_locations,
        locations_handlers::update_location,
        locations_handlers::delete_location,
        locations_handlers::approve_location,
        locations_handlers::reject_location,
        // Investments
        investments_handlers::list_investments,
        investments_handlers::get_investment,
        investments_handlers::create_investment,
        investments_handlers::list_my_investments,
        investments_handlers::admin_list_investments,
        investments_handlers::update_investment,
        investments_handlers::delete_investment,
        investments_handlers::approve_investment,
        investments_handlers::reject_investment,
        // Desa
        desa_handlers::list_desa,
        desa_handlers::get_desa,
        desa_handlers::create_desa,
        desa_handlers::update_desa,
        desa_handlers::delete_desa,
        // Approvals (staff)
        approvals_handlers::list_approvals,
        approvals_handlers::approval_stats,
        approvals_handlers::approve_approval,
        approvals_handlers::reject_approval,
        // Recommendations
        recommendations_handlers::get_recommendation,
        recommendations_handlers::generate_recommendation,
        recommendations_handlers::invalidate_recommendation,
        // Users
        users_handlers::register_profile,
        users_handlers::get_me,
        users_handlers::username_availability,
        users_handlers::list_users,
        users_handlers::change_role,
        users_handlers::delete_user,
        // Files
        files_handlers::upload_file,
        files_handlers::delete_file_by_url,
    ),
    components(
        schemas(
            // Shared
            Meta,
            UserRole,
            approvals_models::RecordStatus,
            approvals_models::SubmissionKind,
            // Regions
            regions_dtos::KecamatanResponseDto,
            regions_dtos::DesaNameDto,
            ApiResponse<Vec<regions_dtos::KecamatanResponseDto>>,
            ApiResponse<Vec<regions_dtos::DesaNameDto>>,
            // Locations
            locations_models::LocationType,
            locations_dtos::CreateLocationDto,
            locations_dtos::UpdateLocationDto,
            locations_dtos::LocationResponseDto,
            ApiResponse<locations_dtos::LocationResponseDto>,
            ApiResponse<Vec<locations_dtos::LocationResponseDto>>,
            // Investments
            investments_models::InvestmentSector,
            investments_dtos::CreateInvestmentDto,
            investments_dtos::UpdateInvestmentDto,
            investments_dtos::InvestmentResponseDto,
            ApiResponse<investments_dtos::InvestmentResponseDto>,
            ApiResponse<Vec<investments_dtos::InvestmentResponseDto>>,
            // Desa
            desa_models::DesaStatistics,
            desa_models::TourismItem,
            desa_models::Bumdes,
            desa_models::ProductItem,
            desa_models::InfrastructureRatings,
            desa_models::InvestmentBlurb,
            desa_dtos::CreateDesaDto,
            desa_dtos::UpdateDesaDto,
            desa_dtos::DesaResponseDto,
            ApiResponse<desa_dtos::DesaResponseDto>,
            ApiResponse<Vec<desa_dtos::DesaResponseDto>>,
            // Approvals
            approvals_dtos::RejectSubmissionDto,
            approvals_dtos::ApprovalResponseDto,
            approvals_dtos::ReviewResultDto,
            approvals_dtos::StatusCountsDto,
            approvals_dtos::ApprovalStatsDto,
            ApiResponse<Vec<approvals_dtos::ApprovalResponseDto>>,
            ApiResponse<approvals_dtos::ReviewResultDto>,
            ApiResponse<approvals_dtos::ApprovalStatsDto>,
            // Recommendations
            recommendations_models::AiRecommendation,
            recommendations_models::RecommendationTarget,
            recommendations_dtos::RecommendationResponseDto,
            ApiResponse<recommendations_dtos::RecommendationResponseDto>,
            // Users
            users_dtos::RegisterProfileDto,
            users_dtos::UserResponseDto,
            users_dtos::UsernameAvailabilityDto,
            users_dtos::ChangeRoleDto,
            users_dtos::DeleteUserRequestDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<users_dtos::UsernameAvailabilityDto>,
            // Files
            files_models::ImagePurpose,
            files_dtos::UploadImageDto,
            files_dtos::FileResponseDto,
            files_dtos::DeleteFileByUrlDto,
            files_dtos::DeleteFileResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
        )
    ),
    tags(
        (name = "regions", description = "Kecamatan and desa of Kabupaten Pacitan (public)"),
        (name = "locations", description = "Potential sites: submission, catalog and review"),
        (name = "investments", description = "Investment opportunities: submission, catalog and review"),
        (name = "desa", description = "Village profiles"),
        (name = "approvals", description = "Review queue (admin and owner)"),
        (name = "recommendations", description = "AI feasibility recommendations"),
        (name = "users", description = "Profiles and owner account administration"),
        (name = "files", description = "Image upload"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Kompas Pacitan API",
        version = "0.1.0",
        description = "Investment and potential-site atlas of Kabupaten Pacitan",
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_catalog_and_admin_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/api/locations",
            "/api/admin/locations/{id}/approve",
            "/api/approvals/stats",
            "/api/recommendations/{target}/{id}",
            "/api/admin/delete-user",
            "/api/regions/kecamatan/{name}/desa",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }

    #[test]
    fn test_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Kompas".to_string(),
            version: "9".to_string(),
            description: "uji".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Kompas");
        assert_eq!(doc.info.description.as_deref(), Some("uji"));
    }
}
