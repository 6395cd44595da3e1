use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use health_log_domain::auth::gate::ADMIN_HEADER;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

/// Registers the security schemes the paths refer to
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "admin_secret",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_HEADER))),
            );
        }
    }
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Measurement endpoints
        crate::api::handlers::measurements::log_glucose,
        crate::api::handlers::measurements::glucose_history,
        crate::api::handlers::measurements::log_blood_pressure,
        crate::api::handlers::measurements::blood_pressure_history,
        crate::api::handlers::measurements::log_meal,
        crate::api::handlers::measurements::meal_history,
        crate::api::handlers::measurements::log_water,
        crate::api::handlers::measurements::water_history,
        crate::api::handlers::measurements::log_insulin,
        crate::api::handlers::measurements::insulin_history,
        crate::api::handlers::measurements::log_weight,
        crate::api::handlers::measurements::weight_history,

        // Auth endpoints
        crate::api::handlers::session::get_session,

        // Admin endpoints
        crate::api::handlers::admin::debug_database,
        crate::api::handlers::admin::debug_config
    ),
    components(
        schemas(
            // Requests
            health_log_domain::entities::LogBloodGlucoseRequest,
            health_log_domain::entities::LogBloodPressureRequest,
            health_log_domain::entities::LogMealRequest,
            health_log_domain::entities::LogWaterRequest,
            health_log_domain::entities::LogInsulinRequest,
            health_log_domain::entities::LogWeightRequest,

            // Stored entries
            health_log_domain::entities::BloodGlucoseEntry,
            health_log_domain::entities::BloodPressureEntry,
            health_log_domain::entities::MealEntry,
            health_log_domain::entities::WaterEntry,
            health_log_domain::entities::InsulinEntry,
            health_log_domain::entities::WeightEntry,

            // Enumerations
            health_log_domain::entities::GlucoseContext,
            health_log_domain::entities::GlucoseRange,
            health_log_domain::entities::BodyPosition,
            health_log_domain::entities::Arm,
            health_log_domain::entities::BloodPressureCategory,
            health_log_domain::entities::MealType,
            health_log_domain::entities::InsulinType,

            // History pages
            crate::api::handlers::entries::GlucosePage,
            crate::api::handlers::entries::BloodPressurePage,
            crate::api::handlers::entries::MealPage,
            crate::api::handlers::entries::WaterPage,
            crate::api::handlers::entries::InsulinPage,
            crate::api::handlers::entries::WeightPage,

            // Errors
            crate::api::error::ErrorBody,

            // Health
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentHealthStatus,

            // Session
            health_log_domain::auth::session::SessionState,
            health_log_domain::auth::session::SessionUser,

            // Admin
            crate::api::handlers::admin::DatabaseDebugInfo,
            crate::api::handlers::admin::ConfigDebugInfo
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "glucose", description = "Blood glucose log"),
        (name = "blood_pressure", description = "Blood pressure log"),
        (name = "meals", description = "Meal log"),
        (name = "water", description = "Water intake log"),
        (name = "insulin", description = "Insulin dose log"),
        (name = "weight", description = "Body weight log"),
        (name = "auth", description = "Session introspection"),
        (name = "admin", description = "Operator debug endpoints")
    ),
    info(
        title = "HealthLog API",
        version = "0.1.0",
        description = "API for logging health measurements",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
