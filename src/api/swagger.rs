use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Directory API",
        version = "1.0.0",
        description = "CRUD front end for a user directory. \n\n**Modes:** backed by an in-memory store when `MOCK_AWS=true`, otherwise forwarded to the remote user API with profile images stored in S3."
    ),
    paths(
        // Users
        crate::api::users::list_users,
        crate::api::users::create_user,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::User,
            crate::models::UserPatch,
            crate::services::user_service::CreateUserForm,
            crate::api::users::MessageResponse,
            crate::api::users::UpdateUserResponse,
            crate::api::users::ErrorResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "Create, read, update and delete directory users."),
        (name = "Health", description = "Health check and request counters."),
    )
)]
pub struct ApiDoc;
