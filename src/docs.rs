use hostelhub_core::Role;
use hostelhub_models::{
    ChangePasswordDto, LoginRequest, LoginResponse, MessageResponse, PublicProfile,
    RegisterIdentityDto, ResetPasswordDto, SessionUser, UpdateIdentityDto,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::get_me,
        crate::modules::auth::controller::change_password,
        crate::modules::identities::controller::register_identity,
        crate::modules::identities::controller::list_identities,
        crate::modules::identities::controller::get_identity,
        crate::modules::identities::controller::update_identity,
        crate::modules::identities::controller::deactivate_identity,
        crate::modules::identities::controller::activate_identity,
        crate::modules::identities::controller::reset_identity_password,
    ),
    components(
        schemas(
            Role,
            LoginRequest,
            LoginResponse,
            SessionUser,
            ChangePasswordDto,
            MessageResponse,
            PublicProfile,
            RegisterIdentityDto,
            UpdateIdentityDto,
            ResetPasswordDto,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and session endpoints"),
        (name = "Identities", description = "Student, staff and admin account management")
    ),
    info(
        title = "HostelHub API",
        version = "0.1.0",
        description = "Authentication and role-gated access for the hostel management system.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

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
            )
        }
    }
}
