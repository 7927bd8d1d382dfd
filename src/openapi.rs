//! OpenAPI 3 documentation assembly
//!
//! Served through Swagger UI outside production.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Students Core API",
        description = "Student records with embedded phone numbers and class references"
    ),
    tags(
        (name = "System", description = "Health checks"),
        (name = "Students", description = "Student aggregate CRUD and filtering"),
        (name = "Phone Numbers", description = "Position-addressed phone numbers of a student"),
    ),
    security(
        ("bearer" = [])
    ),
    components(
        schemas(
            crate::domain::Student,
            crate::domain::PhoneNumber,
            crate::domain::CreateStudentInput,
            crate::domain::UpdateStudentInput,
            crate::domain::PatchPhoneNumberInput,
            crate::api::health::HealthResponse,
        ),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::ready,

        crate::api::student::create,
        crate::api::student::list,
        crate::api::student::get,
        crate::api::student::update,
        crate::api::student::patch,
        crate::api::student::delete,

        crate::api::phone_number::add,
        crate::api::phone_number::list,
        crate::api::phone_number::get,
        crate::api::phone_number::replace,
        crate::api::phone_number::merge,
        crate::api::phone_number::remove,
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Build the document with the bearer security scheme registered
    pub fn build() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(c) = doc.components.as_mut() {
            c.security_schemes.insert(
                "bearer".to_string(),
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
        doc
    }
}
