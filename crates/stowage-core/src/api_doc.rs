//! OpenAPI documentation.
//!
//! Only the document model is bootstrapped here: metadata, shared schemas and
//! the JWT bearer security scheme. Serving it is left to the HTTP layer.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorResponse;
use crate::models::{AttachmentDto, UploadResult};
use crate::storage_types::AttachmentType;

/// Name of the bearer security scheme registered in the document
pub const JWT_SCHEME: &str = "JWT";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stowage API",
        version = env!("CARGO_PKG_VERSION"),
        description = "File upload and attachment management API. Uploads are stored on the local filesystem or S3-compatible object storage; image uploads are annotated with their dimensions and a thumbnail.",
        license(
            name = "GNU General Public License v3.0",
            url = "https://www.gnu.org/licenses/gpl-3.0.html"
        ),
        contact(
            name = "Stowage maintainers",
            url = "https://github.com/stowage-rs/stowage"
        )
    ),
    components(
        schemas(AttachmentDto, AttachmentType, UploadResult, ErrorResponse)
    ),
    modifiers(&SecurityAddon),
    security(
        ("JWT" = [])
    ),
    tags(
        (name = "attachments", description = "Attachment upload and deletion")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            JWT_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Returns the OpenAPI document model
pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
