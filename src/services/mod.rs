pub mod auth;
pub mod policy;
pub mod registry_import;
pub mod secrets;
pub mod template;

pub use auth::{AuthService, Claims, ROLE_PLATFORM_ADMIN, ROLE_TENANT_ADMIN};
pub use policy::PolicyClient;
pub use secrets::SecretCipher;
pub use template::{
    build_request_template, ensure_path_params, extract_placeholders, set_path_param,
};
