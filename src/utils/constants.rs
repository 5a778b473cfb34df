//! Shared constants and invariants

pub const SETTINGS_FILE_DEFAULT: &str = "settings.local.json";
pub const SETTING_ENVIRONMENT_URL: &str = "DataverseEnvironmentUrl";

pub const DEFAULT_TOKEN_CACHE_TTL_SECS: u64 = 20 * 60;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_API_VERSION: &str = "9.2";

/// Appended to a resource url to request every permission granted to the app.
pub const DEFAULT_SCOPE_SUFFIX: &str = "/.default";

// Identity provider
pub const AUTHORITY_HOST_DEFAULT: &str = "https://login.microsoftonline.com";
pub const IMDS_TOKEN_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
pub const IMDS_API_VERSION: &str = "2018-02-01";
pub const APP_SERVICE_API_VERSION: &str = "2019-08-01";

// Ambient credential environment
pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const ENV_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";
pub const ENV_IDENTITY_ENDPOINT: &str = "IDENTITY_ENDPOINT";
pub const ENV_IDENTITY_HEADER: &str = "IDENTITY_HEADER";
