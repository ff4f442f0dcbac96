// src/constants.rs

/// The name of the directory holding hubcmd configuration (in ~/.config/).
pub const APP_DIR_NAME: &str = "hubcmd";

/// The name of the settings file inside the configuration directory.
pub const SETTINGS_FILENAME: &str = "config.toml";

/// Region used when neither the settings file nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Host prefix of the service endpoints.
pub const SERVICE_ENDPOINT_PREFIX: &str = "securityhub";

pub const ENV_REGION: &str = "HUBCMD_REGION";

pub const ENV_ENDPOINT_URL: &str = "HUBCMD_ENDPOINT_URL";

pub const ENV_BINDING_MODE: &str = "HUBCMD_BINDING_MODE";
