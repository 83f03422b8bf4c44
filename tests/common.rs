#![allow(dead_code)]

use figment::{
    Figment,
    providers::{Format, Yaml},
};
use journy::JournyClient;
use journy::auth::SessionTokens;
use journy::config::{AccountConfig, ApiConfig, AuthConfig, Config, ConfigV1, LoggingConfig};

pub const USER_JSON: &str = r#"{
    "_id": "u1",
    "name": "Dina Driver",
    "email": "dina@gojourny.test",
    "role": "DRIVER",
    "isVerified": true
}"#;

pub fn test_config(base_url: String) -> ConfigV1 {
    ConfigV1 {
        api: ApiConfig {
            base_url,
            timeout_in_ms: 2_000,
        },
        auth: AuthConfig {
            refresh_timeout_in_ms: 1_000,
            ..AuthConfig::default()
        },
        logging: LoggingConfig::default(),
        account: None,
    }
}

pub fn test_config_with_account(base_url: String) -> ConfigV1 {
    ConfigV1 {
        account: Some(AccountConfig {
            email: "dina@gojourny.test".to_string(),
            password: "pw".to_string(),
        }),
        ..test_config(base_url)
    }
}

/// Parse a YAML config the way the binary does, minus the file.
pub fn config_from_yaml(yaml: &str) -> ConfigV1 {
    let config: Config = Figment::new()
        .merge(Yaml::string(yaml))
        .extract()
        .expect("Failed to parse test config YAML");
    match config {
        Config::ConfigV1(cfg) => cfg,
    }
}

/// A client whose session holds an expired access token and a valid refresh token.
pub fn client_with_stale_session(base_url: String) -> JournyClient {
    let client = JournyClient::new(&test_config(base_url)).expect("client should build");
    client.session().set(SessionTokens {
        access_token: "stale".to_string(),
        refresh_token: Some("r1".to_string()),
    });
    client
}

pub fn envelope(data: &str) -> String {
    format!(
        r#"{{"success":true,"statusCode":200,"message":"ok","data":{}}}"#,
        data
    )
}
