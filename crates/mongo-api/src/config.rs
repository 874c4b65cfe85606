//! Connection configuration for the MongoDB facades
//!
//! # Example
//! ```rust,ignore
//! use mongo_api::ConnectConfig;
//!
//! // From environment
//! let config = ConnectConfig::from_env()?;
//!
//! // Or explicit configuration
//! let config = ConnectConfig::new("cluster0.example.net", "app", "svc", "s3cret", "mongodb+srv")?
//!     .with_option("tlsCAFile", "/etc/ssl/ca.pem");
//! ```

use mongo_api_common::{MongoApiError, Result};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Connection scheme accepted by the facades
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Service {
    /// Plain `mongodb://` seed list
    #[default]
    #[serde(rename = "mongodb")]
    Mongodb,
    /// DNS seed list, `mongodb+srv://`
    #[serde(rename = "mongodb+srv")]
    MongodbSrv,
}

impl Service {
    /// URI scheme for this service
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Mongodb => "mongodb",
            Service::MongodbSrv => "mongodb+srv",
        }
    }
}

impl FromStr for Service {
    type Err = MongoApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mongodb" => Ok(Service::Mongodb),
            "mongodb+srv" => Ok(Service::MongodbSrv),
            other => Err(MongoApiError::InvalidConfiguration(format!(
                "service must be either 'mongodb+srv' or 'mongodb', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driver client settings applied on top of the parsed connection string
///
/// Every field left as `None` keeps the driver's own default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Minimum number of connections in the pool
    pub min_pool_size: Option<u32>,
    /// Maximum number of connections in the pool
    pub max_pool_size: Option<u32>,
    /// Maximum time a connection can remain idle before being closed
    pub max_idle_time: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// Server selection timeout
    pub server_selection_timeout: Option<Duration>,
    /// Application name for server logs
    pub app_name: Option<String>,
    /// Pin the stable server API to version 1
    pub stable_api: bool,
}

impl PoolConfig {
    /// Apply these settings to options produced by the driver's parser
    pub fn apply(&self, client_options: &mut ClientOptions) {
        if let Some(min) = self.min_pool_size {
            client_options.min_pool_size = Some(min);
        }
        if let Some(max) = self.max_pool_size {
            client_options.max_pool_size = Some(max);
        }
        if let Some(idle) = self.max_idle_time {
            client_options.max_idle_time = Some(idle);
        }
        if let Some(connect) = self.connect_timeout {
            client_options.connect_timeout = Some(connect);
        }
        if let Some(server_sel) = self.server_selection_timeout {
            client_options.server_selection_timeout = Some(server_sel);
        }
        if let Some(app) = &self.app_name {
            client_options.app_name = Some(app.clone());
        }
        if self.stable_api {
            let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
            client_options.server_api = Some(server_api);
        }
    }
}

fn default_retry_writes() -> bool {
    true
}

fn default_write_concern() -> Option<String> {
    Some("majority".to_string())
}

/// Everything needed to build a facade's connection handle
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Host (and optional port) or SRV name, e.g. `db.something.mongodb.net`
    pub address: String,
    /// Target database
    pub db_name: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub service: Service,
    /// Emitted as `retryWrites=<bool>`
    #[serde(default = "default_retry_writes")]
    pub retry_writes: bool,
    /// Emitted as `w=<value>`; omitted when `None`
    #[serde(default = "default_write_concern")]
    pub write_concern: Option<String>,
    /// Extra connection string parameters handed to the driver as-is
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub pool: PoolConfig,
}

impl ConnectConfig {
    /// Create a configuration, rejecting any scheme other than
    /// `mongodb` or `mongodb+srv`.
    pub fn new(
        address: impl Into<String>,
        db_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        service: &str,
    ) -> Result<Self> {
        let service = service.parse::<Service>()?;

        Ok(Self {
            address: address.into(),
            db_name: db_name.into(),
            username: username.into(),
            password: password.into(),
            service,
            retry_writes: default_retry_writes(),
            write_concern: default_write_concern(),
            options: BTreeMap::new(),
            pool: PoolConfig::default(),
        })
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `MONGO_API_ADDRESS`, `MONGO_API_DB`, `MONGO_API_USERNAME`,
    /// `MONGO_API_PASSWORD` and `MONGO_API_SERVICE` (defaults to `mongodb`).
    pub fn from_env() -> Result<Self> {
        fn required(name: &str) -> Result<String> {
            std::env::var(name).map_err(|_| {
                MongoApiError::InvalidConfiguration(format!(
                    "environment variable {} is not set",
                    name
                ))
            })
        }

        let service = std::env::var("MONGO_API_SERVICE").unwrap_or_else(|_| "mongodb".to_string());

        Self::new(
            required("MONGO_API_ADDRESS")?,
            required("MONGO_API_DB")?,
            required("MONGO_API_USERNAME")?,
            required("MONGO_API_PASSWORD")?,
            &service,
        )
    }

    /// Add a connection string parameter, e.g. `tlsCAFile`
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_retry_writes(mut self, retry_writes: bool) -> Self {
        self.retry_writes = retry_writes;
        self
    }

    pub fn with_write_concern(mut self, write_concern: Option<String>) -> Self {
        self.write_concern = write_concern;
        self
    }

    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Build the connection string handed to the driver.
    ///
    /// Shape: `<scheme>://<user>:<password>@<address>/<db>?retryWrites=true&w=majority[&k=v...]`.
    /// A `retryWrites` or `w` entry in `options` replaces the default hint.
    /// Contains credentials; never log it.
    pub fn connection_uri(&self) -> String {
        // The driver matches option names case-insensitively
        let forwarded = |name: &str| self.options.keys().any(|key| key.eq_ignore_ascii_case(name));

        let mut query = Vec::new();
        if !forwarded("retryWrites") {
            query.push(format!("retryWrites={}", self.retry_writes));
        }
        if let Some(w) = self.write_concern.as_ref().filter(|_| !forwarded("w")) {
            query.push(format!("w={}", urlencoding::encode(w)));
        }
        for (key, value) in &self.options {
            query.push(format!("{}={}", key, urlencoding::encode(value)));
        }

        format!(
            "{}://{}:{}@{}/{}?{}",
            self.service,
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password),
            self.address,
            self.db_name,
            query.join("&")
        )
    }
}

impl fmt::Debug for ConnectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectConfig")
            .field("address", &self.address)
            .field("db_name", &self.db_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("service", &self.service)
            .field("retry_writes", &self.retry_writes)
            .field("write_concern", &self.write_concern)
            .field("options", &self.options)
            .field("pool", &self.pool)
            .finish()
    }
}
