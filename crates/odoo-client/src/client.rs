//! Odoo session client

use crate::{config::ClientConfig, ClientError, Result, SearchOptions};
use rpc_core::{Endpoint, HttpTransport, Transport};
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use xmlrpc_proto::{Kwargs, Struct, Value};

/// Authenticated user identifier
pub type Uid = i64;

/// Database identifier of a record
pub type RecordId = i64;

/// A record as returned by `read`/`search_read`: field name to value
pub type Record = Struct;

/// Remote services exposed by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// Authentication and server introspection
    Common,

    /// Generic model method invocation
    Object,
}

impl EndpointKind {
    /// Path relative to the server base URL
    pub fn path(&self) -> &'static str {
        match self {
            EndpointKind::Common => "/xmlrpc/2/common",
            EndpointKind::Object => "/xmlrpc/2/object",
        }
    }
}

/// Server metadata returned by `version()`
#[derive(Debug, Clone, PartialEq)]
pub struct ServerVersion(Struct);

impl ServerVersion {
    /// Release string, e.g. "17.0"
    pub fn server_version(&self) -> Option<&str> {
        self.0.get("server_version").and_then(Value::as_str)
    }

    /// Major series, e.g. "17.0"
    pub fn server_serie(&self) -> Option<&str> {
        self.0.get("server_serie").and_then(Value::as_str)
    }

    pub fn protocol_version(&self) -> Option<i64> {
        self.0.get("protocol_version").and_then(Value::as_i64)
    }

    /// Every field the server returned
    pub fn fields(&self) -> &Struct {
        &self.0
    }
}

/// Odoo session client
///
/// Holds the connection configuration, lazily creates the two endpoint
/// handles and remembers the user id obtained by [`OdooClient::authenticate`].
/// Every model operation goes through [`OdooClient::execute`].
///
/// After authentication the client is effectively read-only and can be
/// shared behind an `Arc`.
pub struct OdooClient {
    /// Client configuration
    config: Arc<ClientConfig>,

    /// Transport shared by both endpoints
    transport: Arc<dyn Transport>,

    /// Authentication endpoint (created on first use)
    common: OnceLock<Endpoint>,

    /// Object endpoint (created on first use)
    object: OnceLock<Endpoint>,

    /// Session user id (if authenticated)
    uid: RwLock<Option<Uid>>,
}

impl OdooClient {
    /// Create a client using the HTTP transport.
    ///
    /// No request is made until a remote operation is called.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client with a specific transport (for testing)
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            common: OnceLock::new(),
            object: OnceLock::new(),
            uid: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the handle for `kind`, creating it on first access
    pub fn endpoint(&self, kind: EndpointKind) -> &Endpoint {
        let cell = match kind {
            EndpointKind::Common => &self.common,
            EndpointKind::Object => &self.object,
        };

        cell.get_or_init(|| {
            let url = format!("{}{}", self.config.base_url(), kind.path());
            debug!(url = %url, "Creating endpoint");
            Endpoint::new(url, self.transport.clone())
        })
    }

    /// Authenticate with the configured credentials and return the user id.
    ///
    /// A falsy answer from the server means the credentials were rejected;
    /// the session is left unauthenticated in that case.
    pub async fn authenticate(&self) -> Result<Uid> {
        let params = vec![
            Value::from(&self.config.database),
            Value::from(&self.config.username),
            Value::from(&self.config.password),
            Value::Struct(Struct::new()),
        ];

        let result = self
            .endpoint(EndpointKind::Common)
            .call("authenticate", params)
            .await?;

        if !result.is_truthy() {
            *self.uid.write().await = None;
            warn!(
                database = %self.config.database,
                username = %self.config.username,
                "Authentication rejected"
            );
            return Err(ClientError::AuthenticationFailed);
        }

        let uid = result.into_i64()?;
        *self.uid.write().await = Some(uid);

        info!("Successfully authenticated as user ID: {}", uid);
        Ok(uid)
    }

    /// Query server version information. Does not require authentication.
    pub async fn version(&self) -> Result<ServerVersion> {
        let result = self
            .endpoint(EndpointKind::Common)
            .call("version", Vec::new())
            .await?;

        Ok(ServerVersion(result.into_struct()?))
    }

    /// Current session user id
    pub async fn uid(&self) -> Option<Uid> {
        *self.uid.read().await
    }

    /// Check if authenticated
    pub async fn is_authenticated(&self) -> bool {
        self.uid().await.is_some()
    }

    /// Execute `method` on `model` with positional `args` and named `kwargs`.
    ///
    /// The result is returned exactly as the server sent it.
    pub async fn execute(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Kwargs,
    ) -> Result<Value> {
        let uid = self.uid().await.ok_or(ClientError::NotAuthenticated)?;

        debug!(
            model = %model,
            method = %method,
            args = args.len(),
            kwargs = ?kwargs.keys().collect::<Vec<_>>(),
            "Executing model method"
        );

        let params = vec![
            Value::from(&self.config.database),
            Value::Int(uid),
            Value::from(&self.config.password),
            Value::from(model),
            Value::from(method),
            Value::Array(args),
            Value::Struct(kwargs),
        ];

        Ok(self
            .endpoint(EndpointKind::Object)
            .call("execute_kw", params)
            .await?)
    }

    /// Search for record ids matching `domain`
    pub async fn search(
        &self,
        model: &str,
        domain: impl Into<Value>,
        options: SearchOptions,
    ) -> Result<Vec<RecordId>> {
        let result = self
            .execute(model, "search", vec![domain.into()], options.into_kwargs())
            .await?;
        Ok(result.into_id_list()?)
    }

    /// Read records by id. `None` reads every field.
    pub async fn read(
        &self,
        model: &str,
        ids: &[RecordId],
        fields: Option<&[&str]>,
    ) -> Result<Vec<Record>> {
        let args = vec![Value::from(ids), field_list(fields)];
        let result = self.execute(model, "read", args, Kwargs::new()).await?;
        Ok(result.into_record_list()?)
    }

    /// Search and read records in one call
    pub async fn search_read(
        &self,
        model: &str,
        domain: impl Into<Value>,
        fields: Option<&[&str]>,
        options: SearchOptions,
    ) -> Result<Vec<Record>> {
        let mut kwargs = options.into_kwargs();
        kwargs.insert("fields".to_string(), field_list(fields));

        let result = self
            .execute(model, "search_read", vec![domain.into()], kwargs)
            .await?;
        Ok(result.into_record_list()?)
    }

    /// Create a record and return its id
    pub async fn create(&self, model: &str, values: Record) -> Result<RecordId> {
        let result = self
            .execute(model, "create", vec![Value::Struct(values)], Kwargs::new())
            .await?;
        Ok(result.into_i64()?)
    }

    /// Update existing records
    pub async fn write(&self, model: &str, ids: &[RecordId], values: Record) -> Result<bool> {
        let args = vec![Value::from(ids), Value::Struct(values)];
        let result = self.execute(model, "write", args, Kwargs::new()).await?;
        Ok(result.into_bool()?)
    }

    /// Delete records
    pub async fn unlink(&self, model: &str, ids: &[RecordId]) -> Result<bool> {
        let result = self
            .execute(model, "unlink", vec![Value::from(ids)], Kwargs::new())
            .await?;
        Ok(result.into_bool()?)
    }
}

fn field_list(fields: Option<&[&str]>) -> Value {
    Value::from(fields.unwrap_or_default())
}
