//! Connection-level client settings.
//!
//! [`ClientConfiguration`] is a plain settings bag: it holds the values an
//! HTTP execution layer needs (user agent, protocol, proxy, pool size,
//! timeouts, retry behavior, socket buffer hints) and does nothing itself.

use std::time::Duration;

use super::RetryPolicy;

/// Default configuration values.
pub mod defaults {
    use std::time::Duration;

    /// Default user agent sent with every request.
    pub const USER_AGENT: &str = concat!("cloudwire-rust/", env!("CARGO_PKG_VERSION"));

    /// Default maximum number of open HTTP connections.
    pub const MAX_CONNECTIONS: u32 = 50;

    /// Default socket read timeout.
    pub const SOCKET_TIMEOUT: Duration = Duration::from_secs(50);

    /// Default connection establishment timeout.
    pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(50);
}

/// Scheme used to reach service endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    #[default]
    Https,
}

impl Protocol {
    /// URL scheme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

/// Settings shared by every call a client makes.
///
/// `Clone` produces an independent copy.
///
/// # Example
///
/// ```
/// use cloudwire_client::{ClientConfiguration, Protocol};
/// use std::time::Duration;
///
/// let config = ClientConfiguration::new()
///     .protocol(Protocol::Http)
///     .proxy("proxy.internal", 8080)
///     .max_error_retry(5)
///     .socket_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.retry_policy_for(None).max_retries, 5);
/// ```
#[derive(Clone, PartialEq)]
pub struct ClientConfiguration {
    user_agent: String,
    protocol: Protocol,
    proxy_host: Option<String>,
    proxy_port: Option<u16>,
    proxy_username: Option<String>,
    proxy_password: Option<String>,
    proxy_domain: Option<String>,
    proxy_workstation: Option<String>,
    max_connections: u32,
    socket_timeout: Duration,
    connection_timeout: Duration,
    max_error_retry: Option<u32>,
    retry_policy: Option<RetryPolicy>,
    socket_send_buffer_size_hint: Option<usize>,
    socket_receive_buffer_size_hint: Option<usize>,
    metrics_enabled: bool,
}

impl std::fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("user_agent", &self.user_agent)
            .field("protocol", &self.protocol)
            .field("proxy_host", &self.proxy_host)
            .field("proxy_port", &self.proxy_port)
            .field("proxy_username", &self.proxy_username)
            .field("proxy_password", &self.proxy_password.as_ref().map(|_| "***"))
            .field("proxy_domain", &self.proxy_domain)
            .field("proxy_workstation", &self.proxy_workstation)
            .field("max_connections", &self.max_connections)
            .field("socket_timeout", &self.socket_timeout)
            .field("connection_timeout", &self.connection_timeout)
            .field("max_error_retry", &self.max_error_retry)
            .field("retry_policy", &self.retry_policy)
            .field("socket_send_buffer_size_hint", &self.socket_send_buffer_size_hint)
            .field(
                "socket_receive_buffer_size_hint",
                &self.socket_receive_buffer_size_hint,
            )
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            protocol: Protocol::Https,
            proxy_host: None,
            proxy_port: None,
            proxy_username: None,
            proxy_password: None,
            proxy_domain: None,
            proxy_workstation: None,
            max_connections: defaults::MAX_CONNECTIONS,
            socket_timeout: defaults::SOCKET_TIMEOUT,
            connection_timeout: defaults::CONNECTION_TIMEOUT,
            max_error_retry: None,
            retry_policy: None,
            socket_send_buffer_size_hint: None,
            socket_receive_buffer_size_hint: None,
            metrics_enabled: false,
        }
    }
}

impl ClientConfiguration {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// `User-Agent` sent with every request.
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Scheme used to reach endpoints.
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Route connections through an HTTP proxy.
    pub fn proxy<S: Into<String>>(mut self, host: S, port: u16) -> Self {
        self.proxy_host = Some(host.into());
        self.proxy_port = Some(port);
        self
    }

    /// Authenticate to the proxy.
    pub fn proxy_credentials<U: Into<String>, P: Into<String>>(
        mut self,
        username: U,
        password: P,
    ) -> Self {
        self.proxy_username = Some(username.into());
        self.proxy_password = Some(password.into());
        self
    }

    /// Windows domain for NTLM proxy authentication.
    pub fn proxy_domain<S: Into<String>>(mut self, domain: S) -> Self {
        self.proxy_domain = Some(domain.into());
        self
    }

    /// Windows workstation for NTLM proxy authentication.
    pub fn proxy_workstation<S: Into<String>>(mut self, workstation: S) -> Self {
        self.proxy_workstation = Some(workstation.into());
        self
    }

    /// Maximum number of open HTTP connections.
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Timeout for reading from an established connection.
    pub fn socket_timeout(mut self, timeout: Duration) -> Self {
        self.socket_timeout = timeout;
        self
    }

    /// Timeout for establishing a connection.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Override the number of retries for retryable errors.
    pub fn max_error_retry(mut self, retries: u32) -> Self {
        self.max_error_retry = Some(retries);
        self
    }

    /// Replace the retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Size hints for the socket send and receive buffers, in bytes.
    pub fn socket_buffer_size_hints(mut self, send: usize, receive: usize) -> Self {
        self.socket_send_buffer_size_hint = Some(send);
        self.socket_receive_buffer_size_hint = Some(receive);
        self
    }

    /// Turn request metrics on or off.
    pub fn metrics_enabled(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    /// Current `User-Agent`.
    pub fn get_user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Current scheme.
    pub fn get_protocol(&self) -> Protocol {
        self.protocol
    }

    /// Proxy host, if a proxy is configured.
    pub fn get_proxy_host(&self) -> Option<&str> {
        self.proxy_host.as_deref()
    }

    /// Proxy port, if a proxy is configured.
    pub fn get_proxy_port(&self) -> Option<u16> {
        self.proxy_port
    }

    /// Proxy user name.
    pub fn get_proxy_username(&self) -> Option<&str> {
        self.proxy_username.as_deref()
    }

    /// Proxy password. Never printed by `Debug`.
    pub fn get_proxy_password(&self) -> Option<&str> {
        self.proxy_password.as_deref()
    }

    /// NTLM proxy domain.
    pub fn get_proxy_domain(&self) -> Option<&str> {
        self.proxy_domain.as_deref()
    }

    /// NTLM proxy workstation.
    pub fn get_proxy_workstation(&self) -> Option<&str> {
        self.proxy_workstation.as_deref()
    }

    /// Current connection limit.
    pub fn get_max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Current socket read timeout.
    pub fn get_socket_timeout(&self) -> Duration {
        self.socket_timeout
    }

    /// Current connect timeout.
    pub fn get_connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Explicit retry count, if one was set.
    pub fn get_max_error_retry(&self) -> Option<u32> {
        self.max_error_retry
    }

    /// Socket `(send, receive)` buffer size hints.
    pub fn get_socket_buffer_size_hints(&self) -> (Option<usize>, Option<usize>) {
        (
            self.socket_send_buffer_size_hint,
            self.socket_receive_buffer_size_hint,
        )
    }

    /// Whether request metrics are collected.
    pub fn is_metrics_enabled(&self) -> bool {
        self.metrics_enabled
    }

    /// Effective retry policy for a service.
    ///
    /// Starts from the configured policy, else `service_default`, else
    /// [`RetryPolicy::default`]. An explicit
    /// [`max_error_retry`](Self::max_error_retry) overrides the retry count.
    pub fn retry_policy_for(&self, service_default: Option<&RetryPolicy>) -> RetryPolicy {
        let mut policy = self
            .retry_policy
            .as_ref()
            .or(service_default)
            .cloned()
            .unwrap_or_default();
        if let Some(retries) = self.max_error_retry {
            policy.max_retries = retries;
        }
        policy
    }
}
