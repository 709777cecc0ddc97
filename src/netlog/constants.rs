//! Closed enumerations carried by net-log records.
//!
//! Every enum owns a two-way table (numeric value <-> name) that is built
//! once on first use. A value missing from the table is rejected with
//! [`UnknownVariant`]; there is no catch-all variant to fall back to.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A numeric value that has no variant in the corresponding enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: u32,
}

struct Table<T: 'static> {
    by_value: HashMap<u32, T>,
    by_name: HashMap<&'static str, T>,
}

impl<T: Copy> Table<T> {
    fn build(entries: &[(T, u32, &'static str)]) -> Self {
        let mut by_value = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::with_capacity(entries.len());
        for &(variant, value, name) in entries {
            by_value.insert(value, variant);
            by_name.insert(name, variant);
        }
        Self { by_value, by_name }
    }
}

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
        #[serde(try_from = "u32")]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl $name {
            const ENTRIES: &'static [($name, u32, &'static str)] =
                &[$(($name::$variant, $value, $label),)+];

            fn table() -> &'static Table<$name> {
                static TABLE: LazyLock<Table<$name>> =
                    LazyLock::new(|| Table::build($name::ENTRIES));
                &TABLE
            }

            /// Exact lookup of a wire value.
            pub fn from_value(value: u32) -> Result<Self, UnknownVariant> {
                Self::table()
                    .by_value
                    .get(&value)
                    .copied()
                    .ok_or(UnknownVariant { kind: $kind, value })
            }

            /// Lookup by the upper-case wire name, e.g. `"URL_REQUEST"`.
            #[allow(dead_code)] // Used in tests
            pub fn from_name(name: &str) -> Option<Self> {
                Self::table().by_name.get(name).copied()
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl TryFrom<u32> for $name {
            type Error = UnknownVariant;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                Self::from_value(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

closed_enum! {
    /// Kind of object a log source describes.
    pub enum LogSourceType: "source type" {
        Unspecified = 0 => "NONE",
        UrlRequest = 1 => "URL_REQUEST",
        SocketStream = 2 => "SOCKET_STREAM",
        InitProxyResolver = 3 => "INIT_PROXY_RESOLVER",
        ConnectJob = 4 => "CONNECT_JOB",
        Socket = 5 => "SOCKET",
        SpdySession = 6 => "SPDY_SESSION",
        HostResolverImplRequest = 7 => "HOST_RESOLVER_IMPL_REQUEST",
        HostResolverImplJob = 8 => "HOST_RESOLVER_IMPL_JOB",
    }
}

closed_enum! {
    /// Event type of a single log record.
    pub enum LogEventType: "event type" {
        Cancelled = 0 => "CANCELLED",
        Failed = 1 => "FAILED",
        RequestAlive = 2 => "REQUEST_ALIVE",
        HostResolverImpl = 3 => "HOST_RESOLVER_IMPL",
        HostResolverImplRequest = 4 => "HOST_RESOLVER_IMPL_REQUEST",
        HostResolverImplJob = 5 => "HOST_RESOLVER_IMPL_JOB",
        InitProxyResolver = 6 => "INIT_PROXY_RESOLVER",
        ProxyService = 7 => "PROXY_SERVICE",
        ProxyServiceResolvedProxyList = 8 => "PROXY_SERVICE_RESOLVED_PROXY_LIST",
        UrlRequestStart = 9 => "URL_REQUEST_START",
        UrlRequestRedirected = 10 => "URL_REQUEST_REDIRECTED",
        UrlRequestStartJob = 11 => "URL_REQUEST_START_JOB",
        SocketStreamConnect = 12 => "SOCKET_STREAM_CONNECT",
        SocketStreamSent = 13 => "SOCKET_STREAM_SENT",
        SocketStreamReceived = 14 => "SOCKET_STREAM_RECEIVED",
        SocketPool = 15 => "SOCKET_POOL",
        SocketPoolConnectJob = 16 => "SOCKET_POOL_CONNECT_JOB",
        SocketAlive = 17 => "SOCKET_ALIVE",
        TcpConnect = 18 => "TCP_CONNECT",
        SslConnect = 19 => "SSL_CONNECT",
        HttpTransactionSendRequest = 20 => "HTTP_TRANSACTION_SEND_REQUEST",
        HttpTransactionReadHeaders = 21 => "HTTP_TRANSACTION_READ_HEADERS",
        HttpTransactionReadBody = 22 => "HTTP_TRANSACTION_READ_BODY",
        SpdySession = 23 => "SPDY_SESSION",
        HttpStreamRequest = 24 => "HTTP_STREAM_REQUEST",
    }
}

closed_enum! {
    /// Whether a record opens, closes, or stands alone in a timed span.
    #[derive(Default)]
    pub enum LogEventPhase: "event phase" {
        #[default]
        Unspecified = 0 => "NONE",
        Begin = 1 => "BEGIN",
        End = 2 => "END",
    }
}
