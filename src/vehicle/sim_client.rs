//! # Simulator Client
//!
//! Session plumbing for the flight simulator's TCP bridge.
//!
//! The bridge speaks line-delimited JSON: each request is a single
//! `{"method": ..., "params": ...}` line, each reply a single
//! `{"result": ...}` or `{"error": ...}` line. The simulator owns flight
//! behavior, physics, and state estimation; this client only ships
//! commands and decodes replies.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tracing::debug;

use super::{FlightControl, VehicleLink, VehicleState};
use crate::error::ProviderError;

/// One decoded bridge reply
#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Simulator session handle
///
/// Owns the exclusive connection to the simulator bridge. Generic over the
/// underlying stream so tests can drive it with mock I/O; production code
/// uses [`SimClient::connect`] which yields a TCP-backed client.
pub struct SimClient<T = TcpStream> {
    stream: BufStream<T>,
    endpoint: String,
}

impl<T> std::fmt::Debug for SimClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl SimClient<TcpStream> {
    /// Connect to the simulator bridge over TCP
    ///
    /// # Arguments
    ///
    /// * `host` - Bridge host name or address
    /// * `port` - Bridge TCP port
    /// * `timeout` - Connection establishment deadline
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Connect`] if the connection cannot be
    /// established within the deadline.
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, ProviderError> {
        let endpoint = format!("{}:{}", host, port);

        let connect = TcpStream::connect(&endpoint);
        let stream = match tokio::time::timeout(timeout, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(ProviderError::Connect { endpoint, source });
            }
            Err(_) => {
                return Err(ProviderError::Connect {
                    endpoint,
                    source: std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        "connection timed out",
                    ),
                });
            }
        };

        debug!("Connected to simulator bridge at {}", endpoint);
        Ok(Self::new(stream, endpoint))
    }
}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> SimClient<T> {
    /// Wrap an already-established stream in a client session
    pub fn new(stream: T, endpoint: impl Into<String>) -> Self {
        Self {
            stream: BufStream::new(stream),
            endpoint: endpoint.into(),
        }
    }

    /// Get the endpoint this session is bound to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Verify the bridge is alive and answering
    pub async fn confirm_connection(&mut self) -> Result<(), ProviderError> {
        self.call("ping", Value::Null).await?;
        Ok(())
    }

    /// Query the current vehicle state
    pub async fn get_state(&mut self) -> Result<VehicleState, ProviderError> {
        let result = self.call("getState", Value::Null).await?;
        serde_json::from_value(result).map_err(|e| ProviderError::MalformedResponse {
            method: "getState".to_string(),
            reason: e.to_string(),
        })
    }

    /// Issue one request line and decode the reply line
    async fn call(&mut self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let mut request = serde_json::Map::new();
        request.insert("method".to_string(), Value::String(method.to_string()));
        if !params.is_null() {
            request.insert("params".to_string(), params);
        }
        let line = Value::Object(request).to_string();

        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\n").await?;
        self.stream.flush().await?;

        let mut reply = String::new();
        let n = self.stream.read_line(&mut reply).await?;
        if n == 0 {
            return Err(ProviderError::ConnectionClosed);
        }

        let response: Response =
            serde_json::from_str(&reply).map_err(|e| ProviderError::MalformedResponse {
                method: method.to_string(),
                reason: e.to_string(),
            })?;

        if let Some(error) = response.error {
            return Err(ProviderError::CommandRejected {
                method: method.to_string(),
                reason: error,
            });
        }

        debug!("Simulator call '{}' completed", method);
        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl<T: AsyncRead + AsyncWrite + Unpin + Send> FlightControl for SimClient<T> {
    async fn enable_api_control(&mut self, enabled: bool) -> Result<(), ProviderError> {
        self.call("enableApiControl", json!({ "enabled": enabled })).await?;
        Ok(())
    }

    async fn arm_disarm(&mut self, arm: bool) -> Result<(), ProviderError> {
        self.call("armDisarm", json!({ "arm": arm })).await?;
        Ok(())
    }

    async fn takeoff(&mut self) -> Result<(), ProviderError> {
        self.call("takeoff", Value::Null).await?;
        Ok(())
    }

    async fn land(&mut self) -> Result<(), ProviderError> {
        self.call("land", Value::Null).await?;
        Ok(())
    }
}

#[async_trait]
impl<T: AsyncRead + AsyncWrite + Unpin + Send> VehicleLink for SimClient<T> {
    async fn read_state(&mut self) -> Result<VehicleState, ProviderError> {
        self.get_state().await
    }

    async fn release_control(&mut self) -> Result<(), ProviderError> {
        self.arm_disarm(false).await?;
        self.enable_api_control(false).await?;
        Ok(())
    }
}
