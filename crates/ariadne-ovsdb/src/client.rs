//! OVSDB JSON-RPC client over Unix and TCP sockets.
//!
//! OVSDB speaks JSON-RPC 1.0 with no message delimiters: messages are JSON
//! texts written back to back. Replies are matched to requests by id. The
//! server may interleave its own `echo` requests (keepalives), which must be
//! answered, and notifications such as `update`, which are ignored because
//! Ariadne never monitors tables.

use crate::endpoint::Endpoint;
use crate::operation::{Operation, OperationResult, parse_transact_reply};
use crate::store::{StoreConnector, StoreError, StoreSession};
use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, UnixStream};

/// Connects to a real OVSDB server.
#[derive(Debug, Clone, Default)]
pub struct OvsdbConnector;

impl OvsdbConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StoreConnector for OvsdbConnector {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn StoreSession>, StoreError> {
        let unreachable = |e: std::io::Error| {
            StoreError::Connection(format!("failed to connect to {endpoint}: {e}"))
        };

        let session: Box<dyn StoreSession> = match endpoint {
            Endpoint::Unix(path) => {
                let stream = UnixStream::connect(path).await.map_err(unreachable)?;
                Box::new(OvsdbSession::new(stream))
            }
            Endpoint::Tcp { host, port } => {
                let stream = TcpStream::connect((host.as_str(), *port))
                    .await
                    .map_err(unreachable)?;
                stream.set_nodelay(true).map_err(unreachable)?;
                Box::new(OvsdbSession::new(stream))
            }
        };

        tracing::debug!(%endpoint, "Connected to OVSDB");
        Ok(session)
    }
}

/// A JSON-RPC session over any byte stream.
pub struct OvsdbSession<S> {
    stream: S,
    buffer: Vec<u8>,
    next_id: u64,
}

impl<S> OvsdbSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(8 * 1024),
            next_id: 0,
        }
    }

    /// Send a request and wait for its reply, answering echoes meanwhile.
    async fn call(&mut self, method: &str, params: Value) -> Result<Value, StoreError> {
        let id = self.next_id;
        self.next_id += 1;

        self.send(&json!({"method": method, "params": params, "id": id}))
            .await?;

        loop {
            let message = self.read_message().await?;

            if let Some(incoming) = message.get("method").and_then(Value::as_str) {
                if incoming == "echo" {
                    let reply = json!({
                        "result": message.get("params").cloned().unwrap_or(json!([])),
                        "error": null,
                        "id": message.get("id").cloned().unwrap_or(Value::Null),
                    });
                    self.send(&reply).await?;
                } else {
                    tracing::trace!(method = incoming, "Ignoring OVSDB notification");
                }
                continue;
            }

            if message.get("id") != Some(&json!(id)) {
                tracing::debug!(expected = id, "Ignoring unmatched OVSDB reply");
                continue;
            }

            if let Some(error) = message.get("error").filter(|e| !e.is_null()) {
                let text = match error {
                    Value::String(s) => s.clone(),
                    other => match other.get("error").and_then(Value::as_str) {
                        Some(kind) => match other.get("details").and_then(Value::as_str) {
                            Some(details) => format!("{kind}: {details}"),
                            None => kind.to_string(),
                        },
                        None => other.to_string(),
                    },
                };
                return Err(StoreError::Transaction(text));
            }

            return Ok(message.get("result").cloned().unwrap_or(Value::Null));
        }
    }

    async fn send(&mut self, message: &Value) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(message)
            .map_err(|e| StoreError::Decode(format!("failed to encode request: {e}")))?;
        self.stream
            .write_all(&bytes)
            .await
            .map_err(|e| StoreError::Connection(format!("write failed: {e}")))?;
        self.stream
            .flush()
            .await
            .map_err(|e| StoreError::Connection(format!("flush failed: {e}")))
    }

    async fn read_message(&mut self) -> Result<Value, StoreError> {
        loop {
            if let Some(message) = self.take_message()? {
                return Ok(message);
            }
            let read = self
                .stream
                .read_buf(&mut self.buffer)
                .await
                .map_err(|e| StoreError::Connection(format!("read failed: {e}")))?;
            if read == 0 {
                return Err(StoreError::Connection(
                    "connection closed by OVSDB server".to_string(),
                ));
            }
        }
    }

    /// Pop one complete JSON text off the front of the buffer, if there is one.
    fn take_message(&mut self) -> Result<Option<Value>, StoreError> {
        let Some(start) = self.buffer.iter().position(|b| !b.is_ascii_whitespace()) else {
            self.buffer.clear();
            return Ok(None);
        };

        let parsed = {
            let mut messages =
                serde_json::Deserializer::from_slice(&self.buffer[start..]).into_iter::<Value>();
            match messages.next() {
                Some(Ok(value)) => Some(Ok((value, start + messages.byte_offset()))),
                Some(Err(e)) if e.is_eof() => None,
                Some(Err(e)) => Some(Err(e)),
                None => None,
            }
        };

        match parsed {
            Some(Ok((value, consumed))) => {
                self.buffer.drain(..consumed);
                Ok(Some(value))
            }
            Some(Err(e)) => Err(StoreError::Decode(format!("malformed JSON-RPC message: {e}"))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<S> StoreSession for OvsdbSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn transact(
        &mut self,
        database: &str,
        operations: &[Operation],
    ) -> Result<Vec<OperationResult>, StoreError> {
        let mut params = vec![json!(database)];
        for operation in operations {
            params.push(
                serde_json::to_value(operation)
                    .map_err(|e| StoreError::Decode(format!("failed to encode operation: {e}")))?,
            );
        }

        let reply = self.call("transact", Value::Array(params)).await?;
        parse_transact_reply(operations.len(), reply)
    }

    async fn get_schema(&mut self, database: &str) -> Result<Value, StoreError> {
        self.call("get_schema", json!([database])).await
    }

    async fn close(mut self: Box<Self>) -> Result<(), StoreError> {
        self.stream
            .shutdown()
            .await
            .map_err(|e| StoreError::Connection(format!("shutdown failed: {e}")))
    }
}
