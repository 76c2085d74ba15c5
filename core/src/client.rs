//! Typed CRUD client for one resource collection.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that classifies an `HttpResponse`.
//! The async operations (`list_all`, `get_one`, `create`, `update`,
//! `delete`) run build, transport and parse in sequence. Callers that want
//! to do their own I/O can use the two halves directly.

use std::fmt;
use std::sync::Arc;

use crate::classify::{decode_body, expect_empty};
use crate::codec::JsonCodec;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Entity, Resource};

/// Client for the collection described by a `Resource<E>`.
///
/// Clones share the transport. No state changes between calls, so any
/// number of operations may be in flight at once.
pub struct ResourceClient<E> {
    transport: Arc<dyn Transport>,
    resource: Resource<E>,
    codec: JsonCodec,
}

impl<E> Clone for ResourceClient<E> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            resource: self.resource.clone(),
            codec: self.codec,
        }
    }
}

impl<E: Entity> fmt::Debug for ResourceClient<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("collection", &self.resource.collection())
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl<E: Entity> ResourceClient<E> {
    pub fn new(transport: Arc<dyn Transport>, resource: Resource<E>, codec: JsonCodec) -> Self {
        Self {
            transport,
            resource,
            codec,
        }
    }

    /// Convenience constructor with a fresh `HttpTransport`. To share one
    /// connection pool between collections, build the transport once and
    /// use `new`.
    pub fn connect(config: &ClientConfig, collection: &str) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(
            Arc::new(transport),
            Resource::new(collection)?,
            JsonCodec::from_config(config),
        ))
    }

    pub fn resource(&self) -> &Resource<E> {
        &self.resource
    }

    // --- async operations ---

    pub async fn list_all(&self) -> Result<Vec<E>> {
        let response = self.send(self.build_list()).await?;
        self.parse_list(response)
    }

    pub async fn get_one(&self, id: &str) -> Result<E> {
        let request = self.build_get(id)?;
        let response = self.send(request).await?;
        self.parse_get(response)
    }

    /// Returns the entity as stored by the server, including its new id.
    pub async fn create(&self, entity: &E) -> Result<E> {
        let request = self.build_create(entity)?;
        let response = self.send(request).await?;
        self.parse_create(response)
    }

    /// Full replace. On 204 the caller's `entity` is returned as-is.
    pub async fn update(&self, id: &str, entity: &E) -> Result<E> {
        let request = self.build_update(id, entity)?;
        let response = self.send(request).await?;
        self.parse_update(response, entity)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let request = self.build_delete(id)?;
        let response = self.send(request).await?;
        self.parse_delete(response)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        match self.transport.execute(request).await {
            Ok(response) => Ok(response),
            // Nothing was sent: the caller's input produced an unusable path.
            Err(e @ TransportError::InvalidPath { .. }) => {
                Err(ApiError::InvalidArgument(e.to_string()))
            }
            Err(e) => Err(ApiError::Network(e)),
        }
    }

    // --- request builders ---

    pub fn build_list(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.resource.collection_path())
    }

    pub fn build_get(&self, id: &str) -> Result<HttpRequest> {
        Ok(HttpRequest::new(HttpMethod::Get, self.resource.member_path(id)?))
    }

    pub fn build_create(&self, entity: &E) -> Result<HttpRequest> {
        let body = self.codec.encode(entity)?;
        Ok(HttpRequest::new(HttpMethod::Post, self.resource.collection_path()).with_json_body(body))
    }

    pub fn build_update(&self, id: &str, entity: &E) -> Result<HttpRequest> {
        let path = self.resource.member_path(id)?;
        let body = self.codec.encode(entity)?;
        Ok(HttpRequest::new(HttpMethod::Put, path).with_json_body(body))
    }

    pub fn build_delete(&self, id: &str) -> Result<HttpRequest> {
        Ok(HttpRequest::new(HttpMethod::Delete, self.resource.member_path(id)?))
    }

    // --- response parsers ---

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<E>> {
        decode_body(&self.codec, &response, &[200])
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<E> {
        decode_body(&self.codec, &response, &[200])
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<E> {
        let created: E = decode_body(&self.codec, &response, &[200, 201])?;
        match created.id() {
            Some(id) if !id.to_string().is_empty() => Ok(created),
            _ => Err(ApiError::Decode(
                "created entity is missing its identifier".to_string(),
            )),
        }
    }

    pub fn parse_update(&self, response: HttpResponse, supplied: &E) -> Result<E> {
        if response.status == 204 {
            return Ok(supplied.clone());
        }
        decode_body(&self.codec, &response, &[200])
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        expect_empty(&self.codec, &response, &[200, 204])
    }
}
