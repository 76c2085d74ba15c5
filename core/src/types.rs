//! Entity model and resource descriptors.
//!
//! # Design
//! An `Entity` is any serde-friendly record with a server-assigned
//! identifier. The identifier type only needs `FromStr + Display`, so string,
//! integer and UUID ids all work and caller-supplied ids can be checked
//! against the type before any request goes out.

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// A record representing one server-side resource instance.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Id: FromStr + Display + Send + Sync;

    /// Server-assigned identifier. `None` until the entity has been created.
    fn id(&self) -> Option<&Self::Id>;
}

/// A user record as served by the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub avatar: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// A not-yet-created user; the server fills in `id` and `createdAt`.
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            avatar: avatar.into(),
            created_at: None,
        }
    }
}

impl Entity for User {
    type Id = String;

    fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }
}

/// Pairs an entity type with its collection path segment, e.g. `users`.
#[derive(Debug)]
pub struct Resource<E> {
    collection: String,
    _entity: PhantomData<fn() -> E>,
}

// Manual impl: `E` itself does not need to be `Clone`.
impl<E> Clone for Resource<E> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Resource<E> {
    pub fn new(collection: &str) -> Result<Self> {
        let collection = collection.trim_matches('/');
        if collection.is_empty() {
            return Err(ApiError::InvalidArgument(
                "collection name must not be empty".to_string(),
            ));
        }
        if let Some(c) = collection.chars().find(|&c| is_reserved(c)) {
            return Err(ApiError::InvalidArgument(format!(
                "collection name {collection:?} contains reserved character {c:?}"
            )));
        }
        Ok(Self {
            collection: collection.to_string(),
            _entity: PhantomData,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Path of the whole collection, relative to the base address.
    pub fn collection_path(&self) -> String {
        self.collection.clone()
    }

    /// Path of one member. Fails fast on identifiers that are empty, would
    /// escape their path segment, or do not parse as `E::Id`. The segment is
    /// the parsed id's canonical `Display` form, not the caller's spelling.
    pub fn member_path(&self, id: &str) -> Result<String> {
        let id = validate_id::<E>(id)?;
        Ok(format!("{}/{id}", self.collection))
    }
}

fn is_reserved(c: char) -> bool {
    matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
}

/// Check a caller-supplied identifier against the entity's id type and
/// return the parsed value.
pub fn validate_id<E: Entity>(id: &str) -> Result<E::Id> {
    check_segment(id)?;
    let parsed = id.parse::<E::Id>().map_err(|_| {
        ApiError::InvalidArgument(format!("identifier {id:?} is not valid for this resource"))
    })?;
    // A custom `Display` must still produce a single plain segment.
    check_segment(&parsed.to_string())?;
    Ok(parsed)
}

fn check_segment(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidArgument(
            "identifier must not be empty".to_string(),
        ));
    }
    if id == "." || id == ".." {
        return Err(ApiError::InvalidArgument(format!(
            "identifier {id:?} is a relative path segment"
        )));
    }
    if let Some(c) = id.chars().find(|&c| is_reserved(c)) {
        return Err(ApiError::InvalidArgument(format!(
            "identifier {id:?} contains reserved character {c:?}"
        )));
    }
    Ok(())
}
