//! Loading resource sets from JSON.
//!
//! Accepts either a Kubernetes `List` (`{"items": [...]}`) or a bare array of
//! objects, which is what `kubectl get ... -o json` produces for several
//! resource types at once. Items the builder has no rule for are skipped.

use std::fs;
use std::path::Path;

use evgraph_error::{Error, ErrorKind, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::key::{EVENTING_GROUP, MESSAGING_GROUP, SERVING_GROUP};
use crate::options::BuildOrder;
use crate::resource::{Resource, split_api_version};

/// An ordered collection of resources to build one graph from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSet {
    resources: Vec<Resource>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resource: impl Into<Resource>) {
        self.resources.push(resource.into());
    }

    pub fn with(mut self, resource: impl Into<Resource>) -> Self {
        self.push(resource);
        self
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Resources in the order the builder should see them.
    pub fn ordered(&self, order: BuildOrder) -> Vec<&Resource> {
        let mut ordered: Vec<&Resource> = self.resources.iter().collect();
        if order == BuildOrder::ProducersFirst {
            ordered.sort_by_key(|r| r.kind().producer_rank());
        }
        ordered
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            Error::from(err)
                .with_operation("manifest::from_path")
                .with_context("path", path.display().to_string())
        })?;
        Self::from_json_str(&text).map_err(|err| {
            err.with_operation("manifest::from_path")
                .with_context("path", path.display().to_string())
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|err| {
            Error::deserialization_failed(err.to_string())
                .with_operation("manifest::from_json_str")
                .set_source(err)
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut object) => match object.remove("items") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(Error::invalid_format("expected an object with an `items` array")
                        .with_operation("manifest::from_value"));
                }
            },
            _ => {
                return Err(Error::invalid_format("expected a JSON array or a List object")
                    .with_operation("manifest::from_value"));
            }
        };

        let mut set = ResourceSet::new();
        for (index, item) in items.into_iter().enumerate() {
            match parse_resource(item) {
                Ok(resource) => set.push(resource),
                Err(err) if err.kind() == ErrorKind::UnsupportedResource => {
                    tracing::warn!(index, error = %err, "skipping item");
                }
                Err(err) => {
                    return Err(err
                        .with_operation("manifest::from_value")
                        .with_context("index", index.to_string()));
                }
            }
        }
        tracing::debug!(count = set.len(), "loaded resources");
        Ok(set)
    }
}

impl FromIterator<Resource> for ResourceSet {
    fn from_iter<T: IntoIterator<Item = Resource>>(iter: T) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResourceSet {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

/// Turn one manifest item into a typed resource, dispatching on group and kind.
pub fn parse_resource(item: Value) -> Result<Resource> {
    let api_version = item
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let kind = item
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let (group, _) = split_api_version(&api_version);

    let resource = match (group, kind.as_str()) {
        (EVENTING_GROUP | MESSAGING_GROUP, "Channel" | "InMemoryChannel") => {
            Resource::Channel(decode(item, &kind)?)
        }
        (EVENTING_GROUP | MESSAGING_GROUP, "Subscription") => {
            Resource::Subscription(decode(item, &kind)?)
        }
        (EVENTING_GROUP, "Broker") => Resource::Broker(decode(item, &kind)?),
        (EVENTING_GROUP, "Trigger") => Resource::Trigger(decode(item, &kind)?),
        (MESSAGING_GROUP, "Sequence") => Resource::Sequence(decode(item, &kind)?),
        (SERVING_GROUP, "Service") => Resource::Service(decode(item, &kind)?),
        _ if is_source(group, &item) => Resource::Source(decode(item, &kind)?),
        _ => return Err(Error::unsupported_resource(&api_version, &kind)),
    };
    Ok(resource)
}

/// Sources are duck-typed: a `sources.*` group or a `status.sinkUri` field.
fn is_source(group: &str, item: &Value) -> bool {
    group.starts_with("sources.")
        || item
            .pointer("/status/sinkUri")
            .is_some_and(|sink| sink.is_string())
}

fn decode<T: DeserializeOwned>(item: Value, kind: &str) -> Result<T> {
    serde_json::from_value(item).map_err(|err| {
        Error::deserialization_failed(err.to_string())
            .with_context("kind", kind)
            .set_source(err)
    })
}
