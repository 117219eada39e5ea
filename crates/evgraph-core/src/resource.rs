//! Typed eventing resources consumed by the graph builder.
//!
//! These mirror the Kubernetes object shapes closely enough to be read
//! straight from `kubectl get -o json` output. Only the fields the builder
//! looks at are modeled; everything else is ignored on deserialization.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

/// Split an apiVersion into `(group, version)`. Core `v1` has an empty group.
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    api_version.split_once('/').unwrap_or(("", api_version))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
}

impl TypeMeta {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    pub fn group_version(&self) -> (&str, &str) {
        split_api_version(&self.api_version)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }
}

/// Typed pointer at another object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

impl ObjectReference {
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn group_version(&self) -> (&str, &str) {
        split_api_version(&self.api_version)
    }
}

/// Where events get delivered: a literal URI or a typed reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<ObjectReference>,
}

impl SubscriberSpec {
    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            reference: None,
        }
    }

    pub fn reference(reference: ObjectReference) -> Self {
        Self {
            uri: None,
            reference: Some(reference),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyStrategy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ObjectReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// Status of anything that exposes an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl AddressStatus {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            address: Some(Address {
                url: Some(url.into()),
                hostname: None,
            }),
        }
    }

    /// The address URL: `url` if present, else `http://{hostname}`, else empty.
    pub fn url(&self) -> String {
        match &self.address {
            Some(Address { url: Some(url), .. }) => url.clone(),
            Some(Address {
                hostname: Some(host),
                ..
            }) => format!("http://{host}"),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: AddressStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSpec {
    #[serde(default)]
    pub channel: ObjectReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<SubscriberSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: SubscriptionSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broker {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: AddressStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAndType {
    #[serde(default)]
    pub source: String,
    #[serde(default, rename = "type")]
    pub event_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_and_type: Option<SourceAndType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSpec {
    #[serde(default)]
    pub broker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<TriggerFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<SubscriberSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: TriggerSpec,
}

impl Trigger {
    pub fn source_and_type(&self) -> Option<&SourceAndType> {
        self.spec.filter.as_ref()?.source_and_type.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink_uri: Option<String>,
}

/// Any event source. Sources are duck-typed: all that matters is the sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: SourceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionSpec {
    #[serde(default)]
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionTemplate {
    #[serde(default)]
    pub spec: RevisionSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    #[serde(default)]
    pub template: RevisionTemplate,
}

/// A serving Service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ServiceSpec,
}

impl Service {
    pub fn first_container(&self) -> Option<&Container> {
        self.spec.template.spec.containers.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSpec {
    #[serde(default)]
    pub steps: Vec<SubscriberSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ObjectReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: SequenceSpec,
    #[serde(default)]
    pub status: AddressStatus,
}

/// The resource kinds the builder has a rule for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr)]
pub enum ResourceKind {
    Channel,
    Broker,
    Sequence,
    Service,
    Source,
    Subscription,
    Trigger,
}

impl ResourceKind {
    /// Position when producers are added before consumers. Address owners
    /// come first, then services (which are subscriber targets), then the
    /// resources that point at them.
    pub fn producer_rank(self) -> u8 {
        match self {
            ResourceKind::Channel => 0,
            ResourceKind::Broker => 1,
            ResourceKind::Sequence => 2,
            ResourceKind::Service => 3,
            ResourceKind::Source => 4,
            ResourceKind::Subscription => 5,
            ResourceKind::Trigger => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Channel(Channel),
    Subscription(Subscription),
    Broker(Broker),
    Trigger(Trigger),
    Source(Source),
    Service(Service),
    Sequence(Sequence),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Channel(_) => ResourceKind::Channel,
            Resource::Subscription(_) => ResourceKind::Subscription,
            Resource::Broker(_) => ResourceKind::Broker,
            Resource::Trigger(_) => ResourceKind::Trigger,
            Resource::Source(_) => ResourceKind::Source,
            Resource::Service(_) => ResourceKind::Service,
            Resource::Sequence(_) => ResourceKind::Sequence,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Resource::Channel(r) => &r.metadata.name,
            Resource::Subscription(r) => &r.metadata.name,
            Resource::Broker(r) => &r.metadata.name,
            Resource::Trigger(r) => &r.metadata.name,
            Resource::Source(r) => &r.metadata.name,
            Resource::Service(r) => &r.metadata.name,
            Resource::Sequence(r) => &r.metadata.name,
        }
    }
}

macro_rules! impl_from_resource {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Resource {
                fn from(value: $ty) -> Self {
                    Resource::$ty(value)
                }
            }
        )*
    };
}

impl_from_resource!(Channel, Subscription, Broker, Trigger, Source, Service, Sequence);
