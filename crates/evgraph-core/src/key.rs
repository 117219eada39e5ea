//! Canonical keys.
//!
//! A key is the only identity a resource has inside the builder. Two resources
//! that derive the same key are drawn as the same node. All keys are lowercase.

pub const EVENTING_GROUP: &str = "eventing.knative.dev";
pub const EVENTING_VERSION: &str = "v1alpha1";
pub const MESSAGING_GROUP: &str = "messaging.knative.dev";
pub const MESSAGING_VERSION: &str = "v1alpha1";
pub const SERVING_GROUP: &str = "serving.knative.dev";
pub const SERVING_VERSION: &str = "v1beta1";

/// Key shared by every subscriber that names neither a URI nor a reference.
pub const UNKNOWN_SUBSCRIBER_KEY: &str = "?";

/// `group/version/kind/name`, lowercased.
pub fn gvk_key(group: &str, version: &str, kind: &str, name: &str) -> String {
    format!("{group}/{version}/{kind}/{name}").to_lowercase()
}

/// Key for a subscriber given as a literal URI.
pub fn uri_key(uri: &str) -> String {
    format!("uri/{uri}").to_lowercase()
}

/// Key for a typed object reference.
pub fn ref_key(api_version: &str, kind: &str, name: &str) -> String {
    format!("{api_version}/{kind}/{name}").to_lowercase()
}

/// Key for an "UnknownSink" placeholder standing in for an unresolved address.
pub fn unknown_sink_key(address: &str) -> String {
    format!("sink/{}", normalize_address(address)).to_lowercase()
}

pub fn channel_key(name: &str) -> String {
    eventing_key("channel", name)
}

pub fn subscription_key(name: &str) -> String {
    eventing_key("subscription", name)
}

pub fn broker_key(name: &str) -> String {
    eventing_key("broker", name)
}

pub fn trigger_key(name: &str) -> String {
    eventing_key("trigger", name)
}

pub fn sequence_key(name: &str) -> String {
    messaging_key("sequence", name)
}

pub fn sequence_step_key(name: &str, step: usize) -> String {
    messaging_key("sequencestep", &format!("{name}-{step}"))
}

pub fn serving_key(kind: &str, name: &str) -> String {
    gvk_key(SERVING_GROUP, SERVING_VERSION, kind, name)
}

fn eventing_key(kind: &str, name: &str) -> String {
    gvk_key(EVENTING_GROUP, EVENTING_VERSION, kind, name)
}

fn messaging_key(kind: &str, name: &str) -> String {
    gvk_key(MESSAGING_GROUP, MESSAGING_VERSION, kind, name)
}

/// Strip a single trailing slash so `http://a/` and `http://a` index the same.
pub fn normalize_address(address: &str) -> &str {
    address.strip_suffix('/').unwrap_or(address)
}
