//! Graph construction.
//!
//! [`GraphBuilder`] turns eventing resources into nodes, clusters and edges of
//! a [`DotGraph`]. It keeps three indexes:
//!
//! - canonical key → node
//! - canonical key → cluster
//! - normalized address → canonical key of the resource serving it
//!
//! References are resolved against whatever has been added so far. A target
//! that is not known yet gets a placeholder node, and a real resource added
//! later does not replace it: the diagram depends on the order resources are
//! added in. Add producers (channels, brokers, sequences) before consumers, or
//! use [`BuildOrder::ProducersFirst`](crate::options::BuildOrder).

use std::collections::HashMap;

use evgraph_dot::{DotGraph, EdgeId, NodeId, SubgraphId};

use crate::key;
use crate::options::GraphOptions;
use crate::resource::{
    Broker, Channel, ObjectReference, ReplyStrategy, Resource, Sequence, Service, Source,
    Subscription, SubscriberSpec, Trigger,
};
use crate::style::{DEFAULT_SHAPE, INGRESS_SHAPE, SERVICE_SHAPE, color_at, shape_for_kind};

/// Name of the graph in DOT output.
pub const GRAPH_NAME: &str = "G";

/// Env vars on a Service whose value is an address the Service sends to.
const SINK_ENV_VARS: [&str; 2] = ["SINK", "TARGET"];

pub struct GraphBuilder {
    graph: DotGraph,
    nodes: HashMap<String, NodeId>,
    subgraphs: HashMap<String, SubgraphId>,
    addresses: HashMap<String, String>,
    palette: Vec<String>,
    rainbow_edges: bool,
    edge_count: usize,
}

impl GraphBuilder {
    pub fn new(options: &GraphOptions) -> Self {
        let mut graph = DotGraph::new(GRAPH_NAME);
        graph.set_attr("label", options.graph_label());
        graph.set_attr("rankdir", "LR");
        graph.set_node_default("shape", DEFAULT_SHAPE);

        Self {
            graph,
            nodes: HashMap::new(),
            subgraphs: HashMap::new(),
            addresses: HashMap::new(),
            palette: options.palette.clone(),
            rainbow_edges: options.rainbow_edges,
            edge_count: 0,
        }
    }

    pub fn graph(&self) -> &DotGraph {
        &self.graph
    }

    pub fn into_graph(self) -> DotGraph {
        self.graph
    }

    /// Render the accumulated graph as DOT text.
    pub fn render(&self) -> String {
        self.graph.render()
    }

    /// Node registered under `key`, if any.
    pub fn node_for(&self, key: &str) -> Option<NodeId> {
        self.nodes.get(key).copied()
    }

    /// Cluster registered under `key`, if any.
    pub fn subgraph_for(&self, key: &str) -> Option<SubgraphId> {
        self.subgraphs.get(key).copied()
    }

    /// Canonical key of the resource serving `address`.
    pub fn key_for_address(&self, address: &str) -> Option<&str> {
        self.addresses
            .get(key::normalize_address(address))
            .map(String::as_str)
    }

    /// Add any supported resource.
    pub fn add(&mut self, resource: &Resource) {
        match resource {
            Resource::Channel(r) => self.add_channel(r),
            Resource::Subscription(r) => self.add_subscription(r),
            Resource::Broker(r) => self.add_broker(r),
            Resource::Trigger(r) => self.add_trigger(r),
            Resource::Source(r) => self.add_source(r),
            Resource::Service(r) => self.add_service(r),
            Resource::Sequence(r) => self.add_sequence(r),
        }
    }

    pub fn add_channel(&mut self, channel: &Channel) {
        let name = &channel.metadata.name;
        let ck = key::channel_key(name);
        let url = channel.status.url();
        let address = key::normalize_address(&url);

        let cn = self.graph.add_node(format!("Channel {name}"));
        self.graph.set_node_attr(cn, "shape", INGRESS_SHAPE);
        self.graph.set_node_attr(cn, "label", "Ingress");

        self.nodes.insert(ck.clone(), cn);
        self.addresses.insert(address.to_string(), ck.clone());

        let cg = self.new_cluster(format!("Channel {name}\n{address}"));
        self.graph.attach_node(cg, cn);

        // Subscriptions name the channel by its own kind, e.g. InMemoryChannel.
        let (group, version) = channel.type_meta.group_version();
        let typed = key::gvk_key(group, version, &channel.type_meta.kind, name);
        if typed != ck {
            self.nodes.insert(typed.clone(), cn);
            self.subgraphs.insert(typed, cg);
        }
        self.subgraphs.insert(ck, cg);
    }

    pub fn add_subscription(&mut self, subscription: &Subscription) {
        let name = &subscription.metadata.name;
        let sk = key::subscription_key(name);
        let sn = self.graph.add_node(format!("Subscription {name}"));

        let channel = &subscription.spec.channel;
        let (group, version) = channel.group_version();
        let ck = key::gvk_key(group, version, &channel.kind, &channel.name);
        if let Some(cg) = self.subgraph_for(&ck) {
            self.graph.attach_node(cg, sn);
        }
        self.nodes.insert(sk, sn);

        let sub = self.resolve_subscriber(subscription.spec.subscriber.as_ref());
        let e = self.new_edge(sn, sub);
        self.graph.set_edge_attr(e, "dir", "both");

        if let Some(rep) = self.resolve_reply(subscription.spec.reply.as_ref()) {
            let e = self.new_edge(sn, rep);
            self.graph.set_edge_attr(e, "dir", "forward");
        }
    }

    pub fn add_broker(&mut self, broker: &Broker) {
        let name = &broker.metadata.name;
        let bk = key::broker_key(name);
        let url = broker.status.url();
        let address = key::normalize_address(&url);

        let bn = self.graph.add_node(format!("Broker {address}"));
        self.graph.set_node_attr(bn, "shape", INGRESS_SHAPE);
        self.graph.set_node_attr(bn, "label", "Ingress");

        self.nodes.insert(bk.clone(), bn);
        self.addresses.insert(address.to_string(), bk.clone());

        let bg = self.new_cluster(format!("Broker {name}\n{address}"));
        self.graph.attach_node(bg, bn);
        self.subgraphs.insert(bk, bg);
    }

    pub fn add_source(&mut self, source: &Source) {
        let meta = &source.type_meta;
        let name = &source.metadata.name;
        let (group, version) = meta.group_version();
        let sk = key::gvk_key(group, version, &meta.kind, name);

        let sn = self.graph.add_node(format!(
            "Source {name}\nKind: {}\n{}",
            meta.kind, meta.api_version
        ));
        self.graph.set_node_attr(sn, "shape", DEFAULT_SHAPE);
        self.nodes.insert(sk, sn);

        let sink = source
            .status
            .sink_uri
            .as_deref()
            .map(key::normalize_address)
            .unwrap_or_default();
        if sink.is_empty() {
            return;
        }

        let (target, owner) = self.resolve_sink(sink);
        let e = self.new_edge(sn, target);
        let cluster = owner.and_then(|k| self.subgraph_for(&k));
        if let Some(cg) = cluster {
            // Graphviz ignores lhead unless the graph sets compound=true.
            let cluster_name = self.graph.subgraph(cg).name().to_string();
            self.graph.set_edge_attr(e, "lhead", cluster_name);
        }
    }

    pub fn add_trigger(&mut self, trigger: &Trigger) {
        let broker = &trigger.spec.broker;
        let bk = key::broker_key(broker);
        if self.node_for(&bk).is_none() {
            tracing::debug!(
                trigger = %trigger.metadata.name,
                broker = %broker,
                "broker not found, adding placeholder"
            );
            let bn = self.graph.add_node(format!("UnknownBroker {broker}"));
            self.nodes.insert(bk.clone(), bn);
        }

        let name = &trigger.metadata.name;
        let tn = self.graph.add_node(format!("Trigger {name}"));
        self.graph.set_node_attr(tn, "shape", DEFAULT_SHAPE);
        if let Some(bg) = self.subgraph_for(&bk) {
            self.graph.attach_node(bg, tn);
        }
        self.nodes.insert(key::trigger_key(name), tn);

        if let Some(filter) = trigger.source_and_type() {
            let label = format!(
                "{}\nSource:{}\nType:{}",
                self.graph.node(tn).name(),
                filter.source,
                filter.event_type
            );
            self.graph.set_node_attr(tn, "label", label);
        }

        let sub = self.resolve_subscriber(trigger.spec.subscriber.as_ref());
        let e = self.new_edge(tn, sub);
        self.graph.set_edge_attr(e, "dir", "both");
    }

    pub fn add_service(&mut self, service: &Service) {
        let meta = &service.type_meta;
        let name = &service.metadata.name;
        let sk = key::serving_key(&meta.kind, name);

        let svc = match self.node_for(&sk) {
            Some(svc) => svc,
            None => {
                let svc = self.graph.add_node(format!(
                    "{name}\nKind: {}\n{}",
                    meta.kind, meta.api_version
                ));
                self.graph.set_node_attr(svc, "shape", SERVICE_SHAPE);
                self.nodes.insert(sk, svc);
                svc
            }
        };

        let Some(container) = service.first_container() else {
            tracing::debug!(service = %name, "service has no containers");
            return;
        };
        for env in &container.env {
            if !SINK_ENV_VARS.contains(&env.name.as_str()) || env.value.is_empty() {
                continue;
            }
            // The value is taken to be a full address.
            let (target, _) = self.resolve_sink(&env.value);
            self.new_edge(svc, target);
        }
    }

    pub fn add_sequence(&mut self, sequence: &Sequence) {
        let name = &sequence.metadata.name;
        let qk = key::sequence_key(name);
        let url = sequence.status.url();
        let address = key::normalize_address(&url);

        let sg = self.new_cluster(format!("Sequence {name}\n{address}"));

        self.addresses.insert(address.to_string(), qk.clone());
        let start = self.graph.add_node(format!("Sequence {address}"));
        self.graph.set_node_attr(start, "label", "Start");
        self.nodes.insert(qk.clone(), start);
        self.graph.attach_node(sg, start);

        let mut previous = start;
        for (num, step) in sequence.spec.steps.iter().enumerate() {
            let step_key = key::sequence_step_key(name, num);
            let step_node = self.graph.add_node(step_key.clone());
            self.graph.set_node_attr(step_node, "label", format!("Step {num}"));
            self.graph.set_node_attr(step_node, "shape", DEFAULT_SHAPE);
            self.graph.attach_node(sg, step_node);
            self.nodes.insert(step_key, step_node);

            let sub = self.resolve_subscriber(Some(step));
            let e = self.new_edge(step_node, sub);
            self.graph.set_edge_attr(e, "dir", "both");

            self.new_edge(previous, step_node);
            previous = step_node;
        }

        if let Some(reply) = &sequence.spec.reply {
            let reply_node = self.graph.add_node(format!("Reply {address}"));
            self.graph.set_node_attr(reply_node, "label", "Reply");
            self.graph.attach_node(sg, reply_node);
            self.new_edge(previous, reply_node);

            let (group, version) = reply.group_version();
            let rk = key::gvk_key(group, version, &reply.kind, &reply.name);
            if let Some(target) = self.node_for(&rk) {
                self.new_edge(reply_node, target);
            }
        }

        self.subgraphs.insert(qk, sg);
    }

    /// Node for a subscriber, created on first use.
    ///
    /// An absent subscriber, or one naming neither a URI nor a reference,
    /// resolves to the single shared `?` node.
    pub fn resolve_subscriber(&mut self, subscriber: Option<&SubscriberSpec>) -> NodeId {
        let mut sub_key = key::UNKNOWN_SUBSCRIBER_KEY.to_string();
        let mut label = key::UNKNOWN_SUBSCRIBER_KEY.to_string();
        let mut reference: Option<&ObjectReference> = None;

        if let Some(subscriber) = subscriber {
            if let Some(uri) = &subscriber.uri {
                label = uri.clone();
                sub_key = key::uri_key(uri);
            } else if let Some(r) = &subscriber.reference {
                label = format!("{}\nKind: {}\n{}", r.name, r.kind, r.api_version);
                sub_key = key::ref_key(&r.api_version, &r.kind, &r.name);
                reference = Some(r);
            }
        }

        if let Some(sub) = self.node_for(&sub_key) {
            return sub;
        }

        let sub = self.graph.add_node(label);
        if let Some(r) = reference {
            self.graph
                .set_node_attr(sub, "shape", shape_for_kind(&r.kind, &r.api_version));
        }
        self.nodes.insert(sub_key, sub);
        sub
    }

    /// Node for a reply target. Only channel replies are supported.
    ///
    /// A reply to a channel that has not been added yet yields `None`, so the
    /// subscription gets no reply edge at all rather than one to an
    /// "Unknown Channel" placeholder.
    pub fn resolve_reply(&mut self, reply: Option<&ReplyStrategy>) -> Option<NodeId> {
        let channel = reply?.channel.as_ref()?;
        let ck = key::channel_key(&channel.name);
        let node = self.node_for(&ck);
        if node.is_none() {
            tracing::debug!(
                channel = %channel.name,
                "reply channel not found, dropping reply edge"
            );
        }
        node
    }

    /// Node serving `address`, plus the key of its owner when known.
    ///
    /// Unknown addresses get an "UnknownSink" placeholder registered under a
    /// sink key, so every reference to the same unknown address shares it.
    pub fn resolve_sink(&mut self, address: &str) -> (NodeId, Option<String>) {
        let address = key::normalize_address(address);

        if let Some(owner) = self.addresses.get(address) {
            if let Some(&node) = self.nodes.get(owner) {
                return (node, Some(owner.clone()));
            }
        }

        let sink_key = key::unknown_sink_key(address);
        if let Some(node) = self.node_for(&sink_key) {
            return (node, None);
        }

        tracing::debug!(address = %address, "sink not found, adding placeholder");
        let node = self.graph.add_node(format!("UnknownSink {address}"));
        self.nodes.insert(sink_key, node);
        (node, None)
    }

    fn new_cluster(&mut self, label: String) -> SubgraphId {
        let cg = self
            .graph
            .add_subgraph(format!("cluster_{}", self.graph.subgraph_count()));
        self.graph.set_subgraph_attr(cg, "label", label);
        cg
    }

    fn new_edge(&mut self, from: NodeId, to: NodeId) -> EdgeId {
        let e = self.graph.add_edge(from, to);
        if self.rainbow_edges {
            if let Some(color) = color_at(&self.palette, self.edge_count) {
                let color = color.to_string();
                self.graph.set_edge_attr(e, "color", color);
            }
            self.edge_count += 1;
        }
        e
    }
}
