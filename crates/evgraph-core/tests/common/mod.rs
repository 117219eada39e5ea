use evgraph_core::GraphBuilder;
use evgraph_core::resource::{
    AddressStatus, Broker, Channel, Container, EnvVar, ObjectMeta, ObjectReference,
    ReplyStrategy, RevisionSpec, RevisionTemplate, Sequence, SequenceSpec, Service, ServiceSpec,
    Source, SourceStatus, SubscriberSpec, Subscription, SubscriptionSpec, Trigger, TriggerSpec,
    TypeMeta,
};
use evgraph_dot::NodeId;
use tracing_subscriber::EnvFilter;

pub const EVENTING: &str = "eventing.knative.dev/v1alpha1";
pub const MESSAGING: &str = "messaging.knative.dev/v1alpha1";
pub const SERVING: &str = "serving.knative.dev/v1beta1";

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub fn channel(name: &str, url: &str) -> Channel {
    Channel {
        type_meta: TypeMeta::new(EVENTING, "Channel"),
        metadata: ObjectMeta::named(name),
        status: AddressStatus::with_url(url),
    }
}

#[allow(dead_code)]
pub fn broker(name: &str, url: &str) -> Broker {
    Broker {
        type_meta: TypeMeta::new(EVENTING, "Broker"),
        metadata: ObjectMeta::named(name),
        status: AddressStatus::with_url(url),
    }
}

#[allow(dead_code)]
pub fn service_ref(name: &str) -> SubscriberSpec {
    SubscriberSpec::reference(ObjectReference::new(SERVING, "Service", name))
}

#[allow(dead_code)]
pub fn trigger(name: &str, broker: &str, subscriber: Option<SubscriberSpec>) -> Trigger {
    Trigger {
        type_meta: TypeMeta::new(EVENTING, "Trigger"),
        metadata: ObjectMeta::named(name),
        spec: TriggerSpec {
            broker: broker.to_string(),
            filter: None,
            subscriber,
        },
    }
}

#[allow(dead_code)]
pub fn subscription(
    name: &str,
    channel: &str,
    subscriber: Option<SubscriberSpec>,
    reply_channel: Option<&str>,
) -> Subscription {
    Subscription {
        type_meta: TypeMeta::new(EVENTING, "Subscription"),
        metadata: ObjectMeta::named(name),
        spec: SubscriptionSpec {
            channel: ObjectReference::new(EVENTING, "Channel", channel),
            subscriber,
            reply: reply_channel.map(|c| ReplyStrategy {
                channel: Some(ObjectReference::new(EVENTING, "Channel", c)),
            }),
        },
    }
}

#[allow(dead_code)]
pub fn source(name: &str, sink: Option<&str>) -> Source {
    Source {
        type_meta: TypeMeta::new("sources.eventing.knative.dev/v1alpha1", "CronJobSource"),
        metadata: ObjectMeta::named(name),
        status: SourceStatus {
            sink_uri: sink.map(str::to_string),
        },
    }
}

#[allow(dead_code)]
pub fn service(name: &str, env: &[(&str, &str)]) -> Service {
    let container = Container {
        image: Some(format!("{name}:latest")),
        env: env.iter().map(|(k, v)| EnvVar::new(*k, *v)).collect(),
    };
    Service {
        type_meta: TypeMeta::new(SERVING, "Service"),
        metadata: ObjectMeta::named(name),
        spec: ServiceSpec {
            template: RevisionTemplate {
                spec: RevisionSpec {
                    containers: vec![container],
                },
            },
        },
    }
}

#[allow(dead_code)]
pub fn sequence(
    name: &str,
    url: &str,
    steps: Vec<SubscriberSpec>,
    reply: Option<ObjectReference>,
) -> Sequence {
    Sequence {
        type_meta: TypeMeta::new(MESSAGING, "Sequence"),
        metadata: ObjectMeta::named(name),
        spec: SequenceSpec { steps, reply },
        status: AddressStatus::with_url(url),
    }
}

/// Targets of edges leaving `from`, in creation order.
#[allow(dead_code)]
pub fn targets(builder: &GraphBuilder, from: NodeId) -> Vec<NodeId> {
    builder.graph().edges_from(from).map(|e| e.to()).collect()
}

/// Number of nodes whose name starts with `prefix`.
#[allow(dead_code)]
pub fn count_named(builder: &GraphBuilder, prefix: &str) -> usize {
    builder
        .graph()
        .nodes()
        .filter(|(_, n)| n.name().starts_with(prefix))
        .count()
}
