use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("gemchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("gemchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("gemchat.client.request_duration_seconds");

pub(crate) static STREAM_EVENTS: Counter = Counter::new("gemchat.stream.events");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("gemchat.stream.errors");
pub(crate) static STREAM_BYTES: Counter = Counter::new("gemchat.stream.bytes");
pub(crate) static STREAM_TTFB: Moments = Moments::new("gemchat.stream.ttfb_seconds");

pub(crate) static GENERATOR_CALLS: Counter = Counter::new("gemchat.generator.calls");
pub(crate) static GENERATOR_CONFIGURATION_ERRORS: Counter =
    Counter::new("gemchat.generator.configuration_errors");
pub(crate) static GENERATOR_UPSTREAM_ERRORS: Counter =
    Counter::new("gemchat.generator.upstream_errors");
pub(crate) static GENERATOR_FRAGMENTS: Counter = Counter::new("gemchat.generator.fragments");
pub(crate) static GENERATOR_DURATION: Moments =
    Moments::new("gemchat.generator.duration_seconds");

pub(crate) static SESSION_SUBMISSIONS: Counter = Counter::new("gemchat.session.submissions");
pub(crate) static SESSION_IGNORED_SUBMISSIONS: Counter =
    Counter::new("gemchat.session.ignored_submissions");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_EVENTS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_BYTES);
    collector.register_moments(&STREAM_TTFB);

    collector.register_counter(&GENERATOR_CALLS);
    collector.register_counter(&GENERATOR_CONFIGURATION_ERRORS);
    collector.register_counter(&GENERATOR_UPSTREAM_ERRORS);
    collector.register_counter(&GENERATOR_FRAGMENTS);
    collector.register_moments(&GENERATOR_DURATION);

    collector.register_counter(&SESSION_SUBMISSIONS);
    collector.register_counter(&SESSION_IGNORED_SUBMISSIONS);
}
