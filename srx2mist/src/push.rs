//! Submitting compiled objects to Mist.
//!
//! The [`PushTarget`] trait is the seam between the translation and the
//! remote platform. [`MistClient`] talks to the Mist REST API; [`DryRun`]
//! only records what would have been sent. The `push_*` drivers submit one
//! object at a time and keep going after a failure, collecting every outcome
//! in a [`PushReport`].

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use indexmap::IndexMap;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use thiserror::Error;

use crate::compile::{
    IndirectNetwork, InterfaceNetwork, MistApplication, OrganizedNetworks, ServicePolicy,
};
use crate::registry::Namespace;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one Mist organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushContext {
    pub host: String,
    pub org_id: String,
    pub api_token: String,
}

impl PushContext {
    fn endpoint(&self, collection: &str) -> String {
        format!(
            "{}/api/v1/orgs/{}/{collection}",
            self.host.trim_end_matches('/'),
            self.org_id
        )
    }
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PushError {
    pub fn status(&self) -> Option<u16> {
        match self {
            PushError::Rejected { status, .. } => Some(*status),
            PushError::Transport(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

/// Either kind of network, serialized as the bare network object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Network<'a> {
    Interface(&'a InterfaceNetwork),
    Indirect(&'a IndirectNetwork),
}

impl Network<'_> {
    pub fn name(&self) -> &str {
        match self {
            Network::Interface(net) => &net.name,
            Network::Indirect(net) => &net.name,
        }
    }
}

/// Create operations on the remote platform, one object per call.
pub trait PushTarget {
    fn create_application(&mut self, app: &MistApplication) -> Result<(), PushError>;
    fn create_network(&mut self, network: Network<'_>) -> Result<(), PushError>;
    fn create_policy(&mut self, policy: &ServicePolicy) -> Result<(), PushError>;
}

/// Blocking Mist REST client.
pub struct MistClient {
    http: Client,
    context: PushContext,
}

impl MistClient {
    pub fn new(context: PushContext) -> Result<Self, PushError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, context })
    }

    fn post<T: Serialize + ?Sized>(&self, collection: &str, body: &T) -> Result<(), PushError> {
        let url = self.context.endpoint(collection);
        tracing::debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Token {}", self.context.api_token))
            .json(body)
            .send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(PushError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl PushTarget for MistClient {
    fn create_application(&mut self, app: &MistApplication) -> Result<(), PushError> {
        self.post("services", app)
    }

    fn create_network(&mut self, network: Network<'_>) -> Result<(), PushError> {
        self.post("networks", &network)
    }

    fn create_policy(&mut self, policy: &ServicePolicy) -> Result<(), PushError> {
        self.post("servicepolicies", policy)
    }
}

/// Records objects instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct DryRun {
    pub sent: Vec<(ObjectKind, String)>,
}

impl PushTarget for DryRun {
    fn create_application(&mut self, app: &MistApplication) -> Result<(), PushError> {
        self.sent.push((ObjectKind::Application, app.name.clone()));
        Ok(())
    }

    fn create_network(&mut self, network: Network<'_>) -> Result<(), PushError> {
        self.sent.push((ObjectKind::Network, network.name().to_string()));
        Ok(())
    }

    fn create_policy(&mut self, policy: &ServicePolicy) -> Result<(), PushError> {
        self.sent.push((ObjectKind::Policy, policy.name.clone()));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Application,
    Network,
    Policy,
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Application => write!(f, "application"),
            ObjectKind::Network => write!(f, "network"),
            ObjectKind::Policy => write!(f, "policy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushFailure {
    pub kind: ObjectKind,
    pub name: String,
    pub status: Option<u16>,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<PushFailure>,
}

impl PushReport {
    fn record(&mut self, kind: ObjectKind, name: &str, result: Result<(), PushError>) {
        self.attempted += 1;
        match result {
            Ok(()) => self.succeeded += 1,
            Err(err) => {
                tracing::warn!("error pushing {kind} {name}: {err}");
                self.failures.push(PushFailure {
                    kind,
                    name: name.to_string(),
                    status: err.status(),
                    error: err.to_string(),
                });
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn push_applications<T: PushTarget + ?Sized>(
    target: &mut T,
    apps: &Namespace<MistApplication>,
    report: &mut PushReport,
) {
    for app in apps.values() {
        let result = target.create_application(app);
        report.record(ObjectKind::Application, &app.name, result);
    }
}

/// Indirect networks of a zone go first so interface networks can refer to them.
pub fn push_networks<T: PushTarget + ?Sized>(
    target: &mut T,
    networks: &OrganizedNetworks,
    report: &mut PushReport,
) {
    for (_, zone) in networks.zones() {
        for net in zone.indirect_nets.values() {
            let result = target.create_network(Network::Indirect(net));
            report.record(ObjectKind::Network, &net.name, result);
        }
        for net in zone.interface_nets.values() {
            let result = target.create_network(Network::Interface(net));
            report.record(ObjectKind::Network, &net.name, result);
        }
    }
}

pub fn push_policies<T: PushTarget + ?Sized>(
    target: &mut T,
    policies: &IndexMap<String, ServicePolicy>,
    report: &mut PushReport,
) {
    for policy in policies.values() {
        let result = target.create_policy(policy);
        report.record(ObjectKind::Policy, &policy.name, result);
    }
}

/// Push everything, in dependency order: applications and networks before the
/// policies that name them.
pub fn push_all<T: PushTarget + ?Sized>(
    target: &mut T,
    apps: &Namespace<MistApplication>,
    networks: &OrganizedNetworks,
    policies: &IndexMap<String, ServicePolicy>,
) -> PushReport {
    let mut report = PushReport::default();
    push_applications(target, apps, &mut report);
    push_networks(target, networks, &mut report);
    push_policies(target, policies, &mut report);
    tracing::info!(
        attempted = report.attempted,
        failed = report.failures.len(),
        "push finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use set_config_core::parse;

    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use reqwest::blocking::Client;

    use super::{
        push_all, push_applications, push_networks, push_policies, DryRun, MistClient, Network,
        ObjectKind, PushContext, PushError, PushReport, PushTarget,
    };
    use crate::compile::{MistApplication, ServicePolicy};
    use crate::pipeline::{translate, Translation};
    use crate::resolve::AppDefinitions;

    /// Rejects every object whose name is listed.
    struct Flaky {
        reject: Vec<String>,
        calls: Vec<String>,
    }

    impl Flaky {
        fn outcome(&mut self, name: &str) -> Result<(), PushError> {
            self.calls.push(name.to_string());
            if self.reject.iter().any(|r| r == name) {
                return Err(PushError::Rejected {
                    status: 400,
                    body: r#"{"detail":"name already exists"}"#.to_string(),
                });
            }
            Ok(())
        }
    }

    impl PushTarget for Flaky {
        fn create_application(&mut self, app: &MistApplication) -> Result<(), PushError> {
            self.outcome(&app.name)
        }
        fn create_network(&mut self, network: Network<'_>) -> Result<(), PushError> {
            self.outcome(network.name())
        }
        fn create_policy(&mut self, policy: &ServicePolicy) -> Result<(), PushError> {
            self.outcome(&policy.name)
        }
    }

    /// Serve one canned HTTP response on a local port and hand back the
    /// request line, headers and body that were received.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let host = format!("http://{}", listener.local_addr().expect("addr"));
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read header");
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().expect("content length");
                    }
                }
                request.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut payload = vec![0; content_length];
            reader.read_exact(&mut payload).expect("read body");
            request.push_str(&String::from_utf8_lossy(&payload));

            let mut stream = reader.into_inner();
            write!(
                stream,
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .expect("write response");
            request
        });
        (host, handle)
    }

    fn local_client(host: String) -> MistClient {
        MistClient {
            http: Client::builder().no_proxy().build().expect("client"),
            context: PushContext {
                host,
                org_id: "org-1".to_string(),
                api_token: "secret".to_string(),
            },
        }
    }

    fn sample() -> Translation {
        let dump = "set security address-book global address lan 192.168.1.0/24\n\
            set security zones security-zone trust interfaces ge-0/0/0.0\n\
            set interfaces ge-0/0/0 unit 0 family inet address 10.0.0.1/24\n\
            set security policies from-zone trust to-zone untrust policy p1 match source-address lan\n\
            set security policies from-zone trust to-zone untrust policy p1 match destination-address any\n\
            set security policies from-zone trust to-zone untrust policy p1 match application junos-ssh\n\
            set security policies from-zone trust to-zone untrust policy p1 then permit\n\
            set security policies from-zone trust to-zone untrust policy p2 match source-address any\n\
            set security policies from-zone trust to-zone untrust policy p2 match destination-address any\n\
            set security policies from-zone trust to-zone untrust policy p2 match application junos-http\n\
            set security policies from-zone trust to-zone untrust policy p2 then deny\n";
        translate(&parse(dump), &AppDefinitions::empty())
    }

    #[test]
    fn endpoint_joins_host_and_org() {
        let ctx = PushContext {
            host: "https://api.mist.com/".to_string(),
            org_id: "org-1".to_string(),
            api_token: "secret".to_string(),
        };
        assert_eq!(
            ctx.endpoint("services"),
            "https://api.mist.com/api/v1/orgs/org-1/services"
        );
    }

    #[test]
    fn failures_do_not_stop_the_run() {
        let t = sample();
        let mut target = Flaky {
            reject: vec!["any-junos-ssh".to_string(), "p2".to_string()],
            calls: Vec::new(),
        };
        let mut report = PushReport::default();
        push_applications(&mut target, &t.compilation.applications, &mut report);
        push_policies(&mut target, &t.compilation.policies, &mut report);

        assert_eq!(
            target.calls,
            vec!["any-junos-ssh", "any-junos-http", "p1", "p2"]
        );
        assert_eq!(report.attempted, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].kind, ObjectKind::Application);
        assert_eq!(report.failures[0].status, Some(400));
        assert!(!report.is_clean());
    }

    #[test]
    fn networks_push_indirect_before_interface() {
        let t = sample();
        let mut target = DryRun::default();
        let mut report = PushReport::default();
        push_networks(&mut target, &t.compilation.networks, &mut report);

        let names: Vec<&str> = target.sent.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, vec!["trust_lan_1", "trust_any", "trust_ge_0/0/0_0"]);
        assert!(report.is_clean());
        assert_eq!(report.succeeded, 3);
    }

    #[test]
    fn network_payload_is_the_bare_object() {
        let t = sample();
        let zone = t.compilation.networks.zone("trust").expect("trust");
        let int_net = &zone.interface_nets["ge-0/0/0.0"];
        let json = serde_json::to_value(Network::Interface(int_net)).expect("serialize");
        assert_eq!(json["subnet"], "10.0.0.0/24");
        assert_eq!(json["routed_for_networks"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn push_all_orders_policies_last() {
        let t = sample();
        let c = &t.compilation;
        let mut target = DryRun::default();
        let report = push_all(&mut target, &c.applications, &c.networks, &c.policies);

        let kinds: Vec<ObjectKind> = target.sent.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                ObjectKind::Application,
                ObjectKind::Application,
                ObjectKind::Network,
                ObjectKind::Network,
                ObjectKind::Network,
                ObjectKind::Policy,
                ObjectKind::Policy,
            ]
        );
        assert_eq!(report.attempted, 7);
        assert!(report.is_clean());
    }

    #[test]
    fn client_accepts_success_status() {
        let t = sample();
        let (host, server) = serve_once("HTTP/1.1 200 OK", r#"{"id":"abc"}"#);
        let mut client = local_client(host);

        client
            .create_policy(&t.compilation.policies["p1"])
            .expect("2xx is success");

        let request = server.join().expect("server thread");
        assert!(request.starts_with("POST /api/v1/orgs/org-1/servicepolicies HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("authorization: token secret"));
        assert!(request.contains(r#""name":"p1""#));
    }

    #[test]
    fn client_maps_error_status_to_rejection() {
        let t = sample();
        let (host, server) = serve_once(
            "HTTP/1.1 400 Bad Request",
            r#"{"detail":"name already exists"}"#,
        );
        let mut client = local_client(host);

        let err = client
            .create_policy(&t.compilation.policies["p2"])
            .expect_err("4xx is rejected");
        server.join().expect("server thread");

        match err {
            PushError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, r#"{"detail":"name already exists"}"#);
            }
            other => panic!("expected rejection, got {other}"),
        }
    }
}
