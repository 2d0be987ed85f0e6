pub mod cli;

use std::fmt;

use crate::error::ConvoyResult;

/// Lifecycle status of an Elastic Beanstalk environment, mapped
/// from the provider's status strings. Unrecognized statuses are
/// carried verbatim rather than failing the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvStatus {
    Launching,
    Updating,
    Ready,
    Terminating,
    Terminated,
    Other(String),
}

impl EnvStatus {
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status {
            "Launching" => Self::Launching,
            "Updating" => Self::Updating,
            "Ready" => Self::Ready,
            "Terminating" => Self::Terminating,
            "Terminated" => Self::Terminated,
            other => Self::Other(other.to_string()),
        }
    }

    /// Terminated environments are invisible to discovery; every
    /// other status counts against the one-environment invariant.
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for EnvStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launching => write!(f, "Launching"),
            Self::Updating => write!(f, "Updating"),
            Self::Ready => write!(f, "Ready"),
            Self::Terminating => write!(f, "Terminating"),
            Self::Terminated => write!(f, "Terminated"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// A deployment environment as reported by the control plane.
#[derive(Debug, Clone)]
pub struct Environment {
    pub name: String,
    pub cname: String,
    pub status: EnvStatus,
}

/// An environment's load balancer and the resources TLS
/// attachment needs.
#[derive(Debug, Clone)]
pub struct LoadBalancer {
    pub arn: String,
    pub security_group: String,
    pub target_group: String,
}

/// The slice of the cloud control plane the deploy flow touches:
/// environment lifecycle, load balancer lookup, TLS attachment,
/// and the CNAME swap.
///
/// Listener creation and the ingress rule are separate methods so
/// callers can observe each mutation individually.
pub trait ControlPlane {
    /// List the application's non-terminated environments.
    fn list_environments(&self, app: &str) -> ConvoyResult<Vec<Environment>>;

    /// Create a new environment under `name` with the given CNAME
    /// prefix. Creation is not idempotent; a duplicate left by a
    /// partial failure surfaces as a discovery conflict on the
    /// next run.
    fn create_environment(
        &self,
        app: &str,
        name: &str,
        cname_prefix: &str,
    ) -> ConvoyResult<Environment>;

    /// Fetch one environment by name.
    fn describe_environment(&self, app: &str, name: &str) -> ConvoyResult<Environment>;

    /// Discover an environment's load balancer, its security
    /// group, and its target group.
    fn load_balancer(&self, env_name: &str) -> ConvoyResult<LoadBalancer>;

    /// Create an HTTPS listener on port 443 bound to the
    /// certificate, forwarding to the load balancer's target
    /// group.
    fn create_https_listener(
        &self,
        lb: &LoadBalancer,
        certificate_arn: &str,
    ) -> ConvoyResult<()>;

    /// Open inbound port 443 on the load balancer's security
    /// group.
    fn open_https_ingress(&self, security_group: &str) -> ConvoyResult<()>;

    /// Exchange the CNAMEs of two environments.
    fn swap_cnames(&self, source: &str, destination: &str) -> ConvoyResult<()>;

    /// Begin terminating an environment.
    fn terminate_environment(&self, name: &str) -> ConvoyResult<()>;
}
