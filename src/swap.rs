use std::thread;
use std::time::Duration;

use crate::aws::{ControlPlane, Environment};
use crate::error::{ConvoyError, ConvoyResult};

/// One of the two fixed environment identities that alternate the
/// active role across deploys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Blue,
    Green,
}

impl Slot {
    /// The slot the next environment is provisioned under.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Blue => Self::Green,
            Self::Green => Self::Blue,
        }
    }

    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
        }
    }

    /// Derive the slot from an environment name suffix. An
    /// environment matching neither suffix is a configuration
    /// error, handled the same way as a slot conflict: abort
    /// before mutating anything.
    pub fn of(env_name: &str) -> ConvoyResult<Self> {
        if env_name.ends_with("-blue") {
            Ok(Self::Blue)
        } else if env_name.ends_with("-green") {
            Ok(Self::Green)
        } else {
            Err(ConvoyError::UnknownSlot(env_name.to_string()))
        }
    }

    /// Environment name for this slot.
    #[must_use]
    pub fn env_name(self, app: &str) -> String {
        format!("{app}-{}", self.suffix())
    }
}

/// Zero-downtime cutover between the two environment slots behind
/// a shared CNAME.
///
/// The sequence is strictly sequential: discover the running
/// environment, create a parallel one under the other slot,
/// attach TLS to its load balancer, swap the CNAMEs, wait for the
/// swap to propagate, and terminate the old environment. Any
/// control-plane error aborts the run; no compensating rollback
/// is attempted, and the next run's discovery re-validates state
/// consistency.
pub struct Cutover<'a> {
    api: &'a dyn ControlPlane,
    app: String,
    alias: String,
    certificate_arn: Option<String>,
    poll_interval: Duration,
}

impl<'a> Cutover<'a> {
    /// `alias` is the stable public CNAME prefix the application
    /// is reachable under.
    #[must_use]
    pub fn new(api: &'a dyn ControlPlane, app: &str, alias: &str) -> Self {
        Self {
            api,
            app: app.to_string(),
            alias: alias.to_string(),
            certificate_arn: None,
            poll_interval: Duration::from_secs(5),
        }
    }

    /// Certificate bound to the HTTPS listener. Without one the
    /// TLS attachment step is skipped.
    #[must_use]
    pub fn certificate(mut self, arn: &str) -> Self {
        self.certificate_arn = Some(arn.to_string());
        self
    }

    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Find the single running environment.
    ///
    /// Returns `None` on first deploy (no environments). More
    /// than one non-terminated environment means a previous run
    /// left partial state behind; refuse to guess which one is
    /// live.
    pub fn discover_running(&self) -> ConvoyResult<Option<Environment>> {
        let mut envs = self.api.list_environments(&self.app)?;

        match envs.len() {
            0 => Ok(None),
            1 => Ok(envs.pop()),
            n => Err(ConvoyError::SlotConflict(n)),
        }
    }

    /// Execute the full cutover.
    pub fn run(&self) -> ConvoyResult<()> {
        match self.discover_running()? {
            None => self.first_deploy(),
            Some(old) => {
                let slot = Slot::of(&old.name)?.other();
                eprintln!(
                    "Running environment: {} ({}), swapping to {} slot",
                    old.name, old.status, slot.suffix()
                );

                let fresh = self.create_swap_environment(slot)?;
                self.attach_tls(&fresh)?;
                self.swap_alias(&old, &fresh)?;

                eprintln!();
                eprintln!("========================================");
                eprintln!("Cutover complete!");
                eprintln!("========================================");
                eprintln!();
                eprintln!("Live environment: {}", fresh.name);
                eprintln!("Alias: {}", self.alias);
                Ok(())
            }
        }
    }

    /// No environment exists yet: create the blue slot directly
    /// under the live alias. Nothing to swap or terminate.
    fn first_deploy(&self) -> ConvoyResult<()> {
        let name = Slot::Blue.env_name(&self.app);
        eprintln!("No running environment, first deploy: creating {name}...");

        let env = self.api.create_environment(&self.app, &name, &self.alias)?;
        self.attach_tls(&env)?;

        eprintln!("Environment {} created ({})", env.name, env.status);
        Ok(())
    }

    /// Provision the parallel environment under a temporary
    /// `-swap` alias; it takes over the live alias in
    /// [`swap_alias`](Self::swap_alias).
    fn create_swap_environment(&self, slot: Slot) -> ConvoyResult<Environment> {
        let name = slot.env_name(&self.app);
        let swap_alias = format!("{}-swap", self.alias);

        eprintln!("Creating swap environment {name} ({swap_alias})...");
        self.api.create_environment(&self.app, &name, &swap_alias)
    }

    /// Bind the certificate to a new port-443 listener on the
    /// environment's load balancer and open the port on its
    /// security group. No rollback on partial failure; leftover
    /// state is manual cleanup.
    fn attach_tls(&self, env: &Environment) -> ConvoyResult<()> {
        let Some(certificate_arn) = &self.certificate_arn else {
            eprintln!("No certificate configured, skipping HTTPS listener");
            return Ok(());
        };

        eprintln!("Attaching TLS to {}...", env.name);

        let lb = self.api.load_balancer(&env.name)?;
        self.api.create_https_listener(&lb, certificate_arn)?;
        self.api.open_https_ingress(&lb.security_group)?;

        eprintln!("HTTPS listener created on {}", lb.arn);
        Ok(())
    }

    /// Exchange the CNAMEs, wait until the new environment
    /// reports the live alias, then terminate the old
    /// environment.
    fn swap_alias(&self, old: &Environment, fresh: &Environment) -> ConvoyResult<()> {
        eprintln!("Swapping CNAMEs: {} <-> {}", old.name, fresh.name);
        self.api.swap_cnames(&old.name, &fresh.name)?;

        let expected = format!("{}.", self.alias);
        let mut attempt: u32 = 0;
        loop {
            let current = self.api.describe_environment(&self.app, &fresh.name)?;
            if current.cname.starts_with(&expected) {
                eprintln!("Alias propagated: {}", current.cname);
                break;
            }

            attempt += 1;
            eprintln!("Waiting for alias propagation (attempt {attempt})...");
            thread::sleep(self.poll_interval);
        }

        eprintln!("Terminating old environment {}...", old.name);
        self.api.terminate_environment(&old.name)
    }
}
