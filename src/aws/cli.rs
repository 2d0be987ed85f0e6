use serde::Deserialize;

use crate::aws::{ControlPlane, EnvStatus, Environment, LoadBalancer};
use crate::cmd;
use crate::error::{ConvoyError, ConvoyResult};

/// Control plane backed by the `aws` CLI.
///
/// Every call shells out with `--output json` and deserializes
/// the response. Credentials come from the named CLI profile;
/// nothing is read from the parent environment.
pub struct AwsCli {
    pub profile: Option<String>,
    pub region: String,
    pub solution_stack: String,
}

impl AwsCli {
    #[must_use]
    pub fn new() -> Self {
        Self {
            profile: None,
            region: "ap-northeast-2".to_string(),
            solution_stack: "64bit Amazon Linux 2 v4.0.0 running Docker".to_string(),
        }
    }

    #[must_use]
    pub fn region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    #[must_use]
    pub fn profile(mut self, profile: &str) -> Self {
        self.profile = Some(profile.to_string());
        self
    }

    /// Platform used when creating environments.
    #[must_use]
    pub fn solution_stack(mut self, stack: &str) -> Self {
        self.solution_stack = stack.to_string();
        self
    }

    /// Check that the deploy tooling is installed and the
    /// profile is authenticated.
    pub fn check_prerequisites(&self) -> ConvoyResult<()> {
        eprintln!("Checking prerequisites...");

        for tool in ["aws", "docker", "eb"] {
            if !cmd::command_exists(tool) {
                return Err(ConvoyError::PrerequisiteMissing(format!(
                    "{tool} is not installed"
                )));
            }
        }

        self.aws(&["sts", "get-caller-identity"]).map_err(|_| {
            ConvoyError::PrerequisiteMissing(format!(
                "profile '{}' is not authenticated. \
                 Run: aws configure",
                self.profile.as_deref().unwrap_or("default")
            ))
        })?;

        eprintln!("Prerequisites OK");
        Ok(())
    }

    /// Log in to the image registry by piping an ECR token into
    /// `docker login`.
    pub fn registry_login(&self, registry_host: &str) -> ConvoyResult<()> {
        eprintln!("Logging in to {registry_host}...");

        let profile = self
            .profile
            .as_ref()
            .map(|p| format!(" --profile {p}"))
            .unwrap_or_default();
        let pipeline = format!(
            "aws ecr get-login-password --region {}{profile} | \
             docker login --username AWS --password-stdin {registry_host}",
            self.region
        );
        cmd::run_pipeline(&pipeline)
    }

    /// Environment variables exported into subprocesses that use
    /// their own AWS tooling (the `eb` CLI release step).
    #[must_use]
    pub fn deploy_env(&self) -> Vec<(String, String)> {
        let mut envs = vec![("AWS_DEFAULT_REGION".to_string(), self.region.clone())];
        if let Some(profile) = &self.profile {
            envs.push(("AWS_PROFILE".to_string(), profile.clone()));
        }
        envs
    }

    fn aws(&self, args: &[&str]) -> ConvoyResult<String> {
        let mut full: Vec<&str> = args.to_vec();
        full.push("--output");
        full.push("json");
        full.push("--region");
        full.push(&self.region);
        if let Some(profile) = &self.profile {
            full.push("--profile");
            full.push(profile);
        }
        cmd::run("aws", &full)
    }
}

impl Default for AwsCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPlane for AwsCli {
    fn list_environments(&self, app: &str) -> ConvoyResult<Vec<Environment>> {
        let response = self.aws(&[
            "elasticbeanstalk",
            "describe-environments",
            "--application-name",
            app,
            "--no-include-deleted",
        ])?;

        Ok(parse_environments(&response)?
            .into_iter()
            .filter(|env| !env.status.is_terminated())
            .collect())
    }

    fn create_environment(
        &self,
        app: &str,
        name: &str,
        cname_prefix: &str,
    ) -> ConvoyResult<Environment> {
        let response = self.aws(&[
            "elasticbeanstalk",
            "create-environment",
            "--application-name",
            app,
            "--environment-name",
            name,
            "--cname-prefix",
            cname_prefix,
            "--solution-stack-name",
            &self.solution_stack,
        ])?;

        parse_environment(&response)
    }

    fn describe_environment(&self, app: &str, name: &str) -> ConvoyResult<Environment> {
        let response = self.aws(&[
            "elasticbeanstalk",
            "describe-environments",
            "--application-name",
            app,
            "--environment-names",
            name,
        ])?;

        parse_environments(&response)?
            .into_iter()
            .next()
            .ok_or_else(|| ConvoyError::EnvironmentNotFound(name.into()))
    }

    fn load_balancer(&self, env_name: &str) -> ConvoyResult<LoadBalancer> {
        let response = self.aws(&[
            "elasticbeanstalk",
            "describe-environment-resources",
            "--environment-name",
            env_name,
        ])?;
        let arn = parse_load_balancer_arn(&response)?;

        let response = self.aws(&[
            "elbv2",
            "describe-load-balancers",
            "--load-balancer-arns",
            &arn,
        ])?;
        let security_group = parse_security_group(&response)?;

        let response = self.aws(&[
            "elbv2",
            "describe-target-groups",
            "--load-balancer-arn",
            &arn,
        ])?;
        let target_group = parse_target_group(&response)?;

        Ok(LoadBalancer {
            arn,
            security_group,
            target_group,
        })
    }

    fn create_https_listener(
        &self,
        lb: &LoadBalancer,
        certificate_arn: &str,
    ) -> ConvoyResult<()> {
        let certificates = format!("CertificateArn={certificate_arn}");
        let actions = format!("Type=forward,TargetGroupArn={}", lb.target_group);

        self.aws(&[
            "elbv2",
            "create-listener",
            "--load-balancer-arn",
            &lb.arn,
            "--protocol",
            "HTTPS",
            "--port",
            "443",
            "--certificates",
            &certificates,
            "--default-actions",
            &actions,
        ])?;
        Ok(())
    }

    fn open_https_ingress(&self, security_group: &str) -> ConvoyResult<()> {
        self.aws(&[
            "ec2",
            "authorize-security-group-ingress",
            "--group-id",
            security_group,
            "--protocol",
            "tcp",
            "--port",
            "443",
            "--cidr",
            "0.0.0.0/0",
        ])?;
        Ok(())
    }

    fn swap_cnames(&self, source: &str, destination: &str) -> ConvoyResult<()> {
        self.aws(&[
            "elasticbeanstalk",
            "swap-environment-cnames",
            "--source-environment-name",
            source,
            "--destination-environment-name",
            destination,
        ])?;
        Ok(())
    }

    fn terminate_environment(&self, name: &str) -> ConvoyResult<()> {
        self.aws(&[
            "elasticbeanstalk",
            "terminate-environment",
            "--environment-name",
            name,
        ])?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct EnvironmentsResponse {
    #[serde(rename = "Environments", default)]
    environments: Vec<EnvironmentRecord>,
}

#[derive(Deserialize)]
struct EnvironmentRecord {
    #[serde(rename = "EnvironmentName")]
    name: String,
    #[serde(rename = "CNAME", default)]
    cname: String,
    #[serde(rename = "Status")]
    status: String,
}

#[derive(Deserialize)]
struct ResourcesResponse {
    #[serde(rename = "EnvironmentResources")]
    resources: EnvironmentResources,
}

#[derive(Deserialize)]
struct EnvironmentResources {
    #[serde(rename = "LoadBalancers", default)]
    load_balancers: Vec<NamedResource>,
}

#[derive(Deserialize)]
struct NamedResource {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Deserialize)]
struct LoadBalancersResponse {
    #[serde(rename = "LoadBalancers", default)]
    load_balancers: Vec<LoadBalancerRecord>,
}

#[derive(Deserialize)]
struct LoadBalancerRecord {
    #[serde(rename = "SecurityGroups", default)]
    security_groups: Vec<String>,
}

#[derive(Deserialize)]
struct TargetGroupsResponse {
    #[serde(rename = "TargetGroups", default)]
    target_groups: Vec<TargetGroupRecord>,
}

#[derive(Deserialize)]
struct TargetGroupRecord {
    #[serde(rename = "TargetGroupArn")]
    arn: String,
}

impl From<EnvironmentRecord> for Environment {
    fn from(record: EnvironmentRecord) -> Self {
        Self {
            name: record.name,
            cname: record.cname,
            status: EnvStatus::parse(&record.status),
        }
    }
}

/// Parse a `describe-environments` response.
pub fn parse_environments(json: &str) -> ConvoyResult<Vec<Environment>> {
    let response: EnvironmentsResponse = serde_json::from_str(json)?;
    Ok(response.environments.into_iter().map(Into::into).collect())
}

/// Parse a single top-level environment record, as returned by
/// `create-environment`.
pub fn parse_environment(json: &str) -> ConvoyResult<Environment> {
    let record: EnvironmentRecord = serde_json::from_str(json)?;
    Ok(record.into())
}

/// Extract the load balancer ARN from a
/// `describe-environment-resources` response. For an ALB the
/// reported name is the full ARN.
pub fn parse_load_balancer_arn(json: &str) -> ConvoyResult<String> {
    let response: ResourcesResponse = serde_json::from_str(json)?;
    response
        .resources
        .load_balancers
        .into_iter()
        .next()
        .map(|lb| lb.name)
        .ok_or_else(|| ConvoyError::AwsApi("environment has no load balancer".into()))
}

/// Extract the first security group from a
/// `describe-load-balancers` response.
pub fn parse_security_group(json: &str) -> ConvoyResult<String> {
    let response: LoadBalancersResponse = serde_json::from_str(json)?;
    response
        .load_balancers
        .into_iter()
        .next()
        .and_then(|lb| lb.security_groups.into_iter().next())
        .ok_or_else(|| ConvoyError::AwsApi("load balancer has no security group".into()))
}

/// Extract the target group ARN from a `describe-target-groups`
/// response.
pub fn parse_target_group(json: &str) -> ConvoyResult<String> {
    let response: TargetGroupsResponse = serde_json::from_str(json)?;
    response
        .target_groups
        .into_iter()
        .next()
        .map(|tg| tg.arn)
        .ok_or_else(|| ConvoyError::AwsApi("load balancer has no target group".into()))
}
