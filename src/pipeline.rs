use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::aws::cli::AwsCli;
use crate::cmd;
use crate::docker::{self, Image};
use crate::error::{ConvoyError, ConvoyResult};
use crate::roster::Roster;
use crate::swap::Cutover;

/// Deployment pipeline orchestrating image builds, registry
/// pushes, the application version release, and the blue/green
/// cutover.
pub struct Pipeline {
    image: Image,
    aws: Option<AwsCli>,
    roster_path: PathBuf,
    projects_dir: PathBuf,
    application: Option<String>,
    alias: Option<String>,
    certificate_arn: Option<String>,
}

impl Pipeline {
    #[must_use]
    pub fn new(image: Image) -> Self {
        Self {
            image,
            aws: None,
            roster_path: PathBuf::from("projects.json"),
            projects_dir: PathBuf::from("projects"),
            application: None,
            alias: None,
            certificate_arn: None,
        }
    }

    #[must_use]
    pub fn aws(mut self, aws: AwsCli) -> Self {
        self.aws = Some(aws);
        self
    }

    /// Location of the enabled-projects file.
    #[must_use]
    pub fn roster(mut self, path: &str) -> Self {
        self.roster_path = PathBuf::from(path);
        self
    }

    /// Directory holding the project checkouts.
    #[must_use]
    pub fn projects_dir(mut self, path: &str) -> Self {
        self.projects_dir = PathBuf::from(path);
        self
    }

    /// Elastic Beanstalk application name. Defaults to the image
    /// name.
    #[must_use]
    pub fn application(mut self, name: &str) -> Self {
        self.application = Some(name.to_string());
        self
    }

    /// Stable public CNAME prefix the fleet is reachable under.
    /// Defaults to the image name.
    #[must_use]
    pub fn alias(mut self, prefix: &str) -> Self {
        self.alias = Some(prefix.to_string());
        self
    }

    /// Certificate bound to the HTTPS listener of each new
    /// environment.
    #[must_use]
    pub fn certificate(mut self, arn: &str) -> Self {
        self.certificate_arn = Some(arn.to_string());
        self
    }

    /// Parse CLI arguments and dispatch the appropriate command.
    ///
    /// # Errors
    ///
    /// Returns an error if the dispatched command fails.
    pub fn run(&self) -> ConvoyResult<()> {
        let cli = Cli::parse();

        match &cli.command {
            Command::Build { enable, disable } => self.cmd_build(enable, disable),
            Command::Run => docker::run_container(&self.image),
            Command::Bash => docker::shell(&self.image),
            Command::Deploy { skip_build, no_swap } => self.cmd_deploy(*skip_build, *no_swap),
            Command::Status => self.cmd_status(),
        }
    }

    fn cmd_build(&self, enable: &[String], disable: &[String]) -> ConvoyResult<()> {
        self.select_projects(enable, disable)?;

        docker::pull_base(&self.image)?;
        docker::build(&self.image)
    }

    /// Merge discovered projects into the roster, apply the
    /// selection flags, and persist the result so the build
    /// context sees it.
    fn select_projects(&self, enable: &[String], disable: &[String]) -> ConvoyResult<()> {
        let mut roster = Roster::load(&self.roster_path);
        roster.discover(&self.projects_dir)?;

        for name in enable {
            if !roster.set_enabled(name, true) {
                eprintln!("Unknown project: {name}");
            }
        }
        for name in disable {
            if !roster.set_enabled(name, false) {
                eprintln!("Unknown project: {name}");
            }
        }

        roster.save()?;

        let enabled = roster.enabled();
        eprintln!("Enabled projects:");
        for (index, project) in enabled.iter().enumerate() {
            eprintln!("  {}. {}", index + 1, project.name);
        }
        if enabled.is_empty() {
            eprintln!("  (none)");
        }
        Ok(())
    }

    fn cmd_deploy(&self, skip_build: bool, no_swap: bool) -> ConvoyResult<()> {
        let aws = self
            .aws
            .as_ref()
            .ok_or_else(|| ConvoyError::Other("no AWS control plane configured".into()))?;

        aws.check_prerequisites()?;

        if !skip_build {
            self.select_projects(&[], &[])?;
            docker::pull_base(&self.image)?;
            docker::build(&self.image)?;
        }

        let registry_tag = self
            .image
            .registry
            .as_ref()
            .ok_or_else(|| ConvoyError::Other("no registry configured for deploy".into()))?;

        aws.registry_login(docker::registry_host(registry_tag))?;
        docker::push(&self.image, registry_tag)?;

        stage_and_release(aws)?;

        if no_swap {
            eprintln!("Skipping blue/green cutover (--no-swap)");
            return Ok(());
        }

        let app = self.application.as_deref().unwrap_or(&self.image.name);
        let alias = self.alias.as_deref().unwrap_or(&self.image.name);

        let mut cutover = Cutover::new(aws, app, alias);
        if let Some(arn) = &self.certificate_arn {
            cutover = cutover.certificate(arn);
        }
        cutover.run()
    }

    fn cmd_status(&self) -> ConvoyResult<()> {
        let aws = self
            .aws
            .as_ref()
            .ok_or_else(|| ConvoyError::Other("no AWS control plane configured".into()))?;

        let app = self.application.as_deref().unwrap_or(&self.image.name);
        let alias = self.alias.as_deref().unwrap_or(&self.image.name);

        match Cutover::new(aws, app, alias).discover_running()? {
            Some(env) => {
                println!("{}\t{}\t{}", env.name, env.status, env.cname);
            }
            None => println!("no running environment (first deploy)"),
        }
        Ok(())
    }
}

/// Stage the working tree so `eb deploy --staged` ships it
/// as-is (roster file included), then quietly unstage.
fn stage_and_release(aws: &AwsCli) -> ConvoyResult<()> {
    eprintln!("Releasing application version...");

    cmd::run("git", &["add", "-A"])?;
    cmd::run_interactive_env("eb", &["deploy", "--staged"], &aws.deploy_env())?;
    cmd::run("git", &["reset", "HEAD"])?;

    eprintln!("Release complete");
    Ok(())
}

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Deployment automation for the project fleet")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the production Docker image
    Build {
        /// Enable a project in the roster
        #[arg(long)]
        enable: Vec<String>,

        /// Disable a project in the roster
        #[arg(long)]
        disable: Vec<String>,
    },

    /// Run the container locally
    Run,

    /// Run a bash shell in the container
    Bash,

    /// Push the image and perform a blue/green deploy
    Deploy {
        /// Skip the Docker image build
        #[arg(long)]
        skip_build: bool,

        /// Release the application version without cutting over
        #[arg(long)]
        no_swap: bool,
    },

    /// Show the currently running environment
    Status,
}
