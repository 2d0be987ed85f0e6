//! Blue/green Elastic Beanstalk deployments from a typed Rust
//! DSL.
//!
//! Convoy hosts a fleet of Django projects behind one shared
//! production image and cuts traffic between two Elastic
//! Beanstalk environment slots with zero downtime. No shell
//! scripts, no console clicking.
//!
//! The name comes from how the fleet ships: every enabled
//! project travels in the same convoy.
//!
//! # Overview
//!
//! A deployment is defined as a [`Pipeline`] that wires together:
//!
//! - An [`Image`] describing the shared production container
//!   (Dockerfile, build args, registry tag, run limits)
//! - A [`Roster`] of enabled projects, persisted between runs
//! - An [`AwsCli`] control plane (profile, region, platform)
//! - A [`Cutover`] between the two environment slots
//!   ([`Slot::Blue`]/[`Slot::Green`]) behind a shared CNAME
//!
//! # Architecture
//!
//! Deploy mode follows a three-phase model:
//!
//! 1. **Build** - merge the project roster, pull the base image,
//!    build the production image
//! 2. **Release** - push to the registry and ship the staged
//!    application version
//! 3. **Cutover** - discover the running environment, provision
//!    the other slot, attach TLS, swap CNAMEs, terminate the old
//!    environment
//!
//! The control plane is pluggable via the
//! [`ControlPlane`](aws::ControlPlane) trait; [`AwsCli`] is the
//! real implementation on top of the `aws` CLI.
//!
//! # Examples
//!
//! ## Basic deployment
//!
//! Create an `xtask/src/main.rs` in your deploy repository:
//!
//! ```rust,no_run
//! use convoy::{AwsCli, Image, Pipeline};
//!
//! fn main() -> anyhow::Result<()> {
//!     let image = Image::new("eb-deploy-base")
//!         .dockerfile("Dockerfile.local")
//!         .base_image("python:3.7-slim")
//!         .registry(
//!             "469671560677.dkr.ecr.ap-northeast-2\
//!              .amazonaws.com/eb-deploy-base:latest",
//!         )
//!         .publish(8000, 80)
//!         .memory(1024, 1536)
//!         .cpus(1);
//!
//!     let pipeline = Pipeline::new(image)
//!         .aws(AwsCli::new().profile("eb-deploy-base"))
//!         .alias("eb-deploy-base")
//!         .certificate(
//!             "arn:aws:acm:ap-northeast-2:469671560677:\
//!              certificate/abcd",
//!         );
//!
//!     pipeline.run()?;
//!     Ok(())
//! }
//! ```
//!
//! Then use `cargo xtask` subcommands:
//!
//! ```sh
//! # Build the production image
//! cargo xtask build
//!
//! # Drop a project from the next run
//! cargo xtask build --disable study-watson
//!
//! # Try the container locally
//! cargo xtask run
//!
//! # Ship it: push, release, blue/green cutover
//! cargo xtask deploy
//!
//! # Release without cutting traffic over
//! cargo xtask deploy --no-swap
//!
//! # Which slot is live right now?
//! cargo xtask status
//! ```
//!
//! ## Driving the cutover directly
//!
//! The orchestrator is usable without the pipeline, e.g. to
//! re-run a cutover after a failed deploy left the swap
//! environment behind:
//!
//! ```rust,no_run
//! use convoy::{AwsCli, Cutover};
//!
//! fn main() -> anyhow::Result<()> {
//!     let aws = AwsCli::new().profile("eb-deploy-base");
//!     let cutover = Cutover::new(&aws, "eb-deploy-base", "eb-deploy-base")
//!         .certificate("arn:aws:acm:ap-northeast-2:469671560677:certificate/abcd");
//!
//!     cutover.run()?;
//!     Ok(())
//! }
//! ```
//!
//! If discovery finds more than one non-terminated environment,
//! the run aborts before touching anything - resolve the leftover
//! environment in the console and re-run.

// Allow noisy pedantic lints that don't add value for a
// deployment tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod aws;
pub mod cmd;
pub mod docker;
pub mod error;
pub mod pipeline;
pub mod roster;
pub mod swap;

pub use aws::cli::AwsCli;
pub use aws::{ControlPlane, EnvStatus, Environment, LoadBalancer};
pub use docker::Image;
pub use pipeline::Pipeline;
pub use roster::{Project, Roster};
pub use swap::{Cutover, Slot};
