//! Basic deployment pipeline example.
//!
//! Demonstrates building the shared production image, pushing it
//! to ECR, and cutting traffic over with a blue/green swap.
//!
//! ```sh
//! # Build the production image
//! cargo xtask build
//!
//! # Ship it: push, release, blue/green cutover
//! cargo xtask deploy
//!
//! # Which slot is live right now?
//! cargo xtask status
//! ```

use convoy::{AwsCli, Image, Pipeline};

fn main() -> anyhow::Result<()> {
    let image = Image::new("eb-deploy-base")
        .dockerfile("Dockerfile.local")
        .base_image("python:3.7-slim")
        .registry("469671560677.dkr.ecr.ap-northeast-2.amazonaws.com/eb-deploy-base:latest")
        .publish(8000, 80)
        .memory(1024, 1536)
        .cpus(1);

    let pipeline = Pipeline::new(image)
        .aws(AwsCli::new().profile("eb-deploy-base"))
        .alias("eb-deploy-base")
        .certificate("arn:aws:acm:ap-northeast-2:469671560677:certificate/abcd");

    pipeline.run()?;
    Ok(())
}
