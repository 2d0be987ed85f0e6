//! Multi-project fleet example.
//!
//! Several Django projects ride in one production image; the
//! roster file records which ones are enabled for a run and
//! survives between runs.
//!
//! ```sh
//! # Drop a project from the next build
//! cargo xtask build --disable study-watson
//!
//! # Bring it back
//! cargo xtask build --enable study-watson
//! ```

use convoy::error::ConvoyError;
use convoy::{AwsCli, Image, Pipeline};

fn secret_env(key: &str) -> Result<String, ConvoyError> {
    std::env::var(key).map_err(|_| ConvoyError::EnvMissing(key.to_string()))
}

fn main() -> anyhow::Result<()> {
    // The image fetches per-project settings from Secrets Manager
    // at startup; its read-only credentials travel as build args.
    let access_key = secret_env("AWS_SECRETS_MANAGER_ACCESS_KEY_ID")?;
    let secret_key = secret_env("AWS_SECRETS_MANAGER_SECRET_ACCESS_KEY")?;

    let image = Image::new("eb-deploy-base")
        .dockerfile("Dockerfile.local")
        .base_image("python:3.7-slim")
        .build_arg("AWS_SECRETS_MANAGER_ACCESS_KEY_ID", &access_key)
        .build_arg("AWS_SECRETS_MANAGER_SECRET_ACCESS_KEY", &secret_key)
        .registry("469671560677.dkr.ecr.ap-northeast-2.amazonaws.com/eb-deploy-base:latest");

    let pipeline = Pipeline::new(image)
        .aws(
            AwsCli::new()
                .profile("eb-deploy-base")
                .region("ap-northeast-2"),
        )
        .roster("projects.json")
        .projects_dir("projects")
        .application("eb-deploy-base")
        .alias("eb-deploy-base");

    pipeline.run()?;
    Ok(())
}
