use crate::cmd;
use crate::error::ConvoyResult;

/// Describes the shared production image that hosts every
/// enabled project: Dockerfile, build args, registry tag, and
/// the resource limits applied when running it locally.
///
/// # Example
///
/// ```
/// use convoy::Image;
///
/// let image = Image::new("eb-deploy-base")
///     .dockerfile("Dockerfile.local")
///     .base_image("python:3.7-slim")
///     .build_arg("DJANGO_SETTINGS_MODULE", "config.settings.production")
///     .registry("123456789.dkr.ecr.ap-northeast-2.amazonaws.com/eb-deploy-base:latest")
///     .publish(8000, 80)
///     .memory(1024, 1536)
///     .cpus(1);
///
/// assert_eq!(image.name, "eb-deploy-base");
/// assert_eq!(image.publish, (8000, 80));
/// ```
#[derive(Debug, Clone)]
pub struct Image {
    pub name: String,
    pub dockerfile: String,
    pub base_image: Option<String>,
    pub registry: Option<String>,
    pub build_args: Vec<(String, String)>,
    pub publish: (u16, u16),
    pub memory_mb: u32,
    pub memory_swap_mb: u32,
    pub cpus: u32,
}

impl Image {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dockerfile: "Dockerfile".to_string(),
            base_image: None,
            registry: None,
            build_args: Vec::new(),
            publish: (8000, 80),
            memory_mb: 1024,
            memory_swap_mb: 1536,
            cpus: 1,
        }
    }

    #[must_use]
    pub fn dockerfile(mut self, path: &str) -> Self {
        self.dockerfile = path.to_string();
        self
    }

    /// Base image pulled before every build so the local cache
    /// never serves a stale tag.
    #[must_use]
    pub fn base_image(mut self, image: &str) -> Self {
        self.base_image = Some(image.to_string());
        self
    }

    /// Full remote tag the image is pushed to in deploy mode.
    #[must_use]
    pub fn registry(mut self, tag: &str) -> Self {
        self.registry = Some(tag.to_string());
        self
    }

    #[must_use]
    pub fn build_arg(mut self, key: &str, value: &str) -> Self {
        self.build_args.push((key.to_string(), value.to_string()));
        self
    }

    /// Host-to-container port mapping used by run and bash modes.
    #[must_use]
    pub const fn publish(mut self, host: u16, container: u16) -> Self {
        self.publish = (host, container);
        self
    }

    #[must_use]
    pub const fn memory(mut self, limit_mb: u32, swap_mb: u32) -> Self {
        self.memory_mb = limit_mb;
        self.memory_swap_mb = swap_mb;
        self
    }

    #[must_use]
    pub const fn cpus(mut self, cpus: u32) -> Self {
        self.cpus = cpus;
        self
    }
}

/// Pull the configured base image, if any.
pub fn pull_base(image: &Image) -> ConvoyResult<()> {
    if let Some(base) = &image.base_image {
        eprintln!("Pulling base image {base}...");
        cmd::run_interactive("docker", &["pull", base])?;
    }
    Ok(())
}

/// Build the production image locally.
pub fn build(image: &Image) -> ConvoyResult<()> {
    eprintln!("Building Docker image {}...", image.name);

    let args = build_args(image);
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    cmd::run_interactive("docker", &refs)
}

/// Run the container in the foreground with the configured
/// resource limits.
pub fn run_container(image: &Image) -> ConvoyResult<()> {
    let args = run_args(image, None);
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    cmd::run_interactive("docker", &refs)
}

/// Run a bash shell inside the container instead of its
/// entrypoint.
pub fn shell(image: &Image) -> ConvoyResult<()> {
    let args = run_args(image, Some("/bin/bash"));
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    cmd::run_interactive("docker", &refs)
}

/// Tag the local image with its registry tag and push it. The
/// caller is expected to have logged in to the registry first.
pub fn push(image: &Image, registry_tag: &str) -> ConvoyResult<()> {
    let local = format!("{}:latest", image.name);

    eprintln!("Pushing {local} to {registry_tag}...");
    cmd::run("docker", &["tag", &local, registry_tag])?;
    cmd::run_interactive("docker", &["push", registry_tag])?;

    eprintln!("Image pushed");
    Ok(())
}

/// Assemble the `docker build` argument vector.
#[must_use]
pub fn build_args(image: &Image) -> Vec<String> {
    let mut args = vec![
        "build".to_string(),
        "-f".to_string(),
        image.dockerfile.clone(),
    ];

    for (key, value) in &image.build_args {
        args.push("--build-arg".to_string());
        args.push(format!("{key}={value}"));
    }

    args.push("-t".to_string());
    args.push(image.name.clone());
    args.push(".".to_string());
    args
}

/// Assemble the `docker run` argument vector, optionally with a
/// trailing command replacing the entrypoint.
#[must_use]
pub fn run_args(image: &Image, trailing: Option<&str>) -> Vec<String> {
    let (host, container) = image.publish;
    let mut args = vec![
        "run".to_string(),
        "--rm".to_string(),
        "-it".to_string(),
        "-p".to_string(),
        format!("{host}:{container}"),
        "--name".to_string(),
        image.name.clone(),
        format!("--memory={}m", image.memory_mb),
        format!("--memory-swap={}m", image.memory_swap_mb),
        format!("--cpus={}", image.cpus),
        image.name.clone(),
    ];

    if let Some(trailing) = trailing {
        args.push(trailing.to_string());
    }
    args
}

/// Extract the registry host from a full remote tag.
///
/// Example: `"123.dkr.ecr.x.amazonaws.com/app:latest"` ->
/// `"123.dkr.ecr.x.amazonaws.com"`
#[must_use]
pub fn registry_host(registry_tag: &str) -> &str {
    registry_tag.split('/').next().unwrap_or(registry_tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let image = Image::new("myapp");

        assert_eq!(image.name, "myapp");
        assert_eq!(image.dockerfile, "Dockerfile");
        assert!(image.base_image.is_none());
        assert!(image.registry.is_none());
        assert!(image.build_args.is_empty());
        assert_eq!(image.publish, (8000, 80));
        assert_eq!(image.memory_mb, 1024);
        assert_eq!(image.memory_swap_mb, 1536);
        assert_eq!(image.cpus, 1);
    }

    #[test]
    fn builder_chain() {
        let image = Image::new("base")
            .dockerfile("Dockerfile.local")
            .base_image("python:3.7-slim")
            .registry("reg.example.com/base:latest")
            .build_arg("ACCESS_KEY", "abc")
            .build_arg("SECRET_KEY", "def")
            .publish(9000, 8080)
            .memory(2048, 3072)
            .cpus(2);

        assert_eq!(image.dockerfile, "Dockerfile.local");
        assert_eq!(image.base_image.as_deref(), Some("python:3.7-slim"));
        assert_eq!(image.registry.as_deref(), Some("reg.example.com/base:latest"));
        assert_eq!(
            image.build_args,
            vec![
                ("ACCESS_KEY".into(), "abc".into()),
                ("SECRET_KEY".into(), "def".into()),
            ]
        );
        assert_eq!(image.publish, (9000, 8080));
        assert_eq!(image.memory_mb, 2048);
        assert_eq!(image.memory_swap_mb, 3072);
        assert_eq!(image.cpus, 2);
    }

    #[test]
    fn registry_overrides() {
        let image = Image::new("x").registry("first:1").registry("second:2");

        assert_eq!(image.registry.as_deref(), Some("second:2"));
    }
}
