use crate::domain::launch::{CONTAINER_SHARED_DIR, CONTAINER_SHELL, CONTAINER_XAUTH_PATH};
use crate::domain::{ContainerRuntime, ContainerSpec, LaunchAction, LaunchConfig};
use crate::services::RequirementService;
use anyhow::{Result, bail};
use std::sync::Arc;
use tracing::{debug, info};

/// Host paths the suite needs to see unchanged inside the container
pub const HOST_PASSTHROUGH_VOLUMES: &[&str] = &[
    "/dev:/dev",
    "/lib/firmware:/lib/firmware",
    "/lib/modules:/lib/modules",
    "/lib/udev/rules.d:/lib/udev/rules.d",
    "/usr/src:/usr/src",
    "/tmp/.X11-unix/:/tmp/.X11-unix/",
    "/var/run/dbus/system_bus_socket:/var/run/dbus/system_bus_socket",
    "/etc/machine-id:/etc/machine-id:ro",
];

pub const HOST_DEVICES: &[&str] = &["/dev/dri:/dev/dri"];

/// GID of the `video` group on Ubuntu
pub const VIDEO_GROUP: &str = "44";

/// Drives the new / resume / override lifecycle of the suite container
pub struct LauncherService {
    runtime: Arc<dyn ContainerRuntime>,
    requirements: Arc<RequirementService>,
    config: LaunchConfig,
}

impl LauncherService {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        requirements: Arc<RequirementService>,
        config: LaunchConfig,
    ) -> Self {
        Self {
            runtime,
            requirements,
            config,
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Docker must be installed and usable by the current user
    pub fn preflight(&self) -> Result<()> {
        self.runtime.ensure_installed()?;

        if let Err(e) = self.runtime.ensure_daemon_access() {
            let user = self.config.user.as_deref().unwrap_or("$USER");
            println!("💡 Add your user to the docker group, then log in again:");
            println!("   sudo usermod -aG docker {user}");
            return Err(e);
        }
        Ok(())
    }

    pub fn dispatch(&self, action: LaunchAction) -> Result<()> {
        debug!("dispatching {:?}", action);
        match action {
            LaunchAction::New => self.new_container(),
            LaunchAction::Resume => self.resume(),
            LaunchAction::Override => self.override_container(),
        }
    }

    pub fn new_container(&self) -> Result<()> {
        let name = &self.config.container_name;

        if self.runtime.container_exists(name)? {
            bail!(
                "container {name} already exists. \
                 Use --resume to attach to it or --override to replace it."
            );
        }

        self.ensure_image()?;

        info!("🚀 Starting new container {name}");
        self.runtime.run_container(&self.container_spec())
    }

    pub fn override_container(&self) -> Result<()> {
        let name = &self.config.container_name;

        if self.runtime.container_exists(name)? {
            info!("♻️  Replacing existing container {name}");
            self.runtime.stop_container(name)?;
            self.runtime.remove_container(name)?;
        }

        self.new_container()
    }

    pub fn resume(&self) -> Result<()> {
        let name = &self.config.container_name;

        if !self.runtime.container_exists(name)? {
            bail!("no container named {name} to resume. Run without --resume to create it.");
        }

        info!("▶️  Resuming container {name}");
        self.runtime.start_container(name)?;
        self.runtime
            .exec_interactive(name, &self.config.resume_env(), CONTAINER_SHELL)
    }

    /// Loads the image from its tarball unless it is already present.
    ///
    /// The requirement check runs first, so an unfit host never loads.
    pub fn ensure_image(&self) -> Result<()> {
        let image = &self.config.image_name;

        if self.runtime.image_exists(image)? {
            debug!("image {image} already present");
            return Ok(());
        }

        info!("📦 Image {image} not found locally");
        self.requirements.verify()?;

        let tarball = &self.config.image_tarball;
        if !tarball.is_file() {
            bail!(
                "image tarball {:?} not found. Place it there or set [image] tarball in suite.toml.",
                tarball
            );
        }

        info!("📦 Loading {:?}, this can take a while...", tarball);
        self.runtime.load_image(tarball)
    }

    /// Full argument set for a fresh container. Resume does not reuse it.
    pub fn container_spec(&self) -> ContainerSpec<'_> {
        let c = &self.config;
        let mut spec = ContainerSpec::new(&c.container_name, &c.image_name);

        spec.interactive = true;
        spec.privileged = true;
        spec.network = Some("host");
        spec.ipc = Some("host");

        spec.env.push(c.display_env());
        spec.env.push(format!("XAUTHORITY={CONTAINER_XAUTH_PATH}"));
        if let Some(xdg) = &c.xdg_runtime_dir {
            spec.env.push(format!("XDG_RUNTIME_DIR={xdg}"));
            spec.volumes.push(format!("{xdg}:{xdg}"));
        }
        spec.env.extend(c.service_env());

        spec.devices.extend(HOST_DEVICES.iter().map(|d| d.to_string()));
        spec.group_add.push(VIDEO_GROUP.into());

        spec.volumes
            .extend(HOST_PASSTHROUGH_VOLUMES.iter().map(|v| v.to_string()));
        spec.volumes.push(format!(
            "{}:{CONTAINER_XAUTH_PATH}",
            c.xauth_path.display()
        ));
        spec.volumes.push(format!(
            "{}:{CONTAINER_SHARED_DIR}:rw",
            c.shared_dir.display()
        ));
        spec.volumes
            .push(format!("{}:{}", c.logs_dir.display(), c.logger_path));

        if c.gpu_available {
            spec.gpus = Some("all");
        }

        spec
    }
}
