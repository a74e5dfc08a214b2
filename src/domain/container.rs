/// Everything `docker run` needs to create the suite container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec<'a> {
    pub name: &'a str,
    pub image: &'a str,
    pub env: Vec<String>,
    pub volumes: Vec<String>,
    pub devices: Vec<String>,
    pub group_add: Vec<String>,
    pub network: Option<&'a str>,
    pub ipc: Option<&'a str>,
    pub gpus: Option<&'a str>,
    pub privileged: bool,
    pub interactive: bool,
}

impl<'a> ContainerSpec<'a> {
    pub fn new(name: &'a str, image: &'a str) -> Self {
        Self {
            name,
            image,
            env: Vec::new(),
            volumes: Vec::new(),
            devices: Vec::new(),
            group_add: Vec::new(),
            network: None,
            ipc: None,
            gpus: None,
            privileged: false,
            interactive: false,
        }
    }

    /// Renders the `docker run` argument list (without the leading `docker`).
    pub fn run_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec!["run".into()];

        if self.interactive {
            args.push("-it".into());
        }
        if self.privileged {
            args.push("--privileged".into());
        }
        if let Some(net) = self.network {
            args.push(format!("--net={net}"));
        }
        if let Some(ipc) = self.ipc {
            args.push(format!("--ipc={ipc}"));
        }

        args.push("--name".into());
        args.push(self.name.into());

        for env in &self.env {
            args.push("-e".into());
            args.push(env.clone());
        }

        for device in &self.devices {
            args.push(format!("--device={device}"));
        }

        for group in &self.group_add {
            args.push("--group-add".into());
            args.push(group.clone());
        }

        for volume in &self.volumes {
            args.push("-v".into());
            args.push(volume.clone());
        }

        if let Some(gpus) = self.gpus {
            args.push("--gpus".into());
            args.push(gpus.into());
        }

        args.push(self.image.into());
        args
    }
}
