use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const NETWORK_KDL: &str = r#"
project "pulumicloud"
provider "aws" {
    region "us-east-1"
}
network {
    vpc-cidr-block "10.0.0.0/16"
    zones "us-east-1a" "us-east-1b" "us-east-1c" "us-east-1d"
    zone-cap 3
}
tags {
    Environment "dev"
}
"#;

pub struct TestProject {
    pub root: TempDir,
    home: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        Self { root, home }
    }

    pub fn write_topo_kdl(&self, content: &str) {
        fs::write(self.root.path().join("topo.kdl"), content).unwrap();
    }

    #[allow(dead_code)]
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    /// `topo` running inside the project, isolated from the caller's env
    #[allow(deprecated)]
    pub fn topo(&self) -> Command {
        let mut cmd = Command::cargo_bin("topo").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.home.path())
            .env_remove("TOPO_CONFIG_PATH")
            .env_remove("TOPO_VPC_CIDR_BLOCK")
            .env_remove("TOPO_ZONE_CAP")
            .env_remove("RUST_LOG");
        cmd
    }
}
