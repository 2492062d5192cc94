//! aws-parallelcluster configuration
//!
//! The cluster file is INI: ordered `[section]` blocks of `key = value`
//! lines. `IniDocument` keeps insertion order so the output is stable.

use std::fmt;

/// Post-install script location inside the bucket.
pub const POST_INSTALL_KEY: &str = "vaws/post_install.sh";

/// Ordered INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty section if it does not exist yet.
    pub fn section(&mut self, name: &str) -> &mut Self {
        if self.find(name).is_none() {
            self.sections.push(IniSection {
                name: name.to_string(),
                entries: Vec::new(),
            });
        }
        self
    }

    /// Set a key, replacing its value in place if present.
    pub fn set(&mut self, section: &str, key: &str, value: impl ToString) -> &mut Self {
        self.section(section);
        let value = value.to_string();
        if let Some(section) = self.sections.iter_mut().find(|s| s.name == section) {
            match section.entries.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value,
                None => section.entries.push((key.to_string(), value)),
            }
        }
        self
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.find(section)?
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    fn find(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Parse INI text. Returns the 1-indexed line of the first bad line on error.
    pub fn parse(content: &str) -> Result<Self, usize> {
        let mut doc = Self::new();
        let mut current: Option<String> = None;

        for (i, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_string();
                doc.section(&name);
                current = Some(name);
                continue;
            }
            let section = current.as_deref().ok_or(i + 1)?;
            let (key, value) = line
                .split_once('=')
                .or_else(|| line.split_once(':'))
                .ok_or(i + 1)?;
            doc.set(section, key.trim(), value.trim());
        }

        Ok(doc)
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{} = {}", key, value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Resolved inputs for a cluster configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    pub cluster_name: String,
    pub image_id: String,
    pub bucket: String,
    pub region: String,
    pub vpc_id: String,
    pub master_subnet_id: String,
    pub key_name: String,
    pub master_instance_type: String,
    pub compute_instance_type: String,
    pub max_queue_size: u32,
    pub security_group_id: String,
    pub post_install: Option<String>,
}

impl ClusterSettings {
    fn cluster_section(&self) -> String {
        format!("cluster {}", self.cluster_name)
    }

    fn vpc_section(&self) -> String {
        format!("vpc {}", self.cluster_name)
    }

    /// Baseline parallelcluster settings shared by every vaws cluster.
    fn defaults(&self) -> IniDocument {
        let name = &self.cluster_name;
        let cluster = self.cluster_section();
        let vpc = self.vpc_section();

        let mut doc = IniDocument::new();
        doc.section("aws");
        doc.set("global", "cluster_template", name)
            .set("global", "update_check", "true")
            .set("global", "sanity_check", "true");
        doc.set("aliases", "ssh", "ssh ubuntu@{MASTER_IP} {ARGS}");
        doc.set(&cluster, "base_os", "ubuntu1804")
            .set(&cluster, "initial_queue_size", 0)
            .set(&cluster, "max_queue_size", 10)
            .set(&cluster, "maintain_initial_size", "false")
            .set(&cluster, "vpc_settings", name);
        doc.set("scaling", "scaledown_idletime", 5);
        doc.set(&vpc, "use_public_ips", "true");
        doc
    }

    /// Render the complete cluster configuration.
    pub fn to_ini(&self) -> IniDocument {
        let cluster = self.cluster_section();
        let vpc = self.vpc_section();

        let mut doc = self.defaults();
        doc.set("aws", "aws_region_name", &self.region);
        doc.set(&cluster, "custom_ami", &self.image_id)
            .set(&cluster, "key_name", &self.key_name)
            .set(&cluster, "master_instance_type", &self.master_instance_type)
            .set(&cluster, "compute_instance_type", &self.compute_instance_type)
            .set(&cluster, "max_queue_size", self.max_queue_size)
            .set(
                &cluster,
                "s3_read_write_resource",
                format!("arn:aws:s3:::{}*", self.bucket),
            );
        if let Some(post_install) = &self.post_install {
            doc.set(&cluster, "post_install", post_install);
        }
        doc.set(&vpc, "vpc_id", &self.vpc_id)
            .set(&vpc, "master_subnet_id", &self.master_subnet_id)
            .set(&vpc, "additional_sg", &self.security_group_id);
        doc
    }
}

/// Script run on every node after boot. Puts the simulation environment on
/// PATH for the login user.
pub fn post_install_script() -> String {
    r#"#!/bin/bash -e

echo "export PATH=/home/ubuntu/miniconda3/envs/simulation/bin:/home/ubuntu/miniconda3/bin:\$PATH" >> /home/ubuntu/.bashrc
mkdir -p /usr/local/share/vivarium/artifacts
"#
    .to_string()
}
