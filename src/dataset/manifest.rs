use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::config::{AssembleConfig, PersistOptions, SourceGroup};
use super::error::Error;

/// A conversion run described in TOML instead of on the command line.
///
/// ```toml
/// path = "/scratch/runs"
/// save_path = "datasets/water"
///
/// [schedule]
/// stride = 1
/// timestep = 0.5
///
/// [[group]]
/// stem = "WAT-0-4000"
/// nsteps = 4000
///
/// [[group]]
/// stem = "WAT-4000-6000"
/// nsteps = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Directory the group stems are relative to.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub save_path: Option<PathBuf>,
    #[serde(default)]
    pub schedule: ScheduleParams,
    #[serde(rename = "group", default)]
    pub groups: Vec<GroupEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleParams {
    #[serde(default = "default_stride")]
    pub stride: usize,
    #[serde(default = "default_timestep")]
    pub timestep: f64,
    #[serde(default)]
    pub zero_based: bool,
}

fn default_stride() -> usize {
    1
}
fn default_timestep() -> f64 {
    0.5
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            stride: default_stride(),
            timestep: default_timestep(),
            zero_based: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupEntry {
    pub stem: String,
    pub nsteps: usize,
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, Error> {
        let manifest: Manifest = toml::from_str(text)?;
        if manifest.groups.is_empty() {
            return Err(Error::InvalidConfig(
                "manifest lists no [[group]] entries".into(),
            ));
        }
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::missing("manifest", path));
        }
        let text = fs::read_to_string(path).map_err(crate::io::Error::from)?;
        Self::parse(&text)
    }

    /// Groups with stems resolved against `path`.
    pub fn source_groups(&self) -> Vec<SourceGroup> {
        self.groups
            .iter()
            .map(|g| match &self.path {
                Some(dir) => SourceGroup::new(dir.join(&g.stem), g.nsteps),
                None => SourceGroup::new(&g.stem, g.nsteps),
            })
            .collect()
    }

    pub fn assemble_config(&self, persist: PersistOptions) -> AssembleConfig {
        AssembleConfig {
            print_stride: self.schedule.stride,
            timestep: self.schedule.timestep,
            zero_based: self.schedule.zero_based,
            persist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = r#"
path = "/runs"

[schedule]
timestep = 1.0

[[group]]
stem = "WAT-0-4000"
nsteps = 4000

[[group]]
stem = "WAT-4000-6000"
nsteps = 2000
"#;

    #[test]
    fn parses_groups_and_fills_schedule_defaults() {
        let manifest = Manifest::parse(WATER).unwrap();
        assert_eq!(manifest.schedule.stride, 1);
        assert_eq!(manifest.schedule.timestep, 1.0);
        assert!(!manifest.schedule.zero_based);
        assert_eq!(manifest.save_path, None);

        let groups = manifest.source_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1], SourceGroup::new("/runs/WAT-4000-6000", 2000));

        let config = manifest.assemble_config(PersistOptions::default());
        assert_eq!(config.timestep, 1.0);
        assert_eq!(config.print_stride, 1);
    }

    #[test]
    fn rejects_manifest_without_groups() {
        assert!(matches!(
            Manifest::parse("path = \"/runs\"\n"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        let text = "[[group]]\nstem = \"a\"\nnsteps = 1\nsteps = 2\n";
        assert!(matches!(
            Manifest::parse(text),
            Err(Error::ManifestParse(_))
        ));
    }
}
