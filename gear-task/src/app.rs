use anyhow::{Context, Result};
use chain::{Task, TaskConfig};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Everything written out for one generated task.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TaskRecord {
    pub id: String,
    pub domain: String,
    /// seed the task's random source was created from
    pub seed: u64,
    pub task: Task,
    pub prompt: String,
    pub captions: scene::Captions,
    /// frames in the ground-truth video, if videos are enabled
    pub frame_count: Option<usize>,
}

impl TaskRecord {
    pub fn new(config: &TaskConfig, index: usize, seed: u64, task: Task) -> Self {
        let frame_count = config
            .video
            .enabled
            .then(|| scene::schedule(&config.video, task.final_rotation()).len());

        Self {
            id: format!("{}_{:04}", config.domain, index),
            domain: config.domain.clone(),
            seed,
            prompt: scene::task_prompt(&task),
            captions: scene::captions(&task),
            task,
            frame_count,
        }
    }
}

/// Totals logged once a batch is done.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub tasks: usize,
    /// resolver steps over every pair of every task
    pub resolve_steps: usize,
    pub residual_pairs: usize,
    pub fallbacks: usize,
}

impl Summary {
    pub fn of(records: &[TaskRecord]) -> Self {
        Self {
            tasks: records.len(),
            resolve_steps: records.iter().map(|r| r.task.mesh.total_steps()).sum(),
            residual_pairs: records
                .iter()
                .map(|r| r.task.mesh.residual_pairs.len())
                .sum(),
            fallbacks: records
                .iter()
                .filter(|r| !r.task.alignment.is_found())
                .count(),
        }
    }
}

/// Index written next to the task files of a batch.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Manifest {
    pub domain: String,
    pub description: String,
    pub ids: Vec<String>,
}

impl Manifest {
    pub fn new(config: &TaskConfig, records: &[TaskRecord]) -> Self {
        Self {
            domain: config.domain.clone(),
            description: scene::SUMMARY_PROMPT.to_owned(),
            ids: records.iter().map(|r| r.id.clone()).collect(),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<TaskConfig> {
    let config = match path {
        Some(path) => {
            let b = std::fs::read(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            ron::de::from_bytes(&b)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => TaskConfig::default(),
    };
    config.validate().context("invalid config")?;
    Ok(config)
}

/// Generates `count` tasks. Task `i` draws from its own generator seeded
/// with `seed + i`, so the output does not depend on thread scheduling.
pub fn generate_batch(config: &TaskConfig, seed: u64, count: usize) -> Result<Vec<TaskRecord>> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let task_seed = seed.wrapping_add(i as u64);
            let mut rng = Pcg64::seed_from_u64(task_seed);
            let task = chain::generate(config, &mut rng)
                .with_context(|| format!("generating task {}", i))?;
            Ok(TaskRecord::new(config, i, task_seed, task))
        })
        .collect()
}

pub fn to_ron<T: serde::Serialize>(value: &T) -> Result<String> {
    let ser_config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("\t".to_owned());
    ron::ser::to_string_pretty(value, ser_config).context("serializing")
}

/// Writes one `<id>.ron` per record into `dir`, returning the paths.
pub fn write_records(dir: &Path, records: &[TaskRecord]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    records
        .iter()
        .map(|r| {
            let path = dir.join(format!("{}.ron", r.id));
            std::fs::write(&path, to_ron(r)?.as_bytes())
                .with_context(|| format!("writing {}", path.display()))?;
            Ok(path)
        })
        .collect()
}

/// Writes `index.ron` into `dir`, which must already exist.
pub fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<PathBuf> {
    let path = dir.join("index.ron");
    std::fs::write(&path, to_ron(manifest)?.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_is_reproducible() {
        let config = TaskConfig::default();
        let a = generate_batch(&config, 11, 16).unwrap();
        let b = generate_batch(&config, 11, 16).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert_eq!(a[3].id, "gear_chain_0003");
        assert_eq!(a[3].seed, 14);

        // task i is the same task whatever batch it was generated in
        let single = generate_batch(&config, 14, 1).unwrap();
        assert_eq!(single[0].task, a[3].task);
    }

    #[test]
    fn records_carry_prompt_and_frames() {
        let config = TaskConfig::default();
        let r = &generate_batch(&config, 5, 1).unwrap()[0];
        assert!(r.prompt.contains(&format!("A chain of {} connected gears", r.task.num_gears())));
        assert_eq!(r.frame_count, Some(64));

        let quiet = TaskConfig {
            video: chain::VideoConfig {
                enabled: false,
                ..Default::default()
            },
            ..TaskConfig::default()
        };
        assert_eq!(generate_batch(&quiet, 5, 1).unwrap()[0].frame_count, None);
    }

    #[test]
    fn summary_counts() {
        let config = TaskConfig::default();
        let records = generate_batch(&config, 100, 20).unwrap();
        let s = Summary::of(&records);
        assert_eq!(s.tasks, 20);
        let steps: usize = records
            .iter()
            .flat_map(|r| r.task.mesh.pairs.iter())
            .map(|p| p.steps)
            .sum();
        assert_eq!(s.resolve_steps, steps);
        assert_eq!(s.residual_pairs, 0);
        assert!(s.fallbacks <= 20);
    }

    #[test]
    fn round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = TaskConfig::default();
        let records = generate_batch(&config, 3, 3).unwrap();

        let paths = write_records(dir.path(), &records).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[2].ends_with("gear_chain_0002.ron"));

        let back: TaskRecord = ron::de::from_bytes(&std::fs::read(&paths[1]).unwrap()).unwrap();
        assert_eq!(back.id, records[1].id);
        assert_eq!(back.task.chain.len(), records[1].task.chain.len());
        assert_eq!(back.task.last_direction(), records[1].task.last_direction());
    }

    #[test]
    fn manifest_lists_batch() {
        let dir = tempfile::tempdir().unwrap();
        let config = TaskConfig::default();
        let records = generate_batch(&config, 8, 2).unwrap();
        write_records(dir.path(), &records).unwrap();

        let path = write_manifest(dir.path(), &Manifest::new(&config, &records)).unwrap();
        let back: Manifest = ron::de::from_bytes(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(back.domain, "gear_chain");
        assert_eq!(back.ids, vec!["gear_chain_0000", "gear_chain_0001"]);
        assert!(back.description.starts_with("Gear chain with green teeth."));
        for id in back.ids.iter() {
            assert!(dir.path().join(format!("{}.ron", id)).exists());
        }
    }

    #[test]
    fn config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gears.ron");
        std::fs::write(&path, "(min_gears: 4, max_gears: 4)").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.min_gears, 4);
        assert_eq!(generate_batch(&config, 0, 1).unwrap()[0].task.num_gears(), 4);

        std::fs::write(&path, "(min_gears: 7, max_gears: 4)").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("greater than max_gears"));

        assert!(load_config(Some(&dir.path().join("missing.ron"))).is_err());
        assert_eq!(load_config(None).unwrap(), TaskConfig::default());
    }
}
