use crate::align::{self, Alignment};
use crate::layout::{self, ChainSeed};
use crate::mesh::{self, MeshGeometry, MeshReport};
use crate::{Chain, ConfigError, Direction, LineArrangement, TaskConfig};
use rand::Rng;

/// A fully generated task: the resolved chain and how far it turns.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Task {
    pub chain: Chain,
    pub alignment: Alignment,
    pub mesh: MeshReport,
}

impl Task {
    pub fn num_gears(&self) -> usize {
        self.chain.len()
    }

    pub fn arrangement(&self) -> LineArrangement {
        self.chain.arrangement
    }

    /// Direction of G1, which the task states. None for an empty chain.
    pub fn first_direction(&self) -> Option<Direction> {
        self.chain.first_direction()
    }

    /// Direction of the last gear, which the task asks for.
    pub fn last_direction(&self) -> Option<Direction> {
        self.chain.last_direction()
    }

    /// Offset the chain has turned by in the final frame.
    pub fn final_rotation(&self) -> f64 {
        self.alignment.offset()
    }
}

/// Builds a task from explicit choices. `config` must already be valid.
pub fn assemble(config: &TaskConfig, seed: &ChainSeed) -> Task {
    let mut chain = layout::plan(config, seed);

    let geometry = MeshGeometry::new(config.tooth, config.mesh.clone());
    let mesh = mesh::resolve(&mut chain, &geometry);
    let alignment = align::solve(&chain, &config.align);

    Task {
        chain,
        alignment,
        mesh,
    }
}

/// Generates one task, drawing every random choice from `rng`.
pub fn generate<R: Rng + ?Sized>(config: &TaskConfig, rng: &mut R) -> Result<Task, ConfigError> {
    config.validate()?;

    let seed = ChainSeed::draw(config, rng);
    let task = assemble(config, &seed);
    log::debug!(
        "{} gears {}, first {:?}, last {:?}, rotation {:?}",
        task.num_gears(),
        task.arrangement(),
        task.first_direction(),
        task.last_direction(),
        task.alignment
    );
    Ok(task)
}
