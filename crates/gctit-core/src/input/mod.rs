mod builder;
mod model;

/// The document names itself as the file describing its own reaction ladder,
/// and the engine reads it from the working directory by convention.
pub const PROCESS_FILE: &str = "gctit.json";
/// Validation file referenced by the system section.
pub const UNITTEST_FILE: &str = "gctit.test";
/// External structure file for the structured molecule.
pub const STRUCTURE_FILE: &str = "gctit_mol.aam";
/// Simulation state the engine loads on start when present.
pub const STATE_FILE: &str = "state";
/// Snapshot an operator may stage onto [`STATE_FILE`] to resume a run.
pub const STATE_SNAPSHOT_FILE: &str = "gctit.state";

pub use builder::{LADDER_MAX_CHARGE, LADDER_MIN_CHARGE, species_name, write_input};
pub use model::{
    AtomTranslate, AtomTranslateParams, AtomicMixture, Coulomb, Cuboid, EnergySection,
    EquilibriumState, InputDocument, LadderEntry, LjSimple, McLoop, MolTransRot, MolTransRotParams,
    MoleculeList, MoveSection, Nonbonded, Reaction, ReactionLadder, Species, SpeciesTable, Sphere,
    StructuredMolecule, SystemSection, TitrationMove, UnitTest,
};
