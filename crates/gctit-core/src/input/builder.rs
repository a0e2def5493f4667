//! Assembles the input document from a constant base template plus the two
//! swept scalars of a [`BuildRequest`].
//!
//! The chemical system is a single titratable macromolecule whose net charge
//! runs from -10 to +10 through a chain of twenty proton-binding reactions,
//! dissolved together with an explicit La/Cl salt in a cuboid cell.

use super::model::{
    AtomTranslate, AtomTranslateParams, AtomicMixture, Coulomb, Cuboid, EnergySection,
    EquilibriumState, InputDocument, LadderEntry, LjSimple, McLoop, MolTransRot, MolTransRotParams,
    MoleculeList, MoveSection, Nonbonded, Reaction, ReactionLadder, Species, SpeciesTable, Sphere,
    StructuredMolecule, SystemSection, TitrationMove, UnitTest,
};
use super::{PROCESS_FILE, STRUCTURE_FILE, UNITTEST_FILE};
use crate::domain::{BuildRequest, GctitError, GctitResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Net-charge span of the titration ladder.
pub const LADDER_MIN_CHARGE: i32 = -10;
pub const LADDER_MAX_CHARGE: i32 = 10;

const TEMPERATURE_K: f64 = 298.15;
const DIELECTRIC_CONSTANT: f64 = 80.0;
const LJ_REPULSION_EPS: f64 = 0.05;
const CUBOID_SIDE_AA: f64 = 202.5;
const SPHERE_RADIUS_AA: f64 = 100.0;
const MACRO_CYCLES: u32 = 10;

const LA_ACTIVITY_M: f64 = 0.001601;
const CL_ACTIVITY_M: f64 = 0.02276;
const SALT_ION_RADIUS_AA: f64 = 2.0;
const TITRATION_SITE_RADIUS_AA: f64 = 5.0;

const PROTEIN_COUNT: u32 = 2;
const SALT_COUNT: u32 = 50;
const SALT_MIXTURE: &str = "La Cl Cl Cl";

impl InputDocument {
    /// Pure function of the build request; two calls with equal requests
    /// produce equal documents.
    pub fn for_request(request: &BuildRequest) -> Self {
        Self {
            processes: reaction_ladder(request.ph),
            energy: EnergySection {
                eqstate: EquilibriumState {
                    processfile: PROCESS_FILE,
                },
                nonbonded: Nonbonded {
                    ljsimple: LjSimple {
                        eps: LJ_REPULSION_EPS,
                    },
                    coulomb: Coulomb {
                        epsr: DIELECTRIC_CONSTANT,
                    },
                },
            },
            system: SystemSection {
                temperature: TEMPERATURE_K,
                coulomb: Coulomb {
                    epsr: DIELECTRIC_CONSTANT,
                },
                cuboid: Cuboid {
                    len: CUBOID_SIDE_AA,
                },
                unittest: UnitTest {
                    testfile: UNITTEST_FILE,
                    stable: false,
                },
                mcloop: McLoop {
                    macro_cycles: MACRO_CYCLES,
                    micro: request.micro_steps,
                },
                sphere: Sphere {
                    radius: SPHERE_RADIUS_AA,
                },
            },
            moleculelist: MoleculeList {
                protein: StructuredMolecule {
                    n_init: PROTEIN_COUNT,
                    structure: STRUCTURE_FILE,
                },
                salt: AtomicMixture {
                    n_init: SALT_COUNT,
                    atomic: true,
                    atoms: SALT_MIXTURE,
                },
            },
            atomlist: species_table(),
            processfile: PROCESS_FILE,
            moves: MoveSection {
                gctit: TitrationMove {
                    molecule: "salt",
                    prob: 0.01,
                },
                atomtranslate: AtomTranslate {
                    salt: AtomTranslateParams {
                        prob: 0.1,
                        dp: 100.0,
                    },
                },
                moltransrot: MolTransRot {
                    protein: MolTransRotParams {
                        permol: true,
                        dp: 60.0,
                        prob: 1.0,
                        dir: "0 0 1",
                        dprot: 0.0,
                    },
                },
            },
        }
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn render(&self) -> GctitResult<String> {
        let mut rendered = serde_json::to_string_pretty(self).map_err(|source| {
            GctitError::internal(
                "SYS.INPUT_RENDER",
                format!("failed to serialize input document: {}", source),
            )
        })?;
        rendered.push('\n');
        Ok(rendered)
    }
}

/// Renders the document for `request` and fully overwrites the well-known
/// process file in `dir`. Returns the path written.
pub fn write_input(dir: &Path, request: &BuildRequest) -> GctitResult<PathBuf> {
    let path = dir.join(PROCESS_FILE);
    let rendered = InputDocument::for_request(request).render()?;
    fs::write(&path, rendered).map_err(|source| {
        GctitError::io_system(
            "IO.INPUT_WRITE",
            format!(
                "failed to write input document '{}': {}",
                path.display(),
                source
            ),
        )
    })?;
    Ok(path)
}

/// Species name for a net charge, e.g. `M-10`, `M+-0`, `M+07`.
pub fn species_name(charge: i32) -> String {
    match charge {
        c if c < 0 => format!("M-{:02}", -c),
        0 => "M+-0".to_string(),
        c => format!("M+{:02}", c),
    }
}

/// Reaction name for the transition binding a proton onto the `bound_charge - 1`
/// state, e.g. `M-910` for -10 -> -9 and `M+109` for +9 -> +10.
fn reaction_name(bound_charge: i32) -> String {
    let free_charge = bound_charge - 1;
    if bound_charge <= 0 {
        format!("M-{}{}", -bound_charge, -free_charge)
    } else {
        format!("M+{}{}", bound_charge, free_charge)
    }
}

/// Binding constants descend in half-log steps from 5 at the most negative
/// transition to -5 at the most positive, antisymmetric about the neutral
/// state. The sequence skips zero at the midpoint.
fn ladder_pkd(bound_charge: i32) -> f64 {
    if bound_charge <= 0 {
        0.5 - 0.5 * f64::from(bound_charge)
    } else {
        -0.5 * f64::from(bound_charge)
    }
}

fn reaction_ladder(ph: f64) -> ReactionLadder {
    let entries = ((LADDER_MIN_CHARGE + 1)..=LADDER_MAX_CHARGE)
        .map(|bound_charge| LadderEntry {
            name: reaction_name(bound_charge),
            reaction: Reaction {
                p_kd: ladder_pkd(bound_charge),
                p_x: ph,
                bound: species_name(bound_charge),
                free: species_name(bound_charge - 1),
            },
        })
        .collect();
    ReactionLadder::from_entries(entries)
}

fn species_table() -> SpeciesTable {
    let salt_ion = |q: i32, dp: f64, activity: f64| Species {
        q,
        r: SALT_ION_RADIUS_AA,
        dp: Some(dp),
        activity: Some(activity),
    };
    let residue = |q: i32| Species {
        q,
        r: SALT_ION_RADIUS_AA,
        dp: None,
        activity: None,
    };

    let mut entries = vec![
        ("La".to_string(), salt_ion(3, 20.0, LA_ACTIVITY_M)),
        ("Cl".to_string(), salt_ion(-1, 50.0, CL_ACTIVITY_M)),
        (
            "Na".to_string(),
            Species {
                q: 1,
                r: SALT_ION_RADIUS_AA,
                dp: Some(50.0),
                activity: None,
            },
        ),
        ("ASP".to_string(), residue(-1)),
        ("HASP".to_string(), residue(0)),
        ("GLU".to_string(), residue(-1)),
        ("HGLU".to_string(), residue(0)),
    ];

    for charge in LADDER_MIN_CHARGE..=LADDER_MAX_CHARGE {
        entries.push((
            species_name(charge),
            Species {
                q: charge,
                r: TITRATION_SITE_RADIUS_AA,
                dp: None,
                activity: None,
            },
        ));
    }

    SpeciesTable::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::{
        LADDER_MAX_CHARGE, LADDER_MIN_CHARGE, species_name, write_input,
    };
    use crate::domain::BuildRequest;
    use crate::input::{InputDocument, PROCESS_FILE};
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn ladder_broadcasts_the_requested_ph_to_every_reaction() {
        for ph in [0.0, 2.5, 7.4, -1.0] {
            let document = InputDocument::for_request(&BuildRequest::new(ph, 10_000));
            assert_eq!(document.processes.len(), 20);
            for entry in document.processes.entries() {
                assert_eq!(entry.reaction.p_x, ph, "reaction '{}'", entry.name);
            }
        }
    }

    #[test]
    fn ladder_chains_adjacent_charge_states_without_gaps() {
        let document = InputDocument::for_request(&BuildRequest::new(0.0, 10_000));
        let entries = document.processes.entries();

        assert_eq!(entries.first().expect("ladder should not be empty").reaction.free, "M-10");
        assert_eq!(entries.last().expect("ladder should not be empty").reaction.bound, "M+10");
        for pair in entries.windows(2) {
            assert_eq!(
                pair[0].reaction.bound, pair[1].reaction.free,
                "ladder should form one unbroken chain"
            );
        }
    }

    #[test]
    fn ladder_pkd_descends_in_half_steps_and_skips_zero() {
        let document = InputDocument::for_request(&BuildRequest::new(0.0, 10_000));
        let pkd: Vec<f64> = document
            .processes
            .entries()
            .iter()
            .map(|entry| entry.reaction.p_kd)
            .collect();

        assert_eq!(pkd.first(), Some(&5.0));
        assert_eq!(pkd.last(), Some(&-5.0));
        for (index, pair) in pkd.windows(2).enumerate() {
            assert!(pair[0] > pair[1], "pKd sequence should strictly descend");
            let step = pair[0] - pair[1];
            let expected = if index == 9 { 1.0 } else { 0.5 };
            assert_eq!(step, expected, "step after entry {}", index);
        }
        for (low, high) in pkd.iter().zip(pkd.iter().rev()) {
            assert_eq!(*low, -*high, "ladder should be antisymmetric");
        }
    }

    #[test]
    fn species_table_covers_every_referenced_name() {
        let document = InputDocument::for_request(&BuildRequest::new(0.0, 10_000));

        for entry in document.processes.entries() {
            assert!(
                document.atomlist.contains(&entry.reaction.bound),
                "bound species '{}' should be defined",
                entry.reaction.bound
            );
            assert!(
                document.atomlist.contains(&entry.reaction.free),
                "free species '{}' should be defined",
                entry.reaction.free
            );
        }
        for atom in document.moleculelist.salt.atom_names() {
            assert!(
                document.atomlist.contains(atom),
                "salt component '{}' should be defined",
                atom
            );
        }
    }

    #[test]
    fn species_charges_span_the_full_ladder_range() {
        let document = InputDocument::for_request(&BuildRequest::new(0.0, 10_000));

        for charge in LADDER_MIN_CHARGE..=LADDER_MAX_CHARGE {
            let name = species_name(charge);
            let species = document
                .atomlist
                .get(&name)
                .unwrap_or_else(|| panic!("species '{}' should be defined", name));
            assert_eq!(species.q, charge);
            assert_eq!(species.r, 5.0);
        }
        assert_eq!(species_name(0), "M+-0");
        assert_eq!(species_name(-1), "M-01");
        assert_eq!(species_name(10), "M+10");
    }

    #[test]
    fn only_explicit_salt_ions_carry_bulk_activities() {
        let document = InputDocument::for_request(&BuildRequest::new(0.0, 10_000));

        assert_eq!(
            document.atomlist.get("La").and_then(|species| species.activity),
            Some(0.001601)
        );
        assert_eq!(
            document.atomlist.get("Cl").and_then(|species| species.activity),
            Some(0.02276)
        );
        assert_eq!(
            document.atomlist.get("Na").and_then(|species| species.activity),
            None
        );
        assert_eq!(
            document.atomlist.get("M+-0").and_then(|species| species.activity),
            None
        );
    }

    #[test]
    fn document_embeds_its_own_filename() {
        let document = InputDocument::for_request(&BuildRequest::new(0.0, 10_000));
        assert_eq!(document.processfile, PROCESS_FILE);
        assert_eq!(document.energy.eqstate.processfile, PROCESS_FILE);
    }

    #[test]
    fn request_overrides_land_in_the_run_schedule() {
        let document = InputDocument::for_request(&BuildRequest::new(3.5, 42));
        assert_eq!(document.system.mcloop.macro_cycles, 10);
        assert_eq!(document.system.mcloop.micro, 42);
    }

    #[test]
    fn render_is_byte_identical_across_builds() {
        let request = BuildRequest::new(1.25, 10_000_000);
        let first = InputDocument::for_request(&request)
            .render()
            .expect("render should succeed");
        let second = InputDocument::for_request(&request)
            .render()
            .expect("render should succeed");

        assert_eq!(first, second);
        assert!(first.ends_with('\n'));
        assert!(first.contains("    \"pKd\""), "output should be indented");
    }

    #[test]
    fn write_input_fully_replaces_prior_content() {
        let temp = TempDir::new().expect("tempdir should be created");
        let stale = temp.path().join(PROCESS_FILE);
        fs::write(&stale, "not json at all").expect("stale content should be written");

        let path = write_input(temp.path(), &BuildRequest::new(0.0, 10_000))
            .expect("input document should be written");
        assert_eq!(path, stale);

        let parsed: Value = serde_json::from_str(
            &fs::read_to_string(&path).expect("document should be readable"),
        )
        .expect("document should be valid JSON");
        assert_eq!(parsed["system"]["mcloop"]["micro"], Value::from(10_000));
        assert_eq!(parsed["processfile"], Value::from(PROCESS_FILE));
    }
}
