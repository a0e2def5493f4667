use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Full input document consumed by the external titration engine. Section
/// order is fixed; only scalar leaf values vary between builds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputDocument {
    pub processes: ReactionLadder,
    pub energy: EnergySection,
    pub system: SystemSection,
    pub moleculelist: MoleculeList,
    pub atomlist: SpeciesTable,
    pub processfile: &'static str,
    pub moves: MoveSection,
}

/// Ordered chain of acid-base half-reactions linking adjacent net-charge
/// states. Serialized as a JSON object whose keys keep construction order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReactionLadder {
    entries: Vec<LadderEntry>,
}

impl ReactionLadder {
    pub fn from_entries(entries: Vec<LadderEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LadderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ReactionLadder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.reaction)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LadderEntry {
    pub name: String,
    pub reaction: Reaction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reaction {
    #[serde(rename = "pKd")]
    pub p_kd: f64,
    #[serde(rename = "pX")]
    pub p_x: f64,
    pub bound: String,
    pub free: String,
}

/// Species name to physical attributes, in construction order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeciesTable {
    entries: Vec<(String, Species)>,
}

impl SpeciesTable {
    pub fn from_entries(entries: Vec<(String, Species)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, Species)] {
        &self.entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(known, _)| known == name)
    }

    pub fn get(&self, name: &str) -> Option<&Species> {
        self.entries
            .iter()
            .find(|(known, _)| known == name)
            .map(|(_, species)| species)
    }
}

impl Serialize for SpeciesTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, species) in &self.entries {
            map.serialize_entry(name, species)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Species {
    /// Net charge in elementary units.
    pub q: i32,
    /// Hard-sphere radius in angstrom.
    pub r: f64,
    /// Maximum trial displacement, only for species moved directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<f64>,
    /// Bulk activity in mol/l, only for explicit salt ions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergySection {
    pub eqstate: EquilibriumState,
    pub nonbonded: Nonbonded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquilibriumState {
    pub processfile: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nonbonded {
    pub ljsimple: LjSimple,
    pub coulomb: Coulomb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LjSimple {
    pub eps: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coulomb {
    pub epsr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSection {
    pub temperature: f64,
    pub coulomb: Coulomb,
    pub cuboid: Cuboid,
    pub unittest: UnitTest,
    pub mcloop: McLoop,
    pub sphere: Sphere,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cuboid {
    pub len: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sphere {
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitTest {
    pub testfile: &'static str,
    pub stable: bool,
}

/// Two-level run-length schedule: `macro` outer sampling cycles, `micro`
/// elementary trial moves per cycle. `micro` is the swept quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct McLoop {
    #[serde(rename = "macro")]
    pub macro_cycles: u32,
    pub micro: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoleculeList {
    pub protein: StructuredMolecule,
    pub salt: AtomicMixture,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredMolecule {
    #[serde(rename = "Ninit")]
    pub n_init: u32,
    pub structure: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomicMixture {
    #[serde(rename = "Ninit")]
    pub n_init: u32,
    pub atomic: bool,
    pub atoms: &'static str,
}

impl AtomicMixture {
    pub fn atom_names(&self) -> impl Iterator<Item = &str> {
        self.atoms.split_whitespace()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveSection {
    pub gctit: TitrationMove,
    pub atomtranslate: AtomTranslate,
    pub moltransrot: MolTransRot,
}

/// Grand-canonical titration move; the reaction ladder it toggles is picked
/// up through the process file reference in the energy section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitrationMove {
    pub molecule: &'static str,
    pub prob: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomTranslate {
    pub salt: AtomTranslateParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtomTranslateParams {
    pub prob: f64,
    pub dp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MolTransRot {
    pub protein: MolTransRotParams,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MolTransRotParams {
    pub permol: bool,
    pub dp: f64,
    pub prob: f64,
    pub dir: &'static str,
    pub dprot: f64,
}

#[cfg(test)]
mod tests {
    use super::{LadderEntry, Reaction, ReactionLadder, Species, SpeciesTable};

    fn reaction(p_kd: f64, bound: &str, free: &str) -> Reaction {
        Reaction {
            p_kd,
            p_x: 7.0,
            bound: bound.to_string(),
            free: free.to_string(),
        }
    }

    #[test]
    fn ladder_serializes_entries_in_construction_order() {
        let ladder = ReactionLadder::from_entries(vec![
            LadderEntry {
                name: "M-12".to_string(),
                reaction: reaction(1.0, "M-01", "M-02"),
            },
            LadderEntry {
                name: "M-01".to_string(),
                reaction: reaction(0.5, "M+-0", "M-01"),
            },
        ]);

        let rendered = serde_json::to_string(&ladder).expect("ladder should serialize");
        let first = rendered.find("M-12").expect("first entry should be present");
        let second = rendered.find("M-01").expect("second entry should be present");
        assert!(first < second, "entry order should survive serialization");
        assert!(rendered.contains("\"pKd\":1.0"));
        assert!(rendered.contains("\"pX\":7.0"));
    }

    #[test]
    fn species_without_optional_attributes_serializes_compactly() {
        let species = Species {
            q: -4,
            r: 5.0,
            dp: None,
            activity: None,
        };

        let rendered = serde_json::to_string(&species).expect("species should serialize");
        assert_eq!(rendered, "{\"q\":-4,\"r\":5.0}");
    }

    #[test]
    fn species_table_lookup_sees_every_entry() {
        let table = SpeciesTable::from_entries(vec![
            (
                "La".to_string(),
                Species {
                    q: 3,
                    r: 2.0,
                    dp: Some(20.0),
                    activity: Some(0.001601),
                },
            ),
            (
                "Cl".to_string(),
                Species {
                    q: -1,
                    r: 2.0,
                    dp: Some(50.0),
                    activity: Some(0.02276),
                },
            ),
        ]);

        assert!(table.contains("La"));
        assert!(!table.contains("Na"));
        let lanthanum = table.get("La").expect("La should be present");
        assert_eq!(lanthanum.q, 3);
        assert_eq!(lanthanum.activity, Some(0.001601));
    }
}
