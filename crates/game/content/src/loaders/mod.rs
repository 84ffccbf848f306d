//! RON loaders for plain-data content.
//!
//! Behavior always lives in code (effect/NPC/interactable/room hook types);
//! these loaders cover everything that is pure data: ability definitions,
//! creature and class stat lines, item catalogs, rooms, floors, and
//! encounters. All parsing failures surface as [`ContentError`] at load
//! time.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use game_core::{
    AbilityTags, ContentError, EffectParams, ParamValue, TargetCount, TargetKind,
};

/// One parameter value as written in data.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ParamSpec {
    Flag(bool),
    Int(i32),
    Text(String),
}

impl From<&ParamSpec> for ParamValue {
    fn from(spec: &ParamSpec) -> Self {
        match spec {
            ParamSpec::Flag(v) => ParamValue::Flag(*v),
            ParamSpec::Int(v) => ParamValue::Int(*v),
            ParamSpec::Text(v) => ParamValue::Text(v.clone()),
        }
    }
}

/// A named effect use: the effect plus its construction parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct EffectUseSpec {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, ParamSpec>,
}

impl EffectUseSpec {
    pub fn effect_params(&self) -> EffectParams {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), ParamValue::from(v)))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct UseCapsSpec {
    #[serde(default)]
    pub game: Option<u32>,
    #[serde(default)]
    pub battle: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum CountSpec {
    Number(u32),
    Word(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct TargetSpec {
    pub count: CountSpec,
    pub kind: String,
}

impl TargetSpec {
    pub fn resolve(&self, ability: &str) -> Result<(TargetCount, TargetKind), ContentError> {
        let count = match &self.count {
            CountSpec::Number(0) => TargetCount::Battlefield,
            CountSpec::Number(n) => TargetCount::Count(*n),
            CountSpec::Word(word) if word == "all" => TargetCount::All,
            CountSpec::Word(word) => {
                return Err(ContentError::BadDefinition {
                    name: ability.to_string(),
                    reason: format!("unknown target count '{word}'"),
                });
            }
        };
        let kind = match self.kind.as_str() {
            "SELF" => TargetKind::SelfOnly,
            "ALLY" => TargetKind::Ally,
            "ENEMY" => TargetKind::Enemy,
            other => {
                return Err(ContentError::BadDefinition {
                    name: ability.to_string(),
                    reason: format!("unknown target kind '{other}'"),
                });
            }
        };
        Ok((count, kind))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AbilitySpec {
    pub name: String,
    pub tags: Vec<String>,
    pub effect: EffectUseSpec,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub max_uses: UseCapsSpec,
    pub targets: TargetSpec,
    #[serde(default)]
    pub range: u32,
}

impl AbilitySpec {
    pub fn resolve_tags(&self) -> Result<AbilityTags, ContentError> {
        let mut tags = AbilityTags::empty();
        for tag in &self.tags {
            tags |= match tag.as_str() {
                "DAMAGE" => AbilityTags::DAMAGE,
                "BLOCK" => AbilityTags::BLOCK,
                "HEAL" => AbilityTags::HEAL,
                "SUMMON" => AbilityTags::SUMMON,
                "PASS" => AbilityTags::PASS,
                "FLEE" => AbilityTags::FLEE,
                "MOVE" => AbilityTags::MOVE,
                "GIVE" => AbilityTags::GIVE,
                other => {
                    return Err(ContentError::BadDefinition {
                        name: self.name.clone(),
                        reason: format!("unknown ability tag '{other}'"),
                    });
                }
            };
        }
        Ok(tags)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreatureSpec {
    pub name: String,
    pub hp: i32,
    pub speed: String,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub behavior: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub effects: Vec<EffectUseSpec>,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub behavior: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InteractableSpec {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub state: BTreeMap<String, ParamSpec>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct DirectionsSpec {
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
}

/// Data-selected room behavior.
#[derive(Clone, Debug, Deserialize)]
pub enum RoomKindSpec {
    /// Entry damage.
    Trap(i32),
    /// Entry narration only.
    Mood { enter: String },
}

#[derive(Clone, Debug, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    pub directions: DirectionsSpec,
    #[serde(default)]
    pub creatures: Vec<String>,
    #[serde(default)]
    pub interactables: Vec<String>,
    #[serde(default)]
    pub floor_items: Vec<String>,
    #[serde(default)]
    pub encounter: Option<String>,
    #[serde(default)]
    pub behavior: Option<RoomKindSpec>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FloorSpec {
    pub name: String,
    pub rooms: Vec<Vec<String>>,
    pub starting: (usize, usize),
}

#[derive(Clone, Debug, Deserialize)]
pub struct EncounterSpec {
    pub name: String,
    pub positions: Vec<Vec<String>>,
    #[serde(default)]
    pub effects: Vec<Vec<EffectUseSpec>>,
}

/// Parses one RON document into a spec list.
pub fn parse_list<T: for<'de> Deserialize<'de>>(
    what: &str,
    source: &str,
) -> Result<Vec<T>, ContentError> {
    ron::from_str(source).map_err(|err| ContentError::BadDefinition {
        name: what.to_string(),
        reason: err.to_string(),
    })
}

/// Everything the registry is built from, as raw RON documents.
pub struct ContentSources<'a> {
    pub abilities: &'a str,
    pub creatures: &'a str,
    pub classes: &'a str,
    pub items: &'a str,
    pub interactables: &'a str,
    pub rooms: &'a str,
    pub floors: &'a str,
    pub encounters: &'a str,
}

/// Loads content sources from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── abilities.ron
/// ├── creatures.ron
/// ├── classes.ron
/// ├── items.ron
/// ├── interactables.ron
/// ├── rooms.ron
/// ├── floors.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: std::path::PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read(&self, file: &str) -> Result<String, ContentError> {
        let path = self.data_dir.join(file);
        std::fs::read_to_string(&path).map_err(|err| ContentError::BadDefinition {
            name: path.display().to_string(),
            reason: err.to_string(),
        })
    }

    /// Reads every data file and builds the registry.
    pub fn load(&self) -> Result<crate::Registry, ContentError> {
        let abilities = self.read("abilities.ron")?;
        let creatures = self.read("creatures.ron")?;
        let classes = self.read("classes.ron")?;
        let items = self.read("items.ron")?;
        let interactables = self.read("interactables.ron")?;
        let rooms = self.read("rooms.ron")?;
        let floors = self.read("floors.ron")?;
        let encounters = self.read("encounters.ron")?;
        crate::Registry::from_sources(&ContentSources {
            abilities: &abilities,
            creatures: &creatures,
            classes: &classes,
            items: &items,
            interactables: &interactables,
            rooms: &rooms,
            floors: &floors,
            encounters: &encounters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_ability_list() {
        let src = r#"[
            (
                name: "jab",
                tags: ["DAMAGE"],
                effect: (name: "strike", params: {"amount": 2}),
                targets: (count: 1, kind: "ENEMY"),
                range: 1,
            ),
        ]"#;
        let specs: Vec<AbilitySpec> = parse_list("abilities", src).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "jab");
        assert_eq!(specs[0].effect.name, "strike");
        assert!(matches!(specs[0].targets.count, CountSpec::Number(1)));
    }

    #[test]
    fn unknown_tag_is_a_content_error() {
        let spec = AbilitySpec {
            name: "jab".into(),
            tags: vec!["DAMAGE".into(), "SPARKLY".into()],
            effect: EffectUseSpec {
                name: "strike".into(),
                params: BTreeMap::new(),
            },
            cooldown: 0,
            max_uses: UseCapsSpec::default(),
            targets: TargetSpec {
                count: CountSpec::Number(1),
                kind: "ENEMY".into(),
            },
            range: 1,
        };
        assert!(matches!(
            spec.resolve_tags(),
            Err(ContentError::BadDefinition { .. })
        ));
    }

    #[test]
    fn malformed_ron_is_a_content_error() {
        let err = parse_list::<AbilitySpec>("abilities", "[ (name: ]").unwrap_err();
        assert!(matches!(err, ContentError::BadDefinition { .. }));
    }

    #[test]
    fn factory_loads_the_shipped_catalog_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        for (file, body) in [
            ("abilities.ron", crate::registry::DATA_ABILITIES),
            ("creatures.ron", crate::registry::DATA_CREATURES),
            ("classes.ron", crate::registry::DATA_CLASSES),
            ("items.ron", crate::registry::DATA_ITEMS),
            ("interactables.ron", crate::registry::DATA_INTERACTABLES),
            ("rooms.ron", crate::registry::DATA_ROOMS),
            ("floors.ron", crate::registry::DATA_FLOORS),
            ("encounters.ron", crate::registry::DATA_ENCOUNTERS),
        ] {
            std::fs::write(dir.path().join(file), body).unwrap();
        }
        let registry = ContentFactory::new(dir.path()).load().unwrap();
        use game_core::ContentOracle;
        assert!(registry.creature("cave rat").is_ok());
    }
}
