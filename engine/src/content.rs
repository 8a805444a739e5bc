use std::collections::HashMap;
use std::fmt;
use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::derived::SkillPointFormula;
use crate::error::EngineError;
use crate::sheet::{find_skill, Investigator, SkillDef};

pub fn builtin_investigators() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        (
            "jack_bunce",
            include_str!("../content/investigators/jack_bunce.json"),
        ),
        (
            "mary_lake",
            include_str!("../content/investigators/mary_lake.json"),
        ),
    ])
}

const PROFESSIONS_YAML: &str = include_str!("../content/professions.yaml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profession {
    pub title: String,
    pub skill_points: SkillPointFormula,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub credit_rating: CreditRange,
}

impl Profession {
    /// Whether `skill` is one of this occupation's own skills, matched by
    /// catalogue label or key.
    pub fn lists_skill(&self, skill: &SkillDef) -> bool {
        self.skills
            .iter()
            .any(|s| find_skill(s).is_some_and(|def| def.key == skill.key))
    }
}

/// Inclusive credit-rating band, written `min-max` in content files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CreditRange {
    pub min: i32,
    pub max: i32,
}

impl CreditRange {
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl TryFrom<String> for CreditRange {
    type Error = String;

    fn try_from(text: String) -> std::result::Result<Self, Self::Error> {
        let bad = || format!("invalid credit rating range '{}' (expected min-max)", text);
        let (min, max) = text.split_once('-').ok_or_else(bad)?;
        let min = min.trim().parse().map_err(|_| bad())?;
        let max = max.trim().parse().map_err(|_| bad())?;
        if min > max {
            return Err(bad());
        }
        Ok(Self { min, max })
    }
}

impl From<CreditRange> for String {
    fn from(range: CreditRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for CreditRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

pub fn builtin_professions() -> Result<Vec<Profession>> {
    serde_yaml::from_str(PROFESSIONS_YAML).context("failed to parse builtin professions")
}

pub fn find_profession(title: &str) -> Result<Profession> {
    builtin_professions()?
        .into_iter()
        .find(|p| p.title.eq_ignore_ascii_case(title.trim()))
        .ok_or_else(|| EngineError::UnknownContent(title.to_string()).into())
}

/// Load an investigator from a builtin id or, failing that, a JSON file.
pub fn load_investigator(id: Option<&str>, path: Option<&str>) -> Result<Investigator> {
    if let Some(id) = id {
        let text = builtin_investigators()
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::UnknownContent(id.to_string()))?;
        return serde_json::from_str(text)
            .with_context(|| format!("failed to parse builtin investigator: {}", id));
    }
    let path = path.context("either an investigator id or a path is required")?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read investigator JSON: {}", path))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse investigator JSON: {}", path))
}
