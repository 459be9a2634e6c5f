use crate::error::{GameError, Result};
use crate::types::Difficulty;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_JSON: &str = include_str!("../data/tech.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechItem {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub difficulty: Difficulty,
    /// Icon reference as `<set>:<icon>`, e.g. `fa:FaReact`.
    pub glyph: String,
}

impl TechItem {
    /// Canonical name followed by every alias.
    #[inline]
    pub fn accepted_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

#[derive(Debug)]
pub struct Catalog {
    by_id: Vec<Option<TechItem>>,        // index by id (len = max id + 1)
    answer_to_id: HashMap<String, u16>, // normalized names and aliases
    count: usize,
}

impl Catalog {
    /// The catalog shipped with the game (`data/tech.json`).
    pub fn builtin() -> Result<Catalog> {
        let raw: Vec<TechItem> = serde_json::from_str(BUILTIN_JSON)?;
        Catalog::from_items(raw)
    }

    #[inline]
    pub fn get(&self, id: u16) -> Option<&TechItem> {
        self.by_id.get(id as usize).and_then(|c| c.as_ref())
    }

    #[inline]
    fn id_by_answer(&self, answer: &str) -> Option<u16> {
        self.answer_to_id.get(&crate::engine::answer::normalize_answer(answer)).copied()
    }

    /// Whether `answer` names item `id`, by canonical name or alias.
    /// Case and surrounding whitespace are ignored; blank answers never match.
    #[inline]
    pub fn accepts(&self, id: u16, answer: &str) -> bool {
        self.id_by_answer(answer) == Some(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &TechItem> {
        self.by_id.iter().filter_map(|o| o.as_ref())
    }

    /// Items of one tier, in id order.
    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&TechItem> {
        self.iter().filter(|t| t.difficulty == difficulty).collect()
    }

    /// Build a catalog from raw items, enforcing unique ids and unambiguous answers.
    pub fn from_items(raw: Vec<TechItem>) -> Result<Catalog> {
        if raw.is_empty() {
            return Err(GameError::InvalidCatalog("no items in catalog".to_string()));
        }

        let mut max_id: u16 = 0;
        for t in &raw {
            validate_item(t)?;
            max_id = max_id.max(t.id);
        }

        let mut by_id: Vec<Option<TechItem>> = vec![None; (max_id as usize) + 1];
        let mut answer_to_id: HashMap<String, u16> = HashMap::with_capacity(raw.len() * 3);

        for t in raw {
            let id = t.id;
            if let Some(existing) = by_id.get(id as usize).and_then(|x| x.as_ref()) {
                return Err(GameError::InvalidCatalog(format!(
                    "duplicate id {} ('{}' and '{}')",
                    id, existing.name, t.name
                )));
            }
            for answer in t.accepted_names() {
                let key = crate::engine::answer::normalize_answer(answer);
                match answer_to_id.insert(key, id) {
                    Some(prev) if prev != id => {
                        return Err(GameError::InvalidCatalog(format!(
                            "answer '{}' is ambiguous between ids {} and {}",
                            answer, prev, id
                        )));
                    }
                    _ => {}
                }
            }
            by_id[id as usize] = Some(t);
        }

        let count = by_id.iter().filter(|c| c.is_some()).count();

        Ok(Catalog {
            by_id,
            answer_to_id,
            count,
        })
    }
}

fn validate_item(item: &TechItem) -> Result<()> {
    if item.name.trim().is_empty() {
        return Err(GameError::InvalidCatalog(format!(
            "item id {} has an empty name",
            item.id
        )));
    }
    if item.aliases.iter().any(|a| a.trim().is_empty()) {
        return Err(GameError::InvalidCatalog(format!(
            "item id {} '{}' has an empty alias",
            item.id, item.name
        )));
    }
    Ok(())
}

/// Load a catalog from a JSON file (runtime), building a dense id index and answer lookup.
pub fn load_catalog_from_json<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
    let raw: Vec<TechItem> = serde_json::from_str(&data)?;
    Catalog::from_items(raw)
}
