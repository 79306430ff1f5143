// Pressure levels × forecast steps

use crate::field::FieldPayload;
use std::collections::BTreeMap;

struct Level {
    name: String,
    steps: BTreeMap<u32, FieldPayload>,
}

/// Available fields keyed by level name and forecast step, with a cursor
/// for the one currently shown.
///
/// Levels keep insertion order; steps are ordered numerically.
#[derive(Default)]
pub struct FieldCatalog {
    levels: Vec<Level>,
    level: usize,
    step: u32,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the payload for `level` at `step`
    pub fn insert(&mut self, level: impl Into<String>, step: u32, payload: FieldPayload) {
        let name = level.into();
        match self.levels.iter_mut().find(|l| l.name == name) {
            Some(existing) => {
                existing.steps.insert(step, payload);
            }
            None => {
                let steps = BTreeMap::from([(step, payload)]);
                self.levels.push(Level { name, steps });
                if self.levels.len() == 1 {
                    self.step = step;
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.name.as_str())
    }

    pub fn steps(&self, level: &str) -> Vec<u32> {
        self.levels
            .iter()
            .find(|l| l.name == level)
            .map(|l| l.steps.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Level name and step under the cursor
    pub fn current(&self) -> Option<(&str, u32)> {
        self.levels.get(self.level).map(|l| (l.name.as_str(), self.step))
    }

    pub fn current_payload(&self) -> Option<&FieldPayload> {
        self.levels.get(self.level)?.steps.get(&self.step)
    }

    /// Move to level `index`, keeping the step when that level has it
    pub fn select_level(&mut self, index: usize) -> Option<&FieldPayload> {
        let level = self.levels.get(index)?;
        if !level.steps.contains_key(&self.step) {
            self.step = *level.steps.keys().next()?;
        }
        self.level = index;
        self.current_payload()
    }

    /// Next forecast step of the current level, wrapping to the first
    pub fn next_step(&mut self) -> Option<&FieldPayload> {
        let steps = &self.levels.get(self.level)?.steps;
        let next = steps
            .range(self.step + 1..)
            .next()
            .or_else(|| steps.iter().next())
            .map(|(step, _)| *step)?;
        self.step = next;
        self.current_payload()
    }

    /// Previous forecast step of the current level, wrapping to the last
    pub fn prev_step(&mut self) -> Option<&FieldPayload> {
        let steps = &self.levels.get(self.level)?.steps;
        let prev = steps
            .range(..self.step)
            .next_back()
            .or_else(|| steps.iter().next_back())
            .map(|(step, _)| *step)?;
        self.step = prev;
        self.current_payload()
    }
}
