use std::collections::HashMap;

use anyhow::{Result, anyhow, bail};

use crate::error::GridError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subformula {
    pub column: usize,
    pub id: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub index: usize,
    pub label: String,
    pub width_hint: f32,
}

/// Ordered catalog of formula identities. Column 0 is the root formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubformulaRegistry {
    entries: Vec<Subformula>,
    column_by_id: HashMap<String, usize>,
}

impl SubformulaRegistry {
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut registered = Vec::new();
        let mut column_by_id = HashMap::new();

        for (column, (id, label)) in entries.into_iter().enumerate() {
            if id.trim().is_empty() {
                bail!("subformula in column {column} has an empty id");
            }

            if let Some(existing) = column_by_id.insert(id.clone(), column) {
                bail!("subformula id `{id}` is registered twice (columns {existing} and {column})");
            }

            registered.push(Subformula { column, id, label });
        }

        if registered.is_empty() {
            return Err(anyhow!("trace registers no subformulas; the root formula needs column 0"));
        }

        Ok(Self {
            entries: registered,
            column_by_id,
        })
    }

    pub fn column_of(&self, formula_id: &str, tp: usize) -> Result<usize, GridError> {
        self.column_by_id
            .get(formula_id)
            .copied()
            .ok_or_else(|| GridError::UnregisteredFormula {
                formula_id: formula_id.to_owned(),
                tp,
            })
    }

    pub fn label(&self, column: usize) -> Option<&str> {
        self.entries.get(column).map(|entry| entry.label.as_str())
    }

    pub fn root(&self) -> &Subformula {
        &self.entries[0]
    }

    pub fn columns(&self) -> Vec<Column> {
        self.entries
            .iter()
            .map(|entry| Column {
                index: entry.column,
                label: entry.label.clone(),
                width_hint: column_width_hint(&entry.label),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn column_width_hint(label: &str) -> f32 {
    (label.chars().count() as f32 * 10.0).clamp(36.0, 240.0)
}
