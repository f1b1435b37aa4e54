// In crates/optimizer/src/grid.rs

use itertools::iproduct;
use serde::Deserialize;
use strategies::{ParameterCombo, Rule};

use crate::error::{Error, Result};

/// One axis of the grid as written in `optimizer.toml`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)] // Allows serde to try parsing as one variant, then the next
pub enum ParamValue {
    Fixed(usize),
    List(Vec<usize>),
    Range {
        start: usize,
        end: usize,
        #[serde(default)]
        step: Option<usize>,
    },
}

impl ParamValue {
    /// Expands the axis into its values. Ranges include `end`.
    pub fn expand(&self, axis: &'static str) -> Result<Vec<usize>> {
        match self {
            ParamValue::Fixed(v) => Ok(vec![*v]),
            ParamValue::List(values) => Ok(values.clone()),
            ParamValue::Range { start, end, step } => {
                let step = step.unwrap_or(1);
                if step == 0 {
                    return Err(Error::InvalidGrid {
                        axis,
                        reason: "step must be positive".to_string(),
                    });
                }
                if start > end {
                    return Err(Error::InvalidGrid {
                        axis,
                        reason: format!("start {start} is after end {end}"),
                    });
                }
                Ok((*start..=*end).step_by(step).collect())
            }
        }
    }
}

/// The `[grid]` table of an optimization job.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub short_window: ParamValue,
    pub long_window: ParamValue,
    #[serde(default)]
    pub momentum_window: Option<ParamValue>,
}

impl GridSpec {
    pub fn expand(&self) -> Result<ParameterGrid> {
        let shorts = self.short_window.expand("short_window")?;
        let longs = self.long_window.expand("long_window")?;
        let momenta = self
            .momentum_window
            .as_ref()
            .map(|m| m.expand("momentum_window"))
            .transpose()?;
        Ok(ParameterGrid::from_axes(&shorts, &longs, momenta.as_deref()))
    }
}

/// An ordered set of parameter combinations.
///
/// Enumeration order is short-major, then long, then momentum; it is the
/// tie-break order of a search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterGrid {
    combos: Vec<ParameterCombo>,
}

impl ParameterGrid {
    /// Cartesian product of the axes. Invalid combos are kept; a search skips them.
    pub fn from_axes(shorts: &[usize], longs: &[usize], momenta: Option<&[usize]>) -> Self {
        let combos = match momenta {
            Some(momenta) => iproduct!(shorts, longs, momenta)
                .map(|(s, l, m)| ParameterCombo::new(*s, *l, Some(*m)))
                .collect(),
            None => iproduct!(shorts, longs)
                .map(|(s, l)| ParameterCombo::new(*s, *l, None))
                .collect(),
        };
        Self { combos }
    }

    pub fn combos(&self) -> &[ParameterCombo] {
        &self.combos
    }

    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    /// The combos `rule` accepts, in enumeration order.
    pub fn valid_for(&self, rule: Rule) -> Vec<ParameterCombo> {
        self.combos
            .iter()
            .filter(|c| c.is_valid_for(rule))
            .copied()
            .collect()
    }
}

impl From<Vec<ParameterCombo>> for ParameterGrid {
    fn from(combos: Vec<ParameterCombo>) -> Self {
        Self { combos }
    }
}

impl<'a> IntoIterator for &'a ParameterGrid {
    type Item = &'a ParameterCombo;
    type IntoIter = std::slice::Iter<'a, ParameterCombo>;

    fn into_iter(self) -> Self::IntoIter {
        self.combos.iter()
    }
}
