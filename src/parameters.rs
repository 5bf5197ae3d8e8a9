use crate::error::{EngineError, ErrorCode};
use serde::{Deserialize, Serialize};

pub const MIN_HAIRPIN_LOOP: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HairpinParameters {
    pub max_stem: usize,
    pub min_stem: usize,
    pub max_loop: usize,
    pub window: usize,
}

impl Default for HairpinParameters {
    fn default() -> Self {
        Self {
            max_stem: 6,
            min_stem: 2,
            max_loop: 12,
            window: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitParameters {
    pub min_right: usize,
    pub max_right: usize,
    pub min_left: usize,
}

impl Default for SplitParameters {
    fn default() -> Self {
        Self {
            min_right: 15,
            max_right: 35,
            min_left: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimerParameters {
    pub min_match: usize,
    pub max_match: usize,
}

impl Default for DimerParameters {
    fn default() -> Self {
        Self {
            min_match: 3,
            max_match: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParameters {
    pub hairpin: HairpinParameters,
    pub split: SplitParameters,
    pub dimer: DimerParameters,
    pub composite_names: Vec<String>,
    pub scan_unsplit_hairpins: bool,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            hairpin: HairpinParameters::default(),
            split: SplitParameters::default(),
            dimer: DimerParameters::default(),
            composite_names: vec!["FIP".to_string(), "BIP".to_string()],
            scan_unsplit_hairpins: false,
        }
    }
}

impl AnalysisParameters {
    pub fn load_from_path(path: &str) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|e| EngineError {
            code: ErrorCode::Io,
            message: format!("Could not read parameter file '{path}': {e}"),
        })?;
        let ret: Self = serde_json::from_str(&text).map_err(|e| EngineError {
            code: ErrorCode::InvalidInput,
            message: format!("Could not parse parameter JSON '{path}': {e}"),
        })?;
        ret.validate()?;
        Ok(ret)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let h = &self.hairpin;
        if h.min_stem == 0 || h.min_stem > h.max_stem {
            return Err(EngineError::invalid_input(format!(
                "hairpin stem range {}..={} is invalid",
                h.min_stem, h.max_stem
            )));
        }
        if h.max_loop < MIN_HAIRPIN_LOOP {
            return Err(EngineError::invalid_input(format!(
                "hairpin.max_loop must be >= {MIN_HAIRPIN_LOOP}"
            )));
        }
        if h.window == 0 {
            return Err(EngineError::invalid_input("hairpin.window must be >= 1"));
        }
        let s = &self.split;
        if s.min_right == 0 || s.min_right > s.max_right {
            return Err(EngineError::invalid_input(format!(
                "split right-half range {}..={} is invalid",
                s.min_right, s.max_right
            )));
        }
        if s.min_left == 0 {
            return Err(EngineError::invalid_input("split.min_left must be >= 1"));
        }
        let d = &self.dimer;
        if d.min_match == 0 || d.min_match > d.max_match {
            return Err(EngineError::invalid_input(format!(
                "dimer match range {}..={} is invalid",
                d.min_match, d.max_match
            )));
        }
        Ok(())
    }

    pub fn is_composite_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.composite_names
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Sets one parameter by dotted name, eg `hairpin.max_loop`.
    /// The change is only kept when the resulting set validates.
    pub fn set(&mut self, name: &str, value: &serde_json::Value) -> Result<(), EngineError> {
        let mut next = self.clone();
        match name {
            "hairpin.max_stem" => next.hairpin.max_stem = Self::as_usize(name, value)?,
            "hairpin.min_stem" => next.hairpin.min_stem = Self::as_usize(name, value)?,
            "hairpin.max_loop" => next.hairpin.max_loop = Self::as_usize(name, value)?,
            "hairpin.window" => next.hairpin.window = Self::as_usize(name, value)?,
            "split.min_right" => next.split.min_right = Self::as_usize(name, value)?,
            "split.max_right" => next.split.max_right = Self::as_usize(name, value)?,
            "split.min_left" => next.split.min_left = Self::as_usize(name, value)?,
            "dimer.min_match" => next.dimer.min_match = Self::as_usize(name, value)?,
            "dimer.max_match" => next.dimer.max_match = Self::as_usize(name, value)?,
            "scan_unsplit_hairpins" => {
                next.scan_unsplit_hairpins = value.as_bool().ok_or_else(|| {
                    EngineError::invalid_input(format!("SetParameter {name} requires a boolean"))
                })?
            }
            "composite_names" => {
                next.composite_names =
                    serde_json::from_value(value.clone()).map_err(|e| {
                        EngineError::invalid_input(format!(
                            "SetParameter {name} requires a list of names: {e}"
                        ))
                    })?
            }
            _ => {
                return Err(EngineError {
                    code: ErrorCode::Unsupported,
                    message: format!("Unknown parameter '{name}'"),
                });
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    fn as_usize(name: &str, value: &serde_json::Value) -> Result<usize, EngineError> {
        value.as_u64().map(|v| v as usize).ok_or_else(|| {
            EngineError::invalid_input(format!("SetParameter {name} requires a positive integer"))
        })
    }
}
