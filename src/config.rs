use crate::QieyunResult;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum_macros::EnumIter;

/// Where the chongniu contrast of division-III rhymes is located.
///
/// The scholarship is split: one reading puts it in the medial (type B
/// carries a central glide `ɨ`), the other in the nucleus. Each reading
/// licenses a different set of medial/nucleus pairs.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChongniuInterpretation {
    #[default]
    MedialBased,
    VowelBased,
}

impl Display for ChongniuInterpretation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChongniuInterpretation::MedialBased => "medial-based",
                ChongniuInterpretation::VowelBased => "vowel-based",
            }
        )
    }
}

/// Whether `x` and `ɣ` are two laryngeal initials or dialectal notations of one.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaryngealInterpretation {
    #[default]
    Distinct,
    Unified,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub chongniu: ChongniuInterpretation,
    pub laryngeals: LaryngealInterpretation,
    /// Extra `(medial, nucleus)` symbol pairs to rule out.
    pub extra_exclusions: Vec<(String, String)>,
}

impl RegistryConfig {
    pub fn from_json(input: &str) -> QieyunResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json(&self) -> QieyunResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_chongniu(mut self, chongniu: ChongniuInterpretation) -> Self {
        self.chongniu = chongniu;
        self
    }

    pub fn with_laryngeals(mut self, laryngeals: LaryngealInterpretation) -> Self {
        self.laryngeals = laryngeals;
        self
    }

    pub fn with_exclusion(mut self, medial: impl Into<String>, nucleus: impl Into<String>) -> Self {
        self.extra_exclusions.push((medial.into(), nucleus.into()));
        self
    }
}
