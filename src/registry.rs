use crate::config::{ChongniuInterpretation, LaryngealInterpretation, RegistryConfig};
use crate::raw_data;
use crate::sounds::{
    field, parse_consonants, parse_csv_to_map, parse_vowels, Consonant, Phoneme, Place, Vowel,
};
use crate::{FeatureResult, InvalidFeatureError};
use itertools::{iproduct, Itertools};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// The shared Middle Chinese registry, built on first use with the default
/// configuration.
///
/// # Panics
///
/// If the built-in tables do not parse. That is a defect in the crate, not a
/// data condition a caller can recover from.
pub fn middle_chinese() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        RegistryBuilder::default()
            .build()
            .unwrap_or_else(|e| panic!("built-in Middle Chinese inventory is malformed: {}", e))
    })
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize)]
pub enum Role {
    Initial,
    Medial,
    Nucleus,
    Coda,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Role::Initial => "initial",
                Role::Medial => "medial",
                Role::Nucleus => "nucleus",
                Role::Coda => "final",
            }
        )
    }
}

/// Syllabic positions a phoneme may fill. The flags are independent: `j`
/// is both a medial and a coda.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Roles {
    pub initial: bool,
    pub medial: bool,
    pub nucleus: bool,
    pub coda: bool,
}

impl Roles {
    pub const NONE: Roles = Roles {
        initial: false,
        medial: false,
        nucleus: false,
        coda: false,
    };
    pub const INITIAL: Roles = Roles {
        initial: true,
        ..Roles::NONE
    };
    pub const MEDIAL: Roles = Roles {
        medial: true,
        ..Roles::NONE
    };
    pub const NUCLEUS: Roles = Roles {
        nucleus: true,
        ..Roles::NONE
    };
    pub const CODA: Roles = Roles {
        coda: true,
        ..Roles::NONE
    };

    pub fn is_empty(&self) -> bool {
        *self == Roles::NONE
    }

    pub fn contains(&self, role: Role) -> bool {
        match role {
            Role::Initial => self.initial,
            Role::Medial => self.medial,
            Role::Nucleus => self.nucleus,
            Role::Coda => self.coda,
        }
    }

    pub fn with(mut self, role: Role) -> Self {
        match role {
            Role::Initial => self.initial = true,
            Role::Medial => self.medial = true,
            Role::Nucleus => self.nucleus = true,
            Role::Coda => self.coda = true,
        }
        self
    }

    pub fn union(self, other: Roles) -> Self {
        other.iter().fold(self, Roles::with)
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::iter().filter(|r| self.contains(*r))
    }
}

impl From<Role> for Roles {
    fn from(value: Role) -> Self {
        Roles::NONE.with(value)
    }
}

impl TryFrom<&str> for Roles {
    type Error = InvalidFeatureError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.split_whitespace().try_fold(Roles::NONE, |roles, name| {
            let role = match name.to_ascii_lowercase().as_str() {
                "initial" => Role::Initial,
                "medial" => Role::Medial,
                "nucleus" => Role::Nucleus,
                "final" | "coda" => Role::Coda,
                _ => {
                    return Err(InvalidFeatureError::UnknownValue {
                        feature: "role",
                        value: name.to_string(),
                    })
                }
            };
            Ok(roles.with(role))
        })
    }
}

impl Display for Roles {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iter().join(" "))
    }
}

/// A phoneme together with the positions it may take. The zero value has
/// neither and stands in for an empty optional slot such as a zero coda.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionedPhoneme {
    phoneme: Option<Phoneme>,
    roles: Roles,
}

impl PositionedPhoneme {
    pub fn new(phoneme: Phoneme, roles: Roles) -> Self {
        Self {
            phoneme: Some(phoneme),
            roles,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.phoneme.is_none()
    }

    pub fn phoneme(&self) -> Option<&Phoneme> {
        self.phoneme.as_ref()
    }

    pub fn roles(&self) -> Roles {
        self.roles
    }

    pub fn symbol(&self) -> &str {
        self.phoneme.as_ref().map(Phoneme::symbol).unwrap_or("")
    }
}

impl Display for PositionedPhoneme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.phoneme {
            Some(p) => write!(f, "{} [{}]", p.symbol(), self.roles),
            None => write!(f, "∅"),
        }
    }
}

/// Natural classes of initials, named after their first member.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize)]
pub enum InitialClass {
    /// Labials.
    P,
    /// Dental and alveolar stops, nasal and lateral.
    T,
    /// Retroflex stops and nasal.
    Tr,
    /// Dental sibilants.
    TS,
    /// Retroflex sibilants.
    TSr,
    /// Palatals.
    TSy,
    /// Velars and laryngeals. A vowel standing as initial is counted here
    /// with the zero initial.
    K,
}

impl InitialClass {
    pub fn of(phoneme: &Phoneme) -> Self {
        use InitialClass::*;
        let c = match phoneme {
            Phoneme::Consonant(c) => c,
            Phoneme::Vowel(_) => return K,
        };
        match c.place() {
            Place::Bilabial | Place::LabioDental => P,
            Place::Dental | Place::Alveolar if c.is_sibilant() => TS,
            Place::Dental | Place::Alveolar => T,
            Place::Retroflex if c.is_sibilant() => TSr,
            Place::Retroflex => Tr,
            Place::Palatal => TSy,
            Place::Velar | Place::LabioVelar | Place::Glottal => K,
        }
    }
}

impl Display for InitialClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                InitialClass::P => "P",
                InitialClass::T => "T",
                InitialClass::Tr => "Tr",
                InitialClass::TS => "TS",
                InitialClass::TSr => "TSr",
                InitialClass::TSy => "TSy",
                InitialClass::K => "K",
            }
        )
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InitialKind {
    #[default]
    Simple,
    Complex,
}

impl TryFrom<&str> for InitialKind {
    type Error = InvalidFeatureError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(match value.to_ascii_lowercase().as_str() {
            "simple" => InitialKind::Simple,
            "complex" => InitialKind::Complex,
            _ => {
                return Err(InvalidFeatureError::UnknownValue {
                    feature: "kind",
                    value: value.to_string(),
                })
            }
        })
    }
}

/// A rhyme: everything after the initial. `coda` is the zero positioned
/// phoneme for open syllables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Final {
    pub medial: Option<PositionedPhoneme>,
    pub glide: Option<PositionedPhoneme>,
    pub nucleus: PositionedPhoneme,
    pub coda: PositionedPhoneme,
}

impl Display for Final {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let medial = self.medial.as_ref().map(|m| m.symbol()).unwrap_or_default();
        let glide = self.glide.as_ref().map(|g| g.symbol()).unwrap_or_default();
        write!(
            f,
            "{}{}{}{}",
            medial,
            glide,
            self.nucleus.symbol(),
            self.coda.symbol()
        )
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    config: RegistryConfig,
    initials: BTreeSet<PositionedPhoneme>,
    medials: BTreeSet<PositionedPhoneme>,
    nuclei: BTreeSet<PositionedPhoneme>,
    codas: BTreeSet<PositionedPhoneme>,
    finals: BTreeSet<Final>,
    kinds: HashMap<Phoneme, InitialKind>,
    exclusions: BTreeMap<Phoneme, BTreeSet<Phoneme>>,
    by_symbol: BTreeMap<String, SmallVec<[PositionedPhoneme; 2]>>,
    aliases: BTreeMap<String, String>,
    consonants: BTreeSet<Consonant>,
    vowels: BTreeSet<Vowel>,
}

impl Registry {
    /// An empty registry. Only the zero coda is present.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            initials: BTreeSet::new(),
            medials: BTreeSet::new(),
            nuclei: BTreeSet::new(),
            codas: [PositionedPhoneme::zero()].into_iter().collect(),
            finals: BTreeSet::new(),
            kinds: HashMap::new(),
            exclusions: BTreeMap::new(),
            by_symbol: BTreeMap::new(),
            aliases: BTreeMap::new(),
            consonants: BTreeSet::new(),
            vowels: BTreeSet::new(),
        }
    }

    /// The built-in inventory under `config`.
    pub fn middle_chinese(config: RegistryConfig) -> FeatureResult<Self> {
        RegistryBuilder::new(config).build()
    }

    /// Copy-on-write extension: `self` is left untouched.
    pub fn extended(&self, f: impl FnOnce(&mut Registry)) -> Registry {
        let mut registry = self.clone();
        f(&mut registry);
        registry
    }

    /// Adds `phoneme` to every role set named in `roles`. A phoneme already
    /// registered under the same symbol keeps a single entry whose roles are
    /// the union of both registrations. Returns whether the registry changed.
    pub fn register(&mut self, phoneme: Phoneme, roles: Roles) -> bool {
        let rhyme = roles.union(self.roles_of(&phoneme));
        let changed = self.insert(phoneme, roles);
        if changed && (rhyme.medial || rhyme.nucleus || rhyme.coda) {
            self.rebuild_finals();
        }
        changed
    }

    /// Registers an initial and records whether it is simple or complex.
    pub fn register_initial(&mut self, phoneme: Phoneme, kind: InitialKind) -> bool {
        let rhyme = self.roles_of(&phoneme);
        let changed = self.insert(phoneme.clone(), Roles::INITIAL);
        if changed && (rhyme.medial || rhyme.nucleus || rhyme.coda) {
            self.rebuild_finals();
        }
        let previous = self.kinds.insert(phoneme, kind);
        changed || previous != Some(kind)
    }

    /// Rules out `medial` directly before `nucleus`.
    pub fn exclude(&mut self, medial: Phoneme, nucleus: Phoneme) -> bool {
        let changed = self.exclusions.entry(medial).or_default().insert(nucleus);
        if changed {
            self.rebuild_finals();
        }
        changed
    }

    fn insert(&mut self, phoneme: Phoneme, roles: Roles) -> bool {
        if roles.is_empty() {
            return false;
        }
        let entries = self.by_symbol.entry(phoneme.symbol().to_string()).or_default();
        let existing = entries.iter().position(|p| p.phoneme() == Some(&phoneme));
        let previous = existing.map(|i| entries[i].roles()).unwrap_or(Roles::NONE);
        let merged = previous.union(roles);
        if merged == previous {
            return false;
        }
        let positioned = PositionedPhoneme::new(phoneme.clone(), merged);
        let replaced = match existing {
            Some(i) => Some(std::mem::replace(&mut entries[i], positioned.clone())),
            None => {
                entries.push(positioned.clone());
                None
            }
        };
        if let Some(old) = replaced {
            for role in old.roles().iter() {
                let set = self.set_mut(role);
                // an equal entry written with another symbol is left alone
                if set.get(&old).map(PositionedPhoneme::symbol) == Some(old.symbol()) {
                    set.remove(&old);
                }
            }
        }
        for role in merged.iter() {
            self.set_mut(role).insert(positioned.clone());
        }
        if merged.initial {
            self.kinds.entry(phoneme.clone()).or_insert(InitialKind::Simple);
        }
        match phoneme {
            Phoneme::Consonant(c) => self.consonants.insert(c),
            Phoneme::Vowel(v) => self.vowels.insert(v),
        };
        true
    }

    fn set(&self, role: Role) -> &BTreeSet<PositionedPhoneme> {
        match role {
            Role::Initial => &self.initials,
            Role::Medial => &self.medials,
            Role::Nucleus => &self.nuclei,
            Role::Coda => &self.codas,
        }
    }

    fn set_mut(&mut self, role: Role) -> &mut BTreeSet<PositionedPhoneme> {
        match role {
            Role::Initial => &mut self.initials,
            Role::Medial => &mut self.medials,
            Role::Nucleus => &mut self.nuclei,
            Role::Coda => &mut self.codas,
        }
    }

    fn rebuild_finals(&mut self) {
        let mut onsets: Vec<(Option<&PositionedPhoneme>, Option<&PositionedPhoneme>)> =
            vec![(None, None)];
        for medial in &self.medials {
            onsets.push((Some(medial), None));
            for glide in &self.medials {
                if glide.phoneme() != medial.phoneme() {
                    onsets.push((Some(medial), Some(glide)));
                }
            }
        }
        let finals = iproduct!(onsets.iter(), self.nuclei.iter(), self.codas.iter())
            .filter(|((medial, glide), nucleus, _)| {
                [medial, glide]
                    .into_iter()
                    .flatten()
                    .all(|m| !self.excludes_positioned(m, nucleus))
            })
            .map(|((medial, glide), nucleus, coda)| Final {
                medial: medial.cloned(),
                glide: glide.cloned(),
                nucleus: nucleus.clone(),
                coda: coda.clone(),
            })
            .collect();
        self.finals = finals;
    }

    fn excludes_positioned(&self, medial: &PositionedPhoneme, nucleus: &PositionedPhoneme) -> bool {
        match (medial.phoneme(), nucleus.phoneme()) {
            (Some(m), Some(n)) => self.is_excluded(m, n),
            _ => false,
        }
    }

    /// The entry of `role`'s set for `phoneme`, if it was registered there.
    pub fn positioned(&self, role: Role, phoneme: &Phoneme) -> Option<&PositionedPhoneme> {
        self.set(role)
            .range(PositionedPhoneme::new(phoneme.clone(), Roles::NONE)..)
            .next()
            .filter(|p| p.phoneme() == Some(phoneme))
    }

    pub fn roles_of(&self, phoneme: &Phoneme) -> Roles {
        Role::iter()
            .filter(|r| self.positioned(*r, phoneme).is_some())
            .fold(Roles::NONE, Roles::with)
    }

    pub fn is_initial(&self, phoneme: &Phoneme) -> bool {
        self.positioned(Role::Initial, phoneme).is_some()
    }

    pub fn is_medial(&self, phoneme: &Phoneme) -> bool {
        self.positioned(Role::Medial, phoneme).is_some()
    }

    pub fn is_nucleus(&self, phoneme: &Phoneme) -> bool {
        self.positioned(Role::Nucleus, phoneme).is_some()
    }

    pub fn is_coda(&self, phoneme: &Phoneme) -> bool {
        self.positioned(Role::Coda, phoneme).is_some()
    }

    /// Codas of the entering tone: `p`, `t`, `k` and any other stop coda.
    pub fn is_stop_coda(&self, phoneme: &Phoneme) -> bool {
        phoneme.is_stop() && self.is_coda(phoneme)
    }

    pub fn is_excluded(&self, medial: &Phoneme, nucleus: &Phoneme) -> bool {
        self.exclusions
            .get(medial)
            .map(|n| n.contains(nucleus))
            .unwrap_or(false)
    }

    pub fn exclusions(&self) -> impl Iterator<Item = (&Phoneme, &Phoneme)> + '_ {
        self.exclusions
            .iter()
            .flat_map(|(m, nuclei)| nuclei.iter().map(move |n| (m, n)))
    }

    fn resolve<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.aliases.get(symbol).map(String::as_str).unwrap_or(symbol)
    }

    /// Every positioned phoneme registered under `symbol`, following a
    /// dialectal alias if one is configured.
    pub fn lookup_by_symbol(&self, symbol: &str) -> BTreeSet<PositionedPhoneme> {
        self.by_symbol
            .get(self.resolve(symbol))
            .map(|v| v.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The phoneme written `symbol`, if any is registered.
    pub fn phoneme(&self, symbol: &str) -> Option<&Phoneme> {
        self.by_symbol
            .get(self.resolve(symbol))
            .and_then(|v| v.first())
            .and_then(PositionedPhoneme::phoneme)
    }

    pub fn initial_kind(&self, phoneme: &Phoneme) -> Option<InitialKind> {
        if !self.is_initial(phoneme) {
            return None;
        }
        self.kinds.get(phoneme).copied()
    }

    /// Initials grouped into natural classes. Every initial lands in exactly
    /// one class.
    pub fn classes(&self) -> BTreeMap<InitialClass, BTreeSet<PositionedPhoneme>> {
        let mut classes: BTreeMap<InitialClass, BTreeSet<PositionedPhoneme>> = BTreeMap::new();
        for initial in &self.initials {
            if let Some(p) = initial.phoneme() {
                classes
                    .entry(InitialClass::of(p))
                    .or_default()
                    .insert(initial.clone());
            }
        }
        classes
    }

    pub fn class(&self, class: InitialClass) -> BTreeSet<PositionedPhoneme> {
        self.initials
            .iter()
            .filter(|i| i.phoneme().map(InitialClass::of) == Some(class))
            .cloned()
            .collect()
    }

    fn initials_of_kind(&self, kind: InitialKind) -> BTreeSet<PositionedPhoneme> {
        self.initials
            .iter()
            .filter(|i| {
                i.phoneme()
                    .and_then(|p| self.kinds.get(p))
                    .copied()
                    .unwrap_or_default()
                    == kind
            })
            .cloned()
            .collect()
    }

    pub fn simple_initials(&self) -> BTreeSet<PositionedPhoneme> {
        self.initials_of_kind(InitialKind::Simple)
    }

    pub fn complex_initials(&self) -> BTreeSet<PositionedPhoneme> {
        self.initials_of_kind(InitialKind::Complex)
    }

    pub fn initials(&self) -> &BTreeSet<PositionedPhoneme> {
        &self.initials
    }

    pub fn medials(&self) -> &BTreeSet<PositionedPhoneme> {
        &self.medials
    }

    pub fn nuclei(&self) -> &BTreeSet<PositionedPhoneme> {
        &self.nuclei
    }

    pub fn codas(&self) -> &BTreeSet<PositionedPhoneme> {
        &self.codas
    }

    pub fn finals(&self) -> &BTreeSet<Final> {
        &self.finals
    }

    pub fn consonants(&self) -> &BTreeSet<Consonant> {
        &self.consonants
    }

    pub fn vowels(&self) -> &BTreeSet<Vowel> {
        &self.vowels
    }

    /// Initials, medials, nuclei and codas together.
    pub fn inventory(&self) -> BTreeSet<PositionedPhoneme> {
        self.initials
            .iter()
            .chain(&self.medials)
            .chain(&self.nuclei)
            .chain(&self.codas)
            .cloned()
            .collect()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn chongniu(&self) -> ChongniuInterpretation {
        self.config.chongniu
    }
}

/// Assembles a [`Registry`] from feature and position tables.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    config: RegistryConfig,
    consonants: String,
    vowels: String,
    positions: Vec<String>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl RegistryBuilder {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            consonants: raw_data::CONSONANTS.to_string(),
            vowels: raw_data::VOWELS.to_string(),
            positions: vec![raw_data::POSITIONS.to_string()],
        }
    }

    pub fn consonant_table(mut self, table: impl Into<String>) -> Self {
        self.consonants = table.into();
        self
    }

    pub fn vowel_table(mut self, table: impl Into<String>) -> Self {
        self.vowels = table.into();
        self
    }

    /// Replaces the built-in `symbol,roles,kind` tables.
    pub fn position_table(mut self, table: impl Into<String>) -> Self {
        self.positions = vec![table.into()];
        self
    }

    pub fn build(self) -> FeatureResult<Registry> {
        let mut symbols: HashMap<String, Phoneme> = HashMap::new();
        for c in parse_consonants(self.consonants.as_bytes())? {
            symbols.insert(c.symbol().to_string(), c.into());
        }
        for v in parse_vowels(self.vowels.as_bytes())? {
            symbols.insert(v.symbol().to_string(), v.into());
        }
        let lookup = |symbol: &str| {
            symbols
                .get(symbol)
                .cloned()
                .ok_or_else(|| InvalidFeatureError::UnknownSymbol(symbol.to_string()))
        };

        let mut registry = Registry::new(self.config.clone());
        for (spelling, symbol) in raw_data::SPELLING_VARIANTS {
            registry.aliases.insert(spelling.to_string(), symbol.to_string());
        }
        let (variant, merged_into) = raw_data::LARYNGEAL_VARIANT;
        let unified = self.config.laryngeals == LaryngealInterpretation::Unified;
        if unified {
            registry
                .aliases
                .insert(variant.to_string(), merged_into.to_string());
        }

        let mut tables = self.positions.clone();
        let exclusions = match self.config.chongniu {
            ChongniuInterpretation::MedialBased => {
                tables.push(raw_data::CHONGNIU_MEDIALS.to_string());
                raw_data::MEDIAL_BASED_EXCLUSIONS
            }
            ChongniuInterpretation::VowelBased => raw_data::VOWEL_BASED_EXCLUSIONS,
        };
        for table in &tables {
            for row in parse_csv_to_map(table.as_bytes())? {
                let symbol = field(&row, "symbol")?;
                if unified && symbol == variant {
                    continue;
                }
                let phoneme = lookup(symbol)?;
                let roles = Roles::try_from(field(&row, "roles")?)?;
                registry.insert(phoneme.clone(), roles);
                if let Some(kind) = row.get("kind").filter(|k| !k.is_empty()) {
                    registry.kinds.insert(phoneme, InitialKind::try_from(kind.as_str())?);
                }
            }
        }

        for row in parse_csv_to_map(exclusions.as_bytes())? {
            let medial = lookup(field(&row, "medial")?)?;
            let nucleus = lookup(field(&row, "nucleus")?)?;
            registry.exclusions.entry(medial).or_default().insert(nucleus);
        }
        for (medial, nucleus) in &self.config.extra_exclusions {
            match (lookup(medial.as_str()), lookup(nucleus.as_str())) {
                (Ok(m), Ok(n)) => {
                    registry.exclusions.entry(m).or_default().insert(n);
                }
                _ => warn!("skipping exclusion {}{}: unknown symbol", medial, nucleus),
            }
        }
        registry.rebuild_finals();

        debug!(
            "built registry ({} reading of chongniu, {:?} laryngeals): {} initials, {} medials, {} nuclei, {} codas, {} finals",
            self.config.chongniu,
            self.config.laryngeals,
            registry.initials.len(),
            registry.medials.len(),
            registry.nuclei.len(),
            registry.codas.len(),
            registry.finals.len()
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sounds::{Aspiration, Manner};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn symbols(set: &BTreeSet<PositionedPhoneme>) -> Vec<&str> {
        set.iter().map(|p| p.symbol()).sorted().collect()
    }

    #[test]
    fn t_builtin_inventory() {
        init();
        let mc = middle_chinese();
        assert_eq!(mc.initials().len(), 37);
        assert_eq!(mc.simple_initials().len(), 19);
        assert_eq!(mc.complex_initials().len(), 18);
        assert_eq!(mc.nuclei().len(), 8);
        assert_eq!(symbols(mc.medials()), vec!["j", "w", "ɨ"]);
        // Zero coda plus j w m n ŋ p t k.
        assert_eq!(mc.codas().len(), 9);
        assert!(mc.codas().contains(&PositionedPhoneme::zero()));
    }

    #[test]
    fn t_simple_and_complex_cover_initials() {
        let mc = middle_chinese();
        let union: BTreeSet<_> = mc
            .simple_initials()
            .union(&mc.complex_initials())
            .cloned()
            .collect();
        assert_eq!(&union, mc.initials());
        assert!(mc.simple_initials().is_disjoint(&mc.complex_initials()));
    }

    #[test]
    fn t_symbol_table() {
        let mc = middle_chinese();
        for symbol in ["ʈʰ", "dʐ", "ɕ", "tsʰ", "ŋ", "ʔ", "x", "ɣ", "æ"] {
            assert!(mc.phoneme(symbol).is_some(), "{} missing", symbol);
        }
        let trh = mc.phoneme("ʈʰ").unwrap().as_consonant().unwrap();
        assert_eq!(trh.place(), Place::Retroflex);
        assert_eq!(trh.aspiration(), Aspiration::Positive);
        assert!(mc.phoneme("ʈʂ").is_some());
        let m = mc.phoneme("m").unwrap().as_consonant().unwrap();
        assert!(!m.is_voiced());
        assert!(!mc.phoneme("u").unwrap().as_vowel().unwrap().is_rounded());
    }

    #[test]
    fn t_retroflex_affricate_spellings() {
        let mc = middle_chinese();
        for (spelling, symbol) in [("ʈʂ", "tʂ"), ("ʈʂʰ", "tʂʰ"), ("ɖʐ", "dʐ")] {
            assert_eq!(mc.phoneme(spelling), mc.phoneme(symbol));
            assert_eq!(mc.lookup_by_symbol(spelling), mc.lookup_by_symbol(symbol));
            assert_eq!(mc.lookup_by_symbol(spelling).len(), 1);
        }
        let tsr = mc.phoneme("ʈʂ").unwrap();
        assert_eq!(tsr.symbol(), "tʂ");
        assert_eq!(InitialClass::of(tsr), InitialClass::TSr);
        assert_ne!(mc.phoneme("ʈʂ"), mc.phoneme("ts"));
    }

    #[test]
    fn t_glide_shares_phoneme_with_initial() {
        let mc = middle_chinese();
        let y = mc.phoneme("y").unwrap();
        let j = mc.phoneme("j").unwrap();
        assert_eq!(y, j);
        assert_eq!(
            mc.roles_of(j),
            Roles::INITIAL.with(Role::Medial).with(Role::Coda)
        );
        assert_eq!(mc.lookup_by_symbol("y").len(), 1);
        assert_eq!(mc.lookup_by_symbol("j").len(), 1);
        assert_ne!(mc.lookup_by_symbol("y"), mc.lookup_by_symbol("j"));
    }

    #[test]
    fn t_classes_partition_initials() {
        let mc = middle_chinese();
        let classes = mc.classes();
        assert_eq!(classes.len(), 7);
        let mut seen = BTreeSet::new();
        for members in classes.values() {
            for m in members {
                assert!(seen.insert(m.clone()), "{} in two classes", m);
            }
        }
        assert_eq!(&seen, mc.initials());
        assert_eq!(symbols(&classes[&InitialClass::P]), vec!["b", "m", "p", "pʰ"]);
        assert_eq!(symbols(&classes[&InitialClass::T]), vec!["d", "l", "n", "t", "tʰ"]);
        assert_eq!(classes[&InitialClass::K].len(), 7);
        assert_eq!(classes[&InitialClass::TSy].len(), 7);
        assert_eq!(mc.class(InitialClass::TSr), classes[&InitialClass::TSr]);
    }

    #[test]
    fn t_register_idempotent() {
        let mc = middle_chinese();
        let f = Phoneme::from(Consonant::new(Place::LabioDental, Manner::Fricative, false, "f"));
        let once = mc.extended(|r| {
            assert!(r.register(f.clone(), Roles::INITIAL));
        });
        let twice = once.extended(|r| {
            assert!(!r.register(f.clone(), Roles::INITIAL));
        });
        assert_eq!(once.initials(), twice.initials());
        assert_eq!(once.lookup_by_symbol("f"), twice.lookup_by_symbol("f"));
        assert_eq!(once.initials().len(), mc.initials().len() + 1);
        assert!(!mc.is_initial(&f));
        assert_eq!(once.initial_kind(&f), Some(InitialKind::Simple));
        assert_eq!(InitialClass::of(&f), InitialClass::P);
    }

    #[test]
    fn t_register_merges_roles() {
        let mc = middle_chinese();
        let p = mc.phoneme("p").unwrap().clone();
        let again = mc.extended(|r| {
            assert!(!r.register(p.clone(), Roles::INITIAL));
        });
        assert_eq!(again.initials().len(), 37);
        assert_eq!(again.class(InitialClass::P).len(), 4);
        assert_eq!(again.lookup_by_symbol("p").len(), 1);

        let as_medial = mc.extended(|r| {
            assert!(r.register(p.clone(), Roles::MEDIAL));
        });
        let merged = Roles::INITIAL.with(Role::Medial).with(Role::Coda);
        assert_eq!(as_medial.initials().len(), 37);
        assert_eq!(as_medial.codas().len(), mc.codas().len());
        assert_eq!(as_medial.medials().len(), mc.medials().len() + 1);
        assert_eq!(as_medial.classes()[&InitialClass::P].len(), 4);
        assert_eq!(
            as_medial.lookup_by_symbol("p"),
            [PositionedPhoneme::new(p.clone(), merged)].into_iter().collect()
        );
        assert_eq!(as_medial.positioned(Role::Initial, &p).map(|e| e.roles()), Some(merged));
        assert_eq!(as_medial.roles_of(&p), merged);
        assert_eq!(as_medial.initial_kind(&p), Some(InitialKind::Simple));

        // finals follow the merged nucleus entry
        let a = mc.phoneme("a").unwrap().clone();
        let vowel_initial = mc.extended(|r| {
            assert!(r.register(a.clone(), Roles::INITIAL));
        });
        assert_eq!(vowel_initial.nuclei().len(), 8);
        assert_eq!(vowel_initial.finals().len(), mc.finals().len());
        assert!(vowel_initial
            .finals()
            .iter()
            .all(|f| vowel_initial.nuclei().contains(&f.nucleus)));
    }

    #[test]
    fn t_register_empty_roles_is_noop() {
        let mut registry = Registry::new(RegistryConfig::default());
        let a = middle_chinese().phoneme("a").unwrap().clone();
        assert!(!registry.register(a.clone(), Roles::NONE));
        assert!(registry.lookup_by_symbol("a").is_empty());
        assert!(registry.register(a, Roles::NUCLEUS));
        // Open syllable with the zero coda.
        assert_eq!(registry.finals().len(), 1);
    }

    #[test]
    fn t_register_rebuilds_finals() {
        let mc = middle_chinese();
        let before = mc.finals().len();
        let schwa = Phoneme::from(Vowel::new(
            crate::sounds::Height::Mid,
            crate::sounds::Backness::Central,
            false,
            crate::sounds::Length::Short,
            "ə",
        ));
        let extended = mc.extended(|r| {
            r.register(schwa.clone(), Roles::NUCLEUS);
        });
        assert!(extended.finals().len() > before);
        assert_eq!(mc.finals().len(), before);
    }

    #[test]
    fn t_register_initial_kind() {
        let mc = middle_chinese();
        let g = mc.phoneme("g").unwrap().clone();
        assert_eq!(mc.initial_kind(&g), Some(InitialKind::Complex));
        let moved = mc.extended(|r| {
            assert!(r.register_initial(g.clone(), InitialKind::Simple));
            assert!(!r.register_initial(g.clone(), InitialKind::Simple));
        });
        assert_eq!(moved.initial_kind(&g), Some(InitialKind::Simple));
        assert_eq!(moved.initials(), mc.initials());
        assert_eq!(mc.initial_kind(mc.phoneme("a").unwrap()), None);
    }

    #[test]
    fn t_zero_is_distinct() {
        let mc = middle_chinese();
        let zero = PositionedPhoneme::zero();
        assert!(zero.is_zero());
        assert!(zero.roles().is_empty());
        assert!(mc.inventory().iter().filter(|p| !p.is_zero()).all(|p| *p != zero));
        assert_eq!(zero.to_string(), "∅");
    }

    #[test]
    fn t_roles_parse() {
        assert_eq!(
            Roles::try_from("initial final").unwrap(),
            Roles::INITIAL.union(Roles::CODA)
        );
        assert_eq!(Roles::try_from("").unwrap(), Roles::NONE);
        assert!(Roles::try_from("onset").is_err());
        assert_eq!(Roles::MEDIAL.union(Roles::CODA).to_string(), "medial final");
    }

    #[test]
    fn t_laryngeals_unified() {
        init();
        let config = RegistryConfig::default().with_laryngeals(LaryngealInterpretation::Unified);
        let unified = Registry::middle_chinese(config).unwrap();
        let x = unified.lookup_by_symbol("x");
        assert_eq!(unified.lookup_by_symbol("ɣ"), x);
        assert_eq!(unified.initials().len(), middle_chinese().initials().len() - 1);
        assert_ne!(
            middle_chinese().lookup_by_symbol("ɣ"),
            middle_chinese().lookup_by_symbol("x")
        );
    }

    #[test]
    fn t_chongniu_tables() {
        let medial = middle_chinese();
        let vowel = Registry::middle_chinese(
            RegistryConfig::default().with_chongniu(ChongniuInterpretation::VowelBased),
        )
        .unwrap();
        let j = medial.phoneme("j").unwrap();
        let w = medial.phoneme("w").unwrap();
        let barred_i = medial.phoneme("ɨ").unwrap();
        assert!(medial.is_excluded(j, barred_i));
        assert!(!vowel.is_excluded(j, barred_i));
        assert!(vowel.is_excluded(w, barred_i));
        assert!(medial.is_medial(barred_i));
        assert!(!vowel.is_medial(barred_i));
        assert!(medial
            .finals()
            .iter()
            .all(|f| !(f.medial.as_ref().map(|m| m.symbol()) == Some("j") && f.nucleus.symbol() == "ɨ")));
    }

    #[test]
    fn t_extra_exclusions() {
        let config = RegistryConfig::default()
            .with_exclusion("w", "i")
            .with_exclusion("q", "i");
        let registry = Registry::middle_chinese(config).unwrap();
        let w = registry.phoneme("w").unwrap();
        let i = registry.phoneme("i").unwrap();
        assert!(registry.is_excluded(w, i));
        assert_eq!(registry.exclusions().count(), 4);
    }

    #[test]
    fn t_bad_tables() {
        let err = RegistryBuilder::default()
            .position_table("symbol,roles,kind\nq,initial,simple")
            .build()
            .unwrap_err();
        assert_eq!(err, InvalidFeatureError::UnknownSymbol("q".to_string()));
        let err = RegistryBuilder::default()
            .position_table("symbol,roles,kind\np,onset,simple")
            .build()
            .unwrap_err();
        assert!(matches!(err, InvalidFeatureError::UnknownValue { feature: "role", .. }));
        let err = RegistryBuilder::default()
            .vowel_table("symbol,height,backness,roundedness\na,low,front,unrounded")
            .build()
            .unwrap_err();
        assert!(matches!(err, InvalidFeatureError::UnknownValue { feature: "height", .. }));
    }

    #[test]
    fn t_shared_registry_is_sync() {
        fn assert_sync<T: Send + Sync>(_: &T) {}
        assert_sync(middle_chinese());
        let handles = (0..4)
            .map(|_| std::thread::spawn(|| middle_chinese().initials().len()))
            .collect::<Vec<_>>();
        for h in handles {
            assert_eq!(h.join().unwrap(), 37);
        }
    }
}
