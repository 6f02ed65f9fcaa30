use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use super::error::InvalidCombination;

/// A skill whose evaluation may be altered by mods.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SkillKind {
    Aim,
    Speed,
    Flashlight,
}

/// The way a mod alters the evaluation of a single skill.
///
/// Changes to the map attributes or the clock rate are not listed here since
/// they reach every skill through the difficulty objects.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SkillEffect {
    /// The skill only contributes to the star rating with this mod.
    Enable,
    /// Objects fade in quicker and fade out before they are hit, which the
    /// skill's strain takes into account.
    FadeOut,
    /// The skill's rating is raised to this power.
    Exponent(f64),
    /// The skill's rating is multiplied by this factor.
    Factor(f64),
}

/// Static description of a single mod.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GameModInfo {
    /// Two-letter acronym, e.g. `"HD"`.
    pub acronym: &'static str,
    /// The mod's legacy bit value.
    pub bits: u32,
    /// Bits of all mods that may not be combined with this one.
    pub incompatible: u32,
    effects: &'static [(SkillKind, SkillEffect)],
}

impl GameModInfo {
    const fn new(
        acronym: &'static str,
        bits: u32,
        incompatible: u32,
        effects: &'static [(SkillKind, SkillEffect)],
    ) -> Self {
        Self {
            acronym,
            bits,
            incompatible,
            effects,
        }
    }

    /// Whether this mod alters the evaluation of the given skill.
    pub fn affects(&self, skill: SkillKind) -> bool {
        self.effects_on(skill).next().is_some()
    }

    /// The effects of this mod on the given skill.
    pub fn effects_on(&self, skill: SkillKind) -> impl Iterator<Item = SkillEffect> + '_ {
        self.effects
            .iter()
            .filter(move |(kind, _)| *kind == skill)
            .map(|(_, effect)| *effect)
    }
}

const NF: u32 = 1 << 0;
const EZ: u32 = 1 << 1;
const TD: u32 = 1 << 2;
const HD: u32 = 1 << 3;
const HR: u32 = 1 << 4;
const SD: u32 = 1 << 5;
const DT: u32 = 1 << 6;
const RX: u32 = 1 << 7;
const HT: u32 = 1 << 8;
const NC: u32 = 1 << 9;
const FL: u32 = 1 << 10;
const SO: u32 = 1 << 12;
const AP: u32 = 1 << 13;
const PF: u32 = 1 << 14;

const HIDDEN_EFFECTS: &[(SkillKind, SkillEffect)] =
    &[(SkillKind::Flashlight, SkillEffect::FadeOut)];

const FLASHLIGHT_EFFECTS: &[(SkillKind, SkillEffect)] =
    &[(SkillKind::Flashlight, SkillEffect::Enable)];

const TOUCH_DEVICE_EFFECTS: &[(SkillKind, SkillEffect)] = &[
    (SkillKind::Aim, SkillEffect::Exponent(0.8)),
    (SkillKind::Flashlight, SkillEffect::Exponent(0.8)),
];

const RELAX_EFFECTS: &[(SkillKind, SkillEffect)] = &[
    (SkillKind::Aim, SkillEffect::Factor(0.9)),
    (SkillKind::Speed, SkillEffect::Factor(0.0)),
    (SkillKind::Flashlight, SkillEffect::Factor(0.7)),
];

/// Every mod that can be evaluated, in display order.
///
/// Incompatibilities are listed on both sides of a pair. Rating effects are
/// applied in table order so `TD` comes before `RX`.
pub static GAME_MODS: [GameModInfo; 14] = [
    GameModInfo::new("EZ", EZ, HR, &[]),
    GameModInfo::new("NF", NF, SD | PF | RX | AP, &[]),
    GameModInfo::new("HT", HT, DT | NC, &[]),
    GameModInfo::new("HR", HR, EZ, &[]),
    GameModInfo::new("SD", SD, NF | PF | RX | AP, &[]),
    GameModInfo::new("PF", PF, NF | SD | RX | AP, &[]),
    GameModInfo::new("DT", DT, HT, &[]),
    GameModInfo::new("NC", NC, HT, &[]),
    GameModInfo::new("HD", HD, 0, HIDDEN_EFFECTS),
    GameModInfo::new("FL", FL, 0, FLASHLIGHT_EFFECTS),
    GameModInfo::new("TD", TD, 0, TOUCH_DEVICE_EFFECTS),
    GameModInfo::new("RX", RX, NF | SD | PF | AP, RELAX_EFFECTS),
    GameModInfo::new("AP", AP, NF | SD | PF | RX | SO, &[]),
    GameModInfo::new("SO", SO, AP, &[]),
];

const KNOWN_BITS: u32 = NF | EZ | TD | HD | HR | SD | DT | RX | HT | NC | FL | SO | AP | PF;

/// A set of mods, stored as legacy bit values.
///
/// The set is not validated on construction. Calculations call
/// [`GameMods::check`] and fail with [`InvalidCombination`] before anything
/// is evaluated.
///
/// # Example
///
/// ```
/// use strain_pp::GameMods;
///
/// let mods: GameMods = "HDDT".parse().unwrap();
///
/// assert!(mods.hd() && mods.dt());
/// assert_eq!(mods, GameMods::from(8 + 64));
/// assert_eq!(mods.clock_rate(), 1.5);
/// assert!("EZHR".parse::<GameMods>().is_err());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct GameMods {
    bits: u32,
}

macro_rules! impl_mods_fn {
    ( $( #[$meta:meta] )* $fn_name:ident, $bits:expr ) => {
        $( #[$meta] )*
        pub const fn $fn_name(self) -> bool {
            self.bits & ($bits) != 0
        }
    };
}

impl GameMods {
    /// No mods.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Create mods from legacy bit values without validating them.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// The legacy bit value of the mods.
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Whether no mod is set.
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    impl_mods_fn!(
        /// NoFail
        nf,
        NF
    );
    impl_mods_fn!(
        /// Easy
        ez,
        EZ
    );
    impl_mods_fn!(
        /// TouchDevice
        td,
        TD
    );
    impl_mods_fn!(
        /// Hidden
        hd,
        HD
    );
    impl_mods_fn!(
        /// HardRock
        hr,
        HR
    );
    impl_mods_fn!(
        /// DoubleTime or Nightcore
        dt,
        DT | NC
    );
    impl_mods_fn!(
        /// Relax
        rx,
        RX
    );
    impl_mods_fn!(
        /// HalfTime
        ht,
        HT
    );
    impl_mods_fn!(
        /// Flashlight
        fl,
        FL
    );
    impl_mods_fn!(
        /// SpunOut
        so,
        SO
    );
    impl_mods_fn!(
        /// Autopilot
        ap,
        AP
    );

    /// The clock rate implied by the mods.
    pub const fn clock_rate(self) -> f64 {
        if self.dt() {
            1.5
        } else if self.ht() {
            0.75
        } else {
            1.0
        }
    }

    /// Multiplier for AR, OD, and HP.
    pub const fn od_ar_hp_multiplier(self) -> f64 {
        if self.hr() {
            1.4
        } else if self.ez() {
            0.5
        } else {
            1.0
        }
    }

    /// Iterate over the descriptions of all contained mods.
    pub fn iter(self) -> impl Iterator<Item = &'static GameModInfo> {
        GAME_MODS
            .iter()
            .filter(move |info| self.bits & info.bits != 0)
    }

    /// Whether any contained mod alters the evaluation of the given skill.
    pub fn affects(self, skill: SkillKind) -> bool {
        self.iter().any(|info| info.affects(skill))
    }

    /// Whether any contained mod has the given effect on the skill.
    pub fn has_effect(self, skill: SkillKind, effect: SkillEffect) -> bool {
        self.iter()
            .flat_map(|info| info.effects_on(skill))
            .any(|contained| contained == effect)
    }

    /// Apply the rating effects of all contained mods on a skill's rating.
    pub fn adjust_rating(self, skill: SkillKind, rating: f64) -> f64 {
        self.iter()
            .flat_map(|info| info.effects_on(skill))
            .fold(rating, |rating, effect| match effect {
                SkillEffect::Exponent(exp) => rating.powf(exp),
                SkillEffect::Factor(factor) => rating * factor,
                SkillEffect::Enable | SkillEffect::FadeOut => rating,
            })
    }

    /// Whether the mods can be evaluated together.
    pub fn is_legal(self) -> bool {
        self.check().is_ok()
    }

    /// Ensure that all bits are known and no two mods exclude each other.
    ///
    /// `DT` and `NC` may appear together since the legacy encoding of `NC`
    /// includes the `DT` bit.
    pub fn check(self) -> Result<(), InvalidCombination> {
        let unknown = self.bits & !KNOWN_BITS;

        if unknown != 0 {
            return Err(InvalidCombination::UnknownBits(unknown));
        }

        for info in self.iter() {
            let conflict = self.bits & info.incompatible;

            if conflict != 0 {
                let other = GAME_MODS
                    .iter()
                    .find(|other| other.bits & conflict != 0)
                    .map_or("??", |other| other.acronym);

                return Err(InvalidCombination::Incompatible(info.acronym, other));
            }
        }

        Ok(())
    }

    /// Parse mods from concatenated acronyms, e.g. `"HDHR"`.
    ///
    /// Acronyms are case-insensitive and may be separated by whitespace,
    /// commas, or `+`. `"NM"` denotes no mods. Unknown acronyms, duplicates,
    /// and incompatible pairs are rejected.
    pub fn from_acronyms(s: &str) -> Result<Self, InvalidCombination> {
        let chars: Vec<char> = s
            .chars()
            .filter(|c| !(c.is_whitespace() || *c == ',' || *c == '+'))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let mut bits = 0;

        for chunk in chars.chunks(2) {
            let acronym: String = chunk.iter().collect();

            if acronym == "NM" {
                continue;
            }

            let info = GAME_MODS
                .iter()
                .find(|info| info.acronym == acronym)
                .ok_or(InvalidCombination::UnknownAcronym(acronym))?;

            if bits & info.bits != 0 {
                return Err(InvalidCombination::Duplicate(info.acronym));
            }

            bits |= info.bits;
        }

        let mods = Self::from_bits(bits);
        mods.check()?;

        Ok(mods)
    }
}

impl From<u32> for GameMods {
    fn from(bits: u32) -> Self {
        Self::from_bits(bits)
    }
}

impl FromStr for GameMods {
    type Err = InvalidCombination;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_acronyms(s)
    }
}

impl Display for GameMods {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.is_empty() {
            return f.write_str("NM");
        }

        let nightcore = self.bits & NC != 0;

        for info in self.iter() {
            // legacy NC carries the DT bit
            if nightcore && info.bits == DT {
                continue;
            }

            f.write_str(info.acronym)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incompatibilities_are_symmetric() {
        for a in GAME_MODS.iter() {
            for b in GAME_MODS.iter() {
                assert_eq!(
                    a.incompatible & b.bits != 0,
                    b.incompatible & a.bits != 0,
                    "{} <-> {}",
                    a.acronym,
                    b.acronym
                );
            }
        }
    }

    #[test]
    fn parse_acronyms() {
        let mods: GameMods = "hd, dt".parse().unwrap();
        assert_eq!(mods.bits(), HD | DT);

        let mods: GameMods = "NM".parse().unwrap();
        assert!(mods.is_empty());

        assert_eq!(
            "HDXY".parse::<GameMods>(),
            Err(InvalidCombination::UnknownAcronym("XY".to_owned()))
        );
        assert_eq!(
            "HDHD".parse::<GameMods>(),
            Err(InvalidCombination::Duplicate("HD"))
        );
        assert_eq!(
            "DTHT".parse::<GameMods>(),
            Err(InvalidCombination::Incompatible("HT", "DT"))
        );
    }

    #[test]
    fn legality() {
        assert!(GameMods::new().is_legal());
        assert!(GameMods::from(HD | HR | DT | FL).is_legal());
        assert!(GameMods::from(DT | NC).is_legal());
        assert!(!GameMods::from(EZ | HR).is_legal());
        assert!(!GameMods::from(RX | AP).is_legal());
        assert!(!GameMods::from(AP | SO).is_legal());
        assert!(!GameMods::from(NF | SD).is_legal());
        assert_eq!(
            GameMods::from(1 << 30).check(),
            Err(InvalidCombination::UnknownBits(1 << 30))
        );
    }

    #[test]
    fn capabilities() {
        let mods = GameMods::from(HD | FL);
        assert!(mods.affects(SkillKind::Flashlight));
        assert!(!mods.affects(SkillKind::Aim));
        assert!(mods.has_effect(SkillKind::Flashlight, SkillEffect::FadeOut));
        assert!(mods.has_effect(SkillKind::Flashlight, SkillEffect::Enable));

        let mods = GameMods::from(HD);
        assert!(!mods.has_effect(SkillKind::Flashlight, SkillEffect::Enable));

        // rate changes reach skills through the difficulty objects
        assert!(!GameMods::from(DT | HR).affects(SkillKind::Aim));
        assert!(GameMods::from(RX).affects(SkillKind::Speed));
        assert!(!GameMods::from(NF | SO).affects(SkillKind::Speed));

        assert!((GameMods::from(NC).clock_rate() - 1.5).abs() < f64::EPSILON);
        assert!((GameMods::from(HT).clock_rate() - 0.75).abs() < f64::EPSILON);
        assert!((GameMods::from(EZ).od_ar_hp_multiplier() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rating_adjustments() {
        let rating = 2.5_f64;

        let adjusted = GameMods::from(TD | RX).adjust_rating(SkillKind::Aim, rating);
        assert!((adjusted - rating.powf(0.8) * 0.9).abs() < 1e-12);

        let speed = GameMods::from(RX).adjust_rating(SkillKind::Speed, rating);
        assert!(speed.abs() < f64::EPSILON);

        let untouched = GameMods::from(HD | DT | FL).adjust_rating(SkillKind::Aim, rating);
        assert!((untouched - rating).abs() < f64::EPSILON);
    }

    #[test]
    fn display() {
        assert_eq!(GameMods::new().to_string(), "NM");
        assert_eq!(GameMods::from(HD | HR | DT).to_string(), "HRDTHD");
        assert_eq!(GameMods::from(DT | NC | HD).to_string(), "NCHD");
    }
}
