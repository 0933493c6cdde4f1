/// Bounds on the work a formula may cause.
///
/// Stats are cheap for any formula and ignore these.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Limits {
    /// Distributions of formulas rolling more dice than this are refused.
    pub max_dice: usize,
    /// Largest number of (outcome, face) or (outcome, outcome) pairs a single
    /// fold or combination step may visit.
    pub max_outcomes: usize,
    /// Rolls of formulas with more dice than this are refused.
    pub max_rolled_dice: usize,
}

impl Limits {
    pub const DEFAULT_MAX_DICE: usize = 8;
    pub const DEFAULT_MAX_OUTCOMES: usize = 1_000_000;
    pub const DEFAULT_MAX_ROLLED_DICE: usize = 1_000_000;

    pub const fn new(max_dice: usize, max_outcomes: usize) -> Self {
        Self {
            max_dice,
            max_outcomes,
            max_rolled_dice: Self::DEFAULT_MAX_ROLLED_DICE,
        }
    }

    pub const fn with_max_rolled_dice(self, max_rolled_dice: usize) -> Self {
        Self {
            max_rolled_dice,
            ..self
        }
    }

    /// Reads limits from TOML; missing keys keep their defaults.
    ///
    /// ```toml
    /// max_dice = 10
    /// max_outcomes = 500000
    /// max_rolled_dice = 10000
    /// ```
    ///
    /// # Errors
    /// Returns the TOML error for malformed input or mistyped keys.
    #[cfg(feature = "config")]
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DICE, Self::DEFAULT_MAX_OUTCOMES)
    }
}
