//! Deterministic prompt-of-the-day rotation.
//!
//! A [`PromptSelector`] owns a fixed, non-empty list and maps each calendar
//! day to one entry by day-of-year. The same day always yields the same
//! prompt, and the list wraps when it is shorter than the year.

use serde::{Deserialize, Serialize};

use crate::date::DateKey;
use crate::error::{ConfigError, ValidationError};

/// Immutable, non-empty prompt list.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSelector<T> {
    prompts: Vec<T>,
}

impl<T> PromptSelector<T> {
    /// Build a selector; an empty list is a configuration error.
    pub fn new(name: &str, prompts: Vec<T>) -> Result<Self, ConfigError> {
        if prompts.is_empty() {
            return Err(ConfigError::EmptyPromptList(name.to_string()));
        }
        Ok(Self { prompts })
    }

    /// Index into the list for `date`.
    ///
    /// January 1st is day 1 and therefore lands on index 1, not 0.
    pub fn index_for(&self, date: DateKey) -> usize {
        date.day_of_year() as usize % self.prompts.len()
    }

    pub fn select(&self, date: DateKey) -> &T {
        &self.prompts[self.index_for(date)]
    }

    pub fn select_str(&self, date: &str) -> Result<&T, ValidationError> {
        Ok(self.select(DateKey::parse(date)?))
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Always false; kept alongside `len` for clippy.
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn prompts(&self) -> &[T] {
        &self.prompts
    }
}

/// Category of an evening reflection prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionKind {
    Emotional,
    Shadow,
    Rationality,
    Role,
    Grandiosity,
    Envy,
    Mortality,
    Conformity,
    Power,
    Mastery,
}

impl ReflectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReflectionKind::Emotional => "emotional",
            ReflectionKind::Shadow => "shadow",
            ReflectionKind::Rationality => "rationality",
            ReflectionKind::Role => "role",
            ReflectionKind::Grandiosity => "grandiosity",
            ReflectionKind::Envy => "envy",
            ReflectionKind::Mortality => "mortality",
            ReflectionKind::Conformity => "conformity",
            ReflectionKind::Power => "power",
            ReflectionKind::Mastery => "mastery",
        }
    }
}

/// Structured reflection prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionPrompt {
    pub kind: ReflectionKind,
    pub text: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law: Option<String>,
}

impl ReflectionPrompt {
    fn new(kind: ReflectionKind, text: &str, tag: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
            tag: tag.to_string(),
            law: None,
        }
    }

    fn with_law(mut self, law: &str) -> Self {
        self.law = Some(law.to_string());
        self
    }
}

pub const CREATIVE_PROMPTS: &[&str] = &[
    "What are you noticing today that you haven't noticed before?",
    "What wants to exist through you?",
    "Describe beauty you encountered today.",
    "What rule are you ready to break?",
    "What would you create if no one would ever see it?",
    "What does your intuition know that your mind hasn't admitted yet?",
    "What are you afraid to make?",
    "Where is nature showing you something right now?",
    "What's the most honest thing you could say today?",
    "What are you trying too hard at?",
    "What would feel effortless to create?",
    "What idea keeps returning to you?",
    "Describe a moment of aliveness from today.",
    "What is trying to be born through your work?",
    "What old idea are you still carrying that no longer serves the work?",
    "What would you make if you had no fear of failure?",
    "What constraints are secretly liberating you?",
    "What are you not saying in your work?",
];

/// Default creative prompts, owned.
pub fn default_creative_prompts() -> Vec<String> {
    CREATIVE_PROMPTS.iter().map(|p| p.to_string()).collect()
}

/// Default reflection prompts.
pub fn default_reflection_prompts() -> Vec<ReflectionPrompt> {
    use ReflectionKind::*;
    vec![
        ReflectionPrompt::new(
            Emotional,
            "What emotion drove most of my decisions today? What was underneath it?",
            "emotional-audit",
        ),
        ReflectionPrompt::new(
            Shadow,
            "What did I deflect, avoid, or project onto others today?",
            "shadow",
        ),
        ReflectionPrompt::new(
            Rationality,
            "Where did I let emotion masquerade as reason?",
            "rationality",
        ),
        ReflectionPrompt::new(
            Role,
            "What role did I play today: performer, victim, rescuer? Was it conscious?",
            "roles",
        ),
        ReflectionPrompt::new(
            Grandiosity,
            "Where did ego inflate my sense of importance today?",
            "grandiosity",
        ),
        ReflectionPrompt::new(
            Envy,
            "Was there a moment of envy today? What does it reveal about my deepest desires?",
            "envy",
        ),
        ReflectionPrompt::new(
            Mortality,
            "If this were my last month, would today's actions align with my deepest values?",
            "mortality",
        ),
        ReflectionPrompt::new(
            Conformity,
            "Where did I conform when I wanted to diverge? What held me back?",
            "conformity",
        ),
        ReflectionPrompt::new(
            Power,
            "Did I say more than necessary today? What would silence have accomplished?",
            "power",
        )
        .with_law("Law 4"),
        ReflectionPrompt::new(
            Power,
            "Who held the most power in my interactions today? What gave them that power?",
            "power",
        )
        .with_law("Law 1"),
        ReflectionPrompt::new(
            Mastery,
            "What would your future master self think of today's effort?",
            "mastery",
        ),
        ReflectionPrompt::new(
            Mastery,
            "Where did you resist the discomfort of learning?",
            "mastery",
        ),
        ReflectionPrompt::new(
            Mastery,
            "What feedback did you receive (explicitly or implicitly) today?",
            "mastery",
        ),
    ]
}

/// Both prompt rotations, built once at startup.
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    pub creative: PromptSelector<String>,
    pub reflection: PromptSelector<ReflectionPrompt>,
}

impl PromptCatalog {
    /// Build from optional overrides, falling back to the built-in lists.
    ///
    /// An override that is present but empty fails here rather than at
    /// selection time.
    pub fn from_overrides(
        creative: Option<Vec<String>>,
        reflection: Option<Vec<ReflectionPrompt>>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            creative: PromptSelector::new(
                "prompts.creative",
                creative.unwrap_or_else(default_creative_prompts),
            )?,
            reflection: PromptSelector::new(
                "prompts.reflection",
                reflection.unwrap_or_else(default_reflection_prompts),
            )?,
        })
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self {
            creative: PromptSelector {
                prompts: default_creative_prompts(),
            },
            reflection: PromptSelector {
                prompts: default_reflection_prompts(),
            },
        }
    }
}

/// Rotate a set of statements by day of month, as the dashboard does for
/// identity statements. `None` when there is nothing to show.
pub fn rotate_by_day_of_month<T>(items: &[T], date: DateKey) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    items.get(date.day_of_month() as usize % items.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn abc() -> PromptSelector<&'static str> {
        PromptSelector::new("test", vec!["A", "B", "C"]).unwrap()
    }

    #[test]
    fn january_first_maps_to_index_one() {
        let sel = abc();
        assert_eq!(sel.select_str("2024-01-01").unwrap(), &"B");
        assert_eq!(sel.select_str("2024-01-02").unwrap(), &"C");
        assert_eq!(sel.select_str("2024-01-03").unwrap(), &"A");
    }

    #[test]
    fn empty_list_fails_at_construction() {
        let err = PromptSelector::<String>::new("prompts.creative", Vec::new()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPromptList(ref n) if n == "prompts.creative"));
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(matches!(
            abc().select_str("Jan 1"),
            Err(ValidationError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn leap_day_366_wraps() {
        let sel = abc();
        // 366 % 3 == 0
        assert_eq!(sel.select_str("2024-12-31").unwrap(), &"A");
        // 365 % 3 == 2
        assert_eq!(sel.select_str("2023-12-31").unwrap(), &"C");
    }

    #[test]
    fn builtin_catalog_sizes() {
        let catalog = PromptCatalog::default();
        assert_eq!(catalog.creative.len(), 18);
        assert_eq!(catalog.reflection.len(), 13);
        let day = DateKey::from_ymd(2024, 1, 1).unwrap();
        assert_eq!(catalog.creative.select(day), CREATIVE_PROMPTS[1]);
        assert_eq!(catalog.reflection.select(day).tag, "shadow");
    }

    #[test]
    fn catalog_rejects_empty_override() {
        let err = PromptCatalog::from_overrides(None, Some(Vec::new())).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPromptList(ref n) if n == "prompts.reflection"));
    }

    #[test]
    fn catalog_uses_override() {
        let catalog =
            PromptCatalog::from_overrides(Some(vec!["only".to_string()]), None).unwrap();
        let day = DateKey::from_ymd(2025, 8, 19).unwrap();
        assert_eq!(catalog.creative.select(day), "only");
    }

    #[test]
    fn day_of_month_rotation() {
        let items = ["x", "y"];
        let day = DateKey::from_ymd(2024, 5, 3).unwrap();
        assert_eq!(rotate_by_day_of_month(&items, day), Some(&"y"));
        assert_eq!(rotate_by_day_of_month::<&str>(&[], day), None);
    }

    proptest! {
        #[test]
        fn selection_is_idempotent(ordinal in 1u32..=366, len in 1usize..40) {
            let list: Vec<usize> = (0..len).collect();
            let sel = PromptSelector::new("p", list).unwrap();
            let date = DateKey::from(chrono::NaiveDate::from_yo_opt(2024, ordinal).unwrap());
            prop_assert_eq!(sel.select(date), sel.select(date));
        }

        #[test]
        fn singleton_always_selected(days in 0i64..3000) {
            let sel = PromptSelector::new("p", vec!["only"]).unwrap();
            let date = DateKey::from_ymd(2020, 1, 1).unwrap().add_days(days);
            prop_assert_eq!(*sel.select(date), "only");
        }

        #[test]
        fn year_visits_every_index(len in 1usize..=365, year in 2000i32..2040) {
            let sel = PromptSelector::new("p", (0..len).collect::<Vec<_>>()).unwrap();
            let start = DateKey::from_ymd(year, 1, 1).unwrap();
            let days_in_year = if DateKey::from_ymd(year, 12, 31).unwrap().day_of_year() == 366 { 366 } else { 365 };
            let mut counts = vec![0usize; len];
            for offset in 0..days_in_year {
                counts[*sel.select(start.add_days(offset))] += 1;
            }
            let floor = 365 / len;
            prop_assert!(counts.iter().all(|c| *c >= floor));
        }
    }
}
