//! Ordered match rules between one name and one filename.

use crate::config::MatchConfig;
use crate::mapping::SubstitutionMap;
use crate::normalize::{file_stem, fold_case, shorten};
use crate::similarity::similarity;
use crate::variants::generate_variants;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which rule produced a match, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchRule {
    #[serde(rename = "Full FIO exact")]
    FullExact,
    #[serde(rename = "Full FIO substitution (combination)")]
    FullSubstitution,
    #[serde(rename = "Short FIO exact")]
    ShortExact,
    #[serde(rename = "Short FIO substitution (combination)")]
    ShortSubstitution,
}

impl MatchRule {
    pub fn label(self) -> &'static str {
        match self {
            Self::FullExact => "Full FIO exact",
            Self::FullSubstitution => "Full FIO substitution (combination)",
            Self::ShortExact => "Short FIO exact",
            Self::ShortSubstitution => "Short FIO substitution (combination)",
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A successful rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub rule: MatchRule,
    /// Similarity between `variant` and the filename stem.
    pub similarity: f64,
    /// The string form that was found in the stem.
    pub variant: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Found(RuleMatch),
    NotFound,
}

/// A string to look for, kept with its folded form.
#[derive(Debug, Clone)]
struct Probe {
    text: String,
    folded: String,
}

impl Probe {
    fn new(text: String) -> Self {
        let folded = fold_case(&text);
        Self { text, folded }
    }
}

/// The four probes of one name, computed once and reused for every file.
#[derive(Debug, Clone)]
pub struct PreparedName {
    full: Probe,
    full_variants: Vec<Probe>,
    short: Probe,
    short_variants: Vec<Probe>,
}

impl PreparedName {
    pub fn full(&self) -> &str {
        &self.full.text
    }

    pub fn short(&self) -> &str {
        &self.short.text
    }

    /// Applies the rules, in order, to `file_name`.
    pub fn match_file(&self, file_name: &str) -> MatchOutcome {
        let stem = file_stem(file_name);
        let folded_stem = fold_case(stem);

        let stages = [
            (MatchRule::FullExact, std::slice::from_ref(&self.full)),
            (MatchRule::FullSubstitution, self.full_variants.as_slice()),
            (MatchRule::ShortExact, std::slice::from_ref(&self.short)),
            (MatchRule::ShortSubstitution, self.short_variants.as_slice()),
        ];
        for (rule, probes) in stages {
            if let Some(probe) = probes.iter().find(|p| folded_stem.contains(&p.folded)) {
                return MatchOutcome::Found(RuleMatch {
                    rule,
                    similarity: similarity(&probe.text, stem),
                    variant: probe.text.clone(),
                });
            }
        }
        MatchOutcome::NotFound
    }
}

/// Match engine configured with a substitution table and a combination cap.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    mapping: SubstitutionMap,
    max_subs: usize,
}

impl MatchEngine {
    pub fn new(mapping: SubstitutionMap, max_subs: usize) -> Self {
        Self { mapping, max_subs }
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.mapping.clone(), config.max_subs)
    }

    pub fn prepare(&self, fio: &str) -> PreparedName {
        let short = shorten(fio);
        PreparedName {
            full: Probe::new(fio.to_string()),
            full_variants: self.variant_probes(fio),
            short_variants: self.variant_probes(&short),
            short: Probe::new(short),
        }
    }

    /// Matches a single name against a single filename.
    pub fn match_file(&self, fio: &str, file_name: &str) -> MatchOutcome {
        self.prepare(fio).match_file(file_name)
    }

    fn variant_probes(&self, source: &str) -> Vec<Probe> {
        generate_variants(source, &self.mapping, self.max_subs)
            .into_iter()
            .map(Probe::new)
            .collect()
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::from_config(&MatchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> MatchEngine {
        MatchEngine::default()
    }

    fn found(outcome: MatchOutcome) -> RuleMatch {
        match outcome {
            MatchOutcome::Found(m) => m,
            MatchOutcome::NotFound => panic!("expected a match"),
        }
    }

    #[test]
    fn test_full_exact() {
        let m = found(engine().match_file("Иванов Иван Иванович", "иванов иван иванович.jpg"));
        assert_eq!(m.rule, MatchRule::FullExact);
        assert_eq!(m.variant, "Иванов Иван Иванович");
        assert!((m.similarity - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_exact_inside_longer_stem() {
        let m = found(engine().match_file("Болатов Асан", "01_Болатов Асан_2023.png"));
        assert_eq!(m.rule, MatchRule::FullExact);
        assert!(m.similarity < 100.0);
    }

    #[test]
    fn test_extension_is_not_part_of_stem() {
        let outcome = engine().match_file("jpg", "photo.jpg");
        assert_eq!(outcome, MatchOutcome::NotFound);
    }

    #[test]
    fn test_full_substitution() {
        let m = found(engine().match_file("Әсет Қуанов", "Асет Куанов.jpg"));
        assert_eq!(m.rule, MatchRule::FullSubstitution);
        assert_eq!(m.variant, "Асет Куанов");
        assert!((m.similarity - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_substitution_variant() {
        let m = found(engine().match_file("Әсет Қуанов", "Асет Қуанов.jpg"));
        assert_eq!(m.rule, MatchRule::FullSubstitution);
        assert_eq!(m.variant, "Асет Қуанов");
    }

    #[test]
    fn test_short_exact() {
        let m = found(engine().match_file("Иванов Иван Иванович", "Иванов Иван.jpeg"));
        assert_eq!(m.rule, MatchRule::ShortExact);
        assert_eq!(m.variant, "Иванов Иван");
    }

    #[test]
    fn test_short_substitution() {
        let m = found(engine().match_file("Әсетов Әсет Қайратұлы", "асетов асет.png"));
        assert_eq!(m.rule, MatchRule::ShortSubstitution);
        assert_eq!(m.variant, "Асетов Асет");
        assert!((m.similarity - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_rule_takes_precedence_over_short_variant() {
        // The stem holds the full name and a substituted short name.
        let m = found(engine().match_file("Әсетов Әсет Қайратұлы", "Асетов Асет + Әсетов Әсет Қайратұлы.jpg"));
        assert_eq!(m.rule, MatchRule::FullExact);
        assert_eq!(m.variant, "Әсетов Әсет Қайратұлы");
    }

    #[test]
    fn test_substring_only_no_reordering() {
        let outcome = engine().match_file("Асан Болатов", "bolatov_asan.jpg");
        assert_eq!(outcome, MatchOutcome::NotFound);
        let outcome = engine().match_file("Асан Болатов", "Болатов Асан.jpg");
        assert_eq!(outcome, MatchOutcome::NotFound);
    }

    #[test]
    fn test_similarity_uses_matched_variant() {
        let m = found(engine().match_file("Әсет Қуанов", "Асет Куанов 2.jpg"));
        assert!((m.similarity - similarity("Асет Куанов", "Асет Куанов 2")).abs() < 1e-9);
    }

    #[test]
    fn test_max_subs_one_blocks_double_substitution() {
        let narrow = MatchEngine::new(SubstitutionMap::kazakh(), 1);
        assert_eq!(narrow.match_file("Әсет Қуанов", "Асет Куанов.jpg"), MatchOutcome::NotFound);
    }

    #[test]
    fn test_unrelated_file_not_found() {
        let outcome = engine().match_file("Иванов Иван", "Петров Пётр.jpg");
        assert_eq!(outcome, MatchOutcome::NotFound);
    }

    #[test]
    fn test_prepared_name_probes() {
        let prepared = engine().prepare("Әсетов Әсет Қайратұлы");
        assert_eq!(prepared.full(), "Әсетов Әсет Қайратұлы");
        assert_eq!(prepared.short(), "Әсетов Әсет");
    }

    #[test]
    fn test_rule_labels() {
        assert_eq!(MatchRule::FullExact.to_string(), "Full FIO exact");
        assert_eq!(
            MatchRule::ShortSubstitution.label(),
            "Short FIO substitution (combination)"
        );
        let json = serde_json::to_string(&MatchRule::FullSubstitution).unwrap();
        assert_eq!(json, "\"Full FIO substitution (combination)\"");
    }
}
