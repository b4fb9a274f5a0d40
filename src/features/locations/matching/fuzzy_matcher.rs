use std::collections::HashSet;
use std::sync::Arc;

use super::normalize::{normalize_region_name, NormalizedName};
use super::synonyms::SynonymTable;
use crate::features::locations::models::{MatchResult, MatchType};
use crate::features::regions::models::AdministrativeUnit;

/// Scoring knobs for [`FuzzyMatcher`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherSettings {
    pub synonym_confidence: f64,
    /// Cap for names whose base matches but whose kota/kabupaten kind conflicts
    pub kind_mismatch_confidence: f64,
    pub fuzzy_floor: f64,
    pub fuzzy_ceiling: f64,
    /// Minimum edit similarity for candidates that share no token
    pub edit_floor: f64,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            synonym_confidence: 0.9,
            kind_mismatch_confidence: 0.6,
            fuzzy_floor: 0.3,
            fuzzy_ceiling: 0.79,
            edit_floor: 0.75,
        }
    }
}

/// Matches free-text region names against directory candidates
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    synonyms: Arc<SynonymTable>,
    settings: MatcherSettings,
}

impl FuzzyMatcher {
    pub fn new(synonyms: Arc<SynonymTable>) -> Self {
        Self {
            synonyms,
            settings: MatcherSettings::default(),
        }
    }

    /// Best candidate for `query`, or a `none` result.
    ///
    /// Candidates are scanned in order and only a strictly better score
    /// replaces the current best, so ties go to the earliest candidate.
    pub fn find_best(&self, query: Option<&str>, candidates: &[AdministrativeUnit]) -> MatchResult {
        let Some(query) = query.map(normalize_region_name).filter(|q| !q.is_empty()) else {
            return MatchResult::none();
        };

        let mut best: Option<(&AdministrativeUnit, f64, MatchType)> = None;

        for candidate in candidates {
            let name = normalize_region_name(&candidate.name);
            if name.is_empty() {
                continue;
            }

            let Some((confidence, match_type)) = self.score(&query, &name) else {
                continue;
            };

            if best.map_or(true, |(_, best_confidence, _)| confidence > best_confidence) {
                best = Some((candidate, confidence, match_type));
            }
        }

        match best {
            Some((unit, confidence, match_type)) => {
                MatchResult::matched(unit, confidence, match_type)
            }
            None => MatchResult::none(),
        }
    }

    fn score(&self, query: &NormalizedName, candidate: &NormalizedName) -> Option<(f64, MatchType)> {
        let settings = &self.settings;
        let kinds_agree = query.kind_compatible(candidate);

        if query.base == candidate.base {
            return Some(if kinds_agree {
                (1.0, MatchType::Exact)
            } else {
                (settings.kind_mismatch_confidence, MatchType::Fuzzy)
            });
        }

        if kinds_agree && self.synonyms.are_synonyms(&query.base, &candidate.base) {
            return Some((settings.synonym_confidence, MatchType::Synonym));
        }

        let similarity = similarity(query, candidate, settings.edit_floor)?;
        let mut confidence = similarity.clamp(settings.fuzzy_floor, settings.fuzzy_ceiling);
        if !kinds_agree {
            confidence = confidence.min(settings.kind_mismatch_confidence);
        }

        Some((confidence, MatchType::Fuzzy))
    }
}

/// Raw similarity in `[0, 1]`, or `None` when the names neither overlap nor
/// come within `edit_floor` of each other
fn similarity(query: &NormalizedName, candidate: &NormalizedName, edit_floor: f64) -> Option<f64> {
    let edit = strsim::normalized_levenshtein(&query.base, &candidate.base);
    let containment = containment_score(&query.base, &candidate.base);
    let overlap = token_overlap_score(query, candidate);

    if containment.is_none() && overlap.is_none() && edit < edit_floor {
        return None;
    }

    Some(
        edit.max(containment.unwrap_or(0.0))
            .max(overlap.unwrap_or(0.0)),
    )
}

/// One name appears in the other on word boundaries ("bekasi" in "bekasi timur")
fn containment_score(a: &str, b: &str) -> Option<f64> {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let short_len = short.chars().count();
    let long_len = long.chars().count();

    if short_len < 3 || short_len == long_len {
        return None;
    }

    let padded_long = format!(" {} ", long);
    let padded_short = format!(" {} ", short);
    if !padded_long.contains(&padded_short) {
        return None;
    }

    Some(0.6 + 0.2 * (short_len as f64 / long_len as f64))
}

/// Jaccard overlap of significant tokens, scaled to 0.7
fn token_overlap_score(a: &NormalizedName, b: &NormalizedName) -> Option<f64> {
    let left: HashSet<&str> = a.significant_tokens().into_iter().collect();
    let right: HashSet<&str> = b.significant_tokens().into_iter().collect();

    let shared = left.intersection(&right).count();
    if shared == 0 {
        return None;
    }

    let union = left.union(&right).count();
    Some(0.7 * shared as f64 / union as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::address::en::CityName;
    use fake::Fake;

    fn matcher() -> FuzzyMatcher {
        FuzzyMatcher::new(Arc::new(SynonymTable::embedded().unwrap()))
    }

    fn regencies() -> Vec<AdministrativeUnit> {
        vec![
            AdministrativeUnit::regency("32.01", "Kabupaten Bogor", "32"),
            AdministrativeUnit::regency("32.16", "Kabupaten Bekasi", "32"),
            AdministrativeUnit::regency("32.71", "Kota Bogor", "32"),
            AdministrativeUnit::regency("32.73", "Kota Bandung", "32"),
            AdministrativeUnit::regency("32.75", "Kota Bekasi", "32"),
        ]
    }

    #[test]
    fn test_prefix_stripped_name_is_exact() {
        let candidates = vec![AdministrativeUnit::regency("3275", "Kota Bekasi", "32")];
        let result = matcher().find_best(Some("Bekasi"), &candidates);

        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(result.confidence, 1.0);
        assert!(result.confidence >= 0.8);
        assert_eq!(result.code.as_deref(), Some("3275"));
    }

    #[test]
    fn test_unknown_city_is_none() {
        let result = matcher().find_best(Some("Kota Tidak Ada"), &regencies());

        assert_eq!(result.match_type, MatchType::None);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.code, None);
    }

    #[test]
    fn test_empty_query_is_none() {
        let m = matcher();
        assert_eq!(m.find_best(None, &regencies()), MatchResult::none());
        assert_eq!(m.find_best(Some(""), &regencies()), MatchResult::none());
        assert_eq!(m.find_best(Some("   "), &regencies()), MatchResult::none());
    }

    #[test]
    fn test_empty_candidates_is_none() {
        assert_eq!(matcher().find_best(Some("Bekasi"), &[]), MatchResult::none());
    }

    #[test]
    fn test_kind_selects_between_kota_and_kabupaten() {
        let m = matcher();

        let kota = m.find_best(Some("Kota Bekasi"), &regencies());
        assert_eq!(kota.code.as_deref(), Some("32.75"));
        assert_eq!(kota.match_type, MatchType::Exact);

        let kabupaten = m.find_best(Some("Bekasi Regency"), &regencies());
        assert_eq!(kabupaten.code.as_deref(), Some("32.16"));
        assert_eq!(kabupaten.match_type, MatchType::Exact);
    }

    #[test]
    fn test_bare_name_tie_goes_to_first_candidate() {
        // "Bogor" is exact against both regency and city; input order decides
        let result = matcher().find_best(Some("Bogor"), &regencies());
        assert_eq!(result.code.as_deref(), Some("32.01"));

        let mut reversed = regencies();
        reversed.reverse();
        let result = matcher().find_best(Some("Bogor"), &reversed);
        assert_eq!(result.code.as_deref(), Some("32.71"));
    }

    #[test]
    fn test_kind_conflict_is_capped_fuzzy() {
        let candidates = vec![AdministrativeUnit::regency("32.16", "Kabupaten Bekasi", "32")];
        let result = matcher().find_best(Some("Kota Bekasi"), &candidates);

        assert_eq!(result.match_type, MatchType::Fuzzy);
        assert!((result.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_synonym_match() {
        let candidates = vec![
            AdministrativeUnit::regency("33.71", "Kota Magelang", "33"),
            AdministrativeUnit::regency("33.72", "Kota Surakarta", "33"),
        ];
        let result = matcher().find_best(Some("Solo"), &candidates);

        assert_eq!(result.match_type, MatchType::Synonym);
        assert_eq!(result.code.as_deref(), Some("33.72"));
        assert!(result.confidence >= 0.8 && result.confidence < 1.0);
    }

    #[test]
    fn test_english_province_name_is_synonym() {
        let provinces = vec![
            AdministrativeUnit::province("31", "DKI Jakarta"),
            AdministrativeUnit::province("32", "Jawa Barat"),
        ];
        let result = matcher().find_best(Some("West Java"), &provinces);

        assert_eq!(result.match_type, MatchType::Synonym);
        assert_eq!(result.code.as_deref(), Some("32"));
    }

    #[test]
    fn test_nominatim_style_province_name_is_exact() {
        let provinces = vec![
            AdministrativeUnit::province("31", "DKI Jakarta"),
            AdministrativeUnit::province("34", "DI Yogyakarta"),
        ];
        let m = matcher();

        let jakarta = m.find_best(Some("Daerah Khusus Ibukota Jakarta"), &provinces);
        assert_eq!(jakarta.code.as_deref(), Some("31"));
        assert_eq!(jakarta.match_type, MatchType::Exact);

        let yogya = m.find_best(Some("Daerah Istimewa Yogyakarta"), &provinces);
        assert_eq!(yogya.code.as_deref(), Some("34"));
        assert_eq!(yogya.match_type, MatchType::Exact);
    }

    #[test]
    fn test_typo_is_fuzzy_below_synonym() {
        let districts = vec![
            AdministrativeUnit::district("32.73.02", "Coblong", "32.73"),
            AdministrativeUnit::district("32.73.05", "Sukajadi", "32.73"),
        ];
        let result = matcher().find_best(Some("Sukajadii"), &districts);

        assert_eq!(result.match_type, MatchType::Fuzzy);
        assert_eq!(result.code.as_deref(), Some("32.73.05"));
        assert!(result.confidence >= 0.3 && result.confidence <= 0.79);
    }

    #[test]
    fn test_containment_is_fuzzy_with_floor() {
        let districts = vec![
            AdministrativeUnit::district("32.75.01", "Bekasi Timur", "32.75"),
            AdministrativeUnit::district("32.75.03", "Bekasi Utara", "32.75"),
        ];
        let result = matcher().find_best(Some("Kecamatan Bekasi"), &districts);

        assert_eq!(result.match_type, MatchType::Fuzzy);
        assert_eq!(result.code.as_deref(), Some("32.75.01"));
        assert!(result.confidence >= 0.3);
    }

    #[test]
    fn test_substring_inside_a_word_is_not_overlap() {
        let candidates = vec![AdministrativeUnit::regency("13.71", "Kota Padang", "13")];
        let result = matcher().find_best(Some("Ada"), &candidates);
        assert_eq!(result.match_type, MatchType::None);
    }

    #[test]
    fn test_exact_beats_earlier_fuzzy() {
        let districts = vec![
            AdministrativeUnit::district("32.75.01", "Bekasi Timur", "32.75"),
            AdministrativeUnit::district("32.75.04", "Bekasi Selatan", "32.75"),
        ];
        let result = matcher().find_best(Some("bekasi selatan"), &districts);

        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(result.code.as_deref(), Some("32.75.04"));
    }

    #[test]
    fn test_exact_iff_normalized_names_equal() {
        let m = matcher();

        for i in 0..50 {
            let city: String = CityName().fake();
            let candidates = vec![
                AdministrativeUnit::regency(format!("99.{:02}", i), format!("Kota {}", city), "99"),
            ];

            let same = m.find_best(Some(&city.to_uppercase()), &candidates);
            assert_eq!(same.match_type, MatchType::Exact, "{}", city);
            assert_eq!(same.confidence, 1.0);

            let different = m.find_best(Some(&format!("{} Baru", city)), &candidates);
            assert_ne!(different.match_type, MatchType::Exact, "{}", city);
            assert!(different.confidence < 1.0);
        }
    }
}
