//! Area name to canonical resort.

use snowdash_core::ResortId;

const KNOWN_FRAGMENTS: &[(&str, ResortId)] = &[
    ("brévent", ResortId::Chamonix),
    ("brevent", ResortId::Chamonix),
    ("flégère", ResortId::Chamonix),
    ("flegere", ResortId::Chamonix),
    ("grands montets", ResortId::Chamonix),
    ("aiguille du midi", ResortId::Chamonix),
    ("montenvers", ResortId::Chamonix),
    ("balme", ResortId::Vallorcine),
    ("vallorcine", ResortId::Vallorcine),
    ("le tour", ResortId::Vallorcine),
    ("houches", ResortId::SaintGervais),
    ("saint-gervais", ResortId::SaintGervais),
    ("saint gervais", ResortId::SaintGervais),
    ("tramway", ResortId::SaintGervais),
    ("contamines", ResortId::LesContamines),
    ("hauteluce", ResortId::LesContamines),
    ("combloux", ResortId::Combloux),
];

/// Beginner and village areas that are never surfaced.
const DENIED_FRAGMENTS: &[&str] = &["vormaine", "planards", "chosalets", "savoy"];

/// Case-insensitive substring lookup from area names to resorts.
///
/// The deny-list is consulted first, so `"Savoy (Brévent)"` is discarded.
/// Names matching neither table are discarded too.
#[derive(Debug, Clone)]
pub struct AreaClassifier {
    known: Vec<(String, ResortId)>,
    denied: Vec<String>,
}

impl Default for AreaClassifier {
    fn default() -> Self {
        Self {
            known: KNOWN_FRAGMENTS
                .iter()
                .map(|(fragment, resort)| ((*fragment).to_string(), *resort))
                .collect(),
            denied: DENIED_FRAGMENTS.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}

impl AreaClassifier {
    /// Maps names containing `fragment` to `resort`. Later aliases lose to
    /// earlier ones.
    #[must_use]
    pub fn with_alias(mut self, fragment: &str, resort: ResortId) -> Self {
        self.known.push((fragment.to_lowercase(), resort));
        self
    }

    /// Discards names containing `fragment`.
    #[must_use]
    pub fn with_denied(mut self, fragment: &str) -> Self {
        self.denied.push(fragment.to_lowercase());
        self
    }

    #[must_use]
    pub fn classify(&self, name: &str) -> Option<ResortId> {
        let lower = name.to_lowercase();

        if let Some(fragment) = self.denied.iter().find(|f| lower.contains(f.as_str())) {
            tracing::debug!(area = name, fragment = %fragment, "area on deny-list, discarding");
            return None;
        }

        let resort = self
            .known
            .iter()
            .find(|(fragment, _)| lower.contains(fragment.as_str()))
            .map(|(_, resort)| *resort);

        if resort.is_none() {
            tracing::debug!(area = name, "unrecognized area, discarding");
        }
        resort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_with_altitude_classifies() {
        let classifier = AreaClassifier::default();
        assert_eq!(classifier.classify("Brévent - 2525m"), Some(ResortId::Chamonix));
    }

    #[test]
    fn every_known_fragment_resolves() {
        let classifier = AreaClassifier::default();
        let cases = [
            ("BREVENT", ResortId::Chamonix),
            ("La Flégère", ResortId::Chamonix),
            ("Les Grands Montets", ResortId::Chamonix),
            ("Aiguille du Midi", ResortId::Chamonix),
            ("Train du Montenvers", ResortId::Chamonix),
            ("Balme (Le Tour–Vallorcine)", ResortId::Vallorcine),
            ("Le Tour", ResortId::Vallorcine),
            ("Les Houches", ResortId::SaintGervais),
            ("Saint Gervais Mont-Blanc", ResortId::SaintGervais),
            ("Tramway du Mont-Blanc", ResortId::SaintGervais),
            ("Les Contamines–Hauteluce", ResortId::LesContamines),
            ("Combloux–Portes du Mont-Blanc", ResortId::Combloux),
        ];
        for (name, expected) in cases {
            assert_eq!(classifier.classify(name), Some(expected), "{name}");
        }
    }

    #[test]
    fn denied_areas_are_discarded() {
        let classifier = AreaClassifier::default();
        assert_eq!(classifier.classify("Vormaine"), None);
        assert_eq!(classifier.classify("Les Planards"), None);
        assert_eq!(classifier.classify("Les Chosalets"), None);
    }

    #[test]
    fn deny_list_beats_known_fragment() {
        let classifier = AreaClassifier::default();
        assert_eq!(classifier.classify("Savoy (Brévent)"), None);
    }

    #[test]
    fn unknown_names_are_discarded() {
        let classifier = AreaClassifier::default();
        assert_eq!(classifier.classify("Megève Rochebrune"), None);
        assert_eq!(classifier.classify(""), None);
    }

    #[test]
    fn alias_extends_table() {
        let classifier = AreaClassifier::default().with_alias("Bellevue", ResortId::SaintGervais);
        assert_eq!(classifier.classify("Télécabine Bellevue"), Some(ResortId::SaintGervais));
    }

    #[test]
    fn denied_fragment_extends_deny_list() {
        let classifier = AreaClassifier::default().with_denied("Savoie Luge");
        assert_eq!(classifier.classify("Savoie luge Le Tour"), None);
    }
}
