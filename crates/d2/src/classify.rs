//! Pattern piece classification by label.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Role of a cut-pattern piece within a garment marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceRole {
    /// Front/back body panels, the anchors of the layout.
    Body,
    /// Sleeves; curved pairs interlock under alternating rotation.
    Sleeve,
    /// Bands, bindings, collars, ribs: small flexible gap fillers.
    Strip,
    /// Trouser leg pieces.
    LegPiece,
    /// Everything else.
    #[default]
    Other,
}

/// Configurable bilingual keyword table driving [`classify`].
///
/// Matching is case-insensitive substring search; more specific role sets are
/// consulted first so "SLEEVE BAND" classifies as a strip, not a sleeve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeywordTable {
    pub body: Vec<String>,
    pub sleeve: Vec<String>,
    pub strip: Vec<String>,
    pub legpiece: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            body: words(&["front", "back", "body", "앞판", "뒤판", "몸판"]),
            sleeve: words(&["sleeve", "슬리브", "소매"]),
            strip: words(&[
                "band",
                "bind",
                "collar",
                "neck",
                "waistband",
                "rib",
                "밴드",
                "바인딩",
                "카라",
                "목선",
                "시보리",
            ]),
            legpiece: words(&["leg", "trouser", "pant", "바지", "팬츠"]),
        }
    }
}

impl KeywordTable {
    /// Maps a piece label to its role. Pure function of the label text.
    pub fn classify(&self, label: &str) -> PieceRole {
        let label = label.to_lowercase();

        let matches = |keywords: &[String]| keywords.iter().any(|k| label.contains(k.as_str()));

        if matches(&self.strip) {
            PieceRole::Strip
        } else if matches(&self.sleeve) {
            PieceRole::Sleeve
        } else if matches(&self.legpiece) {
            PieceRole::LegPiece
        } else if matches(&self.body) {
            PieceRole::Body
        } else {
            PieceRole::Other
        }
    }
}
