//! Tone calibration — maps the requested tone to phrasing guidance for the
//! tailoring prompt.

use serde::{Deserialize, Serialize};

/// Requested writing tone for tailored bullets and summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Concise,
    Friendly,
}

/// Phrasing guidance calibrated to a tone.
#[derive(Debug, Clone, Serialize)]
pub struct ToneGuidance {
    pub style: &'static str,
    pub prefer: Vec<&'static str>,
    pub avoid: Vec<&'static str>,
    /// Soft cap on words per bullet.
    pub max_bullet_words: u32,
}

pub fn tone_guidance(tone: Tone) -> ToneGuidance {
    match tone {
        Tone::Professional => ToneGuidance {
            style: "formal, results-first, third-person implied",
            prefer: vec!["Delivered", "Led", "Designed", "Reduced", "Increased", "Implemented"],
            avoid: vec!["I", "my", "super", "awesome", "passionate"],
            max_bullet_words: 30,
        },
        Tone::Concise => ToneGuidance {
            style: "terse, one clause per bullet, metrics up front",
            prefer: vec!["Cut", "Built", "Shipped", "Scaled", "Automated"],
            avoid: vec![
                "responsible for",
                "in order to",
                "successfully",
                "various",
                "helped to",
            ],
            max_bullet_words: 18,
        },
        Tone::Friendly => ToneGuidance {
            style: "warm and approachable, still specific and factual",
            prefer: vec!["Partnered with", "Helped", "Welcomed", "Championed", "Built"],
            avoid: vec!["leveraged", "synergized", "utilized", "spearheaded"],
            max_bullet_words: 28,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tone_is_professional() {
        assert_eq!(Tone::default(), Tone::Professional);
    }

    #[test]
    fn test_tone_wire_names() {
        let tone: Tone = serde_json::from_str("\"concise\"").unwrap();
        assert_eq!(tone, Tone::Concise);
        assert!(serde_json::from_str::<Tone>("\"casual\"").is_err());
    }

    #[test]
    fn test_concise_is_shortest() {
        let concise = tone_guidance(Tone::Concise).max_bullet_words;
        assert!(concise < tone_guidance(Tone::Professional).max_bullet_words);
        assert!(concise < tone_guidance(Tone::Friendly).max_bullet_words);
    }

    #[test]
    fn test_prefer_and_avoid_do_not_overlap() {
        for tone in [Tone::Professional, Tone::Concise, Tone::Friendly] {
            let g = tone_guidance(tone);
            for verb in &g.prefer {
                assert!(
                    !g.avoid.iter().any(|a| a.eq_ignore_ascii_case(verb)),
                    "{tone:?} both prefers and avoids {verb}"
                );
            }
        }
    }
}
