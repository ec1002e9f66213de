//! Position titles inferred from a unit's name and echelon.
//!
//! Rules are data: an ordered table evaluated top-to-bottom, first match wins.
//! Specific names (hospitals, top-level secretariats) sit above the generic
//! agency/department prefixes of the same tier.

use crate::hierarchy::{Echelon, Tier};

#[derive(Debug, Clone, Copy)]
pub enum NamePattern {
    /// Case-insensitive prefix of the unit name.
    StartsWith(&'static [&'static str]),
    /// Case-insensitive substring of the unit name.
    Contains(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub enum TitleTemplate {
    Fixed(&'static str),
    /// `<lead> <unit name>`
    Lead(&'static str),
    /// Replaces the matched prefix: `Kecamatan Ajibarang` -> `Camat Ajibarang`.
    /// A bare prefix (`Sekretariat`) takes the parent's name instead.
    ReplacePrefix(&'static str),
    /// The unit name already is the title (`Asisten Perekonomian dan Pembangunan`).
    UnitName,
}

#[derive(Debug, Clone, Copy)]
pub struct TitleRule {
    pub tier: Tier,
    pub pattern: NamePattern,
    /// Substrings that disqualify the rule.
    pub unless: &'static [&'static str],
    pub template: TitleTemplate,
}

const fn rule(tier: Tier, pattern: NamePattern, template: TitleTemplate) -> TitleRule {
    TitleRule {
        tier,
        pattern,
        unless: &[],
        template,
    }
}

use NamePattern::{Contains, StartsWith};
use TitleTemplate::{Fixed, Lead, ReplacePrefix, UnitName};

const HOSPITAL: &[&str] = &["rsud", "rumah sakit umum daerah"];
const TOP_SECRETARIATS: &[&str] = &[
    "sekretariat daerah",
    "sekretariat dprd",
    "sekretariat dewan perwakilan rakyat daerah",
];

pub const TITLE_RULES: &[TitleRule] = &[
    rule(Tier::Top, Contains(&["sekretariat daerah"]), Fixed("Sekretaris Daerah")),
    rule(
        Tier::Top,
        Contains(&["sekretariat dprd", "sekretariat dewan perwakilan rakyat daerah"]),
        Fixed("Sekretaris DPRD"),
    ),
    rule(
        Tier::Top,
        Contains(&["badan penanggulangan bencana daerah", "bpbd"]),
        Fixed("Kepala Pelaksana BPBD"),
    ),
    rule(Tier::Top, Contains(HOSPITAL), Lead("Direktur")),
    rule(Tier::Top, StartsWith(&["badan "]), Lead("Kepala")),
    rule(Tier::Top, StartsWith(&["dinas "]), Lead("Kepala")),
    rule(Tier::Top, Contains(&["inspektorat"]), Fixed("Inspektur Daerah")),
    rule(
        Tier::Top,
        Contains(&["satpol pp", "satuan polisi pamong praja"]),
        Fixed("Kepala Satpol PP"),
    ),
    rule(Tier::Top, StartsWith(&["kecamatan "]), ReplacePrefix("Camat")),
    rule(Tier::Top, StartsWith(&["asisten "]), UnitName),
    rule(Tier::Mid, StartsWith(&["kecamatan "]), ReplacePrefix("Camat")),
    TitleRule {
        tier: Tier::Mid,
        pattern: StartsWith(&["sekretariat"]),
        unless: TOP_SECRETARIATS,
        template: ReplacePrefix("Sekretaris"),
    },
    rule(Tier::Mid, StartsWith(&["bagian "]), Lead("Kepala")),
    rule(Tier::Mid, StartsWith(&["bidang "]), Lead("Kepala")),
    rule(Tier::Mid, Contains(&["rsud", "rumah sakit"]), Lead("Direktur")),
    rule(Tier::Mid, Contains(&["klinik"]), Lead("Kepala")),
    rule(Tier::Mid, Contains(&["puskesmas"]), Lead("Kepala")),
    rule(Tier::Mid, Contains(&["laboratorium"]), Lead("Kepala")),
    rule(Tier::Mid, Contains(&["kantor"]), Lead("Kepala")),
    rule(Tier::Mid, StartsWith(&["kelurahan "]), ReplacePrefix("Lurah")),
    rule(Tier::Mid, Contains(&["kelurahan"]), Fixed("Lurah")),
    rule(Tier::Lower, StartsWith(&["subbagian ", "sub bagian "]), Lead("Kepala")),
    rule(Tier::Lower, StartsWith(&["subbidang ", "sub bidang "]), Lead("Kepala")),
    rule(Tier::Lower, StartsWith(&["seksi "]), Lead("Kepala")),
    rule(Tier::Lower, Contains(&["desa"]), Lead("Kepala")),
];

pub const DEFAULT_TOP_TITLE: &str = "Pimpinan";
pub const DEFAULT_LEAD_TITLE: &str = "Kepala";
pub const DEFAULT_UNRANKED_TITLE: &str = "Pejabat";

fn strip_prefix_ci<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &name[prefix.len()..])
}

impl NamePattern {
    /// On a match, returns the part of `name` left after the matched prefix
    /// (the whole name for substring patterns).
    fn matches<'a>(&self, name: &'a str, lower: &str) -> Option<&'a str> {
        match self {
            StartsWith(prefixes) => prefixes
                .iter()
                .find_map(|prefix| strip_prefix_ci(name, prefix)),
            Contains(needles) => needles
                .iter()
                .any(|needle| lower.contains(needle))
                .then_some(name),
        }
    }
}

impl TitleTemplate {
    fn render(&self, name: &str, remainder: &str, parent: Option<&str>) -> String {
        match self {
            Fixed(title) => (*title).to_string(),
            Lead(lead) => format!("{lead} {}", name.trim()),
            ReplacePrefix(lead) => {
                let rest = remainder.trim();
                let rest = if rest.is_empty() {
                    parent.map(str::trim).unwrap_or("")
                } else {
                    rest
                };
                if rest.is_empty() {
                    (*lead).to_string()
                } else {
                    format!("{lead} {rest}")
                }
            }
            UnitName => name.trim().to_string(),
        }
    }
}

/// Returns the first rule that applies, if any.
pub fn matching_rule(name: &str, eselon: Option<&Echelon>) -> Option<&'static TitleRule> {
    let tier = eselon.and_then(Echelon::tier)?;
    let lower = name.to_lowercase();
    TITLE_RULES.iter().find(|rule| {
        rule.tier == tier
            && !rule.unless.iter().any(|skip| lower.contains(skip))
            && rule.pattern.matches(name, &lower).is_some()
    })
}

/// Infers the title of whoever heads the unit. Never returns an empty string.
pub fn classify_title(name: &str, eselon: Option<&Echelon>, parent: Option<&str>) -> String {
    if let Some(rule) = matching_rule(name, eselon) {
        let lower = name.to_lowercase();
        if let Some(remainder) = rule.pattern.matches(name, &lower) {
            return rule.template.render(name, remainder, parent);
        }
    }
    match eselon {
        Some(Echelon::I) => DEFAULT_TOP_TITLE.to_string(),
        Some(code) if code.tier().is_some() => DEFAULT_LEAD_TITLE.to_string(),
        _ => DEFAULT_UNRANKED_TITLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(name: &str, eselon: &str) -> String {
        classify_title(name, Some(&Echelon::parse_code(eselon)), None)
    }

    #[test]
    fn department_prefix_yields_head_of_full_name() {
        assert_eq!(title("Dinas Pendidikan", "II.b"), "Kepala Dinas Pendidikan");
        assert_eq!(title("DINAS SOSIAL", "II.b"), "Kepala DINAS SOSIAL");
        assert_eq!(
            title("Badan Kepegawaian dan Pengembangan Sumber Daya Manusia", "II.a"),
            "Kepala Badan Kepegawaian dan Pengembangan Sumber Daya Manusia"
        );
    }

    #[test]
    fn secretariat_prefix_is_rewritten_to_the_served_organization() {
        assert_eq!(
            title("Sekretariat Badan Kepegawaian", "III.a"),
            "Sekretaris Badan Kepegawaian"
        );
        assert_eq!(
            classify_title("Sekretariat", Some(&Echelon::IIIa), Some("Dinas Kesehatan")),
            "Sekretaris Dinas Kesehatan"
        );
        assert_eq!(title("Sekretariat", "III.a"), "Sekretaris");
    }

    #[test]
    fn top_level_secretariats_get_fixed_titles() {
        assert_eq!(title("Sekretariat Daerah", "I"), "Sekretaris Daerah");
        assert_eq!(title("Sekretariat DPRD", "II.a"), "Sekretaris DPRD");
        // Not rewritten as a subordinate secretariat at mid tier either.
        assert_eq!(title("Sekretariat DPRD", "III.a"), "Kepala");
        assert_eq!(
            title("Sekretariat Dewan Perwakilan Rakyat Daerah", "II.a"),
            "Sekretaris DPRD"
        );
        assert_eq!(title("Sekretariat Dewan Perwakilan Rakyat Daerah", "III.a"), "Kepala");
    }

    #[test]
    fn hospital_is_checked_before_generic_agency_prefix() {
        assert_eq!(
            title("Badan Layanan Umum RSUD Ajibarang", "II.b"),
            "Direktur Badan Layanan Umum RSUD Ajibarang"
        );
        assert_eq!(
            title("Rumah Sakit Umum Daerah Banyumas", "II.b"),
            "Direktur Rumah Sakit Umum Daerah Banyumas"
        );
        assert_eq!(
            title("Kantor Rumah Sakit Paru", "III.a"),
            "Direktur Kantor Rumah Sakit Paru"
        );
        assert_eq!(
            title("Badan Penanggulangan Bencana Daerah", "II.b"),
            "Kepala Pelaksana BPBD"
        );
    }

    #[test]
    fn regional_units_replace_their_prefix() {
        assert_eq!(title("Kecamatan Ajibarang", "III.a"), "Camat Ajibarang");
        assert_eq!(title("Kecamatan Sokaraja", "II.b"), "Camat Sokaraja");
        assert_eq!(title("Kelurahan Sokanegara", "III.b"), "Lurah Sokanegara");
        assert_eq!(title("Desa Karangsari", "IV.a"), "Kepala Desa Karangsari");
        assert_eq!(
            title("UPT Puskesmas Kembaran I", "III.b"),
            "Kepala UPT Puskesmas Kembaran I"
        );
    }

    #[test]
    fn lower_tier_subunits() {
        assert_eq!(
            title("Sub Bagian Umum dan Kepegawaian", "IV.a"),
            "Kepala Sub Bagian Umum dan Kepegawaian"
        );
        assert_eq!(title("Seksi Kurikulum", "IV.b"), "Kepala Seksi Kurikulum");
    }

    #[test]
    fn rules_are_scoped_to_their_tier() {
        // A department prefix at lower tier falls through to the default.
        assert_eq!(title("Dinas Pendidikan", "IV.a"), "Kepala");
        assert_eq!(title("Bidang Anggaran", "III.b"), "Kepala Bidang Anggaran");
        assert_eq!(title("Bidang Anggaran", "II.b"), "Kepala");
    }

    #[test]
    fn fallbacks_are_echelon_keyed_and_never_empty() {
        assert_eq!(title("Staf Ahli Bupati", "I"), "Pimpinan");
        assert_eq!(title("Staf Ahli Bupati", "II.b"), "Kepala");
        assert_eq!(title("Staf Ahli Bupati", "V.a"), "Pejabat");
        assert_eq!(classify_title("SD Negeri 1 Ajibarang", None, None), "Pejabat");
        assert_eq!(classify_title("", None, None), "Pejabat");
        assert_eq!(title("", "II.b"), "Kepala");
    }

    #[test]
    fn classification_is_deterministic() {
        let inputs = [
            ("Dinas Pendidikan", "II.b"),
            ("Sekretariat", "III.a"),
            ("Inspektorat Daerah", "II.a"),
            ("Puskesmas Kembaran I", "III.b"),
        ];
        for (name, eselon) in inputs {
            let first = title(name, eselon);
            assert!(!first.is_empty());
            assert_eq!(first, title(name, eselon));
        }
    }
}
