/// Titles that are already generic and must not lose their qualifier.
pub const FIXED_TITLES: &[&str] = &[
    "Sekretaris Daerah",
    "Sekretaris DPRD",
    "Kepala Pelaksana BPBD",
    "Inspektur Daerah",
    "Kepala Satpol PP",
];

/// `(prefix of a generated title, generic title)`, first match wins.
/// Every generic title either lacks the trailing space of its own prefix or
/// maps back onto itself, so simplification is idempotent.
pub const SIMPLIFY_RULES: &[(&str, &str)] = &[
    ("Kepala Dinas ", "Kepala Dinas"),
    ("Kepala Badan ", "Kepala Badan"),
    ("Kepala Bagian ", "Kepala Bagian"),
    ("Kepala Bidang ", "Kepala Bidang"),
    ("Kepala Subbagian ", "Kepala Subbagian"),
    ("Kepala Sub Bagian ", "Kepala Subbagian"),
    ("Kepala Subbidang ", "Kepala Subbidang"),
    ("Kepala Sub Bidang ", "Kepala Subbidang"),
    ("Kepala Seksi ", "Kepala Seksi"),
    ("Kepala UPTD Puskesmas ", "Kepala Puskesmas"),
    ("Kepala Puskesmas ", "Kepala Puskesmas"),
    ("Kepala Klinik ", "Kepala Klinik"),
    ("Kepala Laboratorium ", "Kepala Laboratorium"),
    ("Kepala Kantor ", "Kepala Kantor"),
    ("Kepala Desa ", "Kepala Desa"),
    ("Direktur ", "Direktur RSUD"),
    ("Camat ", "Camat"),
    ("Lurah ", "Lurah"),
    ("Sekretaris ", "Sekretaris"),
    ("Asisten ", "Asisten Sekretaris Daerah"),
];

/// `(keyword, generic title)` for `Kepala ...` titles whose unit name only
/// contains the unit kind, e.g. `Kepala UPT Puskesmas Kembaran I`.
/// Checked after [SIMPLIFY_RULES], in the order the title rules use.
pub const KEYWORD_TITLES: &[(&str, &str)] = &[
    ("puskesmas", "Kepala Puskesmas"),
    ("klinik", "Kepala Klinik"),
    ("laboratorium", "Kepala Laboratorium"),
    ("kantor", "Kepala Kantor"),
    ("desa", "Kepala Desa"),
];

const HEAD_PREFIX: &str = "Kepala ";

fn starts_with_ci(title: &str, prefix: &str) -> bool {
    title
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Strips the unit-specific tail from a generated title:
/// `Kepala Dinas Pendidikan` -> `Kepala Dinas`. Unknown shapes pass through.
pub fn simplify_title(title: &str) -> String {
    let title = title.trim();
    if FIXED_TITLES
        .iter()
        .any(|fixed| fixed.eq_ignore_ascii_case(title))
    {
        return title.to_string();
    }
    if let Some((_, generic)) = SIMPLIFY_RULES
        .iter()
        .find(|(prefix, _)| starts_with_ci(title, prefix))
    {
        return (*generic).to_string();
    }
    if starts_with_ci(title, HEAD_PREFIX) {
        let lower = title.to_lowercase();
        if let Some((_, generic)) = KEYWORD_TITLES
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
        {
            return (*generic).to_string();
        }
    }
    title.to_string()
}
