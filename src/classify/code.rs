use super::simplify_title;

/// Full titles unique enough to carry their own code.
pub const EXACT_CODES: &[(&str, &str)] = &[
    ("Sekretaris Daerah", "SEKDA"),
    ("Sekretaris DPRD", "SEKWAN"),
    ("Kepala Pelaksana BPBD", "KALAK_BPBD"),
    ("Kepala Satpol PP", "KASATPOLPP"),
    ("Inspektur Daerah", "INSPEKTUR"),
];

/// A generic title whose code is refined by keywords in the unit name.
#[derive(Debug, Clone, Copy)]
pub struct CategoryCode {
    pub category: &'static str,
    /// `(any of these lowercase keywords, code)`, first match wins.
    pub keywords: &'static [(&'static [&'static str], &'static str)],
    pub code: &'static str,
}

const fn category(category: &'static str, code: &'static str) -> CategoryCode {
    CategoryCode {
        category,
        keywords: &[],
        code,
    }
}

pub const CATEGORY_CODES: &[CategoryCode] = &[
    CategoryCode {
        category: "Kepala Dinas",
        keywords: &[
            (&["pendidikan"], "KADISDIK"),
            (&["kesehatan"], "KADINKES"),
            (&["pekerjaan umum", "penataan ruang"], "KADISPUPR"),
            (&["sosial"], "KADINSOS"),
            (&["perhubungan"], "KADISHUB"),
            (&["pertanian", "ketahanan pangan"], "KADISTAN"),
            (&["kependudukan", "pencatatan sipil"], "KADISDUKCAPIL"),
            (&["lingkungan hidup"], "KADLH"),
            (&["komunikasi", "informatika"], "KADINKOMINFO"),
        ],
        code: "KADIS",
    },
    CategoryCode {
        category: "Kepala Badan",
        keywords: &[
            (&["keuangan", "pendapatan", "aset"], "KABAN_KEU"),
            (&["kepegawaian", "sumber daya manusia"], "KABAN_BKPSDM"),
            (&["perencanaan", "penelitian"], "KABAN_BAPPEDA"),
            (&["kesatuan bangsa", "politik"], "KABAN_KESBANGPOL"),
        ],
        code: "KABAN",
    },
    CategoryCode {
        category: "Asisten Sekretaris Daerah",
        keywords: &[
            (&["pemerintahan"], "ASISTEN_1"),
            (&["perekonomian", "pembangunan"], "ASISTEN_2"),
            (&["administrasi umum"], "ASISTEN_3"),
        ],
        code: "ASISTEN",
    },
    category("Direktur RSUD", "DIRRSUD"),
    category("Kepala Bagian", "KABAG"),
    category("Kepala Bidang", "KABID"),
    category("Kepala Subbagian", "KASUBBAG"),
    category("Kepala Subbidang", "KASUBBID"),
    category("Kepala Seksi", "KASI"),
    category("Kepala Puskesmas", "KAPUS"),
    category("Kepala Klinik", "KAKLINIK"),
    category("Kepala Laboratorium", "KALAB"),
    category("Kepala Kantor", "KAKAN"),
    category("Kepala Desa", "KADES"),
    category("Camat", "CAMAT"),
    category("Lurah", "LURAH"),
    category("Sekretaris", "SEKRETARIS"),
];

/// Title prefixes for anything the categories above did not claim.
pub const FALLBACK_CODES: &[(&str, &str)] = &[
    ("Inspektur", "INSPEKTUR"),
    ("Direktur", "DIREKTUR"),
    ("Sekretaris", "SEKRETARIS"),
    ("Pimpinan", "PIMPINAN"),
    ("Kepala", "KEPALA"),
];

pub const DEFAULT_CODE: &str = "PEJABAT";

/// Derives the short mnemonic code for a title held over `unit_name`.
pub fn classify_code(title: &str, unit_name: &str) -> &'static str {
    let title = title.trim();
    if let Some((_, code)) = EXACT_CODES
        .iter()
        .find(|(exact, _)| exact.eq_ignore_ascii_case(title))
    {
        return *code;
    }

    let generic = simplify_title(title);
    let unit = unit_name.to_lowercase();
    if let Some(entry) = CATEGORY_CODES
        .iter()
        .find(|entry| entry.category.eq_ignore_ascii_case(&generic))
    {
        return entry
            .keywords
            .iter()
            .find(|(words, _)| words.iter().any(|word| unit.contains(word)))
            .map(|(_, code)| *code)
            .unwrap_or(entry.code);
    }

    let lower = title.to_lowercase();
    FALLBACK_CODES
        .iter()
        .find(|(prefix, _)| lower.starts_with(&prefix.to_lowercase()))
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT_CODE)
}
