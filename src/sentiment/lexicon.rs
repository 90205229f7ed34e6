//! 語→極性の固定辞書と否定語リスト。
//!
//! 英語は AFINN 形式の評価値（-5〜+5）、インドネシア語はアプリレビューで頻出する語彙。
//! 構築後は読み取り専用で、`Arc` 経由でリクエスト間に共有する。
use rustc_hash::{FxHashMap, FxHashSet};

const ENGLISH_TERMS: &[(&str, i32)] = &[
    ("abandon", -2),
    ("abuse", -3),
    ("accurate", 1),
    ("addicted", -2),
    ("admire", 3),
    ("adorable", 3),
    ("amazing", 4),
    ("angry", -3),
    ("annoyed", -2),
    ("annoying", -2),
    ("anxious", -2),
    ("appreciate", 2),
    ("awesome", 4),
    ("awful", -3),
    ("bad", -3),
    ("beautiful", 3),
    ("best", 3),
    ("better", 2),
    ("boring", -3),
    ("broken", -1),
    ("brilliant", 4),
    ("bug", -2),
    ("buggy", -2),
    ("bugs", -2),
    ("clean", 2),
    ("comfortable", 2),
    ("complain", -2),
    ("confused", -2),
    ("confusing", -2),
    ("convenient", 2),
    ("cool", 1),
    ("crap", -3),
    ("crash", -2),
    ("crashed", -2),
    ("crashes", -2),
    ("cute", 2),
    ("damn", -4),
    ("delay", -1),
    ("delayed", -1),
    ("delight", 3),
    ("disappointed", -2),
    ("disappointing", -2),
    ("disappointment", -2),
    ("dislike", -2),
    ("easy", 1),
    ("effective", 2),
    ("efficient", 2),
    ("enjoy", 2),
    ("error", -2),
    ("errors", -2),
    ("excellent", 3),
    ("excited", 3),
    ("fail", -2),
    ("failed", -2),
    ("failure", -2),
    ("fake", -3),
    ("fantastic", 4),
    ("fast", 1),
    ("favorite", 2),
    ("fine", 2),
    ("fix", 1),
    ("fraud", -4),
    ("free", 1),
    ("frustrated", -2),
    ("frustrating", -2),
    ("fun", 4),
    ("garbage", -1),
    ("glad", 3),
    ("good", 3),
    ("great", 3),
    ("happy", 3),
    ("hate", -3),
    ("helpful", 2),
    ("horrible", -3),
    ("impressed", 3),
    ("impressive", 3),
    ("improve", 2),
    ("improved", 2),
    ("issue", -1),
    ("issues", -1),
    ("lag", -1),
    ("laggy", -2),
    ("like", 2),
    ("love", 3),
    ("loved", 3),
    ("lovely", 3),
    ("mess", -2),
    ("nice", 3),
    ("outstanding", 5),
    ("perfect", 3),
    ("pleased", 3),
    ("poor", -2),
    ("problem", -2),
    ("problems", -2),
    ("recommend", 2),
    ("recommended", 2),
    ("reliable", 2),
    ("ridiculous", -3),
    ("sad", -2),
    ("safe", 1),
    ("satisfied", 2),
    ("scam", -2),
    ("slow", -2),
    ("smooth", 2),
    ("solid", 2),
    ("stuck", -2),
    ("stupid", -2),
    ("super", 3),
    ("superb", 5),
    ("terrible", -3),
    ("thank", 2),
    ("thanks", 2),
    ("trash", -2),
    ("ugly", -3),
    ("unable", -2),
    ("unhappy", -2),
    ("uninstall", -2),
    ("unusable", -3),
    ("useful", 2),
    ("useless", -2),
    ("waste", -1),
    ("wasted", -2),
    ("win", 4),
    ("wonderful", 4),
    ("worse", -3),
    ("worst", -3),
    ("worth", 2),
    ("worthless", -2),
    ("wow", 4),
    ("wrong", -2),
];

const INDONESIAN_TERMS: &[(&str, i32)] = &[
    ("bagus", 3),
    ("baik", 2),
    ("berguna", 2),
    ("bermanfaat", 2),
    ("cepat", 2),
    ("gampang", 2),
    ("hebat", 3),
    ("jos", 3),
    ("keren", 3),
    ("lancar", 2),
    ("mantap", 3),
    ("mantul", 3),
    ("membantu", 2),
    ("memuaskan", 3),
    ("mudah", 2),
    ("nyaman", 2),
    ("oke", 1),
    ("praktis", 2),
    ("puas", 3),
    ("rekomendasi", 2),
    ("senang", 3),
    ("suka", 2),
    ("sukses", 2),
    ("terbaik", 4),
    ("terima", 1),
    ("kasih", 1),
    ("top", 3),
    ("aneh", -1),
    ("bohong", -3),
    ("buruk", -3),
    ("error", -2),
    ("gagal", -2),
    ("hilang", -1),
    ("jelek", -3),
    ("kecewa", -3),
    ("lambat", -2),
    ("lelet", -2),
    ("lemot", -2),
    ("macet", -2),
    ("marah", -3),
    ("masalah", -2),
    ("menyebalkan", -3),
    ("mengecewakan", -3),
    ("nipu", -4),
    ("parah", -3),
    ("payah", -3),
    ("penipuan", -4),
    ("ribet", -2),
    ("rusak", -2),
    ("sampah", -3),
    ("sulit", -2),
    ("susah", -2),
    ("tolong", -1),
];

/// 語の極性の範囲。
pub const POLARITY_RANGE: std::ops::RangeInclusive<i32> = -5..=5;

const NEGATORS: &[&str] = &[
    "ain't", "aren't", "can't", "cannot", "couldn't", "didn't", "doesn't", "don't", "hasn't",
    "haven't", "isn't", "never", "no", "not", "shouldn't", "wasn't", "weren't", "won't",
    "wouldn't", "belum", "bukan", "enggak", "gak", "ga", "jangan", "kurang", "nggak", "tak",
    "tidak", "tdk",
];

/// 語の極性辞書。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    terms: FxHashMap<String, i32>,
    negators: FxHashSet<String>,
}

impl Lexicon {
    /// 英語とインドネシア語の組み込み辞書。
    #[must_use]
    pub fn builtin() -> Self {
        let terms = ENGLISH_TERMS
            .iter()
            .chain(INDONESIAN_TERMS)
            .map(|(term, polarity)| ((*term).to_string(), *polarity))
            .collect();
        let negators = NEGATORS.iter().map(|word| (*word).to_string()).collect();
        Self { terms, negators }
    }

    /// 追加の語を上書き登録した辞書を返す。極性は `POLARITY_RANGE` に丸める。
    #[must_use]
    pub fn with_terms<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        for (term, polarity) in extra {
            let polarity = polarity.clamp(*POLARITY_RANGE.start(), *POLARITY_RANGE.end());
            self.terms.insert(term.into().to_lowercase(), polarity);
        }
        self
    }

    /// 語の極性。辞書に無ければ `None`。
    #[must_use]
    pub fn polarity(&self, term: &str) -> Option<i32> {
        self.terms.get(term).copied()
    }

    #[must_use]
    pub fn is_negator(&self, term: &str) -> bool {
        self.negators.contains(term)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}
