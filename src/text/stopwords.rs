//! ロケール別の固定ストップワード辞書。
//!
//! 否定語（`tidak`, `not` など）も含むため、除去後のテキストでは否定の反転が効かない。
use std::sync::LazyLock;

use rustc_hash::FxHashSet;

use super::Locale;

const INDONESIAN: &[&str] = &[
    "ada", "adalah", "adanya", "agak", "agar", "akan", "akankah", "akhirnya", "aku", "akulah",
    "amat", "anda", "andalah", "antara", "apa", "apaan", "apabila", "apakah", "apalagi", "atau",
    "ataukah", "ataupun", "bagai", "bagaimana", "bagaimanakah", "bagi", "bahkan", "bahwa",
    "bahwasanya", "banyak", "beberapa", "begini", "begitu", "belum", "benar", "berapa", "bisa",
    "boleh", "bukan", "bukankah", "bukanlah", "cukup", "dalam", "dan", "dapat", "dari", "daripada",
    "demikian", "dengan", "di", "dia", "dialah", "dini", "diri", "dong", "dulu", "hal", "hampir",
    "hanya", "harus", "hingga", "ia", "ialah", "ini", "inilah", "itu", "itulah", "jadi", "jika",
    "jikalau", "juga", "justru", "kalau", "kalian", "kami", "kamilah", "kamu", "kamulah", "kan",
    "kapan", "karena", "ke", "kembali", "kemudian", "kenapa", "kepada", "ketika", "kini", "kita",
    "kitalah", "lagi", "lah", "lain", "lalu", "maka", "mana", "masih", "mau", "meski", "meskipun",
    "mereka", "merekalah", "mungkin", "nah", "namun", "nanti", "nya", "oleh", "pada", "padahal",
    "para", "per", "pernah", "pula", "pun", "saat", "saja", "sama", "sambil", "sampai", "sangat",
    "saya", "sayalah", "se", "sebab", "sebagai", "sebelum", "sedang", "sedangkan", "sejak",
    "sekali", "sekarang", "selagi", "selain", "selalu", "semua", "sendiri", "seperti", "sering",
    "serta", "sesuatu", "setelah", "setiap", "sini", "situ", "suatu", "sudah", "supaya", "tadi",
    "tak", "tanpa", "tapi", "telah", "tentang", "tentu", "terhadap", "tersebut", "tetapi",
    "tidak", "toh", "untuk", "walau", "walaupun", "ya", "yaitu", "yakni", "yang",
];

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "can't", "cannot", "could", "couldn't", "did", "didn't", "do", "does",
    "doesn't", "doing", "don't", "down", "during", "each", "few", "for", "from", "further", "had",
    "hadn't", "has", "hasn't", "have", "haven't", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "i'm", "if", "in", "into", "is", "isn't", "it", "it's",
    "its", "itself", "me", "more", "most", "my", "myself", "no", "nor", "not", "of", "off", "on",
    "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "wasn't", "we", "were", "weren't", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "won't", "would",
    "you", "your", "yours", "yourself", "yourselves",
];

static INDONESIAN_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| INDONESIAN.iter().copied().collect());
static ENGLISH_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| ENGLISH.iter().copied().collect());

/// ロケールに対応するストップワード集合。
#[must_use]
pub fn for_locale(locale: Locale) -> &'static FxHashSet<&'static str> {
    match locale {
        Locale::Indonesian => &INDONESIAN_SET,
        Locale::English => &ENGLISH_SET,
    }
}
