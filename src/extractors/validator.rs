// src/extractors/validator.rs
//! Decides whether a cleaned name cell is a plausible beneficial owner.
//!
//! Ownership tables in S-1 filings sit among headings, captions and footnotes
//! that leak into the scraped rows. The checks below run in a fixed order and
//! the first one that reaches a decision wins. Rejecting a real investor is
//! cheaper than accepting a heading, so most rules reject.

use once_cell::sync::Lazy;
use regex::Regex;

// --- Lookup tables ---

/// Exact (lower-cased, percent and trailing colon stripped) non-investor labels.
pub const NON_INVESTOR_PHRASES: &[&str] = &[
    "common stock",
    "preferred stock",
    "convertible preferred stock",
    "redeemable convertible preferred stock",
    "principal shareholders",
    "principal stockholders",
    "principal and selling stockholders",
    "selling stockholders",
    "stockholders",
    "shareholders",
    "class a",
    "class b",
    "class c",
    "class a common stock",
    "class b common stock",
    "class c common stock",
    "class a ordinary shares",
    "class b ordinary shares",
    "ordinary shares",
    "series a preferred stock",
    "series b preferred stock",
    "series c preferred stock",
    "series seed preferred stock",
    "named executive officers",
    "directors and named executive officers",
    "other stockholders",
    "greater than stockholders",
    "holders",
    "shares",
    "number",
    "percentage",
    "percent",
    "before offering",
    "after offering",
    "voting power",
];

/// Substrings of filing section headings and table captions.
pub const SECTION_SUBSTRINGS: &[&str] = &[
    "risk factors",
    "underwriting",
    "use of proceeds",
    "item ",
    "part i",
    "table of contents",
    "dividend policy",
    "capitalization",
    "dilution",
    "prospectus summary",
    "the offering",
    "summary consolidated",
    "selected financial data",
    "selected consolidated",
    "forward-looking",
    "management's discussion",
    "management’s discussion",
    "discussion and analysis",
    "results of operations",
    "liquidity and capital resources",
    "critical accounting",
    "quantitative and qualitative",
    "market risk",
    "industry and market data",
    "business overview",
    "executive compensation",
    "compensation discussion",
    "summary compensation",
    "director compensation",
    "outstanding equity awards",
    "employment agreements",
    "equity incentive plan",
    "certain relationships",
    "related party transactions",
    "related person transactions",
    "description of capital stock",
    "description of securities",
    "description of share capital",
    "shares eligible for future sale",
    "lock-up",
    "registration rights",
    "material u.s. federal",
    "tax considerations",
    "legal matters",
    "where you can find",
    "additional information",
    "incorporation by reference",
    "index to financial statements",
    "financial statements",
    "notes to consolidated",
    "report of independent",
    "independent registered public",
    "balance sheet",
    "statements of operations",
    "statements of cash flows",
    "stockholders' equity",
    "stockholders’ equity",
    "corporate governance",
    "board committees",
    "code of business conduct",
    "plan of distribution",
    "limitation of liability",
    "indemnification",
    "anti-takeover",
    "transfer agent",
    "emerging growth company",
    "implications of being",
    "recent sales of unregistered",
    "power of attorney",
    "undertakings",
    "exhibit index",
    "beneficial ownership",
    "beneficially owned",
    "shares outstanding",
    "number of shares",
    "percentage of shares",
    "prior to the offering",
    "after the offering",
    "less than one percent",
    "less than 1%",
    "address of",
];

/// Lower-cased prefixes that mark headers, totals and footnote rows.
pub const NON_NAME_PREFIXES: &[&str] = &[
    "name",
    "total",
    "(",
    "*",
    "_",
    "-",
    "—",
    "•",
    "the ",
    "item",
    "part",
    "executive officers and directors",
    "directors and executive officers",
    "all executive officers",
    "all directors",
    "all current",
    "officers and directors",
    "named executive",
    "other ",
    "percentage",
    "percent ",
    "number ",
    "shares ",
    "common ",
    "preferred ",
    "class ",
    "series ",
    "footnote",
    "note ",
    "notes ",
    "see ",
    "includes ",
    "represents ",
    "consists ",
    "based on",
    "less than",
    "beneficial",
    "5% ",
    "greater than",
];

/// Trailing words typical of section titles.
pub const SECTION_TITLE_SUFFIXES: &[&str] = &[
    "statements",
    "considerations",
    "matters",
    "liabilities",
    "policies",
    "procedures",
    "information",
    "summary",
    "overview",
    "factors",
    "data",
    "results",
    "transactions",
    "arrangements",
    "compensation",
    "governance",
    "proceeds",
    "dilution",
    "capitalization",
    "offering",
    "provisions",
    "estimates",
    "operations",
    "contents",
    "exhibits",
    "signatures",
    "stockholders",
    "shareholders",
];

/// Word tokens that mark a legal entity or investment vehicle.
pub const ENTITY_KEYWORDS: &[&str] = &[
    "llc", "l.l.c", "lp", "l.p", "llp", "inc", "incorporated", "corp", "corporation",
    "fund", "funds", "capital", "partners", "partner", "venture", "ventures", "trust",
    "holdings", "holding", "management", "advisors", "advisers", "investment",
    "investments", "investors", "equity", "group", "foundation", "endowment", "family",
    "associates", "asset", "assets", "securities", "limited", "ltd", "company", "co",
    "partnership", "plc", "gmbh", "ag", "sa", "bv", "n.v", "s.a", "bank", "financial",
    "enterprises", "opportunities", "growth", "global", "estate", "university",
];

// --- Patterns ---

static EMBEDDED_PERCENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:\.\d+)?\s*%").expect("Failed to compile EMBEDDED_PERCENT_RE")
});

static NUMERIC_ONLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\d\s.,%$€£()*\-–—/]+$").expect("Failed to compile NUMERIC_ONLY_RE")
});

static LEADING_FOOTNOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\(\d+\)|\*+)").expect("Failed to compile LEADING_FOOTNOTE_RE")
});

static CREDENTIAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Ph\.\s?D\.?|M\.\s?D\.|M\.B\.A\.?|J\.\s?D\.|\bCPA\b|\bCFA\b|\bMBA\b")
        .expect("Failed to compile CREDENTIAL_RE")
});

// --- Verdicts ---

/// The check that produced a decision. Useful for tests and debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Length,
    AllCapsHeading,
    NonInvestorPhrase,
    SectionSubstring,
    NonNamePrefix,
    GroupAggregate,
    NumericOnly,
    LeadingFootnote,
    SectionTitleSuffix,
    PercentWithIdentity,
    EntityOrPerson,
    CapitalizedWords,
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept(Rule),
    Reject(Rule),
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accept(_))
    }
}

/// Convenience wrapper: `true` when the name should become a stockholder row.
#[cfg(test)]
pub fn is_investor_name(name: &str) -> bool {
    validate(name).is_accepted()
}

/// Runs the ordered checks; the first one that decides wins.
pub fn validate(name: &str) -> Verdict {
    use Rule::*;
    use Verdict::{Accept, Reject};

    let char_count = name.chars().count();
    if !(3..=150).contains(&char_count) {
        return Reject(Length);
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    if is_all_caps(name) && words.len() > 4 {
        return Reject(AllCapsHeading);
    }

    let lower = name.to_lowercase();

    let bare = EMBEDDED_PERCENT_RE.replace_all(&lower, "");
    let bare = collapse_ws(bare.trim().trim_end_matches(':').trim());
    if NON_INVESTOR_PHRASES.contains(&bare.as_str()) {
        return Reject(NonInvestorPhrase);
    }

    if SECTION_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
        return Reject(SectionSubstring);
    }

    if NON_NAME_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        if lower.contains("as a group") && name.chars().any(|c| c.is_ascii_digit()) {
            return Accept(GroupAggregate);
        }
        return Reject(NonNamePrefix);
    }

    if NUMERIC_ONLY_RE.is_match(name) {
        return Reject(NumericOnly);
    }

    if LEADING_FOOTNOTE_RE.is_match(name) {
        return Reject(LeadingFootnote);
    }

    let trimmed = lower.trim_end_matches(|c: char| c == ':' || c == '.' || c.is_whitespace());
    if SECTION_TITLE_SUFFIXES.iter().any(|s| trimmed.ends_with(s)) {
        return Reject(SectionTitleSuffix);
    }

    let has_identity = has_entity_keyword(&lower) || looks_like_person(&words) || has_credential(name);

    if EMBEDDED_PERCENT_RE.is_match(name) && has_identity {
        return Accept(PercentWithIdentity);
    }

    if has_identity {
        return Accept(EntityOrPerson);
    }

    if (2..=4).contains(&words.len()) && words.iter().all(|w| starts_upper(w)) {
        return Accept(CapitalizedWords);
    }

    Reject(NoMatch)
}

/// Any token (split on whitespace and punctuation, dots kept) is an entity keyword.
pub fn has_entity_keyword(lower: &str) -> bool {
    lower
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '(' | ')' | '/' | '&' | '"' | '“' | '”'))
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .any(|t| ENTITY_KEYWORDS.contains(&t))
}

/// 2–5 words with at least two Capitalized (not ALL CAPS) words.
pub fn looks_like_person(words: &[&str]) -> bool {
    if !(2..=5).contains(&words.len()) {
        return false;
    }
    let capitalized = words
        .iter()
        .filter(|w| starts_upper(w) && w.chars().any(|c| c.is_lowercase()))
        .count();
    capitalized >= 2
}

pub fn has_credential(name: &str) -> bool {
    CREDENTIAL_RE.is_match(name)
}

fn starts_upper(word: &str) -> bool {
    word.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

fn is_all_caps(s: &str) -> bool {
    s.chars().any(|c| c.is_alphabetic()) && !s.chars().any(|c| c.is_lowercase())
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
