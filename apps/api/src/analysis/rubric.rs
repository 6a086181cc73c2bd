//! Rubric evaluator: ten independent presence checks over extracted resume text.
//!
//! Every check is a plain heuristic (regexes, heading matching, word counts).
//! The aggregate score is the share of passing criteria as a percentage, so it
//! is always a multiple of 10 in `[0, 100]`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::feedback::{criterion_feedback, EXTRACTION_FAILED_FEEDBACK};
use crate::models::analysis::NewAnalysis;

pub const MIN_WORDS: usize = 150;
pub const MAX_WORDS: usize = 500;
/// Grammar passes while the issue count stays below this.
const GRAMMAR_ISSUE_LIMIT: usize = 3;
/// Headings are short; longer lines are treated as prose.
const MAX_HEADING_WORDS: usize = 6;

/// Words that mark a document title rather than a person's name.
const TITLE_WORDS: &[&str] = &[
    "curriculum",
    "vitae",
    "resume",
    "résumé",
    "cv",
    "biodata",
    "summary",
    "profile",
    "objective",
    "portfolio",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Name,
    Contact,
    Address,
    Skills,
    Experience,
    Projects,
    Interests,
    Certifications,
    Length,
    Grammar,
}

impl Criterion {
    pub const ALL: [Criterion; 10] = [
        Criterion::Name,
        Criterion::Contact,
        Criterion::Address,
        Criterion::Skills,
        Criterion::Experience,
        Criterion::Projects,
        Criterion::Interests,
        Criterion::Certifications,
        Criterion::Length,
        Criterion::Grammar,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Criterion::Name => "Name",
            Criterion::Contact => "Contact Details",
            Criterion::Address => "Address",
            Criterion::Skills => "Skills Set",
            Criterion::Experience => "Work Experience",
            Criterion::Projects => "Projects",
            Criterion::Interests => "Interests/Hobbies",
            Criterion::Certifications => "Certifications",
            Criterion::Length => "Appropriate Length",
            Criterion::Grammar => "Grammar & Spelling",
        }
    }
}

/// Pass/fail per criterion. Serializes as `{ "name": true, "contact": false, ... }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaResults {
    pub name: bool,
    pub contact: bool,
    pub address: bool,
    pub skills: bool,
    pub experience: bool,
    pub projects: bool,
    pub interests: bool,
    pub certifications: bool,
    pub length: bool,
    pub grammar: bool,
}

impl CriteriaResults {
    pub fn get(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::Name => self.name,
            Criterion::Contact => self.contact,
            Criterion::Address => self.address,
            Criterion::Skills => self.skills,
            Criterion::Experience => self.experience,
            Criterion::Projects => self.projects,
            Criterion::Interests => self.interests,
            Criterion::Certifications => self.certifications,
            Criterion::Length => self.length,
            Criterion::Grammar => self.grammar,
        }
    }

    fn set(&mut self, criterion: Criterion, passed: bool) {
        let slot = match criterion {
            Criterion::Name => &mut self.name,
            Criterion::Contact => &mut self.contact,
            Criterion::Address => &mut self.address,
            Criterion::Skills => &mut self.skills,
            Criterion::Experience => &mut self.experience,
            Criterion::Projects => &mut self.projects,
            Criterion::Interests => &mut self.interests,
            Criterion::Certifications => &mut self.certifications,
            Criterion::Length => &mut self.length,
            Criterion::Grammar => &mut self.grammar,
        };
        *slot = passed;
    }

    pub fn passed_count(&self) -> usize {
        Criterion::ALL.iter().filter(|c| self.get(**c)).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricReport {
    pub score: u32,
    pub analysis: CriteriaResults,
    pub feedback: Vec<String>,
}

impl RubricReport {
    /// Shapes the report for storage: passing labels become strengths,
    /// failing labels weaknesses, feedback the recommendations.
    pub fn to_new_analysis(&self) -> NewAnalysis {
        let (passed, failed): (Vec<Criterion>, Vec<Criterion>) =
            Criterion::ALL.iter().copied().partition(|c| self.analysis.get(*c));
        NewAnalysis {
            score: self.score,
            strengths: passed.iter().map(|c| c.label().to_string()).collect(),
            weaknesses: failed.iter().map(|c| c.label().to_string()).collect(),
            recommendations: self.feedback.clone(),
        }
    }
}

const SKILLS_HEADINGS: &[&str] = &[
    "skills",
    "skill set",
    "technical skills",
    "key skills",
    "core competencies",
];

const EXPERIENCE_HEADINGS: &[&str] = &[
    "experience",
    "work experience",
    "professional experience",
    "employment history",
    "work history",
    "employment",
];

const PROJECTS_HEADINGS: &[&str] = &[
    "projects",
    "personal projects",
    "academic projects",
    "key projects",
];

const INTERESTS_HEADINGS: &[&str] = &[
    "interests",
    "hobbies",
    "hobbies and interests",
    "interests and hobbies",
    "activities",
];

const CERTIFICATIONS_HEADINGS: &[&str] = &[
    "certifications",
    "certification",
    "certificates",
    "licenses and certifications",
    "courses and certifications",
];

const COMMON_MISSPELLINGS: &[&str] = &[
    "teh",
    "recieve",
    "recieved",
    "acheive",
    "acheived",
    "seperate",
    "occured",
    "definately",
    "managment",
    "enviroment",
    "responsibilty",
    "experiance",
    "begining",
    "untill",
    "wich",
    "accomodate",
    "sucessful",
    "succesful",
    "occurence",
    "knowlege",
    "maintainance",
    "neccessary",
    "relevent",
    "independant",
    "comunication",
    "proffesional",
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\(?\d[\d\s().-]{8,}\d").expect("valid regex"));

static STREET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,5}\s+(?:[a-z0-9.]+\s+){1,4}(?:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|court|ct|way|place|pl)\b",
    )
    .expect("valid regex")
});

static POSTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z .]+,\s*[A-Z]{2}\s+\d{5}(?:-\d{4})?\b").expect("valid regex")
});

static PIN_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z]+\s*[-,]\s*\d{6}\b").expect("valid regex"));

static ADDRESS_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*(?:address|location)\s*:").expect("valid regex"));

static REPEATED_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;:!?]{2,}|,\.|\.,").expect("valid regex"));

/// Exactly two periods; an ellipsis is fine.
static DOUBLE_PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^.])\.\.(?:[^.]|$)").expect("valid regex"));

static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]\s+[,;.](?:\s|$)").expect("valid regex"));

/// Scores extracted resume text against the ten criteria.
pub fn evaluate(text: &str) -> RubricReport {
    if text.trim().is_empty() {
        let mut feedback = vec![EXTRACTION_FAILED_FEEDBACK.to_string()];
        feedback.extend(Criterion::ALL.iter().map(|c| criterion_feedback(*c)));
        return RubricReport {
            score: 0,
            analysis: CriteriaResults::default(),
            feedback,
        };
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let headings: Vec<String> = lines.iter().filter_map(|l| normalize_heading(l)).collect();

    let mut analysis = CriteriaResults::default();
    for criterion in Criterion::ALL {
        let passed = match criterion {
            Criterion::Name => has_name(&lines),
            Criterion::Contact => has_contact(text),
            Criterion::Address => has_address(text),
            Criterion::Skills => has_heading(&headings, SKILLS_HEADINGS),
            Criterion::Experience => has_heading(&headings, EXPERIENCE_HEADINGS),
            Criterion::Projects => has_heading(&headings, PROJECTS_HEADINGS),
            Criterion::Interests => has_heading(&headings, INTERESTS_HEADINGS),
            Criterion::Certifications => has_heading(&headings, CERTIFICATIONS_HEADINGS),
            Criterion::Length => (MIN_WORDS..=MAX_WORDS).contains(&word_count(text)),
            Criterion::Grammar => count_grammar_issues(text) < GRAMMAR_ISSUE_LIMIT,
        };
        analysis.set(criterion, passed);
    }

    let passed = analysis.passed_count();
    let score = ((passed as f64 / Criterion::ALL.len() as f64) * 100.0).round() as u32;
    let feedback = Criterion::ALL
        .iter()
        .filter(|c| !analysis.get(**c))
        .map(|c| criterion_feedback(*c))
        .collect();

    RubricReport {
        score,
        analysis,
        feedback,
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Reduces a line to its heading form: text before the first `:`, lowercased,
/// `&` spelled out, punctuation trimmed off each word. Returns `None` for
/// lines too long to be a heading.
fn normalize_heading(line: &str) -> Option<String> {
    let head = line.split(':').next().unwrap_or(line).to_lowercase().replace('&', " and ");
    let words: Vec<&str> = head
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() || words.len() > MAX_HEADING_WORDS {
        return None;
    }
    Some(words.join(" "))
}

fn has_heading(headings: &[String], aliases: &[&str]) -> bool {
    headings.iter().any(|h| aliases.contains(&h.as_str()))
}

fn is_any_heading(line: &str) -> bool {
    let Some(heading) = normalize_heading(line) else {
        return false;
    };
    [
        SKILLS_HEADINGS,
        EXPERIENCE_HEADINGS,
        PROJECTS_HEADINGS,
        INTERESTS_HEADINGS,
        CERTIFICATIONS_HEADINGS,
    ]
    .iter()
    .any(|aliases| aliases.contains(&heading.as_str()))
}

/// The first non-empty line must look like a person's name: 2 to 4 capitalised
/// words made of letters and `.`, `'`, `-`.
fn has_name(lines: &[&str]) -> bool {
    let Some(first) = lines.first() else {
        return false;
    };
    if is_any_heading(first) {
        return false;
    }
    let words: Vec<&str> = first.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    if words.iter().any(|w| {
        let word = w.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase();
        TITLE_WORDS.contains(&word.as_str())
    }) {
        return false;
    }
    words.iter().all(|w| {
        let mut chars = w.chars();
        let starts_upper = chars
            .next()
            .map(|c| c.is_alphabetic() && c.is_uppercase())
            .unwrap_or(false);
        starts_upper && w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-'))
    })
}

fn has_contact(text: &str) -> bool {
    if EMAIL_RE.is_match(text) {
        return true;
    }
    PHONE_RE.find_iter(text).any(|m| {
        let digits = m.as_str().chars().filter(|c| c.is_ascii_digit()).count();
        (10..=15).contains(&digits)
    })
}

fn has_address(text: &str) -> bool {
    STREET_RE.is_match(text)
        || POSTAL_RE.is_match(text)
        || PIN_CODE_RE.is_match(text)
        || ADDRESS_LABEL_RE.is_match(text)
}

fn count_grammar_issues(text: &str) -> usize {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect();

    let doubled = words
        .windows(2)
        .filter(|pair| {
            pair[0].chars().all(char::is_alphabetic) && pair[0].eq_ignore_ascii_case(&pair[1])
        })
        .count();

    let misspelled = words
        .iter()
        .filter(|w| COMMON_MISSPELLINGS.contains(&w.to_lowercase().as_str()))
        .count();

    let lowercase_i = words.iter().filter(|w| w.as_str() == "i").count();

    doubled
        + misspelled
        + lowercase_i
        + REPEATED_PUNCT_RE.find_iter(text).count()
        + DOUBLE_PERIOD_RE.find_iter(text).count()
        + SPACE_BEFORE_PUNCT_RE.find_iter(text).count()
}
