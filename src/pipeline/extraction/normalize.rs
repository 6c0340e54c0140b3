use std::sync::LazyLock;

use regex::Regex;

use super::types::NormalizedDocument;

/// Runs of underscores/pipes: OCR renders table borders and form rules this way.
static TABLE_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_|]{2,}").expect("valid regex"));

/// Horizontal whitespace only; newlines carry line structure and are kept.
static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("valid regex"));

/// Dash variants OCR engines emit in place of an ASCII hyphen.
fn is_dash_variant(c: char) -> bool {
    matches!(
        c,
        '\u{2010}' // Hyphen
            | '\u{2011}' // Non-breaking hyphen
            | '\u{2012}' // Figure dash
            | '\u{2013}' // En-dash
            | '\u{2014}' // Em-dash
            | '\u{2015}' // Horizontal bar
            | '\u{2212}' // Minus sign
    )
}

/// Clean raw OCR text: unify line endings, turn tabs into spaces, collapse
/// table-rule artifacts and dash variants into `-`, drop control characters,
/// collapse horizontal whitespace and trim every line.
///
/// Runs of blank lines become a single blank line; leading and trailing blank
/// lines are removed.
pub fn normalize_ocr_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let unified: String = raw
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            '\n' => Some('\n'),
            c if is_dash_variant(c) => Some('-'),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();
    let unified = TABLE_RULE.replace_all(&unified, "-");

    let mut lines: Vec<String> = Vec::new();
    for line in unified.lines() {
        let line = HORIZONTAL_SPACE.replace_all(line, " ");
        let line = line.trim();
        let previous_blank = lines.last().map_or(true, |l| l.is_empty());
        if line.is_empty() && previous_blank {
            continue;
        }
        lines.push(line.to_string());
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Normalize raw OCR text and split it into its non-empty lines.
pub fn normalize_document(raw: &str) -> NormalizedDocument {
    let text = normalize_ocr_text(raw);
    let lines = text
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    NormalizedDocument { text, lines }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_returns_empty() {
        let doc = normalize_document("");
        assert_eq!(doc.text, "");
        assert!(doc.lines.is_empty());
        assert!(doc.is_empty());
    }

    #[test]
    fn whitespace_only_input_returns_empty() {
        let doc = normalize_document(" \t \r\n \n\t");
        assert!(doc.lines.is_empty());
        assert_eq!(doc.text, "");
    }

    #[test]
    fn unifies_line_endings() {
        let doc = normalize_document("Name: Jane\r\nAge: 30\rSex: F");
        assert_eq!(doc.lines, vec!["Name: Jane", "Age: 30", "Sex: F"]);
    }

    #[test]
    fn tabs_and_repeated_spaces_collapse() {
        assert_eq!(normalize_ocr_text("BP:\t\t120/80    mmHg"), "BP: 120/80 mmHg");
    }

    #[test]
    fn table_rules_become_single_dash() {
        assert_eq!(normalize_ocr_text("Name ____ Jane"), "Name - Jane");
        assert_eq!(normalize_ocr_text("Age ||| 30"), "Age - 30");
        assert_eq!(normalize_ocr_text("a_b|c"), "a_b|c");
    }

    #[test]
    fn unicode_dashes_become_ascii() {
        assert_eq!(
            normalize_ocr_text("Dose: 500\u{2013}1000 mg \u{2014} PID\u{2212}42"),
            "Dose: 500-1000 mg - PID-42"
        );
    }

    #[test]
    fn strips_control_characters() {
        let clean = normalize_ocr_text("Dose: 500mg\x01\x02\x03\nDate: 2024-01-15\x00");
        assert_eq!(clean, "Dose: 500mg\nDate: 2024-01-15");
    }

    #[test]
    fn blank_line_runs_collapse_but_survive_in_text() {
        let doc = normalize_document("\n\nRx: Amoxicillin\n\n\n\nDiagnosis: Flu\n\n");
        assert_eq!(doc.text, "Rx: Amoxicillin\n\nDiagnosis: Flu");
        assert_eq!(doc.lines, vec!["Rx: Amoxicillin", "Diagnosis: Flu"]);
    }

    #[test]
    fn lines_are_trimmed() {
        let doc = normalize_document("   Name: Jane Doe   \n   Age: 30  ");
        assert_eq!(doc.lines, vec!["Name: Jane Doe", "Age: 30"]);
    }

    #[test]
    fn preserves_medical_punctuation() {
        let clean = normalize_ocr_text("Temp: 37.5°C, BP: 120/80 mmHg (normal)");
        assert_eq!(clean, "Temp: 37.5°C, BP: 120/80 mmHg (normal)");
    }
}
