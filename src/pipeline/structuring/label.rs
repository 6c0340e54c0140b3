use std::sync::LazyLock;

use regex::Regex;

/// Whether a label must be followed by `:` or `-` before its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Optional,
    Required,
}

/// Record section names that end a labeled block when they open a line with
/// `:` or `-`. Other `Word: value` lines, like `Amoxicillin: 500mg`, stay in
/// the block.
const SECTION_NAMES: &[&str] = &[
    "Diagnosis",
    "Impression",
    "Assessment",
    "Dx",
    "Name",
    "Full Name",
    "Patient Name",
    "Patient ID",
    "PatientID",
    "MRN",
    "PID",
    "ID",
    "Hospital No",
    "Record No",
    "Age",
    "Sex",
    "Gender",
    "BP",
    "B.P.",
    "Blood Pressure",
    "Weight",
    "Wt",
    "Height",
    "Ht",
    "Temp",
    "Temperature",
    "Pulse",
    "Allergies",
    "History",
    "Complaints",
    "Investigations",
    "Advice",
    "Notes",
    "Follow up",
    "Follow-up",
    "Date",
    "Signature",
];

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    let names = SECTION_NAMES
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)^(?:{names})\s*[:\-]")).expect("valid regex")
});

/// A compiled set of label synonyms ("Full Name", "Patient Name", "Name").
///
/// Matching is case-insensitive and anchored on word boundaries. Document
/// order decides: the first line carrying any synonym wins, regardless of the
/// order the synonyms were listed in.
pub struct LabelSet {
    inline: Regex,
    header: Regex,
}

impl LabelSet {
    pub fn new(labels: &[&str], separator: Separator) -> Self {
        let alternatives = labels
            .iter()
            .map(|l| regex::escape(l))
            .collect::<Vec<_>>()
            .join("|");
        let sep = match separator {
            Separator::Optional => r"[:\-]?",
            Separator::Required => r"[:\-]",
        };
        let inline = format!(r"(?i)\b(?:{alternatives})\b\s*{sep}\s*(.+)");
        let header = format!(r"(?i)^(?:{alternatives})\b\s*{sep}\s*(.*)$");
        Self {
            inline: Regex::new(&inline).expect("escaped labels form a valid regex"),
            header: Regex::new(&header).expect("escaped labels form a valid regex"),
        }
    }

    /// Value following the first label found, scanning lines top to bottom.
    /// Values without any alphanumeric character are skipped.
    pub fn find_value(&self, lines: &[String]) -> Option<String> {
        lines.iter().find_map(|line| {
            let value = self.inline.captures(line)?.get(1)?.as_str().trim();
            has_content(value).then(|| value.to_string())
        })
    }

    /// The labeled section starting at the first labeled line: its inline
    /// value plus continuation lines up to the next blank line or the next
    /// known section header (`Diagnosis:`, `Follow up -`, ...). A label alone on its line opens a section too.
    ///
    /// `text` must keep blank lines between blocks (normalized text, not the
    /// filtered line list).
    pub fn find_block(&self, text: &str) -> Option<Vec<String>> {
        let mut lines = text.lines();
        let first = lines.by_ref().find_map(|line| self.section_value(line))?;

        let mut block: Vec<String> = Vec::new();
        if has_content(&first) {
            block.push(first);
        }
        for line in lines {
            let line = line.trim();
            if line.is_empty() || SECTION_HEADER.is_match(line) {
                break;
            }
            block.push(line.to_string());
        }

        (!block.is_empty()).then_some(block)
    }

    fn section_value(&self, line: &str) -> Option<String> {
        if let Some(caps) = self.header.captures(line) {
            return Some(caps.get(1).map_or("", |m| m.as_str()).trim().to_string());
        }
        let value = self.inline.captures(line)?.get(1)?.as_str().trim();
        has_content(value).then(|| value.to_string())
    }
}

fn has_content(value: &str) -> bool {
    value.chars().any(char::is_alphanumeric)
}

/// One-shot convenience over [`LabelSet`] for callers without a cached set.
pub fn find_label_value(lines: &[String], labels: &[&str], separator: Separator) -> Option<String> {
    LabelSet::new(labels, separator).find_value(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    #[test]
    fn returns_value_after_label() {
        let l = lines("Name: Jane Doe\nAge: 30");
        assert_eq!(
            find_label_value(&l, &["Name"], Separator::Optional).as_deref(),
            Some("Jane Doe")
        );
    }

    #[test]
    fn label_is_case_insensitive() {
        let l = lines("PATIENT NAME - John Smith");
        assert_eq!(
            find_label_value(&l, &["Patient Name"], Separator::Optional).as_deref(),
            Some("John Smith")
        );
    }

    #[test]
    fn document_order_beats_synonym_order() {
        let l = lines("Name: First Seen\nFull Name: Listed First");
        assert_eq!(
            find_label_value(&l, &["Full Name", "Name"], Separator::Optional).as_deref(),
            Some("First Seen")
        );
    }

    #[test]
    fn separator_is_optional_by_default() {
        let l = lines("Diagnosis Acute bronchitis");
        assert_eq!(
            find_label_value(&l, &["Diagnosis"], Separator::Optional).as_deref(),
            Some("Acute bronchitis")
        );
    }

    #[test]
    fn required_separator_rejects_bare_label() {
        let l = lines("Patient ID: 123\nName: Jane Doe");
        assert_eq!(
            find_label_value(&l, &["Patient", "Name"], Separator::Required).as_deref(),
            Some("Jane Doe")
        );
    }

    #[test]
    fn label_must_be_a_whole_word() {
        let l = lines("Rapid test done\nID: 778");
        assert_eq!(
            find_label_value(&l, &["ID"], Separator::Optional).as_deref(),
            Some("778")
        );
    }

    #[test]
    fn missing_label_is_none() {
        let l = lines("Age: 30");
        assert!(find_label_value(&l, &["Diagnosis"], Separator::Optional).is_none());
        assert!(find_label_value(&[], &["Diagnosis"], Separator::Optional).is_none());
    }

    #[test]
    fn punctuation_only_value_is_skipped() {
        let l = lines("Diagnosis: --\nImpression: Viral fever");
        assert_eq!(
            find_label_value(&l, &["Diagnosis", "Impression"], Separator::Optional).as_deref(),
            Some("Viral fever")
        );
    }

    #[test]
    fn block_collects_continuation_lines() {
        let set = LabelSet::new(&["Rx"], Separator::Optional);
        let block = set
            .find_block("Rx: Amoxicillin 500mg\n- Ibuprofen 200mg\n\nFollow up in a week")
            .unwrap();
        assert_eq!(block, vec!["Amoxicillin 500mg", "- Ibuprofen 200mg"]);
    }

    #[test]
    fn block_may_start_with_bare_header() {
        let set = LabelSet::new(&["Medications"], Separator::Optional);
        let block = set
            .find_block("Medications:\n• Metformin 500 mg\n• Lisinopril 10 mg\nDiagnosis: Diabetes")
            .unwrap();
        assert_eq!(block, vec!["• Metformin 500 mg", "• Lisinopril 10 mg"]);
    }

    #[test]
    fn drug_colon_and_dash_lines_stay_in_block() {
        let set = LabelSet::new(&["Rx", "Medications"], Separator::Optional);
        let block = set
            .find_block("Medications:\nParacetamol - 500 mg\nAmoxicillin: 500mg TDS\nFollow up - 1 week")
            .unwrap();
        assert_eq!(block, vec!["Paracetamol - 500 mg", "Amoxicillin: 500mg TDS"]);
    }

    #[test]
    fn section_header_matches_known_names_only() {
        assert!(SECTION_HEADER.is_match("Diagnosis: Flu"));
        assert!(SECTION_HEADER.is_match("FOLLOW UP - 2 weeks"));
        assert!(SECTION_HEADER.is_match("B.P.: 120/80"));
        assert!(!SECTION_HEADER.is_match("Ibuprofen - 200 mg"));
        assert!(!SECTION_HEADER.is_match("Amoxicillin: 500mg"));
    }

    #[test]
    fn empty_block_is_none() {
        let set = LabelSet::new(&["Medications"], Separator::Optional);
        assert!(set.find_block("Medications:\n\nDiagnosis: Flu").is_none());
        assert!(set.find_block("Diagnosis: Flu").is_none());
    }
}
