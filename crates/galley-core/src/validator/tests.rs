use super::*;

#[test]
fn test_balanced_document_is_valid() {
    let markup = r"\begin{document}\begin{itemize}\item one\end{itemize}\end{document}";
    let report = validate(markup);
    assert!(report.is_valid());
    assert!(report.messages().is_empty());
}

#[test]
fn test_empty_input_is_valid() {
    assert!(validate("").is_valid());
}

#[test]
fn test_plain_text_without_tags_is_valid() {
    assert!(validate("no environments here, just \\textbf{text}").is_valid());
}

#[test]
fn test_unclosed_environment_reports_counts() {
    let report = validate(r"\begin{itemize}\item one");
    assert_eq!(report.issues.len(), 1);
    assert_eq!(
        report.issues[0],
        EnvironmentIssue::Unbalanced {
            name: "itemize".to_string(),
            begins: 1,
            ends: 0,
        }
    );
    assert_eq!(
        report.messages()[0],
        "Environment 'itemize' has 1 \\begin but 0 \\end tags"
    );
}

#[test]
fn test_end_without_begin_is_its_own_kind() {
    let report = validate(r"some text \end{table}");
    assert_eq!(report.issues.len(), 1);
    assert!(matches!(
        &report.issues[0],
        EnvironmentIssue::EndWithoutBegin { name } if name == "table"
    ));
    assert_eq!(
        report.messages()[0],
        "Environment 'table' has an \\end tag without a matching \\begin"
    );
}

#[test]
fn test_surplus_end_is_unbalanced_not_unopened() {
    // The name appears in both maps, so this is a count mismatch, not an
    // end-without-begin.
    let report = validate(r"\begin{center}\end{center}\end{center}");
    assert_eq!(report.issues.len(), 1);
    assert_eq!(
        report.issues[0],
        EnvironmentIssue::Unbalanced {
            name: "center".to_string(),
            begins: 1,
            ends: 2,
        }
    );
}

#[test]
fn test_repeated_balanced_environment() {
    let markup = r"\begin{itemize}\end{itemize}\begin{itemize}\end{itemize}";
    assert!(validate(markup).is_valid());
}

#[test]
fn test_only_counts_matter_not_nesting() {
    // Interleaved closing order: structurally wrong LaTeX, but the balance
    // check only compares counts per name.
    let interleaved = r"\begin{a}\begin{b}\end{a}\end{b}";
    let nested = r"\begin{a}\begin{b}\end{b}\end{a}";
    assert!(validate(interleaved).is_valid());
    assert!(validate(nested).is_valid());
}

#[test]
fn test_validation_is_idempotent() {
    let markup = r"\begin{itemize}\begin{tabular}\end{itemize}";
    let first = validate(markup);
    let second = validate(markup);
    assert_eq!(first.issues, second.issues);
}

#[test]
fn test_issues_in_first_seen_order() {
    let markup = r"\begin{zeta}\begin{alpha}\end{omega}\end{psi}";
    let report = validate(markup);
    let names: Vec<&str> = report.issues.iter().map(|i| i.environment()).collect();
    // Unbalanced begins first in first-\begin order, then unopened ends in
    // first-\end order. Alphabetical order would be a bug here.
    assert_eq!(names, vec!["zeta", "alpha", "omega", "psi"]);
}

#[test]
fn test_mixed_issue_kinds() {
    let report = validate(r"\begin{figure}\begin{figure}\end{figure}\end{tabular}");
    assert_eq!(report.issues.len(), 2);
    assert!(matches!(
        report.issues[0],
        EnvironmentIssue::Unbalanced { ref name, begins: 2, ends: 1 } if name == "figure"
    ));
    assert!(matches!(
        &report.issues[1],
        EnvironmentIssue::EndWithoutBegin { name } if name == "tabular"
    ));
}

#[test]
fn test_report_display_joins_messages() {
    let report = validate(r"\begin{itemize}\end{table}");
    let rendered = report.to_string();
    assert!(rendered.contains("Environment 'itemize' has 1 \\begin but 0 \\end tags"));
    assert!(rendered.contains("Environment 'table' has an \\end tag"));
    assert!(rendered.contains(", "));
}

#[test]
fn test_starred_and_exotic_names_count_separately() {
    let markup = r"\begin{align*}\end{align*}\begin{align}\end{align}";
    assert!(validate(markup).is_valid());

    let report = validate(r"\begin{align*}\end{align}");
    assert_eq!(report.issues.len(), 2);
}
