//! Plain-text rendering of a collection summary.

use patent_search::types::UNKNOWN;
use patent_search::{DownloadResult, Record, Summary};

/// Render one record the way the report lists it.
pub fn render_record(record: &Record) -> String {
    let inventors = if record.inventors.is_empty() {
        UNKNOWN.to_owned()
    } else {
        record.inventors.join(", ")
    };
    format!(
        "Patent ID:   {}\n\
         Title:       {}\n\
         Link:        {}\n\
         Abstract:    {}\n\
         Inventors:   {inventors}\n\
         Filing date: {}\n",
        record.id,
        record.title,
        record.artifact_link.as_deref().unwrap_or(UNKNOWN),
        record.abstract_text,
        record.filing_date,
    )
}

/// Render the whole summary: records, saved artifacts, skips and
/// failures, totals.
pub fn render_summary(summary: &Summary) -> String {
    if summary.records.is_empty() {
        return "No patents found.\n".to_owned();
    }

    let mut out = format!("Found {} patents:\n", summary.record_count());
    for record in &summary.records {
        out.push_str(&render_record(record));
        out.push_str("---\n");
    }

    for path in summary.downloaded_paths() {
        out.push_str(&format!("Downloaded PDF: {}\n", path.display()));
    }
    for outcome in &summary.outcomes {
        match &outcome.result {
            DownloadResult::Success(_) => {}
            DownloadResult::Skipped(reason) => {
                out.push_str(&format!("Skipped {}: {reason}\n", outcome.url));
            }
            DownloadResult::Failed(reason) => {
                out.push_str(&format!("Failed {}: {reason}\n", outcome.url));
            }
        }
    }

    out.push_str(&format!(
        "Total PDFs downloaded: {} (skipped {}, failed {})\n",
        summary.downloaded(),
        summary.skipped(),
        summary.failed()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use patent_search::{DownloadOutcome, FailureReason};
    use std::path::PathBuf;

    #[test]
    fn empty_summary_says_no_patents() {
        assert_eq!(render_summary(&Summary::default()), "No patents found.\n");
    }

    #[test]
    fn record_lists_inventors_and_sentinels() {
        let record = Record {
            title: "Cyclonic separator".into(),
            inventors: vec!["James Dyson".into(), "Peter Gammack".into()],
            ..Record::default()
        };
        let text = render_record(&record);
        assert!(text.contains("Title:       Cyclonic separator"));
        assert!(text.contains("Inventors:   James Dyson, Peter Gammack"));
        assert!(text.contains("Link:        unknown"));
    }

    #[test]
    fn summary_lists_outcomes_and_totals() {
        let summary = Summary {
            records: vec![Record::default()],
            outcomes: vec![
                DownloadOutcome {
                    url: "https://a.example/US1.pdf".into(),
                    result: DownloadResult::Success(PathBuf::from("out/US1.pdf")),
                },
                DownloadOutcome {
                    url: "https://a.example/US2.pdf".into(),
                    result: DownloadResult::Failed(FailureReason::Unreachable {
                        status: Some(404),
                        detail: "Not Found".into(),
                    }),
                },
            ],
        };
        let text = render_summary(&summary);
        assert!(text.starts_with("Found 1 patents:"));
        assert!(text.contains("Downloaded PDF: out/US1.pdf"));
        assert!(text.contains("Failed https://a.example/US2.pdf: unreachable (status 404)"));
        assert!(text.contains("Total PDFs downloaded: 1 (skipped 0, failed 1)"));
    }

    #[test]
    fn saved_paths_listed_before_skips() {
        let summary = Summary {
            records: vec![Record::default()],
            outcomes: vec![
                DownloadOutcome {
                    url: "https://a.example/US3.html".into(),
                    result: DownloadResult::Skipped(patent_search::SkipReason::NotPdf),
                },
                DownloadOutcome {
                    url: "https://a.example/US4.pdf".into(),
                    result: DownloadResult::Success(PathBuf::from("out/US4.pdf")),
                },
            ],
        };
        let text = render_summary(&summary);
        let saved = text.find("Downloaded PDF: out/US4.pdf").expect("saved line");
        let skipped = text.find("Skipped https://a.example/US3.html").expect("skip line");
        assert!(saved < skipped);
        assert!(text.ends_with("Total PDFs downloaded: 1 (skipped 1, failed 0)\n"));
    }
}
