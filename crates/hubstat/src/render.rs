//! Prometheus text exposition format.
//!
//! Renders a reconciled snapshot into the text format scraped by a
//! Prometheus server. Metric family names match the original
//! github-exporter conventions: `github_exporter_<stat>` gauges
//! labelled by repository and archived flag.

use std::fmt::Write as _;

use hubstat_core::RepoMetrics;

/// Render a snapshot plus the scrape-error flag.
///
/// A failed refresh still renders the (stale or empty) snapshot; the
/// failure is reported as `github_exporter_scrape_error 1` so a
/// consumer can tell under-reporting from zero.
pub fn render_metrics(stats: &[RepoMetrics], scrape_failed: bool) -> String {
    let mut out = String::new();

    out.push_str("# HELP github_exporter_stars Total number of stars.\n");
    out.push_str("# TYPE github_exporter_stars gauge\n");
    for s in stats {
        let _ = writeln!(
            out,
            "github_exporter_stars{{repo=\"{}\",archived=\"{}\"}} {}",
            s.name, s.archived, s.stars
        );
    }

    out.push_str("# HELP github_exporter_forks Total number of forks.\n");
    out.push_str("# TYPE github_exporter_forks gauge\n");
    for s in stats {
        let _ = writeln!(
            out,
            "github_exporter_forks{{repo=\"{}\",archived=\"{}\"}} {}",
            s.name, s.archived, s.forks
        );
    }

    out.push_str("# HELP github_exporter_issues Total number of open issues.\n");
    out.push_str("# TYPE github_exporter_issues gauge\n");
    for s in stats {
        let _ = writeln!(
            out,
            "github_exporter_issues{{repo=\"{}\",archived=\"{}\"}} {}",
            s.name, s.archived, s.open_issues
        );
    }

    out.push_str("# HELP github_exporter_pulls Total number of open pull requests.\n");
    out.push_str("# TYPE github_exporter_pulls gauge\n");
    for s in stats {
        let _ = writeln!(
            out,
            "github_exporter_pulls{{repo=\"{}\",archived=\"{}\"}} {}",
            s.name, s.archived, s.open_pull_requests
        );
    }

    out.push_str("# HELP github_exporter_scrape_error 1 if the last refresh attempt failed.\n");
    out.push_str("# TYPE github_exporter_scrape_error gauge\n");
    let _ = writeln!(out, "github_exporter_scrape_error {}", u8::from(scrape_failed));

    out
}
