//! Reporter selection.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Layout of console or file reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Brief,
    Plain,
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "brief" => Ok(ReportFormat::Brief),
            "plain" => Ok(ReportFormat::Plain),
            other => Err(Error::UnrecognizedReportFormat(other.to_string())),
        }
    }
}

/// A reporter the booter attaches to the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Reporter {
    /// Summary on the console.
    Console,
    /// Summary on the console, relayed from a forked child.
    ForkingConsole,
    BriefConsole,
    DetailedConsole,
    BriefFile { directory: PathBuf },
    File { directory: PathBuf },
    /// Machine-readable XML results; always present.
    Xml { directory: PathBuf },
}

impl Reporter {
    /// Booter-side implementation class for this reporter.
    pub fn class_name(&self) -> &'static str {
        match self {
            Reporter::Console => "org.apache.maven.surefire.report.ConsoleReporter",
            Reporter::ForkingConsole => "org.apache.maven.surefire.report.ForkingConsoleReporter",
            Reporter::BriefConsole => "org.apache.maven.surefire.report.BriefConsoleReporter",
            Reporter::DetailedConsole => "org.apache.maven.surefire.report.DetailedConsoleReporter",
            Reporter::BriefFile { .. } => "org.apache.maven.surefire.report.BriefFileReporter",
            Reporter::File { .. } => "org.apache.maven.surefire.report.FileReporter",
            Reporter::Xml { .. } => "org.apache.maven.surefire.report.XMLReporter",
        }
    }

    /// Output directory, for file-backed reporters.
    pub fn directory(&self) -> Option<&Path> {
        match self {
            Reporter::BriefFile { directory }
            | Reporter::File { directory }
            | Reporter::Xml { directory } => Some(directory),
            _ => None,
        }
    }
}

/// Ordered reporters for a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReporterSpec {
    pub reporters: Vec<Reporter>,
}

impl ReporterSpec {
    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reporter> {
        self.reporters.iter()
    }
}

/// Reporter-related options.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions<'a> {
    pub use_file: bool,
    pub print_summary: bool,
    pub report_format: &'a str,
    pub forking: bool,
}

/// Builds the reporter set.
///
/// An unrecognized format adds no format-specific reporter; the XML reporter
/// is appended regardless.
pub fn build_reporters(options: ReportOptions<'_>, reports_directory: &Path) -> ReporterSpec {
    let format = options.report_format.parse::<ReportFormat>().ok();
    let mut reporters = Vec::new();

    if options.use_file {
        if options.print_summary {
            reporters.push(if options.forking {
                Reporter::ForkingConsole
            } else {
                Reporter::Console
            });
        }

        match format {
            Some(ReportFormat::Brief) => reporters.push(Reporter::BriefFile {
                directory: reports_directory.to_path_buf(),
            }),
            Some(ReportFormat::Plain) => reporters.push(Reporter::File {
                directory: reports_directory.to_path_buf(),
            }),
            None => {}
        }
    } else {
        match format {
            Some(ReportFormat::Brief) => reporters.push(Reporter::BriefConsole),
            Some(ReportFormat::Plain) => reporters.push(Reporter::DetailedConsole),
            None => {}
        }
    }

    reporters.push(Reporter::Xml {
        directory: reports_directory.to_path_buf(),
    });

    ReporterSpec { reporters }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reports() -> PathBuf {
        PathBuf::from("/work/app/target/surefire-reports")
    }

    fn opts(use_file: bool, print_summary: bool, report_format: &str, forking: bool) -> ReportOptions<'_> {
        ReportOptions {
            use_file,
            print_summary,
            report_format,
            forking,
        }
    }

    #[test]
    fn file_output_with_summary_in_process() {
        let spec = build_reporters(opts(true, true, "brief", false), &reports());
        assert_eq!(
            spec.reporters,
            vec![
                Reporter::Console,
                Reporter::BriefFile { directory: reports() },
                Reporter::Xml { directory: reports() },
            ]
        );
    }

    #[test]
    fn file_output_with_summary_forked_uses_forking_console() {
        let spec = build_reporters(opts(true, true, "plain", true), &reports());
        assert_eq!(
            spec.reporters,
            vec![
                Reporter::ForkingConsole,
                Reporter::File { directory: reports() },
                Reporter::Xml { directory: reports() },
            ]
        );
    }

    #[test]
    fn file_output_without_summary() {
        let spec = build_reporters(opts(true, false, "brief", true), &reports());
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.reporters[0], Reporter::BriefFile { directory: reports() });
    }

    #[test]
    fn console_output_ignores_summary_and_forking() {
        for (summary, forking) in [(true, true), (false, false), (true, false)] {
            let spec = build_reporters(opts(false, summary, "brief", forking), &reports());
            assert_eq!(
                spec.reporters,
                vec![Reporter::BriefConsole, Reporter::Xml { directory: reports() }]
            );
        }

        let spec = build_reporters(opts(false, true, "plain", false), &reports());
        assert_eq!(spec.reporters[0], Reporter::DetailedConsole);
    }

    #[test]
    fn unrecognized_format_adds_no_format_reporter() {
        let spec = build_reporters(opts(true, true, "html", false), &reports());
        assert_eq!(
            spec.reporters,
            vec![Reporter::Console, Reporter::Xml { directory: reports() }]
        );

        let spec = build_reporters(opts(false, true, "html", false), &reports());
        assert_eq!(spec.reporters, vec![Reporter::Xml { directory: reports() }]);
    }

    #[test]
    fn xml_reporter_is_always_last() {
        let spec = build_reporters(opts(true, true, "plain", false), &reports());
        let last = spec.iter().last().unwrap();
        assert_eq!(last.class_name(), "org.apache.maven.surefire.report.XMLReporter");
        assert_eq!(last.directory(), Some(reports().as_path()));
    }

    #[test]
    fn report_format_parses_known_values() {
        assert_eq!("brief".parse::<ReportFormat>().unwrap(), ReportFormat::Brief);
        assert_eq!("plain".parse::<ReportFormat>().unwrap(), ReportFormat::Plain);
        assert!(matches!(
            "xml".parse::<ReportFormat>(),
            Err(Error::UnrecognizedReportFormat(_))
        ));
    }
}
