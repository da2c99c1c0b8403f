//! Status lines on stderr.
//!
//! Each line starts with a right-aligned colored label, so stdout stays
//! free for rendered HTML.

use std::path::Path;
use std::time::Duration;

use console::{Style, Term};

const LABEL_WIDTH: usize = 10;

pub(crate) struct Output {
    term: Term,
    ok: Style,
    wait: Style,
    fail: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green().bold(),
            wait: Style::new().yellow().bold(),
            fail: Style::new().red().bold(),
        }
    }

    pub(crate) fn serving(&self, site_dir: &Path, host: &str, port: u16) {
        self.line(
            &self.ok,
            "Serving",
            &format!("{} at http://{host}:{port}/", site_dir.display()),
        );
    }

    /// Route the app settled on, after any redirects.
    pub(crate) fn rendered(&self, path: &str) {
        self.line(&self.ok, "Rendered", path);
    }

    pub(crate) fn waiting_for_visit(&self, delay: Duration) {
        self.line(
            &self.wait,
            "Waiting",
            &format!("{}s to record the visit", delay.as_secs()),
        );
    }

    pub(crate) fn visit_recorded(&self) {
        self.line(&self.ok, "Recorded", "first visit");
    }

    pub(crate) fn error(&self, err: &dyn std::error::Error) {
        self.line(&self.fail, "Error", &err.to_string());
    }

    fn line(&self, style: &Style, label: &str, msg: &str) {
        let label = style.apply_to(format!("{label:>LABEL_WIDTH$}"));
        let _ = self.term.write_line(&format!("{label} {msg}"));
    }
}
