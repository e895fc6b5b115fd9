use std::cell::Cell;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use parish_cal_core::FetchError;
use parish_cal_core::fetch::Fetch;

/// Spinner on stderr while meeting pages are fetched. Hidden when stderr is
/// not a terminal.
pub fn fetch_spinner(source_count: usize) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/", "-"])
        .template("{msg} {spinner} {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(format!(
        "Fetching {} meeting {}",
        source_count,
        if source_count == 1 { "page" } else { "pages" }
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Wraps a fetcher so the spinner names the page being fetched.
pub struct SpinnerFetcher<'a, F> {
    inner: &'a F,
    spinner: &'a ProgressBar,
    total: usize,
    started: Cell<usize>,
}

impl<'a, F: Fetch> SpinnerFetcher<'a, F> {
    pub fn new(inner: &'a F, spinner: &'a ProgressBar, total: usize) -> Self {
        SpinnerFetcher {
            inner,
            spinner,
            total,
            started: Cell::new(0),
        }
    }
}

impl<F: Fetch> Fetch for SpinnerFetcher<'_, F> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let n = self.started.get() + 1;
        self.started.set(n);
        self.spinner
            .set_message(format!("Fetching [{}/{}] {}", n, self.total, url));
        self.inner.fetch(url).await
    }
}
