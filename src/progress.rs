use indicatif::{ProgressBar, ProgressStyle};

/// Observer told how many records were handed to storage.
pub trait Progress {
    fn advance(&self, records: u64);

    fn finish(&self) {}
}

/// No reporting.
impl Progress for () {
    fn advance(&self, _records: u64) {}
}

impl Progress for ProgressBar {
    fn advance(&self, records: u64) {
        self.inc(records);
    }

    fn finish(&self) {
        self.finish_with_message("done");
    }
}

pub fn progress_bar(total: u64) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} records ({per_sec}) {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(total).with_style(style)
}
