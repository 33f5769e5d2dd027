use indicatif::{MultiProgress, ProgressBar as InnerProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};

const TEMPLATE: &str = "{prefix:>.bold}\n[{bar:40.cyan/blue}] {pos}/{len}: {msg} ({eta})";

/// Progress across batch jobs, counting the ones that failed.
#[derive(Debug)]
pub struct ProgressBar {
    inner: InnerProgressBar,
    failed: AtomicUsize,
}

impl ProgressBar {
    pub fn new(mp: MultiProgress, prefix: &str, len: usize) -> Self {
        let inner = mp.add(InnerProgressBar::new(len as u64));

        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>");
        inner.set_style(style);
        inner.set_prefix(prefix.to_string());
        inner.tick();

        Self {
            inner,
            failed: AtomicUsize::new(0),
        }
    }

    pub fn job_done(&self, name: impl Into<String>, ok: bool) {
        if !ok {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }

        self.inner.set_message(name.into());
        self.inner.inc(1);
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn finish(&self) {
        self.inner.finish_and_clear();
    }
}
