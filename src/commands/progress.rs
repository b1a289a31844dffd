//! indicatif rendering of client progress

use fpgaflasher_client::Progress;
use fpgaflasher_core::chip::PAGE_SIZE;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter using indicatif progress bars
pub struct IndicatifProgress {
    multi: MultiProgress,
    current_bar: Option<ProgressBar>,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            current_bar: None,
        }
    }

    fn create_bar(&mut self, total_bytes: u64, phase: &str) {
        let pb = self.multi.add(ProgressBar::new(total_bytes));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                    phase
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        self.current_bar = Some(pb);
    }

    fn create_spinner(&mut self, message: String) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.current_bar = Some(pb);
    }

    fn set_position(&self, bytes: usize) {
        if let Some(pb) = &self.current_bar {
            pb.set_position(bytes as u64);
        }
    }

    fn finish(&mut self, message: &str) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Progress for IndicatifProgress {
    fn erasing(&mut self, total_pages: usize) {
        self.create_spinner(format!("Erasing flash before writing {} pages...", total_pages));
    }

    fn programming(&mut self, total_pages: usize) {
        self.finish("Erase complete");
        self.create_bar((total_pages * PAGE_SIZE) as u64, "Writing");
    }

    fn program_progress(&mut self, pages_done: usize) {
        self.set_position(pages_done * PAGE_SIZE);
    }

    fn verifying(&mut self, total_pages: usize) {
        self.finish("Write complete");
        self.create_bar((total_pages * PAGE_SIZE) as u64, "Verifying");
    }

    fn verify_progress(&mut self, pages_done: usize) {
        self.set_position(pages_done * PAGE_SIZE);
    }

    fn reading(&mut self, total_bytes: usize) {
        self.create_bar(total_bytes as u64, "Reading");
    }

    fn read_progress(&mut self, bytes_read: usize) {
        self.set_position(bytes_read);
    }

    fn configuring(&mut self, total_bytes: usize) {
        self.create_bar(total_bytes as u64, "Configuring");
    }

    fn configure_progress(&mut self, bytes_sent: usize) {
        self.set_position(bytes_sent);
    }

    fn complete(&mut self) {
        self.finish("Done");
    }
}
