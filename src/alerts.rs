use crate::models::usage::UsageSample;
use std::path::PathBuf;

/// Strictly-greater comparison: usage exactly at the threshold does not alert.
pub fn exceeds(sample: u8, threshold: u8) -> bool {
    sample > threshold
}

/// Where and when a run is happening, stamped onto every alert.
#[derive(Debug, Clone)]
pub struct Origin {
    pub host:       String,
    pub checked_at: String,
}

impl Origin {
    pub fn current() -> Self {
        let host = nix::unistd::gethostname()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown-host".to_string());
        Self {
            host,
            checked_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub label:      String,
    pub path:       PathBuf,
    pub used_pct:   u8,
    pub threshold:  u8,
    pub host:       String,
    pub checked_at: String,
}

impl Alert {
    pub fn message(&self) -> String {
        format!(
            "Disk usage on {} for drive {} ('{}') has exceeded {}% of the total available space, \
             with {}% being used currently (checked {}). \
             Please free up space to ensure uninterrupted operation.",
            self.host,
            self.label,
            self.path.display(),
            self.threshold,
            self.used_pct,
            self.checked_at,
        )
    }
}

/// Build the alert for one sample, if it is over the threshold.
pub fn evaluate(sample: &UsageSample<'_>, threshold: u8, origin: &Origin) -> Option<Alert> {
    if !exceeds(sample.used_pct, threshold) {
        return None;
    }
    Some(Alert {
        label:      sample.target.label.clone(),
        path:       sample.target.path.clone(),
        used_pct:   sample.used_pct,
        threshold,
        host:       origin.host.clone(),
        checked_at: origin.checked_at.clone(),
    })
}
