use std::time::Instant;
use tracing::info;

/// Logs how long a scope took when dropped.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        info!("Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!("Finished: {} (took {:.2?})", self.label, self.start.elapsed());
    }
}

/// Row/page counts with thousands separators: 1234567 → "1,234,567".
pub fn fmt_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_count() {
        assert_eq!(fmt_count(1_234_567), "1,234,567");
        assert_eq!(fmt_count(0), "0");
        assert_eq!(fmt_count(999), "999");
        assert_eq!(fmt_count(12_000), "12,000");
    }
}
