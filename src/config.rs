use std::time::Duration;

/// Tunables for a [`crate::Tc`] instance.
///
/// Every field has a default suitable for a conservative, low-bandwidth
/// substrate (e.g. a DNS tunnel); embedders riding a faster or lossier
/// carrier are expected to override them with the `with_*` builders.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub(crate) max_segment_data: u16,
    pub(crate) read_timeout: Duration,
    pub(crate) write_timeout: Option<Duration>,
    pub(crate) congestion_window: u32,
    pub(crate) congestion_wait: Duration,
    pub(crate) retransmission_interval: Duration,
    pub(crate) max_retransmissions: u32,
    pub(crate) segment_data_timeout: Duration,
    pub(crate) starvation_retry: Duration,
    pub(crate) debug: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            max_segment_data: 100,
            read_timeout: Duration::from_secs(30),
            write_timeout: None,
            congestion_window: 4096,
            congestion_wait: Duration::from_millis(100),
            retransmission_interval: Duration::from_secs(5),
            max_retransmissions: 5,
            segment_data_timeout: Duration::from_secs(5),
            starvation_retry: Duration::from_millis(50),
            debug: false,
        }
    }

    /// Same starting point as [`Config::new`]/[`Config::default`], named to
    /// match the `with_*` builder chain that follows it:
    /// `Config::builder().with_congestion_window(4096)`.
    pub fn builder() -> Self {
        Self::new()
    }

    pub fn with_max_segment_data(mut self, n: u16) -> Self {
        self.max_segment_data = n;
        self
    }

    pub fn with_read_timeout(mut self, d: Duration) -> Self {
        self.read_timeout = d;
        self
    }

    pub fn with_write_timeout(mut self, d: Duration) -> Self {
        self.write_timeout = Some(d);
        self
    }

    pub fn with_congestion_window(mut self, n: u32) -> Self {
        self.congestion_window = n;
        self
    }

    pub fn with_congestion_wait(mut self, d: Duration) -> Self {
        self.congestion_wait = d;
        self
    }

    pub fn with_retransmission_interval(mut self, d: Duration) -> Self {
        self.retransmission_interval = d;
        self
    }

    pub fn with_max_retransmissions(mut self, n: u32) -> Self {
        self.max_retransmissions = n;
        self
    }

    pub fn with_segment_data_timeout(mut self, d: Duration) -> Self {
        self.segment_data_timeout = d;
        self
    }

    pub fn with_starvation_retry(mut self, d: Duration) -> Self {
        self.starvation_retry = d;
        self
    }

    pub fn with_debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }

    pub fn max_segment_data(&self) -> u16 {
        self.max_segment_data
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_internally_consistent() {
        let cfg = Config::default();
        assert!(cfg.max_segment_data > 0);
        assert!(cfg.congestion_window as usize >= cfg.max_segment_data as usize);
        assert!(cfg.max_retransmissions > 0);
    }

    #[test]
    fn builder_overrides_take_effect() {
        let cfg = Config::default()
            .with_max_segment_data(10)
            .with_congestion_window(50)
            .with_max_retransmissions(3)
            .with_debug(true);

        assert_eq!(cfg.max_segment_data, 10);
        assert_eq!(cfg.congestion_window, 50);
        assert_eq!(cfg.max_retransmissions, 3);
        assert!(cfg.debug);
    }
}
