use std::sync::atomic::{AtomicU64, Ordering};

/// Central statistics hub for a store. All counters are updated with relaxed
/// atomics on the operation paths and read via [`Statistics::snapshot`].
#[derive(Debug, Default)]
pub struct Statistics {
    // Operation counters
    pub total_gets: AtomicU64,
    pub total_sets: AtomicU64,
    pub total_updates: AtomicU64,
    pub total_deletes: AtomicU64,
    pub total_key_scans: AtomicU64,
    pub total_counters: AtomicU64,

    // Operation latencies (accumulated nanoseconds)
    pub get_latency_ns: AtomicU64,
    pub set_latency_ns: AtomicU64,
    pub delete_latency_ns: AtomicU64,

    // File traffic
    pub bytes_read: AtomicU64,
    pub bytes_written: AtomicU64,

    // Fsync activity (explicit flushes and background ticks)
    pub sync_count: AtomicU64,
    pub sync_failures: AtomicU64,

    // Recovery
    pub records_replayed: AtomicU64,

    // Error counters
    pub key_not_found_errors: AtomicU64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_get(&self, latency_ns: u64) {
        self.total_gets.fetch_add(1, Ordering::Relaxed);
        self.get_latency_ns.fetch_add(latency_ns, Ordering::Relaxed);
    }

    pub fn record_set(&self, latency_ns: u64, is_update: bool) {
        if is_update {
            self.total_updates.fetch_add(1, Ordering::Relaxed);
        } else {
            self.total_sets.fetch_add(1, Ordering::Relaxed);
        }
        self.set_latency_ns.fetch_add(latency_ns, Ordering::Relaxed);
    }

    pub fn record_delete(&self, latency_ns: u64) {
        self.total_deletes.fetch_add(1, Ordering::Relaxed);
        self.delete_latency_ns
            .fetch_add(latency_ns, Ordering::Relaxed);
    }

    pub fn record_key_scan(&self) {
        self.total_key_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_counter(&self) {
        self.total_counters.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_key_not_found(&self) {
        self.key_not_found_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter plus derived averages.
    pub fn snapshot(&self) -> StatsSnapshot {
        let total_gets = self.total_gets.load(Ordering::Relaxed);
        let total_sets = self.total_sets.load(Ordering::Relaxed);
        let total_updates = self.total_updates.load(Ordering::Relaxed);
        let total_deletes = self.total_deletes.load(Ordering::Relaxed);
        let writes = total_sets + total_updates;

        StatsSnapshot {
            total_gets,
            total_sets,
            total_updates,
            total_deletes,
            total_key_scans: self.total_key_scans.load(Ordering::Relaxed),
            total_counters: self.total_counters.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            sync_count: self.sync_count.load(Ordering::Relaxed),
            sync_failures: self.sync_failures.load(Ordering::Relaxed),
            records_replayed: self.records_replayed.load(Ordering::Relaxed),
            key_not_found_errors: self.key_not_found_errors.load(Ordering::Relaxed),
            avg_get_latency_ns: average(self.get_latency_ns.load(Ordering::Relaxed), total_gets),
            avg_set_latency_ns: average(self.set_latency_ns.load(Ordering::Relaxed), writes),
            avg_delete_latency_ns: average(
                self.delete_latency_ns.load(Ordering::Relaxed),
                total_deletes,
            ),
        }
    }
}

fn average(total: u64, count: u64) -> u64 {
    if count == 0 {
        0
    } else {
        total / count
    }
}

/// Plain copy of the statistics counters.
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub total_gets: u64,
    pub total_sets: u64,
    pub total_updates: u64,
    pub total_deletes: u64,
    pub total_key_scans: u64,
    pub total_counters: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub sync_count: u64,
    pub sync_failures: u64,
    pub records_replayed: u64,
    pub key_not_found_errors: u64,
    pub avg_get_latency_ns: u64,
    pub avg_set_latency_ns: u64,
    pub avg_delete_latency_ns: u64,
}
