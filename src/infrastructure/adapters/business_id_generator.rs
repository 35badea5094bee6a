use crate::ports::id_generator_port::IdGenerator;
use chrono::{Timelike, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

const DATA_VERSION: &str = "1";
const SYSTEM_VERSION: &str = "1";
const SYSTEM_CODE_PAYMENT: &str = "003";
const BUSINESS_CODE_PAYMENT: &str = "01";
const SEQUENCE_MODULUS: u64 = 100_000_000;

/// 32位业务单号生成器
///
/// 格式：日期(8) + 数据版本(1) + 系统版本(1) + 系统标识(3) + 业务标识(2)
/// + 机房位(2) + 分库位(2) + 分表位(2) + 环境位(1) + 预留位(2) + 序列号(8)
///
/// 序列号起点取当日已过毫秒数，进程重启后不会回到同日已发出的号段，
/// 除非上一进程的发号速度超过每毫秒一个。
#[derive(Debug)]
pub struct BusinessIdGenerator {
    site_id: String,
    db_shard: String,
    table_shard: String,
    env_flag: String,
    sequence: AtomicU64,
}

impl Default for BusinessIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BusinessIdGenerator {
    pub fn new() -> Self {
        Self::with_layout(0, 0, 0, 'T')
    }

    /// 分片位超过两位时取低两位
    pub fn with_layout(site_id: u8, db_shard: u8, table_shard: u8, env_flag: char) -> Self {
        Self {
            site_id: format!("{:02}", site_id % 100),
            db_shard: format!("{:02}", db_shard % 100),
            table_shard: format!("{:02}", table_shard % 100),
            env_flag: env_flag.to_string(),
            sequence: AtomicU64::new(millis_since_midnight()),
        }
    }
}

fn millis_since_midnight() -> u64 {
    let now = Utc::now();
    u64::from(now.num_seconds_from_midnight()) * 1000 + u64::from(now.timestamp_subsec_millis())
}

impl IdGenerator for BusinessIdGenerator {
    fn next(&self) -> String {
        let seq = (self.sequence.fetch_add(1, Ordering::Relaxed) + 1) % SEQUENCE_MODULUS;
        let id = format!(
            "{}{}{}{}{}{}{}{}{}00{:08}",
            Utc::now().format("%Y%m%d"),
            DATA_VERSION,
            SYSTEM_VERSION,
            SYSTEM_CODE_PAYMENT,
            BUSINESS_CODE_PAYMENT,
            self.site_id,
            self.db_shard,
            self.table_shard,
            self.env_flag,
            seq
        );
        debug!("Generated business ID: {}", id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_id_layout() {
        let generator = BusinessIdGenerator::with_layout(1, 2, 3, 'P');
        let id = generator.next();

        assert_eq!(id.len(), 32);
        assert_eq!(&id[8..15], "1100301");
        assert_eq!(&id[15..21], "010203");
        assert_eq!(&id[21..22], "P");
        assert_eq!(&id[22..24], "00");
        assert!(id[24..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_restarted_generator_skips_issued_numbers() {
        let sequence = |id: String| id[24..].parse::<u64>().unwrap();

        let before = millis_since_midnight();
        let first = BusinessIdGenerator::new();
        let issued = sequence(first.next());
        assert!(issued > before);

        std::thread::sleep(std::time::Duration::from_millis(5));
        let restarted = BusinessIdGenerator::new();
        assert!(sequence(restarted.next()) > issued);
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let generator = Arc::new(BusinessIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || (0..250).map(|_| generator.next()).collect::<Vec<_>>())
            })
            .collect();

        let ids: HashSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(ids.len(), 1000);
    }
}
