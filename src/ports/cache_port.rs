use async_trait::async_trait;

/// 缓存端口接口
///
/// 实现方自行吞掉底层错误：读失败等同未命中，写失败只记录日志。
#[async_trait]
pub trait CachePort: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: &str, ttl_secs: u64);

    async fn delete(&self, key: &str);
}
