/// 业务单号生成端口
pub trait IdGenerator: Send + Sync {
    fn next(&self) -> String;
}
