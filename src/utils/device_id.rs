use rand::Rng;

const SUFFIX_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 生成设备ID：`device_<毫秒时间戳>_<9位 base36 随机串>`
pub fn generate_device_id(timestamp_millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| SUFFIX_CHARS[rng.gen_range(0..SUFFIX_CHARS.len())] as char)
        .collect();
    format!("device_{timestamp_millis}_{suffix}")
}
