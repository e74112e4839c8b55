use super::{DEVICE_ID_KEY, KeyValueStore, StoreError};

/// 单个浏览器的设备会话：`device_id` 保存在客户端 Cookie 中
///
/// 中间件从请求 Cookie 构造会话，处理完请求后根据 `issued` / `cleared`
/// 决定是否下发或过期 Cookie。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSession {
    cookie_id: Option<String>,
    issued: Option<String>,
    cleared: bool,
}

impl DeviceSession {
    pub fn from_cookie(cookie_id: Option<String>) -> Self {
        Self {
            cookie_id: cookie_id.filter(|id| !id.trim().is_empty()),
            issued: None,
            cleared: false,
        }
    }

    /// 当前生效的设备ID（新下发的优先）
    pub fn current_id(&self) -> Option<&str> {
        if self.cleared && self.issued.is_none() {
            return None;
        }
        self.issued.as_deref().or(self.cookie_id.as_deref())
    }

    /// 本次请求新生成、需要写回 Cookie 的设备ID
    pub fn issued_id(&self) -> Option<&str> {
        self.issued.as_deref()
    }

    /// 本次请求是否清除了设备ID（需要过期 Cookie）
    pub fn is_cleared(&self) -> bool {
        self.cleared && self.issued.is_none()
    }

    fn issue(&mut self, id: &str) {
        self.issued = Some(id.to_string());
    }

    fn forget(&mut self) {
        self.issued = None;
        self.cleared = true;
    }
}

/// 请求级存储视图：`device_id` 落在设备会话上，其它键透传到共享存储
pub struct ClientStore<'a> {
    shared: &'a mut dyn KeyValueStore,
    session: &'a mut DeviceSession,
}

impl<'a> ClientStore<'a> {
    pub fn new(shared: &'a mut dyn KeyValueStore, session: &'a mut DeviceSession) -> Self {
        Self { shared, session }
    }
}

impl KeyValueStore for ClientStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if key == DEVICE_ID_KEY {
            return Ok(self.session.current_id().map(str::to_string));
        }
        self.shared.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if key == DEVICE_ID_KEY {
            self.session.issue(value);
            return Ok(());
        }
        self.shared.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if key == DEVICE_ID_KEY {
            self.session.forget();
            return Ok(());
        }
        self.shared.remove(key)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.session.forget();
        self.shared.clear()
    }
}
