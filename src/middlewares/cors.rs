use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| {
            // 活动页可能部署在任意域名下
            true
        })
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        // 设备ID 通过 Cookie 传递，需要携带凭据
        .supports_credentials()
        .max_age(3600)
}
