use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

use crate::storage::{DEVICE_ID_KEY, DeviceSession};

/// 设备ID Cookie 有效期（活动周期内足够长即可）
const DEVICE_COOKIE_MAX_AGE_DAYS: i64 = 365;

/// 设备会话中间件
///
/// 请求进入时从 `device_id` Cookie 构造 `DeviceSession` 放入请求扩展；
/// 响应返回前，若处理器新分配了设备ID则下发 Cookie，若清空了设备则过期 Cookie。
pub struct DeviceMiddleware;

impl<S, B> Transform<S, ServiceRequest> for DeviceMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = DeviceMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DeviceMiddlewareService { service }))
    }
}

pub struct DeviceMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for DeviceMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let cookie_id = req.cookie(DEVICE_ID_KEY).map(|c| c.value().to_string());
        req.extensions_mut()
            .insert(DeviceSession::from_cookie(cookie_id));

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            let session = res.request().extensions().get::<DeviceSession>().cloned();
            if let Some(session) = session {
                if let Some(id) = session.issued_id() {
                    let cookie = device_cookie(id.to_string());
                    if let Err(e) = res.response_mut().add_cookie(&cookie) {
                        log::error!("Failed to set device cookie: {e}");
                    }
                } else if session.is_cleared() {
                    let mut cookie = device_cookie(String::new());
                    cookie.make_removal();
                    if let Err(e) = res.response_mut().add_cookie(&cookie) {
                        log::error!("Failed to expire device cookie: {e}");
                    }
                }
            }

            Ok(res)
        })
    }
}

fn device_cookie(value: String) -> Cookie<'static> {
    Cookie::build(DEVICE_ID_KEY, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(DEVICE_COOKIE_MAX_AGE_DAYS))
        .finish()
}

/// 取出中间件放入的设备会话（未经过中间件时视为新设备）
pub fn take_device_session(req: &HttpRequest) -> DeviceSession {
    req.extensions_mut()
        .remove::<DeviceSession>()
        .unwrap_or_default()
}

/// 处理完成后写回设备会话，供中间件下发 Cookie
pub fn store_device_session(req: &HttpRequest, session: DeviceSession) {
    req.extensions_mut().insert(session);
}
