//! Anonymous device identity carried in the `bud_device` cookie.

use crate::domain::like::entity::DeviceId;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const DEVICE_COOKIE: &str = "bud_device";
const DEVICE_COOKIE_DAYS: i64 = 400;

/// Returns the request's device id, minting one when the cookie is missing or
/// unreadable. The returned jar only carries a new cookie when one was minted.
pub fn resolve_device(jar: CookieJar, secure: bool) -> (CookieJar, DeviceId) {
    if let Some(device) = jar
        .get(DEVICE_COOKIE)
        .and_then(|cookie| DeviceId::parse(cookie.value()))
    {
        return (jar, device);
    }

    let device = DeviceId::mint();
    let cookie = Cookie::build((DEVICE_COOKIE, device.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(DEVICE_COOKIE_DAYS))
        .build();
    (jar.add(cookie), device)
}
