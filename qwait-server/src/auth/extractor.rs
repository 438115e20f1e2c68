//! Restaurant Scope Extractor

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::utils::AppError;

pub const RESTAURANT_HEADER: &str = "x-restaurant-id";

/// 请求的餐厅作用域
///
/// 上游认证层校验过员工身份后注入 `X-Restaurant-Id`；缺头或
/// 无法解析都按未认证拒绝 (401)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestaurantScope(pub i64);

impl<S> FromRequestParts<S> for RestaurantScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(RESTAURANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or(AppError::Unauthorized)?;
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<RestaurantScope, AppError> {
        let (mut parts, _) = request.into_parts();
        RestaurantScope::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_scope_from_header() {
        let request = Request::builder()
            .header("X-Restaurant-Id", "42")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap(), RestaurantScope(42));
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        assert!(matches!(
            extract(request).await.unwrap_err(),
            AppError::Unauthorized
        ));
    }

    #[tokio::test]
    async fn test_garbage_header_is_unauthorized() {
        let request = Request::builder()
            .header("X-Restaurant-Id", "not-a-number")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(request).await.unwrap_err(),
            AppError::Unauthorized
        ));
    }
}
