//! 认证边界
//!
//! 登录、token、权限都由上游认证层负责，这里只消费它注入的
//! `X-Restaurant-Id` 头，把每个请求限定在一家餐厅的作用域内。

mod extractor;

pub use extractor::RestaurantScope;
