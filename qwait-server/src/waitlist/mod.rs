//! Waitlist Domain (排队领域逻辑)
//!
//! - [`manager`]: 编排层，验证 → 守卫 → 存储 → 广播
//! - [`status`]: 状态机转移规则
//! - [`guard`]: 活跃号码重复守卫

pub mod guard;
pub mod manager;
pub mod status;
